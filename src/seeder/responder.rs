// Query Responder - map a parsed query type onto the current snapshot
// Principle: one snapshot read per query, empty answers are answers

use hickory_proto::rr::RecordType;

use super::directory::PeerDirectory;
use super::normalize::PeerAddress;

/// Addresses to answer a query of the given record type with.
///
/// A returns the IPv4 set, AAAA the IPv6 set, both in stored (sorted)
/// order; every other record type gets an empty sequence, which is the
/// correct DNS behavior for types this service does not serve.
///
/// Exactly one snapshot read happens per call, so the answer is internally
/// consistent even when a refresh lands mid-query.
pub fn respond(query_type: RecordType, directory: &PeerDirectory) -> Vec<PeerAddress> {
    let snapshot = directory.snapshot();

    match query_type {
        RecordType::A => snapshot.ipv4().to_vec(),
        RecordType::AAAA => snapshot.ipv6().to_vec(),
        _ => Vec::new(),
    }
}
