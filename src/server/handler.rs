// Seed request handler - wraps the responder for hickory-server
// Principle: answer one name authoritatively, refuse nothing but non-queries

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{LowerName, Name, RData, Record, RecordType};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use tracing::{debug, warn};

use crate::seeder::{respond, PeerDirectory};

/// TTL for answer records. Short enough that resolvers re-query and pick up
/// peer churn, long enough not to hammer the seeder.
pub const ANSWER_TTL: u32 = 60;

/// DNS request handler serving the peer directory for one seed hostname.
pub struct SeedHandler {
    origin: LowerName,
    directory: Arc<PeerDirectory>,
}

impl SeedHandler {
    pub fn new(seed_name: Name, directory: Arc<PeerDirectory>) -> Self {
        Self {
            origin: LowerName::new(&seed_name),
            directory,
        }
    }

    /// Records for one query: current peer set for the seed hostname,
    /// empty for any other name or record type.
    fn answer_records(&self, qname: &LowerName, qtype: RecordType) -> Vec<Record> {
        if qname != &self.origin {
            return Vec::new();
        }

        let name = Name::from(qname.clone());

        respond(qtype, &self.directory)
            .into_iter()
            .map(|peer| {
                let rdata = match peer.ip() {
                    IpAddr::V4(ip) => RData::A(A(ip)),
                    IpAddr::V6(ip) => RData::AAAA(AAAA(ip)),
                };
                Record::from_rdata(name.clone(), ANSWER_TTL, rdata)
            })
            .collect()
    }
}

fn serve_failed() -> ResponseInfo {
    let mut header = Header::new();
    header.set_response_code(ResponseCode::ServFail);
    header.into()
}

#[async_trait]
impl RequestHandler for SeedHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let header = request.header();

        if header.message_type() != MessageType::Query || header.op_code() != OpCode::Query {
            let builder = MessageResponseBuilder::from_message_request(request);
            let response = builder.error_msg(header, ResponseCode::Refused);
            return match response_handle.send_response(response).await {
                Ok(info) => info,
                Err(e) => {
                    warn!("Failed to send refusal: {}", e);
                    serve_failed()
                }
            };
        }

        let query = request.query();
        let records = self.answer_records(query.name(), query.query_type());

        debug!(
            "Query {} {} -> {} answers",
            query.name(),
            query.query_type(),
            records.len()
        );

        let builder = MessageResponseBuilder::from_message_request(request);
        let mut response_header = Header::response_from_request(header);
        response_header.set_authoritative(true);
        response_header.set_recursion_available(false);

        let response = builder.build(response_header, records.iter(), &[], &[], &[]);

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Failed to send DNS response: {}", e);
                serve_failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::normalize;

    fn handler_with(ipv4: &[&str], ipv6: &[&str]) -> SeedHandler {
        let directory = Arc::new(PeerDirectory::new());
        directory.publish(
            ipv4.iter().map(|s| normalize(s).unwrap()).collect(),
            ipv6.iter().map(|s| normalize(s).unwrap()).collect(),
        );
        let mut name = Name::from_utf8("seed.example.org").unwrap();
        name.set_fqdn(true);
        SeedHandler::new(name, directory)
    }

    fn lower(s: &str) -> LowerName {
        let mut name = Name::from_utf8(s).unwrap();
        name.set_fqdn(true);
        LowerName::new(&name)
    }

    #[test]
    fn test_a_records_for_seed_name() {
        let handler = handler_with(&["192.168.1.1"], &[]);
        let records = handler.answer_records(&lower("seed.example.org"), RecordType::A);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ttl(), ANSWER_TTL);
        assert_eq!(
            records[0].data(),
            Some(&RData::A(A("192.168.1.1".parse().unwrap())))
        );
    }

    #[test]
    fn test_aaaa_records_for_seed_name() {
        let handler = handler_with(&[], &["[2001:db8::1]"]);
        let records = handler.answer_records(&lower("seed.example.org"), RecordType::AAAA);

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].data(),
            Some(&RData::AAAA(AAAA("2001:db8::1".parse().unwrap())))
        );
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let handler = handler_with(&["192.168.1.1"], &[]);
        let records = handler.answer_records(&lower("SEED.Example.ORG"), RecordType::A);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_other_names_get_no_answers() {
        let handler = handler_with(&["192.168.1.1"], &["[::1]"]);
        assert!(handler
            .answer_records(&lower("other.example.org"), RecordType::A)
            .is_empty());
    }

    #[test]
    fn test_other_types_get_no_answers() {
        let handler = handler_with(&["192.168.1.1"], &["[::1]"]);
        assert!(handler
            .answer_records(&lower("seed.example.org"), RecordType::TXT)
            .is_empty());
    }

    #[test]
    fn test_full_peer_set_is_returned() {
        let handler = handler_with(&["10.0.0.1", "10.0.0.2", "10.0.0.3"], &[]);
        let records = handler.answer_records(&lower("seed.example.org"), RecordType::A);
        assert_eq!(records.len(), 3);
    }
}
