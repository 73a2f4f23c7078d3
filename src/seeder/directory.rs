// Peer Directory - the shared peer-set snapshot
// Principle: single writer, many readers, no torn reads

use std::sync::{Arc, RwLock};

use super::normalize::PeerAddress;

/// An immutable view of the peer set as of the last successful refresh.
///
/// Both lists are deduplicated and sorted ascending by canonical form, so a
/// snapshot compares and serializes deterministically. A snapshot is never
/// mutated after construction; the directory replaces it wholesale.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PeerSnapshot {
    ipv4: Vec<PeerAddress>,
    ipv6: Vec<PeerAddress>,
}

impl PeerSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    fn new(mut ipv4: Vec<PeerAddress>, mut ipv6: Vec<PeerAddress>) -> Self {
        ipv4.sort_unstable();
        ipv4.dedup();
        ipv6.sort_unstable();
        ipv6.dedup();
        Self { ipv4, ipv6 }
    }

    pub fn ipv4(&self) -> &[PeerAddress] {
        &self.ipv4
    }

    pub fn ipv6(&self) -> &[PeerAddress] {
        &self.ipv6
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

/// Owner of the authoritative peer snapshot.
///
/// The refresher is the only writer; query handlers are read-only borrowers.
/// The lock is held only for the `Arc` swap on publish and the `Arc` clone
/// on read, never across I/O, so queries stay cheap regardless of refresh
/// frequency.
#[derive(Debug)]
pub struct PeerDirectory {
    current: RwLock<Arc<PeerSnapshot>>,
}

impl PeerDirectory {
    /// Create a directory holding the empty snapshot.
    ///
    /// The service must be able to answer (with empty sets) before the
    /// first refresh completes.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(PeerSnapshot::empty())),
        }
    }

    /// Deduplicate, sort, and atomically install a new snapshot.
    ///
    /// The candidate lists are expected to be pre-partitioned by family.
    pub fn publish(&self, ipv4: Vec<PeerAddress>, ipv6: Vec<PeerAddress>) {
        let snapshot = Arc::new(PeerSnapshot::new(ipv4, ipv6));
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = snapshot;
    }

    /// Current snapshot. Never fails, never blocks on I/O.
    pub fn snapshot(&self) -> Arc<PeerSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for PeerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::normalize::normalize;

    fn addr(s: &str) -> PeerAddress {
        normalize(s).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let directory = PeerDirectory::new();
        let snapshot = directory.snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.ipv4().is_empty());
        assert!(snapshot.ipv6().is_empty());
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let directory = PeerDirectory::new();
        directory.publish(vec![addr("192.168.1.1")], vec![]);
        assert_eq!(directory.snapshot().ipv4(), &[addr("192.168.1.1")]);

        directory.publish(vec![addr("10.0.0.1")], vec![]);
        assert_eq!(directory.snapshot().ipv4(), &[addr("10.0.0.1")]);
    }

    #[test]
    fn test_publish_deduplicates_and_sorts() {
        let directory = PeerDirectory::new();
        directory.publish(
            vec![addr("10.0.0.2"), addr("10.0.0.1"), addr("10.0.0.2")],
            vec![addr("[::2]"), addr("[::1]"), addr("[::1]")],
        );

        let snapshot = directory.snapshot();
        assert_eq!(snapshot.ipv4(), &[addr("10.0.0.1"), addr("10.0.0.2")]);
        assert_eq!(snapshot.ipv6(), &[addr("[::1]"), addr("[::2]")]);
    }

    #[test]
    fn test_publish_empty_is_not_an_error() {
        let directory = PeerDirectory::new();
        directory.publish(vec![addr("192.168.1.1")], vec![addr("[::1]")]);
        directory.publish(vec![], vec![]);
        assert!(directory.snapshot().is_empty());
    }

    #[test]
    fn test_old_snapshot_survives_publish() {
        // A reader holding a snapshot across a publish keeps a consistent view
        let directory = PeerDirectory::new();
        directory.publish(vec![addr("192.168.1.1")], vec![]);
        let held = directory.snapshot();

        directory.publish(vec![addr("10.0.0.1")], vec![]);
        assert_eq!(held.ipv4(), &[addr("192.168.1.1")]);
        assert_eq!(directory.snapshot().ipv4(), &[addr("10.0.0.1")]);
    }

    #[test]
    fn test_concurrent_publish_and_snapshot_no_torn_reads() {
        use std::sync::Arc;
        use std::thread;

        // Two internally-consistent pairings; a reader must only ever
        // observe one of them, never a mix.
        let pair_a = (vec![addr("1.1.1.1")], vec![addr("[2001:db8::a]")]);
        let pair_b = (vec![addr("2.2.2.2")], vec![addr("[2001:db8::b]")]);

        let directory = Arc::new(PeerDirectory::new());
        directory.publish(pair_a.0.clone(), pair_a.1.clone());

        let writer_dir = directory.clone();
        let (wa, wb) = (pair_a.clone(), pair_b.clone());
        let writer = thread::spawn(move || {
            for i in 0..2000 {
                if i % 2 == 0 {
                    writer_dir.publish(wb.0.clone(), wb.1.clone());
                } else {
                    writer_dir.publish(wa.0.clone(), wa.1.clone());
                }
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let dir = directory.clone();
                let (ra, rb) = (pair_a.clone(), pair_b.clone());
                thread::spawn(move || {
                    for _ in 0..2000 {
                        let snapshot = dir.snapshot();
                        let matches_a =
                            snapshot.ipv4() == ra.0.as_slice() && snapshot.ipv6() == ra.1.as_slice();
                        let matches_b =
                            snapshot.ipv4() == rb.0.as_slice() && snapshot.ipv6() == rb.1.as_slice();
                        assert!(matches_a || matches_b, "torn snapshot observed");
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
