// Seeder - peer-directory core: normalize, store, refresh, answer
// Principle: the refresher writes, queries read, nobody waits

pub mod directory;
pub mod feed;
pub mod normalize;
pub mod refresh;
pub mod responder;

pub use directory::{PeerDirectory, PeerSnapshot};
pub use feed::{FeedError, HttpPeerFeed, PeerFeed, RawPeerEntry, FETCH_TIMEOUT_SECS};
pub use normalize::{normalize, PeerAddress};
pub use refresh::{refresh_once, RefreshService, REFRESH_INTERVAL_SECS};
pub use responder::respond;
