//! Cached access to the upstream feeds.
//!
//! Each API pairs a domain cache wrapper with a feed: the feed is only
//! called when the wrapper misses.

pub mod market;
pub mod news;

pub use market::MarketApi;
pub use news::NewsApi;
