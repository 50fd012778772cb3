// Draw source: HTTP fetching, response caching and concurrent collection.

pub mod cache;
pub mod collector;
pub mod fetcher;
pub mod traits;

pub use cache::CachingScraper;
pub use collector::{collect_draws, fetch_latest_round};
pub use fetcher::ScraperImpl;
