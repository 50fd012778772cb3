use crate::model::{DrawRequest, ScraperError};

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the raw HTML of the result page for `req`.
    async fn fetch(&self, req: &DrawRequest) -> Result<String, ScraperError>;
}
