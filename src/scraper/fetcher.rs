use crate::config::ScraperConfig;
use crate::model::{DrawRequest, ScraperError};
use crate::scraper::traits::Scraper;

use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

pub struct ScraperImpl {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl ScraperImpl {
    pub fn new(cfg: &ScraperConfig) -> Result<Self, ScraperError> {
        let request_timeout = Duration::from_secs(cfg.request_timeout_seconds);
        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(request_timeout)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            request_timeout,
        })
    }

    pub fn build_url(&self, req: &DrawRequest) -> String {
        match req.round {
            Some(round) => format!("{}?method=byWin&drwNo={}", self.base_url, round),
            None => format!("{}?method=byWin", self.base_url),
        }
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, req: &DrawRequest) -> Result<String, ScraperError> {
        let url = self.build_url(req);
        debug!("GET {}", url);

        let response = match timeout(self.request_timeout, self.client.get(&url).send()).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) if e.is_timeout() => return Err(ScraperError::Timeout),
            Ok(Err(e)) => return Err(ScraperError::HttpError(e.to_string())),
            Err(_) => {
                warn!("⏳ Request timed out: {}", url);
                return Err(ScraperError::Timeout);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::InvalidResponse(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))
    }
}
