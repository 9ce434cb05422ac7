use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::api::resilience::{retry_with_backoff, RetryConfig};
use crate::config::ApiSettings;
use crate::models::{BridgeResponse, PlayerKey, Result};

/// Source of per-player ranking data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankSource: Send + Sync {
    /// Fetch the raw feed for one player.
    async fn fetch(&self, player: &PlayerKey) -> Result<BridgeResponse>;
}

/// HTTP client for the mozambiquehe.re bridge endpoint.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl BridgeClient {
    pub fn new(api: &ApiSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: api.base_url.clone(),
            api_key: api.api_key.clone(),
            retry: RetryConfig::from(api),
        })
    }

    fn request(&self, player: &PlayerKey) -> reqwest::RequestBuilder {
        self.http.get(&self.base_url).query(&[
            ("auth", self.api_key.as_str()),
            ("player", player.nickname.as_str()),
            ("platform", player.platform.as_str()),
        ])
    }

    async fn fetch_once(&self, player: &PlayerKey) -> Result<BridgeResponse> {
        let response = self.request(player).send().await?.error_for_status()?;
        let body = response.json::<BridgeResponse>().await?;
        debug!("Fetched bridge data for {}", player);
        Ok(body)
    }
}

#[async_trait]
impl RankSource for BridgeClient {
    async fn fetch(&self, player: &PlayerKey) -> Result<BridgeResponse> {
        let operation = format!("fetch {}", player);
        retry_with_backoff(&self.retry, &operation, || self.fetch_once(player)).await
    }
}
