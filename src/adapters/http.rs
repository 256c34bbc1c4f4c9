use crate::core::DocumentFetcher;
use crate::utils::error::{GradeCalcError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://ac.utcluj.ro/planuri-de-invatamant.html";

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_attempts: 0,
            retry_delay: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: Some(DEFAULT_REFERER.to_string()),
        }
    }
}

/// Downloads curriculum documents over HTTP(S).
pub struct HttpFetcher {
    client: Client,
    settings: HttpSettings,
}

impl HttpFetcher {
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|e| GradeCalcError::config(format!("invalid user agent: {}", e)))?,
        );
        if let Some(referer) = &settings.referer {
            headers.insert(
                REFERER,
                HeaderValue::from_str(referer)
                    .map_err(|e| GradeCalcError::config(format!("invalid referer: {}", e)))?,
            );
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, settings })
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GradeCalcError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(GradeCalcError::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GradeCalcError::FetchFailed {
                url: url.to_string(),
                reason: format!("failed to read body: {}", e),
            })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            tracing::debug!("GET {} (attempt {})", url, attempt + 1);
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.settings.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Fetch failed: {}. Retrying in {:?} ({}/{})",
                        e,
                        self.settings.retry_delay,
                        attempt,
                        self.settings.retry_attempts
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
