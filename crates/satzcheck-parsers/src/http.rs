//! HTTP dependency parser backend.
//!
//! Talks to an external parsing service (typically a small sidecar wrapping
//! a German UD model) over a minimal JSON protocol: POST `/parse` with the
//! sentence text, receive the token annotations back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use satzcheck_core::error::ParserError;
use satzcheck_core::traits::{DependencyParser, RawParse, RawToken};

const DEFAULT_BASE_URL: &str = "http://localhost:8090";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parser backed by an external HTTP parsing service.
pub struct HttpParser {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpParser {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        }
    }
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ParseResponse {
    tokens: Vec<RawToken>,
}

#[async_trait]
impl DependencyParser for HttpParser {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, text), fields(base_url = %self.base_url))]
    async fn parse(&self, text: &str) -> Result<RawParse, ParserError> {
        let response = self
            .client
            .post(format!("{}/parse", self.base_url))
            .json(&ParseRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ParserError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ParserError::Network(format!(
                        "parser service not reachable at {}",
                        self.base_url
                    ))
                } else {
                    ParserError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ParserError::Service { status, message });
        }

        let parsed: ParseResponse = response
            .json()
            .await
            .map_err(|e| ParserError::Malformed(format!("failed to decode response: {e}")))?;

        if parsed.tokens.is_empty() {
            return Err(ParserError::EmptyParse);
        }

        Ok(RawParse {
            tokens: parsed.tokens,
        })
    }
}
