use std::time::Duration;

use mediasearch_core::config::ResolverConfig;
use mediasearch_core::errors::{ConfigError, ResolverError};
use mediasearch_core::traits::{EntitySearchRequest, SearchTransport};

/// `SearchTransport` over HTTP using a shared `reqwest` client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ResolverConfig) -> Result<Self, ConfigError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "resolver".to_string(),
                reason: format!("http client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SearchTransport for HttpTransport {
    async fn fetch(&self, request: &EntitySearchRequest) -> Result<String, ResolverError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_params())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResolverError::Timeout {
                        term: request.term.clone(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    ResolverError::Transport {
                        term: request.term.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Status {
                term: request.term.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ResolverError::Transport {
            term: request.term.clone(),
            reason: e.to_string(),
        })
    }
}
