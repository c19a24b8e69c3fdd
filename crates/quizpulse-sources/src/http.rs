//! HTTP data source: one GET per payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use quizpulse_core::traits::DataSource;

use crate::error::{from_reqwest, FetchError, PayloadKind};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The three endpoints to fetch from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpEndpoints {
    pub quiz_url: String,
    pub submission_url: String,
    pub history_url: String,
}

/// Fetches payloads over HTTP(S). Each payload is requested once; there is
/// no retry.
pub struct HttpSource {
    endpoints: HttpEndpoints,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(endpoints: HttpEndpoints, timeout_secs: u64) -> Self {
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            endpoints,
            timeout_secs,
            client,
        }
    }

    fn url_for(&self, kind: PayloadKind) -> &str {
        match kind {
            PayloadKind::Quiz => &self.endpoints.quiz_url,
            PayloadKind::Submission => &self.endpoints.submission_url,
            PayloadKind::History => &self.endpoints.history_url,
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(url = %self.url_for(kind)))]
    async fn fetch(&self, kind: PayloadKind) -> Result<Value, FetchError> {
        let url = self.url_for(kind);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| from_reqwest(kind, e, self.timeout_secs))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                payload: kind,
                status,
                message: body,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| from_reqwest(kind, e, self.timeout_secs))?;

        tracing::debug!(payload = %kind, "fetched payload");
        Ok(value)
    }
}
