//! Mock data source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use quizpulse_core::traits::DataSource;

use crate::error::{FetchError, PayloadKind};

/// An in-memory source that serves fixed payloads.
///
/// Payloads that were never set, or that were marked as failing, produce a
/// network error.
pub struct MockSource {
    payloads: HashMap<PayloadKind, Value>,
    failures: HashMap<PayloadKind, String>,
    call_count: AtomicU32,
    requested: Mutex<Vec<PayloadKind>>,
}

impl MockSource {
    pub fn new(quiz: Value, submission: Value, history: Value) -> Self {
        let payloads = HashMap::from([
            (PayloadKind::Quiz, quiz),
            (PayloadKind::Submission, submission),
            (PayloadKind::History, history),
        ]);
        Self {
            payloads,
            failures: HashMap::new(),
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Make fetching `kind` fail with `message`.
    pub fn with_failure(mut self, kind: PayloadKind, message: &str) -> Self {
        self.failures.insert(kind, message.to_string());
        self
    }

    /// Number of fetches made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Payload kinds requested so far, in call order.
    pub fn requested(&self) -> Vec<PayloadKind> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, kind: PayloadKind) -> Result<Value, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requested.lock().unwrap().push(kind);

        if let Some(message) = self.failures.get(&kind) {
            return Err(FetchError::Network {
                payload: kind,
                message: message.clone(),
            });
        }

        self.payloads
            .get(&kind)
            .cloned()
            .ok_or_else(|| FetchError::Network {
                payload: kind,
                message: "no payload configured".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_configured_payloads() {
        let source = MockSource::new(json!({"quiz": {}}), json!({"response_map": {}}), json!([]));
        assert_eq!(
            source.fetch(PayloadKind::History).await.unwrap(),
            json!([])
        );
        assert_eq!(source.call_count(), 1);
        assert_eq!(source.requested(), vec![PayloadKind::History]);
    }

    #[tokio::test]
    async fn configured_failure() {
        let source = MockSource::new(json!({}), json!({}), json!([]))
            .with_failure(PayloadKind::Quiz, "boom");
        let err = source.fetch(PayloadKind::Quiz).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
