//! forge::mock
//!
//! Mock transport for deterministic testing.
//!
//! # Design
//!
//! The mock answers from a queue of canned results and records every call
//! it receives. Once the queue is drained it keeps answering with the
//! fallback response, if one was set.
//!
//! # Example
//!
//! ```
//! use forgestate::forge::mock::MockTransport;
//! use forgestate::forge::{QueryDocument, Transport};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::responding(json!({ "data": { "project": null } }));
//!
//! let doc = QueryDocument::new("query { a }", json!({}));
//! let raw = transport.query("https://gitlab.com/api/graphql", "T", &doc).await.unwrap();
//! assert_eq!(raw["data"]["project"], serde_json::Value::Null);
//!
//! assert_eq!(transport.calls()[0].token, "T");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::traits::{ForgeError, QueryDocument, Transport};

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    /// Results handed out in order.
    queued: VecDeque<Result<serde_json::Value, ForgeError>>,
    /// Answer once the queue is empty.
    fallback: Option<serde_json::Value>,
    /// Recorded calls for verification.
    calls: Vec<RecordedCall>,
}

/// One call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub token: String,
    pub document: QueryDocument,
}

impl MockTransport {
    /// Create a mock with no canned results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always answers with `body`.
    pub fn responding(body: serde_json::Value) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().fallback = Some(body);
        mock
    }

    /// Queue a successful response.
    pub fn then_respond(self, body: serde_json::Value) -> Self {
        self.inner.lock().unwrap().queued.push_back(Ok(body));
        self
    }

    /// Queue a failure.
    pub fn then_fail(self, error: ForgeError) -> Self {
        self.inner.lock().unwrap().queued.push_back(Err(error));
        self
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn query(
        &self,
        endpoint: &str,
        token: &str,
        document: &QueryDocument,
    ) -> Result<serde_json::Value, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            document: document.clone(),
        });

        if let Some(result) = inner.queued.pop_front() {
            return result;
        }
        inner
            .fallback
            .clone()
            .ok_or_else(|| ForgeError::Transport("mock transport has no response queued".into()))
    }
}
