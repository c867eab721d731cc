use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

use crate::{config::TransportOptions, error::TransportError};

use super::Transport;

/// A request seen by [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Fail { message: String, code: Option<u16> },
}

/// In-memory transport for tests: answers every request with a canned
/// body or failure and records what was asked.
#[derive(Debug)]
pub struct StubTransport {
    reply: Reply,
    options: TransportOptions,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self::from_reply(Reply::Body(body.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_reply(Reply::Fail {
            message: message.into(),
            code: None,
        })
    }

    pub fn failing_with_code(message: impl Into<String>, code: u16) -> Self {
        Self::from_reply(Reply::Fail {
            message: message.into(),
            code: Some(code),
        })
    }

    /// Options reported through [`Transport::config`].
    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().len()
    }

    fn from_reply(reply: Reply) -> Self {
        Self {
            reply,
            options: TransportOptions::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedRequest>> {
        // A panicking test thread must not hide the requests from the others.
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError> {
        self.lock().push(RecordedRequest {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });

        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Fail { message, code } => {
                let err = TransportError::new(message.clone());
                Err(match code {
                    Some(code) => err.with_code(*code),
                    None => err,
                })
            }
        }
    }

    fn config(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requests_and_returns_body() {
        let stub = StubTransport::with_body("ok");

        let body = stub.get("https://example.test/", &[("city", "北京")]).await.unwrap();
        assert_eq!(body, "ok");

        assert_eq!(
            stub.requests(),
            vec![RecordedRequest {
                url: "https://example.test/".into(),
                query: vec![("city".into(), "北京".into())],
            }]
        );
    }

    #[tokio::test]
    async fn failing_stub_still_records_the_attempt() {
        let stub = StubTransport::failing_with_code("bad gateway", 502);

        let err = stub.get("https://example.test/", &[]).await.unwrap_err();
        assert_eq!(err.message(), "bad gateway");
        assert_eq!(err.code(), Some(502));
        assert_eq!(stub.request_count(), 1);
    }
}
