use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::TransportError;

pub mod http;
pub mod stub;

pub use http::HttpTransport;
pub use stub::{RecordedRequest, StubTransport};

/// Capability to issue a single GET request and hand back the body text.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError>;

    /// Option value this transport was built with, if any.
    fn config(&self, key: &str) -> Option<&Value>;
}
