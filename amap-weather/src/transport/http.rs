use async_trait::async_trait;
use reqwest::{
    Client, Proxy, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::fmt::Display;
use serde_json::Value;
use tracing::debug;

use crate::{config::TransportOptions, error::TransportError};

use super::Transport;

/// Default transport backed by `reqwest`.
///
/// Holds a snapshot of the options it was created with. A fresh
/// `reqwest::Client` is built for every request, so the connection is
/// released when the call returns.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    options: TransportOptions,
}

impl HttpTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn build_client(&self) -> Result<Client, TransportError> {
        let mut builder = Client::builder();

        if let Some(timeout) = self.options.timeout()? {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.options.connect_timeout()? {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy) = self.options.proxy()? {
            let proxy = Proxy::all(proxy).map_err(|e| {
                TransportError::new(format!("Invalid proxy `{proxy}`: {e}")).with_source(e)
            })?;
            builder = builder.proxy(proxy);
        }
        if !self.options.verify()? {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let headers = self.options.headers()?;
        if !headers.is_empty() {
            let mut map = HeaderMap::with_capacity(headers.len());
            for (name, value) in &headers {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    TransportError::new(format!("Invalid header name `{name}`: {e}")).with_source(e)
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    let msg = format!("Invalid value for header `{}`: {e}", name.as_str());
                    TransportError::new(msg).with_source(e)
                })?;
                map.insert(name, value);
            }
            builder = builder.default_headers(map);
        }

        builder.build().map_err(|e| {
            TransportError::new(format!("Failed to build HTTP client: {e}")).with_source(e)
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError> {
        let http = self.build_client()?;
        let http_errors = self.options.http_errors()?;

        debug!(url, params = query.len(), "sending GET");

        let res = http.get(url).query(query).send().await?;

        let status = res.status();
        if http_errors && !status.is_success() {
            return Err(status_error(url, status, res.text().await));
        }

        debug!(%status, "response received");

        Ok(res.text().await?)
    }

    fn config(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

fn status_error(
    url: &str,
    status: StatusCode,
    body: Result<String, impl Display>,
) -> TransportError {
    let body = match body {
        Ok(body) => truncate_body(&body),
        Err(e) => {
            debug!(error = %e, "failed to read error response body");
            "<body unavailable>".to_string()
        }
    };

    TransportError::new(format!("Request to {url} failed with status {status}: {body}"))
        .with_code(status.as_u16())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
