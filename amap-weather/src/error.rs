use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised by a [`Transport`](crate::Transport) while performing a request.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    code: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status (or transport specific) code, if one was available.
    pub fn code(&self) -> Option<u16> {
        self.code
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| s.as_u16());
        let mut out = TransportError::new(err.to_string());
        out.code = code;
        out.with_source(err)
    }
}

/// Errors returned by [`WeatherClient`](crate::WeatherClient).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// `kind` or `format` was rejected before any request was made.
    #[error("{0}")]
    InvalidArgument(String),

    /// The transport failed. Displays as the transport's own message.
    #[error("{message}")]
    Http {
        message: String,
        code: Option<u16>,
        #[source]
        source: TransportError,
    },

    #[error("Failed to parse weather JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A raw text body was asked to decode as JSON.
    #[error("Response body was returned as raw text, request format json to decode it")]
    NotJson,
}

impl WeatherError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, WeatherError::InvalidArgument(_))
    }

    pub fn is_http(&self) -> bool {
        matches!(self, WeatherError::Http { .. })
    }

    /// Status code carried by an `Http` error.
    pub fn code(&self) -> Option<u16> {
        match self {
            WeatherError::Http { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<TransportError> for WeatherError {
    fn from(err: TransportError) -> Self {
        WeatherError::Http {
            message: err.message.clone(),
            code: err.code,
            source: err,
        }
    }
}
