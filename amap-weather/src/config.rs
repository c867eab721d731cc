use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransportError;

/// Options handed to the HTTP transport, keyed by name.
///
/// Values are kept verbatim. The default transport understands the
/// keys below and ignores everything else:
///
/// ```toml
/// timeout = 5            # seconds, integer or float
/// connect_timeout = 1.5  # seconds
/// proxy = "http://127.0.0.1:8080"
/// verify = true
/// http_errors = true
///
/// [headers]
/// User-Agent = "my-app/1.0"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportOptions {
    values: Map<String, Value>,
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Total request timeout. `None` leaves the transport default in place.
    pub fn timeout(&self) -> Result<Option<Duration>, TransportError> {
        self.seconds("timeout")
    }

    pub fn connect_timeout(&self) -> Result<Option<Duration>, TransportError> {
        self.seconds("connect_timeout")
    }

    pub fn proxy(&self) -> Result<Option<&str>, TransportError> {
        match self.values.get("proxy") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(invalid("proxy", "a URL string", other)),
        }
    }

    pub fn headers(&self) -> Result<HashMap<String, String>, TransportError> {
        match self.values.get("headers") {
            None | Some(Value::Null) => Ok(HashMap::new()),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, value)| match value {
                    Value::String(s) => Ok((name.clone(), s.clone())),
                    Value::Number(n) => Ok((name.clone(), n.to_string())),
                    other => Err(invalid(&format!("headers.{name}"), "a string", other)),
                })
                .collect(),
            Some(other) => Err(invalid("headers", "an object of strings", other)),
        }
    }

    /// TLS certificate verification, on unless explicitly disabled.
    pub fn verify(&self) -> Result<bool, TransportError> {
        self.flag("verify", true)
    }

    /// Whether a non-2xx status is treated as a failure.
    pub fn http_errors(&self) -> Result<bool, TransportError> {
        self.flag("http_errors", true)
    }

    fn seconds(&self, key: &str) -> Result<Option<Duration>, TransportError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_f64() {
                // 0 means wait indefinitely.
                Some(secs) if secs == 0.0 => Ok(None),
                Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs)
                    .map(Some)
                    .map_err(|_| {
                        let got = Value::Number(n.clone());
                        invalid(key, "a representable number of seconds", &got)
                    }),
                _ => {
                    let got = Value::Number(n.clone());
                    Err(invalid(key, "a non-negative number of seconds", &got))
                }
            },
            Some(other) => Err(invalid(key, "a number of seconds", other)),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, TransportError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }
}

impl From<Map<String, Value>> for TransportOptions {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TransportOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn invalid(key: &str, expected: &str, got: &Value) -> TransportError {
    TransportError::new(format!(
        "Invalid transport option `{key}`: expected {expected}, got {got}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_options_fall_back_to_transport_defaults() {
        let opts = TransportOptions::new();

        assert!(opts.is_empty());
        assert_eq!(opts.timeout().unwrap(), None);
        assert_eq!(opts.connect_timeout().unwrap(), None);
        assert_eq!(opts.proxy().unwrap(), None);
        assert!(opts.headers().unwrap().is_empty());
        assert!(opts.verify().unwrap());
        assert!(opts.http_errors().unwrap());
    }

    #[test]
    fn timeout_accepts_integer_and_float_seconds() {
        let opts = TransportOptions::new()
            .with("timeout", 5000)
            .with("connect_timeout", 1.5);

        assert_eq!(opts.get("timeout"), Some(&json!(5000)));
        assert_eq!(opts.timeout().unwrap(), Some(Duration::from_secs(5000)));
        assert_eq!(opts.connect_timeout().unwrap(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_timeout_means_no_limit() {
        let opts = TransportOptions::new().with("timeout", 0);
        assert_eq!(opts.timeout().unwrap(), None);
    }

    #[test]
    fn malformed_known_option_is_an_error() {
        let opts = TransportOptions::new().with("timeout", "soon").with("verify", "yes");

        let err = opts.timeout().unwrap_err();
        assert!(err.message().contains("Invalid transport option `timeout`"));

        let err = opts.verify().unwrap_err();
        assert!(err.message().contains("expected a boolean"));
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let opts = TransportOptions::new().with("timeout", -1);
        assert!(opts.timeout().is_err());
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        let opts = TransportOptions::new()
            .with("timeout", 1e20)
            .with("connect_timeout", 1e300);

        let err = opts.timeout().unwrap_err();
        assert!(err.message().contains("a representable number of seconds"));
        assert!(opts.connect_timeout().is_err());
    }

    #[test]
    fn unknown_keys_are_kept_verbatim() {
        let opts: TransportOptions = [
            ("allow_redirects", json!(false)),
            ("debug", json!({"level": 2})),
        ]
        .into_iter()
        .collect();

        assert_eq!(opts.get("allow_redirects"), Some(&json!(false)));
        assert_eq!(opts.get("debug"), Some(&json!({"level": 2})));
        assert_eq!(opts.iter().count(), 2);
    }

    #[test]
    fn headers_are_read_as_strings() {
        let opts = TransportOptions::new()
            .with("headers", json!({"User-Agent": "amap-weather", "X-Retry": 3}));

        let headers = opts.headers().unwrap();
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some("amap-weather"));
        assert_eq!(headers.get("X-Retry").map(String::as_str), Some("3"));

        let bad = TransportOptions::new().with("headers", json!(["nope"]));
        assert!(bad.headers().is_err());
    }

    #[test]
    fn deserializes_from_a_plain_json_object() {
        let opts: TransportOptions =
            serde_json::from_str(r#"{"timeout": 2.5, "proxy": "http://127.0.0.1:3128"}"#).unwrap();

        assert_eq!(opts.timeout().unwrap(), Some(Duration::from_millis(2500)));
        assert_eq!(opts.proxy().unwrap(), Some("http://127.0.0.1:3128"));
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"timeout": 2.5, "proxy": "http://127.0.0.1:3128"})
        );
    }
}
