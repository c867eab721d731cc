use std::sync::Arc;

use tracing::debug;

use crate::{
    config::TransportOptions,
    error::WeatherError,
    model::{Format, Kind, WeatherResponse},
    transport::{HttpTransport, Transport},
};

/// AMap weather information endpoint.
pub const WEATHER_URL: &str = "https://restapi.amap.com/v3/weather/weatherInfo";

/// Client for the AMap weather API, bound to a single API key.
///
/// The client keeps no per-call state, so one instance can serve any number
/// of requests, including concurrent ones through a shared reference.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    transport_options: TransportOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            transport_options: TransportOptions::default(),
            transport: None,
        }
    }

    /// Build a client that sends every request through `transport`.
    pub fn with_transport(api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let mut client = Self::new(api_key);
        client.set_transport(transport);
        client
    }

    /// Route requests through `transport` instead of a fresh [`HttpTransport`].
    /// Transport options no longer apply once a transport is injected.
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = Some(transport);
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Replace the transport options wholesale. Takes effect on the next
    /// [`transport`](Self::transport) call.
    pub fn set_transport_options(&mut self, options: TransportOptions) {
        self.transport_options = options;
    }

    /// Transport used for the next request: the injected one if present,
    /// otherwise an [`HttpTransport`] built from the current options.
    pub fn transport(&self) -> Arc<dyn Transport> {
        match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(HttpTransport::new(self.transport_options.clone())),
        }
    }

    /// Fetch weather for `city`.
    ///
    /// `kind` is `base` or `all`, `format` is `json` or `xml`, both matched
    /// case-insensitively. The format is validated first. Only an exact
    /// lowercase `"json"` has its body parsed; any other accepted spelling
    /// returns the raw text.
    pub async fn fetch_weather(
        &self,
        city: &str,
        kind: &str,
        format: &str,
    ) -> Result<WeatherResponse, WeatherError> {
        let parsed_format = Format::try_from(format)?;
        let kind = Kind::try_from(kind)?;

        let body = self.fetch_body(city, kind, parsed_format).await?;
        into_response(body, format == Format::Json.as_str())
    }

    /// Typed counterpart of [`fetch_weather`](Self::fetch_weather).
    pub async fn fetch(
        &self,
        city: &str,
        kind: Kind,
        format: Format,
    ) -> Result<WeatherResponse, WeatherError> {
        let body = self.fetch_body(city, kind, format).await?;
        into_response(body, format == Format::Json)
    }

    /// Live conditions for `city` (`extension=base`).
    pub async fn live_weather(
        &self,
        city: &str,
        format: &str,
    ) -> Result<WeatherResponse, WeatherError> {
        self.fetch_weather(city, "base", format).await
    }

    /// Live conditions plus the multi-day forecast for `city` (`extension=all`).
    pub async fn forecasts_weather(
        &self,
        city: &str,
        format: &str,
    ) -> Result<WeatherResponse, WeatherError> {
        self.fetch_weather(city, "all", format).await
    }

    async fn fetch_body(
        &self,
        city: &str,
        kind: Kind,
        format: Format,
    ) -> Result<String, WeatherError> {
        debug!(city, %kind, %format, "fetching weather");

        let query = build_query(&self.api_key, city, kind, format);
        Ok(self.transport().get(WEATHER_URL, &query).await?)
    }
}

fn into_response(body: String, parse_json: bool) -> Result<WeatherResponse, WeatherError> {
    if parse_json {
        Ok(WeatherResponse::Json(serde_json::from_str(&body)?))
    } else {
        Ok(WeatherResponse::Text(body))
    }
}

/// Query parameters for one request. Empty values are left out.
fn build_query<'a>(
    api_key: &'a str,
    city: &'a str,
    kind: Kind,
    format: Format,
) -> Vec<(&'a str, &'a str)> {
    [
        ("key", api_key),
        ("city", city),
        ("format", format.as_str()),
        ("extension", kind.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect()
}
