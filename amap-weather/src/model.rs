use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WeatherError;

/// Response serialization requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Format {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            _ => Err(WeatherError::InvalidArgument(format!("Invalid response format: {value}"))),
        }
    }
}

/// Verbosity of the query: live conditions only, or live plus forecast.
///
/// Sent to the API as the `extension` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Base,
    All,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Base => "base",
            Kind::All => "all",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Kind {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "base" => Ok(Kind::Base),
            "all" => Ok(Kind::All),
            _ => Err(WeatherError::InvalidArgument(format!(
                "Invalid type value(base/all): {value}"
            ))),
        }
    }
}

/// Body returned by the weather endpoint: parsed JSON, or the raw text
/// for every other requested format.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResponse {
    Json(Value),
    Text(String),
}

impl WeatherResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            WeatherResponse::Json(v) => Some(v),
            WeatherResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            WeatherResponse::Text(s) => Some(s),
            WeatherResponse::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            WeatherResponse::Json(v) => Some(v),
            WeatherResponse::Text(_) => None,
        }
    }

    /// Decode a JSON response into the typed AMap payload.
    pub fn decode(&self) -> Result<AmapWeather, WeatherError> {
        match self {
            WeatherResponse::Json(v) => Ok(AmapWeather::deserialize(v)?),
            WeatherResponse::Text(_) => Err(WeatherError::NotJson),
        }
    }
}

/// Top-level AMap weather payload. Every scalar is sent as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmapWeather {
    pub status: String,
    #[serde(default)]
    pub count: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub infocode: String,
    #[serde(default)]
    pub lives: Vec<Live>,
    #[serde(default)]
    pub forecasts: Vec<Forecast>,
}

impl AmapWeather {
    /// AMap reports `status == "1"` on success; `info` explains failures.
    pub fn is_success(&self) -> bool {
        self.status == "1"
    }
}

/// Live conditions, returned for `extension=base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Live {
    pub province: String,
    pub city: String,
    pub adcode: String,
    pub weather: String,
    pub temperature: String,
    pub winddirection: String,
    pub windpower: String,
    pub humidity: String,
    pub reporttime: String,
}

impl Live {
    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature.trim().parse().ok()
    }

    pub fn humidity_pct(&self) -> Option<u8> {
        self.humidity.trim().parse().ok()
    }

    pub fn report_time(&self) -> Option<NaiveDateTime> {
        parse_report_time(&self.reporttime)
    }
}

/// Multi-day forecast, returned for `extension=all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub adcode: String,
    pub province: String,
    pub reporttime: String,
    #[serde(default)]
    pub casts: Vec<Cast>,
}

impl Forecast {
    pub fn report_time(&self) -> Option<NaiveDateTime> {
        parse_report_time(&self.reporttime)
    }
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub date: String,
    pub week: String,
    pub dayweather: String,
    pub nightweather: String,
    pub daytemp: String,
    pub nighttemp: String,
    pub daywind: String,
    pub nightwind: String,
    pub daypower: String,
    pub nightpower: String,
}

impl Cast {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

fn parse_report_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S").ok()
}
