//! Client for the AMap (高德) weather information API.
//!
//! This crate defines:
//! - [`WeatherClient`], which validates the query and issues a single GET
//! - The [`Transport`] abstraction, with a `reqwest` backed default and a stub for tests
//! - Response models, including typed decoding of the AMap JSON payload
//!
//! ```no_run
//! # async fn run() -> Result<(), amap_weather::WeatherError> {
//! use amap_weather::{TransportOptions, WeatherClient};
//!
//! let mut client = WeatherClient::new("your-amap-key");
//! client.set_transport_options(TransportOptions::new().with("timeout", 5));
//!
//! let weather = client.fetch_weather("深圳", "all", "json").await?.decode()?;
//! for forecast in &weather.forecasts {
//!     println!("{}: {} days", forecast.city, forecast.casts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{WEATHER_URL, WeatherClient};
pub use config::TransportOptions;
pub use error::{TransportError, WeatherError};
pub use model::{AmapWeather, Cast, Forecast, Format, Kind, Live, WeatherResponse};
pub use transport::{HttpTransport, StubTransport, Transport};
