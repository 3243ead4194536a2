//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The forecast data model, with temperatures held in Kelvin
//! - A context-aware JSON codec that applies the document's unit system to
//!   every nested temperature
//! - Configuration & credentials handling
//! - The HTTP provider that fetches forecast documents
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod temperature;

pub use codec::{CodecContext, ContextualDecode, ContextualEncode};
pub use config::{Config, ServiceConfig};
pub use error::ForecastError;
pub use model::{Flags, Forecast, Observation, ObservationGroup};
pub use provider::{Coordinates, ForecastProvider, darksky::DarkSkyService};
pub use temperature::{Temperature, TemperatureUnit};
