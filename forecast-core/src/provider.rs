use crate::{Config, ForecastError, model::Forecast, provider::darksky::DarkSkyService};
use async_trait::async_trait;
use std::fmt::{self, Debug};

pub mod darksky;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(ForecastError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn get_forecast(&self, coordinates: Coordinates) -> Result<Forecast, ForecastError>;
}

/// Construct the forecast provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let boxed: Box<dyn ForecastProvider> = Box::new(DarkSkyService::from_config(config)?);
    Ok(boxed)
}
