use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::{Config, ServiceConfig},
    error::ForecastError,
    model::Forecast,
    provider::{Coordinates, ForecastProvider},
};

/// Client for the Dark Sky forecast endpoint.
#[derive(Debug, Clone)]
pub struct DarkSkyService {
    api_key: String,
    url_template: String,
    http: Client,
}

impl DarkSkyService {
    /// Service with the default URL template and a 30 second timeout.
    pub fn new(api_key: String) -> Result<Self, ForecastError> {
        Self::with_options(api_key, &ServiceConfig::default())
    }

    pub fn with_options(api_key: String, options: &ServiceConfig) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(options.timeout())
            .connect_timeout(options.timeout())
            .tcp_keepalive(options.keep_alive())
            .build()?;

        Ok(Self { api_key, url_template: options.url_template.clone(), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::with_options(api_key.to_owned(), &config.service)?)
    }

    /// Fill the URL template. Coordinates are written with six decimals.
    pub fn request_url(&self, coordinates: Coordinates) -> String {
        self.url_template
            .replace("{key}", &self.api_key)
            .replace("{latitude}", &format!("{:.6}", coordinates.latitude()))
            .replace("{longitude}", &format!("{:.6}", coordinates.longitude()))
    }

    /// Fetch the raw response body. Non-2xx responses are returned as
    /// [`ForecastError::Status`] and their body is never parsed.
    pub async fn fetch_body(&self, coordinates: Coordinates) -> Result<Vec<u8>, ForecastError> {
        tracing::debug!(
            latitude = coordinates.latitude(),
            longitude = coordinates.longitude(),
            "requesting forecast"
        );

        // the URL carries the API key, so it is stripped from every reqwest error
        let res = self
            .http
            .get(self.request_url(coordinates))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e.without_url(), "failed to read error response body");
                String::new()
            });
            tracing::warn!(%status, "forecast service returned an error status");
            return Err(ForecastError::Status { status, body: truncate_body(&body) });
        }

        let body = res.bytes().await.map_err(reqwest::Error::without_url)?;
        tracing::debug!(bytes = body.len(), "received forecast response");

        Ok(body.to_vec())
    }

    pub async fn get(&self, coordinates: Coordinates) -> Result<Forecast, ForecastError> {
        let body = self.fetch_body(coordinates).await?;
        Forecast::from_slice(&body)
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyService {
    async fn get_forecast(&self, coordinates: Coordinates) -> Result<Forecast, ForecastError> {
        self.get(coordinates).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_fills_template() {
        let service = DarkSkyService::new("KEY".into()).unwrap();
        let coords = Coordinates::new(41.8781, -87.6298).unwrap();

        assert_eq!(
            service.request_url(coords),
            "https://api.darksky.net/forecast/KEY/41.878100,-87.629800?exclude=minutely&units=us"
        );
    }

    #[test]
    fn custom_template() {
        let options = ServiceConfig {
            url_template: "http://localhost:8080/{latitude}/{longitude}?k={key}".into(),
            ..Default::default()
        };
        let service = DarkSkyService::with_options("abc".into(), &options).unwrap();
        let coords = Coordinates::new(0., 0.).unwrap();

        assert_eq!(service.request_url(coords), "http://localhost:8080/0.000000/0.000000?k=abc");
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = DarkSkyService::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "°".repeat(300);
        assert!(truncate_body(&body).ends_with("..."));
    }
}
