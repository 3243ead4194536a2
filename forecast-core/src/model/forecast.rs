use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{
    codec::{self, CodecContext},
    error::ForecastError,
    model::{Observation, ObservationGroup},
    temperature::TemperatureUnit,
};

/// Metadata block of a forecast document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub sources: Vec<String>,
    #[serde(
        rename = "nearest-station",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nearest_station: Option<f64>,
    /// Unit-system selector, e.g. `"us"`, `"si"`, `"ca"`.
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub units: String,
}

impl Flags {
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::for_unit_system(&self.units)
    }

    pub fn codec_context(&self) -> CodecContext {
        CodecContext::for_unit_system(&self.units)
    }
}

/// Root of a forecast response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Hours from UTC. Some zones are offset by a fraction of an hour.
    pub offset: f64,
    pub flags: Flags,
    pub currently: Option<Observation>,
    pub minutely: Option<ObservationGroup>,
    pub hourly: Option<ObservationGroup>,
    pub daily: Option<ObservationGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StagedForecast {
    latitude: f64,
    longitude: f64,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    timezone: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    offset: f64,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    flags: Flags,
    #[serde(skip_serializing_if = "Option::is_none")]
    currently: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minutely: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hourly: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily: Option<Box<RawValue>>,
}

impl Forecast {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ForecastError> {
        let staged: StagedForecast =
            serde_json::from_slice(bytes).map_err(ForecastError::malformed)?;
        Self::from_staged(staged)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ForecastError> {
        Self::from_slice(json.as_bytes())
    }

    fn from_staged(staged: StagedForecast) -> Result<Self, ForecastError> {
        let ctx = staged.flags.codec_context();

        tracing::debug!(
            units = %staged.flags.units,
            temperature_unit = %ctx.effective_temperature_unit(),
            "decoding forecast document"
        );

        Ok(Forecast {
            latitude: staged.latitude,
            longitude: staged.longitude,
            timezone: staged.timezone,
            offset: staged.offset,
            currently: codec::decode_field(staged.currently.as_deref(), &ctx, "currently")?,
            minutely: codec::decode_field(staged.minutely.as_deref(), &ctx, "minutely")?,
            hourly: codec::decode_field(staged.hourly.as_deref(), &ctx, "hourly")?,
            daily: codec::decode_field(staged.daily.as_deref(), &ctx, "daily")?,
            flags: staged.flags,
        })
    }

    /// Context every nested temperature is encoded with. Derived from
    /// `flags.units` each time, never stored.
    pub fn codec_context(&self) -> CodecContext {
        self.flags.codec_context()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.flags.temperature_unit()
    }

    fn to_staged(&self) -> Result<StagedForecast, ForecastError> {
        let ctx = self.codec_context();

        Ok(StagedForecast {
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone.clone(),
            offset: self.offset,
            flags: self.flags.clone(),
            currently: codec::encode_field(self.currently.as_ref(), &ctx)?,
            minutely: codec::encode_field(self.minutely.as_ref(), &ctx)?,
            hourly: codec::encode_field(self.hourly.as_ref(), &ctx)?,
            daily: codec::encode_field(self.daily.as_ref(), &ctx)?,
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ForecastError> {
        serde_json::to_vec(&self.to_staged()?).map_err(ForecastError::Encode)
    }

    pub fn to_json_string(&self) -> Result<String, ForecastError> {
        serde_json::to_string(&self.to_staged()?).map_err(ForecastError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String, ForecastError> {
        // raw fragments are written verbatim, so go through a Value to re-indent them
        let value: serde_json::Value =
            serde_json::from_str(&self.to_json_string()?).map_err(ForecastError::Encode)?;
        serde_json::to_string_pretty(&value).map_err(ForecastError::Encode)
    }
}
