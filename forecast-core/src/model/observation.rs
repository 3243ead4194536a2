use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{
    codec::{self, CodecContext, ContextualDecode, ContextualEncode},
    error::ForecastError,
    temperature::Temperature,
};

/// One weather snapshot: a current reading, an hour, or a day.
///
/// Every field is optional because the service omits whatever it has no
/// data for, and daily records carry fields hourly ones don't.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub time: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub icon: Option<String>,
    pub nearest_storm_distance: Option<f64>,
    pub precip_intensity: Option<f64>,
    pub precip_probability: Option<f64>,
    pub precip_type: Option<String>,
    pub temperature: Option<Temperature>,
    pub apparent_temperature: Option<Temperature>,
    pub temperature_low: Option<Temperature>,
    pub temperature_low_time: Option<DateTime<Utc>>,
    pub temperature_high: Option<Temperature>,
    pub temperature_high_time: Option<DateTime<Utc>>,
    pub dew_point: Option<Temperature>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility: Option<f64>,
    pub ozone: Option<f64>,
}

/// Wire shape of [`Observation`] with temperatures and timestamps deferred.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StagedObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nearest_storm_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precip_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precip_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precip_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apparent_temperature: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature_low: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature_low_time: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature_high: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature_high_time: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dew_point: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_gust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_bearing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cloud_cover: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uv_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ozone: Option<f64>,
}

impl ContextualDecode for Observation {
    fn decode_with(raw: &RawValue, ctx: &CodecContext) -> Result<Self, ForecastError> {
        let staged: StagedObservation = codec::parse_staged(raw)?;

        Ok(Observation {
            time: codec::decode_field(staged.time.as_deref(), ctx, "time")?,
            summary: staged.summary,
            icon: staged.icon,
            nearest_storm_distance: staged.nearest_storm_distance,
            precip_intensity: staged.precip_intensity,
            precip_probability: staged.precip_probability,
            precip_type: staged.precip_type,
            temperature: codec::decode_field(staged.temperature.as_deref(), ctx, "temperature")?,
            apparent_temperature: codec::decode_field(
                staged.apparent_temperature.as_deref(),
                ctx,
                "apparentTemperature",
            )?,
            temperature_low: codec::decode_field(
                staged.temperature_low.as_deref(),
                ctx,
                "temperatureLow",
            )?,
            temperature_low_time: codec::decode_field(
                staged.temperature_low_time.as_deref(),
                ctx,
                "temperatureLowTime",
            )?,
            temperature_high: codec::decode_field(
                staged.temperature_high.as_deref(),
                ctx,
                "temperatureHigh",
            )?,
            temperature_high_time: codec::decode_field(
                staged.temperature_high_time.as_deref(),
                ctx,
                "temperatureHighTime",
            )?,
            dew_point: codec::decode_field(staged.dew_point.as_deref(), ctx, "dewPoint")?,
            humidity: staged.humidity,
            pressure: staged.pressure,
            wind_speed: staged.wind_speed,
            wind_gust: staged.wind_gust,
            wind_bearing: staged.wind_bearing,
            cloud_cover: staged.cloud_cover,
            uv_index: staged.uv_index,
            visibility: staged.visibility,
            ozone: staged.ozone,
        })
    }
}

impl ContextualEncode for Observation {
    fn encode_with(&self, ctx: &CodecContext) -> Result<Box<RawValue>, ForecastError> {
        let staged = StagedObservation {
            time: codec::encode_field(self.time.as_ref(), ctx)?,
            summary: self.summary.clone(),
            icon: self.icon.clone(),
            nearest_storm_distance: self.nearest_storm_distance,
            precip_intensity: self.precip_intensity,
            precip_probability: self.precip_probability,
            precip_type: self.precip_type.clone(),
            temperature: codec::encode_field(self.temperature.as_ref(), ctx)?,
            apparent_temperature: codec::encode_field(self.apparent_temperature.as_ref(), ctx)?,
            temperature_low: codec::encode_field(self.temperature_low.as_ref(), ctx)?,
            temperature_low_time: codec::encode_field(self.temperature_low_time.as_ref(), ctx)?,
            temperature_high: codec::encode_field(self.temperature_high.as_ref(), ctx)?,
            temperature_high_time: codec::encode_field(self.temperature_high_time.as_ref(), ctx)?,
            dew_point: codec::encode_field(self.dew_point.as_ref(), ctx)?,
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.wind_speed,
            wind_gust: self.wind_gust,
            wind_bearing: self.wind_bearing,
            cloud_cover: self.cloud_cover,
            uv_index: self.uv_index,
            visibility: self.visibility,
            ozone: self.ozone,
        };

        codec::to_raw(&staged)
    }
}
