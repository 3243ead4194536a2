use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{
    codec::{self, CodecContext, ContextualDecode, ContextualEncode},
    error::ForecastError,
};

const KELVIN_OFFSET: f64 = 273.15;

/// Unit a temperature scalar is expressed in on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "kelvin",
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Kelvin, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    /// Temperature unit implied by a document's `flags.units` selector.
    ///
    /// Only `"us"` is Fahrenheit based; every other selector, including the
    /// empty string, is Celsius based.
    pub fn for_unit_system(selector: &str) -> Self {
        match selector {
            "us" => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::Celsius,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = ForecastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(ForecastError::UnknownUnit(value.to_string())),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureUnit::try_from(s)
    }
}

/// A temperature, stored in Kelvin whatever unit it arrived in.
///
/// The default value is 0 K. It is only what a missing record decodes to;
/// model fields use `Option<Temperature>` to express absence.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Temperature(f64);

impl Temperature {
    pub const fn from_kelvin(kelvin: f64) -> Self {
        Self(kelvin)
    }

    pub fn from_celsius(celsius: f64) -> Self {
        Self(celsius + KELVIN_OFFSET)
    }

    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Self((fahrenheit - 32.) * 5. / 9. + KELVIN_OFFSET)
    }

    pub fn from_unit(value: f64, unit: TemperatureUnit) -> Self {
        match unit {
            TemperatureUnit::Kelvin => Self::from_kelvin(value),
            TemperatureUnit::Celsius => Self::from_celsius(value),
            TemperatureUnit::Fahrenheit => Self::from_fahrenheit(value),
        }
    }

    pub const fn kelvin(&self) -> f64 {
        self.0
    }

    pub fn celsius(&self) -> f64 {
        self.0 - KELVIN_OFFSET
    }

    pub fn fahrenheit(&self) -> f64 {
        (self.0 - KELVIN_OFFSET) * 9. / 5. + 32.
    }

    pub fn in_unit(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Kelvin => self.kelvin(),
            TemperatureUnit::Celsius => self.celsius(),
            TemperatureUnit::Fahrenheit => self.fahrenheit(),
        }
    }

    /// Convert a wire scalar given a unit token. A missing token is read as
    /// Celsius; an unrecognized one is an error.
    pub fn from_wire(value: f64, unit: Option<&str>) -> Result<Self, ForecastError> {
        let unit = unit.map(TemperatureUnit::try_from).transpose()?;
        Ok(Self::from_unit(value, unit.unwrap_or(codec::FALLBACK_TEMPERATURE_UNIT)))
    }

    /// Mirror of [`Temperature::from_wire`].
    pub fn to_wire(&self, unit: Option<&str>) -> Result<f64, ForecastError> {
        let unit = unit.map(TemperatureUnit::try_from).transpose()?;
        Ok(self.in_unit(unit.unwrap_or(codec::FALLBACK_TEMPERATURE_UNIT)))
    }

    pub fn format_in(&self, unit: TemperatureUnit) -> String {
        format!("{:.1}{}", self.in_unit(unit), unit.symbol())
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_in(TemperatureUnit::Fahrenheit))
    }
}

impl ContextualDecode for Temperature {
    fn decode_with(raw: &RawValue, ctx: &CodecContext) -> Result<Self, ForecastError> {
        let value: f64 = codec::parse_staged(raw)?;
        Ok(Self::from_unit(value, ctx.effective_temperature_unit()))
    }
}

impl ContextualEncode for Temperature {
    fn encode_with(&self, ctx: &CodecContext) -> Result<Box<RawValue>, ForecastError> {
        codec::to_raw(&self.in_unit(ctx.effective_temperature_unit()))
    }
}

// Context-free path: a bare scalar outside any document is Celsius.
impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Temperature::from_celsius)
    }
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.celsius())
    }
}
