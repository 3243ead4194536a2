//! Context-aware JSON codec.
//!
//! Temperature scalars in a forecast document are bare numbers whose unit is
//! selected once, at the document root, by `flags.units`. The root derives a
//! [`CodecContext`] from that selector and hands it to every nested decoder
//! and encoder. Nested types never look at the root themselves.
//!
//! Each nested type decodes in two stages. First the JSON is parsed into a
//! staging struct in which every context-dependent field is kept as an
//! uninterpreted [`RawValue`]; then each raw field is decoded with the
//! context. Encoding runs the same way in reverse: context-dependent fields
//! are encoded to raw fragments first and spliced into the staging struct,
//! which is then serialized as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::{error::ForecastError, temperature::TemperatureUnit};

/// Unit assumed for temperature scalars when no context selected one.
pub const FALLBACK_TEMPERATURE_UNIT: TemperatureUnit = TemperatureUnit::Celsius;

/// Read-only settings shared by every decode/encode call below a document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecContext {
    temperature_unit: Option<TemperatureUnit>,
}

impl CodecContext {
    /// A context that selects nothing; temperatures use the Celsius fallback.
    pub const fn new() -> Self {
        Self { temperature_unit: None }
    }

    pub const fn with_temperature_unit(unit: TemperatureUnit) -> Self {
        Self { temperature_unit: Some(unit) }
    }

    /// Build a context from a unit token such as `"fahrenheit"`.
    pub fn with_unit_token(token: &str) -> Result<Self, ForecastError> {
        TemperatureUnit::try_from(token).map(Self::with_temperature_unit)
    }

    /// Context for a document whose `flags.units` is `selector`.
    pub fn for_unit_system(selector: &str) -> Self {
        Self::with_temperature_unit(TemperatureUnit::for_unit_system(selector))
    }

    pub const fn temperature_unit(&self) -> Option<TemperatureUnit> {
        self.temperature_unit
    }

    pub fn effective_temperature_unit(&self) -> TemperatureUnit {
        self.temperature_unit.unwrap_or(FALLBACK_TEMPERATURE_UNIT)
    }
}

/// Decode a value whose interpretation depends on the enclosing document.
pub trait ContextualDecode: Sized {
    fn decode_with(raw: &RawValue, ctx: &CodecContext) -> Result<Self, ForecastError>;
}

/// Encode a value into a raw JSON fragment according to the enclosing document.
pub trait ContextualEncode {
    fn encode_with(&self, ctx: &CodecContext) -> Result<Box<RawValue>, ForecastError>;
}

// Timestamps are Unix seconds on the wire. They need no context but go
// through the same staged path as temperatures.
impl ContextualDecode for DateTime<Utc> {
    fn decode_with(raw: &RawValue, _ctx: &CodecContext) -> Result<Self, ForecastError> {
        let seconds: i64 = parse_staged(raw)?;
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| ForecastError::timestamp(seconds))
    }
}

impl ContextualEncode for DateTime<Utc> {
    fn encode_with(&self, _ctx: &CodecContext) -> Result<Box<RawValue>, ForecastError> {
        to_raw(&self.timestamp())
    }
}

/// Serde helper: an explicit `null` decodes like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// First stage: parse a raw fragment into its staging form.
pub(crate) fn parse_staged<'a, T: Deserialize<'a>>(raw: &'a RawValue) -> Result<T, ForecastError> {
    serde_json::from_str(raw.get()).map_err(ForecastError::malformed)
}

pub(crate) fn to_raw<T: Serialize + ?Sized>(value: &T) -> Result<Box<RawValue>, ForecastError> {
    serde_json::value::to_raw_value(value).map_err(ForecastError::Encode)
}

/// Second stage: resolve a deferred field, if it was present on the wire.
pub(crate) fn decode_field<T: ContextualDecode>(
    raw: Option<&RawValue>,
    ctx: &CodecContext,
    field: &str,
) -> Result<Option<T>, ForecastError> {
    raw.map(|raw| T::decode_with(raw, ctx).map_err(|e| e.within(field))).transpose()
}

pub(crate) fn encode_field<T: ContextualEncode>(
    value: Option<&T>,
    ctx: &CodecContext,
) -> Result<Option<Box<RawValue>>, ForecastError> {
    value.map(|v| v.encode_with(ctx)).transpose()
}
