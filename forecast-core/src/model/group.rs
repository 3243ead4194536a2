use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{
    codec::{self, CodecContext, ContextualDecode, ContextualEncode},
    error::ForecastError,
    model::Observation,
};

/// A block of observations (minutely, hourly or daily) sharing a summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationGroup {
    pub summary: Option<String>,
    pub icon: Option<String>,
    /// In the order the service delivered them.
    pub data: Vec<Observation>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StagedGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    data: Vec<Option<Box<RawValue>>>,
}

impl ContextualDecode for ObservationGroup {
    fn decode_with(raw: &RawValue, ctx: &CodecContext) -> Result<Self, ForecastError> {
        let staged: StagedGroup = codec::parse_staged(raw)?;

        let data = staged
            .data
            .iter()
            .enumerate()
            .map(|(i, element)| match element {
                // a null entry stands for a record with nothing in it
                None => Ok(Observation::default()),
                Some(raw) => Observation::decode_with(raw, ctx)
                    .map_err(|e| e.within(&format!("data[{i}]"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(records = data.len(), "decoded observation group");

        Ok(ObservationGroup { summary: staged.summary, icon: staged.icon, data })
    }
}

impl ContextualEncode for ObservationGroup {
    fn encode_with(&self, ctx: &CodecContext) -> Result<Box<RawValue>, ForecastError> {
        let data = self
            .data
            .iter()
            .map(|obs| obs.encode_with(ctx).map(Some))
            .collect::<Result<Vec<_>, _>>()?;

        codec::to_raw(&StagedGroup { summary: self.summary.clone(), icon: self.icon.clone(), data })
    }
}

impl ObservationGroup {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temperature::{Temperature, TemperatureUnit};

    fn raw(s: &str) -> Box<RawValue> {
        RawValue::from_string(s.to_string()).unwrap()
    }

    fn celsius() -> CodecContext {
        CodecContext::with_temperature_unit(TemperatureUnit::Celsius)
    }

    const HOURLY: &str = r#"{
        "summary": "Light rain starting this evening.",
        "icon": "rain",
        "data": [
            {"time": 1509991200, "temperature": 14.2},
            {"time": 1509994800, "temperature": 13.9},
            {"time": 1509998400, "temperature": 12.5}
        ]
    }"#;

    #[test]
    fn preserves_order_and_length() {
        let group = ObservationGroup::decode_with(&raw(HOURLY), &celsius()).unwrap();

        assert_eq!(group.summary.as_deref(), Some("Light rain starting this evening."));
        assert_eq!(group.icon.as_deref(), Some("rain"));
        assert_eq!(group.len(), 3);

        let times: Vec<i64> =
            group.data.iter().filter_map(|o| o.time).map(|t| t.timestamp()).collect();
        assert_eq!(times, vec![1_509_991_200, 1_509_994_800, 1_509_998_400]);
        assert_eq!(group.data[2].temperature, Some(Temperature::from_celsius(12.5)));
    }

    #[test]
    fn null_element_decodes_to_empty_record() {
        let group = ObservationGroup::decode_with(
            &raw(r#"{"data": [{"temperature": 3}, null, {"temperature": 4}]}"#),
            &celsius(),
        )
        .unwrap();

        assert_eq!(group.len(), 3);
        assert_eq!(group.data[1], Observation::default());
        assert_eq!(group.data[2].temperature, Some(Temperature::from_celsius(4.)));
    }

    #[test]
    fn missing_data_is_empty() {
        let group = ObservationGroup::decode_with(&raw(r#"{"summary": "Clear."}"#), &celsius())
            .unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn null_data_is_empty() {
        let group = ObservationGroup::decode_with(
            &raw(r#"{"summary": "Clear.", "data": null}"#),
            &celsius(),
        )
        .unwrap();

        assert_eq!(group.summary.as_deref(), Some("Clear."));
        assert!(group.is_empty());
    }

    #[test]
    fn element_error_names_index() {
        let err = ObservationGroup::decode_with(
            &raw(r#"{"data": [{"temperature": 3}, {"temperature": "hot"}]}"#),
            &celsius(),
        )
        .unwrap_err();

        assert_eq!(err.path(), Some("data[1].temperature"));
    }

    #[test]
    fn encode_keeps_order_and_uses_context() {
        let group = ObservationGroup::decode_with(&raw(HOURLY), &celsius()).unwrap();
        let encoded = group.encode_with(&celsius()).unwrap();
        let value: serde_json::Value = serde_json::from_str(encoded.get()).unwrap();

        let temps: Vec<f64> = value["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["temperature"].as_f64().unwrap())
            .collect();
        assert_eq!(temps.len(), 3);
        for (got, want) in temps.iter().zip([14.2, 13.9, 12.5]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_group_encodes_empty_data_array() {
        let encoded = ObservationGroup::default().encode_with(&celsius()).unwrap();
        assert_eq!(encoded.get(), r#"{"data":[]}"#);
    }
}
