use chrono::{DateTime, FixedOffset, Offset, Utc};
use forecast_core::{Forecast, Observation, ObservationGroup, Temperature, TemperatureUnit};

const HOURS_SHOWN: usize = 12;

/// Human-readable outline of a forecast, temperatures in the document's own unit.
pub fn outline(forecast: &Forecast) -> String {
    let unit = forecast.temperature_unit();
    let tz = local_offset(forecast.offset);

    let mut lines = vec![format!(
        "{} ({:.4}, {:.4})",
        if forecast.timezone.is_empty() { "Unknown timezone" } else { forecast.timezone.as_str() },
        forecast.latitude,
        forecast.longitude
    )];

    if let Some(current) = &forecast.currently {
        lines.push(String::new());
        lines.push(format!("Now: {}", describe_current(current, unit)));
    }

    if let Some(hourly) = &forecast.hourly {
        lines.push(String::new());
        lines.push(heading("Next hours", hourly));
        for obs in hourly.data.iter().take(HOURS_SHOWN) {
            lines.push(format!(
                "  {}  {:>8}  {}",
                local_time(obs.time, tz, "%a %H:%M"),
                temperature(obs.temperature, unit),
                obs.summary.as_deref().unwrap_or("")
            ));
        }
    }

    if let Some(daily) = &forecast.daily {
        lines.push(String::new());
        lines.push(heading("Daily", daily));
        for obs in &daily.data {
            lines.push(format!(
                "  {}  {:>8} / {:>8}  {}",
                local_time(obs.time, tz, "%a %d %b"),
                temperature(obs.temperature_high, unit),
                temperature(obs.temperature_low, unit),
                obs.summary.as_deref().unwrap_or("")
            ));
        }
    }

    lines.join("\n")
}

fn describe_current(obs: &Observation, unit: TemperatureUnit) -> String {
    let mut parts = vec![temperature(obs.temperature, unit)];

    if let Some(feels) = obs.apparent_temperature {
        parts.push(format!("feels like {}", feels.format_in(unit)));
    }
    if let Some(summary) = &obs.summary {
        parts.push(summary.clone());
    }
    if let Some(humidity) = obs.humidity {
        parts.push(format!("humidity {:.0}%", humidity * 100.));
    }
    if let Some(p) = obs.precip_probability.filter(|p| *p > 0.) {
        let kind = obs.precip_type.as_deref().unwrap_or("precipitation");
        parts.push(format!("{:.0}% chance of {kind}", p * 100.));
    }

    parts.join(", ")
}

fn heading(title: &str, group: &ObservationGroup) -> String {
    match &group.summary {
        Some(summary) => format!("{title}: {summary}"),
        None => format!("{title}:"),
    }
}

fn temperature(value: Option<Temperature>, unit: TemperatureUnit) -> String {
    value.map(|t| t.format_in(unit)).unwrap_or_else(|| "--".to_string())
}

fn local_offset(hours: f64) -> FixedOffset {
    FixedOffset::east_opt((hours * 3600.).round() as i32).unwrap_or_else(|| Utc.fix())
}

fn local_time(time: Option<DateTime<Utc>>, tz: FixedOffset, format: &str) -> String {
    time.map(|t| t.with_timezone(&tz).format(format).to_string())
        .unwrap_or_else(|| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forecast {
        Forecast::from_json_str(
            r#"{
                "latitude": 41.8781, "longitude": -87.6298,
                "timezone": "America/Chicago", "offset": -6,
                "flags": {"units": "us"},
                "currently": {"time": 1509993277, "temperature": 72, "summary": "Clear",
                              "humidity": 0.5, "precipProbability": 0.3, "precipType": "rain"},
                "daily": {"summary": "Dry week.", "data": [
                    {"time": 1509944400, "temperatureHigh": 80, "temperatureLow": 60, "summary": "Sunny"}
                ]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn outline_uses_document_unit() {
        let text = outline(&sample());

        assert!(text.starts_with("America/Chicago (41.8781, -87.6298)"));
        assert!(text.contains("Now: 72.0°F, Clear, humidity 50%, 30% chance of rain"));
        assert!(text.contains("Daily: Dry week."));
        assert!(text.contains("80.0°F"));
        assert!(text.contains("60.0°F"));
        assert!(!text.contains("Next hours"));
    }

    #[test]
    fn missing_temperature_is_dashed() {
        assert_eq!(temperature(None, TemperatureUnit::Celsius), "--");
    }

    #[test]
    fn local_time_applies_offset() {
        let t = DateTime::from_timestamp(0, 0);
        assert_eq!(local_time(t, local_offset(-6.), "%H:%M"), "18:00");
        assert_eq!(local_time(t, local_offset(5.5), "%H:%M"), "05:30");
    }
}
