use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the forecast client can report.
///
/// Decode failures carry the dotted path of the field that failed, e.g.
/// `hourly.data[3].temperature`. Paths are assembled from the leaf outwards
/// as the error travels back up through the nested decoders.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("failed to reach forecast service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid status code from forecast service: {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed forecast data{}: {source}", at_path(.path))]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("timestamp out of range{}: {seconds}", at_path(.path))]
    Timestamp { path: String, seconds: i64 },

    #[error("unknown temperature unit: {0}")]
    UnknownUnit(String),

    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("failed to encode forecast data: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ForecastError {
    pub(crate) fn malformed(source: serde_json::Error) -> Self {
        Self::Malformed { path: String::new(), source }
    }

    pub(crate) fn timestamp(seconds: i64) -> Self {
        Self::Timestamp { path: String::new(), seconds }
    }

    /// Prefix the field path of a decode error with the enclosing field name.
    /// Errors that carry no path pass through unchanged.
    pub(crate) fn within(self, segment: &str) -> Self {
        match self {
            Self::Malformed { path, source } => {
                Self::Malformed { path: join_path(segment, &path), source }
            }
            Self::Timestamp { path, seconds } => {
                Self::Timestamp { path: join_path(segment, &path), seconds }
            }
            other => other,
        }
    }

    /// Field path of a decode error, if this error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Malformed { path, .. } | Self::Timestamp { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }
}

fn join_path(segment: &str, rest: &str) -> String {
    if rest.is_empty() {
        segment.to_string()
    } else {
        format!("{segment}.{rest}")
    }
}

fn at_path(path: &str) -> String {
    if path.is_empty() { String::new() } else { format!(" at `{path}`") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<f64>("\"warm\"").unwrap_err()
    }

    #[test]
    fn within_builds_dotted_path_from_leaf_outwards() {
        let err = ForecastError::malformed(json_error())
            .within("temperature")
            .within("data[3]")
            .within("hourly");

        assert_eq!(err.path(), Some("hourly.data[3].temperature"));
        assert!(err.to_string().contains("at `hourly.data[3].temperature`"));
    }

    #[test]
    fn within_leaves_pathless_errors_untouched() {
        let err = ForecastError::UnknownUnit("xyz".into()).within("currently");

        assert!(matches!(err, ForecastError::UnknownUnit(ref u) if u == "xyz"));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn malformed_without_path_has_no_location_suffix() {
        let err = ForecastError::malformed(json_error());
        assert!(err.to_string().starts_with("malformed forecast data: "));
    }

    #[test]
    fn timestamp_error_names_seconds() {
        let err = ForecastError::timestamp(i64::MAX).within("time");
        assert!(err.to_string().contains(&i64::MAX.to_string()));
        assert_eq!(err.path(), Some("time"));
    }
}
