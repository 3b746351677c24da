use thiserror::Error;

/// Errors raised at the caller-facing boundary of the engine.
///
/// The rule tables themselves never fail: classification misses become
/// sentinel buckets and missing morph targets are skipped. Only input
/// validation, schema loading and (de)serialization produce a `BodyError`.
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("Measurement out of range: {slider} = {value} (expected {min}..={max})")]
    MeasurementOutOfRange { slider: String, value: f32, min: f32, max: f32 },

    #[error("Measurement not on a tick: {slider} = {value} (step {step} from {min})")]
    OffTick { slider: String, value: f32, min: f32, step: f32 },

    #[error("Unknown slider: {0}")]
    UnknownSlider(String),

    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Unknown weight class: {0}")]
    UnknownWeightClass(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchemaVersion { found: u8, expected: u8 },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BodyError {
    /// Name of the slider responsible for the error, when there is one.
    pub fn slider(&self) -> Option<&str> {
        match self {
            BodyError::MeasurementOutOfRange { slider, .. }
            | BodyError::OffTick { slider, .. } => Some(slider),
            BodyError::UnknownSlider(slider) => Some(slider),
            _ => None,
        }
    }

    /// Short machine-readable code used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            BodyError::MeasurementOutOfRange { .. } => "MEASUREMENT_OUT_OF_RANGE",
            BodyError::OffTick { .. } => "MEASUREMENT_OFF_TICK",
            BodyError::UnknownSlider(_) => "UNKNOWN_SLIDER",
            BodyError::UnknownGender(_) => "UNKNOWN_GENDER",
            BodyError::UnknownWeightClass(_) => "UNKNOWN_WEIGHT_CLASS",
            BodyError::UnsupportedSchemaVersion { .. } => "UNSUPPORTED_SCHEMA_VERSION",
            BodyError::Schema(_) => "SCHEMA_ERROR",
            BodyError::InvalidRequest(_) => "INVALID_REQUEST",
            BodyError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, BodyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_names_slider() {
        let err = BodyError::MeasurementOutOfRange {
            slider: "headSize".to_string(),
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(err.slider(), Some("headSize"));
        assert_eq!(err.code(), "MEASUREMENT_OUT_OF_RANGE");
        assert!(err.to_string().contains("headSize = 1.5"));
    }

    #[test]
    fn test_serialization_error_has_no_slider() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err = BodyError::from(parse.unwrap_err());
        assert_eq!(err.slider(), None);
        assert_eq!(err.code(), "SERIALIZATION_ERROR");
    }
}
