//! Body record persisted by the body-data store
//!
//! `shape_keys` and `slider_values` come back from storage either as JSON
//! objects or as JSON text inside a string column. Both forms are accepted;
//! anything unparseable degrades to an empty map instead of failing the
//! whole record.

use crate::encoder::BodyShapeCode;
use crate::error::{BodyError, Result};
use crate::models::{Gender, MeasurementProfile};
use crate::morph::MorphAssignment;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BodyRecord {
    #[serde(default = "Uuid::new_v4")]
    pub record_id: Uuid,

    #[validate(length(min = 1, max = 128))]
    pub user_id: String,

    pub gender: Gender,

    /// Weight-class label the shape was built for
    pub shape: String,

    #[serde(default, deserialize_with = "lenient_json")]
    pub shape_keys: BTreeMap<String, f32>,

    #[serde(default, deserialize_with = "lenient_json")]
    pub slider_values: BTreeMap<String, f32>,

    pub alphanumeric_code: String,

    /// Inches
    #[serde(default)]
    #[validate(range(min = 20.0, max = 110.0))]
    pub height: Option<f32>,

    /// Pounds
    #[serde(default)]
    #[validate(range(min = 20.0, max = 1000.0))]
    pub weight: Option<f32>,

    /// Inches
    #[serde(default)]
    #[validate(range(min = 20.0, max = 80.0))]
    pub bust: Option<f32>,

    #[serde(default)]
    #[validate(range(min = 1.0, max = 20.0))]
    pub shoe_size: Option<f32>,

    #[serde(default)]
    #[validate(range(min = 5.0, max = 100.0))]
    pub bmi: Option<f32>,

    #[serde(default)]
    #[validate(range(min = 13, max = 120))]
    pub age: Option<u32>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body-mass index from inches and pounds.
pub fn bmi_imperial(height_in: f32, weight_lb: f32) -> Option<f32> {
    (height_in > 0.0 && weight_lb > 0.0).then(|| 703.0 * weight_lb / (height_in * height_in))
}

impl BodyRecord {
    pub fn new(
        user_id: impl Into<String>,
        gender: Gender,
        shape: impl Into<String>,
        profile: &MeasurementProfile,
        assignment: &MorphAssignment,
        code: &BodyShapeCode,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            user_id: user_id.into(),
            gender,
            shape: shape.into(),
            shape_keys: assignment.as_map().clone(),
            slider_values: profile.sliders.clone(),
            alphanumeric_code: code.to_string(),
            height: profile.height_in,
            weight: None,
            bust: None,
            shoe_size: None,
            bmi: None,
            age: None,
            updated_at: Some(Utc::now()),
        }
    }

    /// Attach the anthropometric scalars; BMI follows from height and weight.
    pub fn with_measurements(
        mut self,
        weight_lb: Option<f32>,
        bust_in: Option<f32>,
        shoe_size: Option<f32>,
        age: Option<u32>,
    ) -> Self {
        self.weight = weight_lb;
        self.bust = bust_in;
        self.shoe_size = shoe_size;
        self.age = age;
        self.bmi = match (self.height, self.weight) {
            (Some(height), Some(weight)) => bmi_imperial(height, weight),
            _ => None,
        };
        self
    }

    pub fn profile(&self) -> MeasurementProfile {
        MeasurementProfile { sliders: self.slider_values.clone(), height_in: self.height }
    }

    pub fn morph_assignment(&self) -> MorphAssignment {
        MorphAssignment::from(self.shape_keys.clone())
    }

    pub fn code(&self) -> Result<BodyShapeCode> {
        self.alphanumeric_code.parse()
    }

    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| BodyError::InvalidRequest(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn lenient_json<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match raw {
        Value::Null => return Ok(T::default()),
        Value::String(text) => serde_json::from_str(&text),
        other => serde_json::from_value(other),
    };
    Ok(parsed.unwrap_or_else(|e| {
        debug!(error = %e, "stored body field unparseable; using empty value");
        T::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ShapeCodeEncoder;
    use crate::models::{sliders, WeightClass};
    use crate::morph::MorphRuleEngine;
    use serde_json::json;

    fn stored(shape_keys: Value, slider_values: Value) -> String {
        json!({
            "user_id": "u-42",
            "gender": "female",
            "shape": "average",
            "shape_keys": shape_keys,
            "slider_values": slider_values,
            "alphanumeric_code": "AV_PG_AR_AQ_3F_MD_MA_",
            "height": 64.0
        })
        .to_string()
    }

    #[test]
    fn test_structured_fields() {
        let record =
            BodyRecord::from_json(&stored(json!({"Trapezoid": 0.5}), json!({"headSize": 0.25})))
                .unwrap();
        assert_eq!(record.shape_keys.get("Trapezoid"), Some(&0.5));
        assert_eq!(record.profile().slider(sliders::HEAD_SIZE), 0.25);
        assert_eq!(record.profile().height_in, Some(64.0));
    }

    #[test]
    fn test_text_fields_are_parsed() {
        let record = BodyRecord::from_json(&stored(
            json!("{\"NeckShape\": 0.6}"),
            json!("{\"stomachShape\": 5}"),
        ))
        .unwrap();
        assert_eq!(record.morph_assignment().get("NeckShape"), Some(0.6));
        assert_eq!(record.slider_values.get("stomachShape"), Some(&5.0));
    }

    #[test]
    fn test_unparseable_fields_default_to_empty() {
        let record =
            BodyRecord::from_json(&stored(json!("{not json"), json!([1, 2, 3]))).unwrap();
        assert!(record.shape_keys.is_empty());
        assert!(record.slider_values.is_empty());

        let record = BodyRecord::from_json(&stored(Value::Null, json!(""))).unwrap();
        assert!(record.shape_keys.is_empty());
        assert!(record.slider_values.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let json = json!({
            "user_id": "u-1",
            "gender": "male",
            "shape": "lean",
            "alphanumeric_code": "LN_AV_AA_AA_6A_MD_MA_"
        });
        let record = BodyRecord::from_json(&json.to_string()).unwrap();
        assert!(record.shape_keys.is_empty());
        assert_eq!(record.height, None);
        assert!(record.check().is_ok());
        assert_eq!(record.code().unwrap().to_string(), "LN_AV_AA_AA_6A_MD_MA_");
    }

    #[test]
    fn test_build_and_round_trip() {
        let profile = MeasurementProfile::new()
            .with(sliders::STOMACH_SHAPE, 2.0)
            .with(sliders::HEAD_SIZE, 0.5)
            .with_height(66.0);
        let evaluation =
            MorphRuleEngine::default().evaluate(&profile, Gender::Female, Some(WeightClass::Lean));
        let code = ShapeCodeEncoder::encode(&profile, WeightClass::Lean);

        let record = BodyRecord::new("u-7", Gender::Female, "lean", &profile, &evaluation.assignment, &code)
            .with_measurements(Some(140.0), Some(36.0), Some(8.0), Some(31));
        assert!(record.check().is_ok());
        let bmi = record.bmi.unwrap();
        assert!((bmi - 22.6).abs() < 0.05, "bmi {}", bmi);

        let back = BodyRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.code().unwrap(), code);
        assert_eq!(back.profile(), profile);
    }

    #[test]
    fn test_validation_rejects_bad_scalars() {
        let mut record = BodyRecord::from_json(&stored(json!({}), json!({}))).unwrap();
        record.age = Some(7);
        assert!(matches!(record.check(), Err(BodyError::InvalidRequest(_))));

        record.age = None;
        record.user_id.clear();
        assert!(record.check().is_err());
    }

    #[test]
    fn test_bmi_requires_positive_inputs() {
        assert_eq!(bmi_imperial(0.0, 150.0), None);
        assert!(bmi_imperial(70.0, 150.0).is_some());
    }
}
