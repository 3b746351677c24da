//! JSON API for body evaluation
//!
//! This is the caller-facing boundary: it checks the request against the
//! slider schema (rejecting out-of-range and off-tick values, or snapping
//! them when `quantize` is set), then runs the morph rules and the shape
//! code encoder on the validated profile.

use crate::config::EngineConfig;
use crate::encoder::{BodyShapeCode, Segment, ShapeCodeEncoder};
use crate::error::{BodyError, Result};
use crate::models::{Gender, MeasurementProfile, WeightClass};
use crate::morph::MorphRuleEngine;
use crate::schema::{define_schema, SchemaCatalogue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use validator::Validate;

pub const API_SCHEMA_VERSION: u8 = 1;

/// Evaluation request from the slider UI
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct BodyEvaluationRequest {
    pub schema_version: u8,
    pub gender: Gender,
    /// Free-form so that unknown classes still encode (as `XX_`)
    pub weight_class: String,
    #[serde(default)]
    pub sliders: BTreeMap<String, f32>,
    /// Raw body height in inches
    #[serde(default)]
    #[validate(range(min = 20.0, max = 110.0))]
    pub height_in: Option<f32>,
    /// Snap sliders to the nearest tick instead of rejecting off-tick values
    #[serde(default)]
    pub quantize: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyEvaluationResponse {
    pub schema_version: u8,
    pub alphanumeric_code: String,
    pub shape_keys: BTreeMap<String, f32>,
    /// Profile actually evaluated (quantized, omitted sliders at their minimum)
    pub slider_values: BTreeMap<String, f32>,
    pub pregnancy_extras_enabled: bool,
    /// `None` when no weight-class rule wrote the trapezoid key
    pub trapezoid_in_band: Option<bool>,
    /// Code segments that resolved through a default entry
    pub fallback_segments: Vec<Segment>,
    /// `gender/class` when no weight-class rule set exists
    pub missing_rule_family: Option<String>,
}

pub fn evaluate_body_json(request_json: &str) -> Result<String> {
    evaluate_body_json_with_config(request_json, &EngineConfig::from_env())
}

pub fn evaluate_body_json_with_config(request_json: &str, config: &EngineConfig) -> Result<String> {
    let request: BodyEvaluationRequest = serde_json::from_str(request_json)?;
    let response = evaluate_body(&request, config)?;
    Ok(serde_json::to_string(&response)?)
}

pub fn evaluate_body(
    request: &BodyEvaluationRequest,
    config: &EngineConfig,
) -> Result<BodyEvaluationResponse> {
    if request.schema_version != API_SCHEMA_VERSION {
        return Err(BodyError::UnsupportedSchemaVersion {
            found: request.schema_version,
            expected: API_SCHEMA_VERSION,
        });
    }
    request.validate().map_err(|e| BodyError::InvalidRequest(e.to_string()))?;

    let override_catalogue = match &config.schema_path {
        Some(path) => Some(SchemaCatalogue::from_path(path)?),
        None => None,
    };
    let schema = match &override_catalogue {
        Some(catalogue) => catalogue.schema(request.gender),
        None => define_schema(request.gender),
    };

    let raw = MeasurementProfile { sliders: request.sliders.clone(), height_in: request.height_in };
    let profile = if request.quantize { schema.quantize(&raw)? } else { raw };
    schema.validate(&profile)?;
    let profile = schema.complete(&profile);

    let weight_class = WeightClass::parse(&request.weight_class);
    let evaluation =
        MorphRuleEngine::new(config.clone()).evaluate(&profile, request.gender, weight_class);
    let traces = ShapeCodeEncoder::explain(&profile, weight_class);
    let code = match weight_class {
        Some(class) => ShapeCodeEncoder::encode(&profile, class),
        None => ShapeCodeEncoder::encode_str(&profile, &request.weight_class),
    };

    let fallback_segments: Vec<Segment> =
        traces.iter().filter(|t| t.is_fallback()).map(|t| t.segment).collect();
    let missing_rule_family = evaluation.missing_rule_family.map(|(gender, class)| {
        format!("{}/{}", gender, class.map(|c| c.as_str()).unwrap_or("unknown"))
    });

    debug!(
        gender = %request.gender,
        code = %code,
        fallbacks = fallback_segments.len(),
        "body evaluated"
    );

    Ok(BodyEvaluationResponse {
        schema_version: API_SCHEMA_VERSION,
        alphanumeric_code: code.to_string(),
        shape_keys: evaluation.assignment.into_map(),
        slider_values: profile.sliders,
        pregnancy_extras_enabled: evaluation.pregnancy_extras_enabled,
        trapezoid_in_band: evaluation.trapezoid_in_band,
        fallback_segments,
        missing_rule_family,
    })
}

/// JSON Schema of [`BodyEvaluationRequest`] for UI integrators.
pub fn request_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(BodyEvaluationRequest);
    Ok(serde_json::to_string_pretty(&schema)?)
}

impl BodyEvaluationResponse {
    pub fn code(&self) -> Result<BodyShapeCode> {
        self.alphanumeric_code.parse()
    }
}
