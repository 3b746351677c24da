//! # bodyform_core - Deterministic Body Parametrization Engine
//!
//! Maps quantized body-measurement sliders onto the blend-shape weights of a
//! rigged avatar and onto a compact seven-segment body shape code.
//!
//! ## Features
//! - Per-gender slider schemas with range and tick validation
//! - Boundary-table classification of slider values into named buckets
//! - Region morph rules returning immutable shape-key assignments
//! - Body shape code encoding with per-segment fallback tracing
//! - JSON API and persisted body records

pub mod api;
pub mod classification;
pub mod config;
pub mod encoder;
pub mod error;
pub mod models;
pub mod morph;
pub mod persistence;
pub mod schema;

// Re-export main API functions
pub use api::{
    evaluate_body, evaluate_body_json, evaluate_body_json_with_config, request_schema_json,
    BodyEvaluationRequest, BodyEvaluationResponse,
};
pub use error::{BodyError, Result};

// Re-export domain types
pub use classification::{bucket, classify, Bucket, BucketTag};
pub use config::EngineConfig;
pub use encoder::{BodyShapeCode, Segment, SegmentTrace, ShapeCodeEncoder};
pub use models::{sliders, Gender, MeasurementProfile, WeightClass};
pub use morph::{
    Evaluation, MorphAssignment, MorphRuleEngine, MorphTarget, MorphTargetDictionary, RegionRule,
};
pub use persistence::BodyRecord;
pub use schema::{define_schema, GenderSchema, SchemaCatalogue, SliderDefinition};

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request/response schema version of the JSON API
pub const SCHEMA_VERSION: u8 = api::API_SCHEMA_VERSION;
