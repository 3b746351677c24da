pub mod body_json;

pub use body_json::{
    evaluate_body, evaluate_body_json, evaluate_body_json_with_config, request_schema_json,
    BodyEvaluationRequest, BodyEvaluationResponse, API_SCHEMA_VERSION,
};
