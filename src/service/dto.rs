//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::error::CasError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub equation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub latex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<String>>,
    pub derivative: String,
    pub integral: String,
    #[serde(rename = "3d_points")]
    pub points: Vec<SurfacePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: i32,
    pub y: i32,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionRequest {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub input: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeResponse {
    pub input: String,
    pub derivative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralResponse {
    pub input: String,
    pub integral: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatexResponse {
    pub input: String,
    pub latex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

/// A handler result reported in-band: the payload itself, or `{"error": ...}` with the
/// same HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ok(T),
    Err { error: String },
}

impl<T> Outcome<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Err {
            error: message.into(),
        }
    }
}

impl<T> From<Result<T, CasError>> for Outcome<T> {
    fn from(result: Result<T, CasError>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::error(err.to_string()),
        }
    }
}
