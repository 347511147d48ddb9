use serde::{Deserialize, Serialize};

use super::ExtractError;

/// Sentinel reasons carried by `unprocessed` results. These strings are part
/// of the rendered contract and must stay stable.
pub mod reason {
    pub const NO_TEXT: &str = "No valid text found";
    pub const NO_JSON: &str = "No valid JSON generated";
    pub const BAD_JSON: &str = "Invalid JSON from model";
    pub const MODEL_TRANSPORT: &str = "Gemini processing error";
}

/// Flag assigned to a lab value relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Low,
    Normal,
    High,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Reference interval a lab value is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// One detected lab test. Produced by the extractor, never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub status: Option<TestStatus>,
    #[serde(default)]
    pub ref_range: Option<RefRange>,
}

/// Everything the model extracted from one report.
///
/// `explanations` is expected to be order-aligned with `tests` and
/// `tests_raw` to correspond to `tests`, but alignment is passed through
/// unchecked; consumers must tolerate length mismatches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub tests_raw: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub tests: Vec<LabTest>,
    #[serde(default)]
    pub normalization_confidence: f64,
    #[serde(default)]
    pub explanations: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// Outcome of the Structured Extractor. Tagged on `status`, so it
/// serializes to exactly the shape the view layer branches on, and an
/// `unprocessed` value structurally cannot carry extraction fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StructuredResult {
    Ok(ReportSummary),
    Unprocessed { reason: String },
}

impl StructuredResult {
    pub fn unprocessed(reason: impl Into<String>) -> Self {
        Self::Unprocessed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Generative model abstraction (allows mocking). Implementations are
/// blocking; callers on an async runtime must hop through `spawn_blocking`.
pub trait GenerativeClient: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ExtractError>;
}
