//! Defensive recovery of the model's JSON payload.
//!
//! The model is not guaranteed to return clean JSON: the object may be
//! wrapped in prose or code fences, carry trailing commas, or be missing
//! entirely. Recovery tries a strict decode of the whole response first,
//! then scans for balanced brace-delimited candidates, keeps the longest
//! (auxiliary braces from formatting tend to be shorter than the real
//! payload), repairs trailing commas, and decodes that.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::types::{reason, ReportSummary, StructuredResult};

/// `{"a":1,}` and `[1,2,]` are common model formatting defects.
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").unwrap());

/// Recover a structured result from the model's raw response text.
pub fn recover_report(response: &str) -> StructuredResult {
    // Fast path: the model often returns the bare object with no prose.
    if let Ok(raw) = serde_json::from_str::<RawReport>(response) {
        return raw.into_result();
    }

    let Some(candidate) = longest_json_candidate(response) else {
        return StructuredResult::unprocessed(reason::NO_JSON);
    };

    let repaired = TRAILING_COMMA.replace_all(candidate, "$1");
    match serde_json::from_str::<RawReport>(&repaired) {
        Ok(raw) => raw.into_result(),
        Err(e) => {
            tracing::warn!(error = %e, "model JSON failed to decode");
            StructuredResult::unprocessed(reason::BAD_JSON)
        }
    }
}

/// Scan for balanced `{...}` substrings (nested content and newlines
/// allowed) and return the longest one.
///
/// Braces inside JSON string values do not count toward nesting, so a
/// summary like `"values rose } then fell"` cannot corrupt the candidate
/// boundaries.
fn longest_json_candidate(response: &str) -> Option<&str> {
    let mut candidates: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in response.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            // Only strings inside a candidate matter; quotes in prose
            // between candidates stay plain text.
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        candidates.push(&response[start..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    candidates.into_iter().max_by_key(|c| c.len())
}

/// Loosely-typed report as the model actually emits it. Every field is
/// optional; individual `tests` entries that fail to deserialize are
/// skipped rather than failing the whole report.
#[derive(Deserialize)]
struct RawReport {
    status: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    tests_raw: Vec<String>,
    confidence: Option<f64>,
    #[serde(default)]
    tests: Vec<serde_json::Value>,
    normalization_confidence: Option<f64>,
    #[serde(default)]
    explanations: Vec<String>,
    summary: Option<String>,
}

impl RawReport {
    fn into_result(self) -> StructuredResult {
        // The model may itself declare the report unprocessable.
        if self.status.as_deref() == Some("unprocessed") {
            return StructuredResult::unprocessed(self.reason.unwrap_or_default());
        }

        StructuredResult::Ok(ReportSummary {
            tests_raw: self.tests_raw,
            confidence: self.confidence.unwrap_or(0.0),
            tests: parse_array_lenient(&self.tests),
            normalization_confidence: self.normalization_confidence.unwrap_or(0.0),
            explanations: self.explanations,
            summary: self.summary.unwrap_or_default(),
        })
    }
}

/// Parse an array leniently, skipping items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: &[serde_json::Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}
