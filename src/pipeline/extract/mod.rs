//! Structured Extractor: free text in, `StructuredResult` out.
//!
//! Stateless between calls. Every failure mode — transport, missing JSON,
//! undecodable JSON — degrades to an `unprocessed` result instead of
//! propagating to the caller.

pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod types;

use thiserror::Error;

pub use types::{
    GenerativeClient, LabTest, RefRange, ReportSummary, StructuredResult, TestStatus,
};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot reach Gemini at {0}")]
    Connection(String),

    #[error("Gemini request timed out after {0}s")]
    Timeout(u64),

    #[error("Gemini returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response carried no candidate text")]
    EmptyResponse,
}

/// Ask the model to structure `text`, then defensively parse its reply.
/// Single attempt: a failed call degrades the request, it never retries.
pub fn extract(client: &dyn GenerativeClient, text: &str) -> StructuredResult {
    let prompt = prompt::build_extraction_prompt(text);
    match client.generate(&prompt) {
        Ok(response) => parser::recover_report(response.trim()),
        Err(e) => {
            tracing::warn!(error = %e, "Gemini call failed, degrading to unprocessed");
            StructuredResult::unprocessed(types::reason::MODEL_TRANSPORT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::gemini::MockGenerativeClient;
    use super::*;

    #[test]
    fn transport_failure_degrades_to_unprocessed() {
        let client = MockGenerativeClient::failing();
        let result = extract(&client, "Hemoglobin 10.2 g/dL");
        assert_eq!(
            result,
            StructuredResult::unprocessed("Gemini processing error")
        );
    }

    #[test]
    fn well_formed_response_parses_to_ok() {
        let client = MockGenerativeClient::new(
            r#"{"tests":[{"name":"Hemoglobin","value":10.2,"unit":"g/dL","status":"low"}],"summary":"Low hemoglobin.","status":"ok"}"#,
        );
        let StructuredResult::Ok(report) = extract(&client, "Hemoglobin 10.2 g/dL") else {
            panic!("expected ok result");
        };
        assert_eq!(report.tests[0].name, "Hemoglobin");
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let client = MockGenerativeClient::new("\n\n  {\"status\":\"ok\",\"summary\":\"x\"}  \n");
        assert!(extract(&client, "text").is_ok());
    }
}
