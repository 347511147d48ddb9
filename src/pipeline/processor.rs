//! Report pipeline orchestration: normalize, then extract.
//!
//! Trait-based DI for the model client keeps the orchestrator fully
//! testable with mock implementations.

use std::sync::Arc;

use crate::pipeline::extract::types::reason;
use crate::pipeline::extract::{self, GenerativeClient, StructuredResult};
use crate::pipeline::normalize;

/// Drives the full pipeline for one uploaded report.
///
/// Infallible by construction: every failure inside the pipeline is folded
/// into an `unprocessed` result, so the caller always has something to
/// render. Stateless across requests.
pub struct ReportPipeline {
    client: Arc<dyn GenerativeClient>,
    tesseract_bin: String,
}

impl ReportPipeline {
    pub fn new(client: Arc<dyn GenerativeClient>, tesseract_bin: impl Into<String>) -> Self {
        Self {
            client,
            tesseract_bin: tesseract_bin.into(),
        }
    }

    /// Run normalize then extract over one uploaded file.
    ///
    /// Empty extracted text short-circuits before the model is called.
    pub fn process(&self, bytes: &[u8], filename: &str) -> StructuredResult {
        let text = normalize::normalize(bytes, filename, &self.tesseract_bin);
        if text.trim().is_empty() {
            tracing::info!(filename, "no text extracted, skipping model call");
            return StructuredResult::unprocessed(reason::NO_TEXT);
        }

        tracing::debug!(filename, text_len = text.len(), "text extracted");
        extract::extract(self.client.as_ref(), &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::gemini::MockGenerativeClient;
    use crate::pipeline::extract::ExtractError;

    /// Fails the test if the pipeline reaches the model at all.
    struct PanickingClient;

    impl GenerativeClient for PanickingClient {
        fn generate(&self, _prompt: &str) -> Result<String, ExtractError> {
            panic!("model must not be called for empty text");
        }
    }

    fn pipeline(client: impl GenerativeClient + 'static) -> ReportPipeline {
        ReportPipeline::new(Arc::new(client), "tesseract")
    }

    #[test]
    fn empty_upload_short_circuits_before_the_model() {
        let result = pipeline(PanickingClient).process(b"", "report.txt");
        assert_eq!(result, StructuredResult::unprocessed("No valid text found"));
    }

    #[test]
    fn whitespace_only_text_short_circuits_too() {
        let result = pipeline(PanickingClient).process(b"  \n\t ", "report.txt");
        assert_eq!(result, StructuredResult::unprocessed("No valid text found"));
    }

    #[test]
    fn corrupt_image_short_circuits_before_the_model() {
        let result = pipeline(PanickingClient).process(b"not an image", "scan.png");
        assert_eq!(result, StructuredResult::unprocessed("No valid text found"));
    }

    #[test]
    fn text_report_flows_through_to_the_model() {
        let client = MockGenerativeClient::new(
            r#"{"tests":[{"name":"Hemoglobin","value":10.2}],"summary":"Low hemoglobin.","status":"ok"}"#,
        );
        let result = pipeline(client).process(b"Hemoglobin 10.2 g/dL (12.0-15.0)", "report.txt");
        assert!(result.is_ok(), "got {result:?}");
    }

    #[test]
    fn model_failure_still_yields_a_renderable_result() {
        let result = pipeline(MockGenerativeClient::failing())
            .process(b"Hemoglobin 10.2 g/dL", "report.txt");
        assert_eq!(
            result,
            StructuredResult::unprocessed("Gemini processing error")
        );
    }
}
