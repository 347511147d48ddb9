//! Fixed extraction prompt. The report text is embedded verbatim; the model
//! is instructed to answer with a single JSON object matching the shape the
//! parser and view layer expect.

/// Build the extraction prompt for one report's text.
pub fn build_extraction_prompt(extracted_text: &str) -> String {
    format!(
        r#"You are a medical text simplifier.
Input medical report text:
{extracted_text}

Steps:
1. Extract all tests, values, units, and status (low/normal/high).
2. If ranges are present, include them; otherwise leave null.
3. Generate explanations for ALL tests, each <=18 words, calm and patient-friendly.
4. Generate a very short summary (<=20 words) combining key points.
5. Return a confidence score (0.0-1.0) for extraction and normalization.

Output ONLY valid JSON:
{{
  "tests_raw": ["list of raw extracted test lines"],
  "confidence": 0.82,
  "tests": [
    {{"name":"Hemoglobin","value":10.2,"unit":"g/dL","status":"low","ref_range":{{"low":12.0,"high":15.0}}}},
    {{"name":"WBC","value":11200,"unit":"/uL","status":"high","ref_range":{{"low":4000,"high":11000}}}}
  ],
  "normalization_confidence": 0.84,
  "explanations": [
    "Hemoglobin is slightly low, linked to low blood levels.",
    "White blood cells are high, suggesting body defense activity."
  ],
  "summary": "Low hemoglobin and high WBC detected.",
  "status": "ok"
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_report_text_verbatim() {
        let prompt = build_extraction_prompt("Hemoglobin 10.2 g/dL (12.0-15.0)");
        assert!(prompt.contains("Hemoglobin 10.2 g/dL (12.0-15.0)"));
    }

    #[test]
    fn prompt_demands_json_only_output() {
        let prompt = build_extraction_prompt("x");
        assert!(prompt.contains("Output ONLY valid JSON"));
        assert!(prompt.contains("\"status\": \"ok\""));
    }

    #[test]
    fn prompt_caps_explanation_and_summary_length() {
        let prompt = build_extraction_prompt("x");
        assert!(prompt.contains("<=18 words"));
        assert!(prompt.contains("<=20 words"));
    }

    #[test]
    fn prompt_example_shape_is_valid_json() {
        let prompt = build_extraction_prompt("x");
        let start = prompt.find("{\n").unwrap();
        let example = &prompt[start..];
        let value: serde_json::Value = serde_json::from_str(example.trim()).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["tests"][0]["name"], "Hemoglobin");
    }
}
