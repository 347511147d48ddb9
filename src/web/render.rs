//! Server-rendered report view. One embedded page template; the result
//! section is built per request with escaped interpolation.

use crate::pipeline::extract::{LabTest, ReportSummary, StructuredResult};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Clarilab - Report Simplifier</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; max-width: 720px;
      margin: 0 auto; padding: 32px 16px;
    }
    h1 { font-size: 24px; margin-bottom: 8px; }
    h2 { font-size: 18px; margin: 24px 0 8px; }
    p.lead { color: #78716c; font-size: 14px; margin-bottom: 24px; }
    form { margin-bottom: 24px; }
    button { padding: 8px 16px; margin-left: 8px; }
    table { border-collapse: collapse; width: 100%; font-size: 14px; }
    th, td { border: 1px solid #e7e5e4; padding: 6px 10px; text-align: left; }
    .status-low, .status-high { color: #b91c1c; font-weight: 600; }
    .status-normal { color: #15803d; }
    .unprocessed { background: #fef3c7; padding: 12px; border-radius: 6px; }
    .summary { background: #ecfdf5; padding: 12px; border-radius: 6px; }
    ul { padding-left: 20px; font-size: 14px; }
    .confidence { color: #78716c; font-size: 12px; margin-top: 12px; }
    .filename { font-size: 13px; color: #57534e; margin-bottom: 12px; }
  </style>
</head>
<body>
  <h1>Clarilab</h1>
  <p class="lead">Upload a medical report (image or text) and get a calm, plain-language summary.</p>
  <form method="post" action="/" enctype="multipart/form-data">
    <input type="file" name="report" required>
    <button type="submit">Simplify</button>
  </form>
"#;

const PAGE_FOOT: &str = "</body>\n</html>\n";

/// Escape a string for interpolation into HTML text or attribute context.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page. `result` is `None` for the empty-state form.
pub fn render_page(result: Option<&StructuredResult>, filename: &str) -> String {
    let mut page = String::from(PAGE_HEAD);

    if !filename.is_empty() {
        page.push_str(&format!(
            "  <p class=\"filename\">Report: {}</p>\n",
            escape_html(filename)
        ));
    }

    match result {
        None => {}
        Some(StructuredResult::Unprocessed { reason }) => {
            page.push_str(&format!(
                "  <div class=\"unprocessed\">Could not process this report: {}</div>\n",
                escape_html(reason)
            ));
        }
        Some(StructuredResult::Ok(report)) => {
            page.push_str(&render_summary(report));
        }
    }

    page.push_str(PAGE_FOOT);
    page
}

fn render_summary(report: &ReportSummary) -> String {
    let mut out = String::new();

    if !report.summary.is_empty() {
        out.push_str(&format!(
            "  <div class=\"summary\">{}</div>\n",
            escape_html(&report.summary)
        ));
    }

    if !report.tests.is_empty() {
        out.push_str("  <h2>Detected tests</h2>\n  <table>\n");
        out.push_str("    <tr><th>Test</th><th>Value</th><th>Unit</th><th>Status</th><th>Reference range</th></tr>\n");
        for test in &report.tests {
            out.push_str(&render_test_row(test));
        }
        out.push_str("  </table>\n");
    }

    if !report.explanations.is_empty() {
        out.push_str("  <h2>What this means</h2>\n  <ul>\n");
        for explanation in &report.explanations {
            out.push_str(&format!("    <li>{}</li>\n", escape_html(explanation)));
        }
        out.push_str("  </ul>\n");
    }

    out.push_str(&format!(
        "  <p class=\"confidence\">Extraction confidence {:.2}, normalization confidence {:.2}</p>\n",
        report.confidence, report.normalization_confidence
    ));

    out
}

fn render_test_row(test: &LabTest) -> String {
    let value = test
        .value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "n/a".into());
    let unit = test.unit.as_deref().unwrap_or("");
    let (status_class, status_text) = match test.status {
        Some(s) => (format!("status-{}", s.as_str()), s.as_str()),
        None => (String::new(), ""),
    };
    let range = match test.ref_range {
        Some(range) => {
            let low = range.low.map(|v| v.to_string()).unwrap_or_else(|| "?".into());
            let high = range.high.map(|v| v.to_string()).unwrap_or_else(|| "?".into());
            format!("{low} to {high}")
        }
        None => String::new(),
    };

    format!(
        "    <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
        escape_html(&test.name),
        value,
        escape_html(unit),
        status_class,
        status_text,
        range,
    )
}
