use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clarilab";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gemini model used for report structuring.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed sampling parameters: low temperature, greedy top-k.
pub const MODEL_TEMPERATURE: f32 = 0.3;
pub const MODEL_TOP_K: u32 = 1;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_SAMPLE_DIR: &str = "sample_reports";
pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
    pub timeout_secs: u64,
}

/// Process configuration, built once at startup and passed by parameter.
/// Nothing reads from global scope after construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub sample_reports_dir: PathBuf,
    pub tesseract_bin: String,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Factored out from `from_env` so tests never mutate process-wide
    /// environment state.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = get("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let bind = get("CLARILAB_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind.parse().map_err(|_| ConfigError::Invalid {
            name: "CLARILAB_BIND",
            value: bind.clone(),
        })?;

        let sample_reports_dir = PathBuf::from(
            get("CLARILAB_SAMPLE_DIR").unwrap_or_else(|| DEFAULT_SAMPLE_DIR.to_string()),
        );

        let tesseract_bin =
            get("TESSERACT_BIN").unwrap_or_else(|| DEFAULT_TESSERACT_BIN.to_string());

        let base_url = get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            bind_addr,
            sample_reports_dir,
            tesseract_bin,
            gemini: GeminiConfig {
                api_key,
                base_url,
                model,
                temperature: MODEL_TEMPERATURE,
                top_k: MODEL_TOP_K,
                timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let result = AppConfig::from_lookup(env(&[]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn blank_api_key_is_an_error() {
        let result = AppConfig::from_lookup(env(&[("GEMINI_API_KEY", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_lookup(env(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.sample_reports_dir, PathBuf::from("sample_reports"));
        assert_eq!(config.tesseract_bin, "tesseract");
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn sampling_parameters_are_fixed() {
        let config = AppConfig::from_lookup(env(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert!((config.gemini.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.gemini.top_k, 1);
    }

    #[test]
    fn overrides_are_honored() {
        let config = AppConfig::from_lookup(env(&[
            ("GEMINI_API_KEY", "k"),
            ("CLARILAB_BIND", "127.0.0.1:9000"),
            ("CLARILAB_SAMPLE_DIR", "/tmp/reports"),
            ("TESSERACT_BIN", "/opt/bin/tesseract"),
            ("GEMINI_BASE_URL", "http://localhost:9999"),
            ("GEMINI_MODEL", "gemini-test"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.sample_reports_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.tesseract_bin, "/opt/bin/tesseract");
        assert_eq!(config.gemini.base_url, "http://localhost:9999");
        assert_eq!(config.gemini.model, "gemini-test");
    }

    #[test]
    fn unparseable_bind_is_an_error() {
        let result = AppConfig::from_lookup(env(&[
            ("GEMINI_API_KEY", "k"),
            ("CLARILAB_BIND", "not-an-addr"),
        ]));
        assert!(
            matches!(result, Err(ConfigError::Invalid { name, .. }) if name == "CLARILAB_BIND")
        );
    }
}
