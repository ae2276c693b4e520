use crate::core::animation::AnimationConfig;
use crate::core::retry::RetryPolicy;
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
pub const EDITOR_KEY_ENV: &str = "EDITOR_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub animation: AnimationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Budget for a single request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Budget for a whole page attempt: slug walk, detail and follow-ups
    #[serde(default = "default_page_timeout_seconds")]
    pub page_timeout_seconds: u64,
    /// Key for the hosted rich-text editor; passed through to the front end.
    #[serde(default)]
    pub editor_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_easing")]
    pub easing: String,
    #[serde(default = "default_run_once")]
    pub run_once: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_page_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    2_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_duration_ms() -> u64 {
    800
}

fn default_easing() -> String {
    "ease-in-out".to_string()
}

fn default_run_once() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            page_timeout_seconds: default_page_timeout_seconds(),
            editor_key: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: default_easing(),
            run_once: default_run_once(),
        }
    }
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex literal"))
}

impl SiteConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ContentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders with environment values; unknown ones are kept
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// `API_BASE_URL` and `EDITOR_API_KEY` win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            tracing::debug!("🔧 api.base_url overridden by {}", API_BASE_URL_ENV);
            self.api.base_url = base_url;
        }
        if let Ok(key) = std::env::var(EDITOR_KEY_ENV) {
            tracing::debug!("🔧 api.editor_key overridden by {}", EDITOR_KEY_ENV);
            self.api.editor_key = Some(key);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.api.page_timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
            backoff_multiplier: self.retry.backoff_multiplier,
        }
    }

    pub fn animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            duration: Duration::from_millis(self.animation.duration_ms),
            easing: self.animation.easing.clone(),
            run_once: self.animation.run_once,
        }
    }

    pub fn editor_key(&self) -> Option<&str> {
        self.api.editor_key.as_deref()
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validate_range("api.page_timeout_seconds", self.api.page_timeout_seconds, 1, 900)?;

        // a follow-up must be able to time out on its own before the page does
        if self.api.page_timeout_seconds <= self.api.timeout_seconds {
            return Err(ContentError::InvalidConfigValueError {
                field: "api.page_timeout_seconds".to_string(),
                value: self.api.page_timeout_seconds.to_string(),
                reason: "must be greater than api.timeout_seconds".to_string(),
            });
        }
        validate_range("retry.max_retries", self.retry.max_retries, 0, 10)?;
        validate_range("retry.backoff_multiplier", self.retry.backoff_multiplier, 1.0, 10.0)?;

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ContentError::InvalidConfigValueError {
                field: "retry.initial_backoff_ms".to_string(),
                value: self.retry.initial_backoff_ms.to_string(),
                reason: "must not exceed retry.max_backoff_ms".to_string(),
            });
        }

        validate_range("animation.duration_ms", self.animation.duration_ms, 1, 10_000)?;
        validate_non_empty_string("animation.easing", &self.animation.easing)?;

        if let Some(key) = &self.api.editor_key {
            if env_placeholder().is_match(key) {
                return Err(ContentError::MissingConfigError {
                    field: format!("api.editor_key ({})", key),
                });
            }
        }

        Ok(())
    }
}
