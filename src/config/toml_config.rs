use crate::domain::fixtures;
use crate::domain::model::{Asset, UserProfile};
use crate::domain::ports::AdvisorSettings;
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_FAST_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_DEEP_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    pub profile: Option<UserProfile>,
    pub portfolio: Option<Vec<Asset>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub fast: Option<String>,
    pub deep: Option<String>,
}

impl AdvisorConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.resolve_api_key();
        Ok(config)
    }

    /// Settings from the environment alone: `GEMINI_API_KEY` (or `API_KEY`)
    /// and optionally `GEMINI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.service.base_url = std::env::var("GEMINI_BASE_URL").ok();
        config.resolve_api_key();
        config
    }

    /// Replaces `${VAR}` references with environment values. Unset variables
    /// are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// A key that is blank or still an unresolved `${VAR}` placeholder is
    /// replaced from the environment.
    fn resolve_api_key(&mut self) {
        let usable = self
            .service
            .api_key
            .as_deref()
            .map(|key| !key.trim().is_empty() && !key.contains("${"))
            .unwrap_or(false);
        if usable {
            return;
        }
        self.service.api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty());
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.base_url", self.base_url())?;

        let api_key =
            validation::validate_required_field("service.api_key", &self.service.api_key)?;
        validation::validate_non_empty_string("service.api_key", api_key)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validation::validate_positive_number("service.timeout_seconds", timeout, 1)?;
        }

        validation::validate_non_empty_string("models.fast", self.fast_model())?;
        validation::validate_non_empty_string("models.deep", self.deep_model())?;

        if let Some(profile) = &self.profile {
            validation::validate_non_empty_string("profile.name", &profile.name)?;
            validation::validate_range("profile.age", profile.age, 0, 130)?;
            validation::validate_range("profile.horizonYears", profile.horizon_years, 0, 100)?;
        }

        Ok(())
    }

    /// Configured profile, or the demo profile.
    pub fn profile_or_demo(&self) -> UserProfile {
        self.profile.clone().unwrap_or_else(fixtures::demo_profile)
    }

    /// Configured portfolio, or the demo portfolio.
    pub fn portfolio_or_demo(&self) -> Vec<Asset> {
        self.portfolio.clone().unwrap_or_else(fixtures::demo_assets)
    }
}

impl AdvisorSettings for AdvisorConfig {
    fn base_url(&self) -> &str {
        self.service.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn api_key(&self) -> &str {
        self.service.api_key.as_deref().unwrap_or_default()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn fast_model(&self) -> &str {
        self.models.fast.as_deref().unwrap_or(DEFAULT_FAST_MODEL)
    }

    fn deep_model(&self) -> &str {
        self.models.deep.as_deref().unwrap_or(DEFAULT_DEEP_MODEL)
    }
}

impl Validate for AdvisorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
