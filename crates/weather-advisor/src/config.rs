//! Provider credentials loaded from the environment.

use crate::error::{AdvisorError, Result};

/// An API key that never shows up in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// API keys for the four weather providers. All are required.
#[derive(Clone, Debug)]
pub struct ProviderKeys {
    pub openweathermap: ApiKey,
    pub weatherapi: ApiKey,
    pub tomorrow: ApiKey,
    pub visualcrossing: ApiKey,
}

impl ProviderKeys {
    pub const OPENWEATHERMAP_VAR: &'static str = "OPENWEATHERMAP_API_KEY";
    pub const WEATHERAPI_VAR: &'static str = "WEATHERAPI_KEY";
    pub const TOMORROW_VAR: &'static str = "TOMORROW_KEY";
    pub const VISUALCROSSING_VAR: &'static str = "VISUALCROSSING_KEY";

    /// Load every key from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load every key through `lookup`, failing on the first missing one
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |var: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map(ApiKey::new)
                .ok_or_else(|| {
                    AdvisorError::Config(format!(
                        "{var} is not set. Please ensure it is defined in your .env file."
                    ))
                })
        };

        Ok(Self {
            openweathermap: require(Self::OPENWEATHERMAP_VAR)?,
            weatherapi: require(Self::WEATHERAPI_VAR)?,
            tomorrow: require(Self::TOMORROW_VAR)?,
            visualcrossing: require(Self::VISUALCROSSING_VAR)?,
        })
    }
}
