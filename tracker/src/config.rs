use serde::Deserialize;
use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://gateway.api.globalfishingwatch.org";

/// Global Fishing Watch API settings, read from `GFW_*` environment variables.
#[derive(Clone, Deserialize)]
pub struct GfwConfig {
    pub api_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl GfwConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = match envy::prefixed("GFW_").from_iter::<_, GfwConfig>(vars) {
            Ok(config) => config,
            Err(envy::Error::MissingValue(_)) => return Err(ConfigError::MissingToken),
            Err(e) => return Err(e.into()),
        };

        if config.api_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(GfwConfig {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            ..config
        })
    }
}

// Keep the token out of logs.
impl fmt::Debug for GfwConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GfwConfig")
            .field("api_token", &"***")
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_token_and_default_url() {
        let config = GfwConfig::from_vars(vars(&[("GFW_API_TOKEN", "secret")])).unwrap();
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_custom_url_is_trimmed() {
        let config = GfwConfig::from_vars(vars(&[
            ("GFW_API_TOKEN", "secret"),
            ("GFW_API_URL", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_token() {
        let result = GfwConfig::from_vars(vars(&[("OTHER_TOKEN", "secret")]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_blank_token() {
        let result = GfwConfig::from_vars(vars(&[("GFW_API_TOKEN", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GfwConfig::from_vars(vars(&[("GFW_API_TOKEN", "secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
