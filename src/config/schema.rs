//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing so that a typo in `api_version` is
//! reported with the config file path instead of surfacing later as a
//! client error.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Contents of a configuration file.
///
/// # Example
///
/// ```toml
/// [metax]
/// url = "https://metax.fairdata.fi"
/// user = "tpas"
/// password = "secret"
/// api_version = "v3"
/// verify = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Connection settings
    pub metax: MetaxConfig,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metax.validate()
    }
}

/// The `[metax]` section: where and how to connect.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetaxConfig {
    /// Metax root URL, without an API path
    pub url: Option<String>,

    /// Username for HTTP Basic authentication
    pub user: Option<String>,

    /// Password for HTTP Basic authentication
    pub password: Option<String>,

    /// Bearer token, used instead of user and password when set
    pub token: Option<String>,

    /// API version (default: "v3")
    pub api_version: Option<String>,

    /// Verify TLS certificates (default: true)
    pub verify: bool,
}

impl Default for MetaxConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            password: None,
            token: None,
            api_version: None,
            verify: true,
        }
    }
}

// Custom Debug to avoid exposing credentials in logs
impl std::fmt::Debug for MetaxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaxConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("verify", &self.verify)
            .finish()
    }
}

impl MetaxConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the API version is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(version) = &self.api_version {
            let valid = crate::client::valid_version_names();
            if !valid.contains(&version.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid api_version '{}', must be one of: {}",
                    version,
                    valid.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Overlay the values that are set in `other`.
    ///
    /// `verify` can only be switched off.
    pub fn merge(mut self, other: MetaxConfig) -> Self {
        self.url = other.url.or(self.url);
        self.user = other.user.or(self.user);
        self.password = other.password.or(self.password);
        self.token = other.token.or(self.token);
        self.api_version = other.api_version.or(self.api_version);
        self.verify = self.verify && other.verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn full_section() {
            let file: ConfigFile = toml::from_str(
                r#"
                [metax]
                url = "https://metax.localhost"
                user = "tpas"
                password = "secret"
                api_version = "v2"
                verify = false
                "#,
            )
            .unwrap();
            assert_eq!(file.metax.url.as_deref(), Some("https://metax.localhost"));
            assert_eq!(file.metax.user.as_deref(), Some("tpas"));
            assert_eq!(file.metax.api_version.as_deref(), Some("v2"));
            assert!(!file.metax.verify);
            assert!(file.validate().is_ok());
        }

        #[test]
        fn empty_file_uses_defaults() {
            let file: ConfigFile = toml::from_str("").unwrap();
            assert_eq!(file, ConfigFile::default());
            assert!(file.metax.verify);
        }

        #[test]
        fn unknown_fields_are_rejected() {
            let result: Result<ConfigFile, _> = toml::from_str("[metax]\nhost = \"x\"\n");
            assert!(result.is_err());
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn unknown_api_version() {
            let config = MetaxConfig {
                api_version: Some("v9".into()),
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("v9"));
        }

        #[test]
        fn version_is_case_insensitive() {
            let config = MetaxConfig {
                api_version: Some("V3".into()),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn set_values_win() {
            let file = MetaxConfig {
                url: Some("https://file".into()),
                user: Some("file-user".into()),
                password: Some("file-pass".into()),
                ..Default::default()
            };
            let flags = MetaxConfig {
                url: Some("https://flag".into()),
                ..Default::default()
            };
            let merged = file.merge(flags);
            assert_eq!(merged.url.as_deref(), Some("https://flag"));
            assert_eq!(merged.user.as_deref(), Some("file-user"));
            assert_eq!(merged.password.as_deref(), Some("file-pass"));
            assert!(merged.verify);
        }

        #[test]
        fn verify_only_switches_off() {
            let off = MetaxConfig {
                verify: false,
                ..Default::default()
            };
            assert!(!MetaxConfig::default().merge(off.clone()).verify);
            assert!(!off.merge(MetaxConfig::default()).verify);
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = MetaxConfig {
            password: Some("hunter2".into()),
            token: Some("abc".into()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("\"abc\""));
        assert!(debug.contains("REDACTED"));
    }
}
