//! client::factory
//!
//! API version selection and client creation.
//!
//! # Design
//!
//! Callers use `create_client()` instead of constructing a backend, so that
//! switching a deployment between Metax versions is a configuration change.

use super::traits::MetaxApi;
use super::v2::V2Client;
use super::v3::V3Client;
use crate::config::MetaxConfig;
use crate::error::MetaxError;

/// Supported Metax API versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// Legacy `/rest/v2` API
    V2,
    /// Current `/v3` API
    #[default]
    V3,
}

impl ApiVersion {
    /// Get all supported versions.
    pub fn all() -> &'static [ApiVersion] {
        &[ApiVersion::V2, ApiVersion::V3]
    }

    /// Get the version name as a string.
    ///
    /// This matches the name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }

    /// Parse a version from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use metax_access::client::ApiVersion;
    ///
    /// assert_eq!(ApiVersion::parse("V2"), Some(ApiVersion::V2));
    /// assert_eq!(ApiVersion::parse("v4"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "v2" => Some(ApiVersion::V2),
            "v3" => Some(ApiVersion::V3),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a client from the `[metax]` configuration section.
///
/// # Errors
///
/// - `InvalidData` if the URL is missing or the API version is unknown
/// - `MissingCredentials` if neither a user nor a token is configured
pub fn create_client(config: &MetaxConfig) -> Result<Box<dyn MetaxApi>, MetaxError> {
    let url = config
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| MetaxError::InvalidData("Metax URL is required.".to_string()))?;

    let version = match config.api_version.as_deref() {
        None => ApiVersion::default(),
        Some(name) => ApiVersion::parse(name).ok_or_else(|| {
            MetaxError::InvalidData(format!(
                "unknown Metax API version '{}', expected one of: {}",
                name,
                valid_version_names().join(", ")
            ))
        })?,
    };

    let user = config.user.clone();
    let password = config.password.clone();
    let token = config.token.clone();

    tracing::debug!(%url, %version, "creating Metax client");
    match version {
        ApiVersion::V3 => Ok(Box::new(V3Client::new(
            url,
            user,
            password,
            token,
            config.verify,
        )?)),
        ApiVersion::V2 => Ok(Box::new(V2Client::new(
            url,
            user,
            password,
            token,
            config.verify,
        )?)),
    }
}

/// Names accepted for `api_version`.
pub fn valid_version_names() -> Vec<&'static str> {
    ApiVersion::all().iter().map(|v| v.name()).collect()
}
