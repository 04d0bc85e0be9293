//! error
//!
//! Error type shared by every Metax operation.
//!
//! # Design
//!
//! Not-found responses are mapped to [`MetaxError::NotAvailable`] only where
//! the caller asked about a specific resource. Other non-success statuses
//! surface as [`MetaxError::Http`] carrying the raw response body so the
//! caller can inspect what Metax said.

use serde_json::Value;
use thiserror::Error;

/// Kind of resource that could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    File,
    Dataset,
    Contract,
    DataCatalog,
    Directory,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::File => write!(f, "File"),
            Resource::Dataset => write!(f, "Dataset"),
            Resource::Contract => write!(f, "Contract"),
            Resource::DataCatalog => write!(f, "Datacatalog"),
            Resource::Directory => write!(f, "Directory"),
        }
    }
}

/// Errors from Metax operations.
#[derive(Debug, Clone, Error)]
pub enum MetaxError {
    /// Neither a user nor a token was configured.
    #[error("Metax user or access token is required.")]
    MissingCredentials,

    /// The requested resource does not exist in Metax.
    #[error("{0} not found")]
    NotAvailable(Resource),

    /// The resource to be created already exists.
    #[error("{message}")]
    AlreadyExists {
        /// Human readable summary
        message: String,
        /// JSON body returned by Metax
        response: Value,
    },

    /// Metax could not produce DataCite XML for the dataset.
    #[error("Datacite generation failed: {0}")]
    DataciteGeneration(String),

    /// Metax answered with an error status that the operation does not handle.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Request URL
        url: String,
        /// Response body as text
        body: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The data needed to carry out the operation is missing or invalid.
    #[error("{0}")]
    InvalidData(String),

    /// The operation is not available in the selected API version.
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl MetaxError {
    /// Check whether this is a not-found error for any resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetaxError::NotAvailable(_))
    }

    /// HTTP status of the failed request, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MetaxError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MetaxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MetaxError::Decode(e.to_string())
        } else {
            MetaxError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for MetaxError {
    fn from(e: serde_json::Error) -> Self {
        MetaxError::Decode(e.to_string())
    }
}
