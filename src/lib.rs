//! metax-access - A client library and CLI for the Metax metadata catalog
//!
//! Metax stores the metadata of research datasets, their files and the
//! digital preservation contracts they belong to. Two incompatible REST APIs
//! are in service: the legacy V2 API and the current V3 API. This crate
//! exposes both behind one interface that always speaks the V3 layout.
//!
//! # Architecture
//!
//! - [`client`] - The `MetaxApi` trait and its V2 and V3 backends
//! - [`convert`] - Pure V2 <-> V3 schema conversion and JSON merge helpers
//! - [`model`] - Typed V3 records returned by the client
//! - [`state`] - Preservation state codes
//! - [`config`] - Configuration file discovery and parsing
//! - [`error`] - Error types shared by the library
//! - [`util`] - Small helpers over file paths
//! - [`cli`] - The `metax_access` command-line tool
//!
//! # Invariants
//!
//! 1. Callers never see V2 shapes: every record is normalized to V3
//! 2. Operations a backend cannot perform fail with `NotSupported`
//! 3. A request is only retried by the caller, never by the client

pub mod cli;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod state;
pub mod util;

pub use client::{create_client, ApiVersion, DatasetQuery, MetaxApi};
pub use error::{MetaxError, Resource};
pub use state::PreservationState;
