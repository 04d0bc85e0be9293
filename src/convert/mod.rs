//! convert
//!
//! Payload converters between Metax API versions.
//!
//! # Design
//!
//! The V3 layout is the canonical one. Responses from a V2 server are run
//! through [`v2_to_v3`] before normalization, and write payloads (which
//! callers always build in the V3 layout) go through [`v3_to_v2`] before
//! being sent to a V2 server. Converters are pure functions over
//! `serde_json::Value`; anything that needs another request is resolved by
//! the client beforehand and passed in.

pub mod json;
pub mod v2_to_v3;
pub mod v3_to_v2;

pub use json::{merge_patch, remove_none, update_nested};
