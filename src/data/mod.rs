//! Core data models for the host list
//!
//! This module contains the wire types for the downloaded host list and the
//! parser/formatter that turns a payload into the newline-joined text stored
//! in the cache.

pub mod hosts;

pub use hosts::{FetchError, HostSource, HostsClient};

use serde::Deserialize;
use thiserror::Error;

/// A single named host as it appears in the downloaded payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostRecord {
    /// Host name, kept one per line in the cache text
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Top-level payload returned by the host list endpoint
///
/// Only `Results` is read; any other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostsResponse {
    /// Host records in server order
    #[serde(rename = "Results", default)]
    pub results: Vec<HostRecord>,
}

/// Errors that can occur when decoding a host list payload
#[derive(Debug, Error)]
pub enum ParseError {
    /// The payload is not a valid host list document
    #[error("Invalid host list payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a payload into host names, preserving the array order
///
/// # Returns
/// * `Ok(Vec<String>)` with every record's name
/// * `Err(ParseError)` if the payload is malformed or has the wrong types
pub fn parse_hosts(data: &[u8]) -> Result<Vec<String>, ParseError> {
    let response: HostsResponse = serde_json::from_slice(data)?;
    Ok(response.results.into_iter().map(|record| record.name).collect())
}

/// Joins host names one per line, with a newline after the last entry
///
/// An empty list formats to an empty string.
pub fn format_hosts<S: AsRef<str>>(names: &[S]) -> String {
    let mut text = String::new();
    for name in names {
        text.push_str(name.as_ref());
        text.push('\n');
    }
    text
}
