//! Shared input plumbing: read JSON from a file or stdin, parse a
//! domain enum from its `snake_case` wire form.

use std::io::Read as _;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Read raw bytes from `path`, or from stdin if `path == "-"`.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(Path::new(path))?)
    }
}

/// Read and deserialize JSON from a file or stdin.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let bytes = read_input(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Parse a domain enum (`Platform`, `Strategy`, `ValueTier`, ...) from its
/// `snake_case` wire form, reusing the type's own `Deserialize` impl
/// instead of a second parser.
pub fn parse_enum<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| Error::InvalidInput(format!("invalid value for {field}: {raw}")))
}
