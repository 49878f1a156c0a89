//! JSON output of the metrics document.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{ReportError, Result};

/// Pretty JSON for any report payload.
///
/// The payload goes through [`serde_json::Value`] first, which turns NaN and
/// infinite floats into `null`.
pub fn to_json_string<T: Serialize>(payload: &T) -> Result<String> {
    let value = serde_json::to_value(payload)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Writes `payload` to `path` as pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(payload: &T, path: &Path) -> Result<()> {
    let json = to_json_string(payload)?;
    fs::write(path, format!("{json}\n")).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = json.len() + 1, "report written");
    Ok(())
}
