//! Versioned diagram file: the JSON document exchanged with persistence.
//!
//! ```json
//! {
//!   "version": 1,
//!   "metadata": { "created": "2026-01-01T00:00:00Z", "modified": "..." },
//!   "viewport": { "panX": 0, "panY": 0, "zoom": 1 },
//!   "elements": [ { "id": "...", "type": "shape", ... } ],
//!   "connectors": [ ... ]
//! }
//! ```
//!
//! The version is checked before the rest of the document is decoded, so a
//! file from a newer release fails with `UnsupportedVersion` rather than a
//! confusing field error.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::camera::Camera;
use crate::consts::FILE_VERSION;
use crate::doc::{CanvasElement, ConnectorElement};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("diagram file json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported diagram file version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Creation and last-modified timestamps, RFC 3339 on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramFile {
    pub version: u32,
    pub metadata: Metadata,
    #[serde(default)]
    pub viewport: Camera,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
    #[serde(default)]
    pub connectors: Vec<ConnectorElement>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl DiagramFile {
    /// Build a current-version file from model parts.
    #[must_use]
    pub fn new(
        elements: Vec<CanvasElement>,
        connectors: Vec<ConnectorElement>,
        viewport: Camera,
        metadata: Metadata,
    ) -> Self {
        Self { version: FILE_VERSION, metadata, viewport, elements, connectors }
    }

    /// Parse a diagram file.
    ///
    /// # Errors
    ///
    /// Returns `FileError::UnsupportedVersion` when `version` is not one this
    /// build reads, and `FileError::Json` for malformed or mistyped input.
    pub fn from_json(raw: &str) -> Result<Self, FileError> {
        let probe: VersionProbe = serde_json::from_str(raw)?;
        if probe.version == 0 || probe.version > FILE_VERSION {
            return Err(FileError::UnsupportedVersion { found: probe.version, supported: FILE_VERSION });
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns `FileError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, FileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
