//! Export options
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Mode;
use crate::units::Units;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    pub units: Units,
    /// IPC-2581 schema revision written on the root element
    pub revision: String,
    pub mode: Mode,
    pub level: Option<u8>,
    /// Defaults to the layout's design name
    pub step_name: Option<String>,
    pub enterprise: String,
    pub person: String,
    pub software_name: String,
    pub software_revision: String,
    pub vendor: String,
    /// Fixed `origination`/`lastChange` value, the current time when unset
    pub timestamp: Option<String>,
    /// Append the MD5 checksum trailer
    pub checksum: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            units: Units::default(),
            revision: "C".to_owned(),
            mode: Mode::default(),
            level: None,
            step_name: None,
            enterprise: "UNKNOWN".to_owned(),
            person: "UNKNOWN".to_owned(),
            software_name: env!("CARGO_PKG_NAME").to_owned(),
            software_revision: env!("CARGO_PKG_VERSION").to_owned(),
            vendor: "UNKNOWN".to_owned(),
            timestamp: None,
            checksum: false,
        }
    }
}

impl ExportOptions {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Timestamp written to the history record
    pub fn timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| jiff::Timestamp::now().to_string())
    }
}
