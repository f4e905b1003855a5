use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Dictionaries;

/// Content section: references to the document's parts plus dictionaries
#[derive(Debug, Clone)]
pub struct Content {
    pub role_ref: String,
    pub function_mode: FunctionMode,
    pub step_ref: String,
    pub layer_refs: Vec<String>,
    pub bom_ref: String,
    pub dictionaries: Dictionaries,
}

/// Function mode describes the purpose of the IPC-2581 file
#[derive(Debug, Clone, Copy)]
pub struct FunctionMode {
    pub mode: Mode,
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Userdef,
    Bom,
    Stackup,
    Fabrication,
    #[default]
    Assembly,
    Test,
    Stencil,
    Dfx,
}

impl Mode {
    pub fn keyword(&self) -> &'static str {
        match self {
            Mode::Userdef => "USERDEF",
            Mode::Bom => "BOM",
            Mode::Stackup => "STACKUP",
            Mode::Fabrication => "FABRICATION",
            Mode::Assembly => "ASSEMBLY",
            Mode::Test => "TEST",
            Mode::Stencil => "STENCIL",
            Mode::Dfx => "DFX",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_ascii_lowercase())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "userdef" => Ok(Mode::Userdef),
            "bom" => Ok(Mode::Bom),
            "stackup" => Ok(Mode::Stackup),
            "fabrication" => Ok(Mode::Fabrication),
            "assembly" => Ok(Mode::Assembly),
            "test" => Ok(Mode::Test),
            "stencil" => Ok(Mode::Stencil),
            "dfx" => Ok(Mode::Dfx),
            other => Err(format!("unknown function mode: {other}")),
        }
    }
}
