use crate::geometry::{Point, Polygon};

use super::Xform;

/// Package describes a land pattern shared by all placements of a part
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub package_type: String,
    pub pin_one: Option<String>,
    pub pin_one_orientation: PinOneOrientation,
    pub height: Option<f64>,
    pub outline: Polygon,
    pub assembly_drawing: Polygon,
    /// Line style used by the outline and assembly drawing
    pub line_desc_ref: String,
    pub pins: Vec<PackagePin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOneOrientation {
    Other,
}

impl PinOneOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinOneOrientation::Other => "OTHER",
        }
    }
}

/// Pin of a package, located in the package frame
#[derive(Debug, Clone)]
pub struct PackagePin {
    pub number: String,
    pub location: Point,
    pub rotation: f64,
    pub pin_type: PinType,
    pub primitive_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinType {
    Thru,
    Surface,
}

impl PinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinType::Thru => "THRU",
            PinType::Surface => "SURFACE",
        }
    }
}

/// Component instance on the board
#[derive(Debug, Clone)]
pub struct Component {
    pub ref_des: String,
    pub package_ref: String,
    pub layer_ref: String,
    pub part: String,
    pub mount_type: MountType,
    pub location: Point,
    pub xform: Xform,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountType {
    Smt,
    Tht,
    Other,
}

impl MountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MountType::Smt => "SMT",
            MountType::Tht => "THMT",
            MountType::Other => "OTHER",
        }
    }
}
