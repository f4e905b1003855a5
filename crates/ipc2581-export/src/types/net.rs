use serde::{Deserialize, Serialize};

/// LogicalNet represents electrical connectivity
#[derive(Debug, Clone)]
pub struct LogicalNet {
    pub name: String,
    pub pin_refs: Vec<PinRef>,
}

/// PinRef references a component pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRef {
    pub component_ref: String,
    pub pin: String,
}

#[derive(Debug, Clone)]
pub struct PhyNetGroup {
    pub name: String,
    pub phy_nets: Vec<PhyNet>,
}

/// Routed points of one net
#[derive(Debug, Clone)]
pub struct PhyNet {
    pub name: String,
    pub points: Vec<PhyNetPoint>,
}

#[derive(Debug, Clone)]
pub struct PhyNetPoint {
    pub x: f64,
    pub y: f64,
    pub layer_ref: String,
    pub net_node: NetNode,
    pub exposure: Exposure,
    pub via: bool,
    pub primitive_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetNode {
    Middle,
    End,
}

impl NetNode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetNode::Middle => "MIDDLE",
            NetNode::End => "END",
        }
    }
}

/// Solder mask state over a net point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    #[default]
    Exposed,
    CoveredPrimary,
    CoveredSecondary,
}

impl Exposure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exposure::Exposed => "EXPOSED",
            Exposure::CoveredPrimary => "COVERED_PRIMARY",
            Exposure::CoveredSecondary => "COVERED_SECONDARY",
        }
    }
}
