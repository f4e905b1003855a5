use indexmap::IndexMap;

use super::{
    Bom, Component, Content, Layer, LayerFeature, LogicalNet, LogisticHeader, HistoryRecord,
    Package, PadStackDef, PhyNetGroup, Spec, Stackup,
};
use crate::geometry::{Point, Polygon};
use crate::units::Units;

pub const NAMESPACE: &str = "http://webstds.ipc.org/2581";
pub const NAMESPACE_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const NAMESPACE_XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Fully assembled IPC-2581 document, owned by one export
#[derive(Debug, Clone)]
pub struct Ipc2581 {
    pub revision: String,
    pub content: Content,
    pub logistic_header: LogisticHeader,
    pub history_record: HistoryRecord,
    pub bom: Bom,
    pub ecad: Ecad,
}

impl Ipc2581 {
    pub fn units(&self) -> Units {
        self.content.dictionaries.units
    }

    pub fn step(&self) -> &Step {
        &self.ecad.cad_data.step
    }
}

#[derive(Debug, Clone)]
pub struct Ecad {
    pub name: String,
    pub cad_header: CadHeader,
    pub cad_data: CadData,
}

#[derive(Debug, Clone)]
pub struct CadHeader {
    pub units: Units,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone)]
pub struct CadData {
    pub layers: Vec<Layer>,
    pub stackup: Stackup,
    pub step: Step,
}

/// Step represents the board design
#[derive(Debug, Clone, Default)]
pub struct Step {
    pub name: String,
    pub datum: Point,
    pub profile: Option<Profile>,
    /// Keyed by name, re-adding a name keeps the first definition
    pub padstack_defs: IndexMap<String, PadStackDef>,
    /// Keyed by part name
    pub packages: IndexMap<String, Package>,
    pub components: Vec<Component>,
    pub logical_nets: Vec<LogicalNet>,
    pub phy_net_group: Option<PhyNetGroup>,
    pub layer_features: Vec<LayerFeature>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn layer_feature(&self, layer: &str) -> Option<&LayerFeature> {
        self.layer_features.iter().find(|lf| lf.layer_ref == layer)
    }
}

/// Board outline
#[derive(Debug, Clone)]
pub struct Profile {
    pub polygon: Polygon,
    pub line_desc_ref: String,
}
