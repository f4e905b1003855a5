use super::{PinRef, PlatingStatus};
use crate::geometry::{Point, Polygon, Polyline};

/// Placement transform of a pad or component
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xform {
    /// Degrees, counter-clockwise, in `[0, 360)`
    pub rotation: f64,
    pub mirror: bool,
}

impl Xform {
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && !self.mirror
    }
}

/// Padstack placed on a layer, either a component pin or a via
#[derive(Debug, Clone)]
pub struct PadFeature {
    pub net: String,
    pub padstack_def_ref: String,
    pub location: Point,
    pub xform: Xform,
    pub primitive_ref: String,
    pub pin_ref: Option<PinRef>,
    pub via: bool,
}

/// Drilled hole instance
#[derive(Debug, Clone)]
pub struct Hole {
    pub net: String,
    pub name: String,
    pub diameter: f64,
    pub plating_status: PlatingStatus,
    pub plus_tol: f64,
    pub minus_tol: f64,
    pub location: Point,
}

#[derive(Debug, Clone)]
pub enum Feature {
    Polygon { net: String, polygon: Polygon },
    Path { net: String, polyline: Polyline },
    Pad(PadFeature),
    Drill(Hole),
}

impl Feature {
    pub fn net(&self) -> &str {
        match self {
            Feature::Polygon { net, .. } | Feature::Path { net, .. } => net,
            Feature::Pad(pad) => &pad.net,
            Feature::Drill(hole) => &hole.net,
        }
    }

    /// Whether serializing this feature produces any geometry
    pub fn has_geometry(&self) -> bool {
        match self {
            Feature::Polygon { polygon, .. } => !polygon.is_empty(),
            Feature::Path { polyline, .. } => !polyline.chain.is_empty(),
            Feature::Pad(_) | Feature::Drill(_) => true,
        }
    }
}

/// LayerFeature contains the features placed on one layer
#[derive(Debug, Clone)]
pub struct LayerFeature {
    pub layer_ref: String,
    /// Color dictionary entry shared by every set of the layer
    pub color_ref: String,
    pub features: Vec<Feature>,
    /// Holds only drill features
    pub drill: bool,
}

impl LayerFeature {
    pub fn new(layer_ref: impl Into<String>, drill: bool) -> Self {
        let layer_ref = layer_ref.into();
        Self {
            color_ref: layer_ref.clone(),
            layer_ref,
            features: Vec::new(),
            drill,
        }
    }

    pub fn holes(&self) -> impl Iterator<Item = &Hole> {
        self.features.iter().filter_map(|f| match f {
            Feature::Drill(hole) => Some(hole),
            _ => None,
        })
    }

    pub fn pads(&self) -> impl Iterator<Item = &PadFeature> {
        self.features.iter().filter_map(|f| match f {
            Feature::Pad(pad) => Some(pad),
            _ => None,
        })
    }
}
