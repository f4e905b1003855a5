//! Input layout model
//!
//! Plain data handed over by a layout adapter: layers, materials, padstack
//! definitions, components, copper primitives and padstack instances. All
//! lengths are meters and all angles are degrees.

use serde::{Deserialize, Serialize};

use crate::geometry::{ArcData, Point};
use crate::types::Exposure;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub design_name: String,
    /// Physical layers in stackup order, top first
    pub layers: Vec<LayoutLayer>,
    pub materials: Vec<Material>,
    pub padstack_defs: Vec<PadstackData>,
    pub components: Vec<LayoutComponent>,
    pub primitives: Vec<Primitive>,
    pub padstack_instances: Vec<LayoutPadstackInstance>,
    /// Board outline arc list
    pub outline: Vec<ArcData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Conductor,
    Dielectric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutLayer {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub color: [u8; 3],
}

/// Electrical properties of a named material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub conductivity: Option<f64>,
    #[serde(default)]
    pub permittivity: Option<f64>,
    #[serde(default)]
    pub loss_tangent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleParams {
    pub diameter: f64,
    #[serde(default = "default_true")]
    pub plated: bool,
    #[serde(default)]
    pub plus_tol: f64,
    #[serde(default)]
    pub minus_tol: f64,
}

fn default_true() -> bool {
    true
}

/// Pad record as reported by the layout: a geometry discriminator
/// (`1=circle, 2=square, 3=rect, 4=oval`) and its parameter values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPad {
    pub kind: u8,
    #[serde(default)]
    pub params: Vec<f64>,
}

impl RawPad {
    pub fn geometry(&self) -> Option<PadGeometry> {
        PadGeometry::from_raw(self.kind, &self.params)
    }
}

/// Pad, antipad and thermal relief of one padstack on one layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerPads {
    pub layer: String,
    #[serde(default)]
    pub pad: Option<RawPad>,
    #[serde(default)]
    pub antipad: Option<RawPad>,
    #[serde(default)]
    pub thermal: Option<RawPad>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PadstackData {
    pub name: String,
    #[serde(default)]
    pub hole: Option<HoleParams>,
    #[serde(default)]
    pub pads: Vec<LayerPads>,
}

/// Closed set of pad shapes the exporter understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadGeometry {
    Circle { diameter: f64 },
    Rect { width: f64, height: f64 },
    Oval { major: f64, minor: f64, corner: f64 },
    Unsupported,
}

impl PadGeometry {
    /// Classify a raw pad record
    ///
    /// Returns `None` when the record carries no parameter values at all.
    pub fn from_raw(kind: u8, params: &[f64]) -> Option<Self> {
        let first = *params.first()?;
        let at = |i: usize| params.get(i).copied().unwrap_or(first);
        Some(match kind {
            1 => PadGeometry::Circle { diameter: first },
            2 => PadGeometry::Rect {
                width: first,
                height: first,
            },
            3 => PadGeometry::Rect {
                width: first,
                height: at(1),
            },
            4 => PadGeometry::Oval {
                major: first,
                minor: at(1),
                corner: params.get(2).copied().unwrap_or(0.0),
            },
            _ => PadGeometry::Unsupported,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    #[serde(alias = "IC")]
    Ic,
    #[serde(alias = "IO")]
    Io,
    #[default]
    Other,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "Resistor",
            ComponentKind::Capacitor => "Capacitor",
            ComponentKind::Inductor => "Inductor",
            ComponentKind::Ic => "IC",
            ComponentKind::Io => "IO",
            ComponentKind::Other => "Other",
        }
    }

    /// Resistors, capacitors and inductors carry a value
    pub fn is_rlc(&self) -> bool {
        matches!(
            self,
            ComponentKind::Resistor | ComponentKind::Capacitor | ComponentKind::Inductor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).abs()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPin {
    pub name: String,
    #[serde(default)]
    pub net: String,
    /// Absolute board position
    pub position: Point,
    pub padstack_def: String,
    /// Rotation relative to the component
    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutComponent {
    pub refdes: String,
    pub part_name: String,
    #[serde(default)]
    pub kind: ComponentKind,
    #[serde(default)]
    pub value: Option<String>,
    pub center: Point,
    #[serde(default)]
    pub rotation: f64,
    pub placement_layer: String,
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub pins: Vec<LayoutPin>,
}

/// Copper primitive on one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Polygon {
        layer: String,
        #[serde(default)]
        net: String,
        arcs: Vec<ArcData>,
        #[serde(default)]
        voids: Vec<Vec<ArcData>>,
    },
    Path {
        layer: String,
        #[serde(default)]
        net: String,
        width: f64,
        arcs: Vec<ArcData>,
    },
}

impl Primitive {
    pub fn layer(&self) -> &str {
        match self {
            Primitive::Polygon { layer, .. } | Primitive::Path { layer, .. } => layer,
        }
    }

    pub fn net(&self) -> &str {
        match self {
            Primitive::Polygon { net, .. } | Primitive::Path { net, .. } => net,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPadstackInstance {
    #[serde(default)]
    pub name: String,
    pub padstack_def: String,
    #[serde(default)]
    pub net: String,
    pub position: Point,
    /// Pin rotation relative to its component, or absolute for vias
    #[serde(default)]
    pub rotation: f64,
    pub start_layer: String,
    pub stop_layer: String,
    /// Owning component reference designator, set for component pins
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub exposure: Exposure,
}

impl LayoutPadstackInstance {
    pub fn is_pin(&self) -> bool {
        self.component.is_some()
    }

    pub fn spans_layers(&self) -> bool {
        self.start_layer != self.stop_layer
    }

    /// A padstack instance spanning layers that does not belong to a component
    pub fn is_via(&self) -> bool {
        !self.is_pin() && self.spans_layers()
    }
}

impl Layout {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Conductor layer names in stackup order
    pub fn signal_layers(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|l| l.kind == LayerKind::Conductor)
            .map(|l| l.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_raw_pads() {
        assert_eq!(
            PadGeometry::from_raw(1, &[0.5e-3]),
            Some(PadGeometry::Circle { diameter: 0.5e-3 })
        );
        assert_eq!(
            PadGeometry::from_raw(2, &[1.0]),
            Some(PadGeometry::Rect {
                width: 1.0,
                height: 1.0
            })
        );
        assert_eq!(
            PadGeometry::from_raw(3, &[1.0, 2.0]),
            Some(PadGeometry::Rect {
                width: 1.0,
                height: 2.0
            })
        );
        assert_eq!(
            PadGeometry::from_raw(4, &[2.0, 1.0, 0.5]),
            Some(PadGeometry::Oval {
                major: 2.0,
                minor: 1.0,
                corner: 0.5
            })
        );
        assert_eq!(
            PadGeometry::from_raw(9, &[1.0]),
            Some(PadGeometry::Unsupported)
        );
    }

    #[test]
    fn pad_without_parameters_is_skipped() {
        assert_eq!(PadGeometry::from_raw(1, &[]), None);
        assert_eq!(PadGeometry::from_raw(7, &[]), None);
    }

    #[test]
    fn instance_kinds() {
        let via = LayoutPadstackInstance {
            name: "V1".into(),
            padstack_def: "VIA".into(),
            net: "GND".into(),
            position: Point::default(),
            rotation: 0.0,
            start_layer: "TOP".into(),
            stop_layer: "BOTTOM".into(),
            component: None,
            pin: None,
            exposure: Exposure::default(),
        };
        assert!(via.is_via());
        assert!(!via.is_pin());

        let pin = LayoutPadstackInstance {
            component: Some("R1".into()),
            pin: Some("1".into()),
            stop_layer: "TOP".into(),
            ..via.clone()
        };
        assert!(pin.is_pin());
        assert!(!pin.is_via());
    }

    #[test]
    fn malformed_json_is_a_layout_error() {
        let err = Layout::from_json("{ \"layers\": ").unwrap_err();
        assert!(matches!(err, crate::ExportError::Layout(_)));
    }

    #[test]
    fn parse_minimal_json() {
        let layout = Layout::from_json(
            r#"{
                "design_name": "demo",
                "layers": [
                    {"name": "TOP", "kind": "conductor", "thickness": 3.5e-5},
                    {"name": "CORE", "kind": "dielectric", "material": "FR4", "thickness": 1.5e-3},
                    {"name": "BOTTOM", "kind": "conductor", "thickness": 3.5e-5}
                ],
                "primitives": [
                    {"type": "path", "layer": "TOP", "net": "N1", "width": 1e-4,
                     "arcs": [{"start": {"x": 0, "y": 0}, "end": {"x": 1e-3, "y": 0}}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(layout.signal_layers(), vec!["TOP", "BOTTOM"]);
        assert_eq!(layout.primitives[0].net(), "N1");
        assert_eq!(layout.primitives[0].layer(), "TOP");
    }
}
