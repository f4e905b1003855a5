/// Layer represents a physical or drill layer of the board
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub layer_function: LayerFunction,
    pub side: Side,
    pub polarity: Polarity,
    /// Layer range covered by a drill layer
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct Span {
    pub from_layer: String,
    pub to_layer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFunction {
    Conductor,
    DielPreg,
    Drill,
}

impl LayerFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerFunction::Conductor => "CONDUCTOR",
            LayerFunction::DielPreg => "DIELPREG",
            LayerFunction::Drill => "DRILL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Internal,
    All,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "TOP",
            Side::Bottom => "BOTTOM",
            Side::Internal => "INTERNAL",
            Side::All => "ALL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "POSITIVE",
        }
    }
}

/// Spec entry of the CadHeader: material and electrical properties of a layer
#[derive(Debug, Clone, Default)]
pub struct Spec {
    pub name: String,
    pub material: Option<String>,
    pub conductivity: Option<f64>,
    pub dielectric_constant: Option<f64>,
    pub loss_tangent: Option<f64>,
}

/// Stackup defines the layer stack with overall thickness
#[derive(Debug, Clone, Default)]
pub struct Stackup {
    pub name: String,
    pub overall_thickness: f64,
    pub layers: Vec<StackupLayer>,
}

#[derive(Debug, Clone)]
pub struct StackupLayer {
    pub layer_ref: String,
    pub thickness: f64,
    pub tol_plus: f64,
    pub tol_minus: f64,
    pub sequence: u32,
    pub spec_ref: String,
}
