/// PadStackDef defines a padstack (hole plus pads per layer)
#[derive(Debug, Clone)]
pub struct PadStackDef {
    pub name: String,
    pub hole_def: Option<PadstackHoleDef>,
    pub pad_defs: Vec<PadstackPadDef>,
}

impl PadStackDef {
    /// Pad definitions on `layer`, in insertion order
    pub fn pads_on<'a>(&'a self, layer: &str) -> impl Iterator<Item = &'a PadstackPadDef> {
        self.pad_defs.iter().filter(move |p| p.layer_ref == layer)
    }

    pub fn has_layer(&self, layer: &str) -> bool {
        self.pads_on(layer).next().is_some()
    }

    /// Primitive used for copper on `layer`: the regular pad, else any other
    /// pad use defined there
    pub fn primitive_on(&self, layer: &str) -> Option<&str> {
        self.pads_on(layer)
            .find(|p| p.pad_use == PadUse::Regular)
            .or_else(|| self.pads_on(layer).next())
            .map(|p| p.primitive_ref.as_str())
    }
}

/// Drill hole of a padstack, diameter and tolerances in meters
#[derive(Debug, Clone)]
pub struct PadstackHoleDef {
    pub name: String,
    pub diameter: f64,
    pub plating_status: PlatingStatus,
    pub plus_tol: f64,
    pub minus_tol: f64,
}

#[derive(Debug, Clone)]
pub struct PadstackPadDef {
    pub layer_ref: String,
    pub pad_use: PadUse,
    pub primitive_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatingStatus {
    Plated,
    NonPlated,
    Via,
}

impl PlatingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatingStatus::Plated => "PLATED",
            PlatingStatus::NonPlated => "NONPLATED",
            PlatingStatus::Via => "VIA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadUse {
    Regular,
    Antipad,
    Thermal,
}

impl PadUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            PadUse::Regular => "REGULAR",
            PadUse::Antipad => "ANTIPAD",
            PadUse::Thermal => "THERMAL",
        }
    }
}
