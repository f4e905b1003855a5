//! Staged document assembly
//!
//! Stages must be entered in order because later stages reference
//! dictionary ids and definitions created by earlier ones. Re-entering the
//! current stage is allowed; going back to an earlier one is an error.

mod bom;
mod component;
mod feature;
mod net;
mod padstack;
mod stackup;

use indexmap::IndexSet;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::diagnostics::{Diagnostic, SkipReason};
use crate::geometry::{ArcData, Polygon};
use crate::layout::{Layout, LayoutComponent};
use crate::options::ExportOptions;
use crate::types::*;
use crate::{ExportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Layers,
    Bom,
    PadstackDefs,
    Profile,
    Components,
    LogicalNets,
    PhysicalNets,
    LayerFeatures,
    Drills,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Layers => "layers",
            Stage::Bom => "bom",
            Stage::PadstackDefs => "padstack-defs",
            Stage::Profile => "profile",
            Stage::Components => "components",
            Stage::LogicalNets => "logical-nets",
            Stage::PhysicalNets => "physical-nets",
            Stage::LayerFeatures => "layer-features",
            Stage::Drills => "drills",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds an [`Ipc2581`] document one stage at a time
pub struct DocumentBuilder {
    options: ExportOptions,
    design_name: String,
    stage: Option<Stage>,
    /// Stages that produce their section in one call
    completed: HashSet<Stage>,
    dictionaries: Dictionaries,
    layers: Vec<Layer>,
    specs: Vec<Spec>,
    stackup: Stackup,
    /// Conductor layers in stackup order
    signal_layers: Vec<String>,
    drill_layer: Option<String>,
    bom: Bom,
    step: Step,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentBuilder {
    pub fn new(design_name: &str, options: &ExportOptions) -> Self {
        let step_name = options
            .step_name
            .clone()
            .unwrap_or_else(|| design_name.to_owned());
        Self {
            options: options.clone(),
            design_name: design_name.to_owned(),
            stage: None,
            completed: HashSet::new(),
            dictionaries: Dictionaries::new(options.units),
            layers: Vec::new(),
            specs: Vec::new(),
            stackup: Stackup::default(),
            signal_layers: Vec::new(),
            drill_layer: None,
            bom: Bom::default(),
            step: Step::new(step_name),
            diagnostics: Vec::new(),
        }
    }

    /// Move to `stage`, rejecting a step backwards
    pub fn enter(&mut self, stage: Stage) -> Result<()> {
        if let Some(current) = self.stage
            && stage < current
        {
            return Err(ExportError::StageOrder {
                current,
                requested: stage,
            });
        }
        if self.stage != Some(stage) {
            debug!("Entering stage {stage}");
        }
        self.stage = Some(stage);
        Ok(())
    }

    /// Like [`enter`](Self::enter), for stages that must run exactly once
    fn enter_once(&mut self, stage: Stage) -> Result<()> {
        self.enter(stage)?;
        if !self.completed.insert(stage) {
            return Err(ExportError::StageRepeated(stage));
        }
        Ok(())
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn signal_layers(&self) -> &[String] {
        &self.signal_layers
    }

    pub fn drill_layer(&self) -> Option<&str> {
        self.drill_layer.as_deref()
    }

    fn record(&mut self, reason: SkipReason) {
        let stage = self.stage.unwrap_or(Stage::Layers);
        warn!("Skipping item in {stage} stage: {reason}");
        self.diagnostics.push(Diagnostic { stage, reason });
    }

    fn top_layer(&self) -> Option<&str> {
        self.signal_layers.first().map(String::as_str)
    }

    fn bottom_layer(&self) -> Option<&str> {
        self.signal_layers.last().map(String::as_str)
    }

    /// Whether a placement on `layer` is mirrored
    fn is_bottom(&self, layer: &str) -> bool {
        self.signal_layers.len() > 1 && self.bottom_layer() == Some(layer)
    }

    /// The other outer layer for `layer`, or `layer` itself when it is inner
    fn opposite_outer(&self, layer: &str) -> Option<&str> {
        match (self.top_layer(), self.bottom_layer()) {
            (Some(top), Some(bottom)) if layer == top => Some(bottom),
            (Some(top), Some(bottom)) if layer == bottom => Some(top),
            _ => None,
        }
    }

    /// Board outline from the layout's arc list
    pub fn add_profile(&mut self, outline: &[ArcData]) -> Result<()> {
        self.enter_once(Stage::Profile)?;
        let polygon = Polygon::from_arcs(outline);
        if polygon.is_empty() {
            self.record(SkipReason::EmptyArcList {
                what: "board outline".to_owned(),
            });
            return Ok(());
        }
        let line_desc_ref = self.dictionaries.line_desc.intern(0.0);
        self.step.profile = Some(Profile {
            polygon,
            line_desc_ref,
        });
        Ok(())
    }

    /// Finish assembly and hand back the document plus all diagnostics
    pub fn finish(self) -> Result<(Ipc2581, Vec<Diagnostic>)> {
        if self.signal_layers.is_empty() {
            return Err(ExportError::NoConductorLayers);
        }

        let options = &self.options;
        let timestamp = options.timestamp();
        let layer_refs = self.layers.iter().map(|l| l.name.clone()).collect();

        let content = Content {
            role_ref: "Owner".to_owned(),
            function_mode: FunctionMode {
                mode: options.mode,
                level: options.level,
            },
            step_ref: self.step.name.clone(),
            layer_refs,
            bom_ref: self.bom.name.clone(),
            dictionaries: self.dictionaries,
        };

        let logistic_header = LogisticHeader {
            role: Role {
                id: "Owner".to_owned(),
                role_function: "SENDER".to_owned(),
            },
            enterprise: Enterprise {
                id: options.enterprise.clone(),
                code: "UNKNOWN".to_owned(),
            },
            person: Person {
                name: options.person.clone(),
                enterprise_ref: options.enterprise.clone(),
                role_ref: "Owner".to_owned(),
            },
        };

        let history_record = HistoryRecord {
            number: 1,
            origination: timestamp.clone(),
            software: options.software_name.clone(),
            last_change: timestamp,
            file_revision: FileRevision {
                file_revision_id: "1".to_owned(),
                comment: "Initial export".to_owned(),
                software_package: SoftwarePackage {
                    name: options.software_name.clone(),
                    revision: options.software_revision.clone(),
                    vendor: options.vendor.clone(),
                    certification_status: "SELFTEST".to_owned(),
                },
            },
        };

        let document = Ipc2581 {
            revision: options.revision.clone(),
            content,
            logistic_header,
            history_record,
            bom: self.bom,
            ecad: Ecad {
                name: self.design_name,
                cad_header: CadHeader {
                    units: options.units,
                    specs: self.specs,
                },
                cad_data: CadData {
                    layers: self.layers,
                    stackup: self.stackup,
                    step: self.step,
                },
            },
        };
        Ok((document, self.diagnostics))
    }
}

/// Distinct net names in first-seen order: component pins, then copper,
/// then padstack instances
pub fn net_names(layout: &Layout) -> IndexSet<&str> {
    let pins = layout
        .components
        .iter()
        .flat_map(|c| c.pins.iter().map(|p| p.net.as_str()));
    let primitives = layout.primitives.iter().map(|p| p.net());
    let instances = layout.padstack_instances.iter().map(|i| i.net.as_str());
    pins.chain(primitives)
        .chain(instances)
        .filter(|n| !n.is_empty())
        .collect()
}

/// Run every stage over `layout` in order
pub fn assemble(layout: &Layout, options: &ExportOptions) -> Result<(Ipc2581, Vec<Diagnostic>)> {
    let mut builder = DocumentBuilder::new(&layout.design_name, options);

    builder.add_layers(&layout.layers, &layout.materials)?;
    builder.add_bom(&layout.components)?;
    for padstack in &layout.padstack_defs {
        builder.add_padstack_definition(padstack)?;
    }
    builder.add_profile(&layout.outline)?;
    for component in &layout.components {
        builder.add_component(component)?;
    }

    let nets = net_names(layout);
    for net in &nets {
        builder.add_logical_net(net, &layout.components)?;
    }
    for net in &nets {
        builder.add_phy_net(net, &layout.padstack_instances)?;
    }

    let components: HashMap<&str, &LayoutComponent> = layout
        .components
        .iter()
        .map(|c| (c.refdes.as_str(), c))
        .collect();
    let instances = builder.resolvable_instances(&layout.padstack_instances, &components)?;
    for primitive in &layout.primitives {
        if !builder.signal_layers.iter().any(|l| l == primitive.layer()) {
            builder.record(SkipReason::UnknownLayer(primitive.layer().to_owned()));
        }
    }
    for layer in builder.signal_layers.clone() {
        let primitives: Vec<_> = layout
            .primitives
            .iter()
            .filter(|p| p.layer() == layer)
            .collect();
        builder.add_layer_feature(&layer, &primitives, &instances, &components)?;
    }
    builder.add_drill_features(&instances)?;

    debug!(
        "Assembled {}: {} padstacks, {} packages, {} components, {} nets, {} diagnostics",
        layout.design_name,
        builder.step.padstack_defs.len(),
        builder.step.packages.len(),
        builder.step.components.len(),
        builder.step.logical_nets.len(),
        builder.diagnostics.len()
    );
    builder.finish()
}
