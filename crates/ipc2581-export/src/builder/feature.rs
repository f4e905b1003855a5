use log::debug;
use std::collections::HashMap;

use super::{DocumentBuilder, Stage};
use crate::Result;
use crate::diagnostics::SkipReason;
use crate::geometry::{PolyChain, Polygon, Polyline};
use crate::layout::{LayoutComponent, LayoutPadstackInstance, Primitive};
use crate::types::{Feature, Hole, LayerFeature, PadFeature, PinRef, PlatingStatus, Xform};
use crate::units::normalize_degrees;

type SkipResult<T> = std::result::Result<T, SkipReason>;

impl DocumentBuilder {
    /// Instances whose padstack definition and owning component resolve
    ///
    /// An instance that does not resolve is reported once here rather than
    /// once for every layer it would have been placed on.
    pub fn resolvable_instances<'a>(
        &mut self,
        instances: &'a [LayoutPadstackInstance],
        components: &HashMap<&str, &LayoutComponent>,
    ) -> Result<Vec<&'a LayoutPadstackInstance>> {
        self.enter(Stage::LayerFeatures)?;
        let mut resolved = Vec::with_capacity(instances.len());
        for instance in instances {
            match self.check_instance(instance, components) {
                Ok(()) => resolved.push(instance),
                Err(reason) => self.record(reason),
            }
        }
        Ok(resolved)
    }

    fn check_instance(
        &self,
        instance: &LayoutPadstackInstance,
        components: &HashMap<&str, &LayoutComponent>,
    ) -> SkipResult<()> {
        if !self.step.padstack_defs.contains_key(&instance.padstack_def) {
            return Err(SkipReason::UnknownPadstack(instance.padstack_def.clone()));
        }
        if let Some(refdes) = &instance.component
            && !components.contains_key(refdes.as_str())
        {
            return Err(SkipReason::UnknownComponent(refdes.clone()));
        }
        Ok(())
    }

    /// Copper polygons, traces and padstack instances of one conductor layer
    pub fn add_layer_feature(
        &mut self,
        layer: &str,
        primitives: &[&Primitive],
        instances: &[&LayoutPadstackInstance],
        components: &HashMap<&str, &LayoutComponent>,
    ) -> Result<()> {
        self.enter(Stage::LayerFeatures)?;
        let mut layer_feature = LayerFeature::new(layer, false);

        for primitive in primitives {
            let feature = self.primitive_feature(layer, primitive);
            layer_feature.features.push(feature);
        }

        for instance in instances {
            match self.pad_feature(layer, instance, components) {
                Ok(Some(pad)) => layer_feature.features.push(Feature::Pad(pad)),
                Ok(None) => {}
                Err(reason) => self.record(reason),
            }
        }

        debug!(
            "Layer {layer}: {} features",
            layer_feature.features.len()
        );
        self.step.layer_features.push(layer_feature);
        Ok(())
    }

    fn primitive_feature(&mut self, layer: &str, primitive: &Primitive) -> Feature {
        match primitive {
            Primitive::Polygon {
                net, arcs, voids, ..
            } => {
                let mut polygon = Polygon::from_arcs(arcs);
                if polygon.is_empty() {
                    self.record(SkipReason::EmptyArcList {
                        what: format!("polygon on net '{net}' on layer {layer}"),
                    });
                }
                for void in voids {
                    if !polygon.add_cutout(void) {
                        self.record(SkipReason::EmptyArcList {
                            what: format!("void of polygon on net '{net}' on layer {layer}"),
                        });
                    }
                }
                Feature::Polygon {
                    net: net.clone(),
                    polygon,
                }
            }
            Primitive::Path {
                net, width, arcs, ..
            } => {
                let chain = PolyChain::from_arcs(arcs);
                if chain.is_empty() {
                    self.record(SkipReason::EmptyArcList {
                        what: format!("path on net '{net}' on layer {layer}"),
                    });
                }
                let line_desc_ref = self.dictionaries.line_desc.intern(*width);
                Feature::Path {
                    net: net.clone(),
                    polyline: Polyline {
                        chain,
                        line_desc_ref,
                    },
                }
            }
        }
    }

    /// Pad of `instance` on `layer`, `None` when the instance has no copper
    /// there
    fn pad_feature(
        &self,
        layer: &str,
        instance: &LayoutPadstackInstance,
        components: &HashMap<&str, &LayoutComponent>,
    ) -> SkipResult<Option<PadFeature>> {
        let def = self
            .step
            .padstack_defs
            .get(&instance.padstack_def)
            .ok_or_else(|| SkipReason::UnknownPadstack(instance.padstack_def.clone()))?;

        let Some(refdes) = &instance.component else {
            let Some(primitive_ref) = def.primitive_on(layer) else {
                return Ok(None);
            };
            return Ok(Some(PadFeature {
                net: instance.net.clone(),
                padstack_def_ref: def.name.clone(),
                location: instance.position,
                xform: Xform {
                    rotation: normalize_degrees(instance.rotation),
                    mirror: false,
                },
                primitive_ref: primitive_ref.to_owned(),
                pin_ref: None,
                via: instance.is_via(),
            }));
        };

        let component = components
            .get(refdes.as_str())
            .ok_or_else(|| SkipReason::UnknownComponent(refdes.clone()))?;
        let mirror = self.is_bottom(&component.placement_layer);

        // Pads of a mirrored part are defined on the opposite outer layer
        // unless the padstack already has copper on the placement layer.
        let lookup = if mirror && !def.has_layer(&component.placement_layer) {
            self.opposite_outer(layer).unwrap_or(layer)
        } else {
            layer
        };
        let Some(primitive_ref) = def.primitive_on(lookup) else {
            return Ok(None);
        };

        Ok(Some(PadFeature {
            net: instance.net.clone(),
            padstack_def_ref: def.name.clone(),
            location: instance.position,
            xform: Xform {
                rotation: normalize_degrees(component.rotation + instance.rotation),
                mirror,
            },
            primitive_ref: primitive_ref.to_owned(),
            pin_ref: Some(PinRef {
                component_ref: refdes.clone(),
                pin: instance.pin.clone().unwrap_or_else(|| instance.name.clone()),
            }),
            via: false,
        }))
    }

    /// Holes of every instance that spans layers, on the drill layer
    pub fn add_drill_features(&mut self, instances: &[&LayoutPadstackInstance]) -> Result<()> {
        self.enter_once(Stage::Drills)?;
        let Some(drill_layer) = self.drill_layer.clone() else {
            return Ok(());
        };
        let mut layer_feature = LayerFeature::new(drill_layer, true);

        for instance in instances.iter().filter(|i| i.spans_layers()) {
            let index = layer_feature.features.len() + 1;
            match self.hole(instance, index) {
                Ok(hole) => layer_feature.features.push(Feature::Drill(hole)),
                Err(reason) => self.record(reason),
            }
        }

        debug!("{} drill holes", layer_feature.features.len());
        self.step.layer_features.push(layer_feature);
        Ok(())
    }

    fn hole(&self, instance: &LayoutPadstackInstance, index: usize) -> SkipResult<Hole> {
        let def = self
            .step
            .padstack_defs
            .get(&instance.padstack_def)
            .ok_or_else(|| SkipReason::UnknownPadstack(instance.padstack_def.clone()))?;
        let hole_def = def
            .hole_def
            .as_ref()
            .ok_or_else(|| SkipReason::MissingHoleParameters {
                padstack: def.name.clone(),
            })?;

        Ok(Hole {
            net: instance.net.clone(),
            name: if instance.name.is_empty() {
                format!("H{index}")
            } else {
                instance.name.clone()
            },
            diameter: hole_def.diameter,
            plating_status: if instance.is_via() {
                PlatingStatus::Via
            } else {
                hole_def.plating_status
            },
            plus_tol: hole_def.plus_tol,
            minus_tol: hole_def.minus_tol,
            location: instance.position,
        })
    }
}
