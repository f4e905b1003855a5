use log::debug;

use super::{DocumentBuilder, Stage};
use crate::Result;
use crate::diagnostics::SkipReason;
use crate::geometry::{Point, PolyChain, Polygon};
use crate::layout::{LayoutComponent, LayoutPin};
use crate::types::{
    Component, MountType, Package, PackagePin, PinOneOrientation, PinType, Xform,
};
use crate::units::normalize_degrees;

/// Whether a rotation turns the package a quarter turn relative to the board
fn is_quarter_turn(rotation: f64) -> bool {
    let r = normalize_degrees(rotation) % 180.0;
    (45.0..=135.0).contains(&r)
}

/// Express an absolute board point in a component's package frame
fn to_package_frame(point: Point, component: &LayoutComponent, mirror: bool) -> Point {
    let local = (point - component.center).rotated(-component.rotation);
    if mirror { local.mirrored_x() } else { local }
}

impl DocumentBuilder {
    /// Place a component, synthesizing its package on first use of the part
    pub fn add_component(&mut self, component: &LayoutComponent) -> Result<()> {
        self.enter(Stage::Components)?;
        let mirror = self.is_bottom(&component.placement_layer);

        if !self.step.packages.contains_key(&component.part_name) {
            let package = self.synthesize_package(component, mirror);
            debug!(
                "Package {} with {} pins",
                package.name,
                package.pins.len()
            );
            self.step
                .packages
                .insert(component.part_name.clone(), package);
        }

        let mount_type = self.mount_type(component);
        self.step.components.push(Component {
            ref_des: component.refdes.clone(),
            package_ref: component.part_name.clone(),
            layer_ref: component.placement_layer.clone(),
            part: component.part_name.clone(),
            mount_type,
            location: component.center,
            xform: Xform {
                rotation: normalize_degrees(component.rotation),
                mirror,
            },
            value: component
                .value
                .clone()
                .filter(|_| component.kind.is_rlc()),
        });
        Ok(())
    }

    fn synthesize_package(&mut self, component: &LayoutComponent, mirror: bool) -> Package {
        let bbox = &component.bbox;
        let (width, height) = if is_quarter_turn(component.rotation) {
            (bbox.height(), bbox.width())
        } else {
            (bbox.width(), bbox.height())
        };
        let center = to_package_frame(bbox.center(), component, mirror);
        let outline = Polygon {
            outline: PolyChain::rectangle(center, width, height),
            cutouts: Vec::new(),
        };
        let line_desc_ref = self.dictionaries.line_desc.intern(0.0);

        let pins = component
            .pins
            .iter()
            .map(|pin| self.package_pin(component, pin, mirror))
            .collect();

        Package {
            name: component.part_name.clone(),
            package_type: "OTHER".to_owned(),
            pin_one: component.pins.first().map(|p| p.name.clone()),
            pin_one_orientation: PinOneOrientation::Other,
            height: component.height,
            assembly_drawing: outline.clone(),
            outline,
            line_desc_ref,
            pins,
        }
    }

    fn package_pin(&mut self, component: &LayoutComponent, pin: &LayoutPin, mirror: bool) -> PackagePin {
        let mut package_pin = PackagePin {
            number: pin.name.clone(),
            location: to_package_frame(pin.position, component, mirror),
            rotation: normalize_degrees(pin.rotation),
            pin_type: PinType::Surface,
            primitive_ref: None,
        };

        let Some(def) = self.step.padstack_defs.get(&pin.padstack_def) else {
            self.record(SkipReason::UnknownPadstack(pin.padstack_def.clone()));
            return package_pin;
        };
        if def.hole_def.is_some() {
            package_pin.pin_type = PinType::Thru;
        }

        let layer = component.placement_layer.as_str();
        let primitive = def.primitive_on(layer).or_else(|| {
            self.opposite_outer(layer)
                .and_then(|other| def.primitive_on(other))
        });
        match primitive {
            Some(id) => package_pin.primitive_ref = Some(id.to_owned()),
            None => {
                let reason = SkipReason::NoPadOnLayer {
                    padstack: pin.padstack_def.clone(),
                    layer: layer.to_owned(),
                };
                self.record(reason);
            }
        }
        package_pin
    }

    fn mount_type(&self, component: &LayoutComponent) -> MountType {
        if component.pins.is_empty() {
            return MountType::Other;
        }
        let through = component.pins.iter().any(|pin| {
            self.step
                .padstack_defs
                .get(&pin.padstack_def)
                .is_some_and(|def| def.hole_def.is_some())
        });
        if through { MountType::Tht } else { MountType::Smt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BoundingBox, ComponentKind, LayerKind, LayerPads, LayoutLayer, PadstackData, RawPad};
    use crate::options::ExportOptions;

    fn builder() -> DocumentBuilder {
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        let layers = ["TOP", "BOTTOM"].map(|name| LayoutLayer {
            name: name.into(),
            kind: LayerKind::Conductor,
            material: None,
            thickness: 35e-6,
            color: [0, 0, 0],
        });
        builder.add_layers(&layers, &[]).unwrap();
        builder
            .add_padstack_definition(&PadstackData {
                name: "SMD".into(),
                hole: None,
                pads: vec![LayerPads {
                    layer: "TOP".into(),
                    pad: Some(RawPad {
                        kind: 1,
                        params: vec![0.5e-3],
                    }),
                    ..Default::default()
                }],
            })
            .unwrap();
        builder
    }

    fn resistor(refdes: &str, layer: &str, center: Point, rotation: f64) -> LayoutComponent {
        let offset = Point::new(0.75e-3, 0.0).rotated(rotation);
        let half = if is_quarter_turn(rotation) {
            Point::new(0.4e-3, 0.8e-3)
        } else {
            Point::new(0.8e-3, 0.4e-3)
        };
        LayoutComponent {
            refdes: refdes.into(),
            part_name: "R0603".into(),
            kind: ComponentKind::Resistor,
            value: Some("10k".into()),
            center,
            rotation,
            placement_layer: layer.into(),
            bbox: BoundingBox {
                min: center - half,
                max: center + half,
            },
            height: Some(0.5e-3),
            pins: vec![
                LayoutPin {
                    name: "1".into(),
                    net: "N1".into(),
                    position: center - offset,
                    padstack_def: "SMD".into(),
                    rotation: 0.0,
                },
                LayoutPin {
                    name: "2".into(),
                    net: "N2".into(),
                    position: center + offset,
                    padstack_def: "SMD".into(),
                    rotation: 0.0,
                },
            ],
        }
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn package_is_shared_between_placements() {
        let mut builder = builder();
        builder
            .add_component(&resistor("R1", "TOP", Point::new(10e-3, 5e-3), 0.0))
            .unwrap();
        builder
            .add_component(&resistor("R2", "TOP", Point::new(20e-3, 5e-3), 90.0))
            .unwrap();

        assert_eq!(builder.step.packages.len(), 1);
        assert_eq!(builder.step.components.len(), 2);

        let package = &builder.step.packages["R0603"];
        assert_eq!(package.pins.len(), 2);
        assert!(close(package.pins[0].location, Point::new(-0.75e-3, 0.0)));
        assert!(close(package.pins[1].location, Point::new(0.75e-3, 0.0)));
        assert_eq!(package.pins[0].primitive_ref.as_deref(), Some("CIRCLE_0.5"));
        assert_eq!(package.pins[0].pin_type, PinType::Surface);

        let r2 = &builder.step.components[1];
        assert_eq!(r2.xform.rotation, 90.0);
        assert!(!r2.xform.mirror);
        assert_eq!(r2.mount_type, MountType::Smt);
        assert_eq!(r2.value.as_deref(), Some("10k"));
    }

    #[test]
    fn quarter_turn_swaps_outline_extents() {
        let mut builder = builder();
        builder
            .add_component(&resistor("R1", "TOP", Point::new(0.0, 0.0), 90.0))
            .unwrap();
        let package = &builder.step.packages["R0603"];
        let chain = &package.outline.outline;
        let xs: Vec<f64> = chain.steps.iter().map(|s| s.end().x).collect();
        let width = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        assert!((width - 1.6e-3).abs() < 1e-9);
        assert_eq!(package.outline, package.assembly_drawing);
        assert_eq!(package.line_desc_ref, "ROUND_0");
    }

    #[test]
    fn quarter_turn_covers_both_directions() {
        for rotation in [45.0, 90.0, 135.0, 225.0, 270.0, 315.0, -90.0] {
            assert!(is_quarter_turn(rotation), "{rotation}");
        }
        for rotation in [0.0, 30.0, 150.0, 180.0, 200.0, 340.0, 359.99999999] {
            assert!(!is_quarter_turn(rotation), "{rotation}");
        }

        // 270 degrees lies outside [45, 135] but still swaps the extents
        let mut builder = builder();
        builder
            .add_component(&resistor("R1", "TOP", Point::new(0.0, 0.0), 270.0))
            .unwrap();
        let chain = &builder.step.packages["R0603"].outline.outline;
        let xs: Vec<f64> = chain.steps.iter().map(|s| s.end().x).collect();
        let width = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        assert!((width - 1.6e-3).abs() < 1e-9);
    }

    #[test]
    fn rotation_just_below_full_turn_wraps_to_zero() {
        let mut builder = builder();
        builder
            .add_component(&resistor("R1", "TOP", Point::default(), 359.99999999))
            .unwrap();
        assert_eq!(builder.step.components[0].xform.rotation, 0.0);
        assert!(builder.step.components[0].xform.is_identity());
    }

    #[test]
    fn bottom_placement_is_mirrored() {
        let mut builder = builder();
        builder
            .add_component(&resistor("R1", "BOTTOM", Point::new(5e-3, 5e-3), 0.0))
            .unwrap();
        let component = &builder.step.components[0];
        assert!(component.xform.mirror);

        // pad only defined on TOP, resolved through the opposite outer layer
        let package = &builder.step.packages["R0603"];
        assert!(close(package.pins[0].location, Point::new(0.75e-3, 0.0)));
        assert_eq!(package.pins[0].primitive_ref.as_deref(), Some("CIRCLE_0.5"));
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn unknown_padstack_is_reported() {
        let mut builder = builder();
        let mut component = resistor("R1", "TOP", Point::default(), 0.0);
        component.pins[1].padstack_def = "MISSING".into();
        builder.add_component(&component).unwrap();

        let package = &builder.step.packages["R0603"];
        assert_eq!(package.pins.len(), 2);
        assert!(package.pins[1].primitive_ref.is_none());
        assert_eq!(
            builder.diagnostics()[0].reason,
            SkipReason::UnknownPadstack("MISSING".into())
        );
    }

    #[test]
    fn non_rlc_value_is_omitted() {
        let mut builder = builder();
        let mut component = resistor("U1", "TOP", Point::default(), 0.0);
        component.kind = ComponentKind::Ic;
        builder.add_component(&component).unwrap();
        assert!(builder.step.components[0].value.is_none());
    }
}
