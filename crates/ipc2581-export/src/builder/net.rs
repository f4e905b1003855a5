use log::debug;

use super::{DocumentBuilder, Stage};
use crate::Result;
use crate::layout::{LayoutComponent, LayoutPadstackInstance};
use crate::types::{LogicalNet, NetNode, PhyNet, PhyNetGroup, PhyNetPoint, PinRef};

impl DocumentBuilder {
    /// Logical net from every component pin attached to `net`, in
    /// encounter order
    pub fn add_logical_net(&mut self, net: &str, components: &[LayoutComponent]) -> Result<()> {
        self.enter(Stage::LogicalNets)?;
        let pin_refs = components
            .iter()
            .flat_map(|c| {
                c.pins.iter().filter(|p| p.net == net).map(|p| PinRef {
                    component_ref: c.refdes.clone(),
                    pin: p.name.clone(),
                })
            })
            .collect();
        self.step.logical_nets.push(LogicalNet {
            name: net.to_owned(),
            pin_refs,
        });
        Ok(())
    }

    /// Physical net points for every padstack instance on `net`
    pub fn add_phy_net(&mut self, net: &str, instances: &[LayoutPadstackInstance]) -> Result<()> {
        self.enter(Stage::PhysicalNets)?;
        let points: Vec<PhyNetPoint> = instances
            .iter()
            .filter(|i| i.net == net)
            .map(|instance| {
                let via = instance.is_via();
                PhyNetPoint {
                    x: instance.position.x,
                    y: instance.position.y,
                    layer_ref: instance.start_layer.clone(),
                    net_node: if via { NetNode::Middle } else { NetNode::End },
                    exposure: instance.exposure,
                    via,
                    primitive_ref: self
                        .step
                        .padstack_defs
                        .get(&instance.padstack_def)
                        .and_then(|def| def.primitive_on(&instance.start_layer))
                        .map(str::to_owned),
                }
            })
            .collect();
        if points.is_empty() {
            debug!("Net {net} has no padstack instances, no physical net");
            return Ok(());
        }

        let name = format!("{}_PHYNETS", self.step.name);
        let group = self.step.phy_net_group.get_or_insert_with(|| PhyNetGroup {
            name,
            phy_nets: Vec::new(),
        });
        group.phy_nets.push(PhyNet {
            name: net.to_owned(),
            points,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::layout::{ComponentKind, LayoutPin};
    use crate::options::ExportOptions;
    use crate::types::Exposure;

    fn pin(name: &str, net: &str) -> LayoutPin {
        LayoutPin {
            name: name.into(),
            net: net.into(),
            position: Point::default(),
            padstack_def: "SMD".into(),
            rotation: 0.0,
        }
    }

    fn component(refdes: &str, pins: Vec<LayoutPin>) -> LayoutComponent {
        LayoutComponent {
            refdes: refdes.into(),
            part_name: "PART".into(),
            kind: ComponentKind::Other,
            value: None,
            center: Point::default(),
            rotation: 0.0,
            placement_layer: "TOP".into(),
            bbox: Default::default(),
            height: None,
            pins,
        }
    }

    fn instance(name: &str, net: &str, component: Option<&str>, stop: &str) -> LayoutPadstackInstance {
        LayoutPadstackInstance {
            name: name.into(),
            padstack_def: "SMD".into(),
            net: net.into(),
            position: Point::new(1e-3, 2e-3),
            rotation: 0.0,
            start_layer: "TOP".into(),
            stop_layer: stop.into(),
            component: component.map(Into::into),
            pin: component.map(|_| name.into()),
            exposure: Exposure::default(),
        }
    }

    #[test]
    fn logical_net_pin_refs_in_encounter_order() {
        let components = vec![
            component("R1", vec![pin("1", "VCC"), pin("2", "GND")]),
            component("C1", vec![pin("1", "GND"), pin("2", "VCC")]),
        ];
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.add_logical_net("GND", &components).unwrap();

        let net = &builder.step.logical_nets[0];
        let refs: Vec<_> = net
            .pin_refs
            .iter()
            .map(|r| (r.component_ref.as_str(), r.pin.as_str()))
            .collect();
        assert_eq!(refs, vec![("R1", "2"), ("C1", "1")]);
    }

    #[test]
    fn phy_net_nodes() {
        let instances = vec![
            instance("1", "GND", Some("R1"), "TOP"),
            instance("V1", "GND", None, "BOTTOM"),
            instance("2", "VCC", Some("R1"), "TOP"),
        ];
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.add_phy_net("GND", &instances).unwrap();
        builder.add_phy_net("NC", &instances).unwrap();

        let group = builder.step.phy_net_group.as_ref().unwrap();
        assert_eq!(group.phy_nets.len(), 1);
        let points = &group.phy_nets[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].net_node, NetNode::End);
        assert!(!points[0].via);
        assert_eq!(points[1].net_node, NetNode::Middle);
        assert!(points[1].via);
        assert_eq!(points[1].exposure, Exposure::Exposed);
        // no padstack definitions registered, so no primitive reference
        assert!(points[0].primitive_ref.is_none());
    }

    #[test]
    fn nets_after_features_are_rejected() {
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.enter(Stage::LayerFeatures).unwrap();
        assert!(builder.add_logical_net("GND", &[]).is_err());
    }
}
