use indexmap::IndexMap;
use log::debug;

use super::{DocumentBuilder, Stage};
use crate::Result;
use crate::layout::LayoutComponent;
use crate::types::{
    BomCategory, BomItem, BomRefDes, Characteristics, TextualCharacteristic,
};

const DEFINITION_SOURCE: &str = "ECAD";

impl DocumentBuilder {
    /// One BOM item per part name, aggregating every placement of the part
    pub fn add_bom(&mut self, components: &[LayoutComponent]) -> Result<()> {
        self.enter_once(Stage::Bom)?;

        let mut parts: IndexMap<&str, Vec<&LayoutComponent>> = IndexMap::new();
        for component in components {
            parts
                .entry(component.part_name.as_str())
                .or_default()
                .push(component);
        }

        self.bom.name = format!("{}_BOM", self.design_name);
        for (part, instances) in parts {
            // pin count and characteristics come from the first placement
            let first = instances[0];
            let mut textuals = vec![TextualCharacteristic {
                definition_source: DEFINITION_SOURCE.to_owned(),
                name: "DEVICE_TYPE".to_owned(),
                value: first.kind.as_str().to_owned(),
            }];
            if first.kind.is_rlc()
                && let Some(value) = &first.value
            {
                textuals.push(TextualCharacteristic {
                    definition_source: DEFINITION_SOURCE.to_owned(),
                    name: "VALUE".to_owned(),
                    value: value.clone(),
                });
            }

            let ref_des_list = instances
                .iter()
                .map(|c| BomRefDes {
                    name: c.refdes.clone(),
                    package_ref: part.to_owned(),
                    populate: true,
                    layer_ref: c.placement_layer.clone(),
                })
                .collect();

            self.bom.items.push(BomItem {
                oem_design_number_ref: part.to_owned(),
                quantity: instances.len() as u32,
                pin_count: first.pins.len() as u32,
                category: BomCategory::Electrical,
                ref_des_list,
                characteristics: Characteristics {
                    category: BomCategory::Electrical,
                    textuals,
                },
            });
        }

        debug!("BOM has {} items", self.bom.items.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::layout::ComponentKind;
    use crate::options::ExportOptions;

    fn component(refdes: &str, part: &str, kind: ComponentKind, value: &str) -> LayoutComponent {
        LayoutComponent {
            refdes: refdes.into(),
            part_name: part.into(),
            kind,
            value: Some(value.into()),
            center: Point::default(),
            rotation: 0.0,
            placement_layer: "TOP".into(),
            bbox: Default::default(),
            height: None,
            pins: Vec::new(),
        }
    }

    #[test]
    fn aggregates_by_part_name() {
        let components = vec![
            component("R1", "RES_0603_10K", ComponentKind::Resistor, "10k"),
            component("U1", "MCU", ComponentKind::Ic, "STM32"),
            component("R2", "RES_0603_10K", ComponentKind::Resistor, "10k"),
            component("R3", "RES_0603_10K", ComponentKind::Resistor, "10k"),
        ];
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.add_bom(&components).unwrap();

        assert_eq!(builder.bom.items.len(), 2);
        let res = &builder.bom.items[0];
        assert_eq!(res.oem_design_number_ref, "RES_0603_10K");
        assert_eq!(res.quantity, 3);
        assert_eq!(res.ref_des_list.len(), 3);
        let names: Vec<_> = res.ref_des_list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["R1", "R2", "R3"]);
        assert!(
            res.characteristics
                .textuals
                .iter()
                .any(|t| t.name == "VALUE" && t.value == "10k")
        );

        // values are only carried for resistors, capacitors and inductors
        let mcu = &builder.bom.items[1];
        assert_eq!(mcu.quantity, 1);
        assert!(mcu.characteristics.textuals.iter().all(|t| t.name != "VALUE"));
    }
}
