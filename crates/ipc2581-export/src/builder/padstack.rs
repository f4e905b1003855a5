use log::debug;

use super::{DocumentBuilder, Stage};
use crate::Result;
use crate::diagnostics::SkipReason;
use crate::layout::{PadstackData, RawPad};
use crate::types::{
    PadStackDef, PadUse, PadstackHoleDef, PadstackPadDef, PlatingStatus, StandardShape,
};

impl DocumentBuilder {
    /// Register a padstack definition and the standard primitives its pads use
    ///
    /// A name that is already defined is left untouched.
    pub fn add_padstack_definition(&mut self, padstack: &PadstackData) -> Result<()> {
        self.enter(Stage::PadstackDefs)?;
        if self.step.padstack_defs.contains_key(&padstack.name) {
            debug!("Padstack {} already defined", padstack.name);
            return Ok(());
        }

        let hole_def = padstack.hole.as_ref().map(|hole| PadstackHoleDef {
            name: padstack.name.clone(),
            diameter: hole.diameter,
            plating_status: if hole.plated {
                PlatingStatus::Plated
            } else {
                PlatingStatus::NonPlated
            },
            plus_tol: hole.plus_tol,
            minus_tol: hole.minus_tol,
        });

        let mut pad_defs = Vec::new();
        for layer_pads in &padstack.pads {
            let uses = [
                (PadUse::Regular, &layer_pads.pad),
                (PadUse::Antipad, &layer_pads.antipad),
                (PadUse::Thermal, &layer_pads.thermal),
            ];
            for (pad_use, raw) in uses {
                let Some(raw) = raw else { continue };
                match self.intern_pad(&padstack.name, &layer_pads.layer, pad_use, raw) {
                    Ok(primitive_ref) => pad_defs.push(PadstackPadDef {
                        layer_ref: layer_pads.layer.clone(),
                        pad_use,
                        primitive_ref,
                    }),
                    Err(reason) => self.record(reason),
                }
            }
        }

        self.step.padstack_defs.insert(
            padstack.name.clone(),
            PadStackDef {
                name: padstack.name.clone(),
                hole_def,
                pad_defs,
            },
        );
        Ok(())
    }

    fn intern_pad(
        &mut self,
        padstack: &str,
        layer: &str,
        pad_use: PadUse,
        raw: &RawPad,
    ) -> std::result::Result<String, SkipReason> {
        let geometry = raw.geometry().ok_or_else(|| SkipReason::NoPadParameters {
            padstack: padstack.to_owned(),
            layer: layer.to_owned(),
            pad_use: pad_use.as_str(),
        })?;
        Ok(self
            .dictionaries
            .standard
            .intern(StandardShape::from(geometry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HoleParams, LayerPads};
    use crate::options::ExportOptions;
    use crate::types::DEFAULT_PRIMITIVE_ID;

    fn raw(kind: u8, params: &[f64]) -> Option<RawPad> {
        Some(RawPad {
            kind,
            params: params.to_vec(),
        })
    }

    #[test]
    fn classifies_pads_per_layer() {
        let padstack = PadstackData {
            name: "VIA_0.3".into(),
            hole: Some(HoleParams {
                diameter: 0.3e-3,
                plated: true,
                plus_tol: 0.0,
                minus_tol: 0.0,
            }),
            pads: vec![
                LayerPads {
                    layer: "TOP".into(),
                    pad: raw(1, &[0.6e-3]),
                    antipad: raw(1, &[0.9e-3]),
                    thermal: raw(2, &[]),
                },
                LayerPads {
                    layer: "BOTTOM".into(),
                    pad: raw(2, &[0.6e-3]),
                    antipad: None,
                    thermal: raw(4, &[1e-3, 0.5e-3, 0.0]),
                },
                LayerPads {
                    layer: "IN1".into(),
                    pad: raw(12, &[1.0e-3]),
                    antipad: None,
                    thermal: None,
                },
            ],
        };
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.add_padstack_definition(&padstack).unwrap();

        let def = &builder.step.padstack_defs["VIA_0.3"];
        let pads: Vec<_> = def
            .pad_defs
            .iter()
            .map(|p| (p.layer_ref.as_str(), p.pad_use, p.primitive_ref.as_str()))
            .collect();
        assert_eq!(
            pads,
            vec![
                ("TOP", PadUse::Regular, "CIRCLE_0.6"),
                ("TOP", PadUse::Antipad, "CIRCLE_0.9"),
                ("BOTTOM", PadUse::Regular, "RECT_0.6_0.6"),
                ("BOTTOM", PadUse::Thermal, "OVAL_1_0.5_0"),
                ("IN1", PadUse::Regular, DEFAULT_PRIMITIVE_ID),
            ]
        );
        assert_eq!(
            def.hole_def.as_ref().unwrap().plating_status,
            PlatingStatus::Plated
        );

        // the thermal entry without parameters is skipped and reported
        assert_eq!(builder.diagnostics().len(), 1);
        assert!(matches!(
            builder.diagnostics()[0].reason,
            SkipReason::NoPadParameters { pad_use: "THERMAL", .. }
        ));
    }

    #[test]
    fn redefinition_keeps_first() {
        let first = PadstackData {
            name: "P".into(),
            hole: None,
            pads: vec![LayerPads {
                layer: "TOP".into(),
                pad: raw(1, &[1e-3]),
                ..Default::default()
            }],
        };
        let second = PadstackData {
            pads: vec![LayerPads {
                layer: "TOP".into(),
                pad: raw(1, &[2e-3]),
                ..Default::default()
            }],
            ..first.clone()
        };
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        builder.add_padstack_definition(&first).unwrap();
        builder.add_padstack_definition(&second).unwrap();

        assert_eq!(builder.step.padstack_defs.len(), 1);
        assert_eq!(
            builder.step.padstack_defs["P"].primitive_on("TOP"),
            Some("CIRCLE_1")
        );
        assert_eq!(builder.dictionaries.standard.len(), 1);
    }
}
