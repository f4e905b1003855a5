use log::debug;
use std::collections::HashMap;

use super::{DocumentBuilder, Stage};
use crate::layout::{LayerKind, LayoutLayer, Material};
use crate::types::{
    Color, Layer, LayerFunction, Polarity, Side, Span, Spec, Stackup, StackupLayer,
};
use crate::{ExportError, Result};

impl DocumentBuilder {
    /// Layers, specs, stackup and colors for every physical layer, followed
    /// by the synthetic drill layer
    pub fn add_layers(&mut self, layers: &[LayoutLayer], materials: &[Material]) -> Result<()> {
        self.enter_once(Stage::Layers)?;

        let signal_layers: Vec<String> = layers
            .iter()
            .filter(|l| l.kind == LayerKind::Conductor)
            .map(|l| l.name.clone())
            .collect();
        let (Some(first), Some(last)) = (signal_layers.first(), signal_layers.last()) else {
            return Err(ExportError::NoConductorLayers);
        };
        let (first, last) = (first.clone(), last.clone());

        let materials: HashMap<&str, &Material> =
            materials.iter().map(|m| (m.name.as_str(), m)).collect();

        let mut stackup = Stackup {
            name: format!("{}_STACKUP", self.step.name),
            ..Default::default()
        };

        for (index, layer) in layers.iter().enumerate() {
            let spec_name = format!("SPEC_{}", layer.name);
            let material = layer
                .material
                .as_deref()
                .and_then(|name| materials.get(name).copied());
            let mut spec = Spec {
                name: spec_name.clone(),
                material: layer.material.clone(),
                ..Default::default()
            };

            let (layer_function, side) = match layer.kind {
                LayerKind::Conductor => {
                    spec.conductivity = material.and_then(|m| m.conductivity);
                    let side = if layer.name == first {
                        Side::Top
                    } else if layer.name == last {
                        Side::Bottom
                    } else {
                        Side::Internal
                    };
                    (LayerFunction::Conductor, side)
                }
                LayerKind::Dielectric => {
                    spec.dielectric_constant = material.and_then(|m| m.permittivity);
                    spec.loss_tangent = material.and_then(|m| m.loss_tangent);
                    (LayerFunction::DielPreg, Side::Internal)
                }
            };

            self.layers.push(Layer {
                name: layer.name.clone(),
                layer_function,
                side,
                polarity: Polarity::Positive,
                span: None,
            });
            self.dictionaries
                .color
                .insert(&layer.name, Color::from(layer.color));
            stackup.overall_thickness += layer.thickness;
            stackup.layers.push(StackupLayer {
                layer_ref: layer.name.clone(),
                thickness: layer.thickness,
                tol_plus: 0.0,
                tol_minus: 0.0,
                sequence: index as u32 + 1,
                spec_ref: spec_name,
            });
            self.specs.push(spec);
        }

        let drill_name = format!("DRILL_1-{}", signal_layers.len());
        self.layers.push(Layer {
            name: drill_name.clone(),
            layer_function: LayerFunction::Drill,
            side: Side::All,
            polarity: Polarity::Positive,
            span: Some(Span {
                from_layer: first,
                to_layer: last,
            }),
        });
        self.dictionaries.color.insert(&drill_name, Color::WHITE);

        debug!(
            "Stackup has {} layers ({} conductors), overall thickness {} m",
            layers.len(),
            signal_layers.len(),
            stackup.overall_thickness
        );
        self.stackup = stackup;
        self.signal_layers = signal_layers;
        self.drill_layer = Some(drill_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExportOptions;

    fn layer(name: &str, kind: LayerKind) -> LayoutLayer {
        LayoutLayer {
            name: name.into(),
            kind,
            material: Some(
                match kind {
                    LayerKind::Conductor => "COPPER",
                    LayerKind::Dielectric => "FR4",
                }
                .into(),
            ),
            thickness: match kind {
                LayerKind::Conductor => 35e-6,
                LayerKind::Dielectric => 200e-6,
            },
            color: [200, 100, 0],
        }
    }

    fn four_layer() -> Vec<LayoutLayer> {
        vec![
            layer("TOP", LayerKind::Conductor),
            layer("D1", LayerKind::Dielectric),
            layer("IN1", LayerKind::Conductor),
            layer("D2", LayerKind::Dielectric),
            layer("IN2", LayerKind::Conductor),
            layer("D3", LayerKind::Dielectric),
            layer("BOTTOM", LayerKind::Conductor),
        ]
    }

    #[test]
    fn sides_and_sequence() {
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        let materials = vec![
            Material {
                name: "COPPER".into(),
                conductivity: Some(5.8e7),
                ..Default::default()
            },
            Material {
                name: "FR4".into(),
                permittivity: Some(4.4),
                loss_tangent: Some(0.02),
                ..Default::default()
            },
        ];
        builder.add_layers(&four_layer(), &materials).unwrap();

        let conductors: Vec<_> = builder
            .layers
            .iter()
            .filter(|l| l.layer_function == LayerFunction::Conductor)
            .map(|l| (l.name.as_str(), l.side))
            .collect();
        assert_eq!(
            conductors,
            vec![
                ("TOP", Side::Top),
                ("IN1", Side::Internal),
                ("IN2", Side::Internal),
                ("BOTTOM", Side::Bottom),
            ]
        );

        let drills: Vec<_> = builder
            .layers
            .iter()
            .filter(|l| l.layer_function == LayerFunction::Drill)
            .collect();
        assert_eq!(drills.len(), 1);
        let drill = builder.layers.last().unwrap();
        assert_eq!(drill.name, "DRILL_1-4");
        assert_eq!(drill.side, Side::All);
        let span = drill.span.as_ref().unwrap();
        assert_eq!((span.from_layer.as_str(), span.to_layer.as_str()), ("TOP", "BOTTOM"));

        let sequences: Vec<u32> = builder.stackup.layers.iter().map(|l| l.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!((builder.stackup.overall_thickness - (4.0 * 35e-6 + 3.0 * 200e-6)).abs() < 1e-12);

        assert_eq!(builder.specs[0].conductivity, Some(5.8e7));
        assert_eq!(builder.specs[1].dielectric_constant, Some(4.4));
        assert_eq!(builder.specs[1].loss_tangent, Some(0.02));

        // one color per physical layer plus the drill layer
        assert_eq!(builder.dictionaries.color.len(), 8);
    }

    #[test]
    fn no_conductors_is_fatal() {
        let mut builder = DocumentBuilder::new("board", &ExportOptions::default());
        let err = builder
            .add_layers(&[layer("CORE", LayerKind::Dielectric)], &[])
            .unwrap_err();
        assert!(matches!(err, ExportError::NoConductorLayers));
    }
}
