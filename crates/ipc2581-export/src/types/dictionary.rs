//! Standard-geometry, line-description and color dictionaries
//!
//! Shapes are stored in meters. Their ids are derived from the dimensions in
//! the document's output unit, so two shapes that print identically share one
//! entry.

use crate::intern::{Entry, Interner};
use crate::layout::PadGeometry;
use crate::units::{Units, format_quantized, from_meters, quantize};

/// Id of the fallback entry used for pad shapes the exporter cannot express
pub const DEFAULT_PRIMITIVE_ID: &str = "Default";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardShape {
    Circle { diameter: f64 },
    Rect { width: f64, height: f64 },
    Oval { major: f64, minor: f64, corner: f64 },
    /// Zero-diameter circle standing in for unsupported pad geometry
    Default,
}

impl From<PadGeometry> for StandardShape {
    fn from(geometry: PadGeometry) -> Self {
        match geometry {
            PadGeometry::Circle { diameter } => StandardShape::Circle { diameter },
            PadGeometry::Rect { width, height } => StandardShape::Rect { width, height },
            PadGeometry::Oval {
                major,
                minor,
                corner,
            } => StandardShape::Oval {
                major,
                minor,
                corner,
            },
            PadGeometry::Unsupported => StandardShape::Default,
        }
    }
}

/// Canonical value tuple of a shape in output units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ShapeKey {
    Circle(i64),
    Rect(i64, i64),
    Oval(i64, i64, i64),
    Default,
}

impl ShapeKey {
    fn new(shape: &StandardShape, units: Units) -> Self {
        let q = |v: f64| quantize(from_meters(v, units));
        match *shape {
            StandardShape::Circle { diameter } => ShapeKey::Circle(q(diameter)),
            StandardShape::Rect { width, height } => ShapeKey::Rect(q(width), q(height)),
            StandardShape::Oval {
                major,
                minor,
                corner,
            } => ShapeKey::Oval(q(major), q(minor), q(corner)),
            StandardShape::Default => ShapeKey::Default,
        }
    }

    fn id(&self) -> String {
        let f = format_quantized;
        match *self {
            ShapeKey::Circle(d) => format!("CIRCLE_{}", f(d)),
            ShapeKey::Rect(w, h) => format!("RECT_{}_{}", f(w), f(h)),
            ShapeKey::Oval(a, b, c) => format!("OVAL_{}_{}_{}", f(a), f(b), f(c)),
            ShapeKey::Default => DEFAULT_PRIMITIVE_ID.to_owned(),
        }
    }
}

/// Deduplicating registry of standard primitives (`DictionaryStandard`)
#[derive(Debug, Clone)]
pub struct GeometryInterner {
    units: Units,
    shapes: Interner<ShapeKey, StandardShape>,
}

impl GeometryInterner {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            shapes: Interner::new(),
        }
    }

    /// Register `shape` and return its id
    pub fn intern(&mut self, shape: StandardShape) -> String {
        let key = ShapeKey::new(&shape, self.units);
        self.shapes
            .intern_with(key, |key| (key.id(), shape))
            .to_owned()
    }

    pub fn lookup(&self, shape: &StandardShape) -> Option<&str> {
        self.shapes.get(&ShapeKey::new(shape, self.units))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<StandardShape>> {
        self.shapes.entries()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Round-ended line of a given width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDesc {
    pub line_width: f64,
}

/// `DictionaryLineDesc`, keyed by width in output units
#[derive(Debug, Clone)]
pub struct LineDescInterner {
    units: Units,
    lines: Interner<i64, LineDesc>,
}

impl LineDescInterner {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            lines: Interner::new(),
        }
    }

    pub fn intern(&mut self, line_width: f64) -> String {
        let key = quantize(from_meters(line_width, self.units));
        self.lines
            .intern_with(key, |q| {
                (format!("ROUND_{}", format_quantized(*q)), LineDesc { line_width })
            })
            .to_owned()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<LineDesc>> {
        self.lines.entries()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// `DictionaryColor`: one entry per layer, the id is the layer name
#[derive(Debug, Clone, Default)]
pub struct ColorDictionary {
    colors: Interner<String, Color>,
}

impl ColorDictionary {
    pub fn insert(&mut self, layer: &str, color: Color) -> String {
        self.colors
            .intern_with(layer.to_owned(), |name| (name.clone(), color))
            .to_owned()
    }

    pub fn contains(&self, layer: &str) -> bool {
        self.colors.contains(&layer.to_owned())
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<Color>> {
        self.colors.entries()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

/// All dictionaries of a document's `Content` section
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub units: Units,
    pub standard: GeometryInterner,
    pub line_desc: LineDescInterner,
    pub color: ColorDictionary,
}

impl Dictionaries {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            standard: GeometryInterner::new(units),
            line_desc: LineDescInterner::new(units),
            color: ColorDictionary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_ids_use_output_units() {
        let mut mm = GeometryInterner::new(Units::Millimeter);
        assert_eq!(
            mm.intern(StandardShape::Circle { diameter: 0.5e-3 }),
            "CIRCLE_0.5"
        );

        let mut um = GeometryInterner::new(Units::Micrometer);
        assert_eq!(
            um.intern(StandardShape::Circle { diameter: 0.5e-3 }),
            "CIRCLE_500"
        );
    }

    #[test]
    fn rect_and_oval_ids() {
        let mut dict = GeometryInterner::new(Units::Millimeter);
        assert_eq!(
            dict.intern(StandardShape::Rect {
                width: 1e-3,
                height: 0.6e-3
            }),
            "RECT_1_0.6"
        );
        assert_eq!(
            dict.intern(StandardShape::Oval {
                major: 2e-3,
                minor: 1e-3,
                corner: 0.0
            }),
            "OVAL_2_1_0"
        );
        assert_eq!(dict.intern(StandardShape::Default), DEFAULT_PRIMITIVE_ID);
    }

    #[test]
    fn interning_is_idempotent() {
        let mut dict = GeometryInterner::new(Units::Millimeter);
        let shapes = [
            StandardShape::Circle { diameter: 0.5e-3 },
            StandardShape::Rect {
                width: 1e-3,
                height: 1e-3,
            },
            StandardShape::Circle { diameter: 0.5e-3 },
            StandardShape::Circle { diameter: 0.0 },
            StandardShape::Rect {
                width: 1e-3,
                height: 1e-3,
            },
            StandardShape::Circle { diameter: 0.0 },
        ];
        let ids: Vec<String> = shapes.iter().map(|s| dict.intern(*s)).collect();
        assert_eq!(ids[0], ids[2]);
        assert_eq!(ids[1], ids[4]);
        assert_eq!(ids[3], ids[5]);
        assert_eq!(ids[3], "CIRCLE_0");
        assert_eq!(dict.len(), 3);
        assert_eq!(
            dict.lookup(&StandardShape::Circle { diameter: 0.5e-3 }),
            Some("CIRCLE_0.5")
        );
    }

    #[test]
    fn float_noise_does_not_split_entries() {
        let mut dict = GeometryInterner::new(Units::Millimeter);
        let a = dict.intern(StandardShape::Circle { diameter: 0.3e-3 });
        let b = dict.intern(StandardShape::Circle {
            diameter: 0.1e-3 + 0.2e-3,
        });
        assert_eq!(a, b);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn line_desc_interning() {
        let mut lines = LineDescInterner::new(Units::Millimeter);
        assert_eq!(lines.intern(0.0), "ROUND_0");
        assert_eq!(lines.intern(0.15e-3), "ROUND_0.15");
        assert_eq!(lines.intern(0.0), "ROUND_0");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn colors_keyed_by_layer() {
        let mut colors = ColorDictionary::default();
        colors.insert("TOP", Color::new(255, 0, 0));
        colors.insert("TOP", Color::new(0, 0, 255));
        colors.insert("DRILL_1-2", Color::WHITE);
        assert_eq!(colors.len(), 2);
        let first = colors.entries().next().unwrap();
        assert_eq!(first.id, "TOP");
        assert_eq!(first.value, Color::new(255, 0, 0));
    }
}
