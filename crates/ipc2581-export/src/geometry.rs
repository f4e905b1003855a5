//! Geometry value objects
//!
//! Coordinates are unit-agnostic meters. Arc lists come pre-computed from the
//! layout's geometry kernel; this module only turns them into the IPC-2581
//! `PolyBegin`/`PolyStep*` grammar.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 2D point in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate counter-clockwise about the origin
    pub fn rotated(self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn mirrored_x(self) -> Point {
        Point::new(-self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// One arc of a kernel-supplied arc list
///
/// A zero `height` (bulge) means the arc is a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcData {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub center: Point,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub ccw: bool,
}

impl ArcData {
    pub fn segment(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            center: Point::default(),
            height: 0.0,
            ccw: false,
        }
    }

    pub fn is_segment(&self) -> bool {
        self.height == 0.0
    }
}

/// Polygon continuation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolyStep {
    Segment {
        end: Point,
    },
    Curve {
        end: Point,
        center: Point,
        clockwise: bool,
    },
}

impl PolyStep {
    pub fn end(&self) -> Point {
        match self {
            PolyStep::Segment { end } | PolyStep::Curve { end, .. } => *end,
        }
    }

    fn from_arc(arc: &ArcData) -> Self {
        if arc.is_segment() {
            PolyStep::Segment { end: arc.end }
        } else {
            PolyStep::Curve {
                end: arc.end,
                center: arc.center,
                clockwise: !arc.ccw,
            }
        }
    }
}

/// A begin point followed by steps, shared by polygons, cutouts and polylines
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyChain {
    pub begin: Point,
    pub steps: Vec<PolyStep>,
}

impl PolyChain {
    /// Walk an arc list: the first arc's start is the begin point and every
    /// arc contributes the step to its end point.
    ///
    /// An empty list gives an empty chain.
    pub fn from_arcs(arcs: &[ArcData]) -> Self {
        let Some(first) = arcs.first() else {
            return Self::default();
        };
        Self {
            begin: first.start,
            steps: arcs.iter().map(PolyStep::from_arc).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Last point reached by the chain
    pub fn end(&self) -> Point {
        self.steps.last().map_or(self.begin, PolyStep::end)
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        !self.is_empty() && self.end().distance(self.begin) <= tolerance
    }

    /// Axis-aligned rectangle, counter-clockwise from the lower-left corner
    pub fn rectangle(center: Point, width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [
            Point::new(center.x - hw, center.y - hh),
            Point::new(center.x + hw, center.y - hh),
            Point::new(center.x + hw, center.y + hh),
            Point::new(center.x - hw, center.y + hh),
        ];
        Self {
            begin: corners[0],
            steps: corners
                .iter()
                .cycle()
                .skip(1)
                .take(4)
                .map(|&end| PolyStep::Segment { end })
                .collect(),
        }
    }
}

/// Closed polygon with zero or more voids
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub outline: PolyChain,
    pub cutouts: Vec<PolyChain>,
}

impl Polygon {
    pub fn from_arcs(arcs: &[ArcData]) -> Self {
        Self {
            outline: PolyChain::from_arcs(arcs),
            cutouts: Vec::new(),
        }
    }

    /// Append a void; an empty arc list contributes nothing
    ///
    /// Returns whether a cutout was added.
    pub fn add_cutout(&mut self, arcs: &[ArcData]) -> bool {
        let cutout = PolyChain::from_arcs(arcs);
        if cutout.is_empty() {
            return false;
        }
        self.cutouts.push(cutout);
        true
    }

    /// A polygon without steps is not written out
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// Open path (trace centerline) referencing a line style
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub chain: PolyChain,
    pub line_desc_ref: String,
}
