//! Board elements consumed by the renderer, modelled on circuit-json records.
//!
//! Only the element kinds and fields the solder-mask renderer needs are modelled; any other element kind
//! becomes [`BoardElement::Other`] and any unknown shape tag becomes an `Unsupported` variant, so newer
//! board files still load. A known element missing one of its geometric fields loads with that field set
//! to NaN, validation then skips just that element instead of rejecting the whole board.

use nalgebra::Point2;

use crate::{Coverage, Side};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// A layer reference as it appears on board elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub enum Layer {
    Top,
    Bottom,
    /// Inner copper layers, or anything this crate doesn't know about.
    Other(String),
}

impl Layer {
    pub fn is_side(&self, side: Side) -> bool {
        matches!(
            (self, side),
            (Layer::Top, Side::Top) | (Layer::Bottom, Side::Bottom)
        )
    }
}

impl From<String> for Layer {
    fn from(value: String) -> Self {
        match value.as_str() {
            "top" => Layer::Top,
            "bottom" => Layer::Bottom,
            _ => Layer::Other(value),
        }
    }
}

/// An undeclared layer, which matches no side.
impl Default for Layer {
    fn default() -> Self {
        Layer::Other(String::new())
    }
}

#[cfg(feature = "serde")]
fn missing() -> f64 {
    f64::NAN
}

#[cfg(feature = "serde")]
fn missing_point() -> BoardPoint {
    BoardPoint::new(f64::NAN, f64::NAN)
}

/// `None` means the element doesn't declare its layers and is treated as present on every layer.
fn layers_include(layers: &Option<Vec<Layer>>, side: Side) -> bool {
    match layers {
        None => true,
        Some(layers) => layers
            .iter()
            .any(|layer| layer.is_side(side)),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct BoardPoint {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
}

impl BoardPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

pub(crate) fn positions(points: &[BoardPoint]) -> Vec<Point2<f64>> {
    points
        .iter()
        .map(BoardPoint::position)
        .collect()
}

/// A ring vertex. `bulge` describes the segment from this vertex to the next one in the ring.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Vertex {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bulge: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_bulge(x, y, 0.0)
    }

    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            x,
            y,
            bulge,
        }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Closed loop of vertices, the last vertex connects back to the first.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Ring {
    #[cfg_attr(feature = "serde", serde(default))]
    pub vertices: Vec<Vertex>,
}

impl Ring {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.vertices.len() >= 2
    }
}

/// Boundary representation: one outer ring and any number of inner rings that are holes.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct BrepShape {
    #[cfg_attr(feature = "serde", serde(default))]
    pub outer_ring: Ring,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inner_rings: Vec<Ring>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum BoardElement {
    #[cfg_attr(feature = "serde", serde(rename = "pcb_copper_pour"))]
    CopperPour(CopperPour),
    #[cfg_attr(feature = "serde", serde(rename = "pcb_smtpad"))]
    SmtPad(SmtPad),
    #[cfg_attr(feature = "serde", serde(rename = "pcb_plated_hole"))]
    PlatedHole(PlatedHole),
    #[cfg_attr(feature = "serde", serde(rename = "pcb_via"))]
    Via(Via),
    #[cfg_attr(feature = "serde", serde(rename = "pcb_hole"))]
    Hole(Hole),
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct CopperPour {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pcb_copper_pour_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layer: Layer,
    #[cfg_attr(feature = "serde", serde(default, rename = "covered_with_solder_mask"))]
    pub coverage: Coverage,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub shape: PourShape,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum PourShape {
    Rect {
        #[cfg_attr(feature = "serde", serde(default = "missing_point"))]
        center: BoardPoint,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        width: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        height: f64,
        /// Degrees, counter-clockwise.
        #[cfg_attr(feature = "serde", serde(default))]
        rotation: f64,
    },
    Polygon {
        #[cfg_attr(feature = "serde", serde(default))]
        points: Vec<BoardPoint>,
    },
    Brep {
        #[cfg_attr(feature = "serde", serde(default))]
        brep_shape: BrepShape,
    },
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct SmtPad {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pcb_smtpad_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layer: Layer,
    #[cfg_attr(feature = "serde", serde(default, rename = "is_covered_with_solder_mask"))]
    pub coverage: Coverage,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub shape: PadShape,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum PadShape {
    Rect(RectPad),
    RotatedRect(RectPad),
    Circle {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        x: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        y: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        radius: f64,
    },
    Pill(PillPad),
    RotatedPill(PillPad),
    Polygon {
        #[cfg_attr(feature = "serde", serde(default))]
        points: Vec<BoardPoint>,
    },
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct RectPad {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub width: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub corner_radius: Option<f64>,
    /// Older name for `corner_radius`, used when `corner_radius` is absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rect_border_radius: Option<f64>,
    /// Degrees, counter-clockwise. Only honoured for rotated shapes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ccw_rotation: Option<f64>,
}

impl RectPad {
    pub fn border_radius(&self) -> f64 {
        self.corner_radius
            .or(self.rect_border_radius)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PillPad {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub width: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub height: f64,
    /// Degrees, counter-clockwise. Only honoured for rotated shapes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ccw_rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PlatedHole {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pcb_plated_hole_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: Option<Vec<Layer>>,
    #[cfg_attr(feature = "serde", serde(default, rename = "is_covered_with_solder_mask"))]
    pub coverage: Coverage,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub shape: PlatedHoleShape,
}

impl PlatedHole {
    pub fn is_on(&self, side: Side) -> bool {
        layers_include(&self.layers, side)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum PlatedHoleShape {
    Circle {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        outer_diameter: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        hole_diameter: Option<f64>,
    },
    Oval(OuterOutline),
    Pill(OuterOutline),
    CircularHoleWithRectPad(RectPadOutline),
    PillHoleWithRectPad(RectPadOutline),
    RotatedPillHoleWithRectPad(RectPadOutline),
    HoleWithPolygonPad {
        /// Relative to the hole's center.
        #[cfg_attr(feature = "serde", serde(default))]
        pad_outline: Vec<BoardPoint>,
    },
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}

/// Copper ring size of an oval or pill plated hole.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct OuterOutline {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub outer_width: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub outer_height: f64,
    /// Degrees, counter-clockwise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ccw_rotation: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct RectPadOutline {
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub rect_pad_width: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub rect_pad_height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rect_border_radius: Option<f64>,
    /// Degrees, counter-clockwise. Only honoured by `rotated_pill_hole_with_rect_pad`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rect_ccw_rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Via {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pcb_via_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub outer_diameter: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hole_diameter: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: Option<Vec<Layer>>,
}

impl Via {
    /// A via always exposes its metal barrel, there is no coverage flag to consult.
    pub const COVERAGE: Coverage = Coverage::AlwaysExposed;

    pub fn coverage(&self) -> Coverage {
        Self::COVERAGE
    }

    pub fn is_on(&self, side: Side) -> bool {
        layers_include(&self.layers, side)
    }
}

/// A non-plated (mechanical) hole.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Hole {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pcb_hole_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default = "missing"))]
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default, rename = "is_covered_with_solder_mask"))]
    pub coverage: Coverage,
    /// Degrees, counter-clockwise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ccw_rotation: Option<f64>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub shape: HoleShape,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "hole_shape", rename_all = "snake_case"))]
pub enum HoleShape {
    Circle {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_diameter: f64,
    },
    Square {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_diameter: f64,
    },
    Oval {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_width: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_height: f64,
    },
    Rect {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_width: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_height: f64,
    },
    Pill {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_width: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_height: f64,
    },
    RotatedPill {
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_width: f64,
        #[cfg_attr(feature = "serde", serde(default = "missing"))]
        hole_height: f64,
    },
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}
