use log::{debug, trace, warn};
use nalgebra::Point2;

use crate::board::positions;
use crate::canvas::{DrawingContext, FillRule, SavedState};
use crate::{
    cut_pour_openings, trace_ring, BoardElement, BrepShape, CanvasTransform, CopperPour, PolygonShape, PourShape,
    RectShape, Rgba, Side,
};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfiguration {
    /// Fill used for solder mask lying over a copper pour.
    pub soldermask_over_copper: Rgba,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            soldermask_over_copper: Rgba::rgb(52, 135, 73),
        }
    }
}

/// Renders the solder mask of every covered copper pour on `layer`, in element order.
#[profiling::function]
pub fn render_soldermask_layer<C: DrawingContext + ?Sized>(
    context: &mut C,
    elements: &[BoardElement],
    transform: &CanvasTransform,
    configuration: &RenderConfiguration,
    layer: Side,
) {
    trace!("Rendering solder mask over copper, layer: {}", layer.as_str());

    for element in elements {
        if let BoardElement::CopperPour(pour) = element {
            render_covered_pour(
                &mut *context,
                pour,
                transform,
                configuration.soldermask_over_copper,
                layer,
                elements,
            );
        }
    }
}

/// Fills the area of a covered pour with `mask_color`, then cuts an opening for each exposed feature
/// in `elements`.
///
/// Pours on another layer, pours without solder mask and pours without a usable outline draw nothing.
/// The context's fill style and transform are restored before returning.
#[profiling::function]
pub fn render_covered_pour<C: DrawingContext + ?Sized>(
    context: &mut C,
    pour: &CopperPour,
    transform: &CanvasTransform,
    mask_color: Rgba,
    layer: Side,
    elements: &[BoardElement],
) {
    if !pour.layer.is_side(layer) {
        return;
    }
    if !pour.coverage.is_covered() {
        trace!("Pour is not covered with solder mask, id: {:?}", pour.pcb_copper_pour_id);
        return;
    }

    match &pour.shape {
        PourShape::Rect {
            center,
            width,
            height,
            rotation,
        } => {
            let outline = RectShape {
                center: center.position(),
                width: *width,
                height: *height,
                border_radius: 0.0,
                rotation: *rotation,
            };
            if let Err(error) = outline.validate() {
                warn!("Skipping rect pour, id: {:?}, cause: {}", pour.pcb_copper_pour_id, error);
                return;
            }

            fill_rect_pour(&mut *context, &outline, mask_color, transform);
            cut_pour_openings(context, elements, layer, transform);
        }
        PourShape::Polygon {
            points,
        } => {
            let outline = PolygonShape {
                points: positions(points),
            };
            if let Err(error) = outline.validate() {
                warn!("Skipping polygon pour, id: {:?}, cause: {}", pour.pcb_copper_pour_id, error);
                return;
            }

            let mut context = SavedState::new(context);
            context.set_fill_style(mask_color);
            trace_polygon(&mut *context, &outline.points, transform);
            context.fill(FillRule::NonZero);

            cut_pour_openings(&mut *context, elements, layer, transform);
        }
        PourShape::Brep {
            brep_shape,
        } => {
            if !brep_shape.outer_ring.is_drawable() {
                debug!("Skipping brep pour without outer ring, id: {:?}", pour.pcb_copper_pour_id);
                return;
            }

            let mut context = SavedState::new(context);
            context.set_fill_style(mask_color);
            trace_brep(&mut *context, brep_shape, transform);
            context.fill(FillRule::EvenOdd);

            cut_pour_openings(&mut *context, elements, layer, transform);
        }
        PourShape::Unsupported => {
            trace!("Ignoring pour with unsupported shape, id: {:?}", pour.pcb_copper_pour_id);
        }
    }
}

fn fill_rect_pour<C: DrawingContext + ?Sized>(
    context: &mut C,
    outline: &RectShape,
    mask_color: Rgba,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);
    context.set_fill_style(mask_color);

    let center = transform.apply_to_position(outline.center);
    let scale = transform.uniform_scale();
    let (width, height) = (outline.width * scale, outline.height * scale);

    context.translate(center.x, center.y);
    if outline.rotation != 0.0 {
        context.rotate(-outline.rotation.to_radians());
    }
    context.begin_path();
    context.rect(-width / 2.0, -height / 2.0, width, height);
    context.fill(FillRule::NonZero);
}

fn trace_polygon<C: DrawingContext + ?Sized>(context: &mut C, points: &[Point2<f64>], transform: &CanvasTransform) {
    let mut canvas_points = points
        .iter()
        .map(|point| transform.apply_to_position(*point));

    context.begin_path();
    if let Some(first) = canvas_points.next() {
        context.move_to(first);
    }
    for point in canvas_points {
        context.line_to(point);
    }
    context.close_path();
}

/// Outer and inner rings share one path, the even-odd fill turns the inner rings into holes.
fn trace_brep<C: DrawingContext + ?Sized>(context: &mut C, brep_shape: &BrepShape, transform: &CanvasTransform) {
    context.begin_path();
    trace_ring(context, &brep_shape.outer_ring, transform);
    for ring in &brep_shape.inner_rings {
        trace_ring(context, ring, transform);
    }
}
