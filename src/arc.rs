use nalgebra::Point2;

use crate::canvas::DrawingContext;
use crate::{resolve_bulge_arc, CanvasTransform};

/// Emits the segment `start` -> `end` (board units) into the current path, either as a straight line
/// or as the arc the bulge encodes.
///
/// Start, end and center are transformed independently and the device radius is measured from the
/// transformed center to the transformed start, which is exact for similarity transforms only.
///
/// A transform that mirrors an axis reverses the visual turn direction, so the sweep flag is inverted
/// for such transforms to keep the arc bowing towards the side the bulge encodes.
pub fn draw_arc_from_bulge<C: DrawingContext + ?Sized>(
    context: &mut C,
    start: Point2<f64>,
    end: Point2<f64>,
    bulge: f64,
    transform: &CanvasTransform,
) {
    let canvas_end = transform.apply_to_position(end);

    let Some(arc) = resolve_bulge_arc(start, end, bulge) else {
        context.line_to(canvas_end);
        return;
    };

    let canvas_start = transform.apply_to_position(start);
    let canvas_center = transform.apply_to_position(arc.center);

    let canvas_radius = (canvas_start.x - canvas_center.x).hypot(canvas_start.y - canvas_center.y);
    let start_angle = (canvas_start.y - canvas_center.y).atan2(canvas_start.x - canvas_center.x);
    let end_angle = (canvas_end.y - canvas_center.y).atan2(canvas_end.x - canvas_center.x);

    let is_flipped = transform.is_flipped();
    let counterclockwise = if bulge > 0.0 { !is_flipped } else { is_flipped };

    context.arc(canvas_center, canvas_radius, start_angle, end_angle, counterclockwise);
}
