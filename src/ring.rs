use crate::canvas::DrawingContext;
use crate::{draw_arc_from_bulge, CanvasTransform, Ring, GEOMETRY_EPSILON};

/// Traces a closed ring into the current path. Does not fill or stroke.
///
/// The last vertex connects back to the first using the last vertex's bulge. Rings with fewer than two
/// vertices are ignored.
///
/// Two vertices that both carry a bulge of 1 are the canonical encoding of a full circle and are
/// traced as two half circles.
pub fn trace_ring<C: DrawingContext + ?Sized>(context: &mut C, ring: &Ring, transform: &CanvasTransform) {
    let vertices = &ring.vertices;
    if vertices.len() < 2 {
        return;
    }

    let first = vertices[0].position();
    context.move_to(transform.apply_to_position(first));

    if ring.is_two_point_circle() {
        let second = vertices[1].position();
        draw_arc_from_bulge(context, first, second, 1.0, transform);
        draw_arc_from_bulge(context, second, first, 1.0, transform);
        return;
    }

    for (index, vertex) in vertices.iter().enumerate() {
        let next = &vertices[(index + 1) % vertices.len()];
        draw_arc_from_bulge(context, vertex.position(), next.position(), vertex.bulge, transform);
    }
}

impl Ring {
    pub fn is_two_point_circle(&self) -> bool {
        match self.vertices.as_slice() {
            [first, second] => {
                (first.bulge - 1.0).abs() < GEOMETRY_EPSILON && (second.bulge - 1.0).abs() < GEOMETRY_EPSILON
            }
            _ => false,
        }
    }
}
