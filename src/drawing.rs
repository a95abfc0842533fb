use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Point2;

use crate::canvas::{DrawingContext, FillRule, SavedState};
use crate::geometry::{ensure_finite, ensure_finite_point, ensure_polygon, ensure_positive};
use crate::{CanvasTransform, GeometryError, Rgba};

/// Board-space circle.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: Point2<f64>,
    pub radius: f64,
}

/// Board-space ellipse. `rotation` is in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct OvalShape {
    pub center: Point2<f64>,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation: f64,
}

/// Board-space stadium, the shorter side is fully rounded. `rotation` is in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PillShape {
    pub center: Point2<f64>,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

/// Board-space rectangle, optionally with rounded corners. `rotation` is in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub center: Point2<f64>,
    pub width: f64,
    pub height: f64,
    pub border_radius: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub points: Vec<Point2<f64>>,
}

impl CircleShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        ensure_finite_point("center", self.center)?;
        ensure_positive("radius", self.radius)?;
        Ok(())
    }
}

impl OvalShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        ensure_finite_point("center", self.center)?;
        ensure_positive("radius_x", self.radius_x)?;
        ensure_positive("radius_y", self.radius_y)?;
        ensure_finite("rotation", self.rotation)?;
        Ok(())
    }
}

impl PillShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        ensure_finite_point("center", self.center)?;
        ensure_positive("width", self.width)?;
        ensure_positive("height", self.height)?;
        ensure_finite("rotation", self.rotation)?;
        Ok(())
    }
}

impl RectShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        ensure_finite_point("center", self.center)?;
        ensure_positive("width", self.width)?;
        ensure_positive("height", self.height)?;
        ensure_finite("border_radius", self.border_radius)?;
        ensure_finite("rotation", self.rotation)?;
        Ok(())
    }
}

impl PolygonShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        ensure_polygon(&self.points)
    }
}

/// Moves the origin to the transformed `center` and applies the board rotation.
///
/// Board rotations are counter-clockwise with Y up, the canvas Y axis points down, hence the negation.
fn enter_local_frame<C: DrawingContext + ?Sized>(
    context: &mut C,
    center: Point2<f64>,
    rotation_degrees: f64,
    transform: &CanvasTransform,
) {
    let center = transform.apply_to_position(center);
    context.translate(center.x, center.y);
    if rotation_degrees != 0.0 {
        context.rotate(-rotation_degrees.to_radians());
    }
}

pub fn draw_circle<C: DrawingContext + ?Sized>(
    context: &mut C,
    circle: &CircleShape,
    fill: Rgba,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);

    let center = transform.apply_to_position(circle.center);
    let radius = circle.radius * transform.uniform_scale();

    context.set_fill_style(fill);
    context.begin_path();
    context.arc(center, radius, 0.0, TAU, false);
    context.fill(FillRule::NonZero);
}

pub fn draw_oval<C: DrawingContext + ?Sized>(
    context: &mut C,
    oval: &OvalShape,
    fill: Rgba,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);
    enter_local_frame(&mut *context, oval.center, oval.rotation, transform);

    let scale = transform.uniform_scale();

    context.set_fill_style(fill);
    context.begin_path();
    context.ellipse(
        Point2::origin(),
        oval.radius_x * scale,
        oval.radius_y * scale,
        0.0,
        0.0,
        TAU,
        false,
    );
    context.fill(FillRule::NonZero);
}

pub fn draw_pill<C: DrawingContext + ?Sized>(
    context: &mut C,
    pill: &PillShape,
    fill: Rgba,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);
    enter_local_frame(&mut *context, pill.center, pill.rotation, transform);

    let scale = transform.uniform_scale();
    let half_width = pill.width * scale / 2.0;
    let half_height = pill.height * scale / 2.0;
    let radius = half_width.min(half_height);

    context.set_fill_style(fill);
    context.begin_path();
    if pill.width >= pill.height {
        let straight = half_width - radius;
        context.move_to(Point2::new(-straight, -radius));
        context.line_to(Point2::new(straight, -radius));
        context.arc(Point2::new(straight, 0.0), radius, -FRAC_PI_2, FRAC_PI_2, false);
        context.line_to(Point2::new(-straight, radius));
        context.arc(Point2::new(-straight, 0.0), radius, FRAC_PI_2, PI + FRAC_PI_2, false);
    } else {
        let straight = half_height - radius;
        context.move_to(Point2::new(radius, -straight));
        context.line_to(Point2::new(radius, straight));
        context.arc(Point2::new(0.0, straight), radius, 0.0, PI, false);
        context.line_to(Point2::new(-radius, -straight));
        context.arc(Point2::new(0.0, -straight), radius, PI, TAU, false);
    }
    context.close_path();
    context.fill(FillRule::NonZero);
}

/// Fills a centered rectangle. A border radius larger than half the shorter side is clamped, a
/// non-positive one gives square corners.
pub fn draw_rect<C: DrawingContext + ?Sized>(
    context: &mut C,
    rect: &RectShape,
    fill: Rgba,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);
    enter_local_frame(&mut *context, rect.center, rect.rotation, transform);

    let scale = transform.uniform_scale();
    let width = rect.width * scale;
    let height = rect.height * scale;
    let radius = (rect.border_radius * scale).min(width.min(height) / 2.0);

    context.set_fill_style(fill);
    context.begin_path();
    if radius > 0.0 {
        trace_rounded_rect(&mut *context, width / 2.0, height / 2.0, radius);
    } else {
        context.rect(-width / 2.0, -height / 2.0, width, height);
    }
    context.fill(FillRule::NonZero);
}

fn trace_rounded_rect<C: DrawingContext + ?Sized>(context: &mut C, half_width: f64, half_height: f64, radius: f64) {
    let (right, bottom) = (half_width - radius, half_height - radius);

    context.move_to(Point2::new(-right, -half_height));
    context.line_to(Point2::new(right, -half_height));
    context.arc(Point2::new(right, -bottom), radius, -FRAC_PI_2, 0.0, false);
    context.line_to(Point2::new(half_width, bottom));
    context.arc(Point2::new(right, bottom), radius, 0.0, FRAC_PI_2, false);
    context.line_to(Point2::new(-right, half_height));
    context.arc(Point2::new(-right, bottom), radius, FRAC_PI_2, PI, false);
    context.line_to(Point2::new(-half_width, -bottom));
    context.arc(Point2::new(-right, -bottom), radius, PI, PI + FRAC_PI_2, false);
    context.close_path();
}

/// Fills a closed polygon through the transformed points. Empty polygons are ignored.
pub fn draw_polygon<C: DrawingContext + ?Sized>(
    context: &mut C,
    polygon: &PolygonShape,
    fill: Rgba,
    transform: &CanvasTransform,
) {
    let Some((first, rest)) = polygon.points.split_first() else {
        return;
    };

    let mut context = SavedState::new(context);
    context.set_fill_style(fill);
    context.begin_path();
    context.move_to(transform.apply_to_position(*first));
    for point in rest {
        context.line_to(transform.apply_to_position(*point));
    }
    context.close_path();
    context.fill(FillRule::NonZero);
}
