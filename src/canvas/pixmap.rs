use lyon::geom::{point, vector, Angle, Arc, CubicBezierSegment};
use log::trace;
use nalgebra::Point2;
use thiserror::Error;
use tiny_skia::{BlendMode, Color, Paint, PathBuilder, Pixmap, Transform};

use super::{arc_sweep, CompositeOperation, DrawingContext, FillRule};
use crate::{CanvasTransform, Rgba};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Invalid canvas dimensions. width: {width}, height: {height}")]
    InvalidDimensions { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy)]
struct CanvasState {
    transform: CanvasTransform,
    fill_style: Rgba,
    composite_operation: CompositeOperation,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: CanvasTransform::IDENTITY,
            fill_style: Rgba::BLACK,
            composite_operation: CompositeOperation::SourceOver,
        }
    }
}

/// Path verbs, already mapped to device space.
#[derive(Debug, Clone, Copy)]
enum PathVerb {
    MoveTo(Point2<f64>),
    LineTo(Point2<f64>),
    CubicTo(Point2<f64>, Point2<f64>, Point2<f64>),
    Close,
}

/// A [`DrawingContext`] rasterizing into a tiny-skia [`Pixmap`], anti-aliased.
///
/// The pixmap starts fully transparent.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
    path: Vec<PathVerb>,
    current_point: Option<Point2<f64>>,
    subpath_start: Option<Point2<f64>>,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions {
            width,
            height,
        })?;

        Ok(Self {
            pixmap,
            state: CanvasState::default(),
            state_stack: Vec::new(),
            path: Vec::new(),
            current_point: None,
            subpath_start: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Overwrites every pixel, ignoring the current composite operation.
    pub fn clear(&mut self, color: Rgba) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap
            .pixel(x, y)
            .map(|pixel| pixel.alpha())
    }

    /// Straight-alpha color of a pixel.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|pixel| {
            let color = pixel.demultiply();
            Rgba::new(color.red(), color.green(), color.blue(), color.alpha())
        })
    }

    pub fn state_depth(&self) -> usize {
        self.state_stack.len()
    }

    fn to_device(&self, point: Point2<f64>) -> Point2<f64> {
        self.state.transform.apply_to_position(point)
    }

    fn connect_to(&mut self, device_point: Point2<f64>) {
        match self.current_point {
            Some(_) => self.path.push(PathVerb::LineTo(device_point)),
            None => {
                self.path.push(PathVerb::MoveTo(device_point));
                self.subpath_start = Some(device_point);
            }
        }
        self.current_point = Some(device_point);
    }

    fn add_elliptical_arc(&mut self, arc: Arc<f64>) {
        let start = arc.from();
        self.connect_to(self.to_device(Point2::new(start.x, start.y)));

        let mut segments: Vec<CubicBezierSegment<f64>> = Vec::new();
        arc.for_each_cubic_bezier(&mut |segment: &CubicBezierSegment<f64>| segments.push(*segment));

        for segment in segments {
            let ctrl1 = self.to_device(Point2::new(segment.ctrl1.x, segment.ctrl1.y));
            let ctrl2 = self.to_device(Point2::new(segment.ctrl2.x, segment.ctrl2.y));
            let to = self.to_device(Point2::new(segment.to.x, segment.to.y));
            self.path.push(PathVerb::CubicTo(ctrl1, ctrl2, to));
            self.current_point = Some(to);
        }
    }

    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut builder = PathBuilder::new();
        for verb in &self.path {
            match *verb {
                PathVerb::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
                PathVerb::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
                PathVerb::CubicTo(c1, c2, p) => {
                    builder.cubic_to(c1.x as f32, c1.y as f32, c2.x as f32, c2.y as f32, p.x as f32, p.y as f32)
                }
                PathVerb::Close => builder.close(),
            }
        }
        builder.finish()
    }
}

impl DrawingContext for PixmapCanvas {
    fn save(&mut self) {
        self.state_stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = CanvasTransform::translation(x, y).then(&self.state.transform);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = CanvasTransform::rotation(radians).then(&self.state.transform);
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.state.fill_style = color;
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.state.composite_operation = operation;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.current_point = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, point: Point2<f64>) {
        let point = self.to_device(point);
        self.path.push(PathVerb::MoveTo(point));
        self.current_point = Some(point);
        self.subpath_start = Some(point);
    }

    fn line_to(&mut self, point: Point2<f64>) {
        let point = self.to_device(point);
        self.connect_to(point);
    }

    fn arc(&mut self, center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.ellipse(center, radius, radius, 0.0, start_angle, end_angle, counterclockwise);
    }

    fn ellipse(
        &mut self,
        center: Point2<f64>,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) {
        let values = [center.x, center.y, radius_x, radius_y, rotation, start_angle, end_angle];
        if values.iter().any(|value| !value.is_finite()) || radius_x < 0.0 || radius_y < 0.0 {
            trace!("ignoring invalid arc. center: {:?}, radii: {}, {}", center, radius_x, radius_y);
            return;
        }

        let arc = Arc {
            center: point(center.x, center.y),
            radii: vector(radius_x, radius_y),
            start_angle: Angle::radians(start_angle),
            sweep_angle: Angle::radians(arc_sweep(start_angle, end_angle, counterclockwise)),
            x_rotation: Angle::radians(rotation),
        };
        self.add_elliptical_arc(arc);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let corners = [
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + height),
            Point2::new(x, y + height),
        ]
        .map(|corner| self.to_device(corner));

        self.path.push(PathVerb::MoveTo(corners[0]));
        for corner in &corners[1..] {
            self.path.push(PathVerb::LineTo(*corner));
        }
        self.path.push(PathVerb::Close);

        self.path.push(PathVerb::MoveTo(corners[0]));
        self.current_point = Some(corners[0]);
        self.subpath_start = Some(corners[0]);
    }

    fn close_path(&mut self) {
        if self.current_point.is_none() {
            return;
        }
        self.path.push(PathVerb::Close);
        self.current_point = self.subpath_start;
    }

    fn fill(&mut self, rule: FillRule) {
        let Some(path) = self.build_path() else {
            trace!("nothing to fill, path is empty or degenerate");
            return;
        };

        let CanvasState {
            fill_style,
            composite_operation,
            ..
        } = self.state;

        let mut paint = Paint::default();
        paint.set_color_rgba8(fill_style.r, fill_style.g, fill_style.b, fill_style.a);
        paint.anti_alias = true;
        paint.blend_mode = match composite_operation {
            CompositeOperation::SourceOver => BlendMode::SourceOver,
            CompositeOperation::DestinationOut => BlendMode::DestinationOut,
        };

        let rule = match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        };

        self.pixmap
            .fill_path(&path, &paint, rule, Transform::identity(), None);
    }
}
