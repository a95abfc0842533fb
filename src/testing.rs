//! Test helpers: a drawing context that records every call instead of rasterizing.

use nalgebra::Point2;

use crate::canvas::{arc_sweep, CompositeOperation, DrawingContext, FillRule};
use crate::Rgba;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate {
        x: f64,
        y: f64,
    },
    Rotate(f64),
    SetFillStyle(Rgba),
    SetCompositeOperation(CompositeOperation),
    BeginPath,
    MoveTo(Point2<f64>),
    LineTo(Point2<f64>),
    Arc {
        center: Point2<f64>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    },
    Ellipse {
        center: Point2<f64>,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClosePath,
    Fill(FillRule),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Every `save` has a matching `restore`, and no `restore` comes before its `save`.
    pub fn is_balanced(&self) -> bool {
        let mut depth: i64 = 0;
        for command in &self.commands {
            match command {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    pub fn fills(&self) -> Vec<FillRule> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Fill(rule) => Some(*rule),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands
            .iter()
            .filter(|command| predicate(command))
            .count()
    }

    /// Index of the first command matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
        self.commands
            .iter()
            .position(predicate)
    }

    /// Sum of the signed sweeps of every recorded arc, in radians.
    pub fn total_arc_sweep(&self) -> f64 {
        self.commands
            .iter()
            .map(|command| match command {
                DrawCommand::Arc {
                    start_angle,
                    end_angle,
                    counterclockwise,
                    ..
                } => arc_sweep(*start_angle, *end_angle, *counterclockwise),
                _ => 0.0,
            })
            .sum()
    }
}

impl DrawingContext for RecordingCanvas {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate {
            x,
            y,
        });
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::SetFillStyle(color));
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.commands
            .push(DrawCommand::SetCompositeOperation(operation));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point2<f64>) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point2<f64>) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn arc(&mut self, center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            counterclockwise,
        });
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
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
            counterclockwise,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, rule: FillRule) {
        self.commands.push(DrawCommand::Fill(rule));
    }
}

/// Asserts two points are within `epsilon` of each other on both axes.
pub fn assert_point_eq(actual: Point2<f64>, expected: Point2<f64>, epsilon: f64) {
    assert!(
        (actual.x - expected.x).abs() < epsilon && (actual.y - expected.y).abs() < epsilon,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

