//! The 2D drawing surface consumed by the renderer.
//!
//! [`DrawingContext`] mirrors the subset of an HTML-canvas style API the solder-mask renderer needs.
//! Path commands are expressed in user space and are mapped through the context's current transform
//! when they are added, exactly like a canvas.

use std::f64::consts::TAU;
use std::ops::{Deref, DerefMut};

use nalgebra::Point2;

use crate::Rgba;

#[cfg(feature = "raster")]
pub mod pixmap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOperation {
    /// Draw new shapes over existing content.
    #[default]
    SourceOver,
    /// Erase existing content wherever new shapes are drawn, proportionally to the new shape's alpha.
    DestinationOut,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

pub trait DrawingContext {
    /// Pushes the fill style, composite operation and transform onto the state stack.
    fn save(&mut self);
    /// Pops the state stack, does nothing when the stack is empty.
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    /// Rotates the current transform, positive angles rotate from +X towards +Y.
    fn rotate(&mut self, radians: f64);

    fn set_fill_style(&mut self, color: Rgba);
    fn set_composite_operation(&mut self, operation: CompositeOperation);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point2<f64>);
    fn line_to(&mut self, point: Point2<f64>);
    /// Adds a circular arc, connecting it to the current point with a straight line if there is one.
    fn arc(&mut self, center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        center: Point2<f64>,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    );
    /// Adds a closed rectangular sub-path.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);
    fn fill(&mut self, rule: FillRule);
}

/// Scoped drawing state.
///
/// Calls `save` on creation and `restore` when dropped, so state changes made through the guard can't
/// leak to the caller on any exit path.
pub struct SavedState<'a, C: DrawingContext + ?Sized> {
    context: &'a mut C,
}

impl<'a, C: DrawingContext + ?Sized> SavedState<'a, C> {
    pub fn new(context: &'a mut C) -> Self {
        context.save();
        Self {
            context,
        }
    }
}

impl<C: DrawingContext + ?Sized> Deref for SavedState<'_, C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl<C: DrawingContext + ?Sized> DerefMut for SavedState<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl<C: DrawingContext + ?Sized> Drop for SavedState<'_, C> {
    fn drop(&mut self) {
        self.context.restore();
    }
}

/// Signed sweep, in radians, that a canvas `arc` call with these arguments traces.
///
/// Follows the canvas rules: a difference of a full turn or more in the drawing direction is a full
/// circle, anything else is reduced into a single turn.
pub fn arc_sweep(start_angle: f64, end_angle: f64, counterclockwise: bool) -> f64 {
    if counterclockwise {
        let delta = start_angle - end_angle;
        if delta >= TAU {
            return -TAU;
        }
        -delta.rem_euclid(TAU)
    } else {
        let delta = end_angle - start_angle;
        if delta >= TAU {
            return TAU;
        }
        delta.rem_euclid(TAU)
    }
}
