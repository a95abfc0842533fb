mod arc;
mod board;
pub mod canvas;
mod color;
mod cutout;
mod drawing;
mod geometry;
mod renderer;
mod ring;
mod types;

pub use arc::*;
pub use board::*;
pub use canvas::{CompositeOperation, DrawingContext, FillRule, SavedState};
#[cfg(feature = "raster")]
pub use canvas::pixmap::{CanvasError, PixmapCanvas};
pub use color::*;
pub use cutout::*;
pub use drawing::*;
pub use geometry::*;
pub use renderer::*;
pub use ring::*;
pub use types::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
