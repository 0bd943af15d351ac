//! inkstamp Render Library
//!
//! Stroke rasterizer, texture cache and drawing-surface abstraction.
//! The default raster surface uses tiny-skia for CPU rendering.

mod pixmap;
pub mod rasterizer;
pub mod recording;
mod surface;
pub mod texture;

pub use pixmap::PixmapSurface;
pub use rasterizer::{StrokeConfig, StrokeRasterizer, stamp_steps};
pub use recording::{DrawCommand, RecordedState, RecordingSurface};
pub use surface::{SavedState, Surface, SurfaceError, SurfaceResult};
pub use texture::{DecodedTexture, TextureCache, TextureError};
