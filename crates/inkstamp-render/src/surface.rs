//! Drawing surface trait abstraction.

use crate::texture::DecodedTexture;
use inkstamp_core::BlendMode;
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Mutable raster target the stroke engine draws into.
///
/// A surface keeps a current graphics state (transform, compositing operator,
/// global alpha) that applies to every primitive, plus a stack of saved
/// states. Implementations can rasterize on the CPU, record a display list,
/// or forward to a GPU scene.
pub trait Surface {
    /// Push a copy of the current graphics state.
    fn save(&mut self);

    /// Pop the most recently saved graphics state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Set the compositing operator for subsequent primitives.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Set the global alpha for subsequent primitives.
    fn set_alpha(&mut self, alpha: f64);

    /// Post-multiply the current transform by `affine`.
    fn concat_transform(&mut self, affine: Affine);

    /// Stroke a straight line with round caps and joins.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);

    /// Fill the ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: Rect, color: Color);

    /// Fill `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `texture` scaled into `rect`.
    fn draw_texture(&mut self, texture: &DecodedTexture, rect: Rect);

    /// Save the graphics state and return a guard that restores it when dropped.
    fn saved(&mut self) -> SavedState<'_, Self>
    where
        Self: Sized,
    {
        SavedState::new(self)
    }
}

/// Scoped graphics-state override.
///
/// Dereferences to the surface; the state saved on creation is restored when
/// the guard goes out of scope, on every exit path.
pub struct SavedState<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SavedState<'a, S> {
    /// Save the state of `surface` until the guard is dropped.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
