//! CPU raster surface backed by a tiny-skia pixmap.

use crate::surface::{Surface, SurfaceError, SurfaceResult};
use crate::texture::DecodedTexture;
use inkstamp_core::{BlendMode, SerializableColor};
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use tiny_skia::{
    BlendMode as SkiaBlendMode, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder,
    Pixmap, PixmapPaint, PixmapRef, Rect as SkiaRect, Stroke, Transform,
};

/// Graphics state applied to every primitive.
#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    transform: Affine,
    blend_mode: BlendMode,
    alpha: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            blend_mode: BlendMode::Normal,
            alpha: 1.0,
        }
    }
}

impl GraphicsState {
    fn skia_transform(&self) -> Transform {
        let [a, b, c, d, e, f] = self.transform.as_coeffs();
        Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let rgba = SerializableColor::from(color);
        let mut paint = Paint::default();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, scaled_alpha(rgba.a, self.alpha));
        paint.blend_mode = to_skia(self.blend_mode);
        paint.anti_alias = true;
        paint
    }
}

/// Multiply an 8-bit alpha by a global alpha factor.
fn scaled_alpha(a: u8, alpha: f64) -> u8 {
    (f64::from(a) * alpha.clamp(0.0, 1.0)).round() as u8
}

fn to_skia(mode: BlendMode) -> SkiaBlendMode {
    match mode {
        BlendMode::Normal => SkiaBlendMode::SourceOver,
        BlendMode::Multiply => SkiaBlendMode::Multiply,
        BlendMode::Screen => SkiaBlendMode::Screen,
        BlendMode::Overlay => SkiaBlendMode::Overlay,
        BlendMode::Darken => SkiaBlendMode::Darken,
        BlendMode::Lighten => SkiaBlendMode::Lighten,
        BlendMode::ColorDodge => SkiaBlendMode::ColorDodge,
        BlendMode::ColorBurn => SkiaBlendMode::ColorBurn,
        BlendMode::SoftLight => SkiaBlendMode::SoftLight,
        BlendMode::HardLight => SkiaBlendMode::HardLight,
        BlendMode::Difference => SkiaBlendMode::Difference,
        BlendMode::Exclusion => SkiaBlendMode::Exclusion,
        BlendMode::Clear => SkiaBlendMode::Clear,
    }
}

fn to_skia_rect(rect: Rect) -> Option<SkiaRect> {
    SkiaRect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
}

/// Raster surface drawing into an owned RGBA pixmap.
///
/// Not thread-safe; one surface per rendering thread.
pub struct PixmapSurface {
    /// The underlying pixel buffer (premultiplied RGBA).
    pixmap: Pixmap,
    /// Saved graphics states.
    state_stack: Vec<GraphicsState>,
    /// Current graphics state.
    state: GraphicsState,
}

impl PixmapSurface {
    /// Create a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self::from_pixmap(pixmap))
    }

    /// Create a surface filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Color) -> SurfaceResult<Self> {
        let mut surface = Self::new(width, height)?;
        surface.clear(background);
        Ok(surface)
    }

    /// Wrap an existing pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            state_stack: Vec::new(),
            state: GraphicsState::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill every pixel with `color`, ignoring the graphics state.
    pub fn clear(&mut self, color: Color) {
        let rgba = SerializableColor::from(color);
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));
    }

    /// Read a pixel as straight-alpha RGBA8.
    ///
    /// Returns `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<SerializableColor> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(SerializableColor::new(px.red(), px.green(), px.blue(), px.alpha()))
    }

    /// Depth of the saved-state stack.
    pub fn saved_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Get the underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the surface and return the underlying pixmap.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Encode the current pixels as PNG.
    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }
}

impl Surface for PixmapSurface {
    fn save(&mut self) {
        self.state_stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn concat_transform(&mut self, affine: Affine) {
        self.state.transform = self.state.transform * affine;
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        let paint = self.state.paint(color);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.state.skia_transform(), None);
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        let Some(path) = to_skia_rect(rect).and_then(PathBuilder::from_oval) else {
            return;
        };
        let paint = self.state.paint(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.state.skia_transform(), None);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let paint = self.state.paint(color);
        self.pixmap
            .fill_rect(rect, &paint, self.state.skia_transform(), None);
    }

    fn draw_texture(&mut self, texture: &DecodedTexture, rect: Rect) {
        let Some(source) = PixmapRef::from_bytes(texture.data(), texture.width(), texture.height())
        else {
            return;
        };
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        // Map texture pixel space onto the destination rectangle
        let placement = Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / f64::from(texture.width()),
                rect.height() / f64::from(texture.height()),
            );
        let mut state = self.state;
        state.transform = state.transform * placement;

        let paint = PixmapPaint {
            opacity: self.state.alpha.clamp(0.0, 1.0) as f32,
            blend_mode: to_skia(self.state.blend_mode),
            quality: FilterQuality::Bilinear,
        };
        self.pixmap
            .draw_pixmap(0, 0, source, &paint, state.skia_transform(), None);
    }
}
