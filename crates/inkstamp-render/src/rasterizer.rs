//! Immediate-mode stroke rasterizer.
//!
//! Turns a sample sequence and a tool descriptor into drawing primitives on a
//! [`Surface`]. Ink tools walk consecutive sample pairs; destructive tools
//! act on each sample independently.

use crate::surface::{SavedState, Surface};
use crate::texture::{DecodedTexture, TextureCache};
use inkstamp_core::{AssetStore, BlendMode, RenderPath, Sample, SerializableColor, ToolDescriptor};
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunable constants of the rendering strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Distance between textured stamps, in surface units.
    pub stamp_spacing: f64,
    /// Radius of the blur-eraser disc.
    pub blur_radius: f64,
    /// Alpha of the white blur-eraser fill.
    pub blur_alpha: f64,
    /// Side of a pixelate-eraser grid cell.
    pub pixel_size: f64,
    /// Fill of a pixelated cell.
    pub pixelate_color: SerializableColor,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            stamp_spacing: 2.0,
            blur_radius: 20.0,
            blur_alpha: 0.3,
            pixel_size: 10.0,
            pixelate_color: SerializableColor::neutral_gray(),
        }
    }
}

/// Number of intervals a textured segment of `distance` is split into.
///
/// Always at least one, so coincident samples still stamp both endpoints.
/// Counts that are not finite or do not fit in `usize` also collapse to one.
pub fn stamp_steps(distance: f64, spacing: f64) -> usize {
    let steps = (distance / spacing).floor();
    if steps.is_finite() && steps >= 1.0 && steps < usize::MAX as f64 {
        steps as usize
    } else {
        1
    }
}

/// Square of side `size` centered on `center`.
fn centered_square(center: Point, size: f64) -> Rect {
    let half = size / 2.0;
    Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
}

/// Renders strokes, owning the texture cache used by textured brushes.
pub struct StrokeRasterizer<A> {
    textures: TextureCache<A>,
    config: StrokeConfig,
}

impl<A: AssetStore> StrokeRasterizer<A> {
    /// Create a rasterizer with default constants.
    pub fn new(assets: A) -> Self {
        Self::with_config(assets, StrokeConfig::default())
    }

    /// Create a rasterizer with custom constants.
    pub fn with_config(assets: A, config: StrokeConfig) -> Self {
        Self {
            textures: TextureCache::new(assets),
            config,
        }
    }

    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    pub fn textures(&self) -> &TextureCache<A> {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureCache<A> {
        &mut self.textures
    }

    /// Render `samples` with `tool` onto `surface`.
    ///
    /// Fewer than two samples draw nothing. The tool's blend mode and opacity
    /// apply to every primitive of the call; the surface's own graphics state
    /// is restored before returning.
    pub fn render<S: Surface>(&mut self, samples: &[Sample], tool: &ToolDescriptor, surface: &mut S) {
        if samples.len() < 2 {
            return;
        }

        let path = tool.kind.render_path();
        log::trace!("Rendering {} samples with {:?} ({:?})", samples.len(), tool.kind, path);

        let mut surface = SavedState::new(surface);
        surface.set_blend_mode(tool.blend_mode);
        surface.set_alpha(tool.opacity);

        match path {
            RenderPath::Blur => self.render_blur(samples, &mut *surface),
            RenderPath::Pixelate => self.render_pixelate(samples, &mut *surface),
            RenderPath::Textured => {
                // Resolved once per call; a failed lookup falls back to dots
                let texture = tool.texture.as_deref().and_then(|name| self.textures.get(name));
                for pair in samples.windows(2) {
                    self.render_textured_segment(&pair[0], &pair[1], tool, texture.as_ref(), &mut *surface);
                }
            }
            RenderPath::Plain => {
                let color = Color::from(tool.color);
                for pair in samples.windows(2) {
                    let width = tool.width_at(pair[0].pressure());
                    surface.stroke_line(pair[0].position, pair[1].position, width, color);
                }
            }
        }
    }

    /// Stamp textures or solid dots along one segment.
    fn render_textured_segment<S: Surface>(
        &self,
        start: &Sample,
        end: &Sample,
        tool: &ToolDescriptor,
        texture: Option<&Arc<DecodedTexture>>,
        surface: &mut S,
    ) {
        let width = tool.width_at(start.pressure());
        let tilt = start.tilt();
        let color = Color::from(tool.color);

        let steps = stamp_steps(start.position.distance(end.position), self.config.stamp_spacing);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let point = start.position.lerp(end.position, t);
            let rect = centered_square(point, width);

            match texture {
                Some(texture) => {
                    let mut stamp = surface.saved();
                    stamp.concat_transform(Affine::rotate_about(tilt, point));
                    stamp.set_blend_mode(BlendMode::Multiply);
                    stamp.draw_texture(texture, rect);
                }
                None => surface.fill_ellipse(rect, color),
            }
        }
    }

    /// Lighten a fixed-radius disc around every sample.
    ///
    /// Translucent overpaint standing in for a real blur of the pixels below.
    fn render_blur<S: Surface>(&self, samples: &[Sample], surface: &mut S) {
        let fill = Color::from(SerializableColor::white().with_alpha(self.config.blur_alpha));
        let diameter = self.config.blur_radius * 2.0;
        for sample in samples {
            surface.fill_ellipse(centered_square(sample.position, diameter), fill);
        }
    }

    /// Flatten the grid cell under every sample to a solid gray.
    fn render_pixelate<S: Surface>(&self, samples: &[Sample], surface: &mut S) {
        let fill = Color::from(self.config.pixelate_color);
        let size = self.config.pixel_size;
        for sample in samples {
            let x = (sample.position.x / size).floor() * size;
            let y = (sample.position.y / size).floor() * size;
            surface.fill_rect(Rect::new(x, y, x + size, y + size), fill);
        }
    }
}
