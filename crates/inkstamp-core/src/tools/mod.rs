//! Tool descriptors consumed by the stroke rasterizer.

use crate::style::{BlendMode, SerializableColor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tool descriptor errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Available tools.
///
/// The set is closed: descriptors naming any other kind fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    Pencil,
    Marker,
    Highlighter,
    Eraser,
    TexturedBrush,
    BlurEraser,
    PixelateEraser,
}

/// Rendering strategy a tool kind is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Round-capped line per segment.
    Plain,
    /// Interpolated texture or dot stamps per segment.
    Textured,
    /// Translucent white discs at each sample.
    Blur,
    /// Flat gray grid cells at each sample.
    Pixelate,
}

impl ToolKind {
    /// Every tool kind, in palette order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Pen,
        ToolKind::Pencil,
        ToolKind::Marker,
        ToolKind::Highlighter,
        ToolKind::Eraser,
        ToolKind::TexturedBrush,
        ToolKind::BlurEraser,
        ToolKind::PixelateEraser,
    ];

    /// Strategy used to render this kind.
    pub fn render_path(self) -> RenderPath {
        match self {
            ToolKind::BlurEraser => RenderPath::Blur,
            ToolKind::PixelateEraser => RenderPath::Pixelate,
            ToolKind::TexturedBrush => RenderPath::Textured,
            ToolKind::Pen
            | ToolKind::Pencil
            | ToolKind::Marker
            | ToolKind::Highlighter
            | ToolKind::Eraser => RenderPath::Plain,
        }
    }

    /// Whether this tool alters existing pixels instead of adding ink.
    pub fn is_destructive(self) -> bool {
        matches!(self.render_path(), RenderPath::Blur | RenderPath::Pixelate)
    }

    /// Get display name for this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Pencil => "Pencil",
            ToolKind::Marker => "Marker",
            ToolKind::Highlighter => "Highlighter",
            ToolKind::Eraser => "Eraser",
            ToolKind::TexturedBrush => "Custom",
            ToolKind::BlurEraser => "Blur",
            ToolKind::PixelateEraser => "Pixelate",
        }
    }
}

/// Textures bundled with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinTexture {
    Pencil,
    Chalk,
    Watercolor,
    Oil,
    Spray,
}

impl BuiltinTexture {
    pub const ALL: [BuiltinTexture; 5] = [
        BuiltinTexture::Pencil,
        BuiltinTexture::Chalk,
        BuiltinTexture::Watercolor,
        BuiltinTexture::Oil,
        BuiltinTexture::Spray,
    ];

    /// Name of the asset holding this texture.
    pub fn asset_name(self) -> &'static str {
        match self {
            BuiltinTexture::Pencil => "texture_pencil",
            BuiltinTexture::Chalk => "texture_chalk",
            BuiltinTexture::Watercolor => "texture_watercolor",
            BuiltinTexture::Oil => "texture_oil",
            BuiltinTexture::Spray => "texture_spray",
        }
    }

    /// Get display name for this texture.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinTexture::Pencil => "Pencil",
            BuiltinTexture::Chalk => "Chalk",
            BuiltinTexture::Watercolor => "Watercolor",
            BuiltinTexture::Oil => "Oil Paint",
            BuiltinTexture::Spray => "Spray Paint",
        }
    }

    /// Look up a built-in texture by asset name.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.asset_name() == name)
    }
}

fn default_width() -> f64 {
    5.0
}

fn default_opacity() -> f64 {
    1.0
}

/// Configuration of the tool a stroke is drawn with.
///
/// Values are used as given: width, opacity and pressure are not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    /// Base stroke width, scaled per segment by pressure.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Global alpha for every primitive of a stroke (0.0 - 1.0).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub color: SerializableColor,
    /// Asset name of the stamp texture (textured brush only).
    #[serde(default)]
    pub texture: Option<String>,
}

impl Default for ToolDescriptor {
    fn default() -> Self {
        Self {
            kind: ToolKind::default(),
            width: default_width(),
            opacity: default_opacity(),
            blend_mode: BlendMode::Normal,
            color: SerializableColor::black(),
            texture: None,
        }
    }
}

impl ToolDescriptor {
    /// Create a descriptor with default settings for `kind`.
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a descriptor with the preset settings of `kind`.
    pub fn for_kind(kind: ToolKind) -> Self {
        let tool = Self::new(kind);
        match kind {
            ToolKind::Pen | ToolKind::Marker | ToolKind::BlurEraser | ToolKind::PixelateEraser => {
                tool
            }
            ToolKind::Pencil => tool.with_width(2.0),
            // Wide and semi-transparent so underlying ink shows through
            ToolKind::Highlighter => tool
                .with_width(12.0)
                .with_color(SerializableColor::new(255, 221, 0, 128))
                .with_blend_mode(BlendMode::Multiply),
            ToolKind::Eraser => tool.with_width(20.0).with_blend_mode(BlendMode::Clear),
            ToolKind::TexturedBrush => tool
                .with_width(16.0)
                .with_texture(BuiltinTexture::Pencil.asset_name()),
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    /// Stroke width for a segment starting at a sample with `pressure`.
    pub fn width_at(&self, pressure: f64) -> f64 {
        self.width * pressure
    }

    /// Serialize the descriptor to JSON.
    pub fn to_json(&self) -> Result<String, ToolError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a descriptor from JSON.
    pub fn from_json(json: &str) -> Result<Self, ToolError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let tool = ToolDescriptor::default();
        assert_eq!(tool.kind, ToolKind::Pen);
        assert_eq!(tool.color, SerializableColor::black());
        assert!((tool.width - 5.0).abs() < f64::EPSILON);
        assert!((tool.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(tool.blend_mode, BlendMode::Normal);
        assert!(tool.texture.is_none());
    }

    #[test]
    fn test_render_paths() {
        assert_eq!(ToolKind::BlurEraser.render_path(), RenderPath::Blur);
        assert_eq!(ToolKind::PixelateEraser.render_path(), RenderPath::Pixelate);
        assert_eq!(ToolKind::TexturedBrush.render_path(), RenderPath::Textured);
        for kind in [ToolKind::Pen, ToolKind::Pencil, ToolKind::Marker, ToolKind::Highlighter, ToolKind::Eraser] {
            assert_eq!(kind.render_path(), RenderPath::Plain);
            assert!(!kind.is_destructive());
        }
        assert!(ToolKind::BlurEraser.is_destructive());
    }

    #[test]
    fn test_width_at_pressure() {
        let tool = ToolDescriptor::default();
        assert!((tool.width_at(1.0) - 5.0).abs() < f64::EPSILON);
        assert!((tool.width_at(0.5) - 2.5).abs() < f64::EPSILON);
        // Out-of-range pressure passes through.
        assert!((tool.width_at(-1.0) + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_presets() {
        let eraser = ToolDescriptor::for_kind(ToolKind::Eraser);
        assert_eq!(eraser.blend_mode, BlendMode::Clear);

        let brush = ToolDescriptor::for_kind(ToolKind::TexturedBrush);
        assert_eq!(brush.texture.as_deref(), Some("texture_pencil"));

        let highlighter = ToolDescriptor::for_kind(ToolKind::Highlighter);
        assert!(highlighter.color.a < 255);
    }

    #[test]
    fn test_json_roundtrip() {
        let tool = ToolDescriptor::for_kind(ToolKind::TexturedBrush).with_opacity(0.4);
        let json = tool.to_json().unwrap();
        let parsed = ToolDescriptor::from_json(&json).unwrap();
        assert_eq!(parsed, tool);
    }

    #[test]
    fn test_json_defaults() {
        let tool = ToolDescriptor::from_json(r#"{"kind":"marker"}"#).unwrap();
        assert_eq!(tool.kind, ToolKind::Marker);
        assert!((tool.width - 5.0).abs() < f64::EPSILON);
        assert!((tool.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = ToolDescriptor::from_json(r#"{"kind":"laser_pointer"}"#);
        assert!(matches!(result, Err(ToolError::Parse(_))));
    }

    #[test]
    fn test_builtin_texture_lookup() {
        for texture in BuiltinTexture::ALL {
            assert_eq!(BuiltinTexture::from_asset_name(texture.asset_name()), Some(texture));
        }
        assert_eq!(BuiltinTexture::from_asset_name("texture_unknown"), None);
    }
}
