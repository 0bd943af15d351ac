//! Display-list surface that records primitives instead of rasterizing them.

use crate::surface::Surface;
use crate::texture::DecodedTexture;
use inkstamp_core::{BlendMode, SerializableColor};
use kurbo::{Affine, Point, Rect};
use peniko::Color;

/// Graphics state captured with each recorded primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedState {
    pub transform: Affine,
    pub blend_mode: BlendMode,
    pub alpha: f64,
}

impl Default for RecordedState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            blend_mode: BlendMode::Normal,
            alpha: 1.0,
        }
    }
}

/// A primitive issued against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: SerializableColor,
        state: RecordedState,
    },
    Ellipse {
        rect: Rect,
        color: SerializableColor,
        state: RecordedState,
    },
    Rect {
        rect: Rect,
        color: SerializableColor,
        state: RecordedState,
    },
    Texture {
        /// Name of the texture drawn.
        name: String,
        rect: Rect,
        state: RecordedState,
    },
}

impl DrawCommand {
    /// Graphics state the command was issued under.
    pub fn state(&self) -> &RecordedState {
        match self {
            DrawCommand::Line { state, .. }
            | DrawCommand::Ellipse { state, .. }
            | DrawCommand::Rect { state, .. }
            | DrawCommand::Texture { state, .. } => state,
        }
    }
}

/// Surface that keeps every primitive as a [`DrawCommand`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    state_stack: Vec<RecordedState>,
    state: RecordedState,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recording empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current graphics state.
    pub fn state(&self) -> &RecordedState {
        &self.state
    }

    /// Depth of the saved-state stack.
    pub fn saved_depth(&self) -> usize {
        self.state_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
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
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color: color.into(),
            state: self.state,
        });
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Ellipse {
            rect,
            color: color.into(),
            state: self.state,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color: color.into(),
            state: self.state,
        });
    }

    fn draw_texture(&mut self, texture: &DecodedTexture, rect: Rect) {
        self.commands.push(DrawCommand::Texture {
            name: texture.name().to_string(),
            rect,
            state: self.state,
        });
    }
}
