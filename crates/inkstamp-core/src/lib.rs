//! inkstamp Core Library
//!
//! Platform-agnostic data model for the inkstamp stroke engine: input samples,
//! tool descriptors, compositing operators and the asset store the texture
//! cache reads from.

pub mod assets;
pub mod sample;
pub mod style;
pub mod tools;

pub use assets::{AssetError, AssetResult, AssetStore, FileAssets, MemoryAssets};
pub use sample::{DEFAULT_PRESSURE, DEFAULT_TILT, Sample};
pub use style::{BlendMode, SerializableColor};
pub use tools::{BuiltinTexture, RenderPath, ToolDescriptor, ToolError, ToolKind};
