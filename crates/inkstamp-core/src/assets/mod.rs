//! Named asset lookup for textures.

mod file;
mod memory;

pub use file::FileAssets;
pub use memory::MemoryAssets;

use thiserror::Error;

/// Asset store errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Invalid asset name: {0}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Source of named, encoded image assets.
///
/// Implementations can read from memory, a bundled resource directory or an
/// archive. Loading is expected to be a pure function of the name.
pub trait AssetStore {
    /// Load the raw (encoded) bytes of the asset called `name`.
    fn load(&self, name: &str) -> AssetResult<Vec<u8>>;

    /// Check if an asset exists.
    fn exists(&self, name: &str) -> bool {
        self.load(name).is_ok()
    }
}

impl<T: AssetStore + ?Sized> AssetStore for &T {
    fn load(&self, name: &str) -> AssetResult<Vec<u8>> {
        (**self).load(name)
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }
}

impl<T: AssetStore + ?Sized> AssetStore for Box<T> {
    fn load(&self, name: &str) -> AssetResult<Vec<u8>> {
        (**self).load(name)
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }
}
