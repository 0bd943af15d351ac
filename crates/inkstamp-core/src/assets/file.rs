//! Directory-backed asset store.

use super::{AssetError, AssetResult, AssetStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension tried when an asset name has no file of its own.
const DEFAULT_EXTENSION: &str = "png";

/// Asset store reading image files from a directory.
///
/// An asset `name` resolves to `<base>/<name>` or, failing that,
/// `<base>/<name>.png`.
#[derive(Debug, Clone)]
pub struct FileAssets {
    /// Directory holding the asset files.
    base_path: PathBuf,
}

impl FileAssets {
    /// Create a store reading from `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve an asset name to an existing file.
    fn asset_path(&self, name: &str) -> AssetResult<PathBuf> {
        // Names must stay inside the base directory
        if matches!(name, "" | "." | "..") || name.contains(['/', '\\']) {
            return Err(AssetError::InvalidName(name.to_string()));
        }

        let exact = self.base_path.join(name);
        if exact.is_file() {
            return Ok(exact);
        }

        let with_ext = self.base_path.join(format!("{name}.{DEFAULT_EXTENSION}"));
        if with_ext.is_file() {
            return Ok(with_ext);
        }

        Err(AssetError::NotFound(name.to_string()))
    }
}

impl AssetStore for FileAssets {
    fn load(&self, name: &str) -> AssetResult<Vec<u8>> {
        let path = self.asset_path(name)?;
        log::debug!("Loading asset {name} from {}", path.display());
        fs::read(&path)
            .map_err(|e| AssetError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn exists(&self, name: &str) -> bool {
        self.asset_path(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_exact_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("grain.bin"), [7u8, 8, 9]).unwrap();

        let assets = FileAssets::new(dir.path());
        assert_eq!(assets.load("grain.bin").unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn test_load_with_default_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("texture_chalk.png"), [1u8, 2]).unwrap();

        let assets = FileAssets::new(dir.path());
        assert!(assets.exists("texture_chalk"));
        assert_eq!(assets.load("texture_chalk").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let assets = FileAssets::new(dir.path());

        let result = assets.load("texture_oil");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
        assert!(!assets.exists("texture_oil"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let assets = FileAssets::new(dir.path().join("textures"));

        for name in ["../secret", "a/b", "a\\b", "..", ""] {
            let result = assets.load(name);
            assert!(matches!(result, Err(AssetError::InvalidName(_))), "{name:?}");
        }
    }

    #[test]
    fn test_directory_is_not_an_asset() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("texture_spray")).unwrap();

        let assets = FileAssets::new(dir.path());
        assert!(matches!(assets.load("texture_spray"), Err(AssetError::NotFound(_))));
    }
}
