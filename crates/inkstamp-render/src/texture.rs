//! Decoded texture assets and the cache that memoizes them.

use inkstamp_core::{AssetError, AssetStore, BuiltinTexture};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Texture loading errors.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Asset unavailable: {0}")]
    Asset(#[from] AssetError),
    #[error("Decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Texture {0} has no pixels")]
    Empty(String),
}

/// An immutable decoded bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// Asset name the texture was decoded from.
    name: String,
    width: u32,
    height: u32,
    /// Premultiplied RGBA8 pixels, row-major.
    data: Vec<u8>,
}

impl DecodedTexture {
    /// Create a texture from straight-alpha RGBA8 pixels.
    ///
    /// Returns `None` if the buffer size does not match the dimensions or
    /// either dimension is zero.
    pub fn from_rgba8(name: impl Into<String>, width: u32, height: u32, mut rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        premultiply(&mut rgba);
        Some(Self {
            name: name.into(),
            width,
            height,
            data: rgba,
        })
    }

    /// Decode an encoded image (any format the `image` crate is built with).
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, TextureError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(name, width, height, rgba.into_raw())
            .ok_or_else(|| TextureError::Empty(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Memoizing texture loader.
///
/// Each distinct name is decoded at most once per cache; entries never
/// expire. Failed loads are not cached, so a later request retries.
/// The cache is not synchronized: callers on several threads must serialize
/// access themselves.
pub struct TextureCache<A> {
    assets: A,
    /// Decoded textures keyed by asset name.
    textures: HashMap<String, Arc<DecodedTexture>>,
}

impl<A: AssetStore> TextureCache<A> {
    /// Create an empty cache reading from `assets`.
    pub fn new(assets: A) -> Self {
        Self {
            assets,
            textures: HashMap::new(),
        }
    }

    /// Get the texture called `name`, loading and decoding it on first use.
    ///
    /// Returns `None` if the asset is missing or cannot be decoded.
    pub fn get(&mut self, name: &str) -> Option<Arc<DecodedTexture>> {
        match self.load(name) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("Texture {name} unavailable: {e}");
                None
            }
        }
    }

    /// Like [`get`](Self::get), but reports why a texture could not be loaded.
    pub fn load(&mut self, name: &str) -> Result<Arc<DecodedTexture>, TextureError> {
        if let Some(cached) = self.textures.get(name) {
            return Ok(Arc::clone(cached));
        }

        log::debug!("Texture cache miss: {name}");
        let bytes = self.assets.load(name)?;
        let texture = Arc::new(DecodedTexture::decode(name, &bytes)?);
        log::debug!("Decoded texture {name} ({}x{})", texture.width(), texture.height());
        self.textures.insert(name.to_string(), Arc::clone(&texture));
        Ok(texture)
    }

    /// Load every name in `names`, returning how many are now cached.
    pub fn preload<'n>(&mut self, names: impl IntoIterator<Item = &'n str>) -> usize {
        names
            .into_iter()
            .filter(|name| self.get(name).is_some())
            .count()
    }

    /// Load all built-in textures, returning how many are available.
    pub fn preload_builtin(&mut self) -> usize {
        self.preload(BuiltinTexture::ALL.iter().map(|t| t.asset_name()))
    }

    /// Check if `name` has already been decoded.
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Number of decoded textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Get the underlying asset store.
    pub fn assets(&self) -> &A {
        &self.assets
    }
}

/// Encode a solid `width` x `height` PNG, used as a fixture in tests.
#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png fixture");
    bytes.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstamp_core::{AssetResult, MemoryAssets};
    use std::cell::Cell;

    /// Asset store wrapper counting load calls.
    struct CountingAssets {
        inner: MemoryAssets,
        loads: Cell<usize>,
    }

    impl CountingAssets {
        fn new(inner: MemoryAssets) -> Self {
            Self {
                inner,
                loads: Cell::new(0),
            }
        }
    }

    impl AssetStore for CountingAssets {
        fn load(&self, name: &str) -> AssetResult<Vec<u8>> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load(name)
        }
    }

    fn assets_with(name: &str) -> MemoryAssets {
        let mut assets = MemoryAssets::new();
        assets.insert(name, png_fixture(4, 2, [10, 20, 30, 255]));
        assets
    }

    #[test]
    fn test_decode_png() {
        let texture = DecodedTexture::decode("grain", &png_fixture(4, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!(texture.name(), "grain");
        assert_eq!(texture.width(), 4);
        assert_eq!(texture.height(), 2);
        assert_eq!(texture.data().len(), 4 * 2 * 4);
        assert_eq!(&texture.data()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_premultiplies() {
        let texture = DecodedTexture::decode("half", &png_fixture(1, 1, [200, 100, 0, 128])).unwrap();
        assert_eq!(texture.data(), &[100, 50, 0, 128]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = DecodedTexture::decode("junk", b"not an image");
        assert!(matches!(result, Err(TextureError::Decode(_))));
    }

    #[test]
    fn test_from_rgba8_rejects_bad_sizes() {
        assert!(DecodedTexture::from_rgba8("a", 0, 1, vec![]).is_none());
        assert!(DecodedTexture::from_rgba8("a", 2, 2, vec![0; 15]).is_none());
        assert!(DecodedTexture::from_rgba8("a", 2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_successful_load_is_decoded_once() {
        let mut cache = TextureCache::new(CountingAssets::new(assets_with("texture_chalk")));

        let first = cache.get("texture_chalk").unwrap();
        let second = cache.get("texture_chalk").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.assets().loads.get(), 1);
        assert!(cache.contains("texture_chalk"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_texture_is_not_cached() {
        let mut cache = TextureCache::new(CountingAssets::new(MemoryAssets::new()));

        assert!(cache.get("missing").is_none());
        assert!(cache.get("missing").is_none());

        assert_eq!(cache.assets().loads.get(), 2);
        assert!(!cache.contains("missing"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failure_is_retried_after_asset_appears() {
        let mut assets = MemoryAssets::new();
        assets.insert("texture_oil", b"corrupt".to_vec());
        let mut cache = TextureCache::new(assets);

        assert!(matches!(cache.load("texture_oil"), Err(TextureError::Decode(_))));

        let mut fixed = assets_with("texture_oil");
        std::mem::swap(&mut cache.assets, &mut fixed);
        assert!(cache.get("texture_oil").is_some());
    }

    #[test]
    fn test_load_reports_missing_asset() {
        let mut cache = TextureCache::new(MemoryAssets::new());
        assert!(matches!(
            cache.load("texture_spray"),
            Err(TextureError::Asset(AssetError::NotFound(_)))
        ));
    }

    #[test]
    fn test_preload_builtin() {
        let mut assets = MemoryAssets::new();
        for name in ["texture_pencil", "texture_chalk"] {
            assets.insert(name, png_fixture(2, 2, [0, 0, 0, 255]));
        }
        let mut cache = TextureCache::new(assets);

        assert_eq!(cache.preload_builtin(), 2);
        assert!(cache.contains("texture_pencil"));
        assert!(!cache.contains("texture_oil"));
    }
}
