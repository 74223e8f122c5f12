//! Texture decoding and caching.
//!
//! Textures are decoded once, cached by path, and sampled with
//! nearest-pixel lookup. Index 0 always holds a generated "missing texture"
//! checker; failed loads resolve to it so rendering degrades visibly instead
//! of crashing.

use std::path::Path;

use glam::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Handle to a texture in a [`TextureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureId(usize);

impl TextureId {
    /// The sentinel "missing texture" installed at cache construction.
    pub const MISSING: TextureId = TextureId(0);
}

/// A decoded texture: dimensions plus an RGBA byte buffer.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, one `[u8; 4]` per pixel.
    pub pixels: Vec<[u8; 4]>,
    path: String,
}

impl Texture {
    /// Sample at normalized UV with nearest-pixel lookup, returning linear
    /// RGB in [0, 1].
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let x = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = ((v * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as usize;

        let [r, g, b, _] = self.pixels[y * self.width as usize + x];
        Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// The sentinel pattern: a 2x2 magenta/black checker.
    fn missing() -> Self {
        const MAGENTA: [u8; 4] = [255, 0, 255, 255];
        const BLACK: [u8; 4] = [0, 0, 0, 255];
        Self {
            width: 2,
            height: 2,
            pixels: vec![MAGENTA, BLACK, BLACK, MAGENTA],
            path: "<missing>".to_string(),
        }
    }
}

/// Cache of decoded textures, addressed by [`TextureId`].
#[derive(Debug)]
pub struct TextureCache {
    textures: Vec<Texture>,
}

impl TextureCache {
    /// Create a cache with the missing-texture sentinel at index 0.
    pub fn new() -> Self {
        Self {
            textures: vec![Texture::missing()],
        }
    }

    /// Load a texture, de-duplicating by path.
    ///
    /// On any decode failure a warning is logged and the sentinel id is
    /// returned; the render continues with the checker pattern in place.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureId {
        let path = path.as_ref();
        let key = path.to_string_lossy();

        if let Some(index) = self.textures.iter().position(|t| t.path == key) {
            return TextureId(index);
        }

        match decode(path) {
            Ok(mut texture) => {
                texture.path = key.into_owned();
                log::debug!(
                    "loaded texture {} ({}x{})",
                    texture.path,
                    texture.width,
                    texture.height
                );
                let id = TextureId(self.textures.len());
                self.textures.push(texture);
                id
            }
            Err(err) => {
                log::warn!("could not load texture {}: {err}", path.display());
                TextureId::MISSING
            }
        }
    }

    /// Sample a cached texture at normalized UV.
    pub fn sample(&self, id: TextureId, u: f32, v: f32) -> Vec3 {
        self.textures[id.0].sample(u, v)
    }

    /// Number of cached textures (including the sentinel).
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into an RGBA texture.
fn decode(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = rgba.pixels().map(|p| p.0).collect();
    Ok(Texture {
        width,
        height,
        pixels,
        path: String::new(),
    })
}
