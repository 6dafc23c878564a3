//! Texture decoding and CPU-side pixel data.
//! E2: RGBA8 textures from PNG files or in-memory bytes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Decode a PNG held in memory into RGBA8.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("Failed to decode PNG bytes")?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new_rgba8(width, height, rgba.into_raw()))
    }

    /// Load a texture from a PNG file.
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
        let texture = Self::decode_png(&bytes)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        log::debug!(
            "decoded texture {} ({}x{}, {} bytes)",
            path.display(),
            texture.width,
            texture.height,
            texture.data.len()
        );
        Ok(texture)
    }

    /// Create a simple test texture (checkerboard pattern).
    pub fn checkerboard(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                if ((x / 8) + (y / 8)) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }
        Self::new_rgba8(size, size, data)
    }

    /// Encode back to PNG bytes. Used by tools that bake generated images.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut out);
        image::ImageEncoder::write_image(
            encoder,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| anyhow!("Failed to encode PNG: {e}"))?;
        Ok(out)
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected && self.width > 0 && self.height > 0
    }
}
