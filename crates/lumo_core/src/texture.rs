//! Texture loading and filtered lookup for materials.
//!
//! Textures are decoded once at load time into linear-light RGB floats and
//! queried many times, concurrently, during rendering. A texture that fails
//! to load degrades to a solid fallback color instead of aborting the
//! render.

use std::path::Path;

use lumo_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture {path} has zero dimension ({width}x{height})")]
    EmptyImage {
        path: String,
        width: u32,
        height: u32,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D color field sampled by surface texcoords.
///
/// Either a bitmap decoded from an image file, or an explicit solid color.
/// The solid variant doubles as the fallback when loading fails, so `sample`
/// never has a hidden "empty" state to check.
#[derive(Clone, Debug)]
pub enum Texture {
    /// Loaded image data: linear RGB, row-major, channel 0 is red.
    Bitmap {
        width: u32,
        height: u32,
        pixels: Vec<Vec3>,
    },
    /// Constant color, returned for every uv.
    Solid(Vec3),
}

/// Exponent used to linearize 8-bit channel values at load time.
const DECODE_GAMMA: f32 = 2.2;

impl Texture {
    /// Load a texture from an image file.
    ///
    /// Pixels are converted to RGB, normalized to `[0, 1]` and gamma-decoded
    /// (`v^2.2`) once here, so samples are already in linear light.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        // RGB8 regardless of the source channel layout; alpha is dropped.
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage {
                path: path.display().to_string(),
                width,
                height,
            });
        }

        let pixels: Vec<Vec3> = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    decode_channel(p[0]),
                    decode_channel(p[1]),
                    decode_channel(p[2]),
                )
            })
            .collect();

        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Texture::Bitmap {
            width,
            height,
            pixels,
        })
    }

    /// Load a texture, degrading to a solid fallback color on failure.
    ///
    /// The failure is logged once, here; sampling afterwards carries no
    /// trace of it.
    pub fn load_or_fallback(path: impl AsRef<Path>, fallback: Vec3) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!(
                    "Failed to load texture {}: {}. Using fallback color instead.",
                    path.display(),
                    err
                );
                Texture::Solid(fallback)
            }
        }
    }

    /// Create a solid color texture.
    pub fn solid(color: Vec3) -> Self {
        Texture::Solid(color)
    }

    /// Create a bitmap texture from pre-linearized pixel data.
    ///
    /// `pixels` is row-major with `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Texture::Bitmap {
            width,
            height,
            pixels,
        }
    }

    /// True iff a decoded image backs this texture.
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Texture::Bitmap { .. })
    }

    /// Get the bitmap dimensions, or `None` for a solid texture.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Texture::Bitmap { width, height, .. } => Some((*width, *height)),
            Texture::Solid(_) => None,
        }
    }

    /// Sample the texture at uv coordinates with bilinear filtering.
    ///
    /// `u` tiles: it is wrapped into `[0, 1)` by `u - floor(u)`. `v` is
    /// wrapped the same way and then flipped (`1 - v`) to account for image
    /// rows running top to bottom. Filtering clamps pixel indices at the
    /// borders rather than blending across the seam.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let (width, height, pixels) = match self {
            Texture::Solid(color) => return *color,
            Texture::Bitmap {
                width,
                height,
                pixels,
            } => (*width as i32, *height as i32, pixels),
        };

        let u = uv.x - uv.x.floor();
        let v = 1.0 - (uv.y - uv.y.floor());

        // Continuous pixel coordinates over [0, dim-1]
        let fx = u * (width - 1) as f32;
        let fy = v * (height - 1) as f32;

        let x0 = (fx as i32).clamp(0, width - 1);
        let y0 = (fy as i32).clamp(0, height - 1);
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);

        let dx = fx - x0 as f32;
        let dy = fy - y0 as f32;

        let c00 = pixels[(y0 * width + x0) as usize];
        let c10 = pixels[(y0 * width + x1) as usize];
        let c01 = pixels[(y1 * width + x0) as usize];
        let c11 = pixels[(y1 * width + x1) as usize];

        let top = c00 * (1.0 - dx) + c10 * dx;
        let bottom = c01 * (1.0 - dx) + c11 * dx;
        top * (1.0 - dy) + bottom * dy
    }
}

/// Convert an 8-bit channel value to linear light.
fn decode_channel(value: u8) -> f32 {
    (value as f32 / 255.0).powf(DECODE_GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_texture_ignores_uv() {
        let tex = Texture::solid(Vec3::new(1.0, 0.5, 0.0));
        assert!(!tex.is_bitmap());

        for uv in [Vec2::ZERO, Vec2::new(0.5, 0.5), Vec2::new(-3.7, 12.0)] {
            assert_eq!(tex.sample(uv), Vec3::new(1.0, 0.5, 0.0));
        }
    }

    #[test]
    fn test_single_pixel_bitmap() {
        let tex = Texture::from_pixels(1, 1, vec![Vec3::new(0.2, 0.4, 0.6)]);
        assert!(tex.is_bitmap());
        assert_eq!(tex.dimensions(), Some((1, 1)));

        // Every uv resolves to the one pixel
        for uv in [
            Vec2::ZERO,
            Vec2::new(0.99, 0.01),
            Vec2::new(-1.5, 2.5),
            Vec2::new(0.5, 0.5),
        ] {
            let c = tex.sample(uv);
            assert!((c - Vec3::new(0.2, 0.4, 0.6)).length() < 1e-6);
        }
    }

    #[test]
    fn test_u_wraps() {
        let tex = Texture::from_pixels(
            4,
            1,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.25, 0.25, 0.25),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(1.0, 1.0, 1.0),
            ],
        );

        let a = tex.sample(Vec2::new(1.3, 0.0));
        let b = tex.sample(Vec2::new(0.3, 0.0));
        assert!((a - b).length() < 1e-6);
    }

    #[test]
    fn test_bilinear_midpoint() {
        // 2x1 bitmap, sample halfway between the two pixels
        let tex = Texture::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]);

        let mid = tex.sample(Vec2::new(0.5, 0.0));
        assert!((mid - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_v_flip() {
        // 1x2 bitmap: row 0 (stored first) is the TOP of the image, which
        // texture space addresses near v = 1.
        let tex = Texture::from_pixels(1, 2, vec![Vec3::ONE, Vec3::ZERO]);

        let near_top = tex.sample(Vec2::new(0.0, 0.999));
        let near_bottom = tex.sample(Vec2::new(0.0, 0.001));
        assert!(near_top.x > 0.99);
        assert!(near_bottom.x < 0.01);
    }

    #[test]
    fn test_decode_channel_endpoints() {
        assert!((decode_channel(0) - 0.0).abs() < 1e-6);
        assert!((decode_channel(255) - 1.0).abs() < 1e-6);

        // Mid-gray is darker in linear
        let mid = decode_channel(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Texture::load("/definitely/not/here.png");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_fallback_degrades() {
        let tex = Texture::load_or_fallback("/definitely/not/here.png", Vec3::ONE);
        assert!(!tex.is_bitmap());
        assert_eq!(tex.sample(Vec2::new(0.3, 0.7)), Vec3::ONE);
    }
}
