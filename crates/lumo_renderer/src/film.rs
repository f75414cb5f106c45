//! Film: the float RGB accumulation buffer.
//!
//! Monte-Carlo sample contributions are summed per pixel during the parallel
//! sampling phase, then a single-threaded finalize pass averages, gamma
//! encodes and exports. The buffer itself carries no locks; workers get
//! disjoint row slices from `rows_mut` and never share a pixel.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Vec3;
use thiserror::Error;

/// Errors raised while exporting film contents.
#[derive(Error, Debug)]
pub enum FilmError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A fixed-size float RGB accumulation buffer.
///
/// Pixels are row-major, 3 floats each: pixel `(i, j)` of row `i`, column
/// `j` starts at `3*j + 3*width*i`.
#[derive(Clone, Debug)]
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl Film {
    /// Create a film filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; (3 * width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat buffer offset of pixel `(i, j)`. Panics when out of range.
    #[inline]
    fn index(&self, i: u32, j: u32) -> usize {
        assert!(i < self.height && j < self.width, "pixel ({}, {}) out of range", i, j);
        (3 * j + 3 * self.width * i) as usize
    }

    /// Get the pixel at row `i`, column `j`.
    pub fn pixel(&self, i: u32, j: u32) -> Vec3 {
        let base = self.index(i, j);
        Vec3::new(
            self.pixels[base],
            self.pixels[base + 1],
            self.pixels[base + 2],
        )
    }

    /// Accumulate a sample contribution into pixel `(i, j)`.
    pub fn add_pixel(&mut self, i: u32, j: u32, rgb: Vec3) {
        let base = self.index(i, j);
        self.pixels[base] += rgb.x;
        self.pixels[base + 1] += rgb.y;
        self.pixels[base + 2] += rgb.z;
    }

    /// Overwrite pixel `(i, j)`.
    pub fn set_pixel(&mut self, i: u32, j: u32, rgb: Vec3) {
        let base = self.index(i, j);
        self.pixels[base] = rgb.x;
        self.pixels[base + 1] = rgb.y;
        self.pixels[base + 2] = rgb.z;
    }

    /// Divide every channel by `k`, converting an accumulated sum into a
    /// per-pixel average.
    pub fn divide(&mut self, k: f32) {
        for value in &mut self.pixels {
            *value /= k;
        }
    }

    /// Apply display gamma encoding `x ↦ x^(1/gamma)` in place.
    ///
    /// No clamping happens here; out-of-range input is the caller's error
    /// and quantization in `write_ppm` is where values get clipped.
    pub fn gamma_correction(&mut self, gamma: f32) {
        let inv_gamma = 1.0 / gamma;
        for value in &mut self.pixels {
            *value = value.powf(inv_gamma);
        }
    }

    /// Hand out each row as its own mutable slice, with its row index.
    ///
    /// Rows are disjoint, so the slices can be distributed across parallel
    /// workers (rayon `par_bridge`/`par_chunks_mut` shapes) without any
    /// worker ever touching another's pixels.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (u32, &mut [f32])> {
        let row_len = (3 * self.width) as usize;
        self.pixels
            .chunks_mut(row_len)
            .enumerate()
            .map(|(i, row)| (i as u32, row))
    }

    /// The raw pixel buffer, row-major. Chunking it by `3 * width` yields
    /// the same disjoint rows as `rows_mut`, in the shape rayon's
    /// `par_chunks_mut` wants.
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    /// Write the buffer as a binary PPM (`P6`) file.
    ///
    /// Channel values are scaled by 255 and clamped to `[0, 255]` at
    /// quantization. Any I/O failure is reported with the destination path.
    pub fn write_ppm(&self, path: impl AsRef<Path>) -> Result<(), FilmError> {
        let path = path.as_ref();
        let io_err = |source| FilmError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "P6\n{} {}\n255\n", self.width, self.height).map_err(io_err)?;

        let mut bytes = Vec::with_capacity(self.pixels.len());
        for value in &self.pixels {
            bytes.push((value * 255.0).round().clamp(0.0, 255.0) as u8);
        }
        writer.write_all(&bytes).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        Ok(())
    }
}
