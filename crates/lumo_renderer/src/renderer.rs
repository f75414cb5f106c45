//! The two-phase render driver.
//!
//! Phase 1 distributes film rows across rayon workers; each worker owns its
//! row slice outright, so accumulation needs no synchronization. Phase 2 is
//! the caller's single-threaded finalize after `render` returns:
//! `film.divide(n_samples)`, `film.gamma_correction(2.2)`, `film.write_ppm`.
//!
//! The integrator stays outside this crate; `render` takes it as a radiance
//! closure evaluated per camera ray.

use crate::{gen_f32, Film, PinholeCamera, Ray, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel
    pub n_samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { n_samples: 16 }
    }
}

/// Run the parallel sampling phase over the whole film.
///
/// For every pixel `(i, j)` a deterministic per-pixel rng is seeded with
/// `j + width * i`, and `n_samples` jittered sensor coordinates in
/// `[-1, 1]²` are traced through the camera. Each sample's `radiance / pdf`
/// is accumulated into the pixel; NaN and negative radiance samples are
/// dropped with an error log instead of poisoning the buffer.
pub fn render<F>(camera: &PinholeCamera, film: &mut Film, config: &RenderConfig, radiance: F)
where
    F: Fn(&Ray, &mut dyn RngCore) -> Vec3 + Sync,
{
    let width = film.width();
    let height = film.height();
    let row_len = (3 * width) as usize;

    film.pixels_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| {
            let i = i as u32;
            for j in 0..width {
                let mut rng = StdRng::seed_from_u64(u64::from(j + width * i));

                for _ in 0..config.n_samples {
                    let u = (2.0 * (j as f32 + gen_f32(&mut rng)) - width as f32) / width as f32;
                    let v = (2.0 * (i as f32 + gen_f32(&mut rng)) - height as f32) / height as f32;

                    let (ray, pdf) = camera.sample_ray(Vec2::new(u, v));
                    let sample = radiance(&ray, &mut rng) / pdf;

                    if sample.is_nan() {
                        log::error!("radiance sample is NaN at pixel ({}, {})", i, j);
                        continue;
                    }
                    if sample.min_element() < 0.0 {
                        log::error!("radiance sample is negative at pixel ({}, {})", i, j);
                        continue;
                    }

                    let base = (3 * j) as usize;
                    row[base] += sample.x;
                    row[base + 1] += sample.y;
                    row[base + 2] += sample.z;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn test_camera() -> PinholeCamera {
        PinholeCamera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.5 * PI)
    }

    #[test]
    fn test_constant_radiance_accumulates() {
        let camera = test_camera();
        let mut film = Film::new(4, 4);
        let config = RenderConfig { n_samples: 8 };

        render(&camera, &mut film, &config, |_, _| Vec3::splat(0.5));

        film.divide(config.n_samples as f32);
        for i in 0..4 {
            for j in 0..4 {
                let p = film.pixel(i, j);
                assert!((p - Vec3::splat(0.5)).length() < 1e-5);
            }
        }
    }

    #[test]
    fn test_invalid_samples_are_dropped() {
        let camera = test_camera();
        let mut film = Film::new(2, 2);
        let config = RenderConfig { n_samples: 4 };

        render(&camera, &mut film, &config, |ray, _| {
            // Poison the left half of the sensor
            if ray.origin.x < 0.0 {
                Vec3::splat(f32::NAN)
            } else {
                Vec3::ONE
            }
        });

        for i in 0..2 {
            for j in 0..2 {
                let p = film.pixel(i, j);
                assert!(!p.is_nan());
                assert!(p.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn test_end_to_end_single_pixel() {
        let camera = test_camera();
        let mut film = Film::new(1, 1);
        let config = RenderConfig { n_samples: 1 };

        render(&camera, &mut film, &config, |_, _| Vec3::ONE);

        film.divide(1.0);
        film.gamma_correction(1.0);
        assert!((film.pixel(0, 0) - Vec3::ONE).length() < 1e-6);

        let path = std::env::temp_dir().join("lumo_render_test.ppm");
        film.write_ppm(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[bytes.len() - 3..], &[255, 255, 255]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_deterministic_across_runs() {
        let camera = test_camera();
        let config = RenderConfig { n_samples: 4 };

        let mut film_a = Film::new(3, 3);
        let mut film_b = Film::new(3, 3);
        let shade = |ray: &Ray, _: &mut dyn RngCore| ray.direction.abs();

        render(&camera, &mut film_a, &config, shade);
        render(&camera, &mut film_b, &config, shade);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(film_a.pixel(i, j), film_b.pixel(i, j));
            }
        }
    }
}
