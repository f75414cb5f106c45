//! Lumo Renderer - CPU render kernel for photon-mapping renderers.
//!
//! The geometric and radiometric primitives every integrator leans on:
//! per-face triangle sampling, pinhole camera ray generation, and the film
//! accumulation buffer. The photon map, scene acceleration structure and
//! recursive integration logic live outside this crate and consume these
//! interfaces.

mod camera;
mod film;
mod renderer;
mod triangle;

pub use camera::PinholeCamera;
pub use film::{Film, FilmError};
pub use renderer::{render, RenderConfig};
pub use triangle::{GeometryError, SurfacePoint, Triangle};

/// Re-export math types from lumo_math
pub use lumo_math::{Ray, Vec2, Vec3};

use rand::RngCore;

/// Draw a uniform f32 in [0, 1) from a dyn rng.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 bits of mantissa, same construction rand uses internally
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}
