//! Lumo Core - scene-side data for the render kernel.
//!
//! This crate provides:
//!
//! - **Mesh**: flat vertex/index/normal/texcoord buffers with bounds-checked
//!   accessors, referenced by the renderer's per-face `Triangle` primitive
//! - **Texture**: linearized RGB bitmaps with bilinear lookup, or a solid
//!   fallback color when loading fails
//!
//! Scene/model file ingestion lives outside this crate; an external loader
//! fills the `Mesh` buffers.

pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use mesh::Mesh;
pub use texture::{Texture, TextureError};
