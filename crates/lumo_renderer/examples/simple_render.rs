//! Minimal kernel exercise.
//!
//! Intersects camera rays against a two-triangle quad, shades hits with a
//! checkerboard texture and a headlight term, and writes a PPM. The point is
//! to run every kernel piece end to end without a real integrator.

use std::f32::consts::PI;
use std::sync::Arc;

use lumo_core::{Mesh, Texture};
use lumo_renderer::{render, Film, PinholeCamera, Ray, RenderConfig, Triangle, Vec2, Vec3};

fn main() {
    env_logger::init();

    let mesh = Arc::new(quad_mesh());
    let triangles = Triangle::from_mesh(mesh);
    let texture = checkerboard();

    let camera = PinholeCamera::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z, 0.5 * PI);
    let mut film = Film::new(256, 256);
    let config = RenderConfig { n_samples: 4 };

    println!("Rendering {}x{} @ {} spp...", film.width(), film.height(), config.n_samples);
    let start = std::time::Instant::now();

    render(&camera, &mut film, &config, |ray, _| {
        shade(ray, &triangles, &texture)
    });

    println!("Rendered in {:?}", start.elapsed());

    film.divide(config.n_samples as f32);
    film.gamma_correction(2.2);

    let filename = "output.ppm";
    film.write_ppm(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

/// Unit quad in the z = 0 plane, facing +Z, uv-mapped corner to corner.
fn quad_mesh() -> Mesh {
    let positions = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    let normals = vec![Vec3::Z; 4];
    let texcoords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    Mesh::new_with_texcoords(
        positions,
        vec![0, 1, 2, 0, 2, 3],
        Some(normals),
        Some(texcoords),
    )
}

fn checkerboard() -> Texture {
    let size = 8u32;
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            if (x + y) % 2 == 0 {
                Vec3::splat(0.9)
            } else {
                Vec3::new(0.8, 0.2, 0.1)
            }
        })
        .collect();
    Texture::from_pixels(size, size, pixels)
}

/// Möller-Trumbore against every triangle; closest hit wins.
fn shade(ray: &Ray, triangles: &[Triangle], texture: &Texture) -> Vec3 {
    let mut closest: Option<(f32, Vec2, &Triangle)> = None;

    for tri in triangles {
        if let Some((t, barycentric)) = intersect(ray, tri) {
            if closest.map_or(true, |(best, _, _)| t < best) {
                closest = Some((t, barycentric, tri));
            }
        }
    }

    match closest {
        Some((_, barycentric, tri)) => {
            let normal = tri.shading_normal(barycentric);
            let albedo = texture.sample(tri.texcoords(barycentric));
            albedo * normal.dot(-ray.direction).max(0.0)
        }
        None => Vec3::splat(0.05),
    }
}

fn intersect(ray: &Ray, tri: &Triangle) -> Option<(f32, Vec2)> {
    let v0 = tri.vertex_position(0);
    let edge1 = tri.vertex_position(1) - v0;
    let edge2 = tri.vertex_position(2) - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > 1e-4).then_some((t, Vec2::new(u, v)))
}
