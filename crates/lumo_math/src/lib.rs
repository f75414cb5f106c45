// Re-export glam for convenience
pub use glam::*;

// Lumo math types
mod ray;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(0.25, 0.5);
        let b = Vec2::new(0.5, 0.25);
        assert_eq!(a + b, Vec2::new(0.75, 0.75));
        assert_eq!(a * 2.0, Vec2::new(0.5, 1.0));
    }
}
