//! Math type aliases and geometry helpers.
//!
//! Everything here is `f32`, matching the precision of the packed walkmesh
//! files. The barycentric projection is the primitive every walkmesh query is
//! built on.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Unit quaternion (f32) used for surface-frame rotations.
pub type UnitQuat = nalgebra::UnitQuaternion<f32>;

/// Project `pt` onto the plane of triangle `(a, b, c)` and return the
/// barycentric weights of the projected point.
///
/// The weights are signed: a negative weight means the projection lies
/// outside the triangle, on the far side of the edge opposite that vertex.
/// They always sum to 1 for a non-degenerate triangle. A zero-area triangle
/// divides by zero and yields non-finite weights.
pub fn barycentric_weights(a: &Vec3, b: &Vec3, c: &Vec3, pt: &Vec3) -> Vec3 {
    let h = (c - a).cross(&(b - c));
    let wa = (b - pt).cross(&(c - pt)).dot(&h);
    let wb = (c - pt).cross(&(a - pt)).dot(&h);
    let wc = (a - pt).cross(&(b - pt)).dot(&h);
    Vec3::new(wa, wb, wc) / (wa + wb + wc)
}

/// Normalize `v`, passing a zero vector through unchanged instead of
/// producing NaN.
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    if *v == Vec3::zeros() {
        *v
    } else {
        v.normalize()
    }
}

/// True when every component of `v` is finite.
pub fn is_finite_vec3(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// Zero-length inputs give the identity. Opposite directions have no unique
/// shortest rotation; they are turned half-way around an arbitrary axis
/// perpendicular to `from`.
pub fn rotation_between(from: &Vec3, to: &Vec3) -> UnitQuat {
    rotation_between_about(from, to, &any_perpendicular(from))
}

/// Like [`rotation_between`], but opposite directions are turned around
/// `fallback_axis`, which should be perpendicular to `from`.
pub fn rotation_between_about(from: &Vec3, to: &Vec3, fallback_axis: &Vec3) -> UnitQuat {
    if *from == Vec3::zeros() || *to == Vec3::zeros() {
        return UnitQuat::identity();
    }
    if let Some(q) = UnitQuat::rotation_between(from, to) {
        return q;
    }
    match nalgebra::Unit::try_new(*fallback_axis, f32::EPSILON) {
        Some(axis) => UnitQuat::from_axis_angle(&axis, std::f32::consts::PI),
        None => UnitQuat::identity(),
    }
}

/// Some unit vector perpendicular to `v` (zero if `v` is zero).
fn any_perpendicular(v: &Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    normalize_or_zero(&v.cross(&helper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barycentric_of_vertices() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        assert!((barycentric_weights(&a, &b, &c, &a) - Vec3::x()).norm() < 1e-6);
        assert!((barycentric_weights(&a, &b, &c, &b) - Vec3::y()).norm() < 1e-6);
        assert!((barycentric_weights(&a, &b, &c, &c) - Vec3::z()).norm() < 1e-6);
    }

    #[test]
    fn barycentric_projects_off_plane_points() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let w = barycentric_weights(&a, &b, &c, &Vec3::new(0.25, 0.25, 5.0));
        assert!((w - Vec3::new(0.5, 0.25, 0.25)).norm() < 1e-5);
    }

    #[test]
    fn barycentric_sums_to_one() {
        let a = Vec3::new(-1.0, 0.3, 2.0);
        let b = Vec3::new(2.5, -1.0, 0.5);
        let c = Vec3::new(0.2, 3.0, -1.0);
        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, -4.0, 3.0),
            Vec3::new(-7.5, 2.0, 1.0),
        ] {
            let w = barycentric_weights(&a, &b, &c, &p);
            assert!((w.sum() - 1.0).abs() < 1e-4, "sum was {}", w.sum());
        }
    }

    #[test]
    fn barycentric_negative_outside() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let w = barycentric_weights(&a, &b, &c, &Vec3::new(1.0, 1.0, 0.0));
        assert!(w.x < 0.0);
    }

    #[test]
    fn barycentric_degenerate_is_not_finite() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(2.0, 0.0, 0.0);
        let w = barycentric_weights(&a, &b, &c, &Vec3::new(0.5, 0.5, 0.0));
        assert!(!is_finite_vec3(&w));
    }

    #[test]
    fn normalize_or_zero_passes_zero() {
        assert_eq!(normalize_or_zero(&Vec3::zeros()), Vec3::zeros());
        assert!((normalize_or_zero(&Vec3::new(3.0, 0.0, 4.0)).norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_between_maps_directions() {
        let from = Vec3::z();
        let to = Vec3::new(0.0, 1.0, 1.0).normalize();
        let q = rotation_between(&from, &to);
        assert!((q * from - to).norm() < 1e-5);
    }

    #[test]
    fn rotation_between_opposite() {
        let q = rotation_between(&Vec3::z(), &-Vec3::z());
        assert!((q * Vec3::z() + Vec3::z()).norm() < 1e-5);

        let q = rotation_between_about(&Vec3::z(), &-Vec3::z(), &Vec3::x());
        assert!((q * Vec3::y() + Vec3::y()).norm() < 1e-5);
        assert!((q * Vec3::x() - Vec3::x()).norm() < 1e-5);
    }

    #[test]
    fn rotation_between_zero_is_identity() {
        let q = rotation_between(&Vec3::zeros(), &Vec3::x());
        assert_eq!(q, UnitQuat::identity());
    }
}
