use super::{WalkMesh, WalkPoint};
use crate::error::WalkMeshError;
use crate::math::{Vec3, barycentric_weights, is_finite_vec3};

/// Closest point on segment `a -> b` to `p`, with its weights along the
/// segment as `(1 - t, t, 0)`.
fn closest_on_segment(a: &Vec3, b: &Vec3, p: &Vec3) -> (Vec3, Vec3) {
    let along = (p - a).dot(&(b - a));
    let max = (b - a).dot(&(b - a));
    if along < 0.0 {
        (*a, Vec3::new(1.0, 0.0, 0.0))
    } else if along > max {
        (*b, Vec3::new(0.0, 1.0, 0.0))
    } else {
        let t = along / max;
        (a.lerp(b, t), Vec3::new(1.0 - t, t, 0.0))
    }
}

impl WalkMesh {
    /// Find the walk point closest to `world_point`.
    ///
    /// Every triangle is tested, so this is linear in the triangle count and
    /// meant for initial placement; use [`walk_in_triangle`](Self::walk_in_triangle)
    /// to move afterwards. When the closest point lies on a triangle edge the
    /// result names that edge in slots 0 and 1.
    pub fn nearest_walk_point(&self, world_point: &Vec3) -> Result<WalkPoint, WalkMeshError> {
        crate::profile_function!();

        if self.triangles.is_empty() {
            return Err(WalkMeshError::EmptyMesh);
        }
        if !is_finite_vec3(world_point) {
            return Err(WalkMeshError::NonFinitePoint {
                point: (*world_point).into(),
            });
        }

        let mut closest: Option<(f32, WalkPoint)> = None;
        let mut consider = |dis2: f32, wp: WalkPoint| {
            if closest.is_none_or(|(best, _)| dis2 < best) {
                closest = Some((dis2, wp));
            }
        };

        for &tri in &self.triangles {
            let (a, b, c) = self.corners(&tri);
            let coords = barycentric_weights(a, b, c, world_point);

            if coords.iter().all(|&w| w >= 0.0) {
                let projected = coords.x * a + coords.y * b + coords.z * c;
                consider(
                    (world_point - projected).norm_squared(),
                    WalkPoint::new(tri, coords),
                );
            } else {
                let [x, y, z] = tri;
                for [ai, bi, ci] in [[x, y, z], [y, z, x], [z, x, y]] {
                    let (pt, weights) = closest_on_segment(
                        &self.vertices[ai as usize],
                        &self.vertices[bi as usize],
                        world_point,
                    );
                    consider(
                        (world_point - pt).norm_squared(),
                        WalkPoint::new([ai, bi, ci], weights),
                    );
                }
            }
        }

        closest
            .map(|(_, wp)| wp)
            .ok_or(WalkMeshError::NonFinitePoint {
                point: (*world_point).into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_meshes::*;
    use super::*;

    #[test]
    fn test_point_above_interior() {
        let mesh = flat_square();
        let wp = mesh.nearest_walk_point(&Vec3::new(0.25, 0.25, 2.0)).unwrap();
        assert_eq!(wp.indices, [0, 1, 2]);
        assert!((wp.weights - Vec3::new(0.5, 0.25, 0.25)).norm() < 1e-5);
    }

    #[test]
    fn test_point_past_corner() {
        let mesh = flat_square();
        let wp = mesh.nearest_walk_point(&Vec3::new(2.0, -1.0, 0.0)).unwrap();
        assert!(wp.has_valid_weights());
        assert!((mesh.to_world_point(&wp) - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_point_beside_edge() {
        let mesh = single_triangle();
        let wp = mesh.nearest_walk_point(&Vec3::new(0.5, -1.0, 0.0)).unwrap();
        assert_eq!(wp.indices, [0, 1, 2]);
        assert!((wp.weights - Vec3::new(0.5, 0.5, 0.0)).norm() < 1e-5);
        assert!(wp.is_on_edge());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = WalkMesh::new(Vec::new(), Vec::new(), Vec::new()).unwrap();
        assert_eq!(
            mesh.nearest_walk_point(&Vec3::zeros()),
            Err(WalkMeshError::EmptyMesh)
        );
    }

    #[test]
    fn test_non_finite_query() {
        let mesh = single_triangle();
        assert!(matches!(
            mesh.nearest_walk_point(&Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(WalkMeshError::NonFinitePoint { .. })
        ));
    }
}
