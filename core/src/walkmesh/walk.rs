use super::{EDGE_EPSILON, WalkMesh, WalkPoint};
use crate::error::WalkMeshError;
use crate::math::{Vec3, barycentric_weights, is_finite_vec3};

/// Result of [`WalkMesh::walk_in_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleStep {
    /// Where the walk stopped.
    pub end: WalkPoint,
    /// Fraction of the step that was taken, in `[0, 1]`.
    pub time: f32,
}

impl TriangleStep {
    /// True when the whole step fit inside the triangle.
    ///
    /// Otherwise `end` is on the edge `end.indices[0] -> end.indices[1]`
    /// with `end.weights[2] == 0`.
    pub fn completed(&self) -> bool {
        self.time >= 1.0
    }
}

/// Time at which a weight moving at `velocity` reaches zero, if that counts
/// as hitting the opposite edge.
///
/// Only finite, strictly positive times count. A weight that is already zero
/// hits its edge at time 0 only when it falls faster than `noise`; slower
/// drift is rounding error from projecting a step that runs along the edge.
fn crossing_time(weight: f32, velocity: f32, noise: f32) -> Option<f32> {
    let t = -weight / velocity;
    if !t.is_finite() {
        None
    } else if t > 0.0 {
        Some(t)
    } else if weight == 0.0 && velocity < -noise {
        Some(0.0)
    } else {
        None
    }
}

/// Earliest edge hit for `weights` moving with `velocity`.
///
/// Returns the slot and its time, or `None` if no weight reaches zero
/// within the step.
fn first_crossing(weights: &Vec3, velocity: &Vec3) -> Option<(usize, f32)> {
    let noise = EDGE_EPSILON * velocity.amax();
    (0..3)
        .filter_map(|k| crossing_time(weights[k], velocity[k], noise).map(|t| (k, t)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .filter(|&(_, t)| t < 1.0)
}

/// Clamp weights into `[0, 1]`, renormalizing if anything changed.
fn clamp_weights(weights: Vec3) -> Vec3 {
    let clamped = weights.map(|w| w.clamp(0.0, 1.0));
    if clamped == weights {
        return weights;
    }
    let sum = clamped.sum();
    if sum > 0.0 {
        (clamped / sum).map(|w| w.min(1.0))
    } else {
        clamped
    }
}

impl WalkMesh {
    /// Move `start` by the world-space `step` until the step is used up or
    /// the point reaches an edge of its triangle.
    ///
    /// The step is projected onto the triangle's plane. When an edge is hit
    /// the returned point is rotated so that edge is `indices[0] -> indices[1]`
    /// and `weights[2]` is exactly zero, ready for
    /// [`cross_edge`](Self::cross_edge).
    ///
    /// Fails on a walk point outside this mesh, invalid weights or a
    /// non-finite step.
    pub fn walk_in_triangle(
        &self,
        start: &WalkPoint,
        step: &Vec3,
    ) -> Result<TriangleStep, WalkMeshError> {
        self.check_walk_point(start)?;
        if !is_finite_vec3(step) {
            return Err(WalkMeshError::NonFiniteStep {
                step: (*step).into(),
            });
        }

        let (a, b, c) = self.corners(&start.indices);
        let velocity = barycentric_weights(a, b, c, step) - barycentric_weights(a, b, c, &Vec3::zeros());

        let (time, end) = match first_crossing(&start.weights, &velocity) {
            Some((k, time)) => {
                let mut weights = start.weights + velocity * time;
                weights[k] = 0.0;
                (time, WalkPoint::new(start.indices, weights).rotated_to_last(k))
            }
            None => (1.0, WalkPoint::new(start.indices, start.weights + velocity)),
        };

        Ok(TriangleStep {
            end: WalkPoint::new(end.indices, clamp_weights(end.weights)),
            time,
        })
    }
}
