//! Moving a walk point across a whole walkmesh.
//!
//! [`advance`] chains [`WalkMesh::walk_in_triangle`] and
//! [`WalkMesh::cross_edge`] until the requested displacement is used up.
//! Steps that run into a boundary edge are deflected back onto the mesh, so a
//! walker can never leave it.
//!
//! ```
//! use walkmesh_core::generators::generate_grid;
//! use walkmesh_core::math::Vec3;
//! use walkmesh_core::motion::{MotionConfig, advance};
//!
//! let mesh = generate_grid(4.0, 4.0, 4, 4).unwrap();
//! let start = mesh.nearest_walk_point(&Vec3::new(0.25, 0.1, 0.0)).unwrap();
//! let outcome = advance(&mesh, &start, &Vec3::new(1.0, 0.5, 0.0), &MotionConfig::default()).unwrap();
//! assert_eq!(outcome.crossings, 2);
//! assert!((mesh.to_world_point(&outcome.at) - Vec3::new(1.25, 0.6, 0.0)).norm() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WalkMeshError;
use crate::math::{Vec3, is_finite_vec3, normalize_or_zero};
use crate::walkmesh::{WalkMesh, WalkPoint};

/// Tuning for [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Maximum number of triangle steps per call.
    pub max_iterations: u32,
    /// How strongly a step pointing out through a wall is reflected back.
    /// `1.0` cancels the outward part, larger values push away from the wall.
    pub wall_bounce: f32,
    /// Inward nudge applied to steps that already run along or away from a
    /// wall, keeping the walker off the boundary edge.
    pub wall_hug: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            wall_bounce: 1.25,
            wall_hug: 0.01,
        }
    }
}

/// State of the motion loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionState {
    /// Some displacement is still to be applied.
    Walking {
        /// World-space displacement left to walk.
        remain: Vec3,
    },
    /// Nothing left to walk.
    Resolved,
}

/// Result of [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    /// Final walk point.
    pub at: WalkPoint,
    /// Displacement that was dropped because the iteration budget ran out.
    pub residual: Vec3,
    /// Number of triangle steps taken.
    pub iterations: u32,
    /// Number of edges crossed into neighbouring triangles.
    pub crossings: u32,
    /// Number of times a boundary edge deflected the step.
    pub wall_contacts: u32,
}

/// Walk `start` by the world-space displacement `step`, following the
/// surface across triangle edges and sliding along boundary edges.
///
/// The displacement is rotated with the surface at every crossing, so a step
/// that starts flat bends over folds in the mesh. If the iteration budget is
/// exhausted the rest of the step is dropped and reported in
/// [`MotionOutcome::residual`].
pub fn advance(
    mesh: &WalkMesh,
    start: &WalkPoint,
    step: &Vec3,
    config: &MotionConfig,
) -> Result<MotionOutcome, WalkMeshError> {
    crate::profile_scope!("walkmesh_advance");

    mesh.check_walk_point(start)?;
    if !is_finite_vec3(step) {
        return Err(WalkMeshError::NonFiniteStep {
            step: (*step).into(),
        });
    }

    let mut outcome = MotionOutcome {
        at: *start,
        residual: Vec3::zeros(),
        iterations: 0,
        crossings: 0,
        wall_contacts: 0,
    };
    let mut state = MotionState::Walking { remain: *step };

    while let MotionState::Walking { remain } = state {
        if remain == Vec3::zeros() {
            state = MotionState::Resolved;
            continue;
        }
        if outcome.iterations >= config.max_iterations {
            log::debug!(
                "Walk used its full budget of {} steps, dropping {:?}",
                config.max_iterations,
                remain
            );
            outcome.residual = remain;
            break;
        }
        outcome.iterations += 1;
        state = step_once(mesh, &mut outcome, remain, config)?;
    }

    Ok(outcome)
}

/// One trip around the motion loop: walk inside the current triangle, then
/// cross or deflect off the edge that stopped the walk.
fn step_once(
    mesh: &WalkMesh,
    outcome: &mut MotionOutcome,
    remain: Vec3,
    config: &MotionConfig,
) -> Result<MotionState, WalkMeshError> {
    let walked = mesh.walk_in_triangle(&outcome.at, &remain)?;
    outcome.at = walked.end;
    if walked.completed() {
        return Ok(MotionState::Resolved);
    }

    let remain = remain * (1.0 - walked.time);
    let crossing = mesh.cross_edge(&outcome.at)?;
    if crossing.crossed() {
        outcome.crossings += 1;
        outcome.at = crossing.end_or(outcome.at);
        return Ok(MotionState::Walking {
            remain: crossing.rotation() * remain,
        });
    }

    outcome.wall_contacts += 1;
    match deflect_off_wall(mesh, &outcome.at, remain, config) {
        Some(remain) => Ok(MotionState::Walking { remain }),
        None => {
            log::debug!("Degenerate wall at edge {:?}, stopping", outcome.at.edge());
            Ok(MotionState::Resolved)
        }
    }
}

/// Bend `remain` away from the boundary edge `at` sits on. Returns `None` if
/// the edge or its triangle is degenerate.
fn deflect_off_wall(
    mesh: &WalkMesh,
    at: &WalkPoint,
    remain: Vec3,
    config: &MotionConfig,
) -> Option<Vec3> {
    let (a, b, _) = mesh.corners(&at.indices);
    let along = normalize_or_zero(&(b - a));
    let normal = normalize_or_zero(&mesh.face_normal(&at.indices));
    let inward = normal.cross(&along);
    if inward == Vec3::zeros() {
        return None;
    }

    let d = remain.dot(&inward);
    log::trace!("Hit wall {:?}, outward component {}", at.edge(), -d);
    if d < 0.0 {
        Some(remain + (-config.wall_bounce * d) * inward)
    } else {
        Some(remain + config.wall_hug * d * inward)
    }
}
