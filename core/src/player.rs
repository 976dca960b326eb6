//! A character standing on a walkmesh.

use serde::{Deserialize, Serialize};

use crate::error::WalkMeshError;
use crate::math::{UnitQuat, Vec2, Vec3, nalgebra::Unit, rotation_between};
use crate::motion::{MotionConfig, MotionOutcome, advance};
use crate::walkmesh::{WalkMesh, WalkPoint};

/// Player movement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Settings for the underlying motion loop.
    pub motion: MotionConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            motion: MotionConfig::default(),
        }
    }
}

/// A walker with an orientation.
///
/// The local frame is +x right, +y forward and +z up. The rotation is kept
/// so that local +z follows the smoothed surface normal under the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Where the player stands.
    pub at: WalkPoint,
    /// Local-to-world rotation.
    pub rotation: UnitQuat,
}

impl Player {
    /// Place a player at the walk point closest to `position`, standing
    /// upright on the surface.
    pub fn spawn(mesh: &WalkMesh, position: &Vec3) -> Result<Self, WalkMeshError> {
        let at = mesh.nearest_walk_point(position)?;
        let rotation = rotation_between(&Vec3::z(), &mesh.to_world_smooth_normal(&at));
        log::debug!("Spawned player at {:?}", at);
        Ok(Self { at, rotation })
    }

    /// World-space position.
    pub fn position(&self, mesh: &WalkMesh) -> Vec3 {
        mesh.to_world_point(&self.at)
    }

    /// Smoothed surface normal under the player.
    pub fn up(&self, mesh: &WalkMesh) -> Vec3 {
        mesh.to_world_smooth_normal(&self.at)
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Turn by `yaw` radians (counter-clockwise seen from above) about the
    /// surface normal.
    pub fn turn(&mut self, mesh: &WalkMesh, yaw: f32) {
        let up = Unit::try_new(self.up(mesh), f32::EPSILON)
            .unwrap_or_else(|| Unit::new_normalize(self.rotation * Vec3::z()));
        self.rotation = UnitQuat::from_axis_angle(&up, yaw) * self.rotation;
        self.rotation.renormalize();
    }

    /// Walk for `elapsed` seconds.
    ///
    /// `input` is in the local frame (x right, y forward); any non-zero input
    /// moves at full speed, so diagonals are not faster.
    pub fn walk(
        &mut self,
        mesh: &WalkMesh,
        input: Vec2,
        elapsed: f32,
        config: &PlayerConfig,
    ) -> Result<MotionOutcome, WalkMeshError> {
        let mv = if input == Vec2::zeros() {
            input
        } else {
            input.normalize() * config.speed * elapsed
        };
        let step = self.rotation * Vec3::new(mv.x, mv.y, 0.0);

        let outcome = advance(mesh, &self.at, &step, &config.motion)?;
        self.at = outcome.at;

        let adjust = rotation_between(&(self.rotation * Vec3::z()), &self.up(mesh));
        self.rotation = adjust * self.rotation;
        self.rotation.renormalize();

        Ok(outcome)
    }
}
