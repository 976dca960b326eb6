use std::path::Path;

use serde::{Deserialize, Serialize};
use walkmesh_core::player::PlayerConfig;

/// Simulation settings loaded from a TOML file.
///
/// ```toml
/// mesh = "WalkMesh"
///
/// [player]
/// speed = 3.0
///
/// [player.motion]
/// max_iterations = 10
/// wall_bounce = 1.25
/// wall_hug = 0.01
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Name of the walkmesh to use from a packed file.
    pub mesh: String,
    pub player: PlayerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mesh: "WalkMesh".into(),
            player: PlayerConfig::default(),
        }
    }
}

/// Load a simulation config from a TOML file.
///
/// Returns `Err` with a human-readable message if the file cannot be read
/// or parsed.
pub fn load_config(path: &Path) -> Result<SimulationConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    parse_config(&content).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn parse_config(content: &str) -> Result<SimulationConfig, toml::de::Error> {
    toml::from_str(content)
}
