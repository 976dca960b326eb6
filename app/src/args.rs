//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Walkmesh tool arguments.
#[derive(Parser, Debug)]
#[command(
    name = "walkmesh",
    about = "Inspect, generate and walk packed walkmesh files",
    long_about = "Tools for packed walkmesh files.\n\n\
        EXAMPLES:\n\
          # Write a 16x16 hilly test mesh\n\
          walkmesh generate hills.w --segments 16 --hills 0.4\n\
        \n\
          # List the meshes in a file\n\
          walkmesh info hills.w\n\
        \n\
          # Walk forward for two seconds, turning slowly\n\
          walkmesh walk --file hills.w --steps 120 --turn 0.5",
    version
)]
pub struct Cli {
    /// TOML file with `mesh` and `[player]` settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the meshes in a packed walkmesh file.
    Info {
        /// Packed walkmesh file.
        file: PathBuf,
    },
    /// Write a procedurally generated walkmesh.
    Generate {
        /// Output file.
        output: PathBuf,

        /// Name stored for the mesh.
        #[arg(long, default_value = "WalkMesh")]
        name: String,

        /// Side length of the square mesh.
        #[arg(long, default_value_t = 8.0)]
        size: f32,

        /// Cells along each side.
        #[arg(long, default_value_t = 16)]
        segments: u32,

        /// Height of the sine hills (0 for a flat grid).
        #[arg(long, default_value_t = 0.0)]
        hills: f32,
    },
    /// Spawn a player and walk it with fixed input.
    Walk {
        /// Packed walkmesh file; a flat 8x8 grid is used when omitted.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Mesh to walk on, overriding the config file.
        #[arg(long)]
        mesh: Option<String>,

        /// Spawn position as `x,y,z`.
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
        at: [f32; 3],

        /// Sideways input in [-1, 1] (+ is right).
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        right: f32,

        /// Forward input in [-1, 1].
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        forward: f32,

        /// Turn rate in radians per second.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        turn: f32,

        /// Number of simulation ticks.
        #[arg(long, default_value_t = 60)]
        steps: u32,

        /// Seconds per tick.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
}

/// Parse a comma-separated `x,y,z` triple.
pub fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{s}'"));
    };
    let parse = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}
