//! Subcommand implementations.

use std::path::Path;

use walkmesh_core::generators::{generate_grid, generate_heightfield};
use walkmesh_core::math::{Vec2, Vec3};
use walkmesh_core::player::{Player, PlayerConfig};
use walkmesh_core::{WalkMesh, WalkMeshes, frame_mark, profile_plot};

use crate::args::{Cli, Command};
use crate::config::{SimulationConfig, load_config};

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };

    match cli.command {
        Command::Info { file } => info(&file),
        Command::Generate {
            output,
            name,
            size,
            segments,
            hills,
        } => generate(&output, &name, size, segments, hills),
        Command::Walk {
            file,
            mesh,
            at,
            right,
            forward,
            turn,
            steps,
            dt,
        } => {
            let name = mesh.unwrap_or(config.mesh);
            let walk = WalkSettings {
                at: Vec3::from(at),
                input: Vec2::new(right, forward),
                turn,
                steps,
                dt,
            };
            match file {
                Some(file) => {
                    let meshes = WalkMeshes::load(&file).map_err(|e| e.to_string())?;
                    let mesh = meshes.lookup(&name).map_err(|e| e.to_string())?;
                    walk_player(mesh, &walk, &config.player).map(|_| ())
                }
                None => {
                    let mesh = generate_grid(8.0, 8.0, 16, 16).map_err(|e| e.to_string())?;
                    walk_player(&mesh, &walk, &config.player).map(|_| ())
                }
            }
        }
    }
}

fn info(path: &Path) -> Result<(), String> {
    let meshes = WalkMeshes::load(path).map_err(|e| e.to_string())?;
    println!("{}: {} walkmesh(es)", path.display(), meshes.len());
    for name in meshes.names() {
        let mesh = meshes.lookup(name).map_err(|e| e.to_string())?;
        println!(
            "  {name}: {} vertices, {} triangles, {} boundary edges",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.boundary_edge_count()
        );
    }
    Ok(())
}

fn generate(output: &Path, name: &str, size: f32, segments: u32, hills: f32) -> Result<(), String> {
    let mesh = if hills == 0.0 {
        generate_grid(size, size, segments, segments)
    } else {
        generate_heightfield(size, size, segments, segments, |x, y| {
            hills * x.sin() * y.cos()
        })
    }
    .map_err(|e| format!("failed to generate walkmesh: {e}"))?;

    let triangles = mesh.triangle_count();
    let mut meshes = WalkMeshes::new();
    meshes.insert(name, mesh);
    let bytes = meshes.to_bytes();
    std::fs::write(output, &bytes)
        .map_err(|e| format!("failed to write {}: {e}", output.display()))?;
    log::info!(
        "Wrote '{name}' ({triangles} triangles, {} bytes) to {}",
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Fixed inputs for a walk run.
#[derive(Debug, Clone, Copy)]
pub struct WalkSettings {
    pub at: Vec3,
    pub input: Vec2,
    pub turn: f32,
    pub steps: u32,
    pub dt: f32,
}

/// Totals collected over a walk run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkSummary {
    pub crossings: u32,
    pub wall_contacts: u32,
    pub truncated_steps: u32,
    pub distance: f32,
}

/// Spawn a player and drive it for `settings.steps` ticks.
pub fn walk_player(
    mesh: &WalkMesh,
    settings: &WalkSettings,
    config: &PlayerConfig,
) -> Result<(Player, WalkSummary), String> {
    let mut player = Player::spawn(mesh, &settings.at).map_err(|e| e.to_string())?;
    let start = player.position(mesh);
    log::info!("Spawned at {:.3?}", start);

    let mut summary = WalkSummary::default();
    let mut last = start;
    for tick in 0..settings.steps {
        if settings.turn != 0.0 {
            player.turn(mesh, settings.turn * settings.dt);
        }
        let outcome = player
            .walk(mesh, settings.input, settings.dt, config)
            .map_err(|e| format!("tick {tick}: {e}"))?;

        summary.crossings += outcome.crossings;
        summary.wall_contacts += outcome.wall_contacts;
        if outcome.residual != Vec3::zeros() {
            summary.truncated_steps += 1;
        }
        let position = player.position(mesh);
        summary.distance += (position - last).norm();
        last = position;

        profile_plot!("walk_iterations", outcome.iterations);
        frame_mark!();
    }

    println!(
        "after {} ticks: position {:.3?}, up {:.3?}, forward {:.3?}",
        settings.steps,
        last,
        player.up(mesh),
        player.forward()
    );
    println!(
        "walked {:.3} units, {} edge crossings, {} wall contacts, {} truncated steps",
        summary.distance, summary.crossings, summary.wall_contacts, summary.truncated_steps
    );
    Ok((player, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(input: Vec2, steps: u32) -> WalkSettings {
        WalkSettings {
            at: Vec3::new(0.3, 0.15, 0.0),
            input,
            turn: 0.0,
            steps,
            dt: 0.1,
        }
    }

    #[test]
    fn test_walk_forward_on_grid() {
        let mesh = generate_grid(8.0, 8.0, 16, 16).unwrap();
        let (player, summary) =
            walk_player(&mesh, &settings(Vec2::new(0.0, 1.0), 5), &PlayerConfig::default()).unwrap();

        // 5 ticks at 3 units/s for 0.1s each.
        assert!((player.position(&mesh) - Vec3::new(0.3, 1.65, 0.0)).norm() < 1e-4);
        assert!((summary.distance - 1.5).abs() < 1e-4);
        assert!(summary.crossings > 0);
        assert_eq!(summary.wall_contacts, 0);
    }

    #[rstest]
    #[case::east(Vec2::new(1.0, 0.0))]
    #[case::west(Vec2::new(-1.0, 0.0))]
    #[case::north_east(Vec2::new(1.0, 1.0))]
    fn test_walk_into_walls(#[case] input: Vec2) {
        let mesh = generate_grid(2.0, 2.0, 2, 2).unwrap();
        let (player, summary) =
            walk_player(&mesh, &settings(input, 30), &PlayerConfig::default()).unwrap();

        assert!(summary.wall_contacts > 0);
        let p = player.position(&mesh);
        assert!(p.x.abs() <= 1.0 + 1e-4 && p.y.abs() <= 1.0 + 1e-4);
    }

    #[test]
    fn test_generate_then_info() {
        let path = std::env::temp_dir().join(format!("walkmesh-app-{}.w", std::process::id()));
        generate(&path, "Hills", 4.0, 8, 0.2).unwrap();
        info(&path).unwrap();

        let meshes = WalkMeshes::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(meshes.names(), vec!["Hills"]);
        assert_eq!(meshes.lookup("Hills").unwrap().triangle_count(), 128);
    }
}
