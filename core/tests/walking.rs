//! End-to-end walking scenarios through the public API.

use rstest::rstest;

use walkmesh_core::generators::{generate_grid, generate_heightfield};
use walkmesh_core::math::{Vec2, Vec3};
use walkmesh_core::motion::{MotionConfig, advance};
use walkmesh_core::player::{Player, PlayerConfig};
use walkmesh_core::{EdgeCrossing, WalkMesh, WalkPoint};

fn single_triangle() -> WalkMesh {
    WalkMesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![Vec3::z(); 3],
        vec![[0, 1, 2]],
    )
    .unwrap()
}

fn square() -> WalkMesh {
    WalkMesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ],
        vec![Vec3::z(); 4],
        vec![[0, 1, 2], [3, 2, 1]],
    )
    .unwrap()
}

fn hills() -> WalkMesh {
    generate_heightfield(8.0, 8.0, 16, 16, |x, y| 0.3 * (0.7 * x).sin() * (0.5 * y).cos()).unwrap()
}

fn assert_valid(mesh: &WalkMesh, wp: &WalkPoint) {
    assert!(wp.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    assert!(wp.has_valid_weights(), "weights {:?}", wp.weights);
    assert!((wp.weights.sum() - 1.0).abs() < 1e-4, "weights {:?}", wp.weights);
}

#[test]
fn test_single_triangle_centroid_scenario() {
    let mesh = single_triangle();
    let start = WalkPoint::centroid([0, 1, 2]);

    let inside = mesh.walk_in_triangle(&start, &Vec3::new(0.1, 0.0, 0.0)).unwrap();
    assert_eq!(inside.time, 1.0);
    assert!((mesh.to_world_point(&inside.end) - Vec3::new(1.0 / 3.0 + 0.1, 1.0 / 3.0, 0.0)).norm() < 1e-5);

    let exit = mesh.walk_in_triangle(&start, &Vec3::new(1.0, 0.0, 0.0)).unwrap();
    assert!(exit.time > 0.0 && exit.time < 1.0);
    assert_eq!(exit.end.weights.z, 0.0);
    assert_eq!(exit.end.edge(), (1, 2));
    assert_eq!(mesh.cross_edge(&exit.end).unwrap(), EdgeCrossing::Boundary);
}

#[test]
fn test_square_crossing_scenario() {
    let mesh = square();
    let start = WalkPoint::centroid([0, 1, 2]);

    let walked = mesh.walk_in_triangle(&start, &Vec3::new(0.5, 0.5, 0.0)).unwrap();
    assert!((walked.time - 1.0 / 3.0).abs() < 1e-5);
    assert_eq!(walked.end.indices, [1, 2, 0]);

    let crossing = mesh.cross_edge(&walked.end).unwrap();
    let EdgeCrossing::Crossed { end, rotation } = crossing else {
        panic!("expected to cross the diagonal, got {crossing:?}");
    };
    assert_eq!(end.indices, [2, 1, 3]);
    assert!((end.weights.x - walked.end.weights.y).abs() < 1e-6);
    assert!((end.weights.y - walked.end.weights.x).abs() < 1e-6);
    assert_eq!(end.weights.z, 0.0);
    assert!(rotation.angle() < 1e-5);
    assert!((mesh.to_world_point(&end) - Vec3::new(0.5, 0.5, 0.0)).norm() < 1e-5);
}

#[rstest]
#[case::above(Vec3::new(0.3, 0.4, 2.0))]
#[case::below(Vec3::new(-1.2, 0.7, -3.0))]
#[case::far_outside(Vec3::new(25.0, -40.0, 1.0))]
#[case::on_diagonal(Vec3::new(0.5, 0.5, 0.0))]
fn test_nearest_is_valid(#[case] query: Vec3) {
    for mesh in [square(), generate_grid(4.0, 4.0, 4, 4).unwrap(), hills()] {
        let wp = mesh.nearest_walk_point(&query).unwrap();
        assert_valid(&mesh, &wp);
    }
}

#[rstest]
#[case::center(Vec3::new(0.1, 0.2, 0.0))]
#[case::slope(Vec3::new(-2.3, 1.7, 0.5))]
#[case::outside(Vec3::new(9.0, 9.0, 0.0))]
fn test_world_round_trip(#[case] query: Vec3) {
    let mesh = hills();
    let first = mesh.nearest_walk_point(&query).unwrap();
    let on_surface = mesh.to_world_point(&first);
    let second = mesh.nearest_walk_point(&on_surface).unwrap();
    assert!((mesh.to_world_point(&second) - on_surface).norm() < 1e-4);
}

#[rstest]
#[case::short(Vec3::new(0.2, 0.1, 0.0))]
#[case::several_cells(Vec3::new(1.1, 0.7, 0.0))]
#[case::backwards(Vec3::new(-1.2, -0.45, 0.0))]
fn test_advance_on_flat_grid(#[case] step: Vec3) {
    let mesh = generate_grid(4.0, 4.0, 4, 4).unwrap();
    let start = mesh.nearest_walk_point(&Vec3::new(0.3, 0.2, 0.0)).unwrap();
    let outcome = advance(&mesh, &start, &step, &MotionConfig::default()).unwrap();

    assert_eq!(outcome.residual, Vec3::zeros());
    assert_eq!(outcome.wall_contacts, 0);
    let expected = Vec3::new(0.3, 0.2, 0.0) + step;
    assert!((mesh.to_world_point(&outcome.at) - expected).norm() < 1e-4);
}

/// Single triangle whose boundary edge 0 -> 1 points along `angle`.
fn slanted_triangle(angle: f32) -> WalkMesh {
    let (sin, cos) = angle.sin_cos();
    let a = Vec3::new(0.4, -1.3, 0.2);
    let along = Vec3::new(cos, sin, 0.0) * 1.7;
    let inward = Vec3::new(-sin, cos, 0.0) * 1.7;
    WalkMesh::new(vec![a, a + along, a + inward], vec![Vec3::z(); 3], vec![[0, 1, 2]]).unwrap()
}

#[test]
fn test_slide_along_boundary_at_any_angle() {
    let start = WalkPoint::new([0, 1, 2], Vec3::new(0.7, 0.3, 0.0));
    for i in 0..200 {
        let angle = i as f32 * std::f32::consts::TAU / 200.0;
        let mesh = slanted_triangle(angle);
        let [a, b] = [0, 1].map(|v| mesh.vertices()[v]);
        let step = (b - a) * 0.2;

        let outcome = advance(&mesh, &start, &step, &MotionConfig::default()).unwrap();
        assert_eq!(outcome.residual, Vec3::zeros(), "angle {angle}");
        let moved = mesh.to_world_point(&outcome.at) - mesh.to_world_point(&start);
        assert!(moved.norm() > 0.9 * step.norm(), "angle {angle}: moved {moved:?} of {step:?}");
    }
}

#[rstest]
#[case::east(Vec2::new(1.0, 0.0))]
#[case::north(Vec2::new(0.0, 1.0))]
#[case::south_west(Vec2::new(-1.0, -1.0))]
#[case::shallow(Vec2::new(1.0, -0.2))]
fn test_player_never_leaves_mesh(#[case] input: Vec2) {
    let mesh = generate_grid(4.0, 4.0, 4, 4).unwrap();
    let mut player = Player::spawn(&mesh, &Vec3::new(0.3, 0.2, 0.0)).unwrap();
    let config = PlayerConfig::default();

    for _ in 0..120 {
        player.walk(&mesh, input, 1.0 / 30.0, &config).unwrap();
        assert_valid(&mesh, &player.at);
        let p = player.position(&mesh);
        assert!(p.x.abs() <= 2.0 + 1e-4 && p.y.abs() <= 2.0 + 1e-4, "left the mesh at {p:?}");
    }
}

#[test]
fn test_player_on_hills_stays_upright() {
    let mesh = hills();
    let mut player = Player::spawn(&mesh, &Vec3::new(-1.0, -1.0, 0.0)).unwrap();
    let config = PlayerConfig::default();

    for frame in 0..90 {
        if frame % 30 == 0 {
            player.turn(&mesh, 0.5);
        }
        player.walk(&mesh, Vec2::new(0.0, 1.0), 1.0 / 60.0, &config).unwrap();
        assert_valid(&mesh, &player.at);
        let up = player.rotation * Vec3::z();
        assert!((up - player.up(&mesh)).norm() < 1e-3);
    }
}
