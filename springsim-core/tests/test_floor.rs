//! Floor correction after each step

use glam::Vec3;
use springsim_core::engine::World;
use springsim_core::integrator::{self, Integrator};
use springsim_core::scenario::ScenarioId;
use springsim_core::tests::test_helpers::build_scenario;
use springsim_core::SimulationConfig;

#[test]
fn test_point_driven_below_floor_is_clamped_same_step() {
    for integrator in [Integrator::Euler, Integrator::Midpoint] {
        let mut world = World::new();
        let p = world.add_point(Vec3::new(0.5, 0.01, 0.0), false);
        world.points[p.0].velocity = Vec3::new(0.0, -2.0, 0.0);
        let config = SimulationConfig {
            integrator,
            ..SimulationConfig::default()
        };

        integrator::step(&mut world, &config, 0.1);

        let pos = world.points[p.0].position;
        assert_eq!(pos.y, config.floor_clamp);
        assert!((pos.x - 0.5).abs() < 1e-6);
    }
}

#[test]
fn test_point_exactly_on_floor_untouched() {
    let mut world = World::new();
    world.add_point(Vec3::ZERO, false);

    integrator::step(&mut world, &SimulationConfig::default(), 0.1);

    assert_eq!(world.points[0].position.y, 0.0);
}

#[test]
fn test_spring_house_never_below_floor() {
    let (mut world, mut config) = build_scenario(ScenarioId::SpringHouse);
    config.gravity_enabled = true;

    for _ in 0..400 {
        integrator::step(&mut world, &config, 0.01);
        for point in world.points.iter().filter(|p| p.is_movable()) {
            assert!(point.position.y >= config.floor_height);
        }
    }
}
