//! Invalid parameters are rejected before they reach point state

use glam::Vec3;
use springsim_core::engine::{PointId, World};
use springsim_core::scenario::ScenarioId;
use springsim_core::{ConfigError, Simulation, SimulationConfig, WorldError};

#[test]
fn test_config_rejects_non_positive_mass() {
    let err = SimulationConfig::from_toml_str("point_mass = -10.0").unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveMass(_)));
}

#[test]
fn test_config_rejects_negative_damping() {
    let err = SimulationConfig::from_toml_str("damping = -1.0").unwrap_err();
    assert!(matches!(err, ConfigError::NegativeDamping(_)));
}

#[test]
fn test_config_rejects_zero_steps_per_frame() {
    let err = SimulationConfig::from_toml_str("max_steps_per_frame = 0").unwrap_err();
    assert!(matches!(err, ConfigError::NoStepsPerFrame));
}

#[test]
fn test_config_rejects_clamp_below_floor() {
    let err = SimulationConfig::from_toml_str("floor_clamp = -0.5").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::FloorClampBelowFloor { clamp, floor } if clamp == -0.5 && floor == 0.0
    ));

    let mut sim = Simulation::new(SimulationConfig::default(), ScenarioId::Empty).unwrap();
    let lowered = SimulationConfig {
        floor_height: 2.0,
        ..SimulationConfig::default()
    };
    assert!(sim.replace_config(lowered).is_err());
    assert_eq!(sim.config().floor_height, 0.0);
}

#[test]
fn test_clamped_point_stays_above_floor() {
    let config = SimulationConfig::from_toml_str("floor_clamp = 0.0").unwrap();
    let mut world = World::new();
    let id = world.add_point(Vec3::new(0.0, 0.01, 0.0), false);
    world.points[id.0].velocity = Vec3::new(0.0, -2.0, 0.0);

    springsim_core::step(&mut world, &config, 0.1);

    assert!(world.points[id.0].position.y >= config.floor_height);
}

#[test]
fn test_config_rejects_non_finite_values() {
    for source in [
        "gravity_enabled = true\ngravity_multiplier = nan",
        "gravity_acceleration = inf",
        "floor_height = -inf",
        "floor_clamp = nan",
        "stiffness_increment = inf",
        "point_mass = inf",
        "damping = inf",
        "min_spring_length = inf",
    ] {
        let err = SimulationConfig::from_toml_str(source).unwrap_err();
        assert!(
            matches!(err, ConfigError::NonFinite { .. }),
            "{:?} gave {:?}",
            source,
            err
        );
    }
}

#[test]
fn test_setters_reject_infinity() {
    let mut sim = Simulation::new(SimulationConfig::default(), ScenarioId::Empty).unwrap();
    assert!(sim.set_point_mass(f32::INFINITY).is_err());
    assert!(sim.set_time_step(f32::INFINITY).is_err());
    assert!(sim.set_damping(f32::INFINITY).is_err());
    assert_eq!(sim.config(), &SimulationConfig::default());
}

#[test]
fn test_nan_gravity_never_reaches_positions() {
    let config = SimulationConfig {
        gravity_enabled: true,
        gravity_multiplier: f32::NAN,
        ..SimulationConfig::default()
    };
    assert!(Simulation::new(config, ScenarioId::SpringHouse).is_err());
}

#[test]
fn test_config_rejects_bad_toml() {
    let err = SimulationConfig::from_toml_str("point_mass = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_config_file() {
    let err = SimulationConfig::load("/nonexistent/springsim.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_world_rejects_bad_springs() {
    let mut world = World::new();
    let a = world.add_point(Vec3::ZERO, false);
    let b = world.add_point(Vec3::X, false);

    assert!(matches!(
        world.add_spring_with_rest_length(a, b, 0.0, 40.0),
        Err(WorldError::NonPositiveRestLength(_))
    ));
    assert!(matches!(
        world.add_spring_with_rest_length(a, b, 1.0, -5.0),
        Err(WorldError::Config(ConfigError::NonPositiveStiffness(_)))
    ));
    assert!(matches!(
        world.add_spring(a, PointId(2), 40.0),
        Err(WorldError::UnknownPoint(PointId(2)))
    ));
    assert!(world.springs.is_empty());
}

#[test]
fn test_collapsed_spring_keeps_state_finite() {
    let mut world = World::new();
    let a = world.add_point(Vec3::new(0.0, 1.0, 0.0), false);
    let b = world.add_point(Vec3::new(0.0, 1.0, 0.0), false);
    world.add_spring_with_rest_length(a, b, 1.0, 40.0).unwrap();

    for _ in 0..10 {
        springsim_core::step(&mut world, &SimulationConfig::default(), 0.1);
    }

    for point in &world.points {
        assert!(point.position.is_finite());
        assert!(point.velocity.is_finite());
    }
}

#[test]
fn test_empty_scenario_steps_without_error() {
    let mut sim = Simulation::new(SimulationConfig::default(), ScenarioId::from_name("nope"))
        .expect("empty scenario builds");
    sim.step();
    assert!(sim.point_states().is_empty());
    assert!(sim.spring_segments().is_empty());
}
