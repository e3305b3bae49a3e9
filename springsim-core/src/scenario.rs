//! Built-in scenarios
//!
//! Every construction routine starts from an empty world, so rebuilding a
//! scenario always yields the same initial state.

use crate::config::{SimulationConfig, SCENARIO_POINT_MASS};
use crate::engine::{ScenarioRules, World};
use crate::error::WorldError;
use crate::integrator::{self, Integrator};
use crate::runtime::{point_states, PointState};
use glam::Vec3;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Stiffness of every spring in the built-in scenarios
pub const SCENARIO_STIFFNESS: f32 = 40.0;

/// Time step used by the oscillator scenarios
pub const OSCILLATOR_TIME_STEP: f32 = 0.005;

/// Time step of the single-step report
pub const REPORT_TIME_STEP: f32 = 0.1;

/// Identifier selecting a construction routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScenarioId {
    /// No points, no springs
    #[default]
    Empty,
    /// Two free points advanced once with each integrator, damping off
    SingleStep,
    /// Two free points under forward Euler
    EulerOscillator,
    /// Two free points under the midpoint scheme
    MidpointOscillator,
    /// Ten points and seventeen springs hanging from a fixed apex, gravity allowed
    SpringHouse,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 5] = [
        ScenarioId::Empty,
        ScenarioId::SingleStep,
        ScenarioId::EulerOscillator,
        ScenarioId::MidpointOscillator,
        ScenarioId::SpringHouse,
    ];

    /// Map a position in the scene list (`BasicTest, Setup1, Setup2, Setup3,
    /// Demo1..Demo4`) to a scenario. Anything without mass-spring content is `Empty`.
    pub fn from_index(index: i64) -> Self {
        match index {
            4 => ScenarioId::SingleStep,
            5 => ScenarioId::EulerOscillator,
            6 => ScenarioId::MidpointOscillator,
            7 => ScenarioId::SpringHouse,
            0..=3 => ScenarioId::Empty,
            other => {
                log::warn!("Unknown scenario index {}, using the empty scenario", other);
                ScenarioId::Empty
            }
        }
    }

    /// Resolve a scenario name, falling back to `Empty` for unknown names
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "empty" => ScenarioId::Empty,
            "single-step" | "demo1" => ScenarioId::SingleStep,
            "euler-oscillator" | "demo2" => ScenarioId::EulerOscillator,
            "midpoint-oscillator" | "demo3" => ScenarioId::MidpointOscillator,
            "spring-house" | "demo4" => ScenarioId::SpringHouse,
            _ => {
                log::warn!("Unknown scenario '{}', using the empty scenario", name);
                ScenarioId::Empty
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Empty => "empty",
            ScenarioId::SingleStep => "single-step",
            ScenarioId::EulerOscillator => "euler-oscillator",
            ScenarioId::MidpointOscillator => "midpoint-oscillator",
            ScenarioId::SpringHouse => "spring-house",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ScenarioId::from_name(s))
    }
}

/// Discard the world's contents and build the given scenario into it.
///
/// Scenarios also set the shared point mass, and the oscillators pick their
/// integrator and time step.
pub fn build(
    id: ScenarioId,
    world: &mut World,
    config: &mut SimulationConfig,
) -> Result<(), WorldError> {
    world.clear();
    match id {
        ScenarioId::Empty => {}
        ScenarioId::SingleStep => {
            build_two_points(world, config)?;
            world.rules.damping = false;
        }
        ScenarioId::EulerOscillator => {
            build_two_points(world, config)?;
            config.integrator = Integrator::Euler;
            config.time_step = OSCILLATOR_TIME_STEP;
        }
        ScenarioId::MidpointOscillator => {
            build_two_points(world, config)?;
            config.integrator = Integrator::Midpoint;
            config.time_step = OSCILLATOR_TIME_STEP;
        }
        ScenarioId::SpringHouse => build_spring_house(world, config)?,
    }

    log::info!(
        "Built scenario {} ({} points, {} springs)",
        id,
        world.points.len(),
        world.springs.len()
    );
    Ok(())
}

/// Two free points moving apart sideways, joined by a stretched spring
fn build_two_points(world: &mut World, config: &mut SimulationConfig) -> Result<(), WorldError> {
    let p0 = world.add_point(Vec3::new(0.0, 0.0, 0.0), false);
    let p1 = world.add_point(Vec3::new(0.0, 2.0, 0.0), false);
    world.points[p0.0].velocity = Vec3::new(-1.0, 0.0, 0.0);
    world.points[p1.0].velocity = Vec3::new(1.0, 0.0, 0.0);

    world.add_spring_with_rest_length(p0, p1, 1.0, SCENARIO_STIFFNESS)?;

    config.point_mass = SCENARIO_POINT_MASS;
    Ok(())
}

/// A 2x2x2 cube with a two-point roof; the left roof point is fixed
fn build_spring_house(world: &mut World, config: &mut SimulationConfig) -> Result<(), WorldError> {
    world.rules = ScenarioRules {
        damping: true,
        gravity: true,
    };

    // floor
    let p0 = world.add_point(Vec3::new(0.0, 0.0, 0.0), false);
    let p1 = world.add_point(Vec3::new(0.0, 0.0, 2.0), false);
    let p2 = world.add_point(Vec3::new(2.0, 0.0, 2.0), false);
    let p3 = world.add_point(Vec3::new(2.0, 0.0, 0.0), false);
    // ceiling
    let p4 = world.add_point(Vec3::new(0.0, 2.0, 0.0), false);
    let p5 = world.add_point(Vec3::new(0.0, 2.0, 2.0), false);
    let p6 = world.add_point(Vec3::new(2.0, 2.0, 2.0), false);
    let p7 = world.add_point(Vec3::new(2.0, 2.0, 0.0), false);
    // roof
    let p8 = world.add_point(Vec3::new(0.0, 3.0, 1.0), true);
    let p9 = world.add_point(Vec3::new(2.0, 3.0, 1.0), false);

    let k = SCENARIO_STIFFNESS;
    for (a, b) in [(p0, p1), (p1, p2), (p2, p3), (p3, p0)] {
        world.add_spring(a, b, k)?;
    }

    // walls start compressed or stretched
    world.add_spring_with_rest_length(p1, p5, 2.0, k)?;
    world.add_spring_with_rest_length(p2, p6, 1.5, k)?;
    world.add_spring_with_rest_length(p3, p7, 2.2, k)?;
    world.add_spring_with_rest_length(p0, p4, 1.5, k)?;

    for (a, b) in [
        (p4, p5),
        (p5, p6),
        (p6, p7),
        (p7, p4),
        (p4, p8),
        (p5, p8),
        (p6, p9),
        (p7, p9),
        (p8, p9),
    ] {
        world.add_spring(a, b, k)?;
    }

    config.point_mass = SCENARIO_POINT_MASS;
    Ok(())
}

/// Point states of the two-point system after one step of each integrator
#[derive(Debug, Clone, PartialEq)]
pub struct SingleStepReport {
    pub euler: Vec<PointState>,
    pub midpoint: Vec<PointState>,
}

/// Advance the single-step scenario once with Euler and once with the
/// midpoint scheme, each from a fresh build.
///
/// The world is left holding the state after the midpoint step.
pub fn run_single_step_report(
    world: &mut World,
    config: &SimulationConfig,
) -> Result<SingleStepReport, WorldError> {
    let mut run = |scheme: Integrator| -> Result<Vec<PointState>, WorldError> {
        let mut step_config = config.clone();
        build(ScenarioId::SingleStep, world, &mut step_config)?;
        step_config.integrator = scheme;
        integrator::step(world, &step_config, REPORT_TIME_STEP);
        Ok(point_states(world))
    };

    let euler = run(Integrator::Euler)?;
    let midpoint = run(Integrator::Midpoint)?;
    Ok(SingleStepReport { euler, midpoint })
}

impl fmt::Display for SingleStepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, states) in [("Euler", &self.euler), ("midpoint", &self.midpoint)] {
            writeln!(f, "Points after one {} step", label)?;
            for (i, state) in states.iter().enumerate() {
                let p = state.position;
                writeln!(f, "Position p{}: ({}, {}, {})", i, p.x, p.y, p.z)?;
            }
            for (i, state) in states.iter().enumerate() {
                let v = state.velocity;
                writeln!(f, "Velocity p{}: ({}, {}, {})", i, v.x, v.y, v.z)?;
            }
        }
        Ok(())
    }
}
