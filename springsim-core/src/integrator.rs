use crate::config::SimulationConfig;
use crate::engine::World;
use crate::forces::{accumulate_spring_forces, apply_gravity, gravity_active, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numerical scheme used to advance the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrator {
    /// Forward Euler: first order, one force evaluation
    Euler,
    /// Two-stage midpoint scheme evaluating forces at a half-step estimate
    Midpoint,
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integrator::Euler => write!(f, "euler"),
            Integrator::Midpoint => write!(f, "midpoint"),
        }
    }
}

impl FromStr for Integrator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Integrator::Euler),
            "midpoint" => Ok(Integrator::Midpoint),
            other => Err(format!("Unknown integrator '{}' (expected euler or midpoint)", other)),
        }
    }
}

/// Step the simulation forward by `dt` with the configured integrator,
/// then apply the floor correction.
pub fn step(world: &mut World, config: &SimulationConfig, dt: f32) {
    match config.integrator {
        Integrator::Euler => euler_step(world, config, dt),
        Integrator::Midpoint => midpoint_step(world, config, dt),
    }
    correct_floor(world, config);
}

/// Forward Euler. Position advances with the velocity from before the update.
pub fn euler_step(world: &mut World, config: &SimulationConfig, dt: f32) {
    world.clear_forces();
    accumulate_spring_forces(world, config, Sample::Current);

    let gravity = gravity_active(world, config);
    for point in world.points.iter_mut().filter(|p| p.is_movable()) {
        if gravity {
            apply_gravity(point, config);
        }
        let total = point.total_force();
        point.position += point.velocity * dt;
        point.velocity += total / config.point_mass * dt;
    }
}

/// Midpoint scheme over a single set of accumulators.
///
/// Forces are cleared once. The second evaluation adds on top of the first,
/// and gravity is applied in both stages.
pub fn midpoint_step(world: &mut World, config: &SimulationConfig, dt: f32) {
    let half_dt = dt / 2.0;
    world.clear_forces();

    for point in &mut world.points {
        if point.is_movable() {
            point.tmp_position = point.position + point.velocity * half_dt;
        } else {
            point.tmp_position = point.position;
            point.tmp_velocity = glam::Vec3::ZERO;
        }
    }

    accumulate_spring_forces(world, config, Sample::HalfStepPosition);

    let gravity = gravity_active(world, config);
    for point in world.points.iter_mut().filter(|p| p.is_movable()) {
        if gravity {
            apply_gravity(point, config);
        }
        let total = point.total_force();
        point.tmp_velocity = point.velocity + total / config.point_mass * half_dt;
        point.position += point.tmp_velocity * dt;
    }

    accumulate_spring_forces(world, config, Sample::HalfStep);

    for point in world.points.iter_mut().filter(|p| p.is_movable()) {
        if gravity {
            apply_gravity(point, config);
        }
        let total = point.total_force();
        point.velocity += total / config.point_mass * half_dt;
    }
}

/// Lift every movable point that sank below the floor back to the clamp height
pub fn correct_floor(world: &mut World, config: &SimulationConfig) {
    for point in world.points.iter_mut().filter(|p| p.is_movable()) {
        if point.position.y < config.floor_height {
            point.position.y = config.floor_clamp;
        }
    }
}
