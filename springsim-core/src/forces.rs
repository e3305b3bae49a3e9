//! Force accumulation between springs and points
//!
//! Springs never hold forces of their own. Each evaluation adds its
//! contribution into the endpoints' accumulators, so the order in which
//! springs are visited does not change the per-point totals.

use crate::config::SimulationConfig;
use crate::engine::{Point, Spring, World};
use glam::Vec3;

/// Which of a point's states a force evaluation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// `position` and `velocity`
    Current,
    /// `tmp_position` with the current `velocity`
    HalfStepPosition,
    /// `tmp_position` and `tmp_velocity`
    HalfStep,
}

impl Sample {
    fn position(self, point: &Point) -> Vec3 {
        match self {
            Sample::Current => point.position,
            Sample::HalfStepPosition | Sample::HalfStep => point.tmp_position,
        }
    }

    fn velocity(self, point: &Point) -> Vec3 {
        match self {
            Sample::Current | Sample::HalfStepPosition => point.velocity,
            Sample::HalfStep => point.tmp_velocity,
        }
    }
}

/// Hookean force exerted on the endpoint at `pos_a`; the other endpoint
/// receives the negation.
///
/// Returns `None` when the endpoints are closer than `min_length`, where the
/// spring direction is undefined.
pub fn spring_force(
    pos_a: Vec3,
    pos_b: Vec3,
    rest_length: f32,
    stiffness: f32,
    min_length: f32,
) -> Option<Vec3> {
    let delta = pos_a - pos_b;
    let length = delta.length();
    if length < min_length {
        return None;
    }
    let magnitude = -stiffness * (length - rest_length);
    Some(delta * (magnitude / length))
}

/// Damping on a single endpoint, proportional to that endpoint's own velocity
pub fn damping_force(velocity: Vec3, damping: f32) -> Vec3 {
    velocity * -damping
}

/// Add one spring's elastic force (and damping, if requested) into both endpoints.
///
/// A degenerate spring contributes no elastic force; damping still applies.
/// A spring whose endpoint is not in `points` contributes nothing.
pub fn apply_spring(
    points: &mut [Point],
    spring: &Spring,
    sample: Sample,
    damping: Option<f32>,
    min_length: f32,
) {
    let (Some(a), Some(b)) = (points.get(spring.a.0), points.get(spring.b.0)) else {
        log::warn!(
            "Skipping spring {:?}-{:?} with a missing endpoint",
            spring.a,
            spring.b
        );
        return;
    };
    let (pos_a, pos_b) = (sample.position(a), sample.position(b));
    let (vel_a, vel_b) = (sample.velocity(a), sample.velocity(b));

    match spring_force(pos_a, pos_b, spring.rest_length, spring.stiffness, min_length) {
        Some(force) => {
            points[spring.a.0].add_internal_force(force);
            points[spring.b.0].add_internal_force(-force);
        }
        None => log::debug!(
            "Skipping degenerate spring {:?}-{:?} (length below {})",
            spring.a,
            spring.b,
            min_length
        ),
    }

    if let Some(coefficient) = damping {
        points[spring.a.0].add_internal_force(damping_force(vel_a, coefficient));
        points[spring.b.0].add_internal_force(damping_force(vel_b, coefficient));
    }
}

/// Evaluate every spring of the world, honouring the scenario's damping rule
pub fn accumulate_spring_forces(world: &mut World, config: &SimulationConfig, sample: Sample) {
    let damping = world.rules.damping.then_some(config.damping);
    let World {
        points, springs, ..
    } = world;
    for spring in springs.iter() {
        apply_spring(points, spring, sample, damping, config.min_spring_length);
    }
}

/// Whether gravity acts in this world under this configuration
pub fn gravity_active(world: &World, config: &SimulationConfig) -> bool {
    world.rules.gravity && config.gravity_enabled
}

pub fn apply_gravity(point: &mut Point, config: &SimulationConfig) {
    point.add_external_force(Vec3::new(0.0, -config.gravity_force(), 0.0));
}
