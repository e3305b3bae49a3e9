use crate::config::{
    validate_damping, validate_mass, validate_stiffness, validate_time_step, SimulationConfig,
    SCENARIO_POINT_MASS,
};
use crate::engine::World;
use crate::error::{ConfigError, WorldError};
use crate::integrator::{self, Integrator};
use crate::scenario::{self, ScenarioId, SingleStepReport};
use glam::Vec3;

/// Snapshot of a point for visualization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub fixed: bool,
}

/// Endpoint positions of a spring for visualization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSegment {
    pub a: Vec3,
    pub b: Vec3,
}

pub fn point_states(world: &World) -> Vec<PointState> {
    world
        .points
        .iter()
        .map(|p| PointState {
            position: p.position,
            velocity: p.velocity,
            fixed: p.fixed,
        })
        .collect()
}

/// Springs with an endpoint missing from the world are left out
pub fn spring_segments(world: &World) -> Vec<SpringSegment> {
    world
        .springs
        .iter()
        .filter_map(|s| {
            Some(SpringSegment {
                a: world.point(s.a)?.position,
                b: world.point(s.b)?.position,
            })
        })
        .collect()
}

/// Accumulates frame time and hands out fixed simulation steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameClock {
    accumulated: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` seconds and return how many steps of `time_step` are due,
    /// at most `max_steps`. Time not consumed carries over to the next frame,
    /// but never more than one frame's worth of steps (`time_step * max_steps`);
    /// the rest of a backlog is dropped.
    pub fn tick(&mut self, elapsed: f32, time_step: f32, max_steps: usize) -> usize {
        self.accumulated += elapsed.max(0.0);
        let mut steps = 0;
        while steps < max_steps && self.accumulated > time_step {
            self.accumulated -= time_step;
            steps += 1;
        }
        self.accumulated = self.accumulated.min(time_step * max_steps as f32);
        steps
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// A running simulation: the world, its parameters and the frame clock
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    config: SimulationConfig,
    scenario: ScenarioId,
    clock: FrameClock,
    pub current_step: u64,
    last_report: Option<SingleStepReport>,
}

impl Simulation {
    /// Validate `config` and build `scenario`
    pub fn new(config: SimulationConfig, scenario: ScenarioId) -> Result<Self, WorldError> {
        config.validate()?;
        let mut sim = Self {
            world: World::new(),
            config,
            scenario,
            clock: FrameClock::new(),
            current_step: 0,
            last_report: None,
        };
        sim.reset()?;
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    /// Result of the last single-step run, if that scenario was selected
    pub fn last_report(&self) -> Option<&SingleStepReport> {
        self.last_report.as_ref()
    }

    /// Switch to another scenario, discarding all points and springs
    pub fn select_scenario(&mut self, scenario: ScenarioId) -> Result<(), WorldError> {
        self.scenario = scenario;
        self.reset()
    }

    /// Rebuild the current scenario from scratch
    pub fn reset(&mut self) -> Result<(), WorldError> {
        self.clock.reset();
        self.current_step = 0;
        self.last_report = None;

        if self.scenario == ScenarioId::SingleStep {
            let report = scenario::run_single_step_report(&mut self.world, &self.config)?;
            self.config.integrator = Integrator::Midpoint;
            self.config.point_mass = SCENARIO_POINT_MASS;
            log::info!("{}", report);
            self.last_report = Some(report);
            return Ok(());
        }

        scenario::build(self.scenario, &mut self.world, &mut self.config)
    }

    /// Advance by exactly one fixed time step
    pub fn step(&mut self) {
        integrator::step(&mut self.world, &self.config, self.config.time_step);
        self.current_step += 1;
    }

    /// Feed elapsed frame time; runs the fixed steps that became due and
    /// returns how many ran.
    pub fn advance(&mut self, elapsed: f32) -> usize {
        let due = self.clock.tick(
            elapsed,
            self.config.time_step,
            self.config.max_steps_per_frame,
        );
        for _ in 0..due {
            self.step();
        }
        due
    }

    pub fn point_states(&self) -> Vec<PointState> {
        point_states(&self.world)
    }

    pub fn spring_segments(&self) -> Vec<SpringSegment> {
        spring_segments(&self.world)
    }

    pub fn increase_stiffness(&mut self) -> Result<(), ConfigError> {
        self.adjust_stiffness(self.config.stiffness_increment)
    }

    pub fn decrease_stiffness(&mut self) -> Result<(), ConfigError> {
        self.adjust_stiffness(-self.config.stiffness_increment)
    }

    /// Add `delta` to every spring's stiffness. Nothing changes if any
    /// spring would end up non-positive.
    pub fn adjust_stiffness(&mut self, delta: f32) -> Result<(), ConfigError> {
        for spring in &self.world.springs {
            validate_stiffness(spring.stiffness + delta)?;
        }
        for spring in &mut self.world.springs {
            spring.stiffness += delta;
        }
        if let Some(first) = self.world.springs.first() {
            log::info!("New stiffness at {}", first.stiffness);
        }
        Ok(())
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), ConfigError> {
        validate_damping(damping)?;
        self.config.damping = damping;
        Ok(())
    }

    pub fn set_integrator(&mut self, integrator: Integrator) {
        if self.config.integrator != integrator {
            log::info!("Switching integrator to {}", integrator);
        }
        self.config.integrator = integrator;
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.config.gravity_enabled = enabled;
    }

    pub fn set_point_mass(&mut self, mass: f32) -> Result<(), ConfigError> {
        validate_mass(mass)?;
        self.config.point_mass = mass;
        Ok(())
    }

    pub fn set_time_step(&mut self, time_step: f32) -> Result<(), ConfigError> {
        validate_time_step(time_step)?;
        self.config.time_step = time_step;
        Ok(())
    }

    /// Replace the whole configuration, e.g. after reloading it from disk.
    /// The current world is kept; call [`Simulation::reset`] to rebuild it.
    pub fn replace_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PointId, Spring};

    #[test]
    fn test_clock_carries_leftover_time() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(0.06, 0.1, 1), 0);
        assert_eq!(clock.tick(0.06, 0.1, 1), 1);
        assert!((clock.accumulated() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_clock_caps_steps_per_frame() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(0.35, 0.1, 1), 1);
        assert!((clock.accumulated() - 0.1).abs() < 1e-6);
        assert_eq!(clock.tick(0.05, 0.1, 4), 1);
        assert!((clock.accumulated() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_clock_backlog_stays_bounded() {
        // 60 fps against a 0.005 step with one step per frame
        let mut clock = FrameClock::new();
        for _ in 0..100_000 {
            assert_eq!(clock.tick(1.0 / 60.0, 0.005, 1), 1);
            assert!(clock.accumulated() <= 0.005);
        }
    }

    #[test]
    fn test_clock_ignores_negative_elapsed() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(-1.0, 0.1, 1), 0);
        assert_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn test_decrease_stiffness_rejects_non_positive() {
        let mut sim =
            Simulation::new(SimulationConfig::default(), ScenarioId::SpringHouse).unwrap();
        sim.decrease_stiffness().unwrap();
        sim.decrease_stiffness().unwrap();
        sim.decrease_stiffness().unwrap();
        assert!(sim.world.springs.iter().all(|s| (s.stiffness - 10.0).abs() < 1e-6));

        let err = sim.decrease_stiffness().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveStiffness(_)));
        assert!(sim.world.springs.iter().all(|s| (s.stiffness - 10.0).abs() < 1e-6));
    }

    #[test]
    fn test_increase_stiffness_applies_to_all_springs() {
        let mut sim =
            Simulation::new(SimulationConfig::default(), ScenarioId::SpringHouse).unwrap();
        sim.increase_stiffness().unwrap();
        assert!(sim.world.springs.iter().all(|s| (s.stiffness - 50.0).abs() < 1e-6));
    }

    #[test]
    fn test_setters_validate() {
        let mut sim = Simulation::new(SimulationConfig::default(), ScenarioId::Empty).unwrap();
        assert!(sim.set_point_mass(-1.0).is_err());
        assert!(sim.set_time_step(0.0).is_err());
        assert!(sim.set_damping(-0.5).is_err());
        assert!(sim.set_damping(0.0).is_ok());
        assert_eq!(sim.config().point_mass, 10.0);
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = SimulationConfig {
            point_mass: 0.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config, ScenarioId::SpringHouse).is_err());
    }

    #[test]
    fn test_single_step_selection_records_report() {
        let mut sim = Simulation::new(SimulationConfig::default(), ScenarioId::Empty).unwrap();
        assert!(sim.last_report().is_none());

        sim.select_scenario(ScenarioId::SingleStep).unwrap();

        let report = sim.last_report().unwrap();
        assert_eq!(sim.point_states(), report.midpoint);
        assert_eq!(sim.config().integrator, Integrator::Midpoint);
    }

    #[test]
    fn test_advance_runs_due_steps() {
        let mut sim =
            Simulation::new(SimulationConfig::default(), ScenarioId::EulerOscillator).unwrap();
        assert_eq!(sim.advance(0.004), 0);
        assert_eq!(sim.advance(0.004), 1);
        assert_eq!(sim.current_step, 1);

        sim.reset().unwrap();
        assert_eq!(sim.current_step, 0);
        assert_eq!(sim.advance(0.004), 0);
    }

    #[test]
    fn test_spring_segments_follow_points() {
        let sim = Simulation::new(SimulationConfig::default(), ScenarioId::EulerOscillator).unwrap();
        let segments = sim.spring_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].a, Vec3::ZERO);
        assert_eq!(segments[0].b, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_stale_spring_is_skipped() {
        let mut sim =
            Simulation::new(SimulationConfig::default(), ScenarioId::EulerOscillator).unwrap();
        sim.world.springs.push(Spring {
            a: PointId(0),
            b: PointId(9),
            rest_length: 1.0,
            stiffness: 40.0,
        });

        sim.step();

        assert_eq!(sim.spring_segments().len(), 1);
        assert!(sim.point_states().iter().all(|p| p.position.is_finite()));
    }
}
