use crate::error::ConfigError;
use crate::integrator::Integrator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coordinate a point's Y is reset to when it drops below the floor.
///
/// The reset goes to this value rather than to the floor itself, so a point
/// that falls through is lifted back above the ground.
pub const DEFAULT_FLOOR_CLAMP: f32 = 1.0;

/// Lengths below this are treated as coincident endpoints.
pub const DEFAULT_MIN_SPRING_LENGTH: f32 = 1e-6;

/// Mass assigned to every point by the built-in scenarios
pub const SCENARIO_POINT_MASS: f32 = 10.0;

/// Global parameters of a simulation run
///
/// Scenarios and tuning controls read and write this struct instead of
/// sharing free-floating state. Missing TOML keys fall back to `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Mass shared by all points of the scenario
    pub point_mass: f32,
    /// Magnitude of gravitational acceleration, applied along -Y
    pub gravity_acceleration: f32,
    /// Scale applied on top of `gravity_acceleration`
    pub gravity_multiplier: f32,
    /// Gravity toggle; only honoured by scenarios whose rules allow gravity
    pub gravity_enabled: bool,
    /// Velocity-proportional damping coefficient
    pub damping: f32,
    pub integrator: Integrator,
    /// Fixed simulation step in seconds
    pub time_step: f32,
    /// Y below this counts as a floor violation
    pub floor_height: f32,
    /// Y assigned to a point that violated the floor
    pub floor_clamp: f32,
    pub min_spring_length: f32,
    /// Amount added or removed by one stiffness tuning step
    pub stiffness_increment: f32,
    /// Upper bound on fixed steps run for a single frame
    pub max_steps_per_frame: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            point_mass: SCENARIO_POINT_MASS,
            gravity_acceleration: 9.81,
            gravity_multiplier: 0.2,
            gravity_enabled: false,
            damping: 4.0,
            integrator: Integrator::Midpoint,
            time_step: 0.1,
            floor_height: 0.0,
            floor_clamp: DEFAULT_FLOOR_CLAMP,
            min_spring_length: DEFAULT_MIN_SPRING_LENGTH,
            stiffness_increment: 10.0,
            max_steps_per_frame: 1,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded simulation config from {:?}", path);
        Ok(config)
    }

    /// Reject parameters that would turn into NaN or infinity during a step
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_mass(self.point_mass)?;
        validate_time_step(self.time_step)?;
        validate_damping(self.damping)?;
        if !(self.min_spring_length > 0.0) {
            return Err(ConfigError::NonPositiveMinSpringLength(self.min_spring_length));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::NoStepsPerFrame);
        }

        for (field, value) in [
            ("gravity_acceleration", self.gravity_acceleration),
            ("gravity_multiplier", self.gravity_multiplier),
            ("floor_height", self.floor_height),
            ("floor_clamp", self.floor_clamp),
            ("min_spring_length", self.min_spring_length),
            ("stiffness_increment", self.stiffness_increment),
        ] {
            validate_finite(field, value)?;
        }

        // a clamped point must end up on or above the floor
        if self.floor_clamp < self.floor_height {
            return Err(ConfigError::FloorClampBelowFloor {
                clamp: self.floor_clamp,
                floor: self.floor_height,
            });
        }
        Ok(())
    }

    /// Downward force on a single point when gravity applies
    pub fn gravity_force(&self) -> f32 {
        self.point_mass * self.gravity_acceleration * self.gravity_multiplier
    }
}

// `!(x > 0.0)` also rejects NaN; infinities are caught by `validate_finite`.

pub(crate) fn validate_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    Ok(())
}

pub(crate) fn validate_mass(mass: f32) -> Result<(), ConfigError> {
    if !(mass > 0.0) {
        return Err(ConfigError::NonPositiveMass(mass));
    }
    validate_finite("point_mass", mass)
}

pub(crate) fn validate_time_step(dt: f32) -> Result<(), ConfigError> {
    if !(dt > 0.0) {
        return Err(ConfigError::NonPositiveTimeStep(dt));
    }
    validate_finite("time_step", dt)
}

pub(crate) fn validate_stiffness(stiffness: f32) -> Result<(), ConfigError> {
    if !(stiffness > 0.0) {
        return Err(ConfigError::NonPositiveStiffness(stiffness));
    }
    validate_finite("stiffness", stiffness)
}

pub(crate) fn validate_damping(damping: f32) -> Result<(), ConfigError> {
    if !(damping >= 0.0) {
        return Err(ConfigError::NegativeDamping(damping));
    }
    validate_finite("damping", damping)
}
