//! Error types for the simulation core
//!
//! Configuration problems and world-construction problems are reported
//! separately so that tuning controls can reject a bad value without
//! tearing down the current scenario.

use crate::engine::PointId;
use std::path::PathBuf;
use thiserror::Error;

/// An invalid simulation parameter
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("point mass must be positive, got {0}")]
    NonPositiveMass(f32),

    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),

    #[error("stiffness must be positive, got {0}")]
    NonPositiveStiffness(f32),

    #[error("damping must not be negative, got {0}")]
    NegativeDamping(f32),

    #[error("minimum spring length must be positive, got {0}")]
    NonPositiveMinSpringLength(f32),

    #[error("max steps per frame must be at least 1")]
    NoStepsPerFrame,

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("floor clamp {clamp} lies below the floor height {floor}")]
    FloorClampBelowFloor { clamp: f32, floor: f32 },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A point or spring that cannot be added to a world
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("point {0:?} does not exist")]
    UnknownPoint(PointId),

    #[error("spring endpoints must be distinct points, got {0:?} twice")]
    SameEndpoints(PointId),

    #[error("rest length must be positive, got {0}")]
    NonPositiveRestLength(f32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
