pub mod config;
pub mod engine;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod runtime;
pub mod scenario;

pub use config::SimulationConfig;
pub use engine::{Point, PointId, ScenarioRules, Spring, World};
pub use error::{ConfigError, WorldError};
pub use integrator::{step, Integrator};
pub use runtime::{
    point_states, spring_segments, FrameClock, PointState, Simulation, SpringSegment,
};
pub use scenario::{run_single_step_report, ScenarioId, SingleStepReport};
