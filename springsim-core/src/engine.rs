use crate::config::validate_stiffness;
use crate::error::WorldError;
use glam::Vec3;

/// Stable handle of a point inside its [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(pub usize);

/// A mass particle in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub velocity: Vec3,
    pub internal_force: Vec3,
    pub external_force: Vec3,
    pub fixed: bool,
    /// Half-step estimates used by the midpoint integrator
    pub tmp_position: Vec3,
    pub tmp_velocity: Vec3,
}

impl Point {
    pub fn new(position: Vec3, fixed: bool) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            internal_force: Vec3::ZERO,
            external_force: Vec3::ZERO,
            fixed,
            tmp_position: position,
            tmp_velocity: Vec3::ZERO,
        }
    }

    /// Whether integrators may update this point's position and velocity
    pub fn is_movable(&self) -> bool {
        !self.fixed
    }

    pub fn add_internal_force(&mut self, force: Vec3) {
        self.internal_force += force;
    }

    pub fn add_external_force(&mut self, force: Vec3) {
        self.external_force += force;
    }

    pub fn clear_forces(&mut self) {
        self.internal_force = Vec3::ZERO;
        self.external_force = Vec3::ZERO;
    }

    pub fn total_force(&self) -> Vec3 {
        self.internal_force + self.external_force
    }
}

/// A damped elastic connector between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub a: PointId,
    pub b: PointId,
    pub rest_length: f32,
    pub stiffness: f32,
}

/// Per-scenario switches consulted by the integrators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioRules {
    /// Apply velocity damping along with spring forces
    pub damping: bool,
    /// Allow gravity when the configuration enables it
    pub gravity: bool,
}

impl Default for ScenarioRules {
    fn default() -> Self {
        Self {
            damping: true,
            gravity: false,
        }
    }
}

/// The physics world: an arena of points and the springs joining them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub points: Vec<Point>,
    /// Add through [`World::add_spring`] or [`World::add_spring_with_rest_length`],
    /// which check the endpoints. Springs pushed directly with a stale
    /// [`PointId`] are skipped during force evaluation.
    pub springs: Vec<Spring>,
    pub rules: ScenarioRules,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every point and spring; handles from before the call become invalid
    pub fn clear(&mut self) {
        self.points.clear();
        self.springs.clear();
        self.rules = ScenarioRules::default();
    }

    pub fn add_point(&mut self, position: Vec3, fixed: bool) -> PointId {
        let id = PointId(self.points.len());
        self.points.push(Point::new(position, fixed));
        id
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.0)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.get_mut(id.0)
    }

    /// Add a spring that is idle in the current configuration: its rest
    /// length is the present distance between the endpoints.
    pub fn add_spring(
        &mut self,
        a: PointId,
        b: PointId,
        stiffness: f32,
    ) -> Result<usize, WorldError> {
        let pa = self.point(a).ok_or(WorldError::UnknownPoint(a))?;
        let pb = self.point(b).ok_or(WorldError::UnknownPoint(b))?;
        let rest_length = pa.position.distance(pb.position);
        self.add_spring_with_rest_length(a, b, rest_length, stiffness)
    }

    pub fn add_spring_with_rest_length(
        &mut self,
        a: PointId,
        b: PointId,
        rest_length: f32,
        stiffness: f32,
    ) -> Result<usize, WorldError> {
        if self.point(a).is_none() {
            return Err(WorldError::UnknownPoint(a));
        }
        if self.point(b).is_none() {
            return Err(WorldError::UnknownPoint(b));
        }
        if a == b {
            return Err(WorldError::SameEndpoints(a));
        }
        if !(rest_length > 0.0) {
            return Err(WorldError::NonPositiveRestLength(rest_length));
        }
        validate_stiffness(stiffness)?;

        let idx = self.springs.len();
        self.springs.push(Spring {
            a,
            b,
            rest_length,
            stiffness,
        });
        Ok(idx)
    }

    pub fn clear_forces(&mut self) {
        for point in &mut self.points {
            point.clear_forces();
        }
    }
}
