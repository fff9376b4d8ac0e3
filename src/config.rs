//! Configuration types for the physics solver.

use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::vec::Vec3;

/// Configuration for the XPBD solver and the frame stepper.
///
/// # Builder Pattern
/// ```
/// use jelly::config::SolverConfig;
/// use jelly::vec::Vec3;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_sub_steps(20)
///     .with_gravity(Vec3::new(0.0, -9.81, 0.0))
///     .with_edge_compliance(50.0);
/// assert_eq!(config.sub_steps, 20);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig<F: Float> {
    /// Number of substeps per rendered frame. Default: 10.
    pub sub_steps: usize,
    /// Gravity acceleration vector. Default: (0, -10, 0).
    pub gravity: Vec3<F>,
    /// Compliance of edge (distance) constraints. Edges are soft. Default: 100.
    pub edge_compliance: F,
    /// Compliance of volume constraints. Zero keeps tetrahedra incompressible. Default: 0.
    pub volume_compliance: F,
    /// Height of the infinite ground plane (on the y axis). Default: 0.
    pub ground_height: F,
    /// Nominal duration of one rendered frame. Default: 1/60 s.
    pub frame_dt: F,
}

impl<F: Float> SolverConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            sub_steps: 10,
            gravity: Vec3::new(F::zero(), F::from_f32(-10.0), F::zero()),
            edge_compliance: F::from_f32(100.0),
            volume_compliance: F::zero(),
            ground_height: F::zero(),
            frame_dt: F::one() / F::from_f32(60.0),
        }
    }

    /// Set the number of substeps per frame (at least one).
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    pub fn without_gravity(mut self) -> Self {
        self.gravity = Vec3::zero();
        self
    }

    /// Set the edge constraint compliance.
    pub fn with_edge_compliance(mut self, compliance: F) -> Self {
        self.edge_compliance = compliance;
        self
    }

    /// Set the volume constraint compliance.
    pub fn with_volume_compliance(mut self, compliance: F) -> Self {
        self.volume_compliance = compliance;
        self
    }

    /// Set the ground plane height.
    pub fn with_ground_height(mut self, height: F) -> Self {
        self.ground_height = height;
        self
    }

    /// Set the nominal frame duration.
    pub fn with_frame_dt(mut self, frame_dt: F) -> Self {
        self.frame_dt = frame_dt;
        self
    }

    /// Duration of a single substep of a nominal frame.
    pub fn substep_dt(&self) -> F {
        self.frame_dt / F::from_usize(self.sub_steps.max(1))
    }

    /// Check that every value is usable by the solver.
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.frame_dt.is_finite() && self.frame_dt > F::zero()) {
            return Err(PhysicsError::InvalidTimestep);
        }
        for compliance in [self.edge_compliance, self.volume_compliance] {
            if !(compliance.is_finite() && compliance >= F::zero()) {
                return Err(PhysicsError::InvalidCompliance);
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c: SolverConfig<f32> = SolverConfig::default();
        assert_eq!(c.sub_steps, 10);
        assert_eq!(c.gravity, Vec3::new(0.0, -10.0, 0.0));
        assert_eq!(c.edge_compliance, 100.0);
        assert_eq!(c.volume_compliance, 0.0);
        assert_eq!(c.ground_height, 0.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn sub_steps_clamped() {
        let c: SolverConfig<f64> = SolverConfig::new().with_sub_steps(0);
        assert_eq!(c.sub_steps, 1);
    }

    #[test]
    fn substep_dt_divides_frame() {
        let c: SolverConfig<f64> = SolverConfig::new().with_frame_dt(0.1).with_sub_steps(4);
        assert!(Float::abs(c.substep_dt() - 0.025) < 1e-12);
    }

    #[test]
    fn rejects_bad_values() {
        let c: SolverConfig<f32> = SolverConfig::new().with_frame_dt(0.0);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidTimestep));
        let c: SolverConfig<f32> = SolverConfig::new().with_edge_compliance(-1.0);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidCompliance));
        let c: SolverConfig<f32> = SolverConfig::new().with_volume_compliance(f32::NAN);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidCompliance));
    }
}
