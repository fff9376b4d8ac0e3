//! Fixed substep loop driving a [`SoftBody`] once per rendered frame.

use crate::config::SolverConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::softbody::SoftBody;

/// Runs a constant number of equal substeps per frame.
///
/// The render loop owns the stepper and calls [`frame`](Self::frame) once per
/// frame; pointer handling must happen between those calls, never during.
pub struct Stepper<F: Float> {
    config: SolverConfig<F>,
    frames: u64,
}

impl<F: Float> Stepper<F> {
    pub fn new(config: SolverConfig<F>) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Stepper { config, frames: 0 })
    }

    pub fn config(&self) -> &SolverConfig<F> {
        &self.config
    }

    /// Frames simulated so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulate one nominal frame of `config.frame_dt`.
    pub fn frame<O: StepObserver>(&mut self, body: &mut SoftBody<F>, observer: &mut O) {
        let dt = self.config.frame_dt;
        self.run(body, dt, observer);
    }

    /// Simulate a frame of explicit duration `dt`.
    pub fn advance<O: StepObserver>(
        &mut self,
        body: &mut SoftBody<F>,
        dt: F,
        observer: &mut O,
    ) -> PhysicsResult<()> {
        if !(dt.is_finite() && dt > F::zero()) {
            return Err(PhysicsError::InvalidTimestep);
        }
        self.run(body, dt, observer);
        Ok(())
    }

    fn run<O: StepObserver>(&mut self, body: &mut SoftBody<F>, dt: F, observer: &mut O) {
        let sub_steps = self.config.sub_steps.max(1);
        let sub_dt = dt / F::from_usize(sub_steps);

        for _sub in 0..sub_steps {
            body.step(sub_dt, &self.config, observer);
        }

        self.frames += 1;
        observer.on_frame_complete();
        tracing::trace!(frame = self.frames, sub_steps, dt = dt.to_f64(), "frame simulated");
    }
}
