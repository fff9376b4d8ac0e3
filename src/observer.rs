//! Step observer trait for monitoring physics simulation progress.

/// Trait for observing the phases of each substep.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after gravity integration and ground collision.
    fn on_integrate(&mut self) {}

    /// Called after the edge constraint sweep.
    fn on_edges_solved(&mut self) {}

    /// Called after the volume constraint sweep.
    fn on_volumes_solved(&mut self) {}

    /// Called once velocities have been rederived and the substep is done.
    fn on_substep_complete(&mut self) {}

    /// Called by the stepper after the last substep of a frame.
    fn on_frame_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Observer that reports each phase as a `tracing` event at TRACE level.
#[derive(Debug, Default)]
pub struct TracingStepObserver {
    substeps: u64,
    frames: u64,
}

impl TracingStepObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substeps completed so far.
    pub fn substeps(&self) -> u64 {
        self.substeps
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl StepObserver for TracingStepObserver {
    fn on_integrate(&mut self) {
        tracing::trace!(substep = self.substeps, "integrated");
    }

    fn on_edges_solved(&mut self) {
        tracing::trace!(substep = self.substeps, "edge constraints solved");
    }

    fn on_volumes_solved(&mut self) {
        tracing::trace!(substep = self.substeps, "volume constraints solved");
    }

    fn on_substep_complete(&mut self) {
        self.substeps += 1;
    }

    fn on_frame_complete(&mut self) {
        self.frames += 1;
        tracing::trace!(frame = self.frames, substeps = self.substeps, "frame complete");
    }
}
