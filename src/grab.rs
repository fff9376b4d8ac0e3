//! Pointer-driven grabbing and dragging of a single particle.
//!
//! Picking is done outside the crate: the caller raycasts the rendered
//! surface and hands over the world-space ray and the hit distance along
//! it. The controller pins the particle nearest to the hit point by zeroing
//! its inverse mass, which takes it out of the solver, then moves it
//! kinematically along the ray at the same distance until release.

use crate::float::Float;
use crate::softbody::SoftBody;
use crate::vec::Vec3;

/// Mouse/pointer button, numbered like DOM `MouseEvent.button`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(u16),
}

impl PointerButton {
    pub fn from_index(button: u16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            n => PointerButton::Other(n),
        }
    }
}

/// World-space pick ray. `direction` is expected to be unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<F: Float> {
    pub origin: Vec3<F>,
    pub direction: Vec3<F>,
}

impl<F: Float> Ray<F> {
    pub fn new(origin: Vec3<F>, direction: Vec3<F>) -> Self {
        Ray { origin, direction }
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: F) -> Vec3<F> {
        self.origin.add_scaled(self.direction, t)
    }
}

/// Whatever navigates the camera with the same pointer (an orbit control).
/// It is switched off while a particle is held.
pub trait CameraControl {
    fn set_enabled(&mut self, enabled: bool);
}

/// Headless use: there is no camera to toggle.
impl CameraControl for () {
    fn set_enabled(&mut self, _enabled: bool) {}
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrabState<F: Float> {
    Idle,
    Dragging {
        particle: usize,
        saved_inv_mass: F,
        /// Distance along the pick ray at which the hit was recorded.
        distance: F,
    },
}

/// Idle/Dragging state machine between pointer events and a [`SoftBody`].
///
/// Call it between frames only; the pinned particle must not change while
/// the stepper is mid-frame.
#[derive(Debug)]
pub struct GrabController<F: Float> {
    state: GrabState<F>,
}

impl<F: Float> Default for GrabController<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> GrabController<F> {
    pub fn new() -> Self {
        GrabController { state: GrabState::Idle }
    }

    pub fn state(&self) -> GrabState<F> {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GrabState::Dragging { .. })
    }

    pub fn grabbed_particle(&self) -> Option<usize> {
        match self.state {
            GrabState::Dragging { particle, .. } => Some(particle),
            GrabState::Idle => None,
        }
    }

    /// Start a drag. `hit_distance` is where `ray` met the body's surface,
    /// or `None` on a miss. A negative or non-finite distance counts as a miss.
    ///
    /// Returns the grabbed particle. Nothing happens for non-primary buttons,
    /// misses, while already dragging, or when the nearest particle is
    /// already immovable (a fixed point stays fixed).
    pub fn pointer_down<C: CameraControl>(
        &mut self,
        button: PointerButton,
        ray: &Ray<F>,
        hit_distance: Option<F>,
        body: &mut SoftBody<F>,
        camera: &mut C,
    ) -> Option<usize> {
        if button != PointerButton::Primary || self.is_dragging() {
            return None;
        }
        let distance = hit_distance.filter(|d| d.is_finite() && *d >= F::zero())?;
        let particle = body.nearest_particle(ray.point_at(distance))?;

        if body.inv_mass(particle) == F::zero() {
            tracing::debug!(particle, "nearest particle is fixed, not grabbing");
            return None;
        }

        let saved_inv_mass = body.pin(particle);
        self.state = GrabState::Dragging { particle, saved_inv_mass, distance };
        camera.set_enabled(false);
        tracing::debug!(particle, distance = distance.to_f64(), "particle grabbed");
        Some(particle)
    }

    /// Move the held particle to the point at the recorded distance along `ray`.
    pub fn pointer_move(&mut self, ray: &Ray<F>, body: &mut SoftBody<F>) {
        if let GrabState::Dragging { particle, distance, .. } = self.state {
            body.set_position(particle, ray.point_at(distance));
        }
    }

    /// End the drag, giving the particle its inverse mass back. It rejoins
    /// the simulation with the velocity it had when it was grabbed.
    pub fn pointer_up<C: CameraControl>(
        &mut self,
        button: PointerButton,
        body: &mut SoftBody<F>,
        camera: &mut C,
    ) {
        if button != PointerButton::Primary {
            return;
        }
        if let GrabState::Dragging { particle, saved_inv_mass, .. } = self.state {
            body.unpin(particle, saved_inv_mass);
            camera.set_enabled(true);
            self.state = GrabState::Idle;
            tracing::debug!(particle, "particle released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_button_numbering() {
        assert_eq!(PointerButton::from_index(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_index(1), PointerButton::Auxiliary);
        assert_eq!(PointerButton::from_index(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_index(4), PointerButton::Other(4));
    }

    #[test]
    fn ray_point() {
        let ray = Ray::new(Vec3::new(0.0f32, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray.point_at(2.0), Vec3::new(0.0, 1.0, 3.0));
    }

    #[test]
    fn starts_idle() {
        let grab: GrabController<f32> = GrabController::new();
        assert_eq!(grab.state(), GrabState::Idle);
        assert_eq!(grab.grabbed_particle(), None);
    }
}
