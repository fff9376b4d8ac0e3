use jelly::{
    CameraControl, GrabController, NoOpStepObserver, PointerButton, Ray, SoftBody, SolverConfig,
    Stepper, TetMesh, Vec3,
};
use wasm_bindgen::prelude::*;

const BUNNY: &str = include_str!("../assets/bunny.json");

/// Mirrors whether the page's orbit control may respond to the pointer.
struct OrbitSwitch {
    enabled: bool,
}

impl CameraControl for OrbitSwitch {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

// ---- Jelly Bunny Demo ----

#[wasm_bindgen]
pub struct JellyDemo {
    body: SoftBody<f32>,
    stepper: Stepper<f32>,
    grab: GrabController<f32>,
    orbit: OrbitSwitch,
}

#[wasm_bindgen]
impl JellyDemo {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<JellyDemo, JsError> {
        let mesh: TetMesh<f32> = serde_json::from_str(BUNNY)?;
        let body = SoftBody::new(mesh.derive_missing())?;
        let stepper = Stepper::new(SolverConfig::new())?;
        Ok(JellyDemo {
            body,
            stepper,
            grab: GrabController::new(),
            orbit: OrbitSwitch { enabled: true },
        })
    }

    /// Advance one 1/60 s frame.
    pub fn update(&mut self) {
        self.stepper.frame(&mut self.body, &mut NoOpStepObserver);
    }

    /// Returns flat [x0, y0, z0, x1, ...] positions
    pub fn positions(&self) -> Vec<f32> {
        self.body.positions().to_vec()
    }

    /// Surface triangle indices for the render mesh.
    pub fn surface_indices(&self) -> Vec<u32> {
        self.body.surface_triangles().iter().map(|&i| i as u32).collect()
    }

    /// `hit_distance` is the raycast distance to the surface, or NaN on a miss.
    /// Returns the grabbed particle, or -1.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        button: u16,
        ox: f32,
        oy: f32,
        oz: f32,
        dx: f32,
        dy: f32,
        dz: f32,
        hit_distance: f32,
    ) -> i32 {
        let ray = Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        let hit = Some(hit_distance).filter(|d| d.is_finite());
        let button = PointerButton::from_index(button);
        self.grab
            .pointer_down(button, &ray, hit, &mut self.body, &mut self.orbit)
            .map_or(-1, |i| i as i32)
    }

    pub fn pointer_move(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) {
        let ray = Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        self.grab.pointer_move(&ray, &mut self.body);
    }

    pub fn pointer_up(&mut self, button: u16) {
        self.grab
            .pointer_up(PointerButton::from_index(button), &mut self.body, &mut self.orbit);
    }

    /// Whether orbit navigation should follow the pointer right now.
    pub fn camera_enabled(&self) -> bool {
        self.orbit.enabled
    }

    pub fn particle_count(&self) -> usize {
        self.body.particle_count()
    }

    pub fn frames(&self) -> u64 {
        self.stepper.frames()
    }
}
