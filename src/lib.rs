//! Tetrahedral soft bodies simulated with Extended Position-Based Dynamics.
//!
//! `jelly` advances a deformable, volume-preserving body built from a
//! tetrahedral mesh. Each substep integrates gravity, resolves collisions
//! with a ground plane, projects soft edge constraints and incompressible
//! volume constraints, then derives velocities from the positional change.
//!
//! # Features
//!
//! - **XPBD solver**: compliant edge constraints, rigid volume constraints
//! - **Mass from geometry**: per-vertex inverse mass from tetrahedron volumes
//! - **Substepping**: `Stepper` splits each frame into equal substeps
//! - **Grabbing**: `GrabController` pins and drags a particle under the pointer
//! - **Render friendly**: flat position buffer, surface triangles carried along
//! - **Observable**: monitor solver phases via the `StepObserver` trait
//! - **`no_std` compatible**: works in embedded and WASM environments
//!
//! ```
//! use jelly::{NoOpStepObserver, SoftBody, SolverConfig, Stepper, TetMesh, Vec3};
//!
//! let mesh = TetMesh::cuboid(Vec3::new(0.0f32, 0.5, 0.0), 2, 2, 2, 0.25);
//! let mut body = SoftBody::new(mesh).unwrap();
//! let mut stepper = Stepper::new(SolverConfig::new()).unwrap();
//! for _ in 0..60 {
//!     stepper.frame(&mut body, &mut NoOpStepObserver);
//! }
//! assert!(body.positions().iter().all(|c| c.is_finite()));
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod indexed;
pub mod mesh;
pub mod constraint;
pub mod softbody;
pub mod stepper;
pub mod grab;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use indexed::{AsVec3, IndexedVec3, IndexedVec3Mut};
pub use mesh::TetMesh;
pub use softbody::SoftBody;
pub use stepper::Stepper;
pub use grab::{CameraControl, GrabController, GrabState, PointerButton, Ray};
pub use config::SolverConfig;
pub use observer::{NoOpStepObserver, StepObserver, TracingStepObserver};
pub use error::{PhysicsError, PhysicsResult};
