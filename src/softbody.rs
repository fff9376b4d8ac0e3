//! 3D tetrahedral soft body advanced with XPBD.

use crate::config::SolverConfig;
use crate::constraint::{edge_length, solve_edges, solve_volumes, tet_volume};
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::indexed::{IndexedVec3, IndexedVec3Mut};
use crate::mesh::TetMesh;
use crate::observer::StepObserver;
use crate::vec::Vec3;
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// A deformable, volume-preserving body made of tetrahedra.
///
/// Per-particle state lives in flat `[x, y, z, ...]` buffers. The position
/// buffer doubles as the vertex buffer a renderer draws from.
///
/// A particle with zero inverse mass is immovable: integration skips it and
/// every constraint leaves it where it is. Structural fixed points and the
/// particle under a grab both use this.
pub struct SoftBody<F: Float> {
    pos: AllocVec<F>,
    prev_pos: AllocVec<F>,
    vel: AllocVec<F>,
    inv_mass: AllocVec<F>,

    tet_ids: AllocVec<usize>,
    edge_ids: AllocVec<usize>,
    surface_tri_ids: AllocVec<usize>,

    rest_vol: AllocVec<F>,
    edge_lengths: AllocVec<F>,
    degenerate_tets: usize,
}

impl<F: Float> SoftBody<F> {
    /// Build a body from `mesh`, taking its current pose as the rest state.
    ///
    /// Fails if the mesh buffers are malformed or reference missing vertices.
    pub fn new(mesh: TetMesh<F>) -> PhysicsResult<Self> {
        mesh.validate()?;

        let n = mesh.vertex_count();
        let num_tets = mesh.tet_count();
        let num_edges = mesh.edge_count();

        let mut body = SoftBody {
            prev_pos: mesh.verts.clone(),
            pos: mesh.verts,
            vel: vec![F::zero(); 3 * n],
            inv_mass: vec![F::zero(); n],
            tet_ids: mesh.tet_ids,
            edge_ids: mesh.tet_edge_ids,
            surface_tri_ids: mesh.tet_surface_tri_ids,
            rest_vol: vec![F::zero(); num_tets],
            edge_lengths: vec![F::zero(); num_edges],
            degenerate_tets: 0,
        };
        body.init_physics();

        tracing::debug!(
            name = %mesh.name,
            particles = n,
            tets = num_tets,
            edges = num_edges,
            rest_volume = body.rest_volume().to_f64(),
            "soft body created"
        );
        if body.degenerate_tets > 0 {
            tracing::warn!(
                count = body.degenerate_tets,
                "tetrahedra with non-positive volume excluded from the mass model"
            );
        }
        Ok(body)
    }

    /// Derive rest volumes, inverse masses and rest lengths from the current
    /// pose. Runs once, from `new`.
    fn init_physics(&mut self) {
        self.inv_mass.fill(F::zero());
        self.rest_vol.fill(F::zero());
        self.degenerate_tets = 0;

        let four = F::from_f32(4.0);
        for (t, tet) in self.tet_ids.chunks_exact(4).enumerate() {
            let vol = tet_volume(&self.pos, tet);
            self.rest_vol[t] = vol;
            let p_inv_mass = if vol > F::zero() {
                four / vol
            } else {
                self.degenerate_tets += 1;
                F::zero()
            };
            for &id in tet {
                self.inv_mass[id] += p_inv_mass;
            }
        }

        for (e, edge) in self.edge_ids.chunks_exact(2).enumerate() {
            self.edge_lengths[e] = edge_length(&self.pos, edge[0], edge[1]);
        }
    }

    /// Advance the body by one substep of duration `dt`.
    ///
    /// Integrates gravity with ground collision, makes one sweep of edge
    /// constraints and one of volume constraints, then rederives velocities
    /// from the net displacement.
    ///
    /// A `dt` that is not positive and finite leaves the body untouched;
    /// [`Stepper::advance`](crate::stepper::Stepper::advance) reports it as an error.
    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SolverConfig<F>, observer: &mut O) {
        if !(dt.is_finite() && dt > F::zero()) {
            tracing::warn!(
                dt = dt.to_f64(),
                "substep skipped, duration must be positive and finite"
            );
            return;
        }

        self.integrate(dt, config.gravity, config.ground_height);
        observer.on_integrate();

        solve_edges(
            &mut self.pos,
            &self.inv_mass,
            &self.edge_ids,
            &self.edge_lengths,
            config.edge_compliance,
            dt,
        );
        observer.on_edges_solved();

        solve_volumes(
            &mut self.pos,
            &self.inv_mass,
            &self.tet_ids,
            &self.rest_vol,
            config.volume_compliance,
            dt,
        );
        observer.on_volumes_solved();

        self.update_velocities(dt);
        observer.on_substep_complete();
    }

    fn integrate(&mut self, dt: F, gravity: Vec3<F>, ground: F) {
        for i in 0..self.particle_count() {
            if self.inv_mass[i] == F::zero() {
                continue;
            }
            let mut vel = IndexedVec3Mut::new(&mut self.vel, i);
            vel.add_set(&gravity.scale(dt));
            let step = vel.mul(dt);

            let mut prev = IndexedVec3Mut::new(&mut self.prev_pos, i);
            prev.set(&IndexedVec3::new(&self.pos, i));
            let prev = prev.get();

            let mut pos = IndexedVec3Mut::new(&mut self.pos, i);
            pos.add_set(&step);
            if pos.y() < ground {
                pos.set(&prev);
                pos.set_y(ground);
            }
        }
    }

    fn update_velocities(&mut self, dt: F) {
        let inv_dt = F::one() / dt;
        for i in 0..self.particle_count() {
            if self.inv_mass[i] == F::zero() {
                continue;
            }
            let diff = IndexedVec3::new(&self.pos, i).sub(&IndexedVec3::new(&self.prev_pos, i));
            IndexedVec3Mut::new(&mut self.vel, i).set(&diff.scale(inv_dt));
        }
    }

    /// Index of the particle closest to `point`; the lowest index wins ties.
    /// `None` only for a body without particles.
    pub fn nearest_particle(&self, point: Vec3<F>) -> Option<usize> {
        let mut nearest = None;
        let mut nearest_dist_sq = F::zero();
        for i in 0..self.particle_count() {
            let d = IndexedVec3::new(&self.pos, i).sub(&point).length_sq();
            if nearest.is_none() || d < nearest_dist_sq {
                nearest = Some(i);
                nearest_dist_sq = d;
            }
        }
        nearest
    }

    /// Make particle `i` immovable, returning its previous inverse mass.
    ///
    /// # Panics
    /// If `i` is not a particle index.
    pub fn pin(&mut self, i: usize) -> F {
        core::mem::replace(&mut self.inv_mass[i], F::zero())
    }

    /// Give particle `i` back an inverse mass saved by [`pin`](Self::pin).
    ///
    /// # Panics
    /// If `i` is not a particle index.
    pub fn unpin(&mut self, i: usize, inv_mass: F) {
        self.inv_mass[i] = inv_mass;
    }

    /// Permanently fix particle `i` in place.
    pub fn fix_particle(&mut self, i: usize) -> PhysicsResult<()> {
        self.set_inv_mass(i, F::zero())
    }

    /// Override the inverse mass derived from the rest geometry.
    pub fn set_inv_mass(&mut self, i: usize, inv_mass: F) -> PhysicsResult<()> {
        self.check_particle(i)?;
        if !(inv_mass.is_finite() && inv_mass >= F::zero()) {
            return Err(PhysicsError::InvalidMass);
        }
        self.inv_mass[i] = inv_mass;
        Ok(())
    }

    /// Overwrite the position of particle `i`, bypassing integration.
    ///
    /// # Panics
    /// If `i` is not a particle index.
    pub fn set_position(&mut self, i: usize, p: Vec3<F>) {
        IndexedVec3Mut::new(&mut self.pos, i).set(&p);
    }

    fn check_particle(&self, i: usize) -> PhysicsResult<()> {
        let count = self.particle_count();
        if i >= count {
            return Err(PhysicsError::ParticleOutOfBounds { index: i, count });
        }
        Ok(())
    }

    /// Signed volume of tetrahedron `t` in the current pose.
    pub fn tet_volume(&self, t: usize) -> F {
        tet_volume(&self.pos, &self.tet_ids[4 * t..4 * t + 4])
    }

    /// Sum of the current signed tetrahedron volumes.
    pub fn volume(&self) -> F {
        self.tet_ids
            .chunks_exact(4)
            .fold(F::zero(), |acc, tet| acc + tet_volume(&self.pos, tet))
    }

    /// Sum of the rest volumes.
    pub fn rest_volume(&self) -> F {
        self.rest_vol.iter().fold(F::zero(), |acc, &v| acc + v)
    }

    pub fn position(&self, i: usize) -> Vec3<F> { Vec3::from_slice(&self.pos, i) }
    pub fn velocity(&self, i: usize) -> Vec3<F> { Vec3::from_slice(&self.vel, i) }
    pub fn inv_mass(&self, i: usize) -> F { self.inv_mass[i] }

    /// Flat position buffer, `3 * particle_count()` long.
    pub fn positions(&self) -> &[F] { &self.pos }

    /// Mutable position buffer, for callers that move particles directly.
    pub fn positions_mut(&mut self) -> &mut [F] { &mut self.pos }

    pub fn prev_positions(&self) -> &[F] { &self.prev_pos }
    pub fn velocities(&self) -> &[F] { &self.vel }
    pub fn inv_masses(&self) -> &[F] { &self.inv_mass }
    pub fn rest_volumes(&self) -> &[F] { &self.rest_vol }
    pub fn rest_edge_lengths(&self) -> &[F] { &self.edge_lengths }
    pub fn tet_ids(&self) -> &[usize] { &self.tet_ids }
    pub fn edge_ids(&self) -> &[usize] { &self.edge_ids }

    /// Boundary triangles for rendering, as flat vertex-index triples.
    pub fn surface_triangles(&self) -> &[usize] { &self.surface_tri_ids }

    pub fn particle_count(&self) -> usize { self.inv_mass.len() }
    pub fn tet_count(&self) -> usize { self.rest_vol.len() }
    pub fn edge_count(&self) -> usize { self.edge_lengths.len() }

    /// Tetrahedra left out of the mass model for having non-positive volume.
    pub fn degenerate_tet_count(&self) -> usize { self.degenerate_tets }
}
