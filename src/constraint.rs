//! XPBD constraint projection: edge lengths and tetrahedron volumes.
//!
//! Both solvers make a single Gauss-Seidel sweep over their constraints in
//! input order, writing corrections straight into the position buffer so
//! later constraints see earlier ones. Accuracy comes from substepping, and
//! the compliance values are tuned for one sweep per substep.

use crate::float::Float;
use crate::indexed::{IndexedVec3, IndexedVec3Mut};
use crate::vec::Vec3;

/// For each vertex of a tetrahedron, the opposite face in local indices.
///
/// `(p[b] - p[a]) x (p[c] - p[a])` over face `[a, b, c]` points toward the
/// vertex the face is opposite to, so one sixth of it is that vertex's
/// volume gradient.
pub const TET_FACES: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

/// Signed volume of the tetrahedron `tet` (four vertex ids) over `pos`.
pub fn tet_volume<F: Float>(pos: &[F], tet: &[usize]) -> F {
    let a = IndexedVec3::new(pos, tet[0]);
    let ab = IndexedVec3::new(pos, tet[1]).sub(&a);
    let ac = IndexedVec3::new(pos, tet[2]).sub(&a);
    let ad = IndexedVec3::new(pos, tet[3]).sub(&a);
    ab.cross(ac).dot(ad) / F::from_f32(6.0)
}

/// Distance between vertices `a` and `b`.
pub fn edge_length<F: Float>(pos: &[F], a: usize, b: usize) -> F {
    IndexedVec3::new(pos, b).sub(&IndexedVec3::new(pos, a)).length()
}

/// One sweep of soft distance constraints.
///
/// `edge_ids` holds flat pairs, `rest_lengths` one target per pair.
pub fn solve_edges<F: Float>(
    pos: &mut [F],
    inv_mass: &[F],
    edge_ids: &[usize],
    rest_lengths: &[F],
    compliance: F,
    dt: F,
) {
    let alpha = compliance / (dt * dt);

    for (edge, &rest) in edge_ids.chunks_exact(2).zip(rest_lengths) {
        let (l, r) = (edge[0], edge[1]);
        let w_l = inv_mass[l];
        let w_r = inv_mass[r];
        let w = w_l + w_r;
        if w == F::zero() {
            continue;
        }

        let grad = IndexedVec3::new(pos, l).sub(&IndexedVec3::new(pos, r));
        let len = grad.length();
        if len == F::zero() {
            continue;
        }

        let error = len - rest;
        let lambda = -error / (w + alpha);
        let grad_l = grad.scale(F::one() / len);

        IndexedVec3Mut::new(pos, l).add_set(&grad_l.scale(lambda * w_l));
        IndexedVec3Mut::new(pos, r).sub_set(&grad_l.scale(lambda * w_r));
    }
}

/// One sweep of volume constraints.
///
/// Tetrahedra with a non-positive rest volume carry no mass and are left
/// out, as are tetrahedra whose four vertices are all immovable.
pub fn solve_volumes<F: Float>(
    pos: &mut [F],
    inv_mass: &[F],
    tet_ids: &[usize],
    rest_volumes: &[F],
    compliance: F,
    dt: F,
) {
    let alpha = compliance / (dt * dt);
    let sixth = F::one() / F::from_f32(6.0);

    for (tet, &rest) in tet_ids.chunks_exact(4).zip(rest_volumes) {
        if rest <= F::zero() {
            continue;
        }

        let mut grads = [Vec3::zero(); 4];
        let mut denominator = F::zero();
        for (j, [a, b, c]) in TET_FACES.into_iter().enumerate() {
            let pa = IndexedVec3::new(pos, tet[a]);
            let ab = IndexedVec3::new(pos, tet[b]).sub(&pa);
            let ac = IndexedVec3::new(pos, tet[c]).sub(&pa);
            grads[j] = ab.cross(ac).scale(sixth);
            denominator += inv_mass[tet[j]] * grads[j].length_sq();
        }
        if denominator == F::zero() {
            continue;
        }
        denominator += alpha;

        let error = tet_volume(pos, tet) - rest;
        let lambda = -error / denominator;

        for (j, grad) in grads.iter().enumerate() {
            let id = tet[j];
            IndexedVec3Mut::new(pos, id).add_set(&grad.scale(lambda * inv_mass[id]));
        }
    }
}
