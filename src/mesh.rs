//! Tetrahedral mesh descriptors: the static input a [`SoftBody`] is built from.
//!
//! All buffers are flat and share one vertex list:
//! `verts` holds xyz triples, `tet_ids` quadruples, `tet_edge_ids` pairs and
//! `tet_surface_tri_ids` triples. The surface triangles are carried along for
//! the renderer only; the solver never reads them.
//!
//! [`SoftBody`]: crate::softbody::SoftBody

use crate::constraint::{tet_volume, TET_FACES};
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::vec::Vec3;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec as AllocVec;

/// The six vertex pairs of a tetrahedron, in local indices.
const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Static tetrahedral mesh.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TetMesh<F: Float> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub verts: AllocVec<F>,
    pub tet_ids: AllocVec<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tet_edge_ids: AllocVec<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tet_surface_tri_ids: AllocVec<usize>,
}

impl<F: Float> TetMesh<F> {
    /// Assemble a mesh from precomputed buffers. Nothing is checked until
    /// [`validate`](Self::validate).
    pub fn new(
        verts: AllocVec<F>,
        tet_ids: AllocVec<usize>,
        tet_edge_ids: AllocVec<usize>,
        tet_surface_tri_ids: AllocVec<usize>,
    ) -> Self {
        TetMesh { name: String::new(), verts, tet_ids, tet_edge_ids, tet_surface_tri_ids }
    }

    /// Build a mesh from vertices and tetrahedra only, deriving the edge list
    /// and the boundary surface.
    pub fn from_tets(verts: AllocVec<F>, tet_ids: AllocVec<usize>) -> Self {
        let tet_edge_ids = derive_edges(&tet_ids);
        let tet_surface_tri_ids = derive_surface(&tet_ids);
        TetMesh::new(verts, tet_ids, tet_edge_ids, tet_surface_tri_ids)
    }

    /// A single tetrahedron. Order the corners so that
    /// `(b - a) x (c - a) . (d - a) > 0`, otherwise it gets no mass.
    pub fn tetrahedron(a: Vec3<F>, b: Vec3<F>, c: Vec3<F>, d: Vec3<F>) -> Self {
        let mut verts = AllocVec::with_capacity(12);
        for p in [a, b, c, d] {
            verts.extend_from_slice(&[p.x, p.y, p.z]);
        }
        let mut mesh = TetMesh::from_tets(verts, alloc::vec![0, 1, 2, 3]);
        mesh.name = String::from("tetrahedron");
        mesh
    }

    /// An axis-aligned box of `nx * ny * nz` cubic cells of edge `spacing`,
    /// with its minimum corner at `origin`.
    ///
    /// Each cell is split into five tetrahedra; the split alternates with
    /// cell parity so shared faces line up. All tetrahedra have positive volume.
    pub fn cuboid(origin: Vec3<F>, nx: usize, ny: usize, nz: usize, spacing: F) -> Self {
        let vid = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;

        let mut verts = AllocVec::with_capacity(3 * (nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    verts.push(origin.x + F::from_usize(i) * spacing);
                    verts.push(origin.y + F::from_usize(j) * spacing);
                    verts.push(origin.z + F::from_usize(k) * spacing);
                }
            }
        }

        let mut tet_ids = AllocVec::with_capacity(20 * nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let p000 = vid(i, j, k);
                    let p100 = vid(i + 1, j, k);
                    let p010 = vid(i, j + 1, k);
                    let p110 = vid(i + 1, j + 1, k);
                    let p001 = vid(i, j, k + 1);
                    let p101 = vid(i + 1, j, k + 1);
                    let p011 = vid(i, j + 1, k + 1);
                    let p111 = vid(i + 1, j + 1, k + 1);

                    let cell = if (i + j + k) % 2 == 0 {
                        [
                            [p000, p100, p010, p001],
                            [p110, p100, p010, p111],
                            [p101, p100, p001, p111],
                            [p011, p010, p001, p111],
                            [p100, p010, p001, p111],
                        ]
                    } else {
                        [
                            [p100, p000, p110, p101],
                            [p010, p000, p110, p011],
                            [p001, p000, p101, p011],
                            [p111, p110, p101, p011],
                            [p000, p110, p101, p011],
                        ]
                    };

                    for mut tet in cell {
                        if tet_volume(&verts, &tet) < F::zero() {
                            tet.swap(2, 3);
                        }
                        tet_ids.extend_from_slice(&tet);
                    }
                }
            }
        }

        let mut mesh = TetMesh::from_tets(verts, tet_ids);
        mesh.name = String::from("cuboid");
        mesh
    }

    /// Set a display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = String::from(name);
        self
    }

    /// Fill in an empty edge list or surface from the tetrahedra.
    pub fn derive_missing(mut self) -> Self {
        if self.tet_edge_ids.is_empty() {
            self.tet_edge_ids = derive_edges(&self.tet_ids);
        }
        if self.tet_surface_tri_ids.is_empty() {
            self.tet_surface_tri_ids = derive_surface(&self.tet_ids);
        }
        self
    }

    /// Shift every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3<F>) {
        for p in self.verts.chunks_exact_mut(3) {
            p[0] += offset.x;
            p[1] += offset.y;
            p[2] += offset.z;
        }
    }

    pub fn vertex_count(&self) -> usize { self.verts.len() / 3 }
    pub fn tet_count(&self) -> usize { self.tet_ids.len() / 4 }
    pub fn edge_count(&self) -> usize { self.tet_edge_ids.len() / 2 }
    pub fn surface_triangle_count(&self) -> usize { self.tet_surface_tri_ids.len() / 3 }

    /// Check buffer strides, index ranges and coordinate finiteness.
    pub fn validate(&self) -> PhysicsResult<()> {
        check_stride("verts", self.verts.len(), 3)?;
        check_stride("tet_ids", self.tet_ids.len(), 4)?;
        check_stride("tet_edge_ids", self.tet_edge_ids.len(), 2)?;
        check_stride("tet_surface_tri_ids", self.tet_surface_tri_ids.len(), 3)?;

        let count = self.vertex_count();
        check_indices("tet_ids", &self.tet_ids, count)?;
        check_indices("tet_edge_ids", &self.tet_edge_ids, count)?;
        check_indices("tet_surface_tri_ids", &self.tet_surface_tri_ids, count)?;

        if let Some(vertex) = self.verts.iter().position(|c| !c.is_finite()) {
            return Err(PhysicsError::NonFiniteCoordinate { vertex: vertex / 3 });
        }
        Ok(())
    }
}

fn check_stride(buffer: &'static str, len: usize, stride: usize) -> PhysicsResult<()> {
    if len % stride != 0 {
        return Err(PhysicsError::InvalidMeshLayout { buffer, len, stride });
    }
    Ok(())
}

fn check_indices(buffer: &'static str, ids: &[usize], count: usize) -> PhysicsResult<()> {
    match ids.iter().position(|&i| i >= count) {
        Some(position) => Err(PhysicsError::IndexOutOfBounds {
            buffer,
            position,
            index: ids[position],
            count,
        }),
        None => Ok(()),
    }
}

/// Unique edges of a tetrahedron list as flat pairs, in first-seen order.
pub fn derive_edges(tet_ids: &[usize]) -> AllocVec<usize> {
    let mut seen = BTreeSet::new();
    let mut edges = AllocVec::new();
    for tet in tet_ids.chunks_exact(4) {
        for [a, b] in TET_EDGES {
            let (l, r) = (tet[a], tet[b]);
            if seen.insert((l.min(r), l.max(r))) {
                edges.push(l);
                edges.push(r);
            }
        }
    }
    edges
}

/// Boundary triangles (faces owned by exactly one tetrahedron) as flat
/// triples, wound to face outward for positively oriented tetrahedra.
pub fn derive_surface(tet_ids: &[usize]) -> AllocVec<usize> {
    let mut counts: BTreeMap<[usize; 3], usize> = BTreeMap::new();
    let mut faces = AllocVec::new();
    for tet in tet_ids.chunks_exact(4) {
        for [a, b, c] in TET_FACES {
            // TET_FACES wind toward the opposite vertex; flip for the outside.
            let tri = [tet[a], tet[c], tet[b]];
            let mut key = tri;
            key.sort_unstable();
            let n = counts.entry(key).or_insert(0);
            if *n == 0 {
                faces.push((key, tri));
            }
            *n += 1;
        }
    }
    faces
        .into_iter()
        .filter(|(key, _)| counts.get(key) == Some(&1))
        .flat_map(|(_, tri)| tri)
        .collect()
}
