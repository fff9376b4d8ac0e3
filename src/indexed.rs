//! Index-bound views over flat `[x0, y0, z0, x1, ...]` coordinate buffers.
//!
//! The body keeps positions, previous positions and velocities as flat
//! buffers so a renderer can upload them directly. These views give vector
//! arithmetic on one triple of such a buffer without copying the buffer or
//! allocating: value-returning operations produce a fresh [`Vec3`], the
//! `*_set` mutators on [`IndexedVec3Mut`] write through to the buffer.

use crate::float::Float;
use crate::vec::Vec3;

/// Anything that can be read as a 3D vector: a [`Vec3`] or a buffer view.
pub trait AsVec3<F: Float> {
    fn as_vec3(&self) -> Vec3<F>;
}

impl<F: Float> AsVec3<F> for Vec3<F> {
    fn as_vec3(&self) -> Vec3<F> { *self }
}

#[inline]
fn check_bounds(len: usize, index: usize) -> usize {
    let start = 3 * index;
    assert!(
        start + 3 <= len,
        "vector index {} out of range for buffer of {} coordinates",
        index,
        len
    );
    start
}

/// Read-only view of triple `index` in a flat buffer.
#[derive(Copy, Clone, Debug)]
pub struct IndexedVec3<'a, F: Float> {
    buf: &'a [F],
    start: usize,
}

impl<'a, F: Float> IndexedVec3<'a, F> {
    /// Bind a view to triple `index`.
    ///
    /// # Panics
    /// If the triple does not lie entirely inside `buf`.
    pub fn new(buf: &'a [F], index: usize) -> Self {
        let start = check_bounds(buf.len(), index);
        IndexedVec3 { buf, start }
    }

    pub fn index(&self) -> usize { self.start / 3 }
    pub fn x(&self) -> F { self.buf[self.start] }
    pub fn y(&self) -> F { self.buf[self.start + 1] }
    pub fn z(&self) -> F { self.buf[self.start + 2] }

    /// Copy the triple out.
    pub fn get(&self) -> Vec3<F> { Vec3::new(self.x(), self.y(), self.z()) }

    pub fn add(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get() + other.as_vec3() }
    pub fn sub(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get() - other.as_vec3() }
    pub fn mul(&self, s: F) -> Vec3<F> { self.get().scale(s) }
    pub fn dot(&self, other: &impl AsVec3<F>) -> F { self.get().dot(other.as_vec3()) }
    pub fn cross(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get().cross(other.as_vec3()) }
    pub fn len(&self) -> F { self.get().length() }
    pub fn square_len(&self) -> F { self.get().length_sq() }
}

impl<F: Float> AsVec3<F> for IndexedVec3<'_, F> {
    fn as_vec3(&self) -> Vec3<F> { self.get() }
}

/// Write-through view of triple `index` in a flat buffer.
///
/// Holds the buffer's unique borrow, so no other view of the same buffer can
/// observe a half-written triple.
#[derive(Debug)]
pub struct IndexedVec3Mut<'a, F: Float> {
    buf: &'a mut [F],
    start: usize,
}

impl<'a, F: Float> IndexedVec3Mut<'a, F> {
    /// Bind a mutable view to triple `index`.
    ///
    /// # Panics
    /// If the triple does not lie entirely inside `buf`.
    pub fn new(buf: &'a mut [F], index: usize) -> Self {
        let start = check_bounds(buf.len(), index);
        IndexedVec3Mut { buf, start }
    }

    pub fn index(&self) -> usize { self.start / 3 }
    pub fn x(&self) -> F { self.buf[self.start] }
    pub fn y(&self) -> F { self.buf[self.start + 1] }
    pub fn z(&self) -> F { self.buf[self.start + 2] }
    pub fn set_x(&mut self, v: F) { self.buf[self.start] = v; }
    pub fn set_y(&mut self, v: F) { self.buf[self.start + 1] = v; }
    pub fn set_z(&mut self, v: F) { self.buf[self.start + 2] = v; }

    pub fn get(&self) -> Vec3<F> { Vec3::new(self.x(), self.y(), self.z()) }

    pub fn add(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get() + other.as_vec3() }
    pub fn sub(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get() - other.as_vec3() }
    pub fn mul(&self, s: F) -> Vec3<F> { self.get().scale(s) }
    pub fn dot(&self, other: &impl AsVec3<F>) -> F { self.get().dot(other.as_vec3()) }
    pub fn cross(&self, other: &impl AsVec3<F>) -> Vec3<F> { self.get().cross(other.as_vec3()) }
    pub fn len(&self) -> F { self.get().length() }
    pub fn square_len(&self) -> F { self.get().length_sq() }

    /// Copy all three components of `other` into the buffer.
    pub fn set(&mut self, other: &impl AsVec3<F>) {
        let v = other.as_vec3();
        self.buf[self.start] = v.x;
        self.buf[self.start + 1] = v.y;
        self.buf[self.start + 2] = v.z;
    }

    pub fn add_set(&mut self, other: &impl AsVec3<F>) {
        let v = other.as_vec3();
        self.buf[self.start] += v.x;
        self.buf[self.start + 1] += v.y;
        self.buf[self.start + 2] += v.z;
    }

    pub fn sub_set(&mut self, other: &impl AsVec3<F>) {
        let v = other.as_vec3();
        self.buf[self.start] -= v.x;
        self.buf[self.start + 1] -= v.y;
        self.buf[self.start + 2] -= v.z;
    }

    pub fn mul_set(&mut self, s: F) {
        self.buf[self.start] *= s;
        self.buf[self.start + 1] *= s;
        self.buf[self.start + 2] *= s;
    }
}

impl<F: Float> AsVec3<F> for IndexedVec3Mut<'_, F> {
    fn as_vec3(&self) -> Vec3<F> { self.get() }
}
