//! Decomposition of the unit square into a lattice of uniformly sized
//! mesh patches. Each patch owns its primitive data on an extended
//! local mesh with `NUM_GUARD` rings of guard zones per edge, plus the
//! scratch memory for its updates. Guard zones are refreshed from the
//! neighboring patches' interiors once per fold of sub-steps.

use crate::backend::ExecutionMode;
use crate::hydro::{euler2d, Axis};
use crate::update::{Mesh2d, Scratch2d, Updater2d};
use std::collections::BTreeMap;
use std::ops::Range;


pub const NUM_GUARD: i64 = 2;




// ============================================================================
/// The local mesh for the patch at the given lattice index, extended
/// by `NUM_GUARD` zones on each edge. Interior zone `k` of patch `i`
/// is global zone `i * zones_per_patch + k`, with cell center at
/// `-0.5 + (i * zones_per_patch + k + 0.5) * dx` and
/// `dx = 1 / (patches_per_dim * zones_per_patch)`.
pub fn patch_mesh(index: (i64, i64), patches_per_dim: i64, zones_per_patch: i64) -> Mesh2d {
    let ng = NUM_GUARD;
    let dx = 1.0 / (patches_per_dim * zones_per_patch) as f64;
    let n = zones_per_patch + 2 * ng;
    let x0 = -0.5 + (index.0 * zones_per_patch - ng) as f64 * dx;
    let y0 = -0.5 + (index.1 * zones_per_patch - ng) as f64 * dx;

    Mesh2d {
        area: (x0..x0 + n as f64 * dx, y0..y0 + n as f64 * dx),
        size: (n, n),
    }
}

/// The x and y cell center coordinates of the patch at the given
/// index, over its full guard-extended extent.
pub fn cell_center_coordinates(
    index: (i64, i64),
    patches_per_dim: i64,
    zones_per_patch: i64,
) -> (Vec<f64>, Vec<f64>) {
    let mesh = patch_mesh(index, patches_per_dim, zones_per_patch);
    let x = (0..mesh.size.0).map(|i| mesh.cell_center((i, 0)).0).collect();
    let y = (0..mesh.size.1).map(|j| mesh.cell_center((0, j)).1).collect();
    (x, y)
}




// ============================================================================
/// A single mesh patch: its lattice index, its guard-extended local
/// mesh, the primitive field on that mesh, and reusable scratch
/// memory.
pub struct Patch {
    pub index: (i64, i64),
    pub mesh: Mesh2d,
    pub primitive: Vec<f64>,
    pub scratch: Scratch2d,
}

impl Patch {
    pub fn new<F>(
        index: (i64, i64),
        patches_per_dim: i64,
        zones_per_patch: i64,
        model: F,
    ) -> Self
    where
        F: Fn((f64, f64)) -> euler2d::Primitive,
    {
        let mesh = patch_mesh(index, patches_per_dim, zones_per_patch);
        let primitive = mesh.evaluate(model);
        let scratch = Scratch2d::new(mesh.size);

        Self {
            index,
            mesh,
            primitive,
            scratch,
        }
    }

    /// Copy the zones in the given local index ranges into a
    /// contiguous buffer, in row-major order.
    pub fn extract(&self, rows: Range<i64>, cols: Range<i64>) -> Vec<f64> {
        let nq = euler2d::NUM_FIELDS;
        let nj = self.mesh.size.1 as usize;
        let num_zones = (rows.end - rows.start) * (cols.end - cols.start);
        let mut buffer = Vec::with_capacity(num_zones as usize * nq);

        for i in rows {
            for j in cols.clone() {
                let m = (i as usize * nj + j as usize) * nq;
                buffer.extend_from_slice(&self.primitive[m..m + nq]);
            }
        }
        buffer
    }

    /// Overwrite the zones in the given local index ranges from a
    /// contiguous buffer written by `extract`.
    pub fn insert(&mut self, rows: Range<i64>, cols: Range<i64>, data: &[f64]) {
        let nq = euler2d::NUM_FIELDS;
        let nj = self.mesh.size.1 as usize;
        let mut offset = 0;

        for i in rows {
            for j in cols.clone() {
                let m = (i as usize * nj + j as usize) * nq;
                self.primitive[m..m + nq].copy_from_slice(&data[offset..offset + nq]);
                offset += nq;
            }
        }
    }

    /// The primitive data on this patch's interior zones, with the
    /// guard rings stripped.
    pub fn interior(&self) -> Vec<f64> {
        let ng = NUM_GUARD;
        let (ni, nj) = self.mesh.size;
        self.extract(ng..ni - ng, ng..nj - ng)
    }
}




// ============================================================================
/// A lattice of `patches_per_dim` x `patches_per_dim` patches covering
/// the unit square, all advanced with the same updater.
pub struct Lattice {
    pub patches: BTreeMap<(i64, i64), Patch>,
    pub patches_per_dim: i64,
    pub zones_per_patch: i64,
    pub updater: Updater2d,
    pub mode: ExecutionMode,
}

impl Lattice {
    pub fn new<F>(
        patches_per_dim: i64,
        zones_per_patch: i64,
        updater: Updater2d,
        mode: ExecutionMode,
        model: F,
    ) -> Self
    where
        F: Fn((f64, f64)) -> euler2d::Primitive,
    {
        let mut patches = BTreeMap::new();

        for i in 0..patches_per_dim {
            for j in 0..patches_per_dim {
                patches.insert((i, j), Patch::new((i, j), patches_per_dim, zones_per_patch, &model));
            }
        }
        Self {
            patches,
            patches_per_dim,
            zones_per_patch,
            updater,
            mode,
        }
    }

    /// Refresh every patch's guard rings from its neighbors' outermost
    /// interior zones. All bands are extracted before any are applied,
    /// so the exchange sees a consistent snapshot of the lattice. The
    /// bands span the full perpendicular extent of the source patch;
    /// where they overlap on corner guards, the bands along j are
    /// applied last. Corner guards are never read by the dimensionally
    /// split stencil.
    pub fn synchronize_guard_zones(&mut self) {
        let ng = NUM_GUARD;
        let nz = self.zones_per_patch;
        let m = nz + 2 * ng;
        let mut row_bands = Vec::new();
        let mut col_bands = Vec::new();

        for (&(i, j), patch) in &self.patches {
            for (target, src_rows, src_cols, dst_rows, dst_cols, axis) in [
                ((i + 1, j), nz..nz + ng, 0..m, 0..ng, 0..m, Axis::I),
                ((i - 1, j), ng..2 * ng, 0..m, nz + ng..m, 0..m, Axis::I),
                ((i, j + 1), 0..m, nz..nz + ng, 0..m, 0..ng, Axis::J),
                ((i, j - 1), 0..m, ng..2 * ng, 0..m, nz + ng..m, Axis::J),
            ] {
                if self.patches.contains_key(&target) {
                    let message = (target, dst_rows, dst_cols, patch.extract(src_rows, src_cols));
                    match axis {
                        Axis::I => row_bands.push(message),
                        Axis::J => col_bands.push(message),
                    }
                }
            }
        }
        for (target, dst_rows, dst_cols, data) in row_bands.into_iter().chain(col_bands) {
            if let Some(patch) = self.patches.get_mut(&target) {
                patch.insert(dst_rows, dst_cols, &data)
            }
        }
    }

    /// Advance the whole lattice by `fold` sub-steps of size `dt`.
    /// Guard zones are refreshed once at the start of the fold, so
    /// later sub-steps read progressively stale guard data.
    pub fn advance(&mut self, fold: usize, dt: f64) {
        self.synchronize_guard_zones();

        let updater = &self.updater;

        match self.mode {
            ExecutionMode::Serial => {
                for patch in self.patches.values_mut() {
                    for _ in 0..fold {
                        updater.advance(&mut patch.primitive, &mut patch.scratch, &patch.mesh, dt)
                    }
                }
            }
            ExecutionMode::Parallel => {
                let (send, recv) = crossbeam_channel::unbounded();
                let patches = std::mem::take(&mut self.patches);

                rayon::scope(|scope| {
                    for (index, mut patch) in patches {
                        let send = send.clone();
                        scope.spawn(move |_| {
                            for _ in 0..fold {
                                updater.advance(
                                    &mut patch.primitive,
                                    &mut patch.scratch,
                                    &patch.mesh,
                                    dt,
                                )
                            }
                            send.send((index, patch)).unwrap();
                        });
                    }
                });
                drop(send);
                self.patches = recv.into_iter().collect();
            }
        }
    }

    pub fn total_interior_zones(&self) -> i64 {
        self.patches_per_dim * self.patches_per_dim * self.zones_per_patch * self.zones_per_patch
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::reconstruct::Reconstruction;
    use crate::setup::Explosion;

    fn updater() -> Updater2d {
        Updater2d {
            gamma_law_index: 5.0 / 3.0,
            reconstruction: Reconstruction::default(),
            mode: ExecutionMode::Serial,
        }
    }

    fn tilted_model(position: (f64, f64)) -> euler2d::Primitive {
        let (x, y) = position;
        euler2d::Primitive(1.0 + 0.1 * (x + 2.0 * y), 0.02 * x, 0.03 * y, 1.0 + 0.05 * x * y)
    }

    #[test]
    fn patch_meshes_tile_the_unit_square() {
        let mesh = patch_mesh((0, 0), 2, 8);
        assert_eq!(mesh.size, (12, 12));
        assert!((mesh.cell_spacing().0 - 1.0 / 16.0).abs() < 1e-12);

        let (x0, _) = cell_center_coordinates((0, 0), 2, 8);
        let (x1, _) = cell_center_coordinates((1, 0), 2, 8);
        let interior: Vec<_> = x0[2..10].iter().chain(&x1[2..10]).collect();

        for (k, &&x) in interior.iter().enumerate() {
            let expect = -0.5 + (k as f64 + 0.5) / 16.0;
            assert!((x - expect).abs() < 1e-12);
        }
    }

    #[test]
    fn guard_bands_match_neighbor_interiors_after_synchronization() {
        let ng = NUM_GUARD;
        let nz = 8;
        let mut lattice = Lattice::new(3, nz, updater(), ExecutionMode::Serial, tilted_model);
        lattice.synchronize_guard_zones();

        let cols = ng..ng + nz;
        assert_eq!(
            lattice.patches[&(1, 1)].extract(0..ng, cols.clone()),
            lattice.patches[&(0, 1)].extract(nz..nz + ng, cols.clone()),
        );
        assert_eq!(
            lattice.patches[&(1, 1)].extract(nz + ng..nz + 2 * ng, cols.clone()),
            lattice.patches[&(2, 1)].extract(ng..2 * ng, cols.clone()),
        );
        let rows = ng..ng + nz;
        assert_eq!(
            lattice.patches[&(1, 1)].extract(rows.clone(), 0..ng),
            lattice.patches[&(1, 0)].extract(rows.clone(), nz..nz + ng),
        );
        assert_eq!(
            lattice.patches[&(1, 1)].extract(rows.clone(), nz + ng..nz + 2 * ng),
            lattice.patches[&(1, 2)].extract(rows, ng..2 * ng),
        );
    }

    #[test]
    fn single_patch_lattice_matches_direct_advance() {
        let model = Explosion { radius: 0.25 };
        let mut lattice = Lattice::new(1, 16, updater(), ExecutionMode::Serial, |x| {
            model.primitive_at(x)
        });
        let mut patch = Patch::new((0, 0), 1, 16, |x| model.primitive_at(x));
        let direct = updater();

        for _ in 0..2 {
            lattice.advance(3, 1e-3);
        }
        for _ in 0..6 {
            direct.advance(&mut patch.primitive, &mut patch.scratch, &patch.mesh, 1e-3)
        }
        assert_eq!(lattice.patches[&(0, 0)].primitive, patch.primitive);
    }

    #[test]
    fn extract_and_insert_are_inverses() {
        let mut patch = Patch::new((0, 0), 2, 8, tilted_model);
        let band = patch.extract(3..5, 1..11);
        let before = patch.primitive.clone();
        patch.insert(3..5, 1..11, &band);
        assert_eq!(patch.primitive, before);
    }
}
