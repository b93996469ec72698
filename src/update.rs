//! Forward Euler update of primitive fields, first or second order in
//! space. The 1D and 2D updaters share the same cycle: reconstruct
//! face states, solve an HLLE Riemann problem at each interior face,
//! apply the flux divergence to a conserved working copy, and convert
//! back to primitives in place. The 2D update is dimensionally split,
//! with both axis fluxes computed from the same pre-step primitives.

use crate::backend::ExecutionMode;
use crate::hydro::{euler1d, euler2d, Axis};
use crate::reconstruct::{plm_minmod, Reconstruction};
use serde::Serialize;
use std::ops::Range;




// ============================================================================
/// A uniform 1D grid over an interval
///
#[derive(Clone, Serialize)]
pub struct Mesh1d {
    pub interval: Range<f64>,
    pub num_zones: i64,
}

impl Mesh1d {
    pub fn cell_spacing(&self) -> f64 {
        (self.interval.end - self.interval.start) / self.num_zones as f64
    }

    pub fn cell_center(&self, index: i64) -> f64 {
        self.interval.start + self.cell_spacing() * (index as f64 + 0.5)
    }

    pub fn total_zones(&self) -> i64 {
        self.num_zones
    }

    /// Evaluate a primitive model at each cell center, returning a
    /// freshly allocated field.
    pub fn evaluate<F>(&self, model: F) -> Vec<f64>
    where
        F: Fn(f64) -> euler1d::Primitive,
    {
        let nq = euler1d::NUM_FIELDS;
        let mut field = vec![0.0; self.num_zones as usize * nq];

        for i in 0..self.num_zones {
            model(self.cell_center(i)).write_to_slice(&mut field[i as usize * nq..])
        }
        field
    }
}




// ============================================================================
/// A simple rectilinear structured mesh
///
#[derive(Clone, Serialize)]
pub struct Mesh2d {
    pub area: (Range<f64>, Range<f64>),
    pub size: (i64, i64),
}

impl Mesh2d {
    pub fn cell_spacing(&self) -> (f64, f64) {
        let d0 = (self.area.0.end - self.area.0.start) / self.size.0 as f64;
        let d1 = (self.area.1.end - self.area.1.start) / self.size.1 as f64;
        (d0, d1)
    }

    pub fn cell_center(&self, index: (i64, i64)) -> (f64, f64) {
        let (d0, d1) = self.cell_spacing();
        let x0 = self.area.0.start + d0 * (index.0 as f64 + 0.5);
        let x1 = self.area.1.start + d1 * (index.1 as f64 + 0.5);
        (x0, x1)
    }

    pub fn total_zones(&self) -> i64 {
        self.size.0 * self.size.1
    }

    pub fn evaluate<F>(&self, model: F) -> Vec<f64>
    where
        F: Fn((f64, f64)) -> euler2d::Primitive,
    {
        let nq = euler2d::NUM_FIELDS;
        let nj = self.size.1;
        let mut field = vec![0.0; self.total_zones() as usize * nq];

        for i in 0..self.size.0 {
            for j in 0..self.size.1 {
                let n = (i * nj + j) as usize;
                model(self.cell_center((i, j))).write_to_slice(&mut field[n * nq..])
            }
        }
        field
    }
}




// ============================================================================
/// Scratch memory for the 1D update, allocated once per field and
/// reused across sub-steps.
pub struct Scratch1d {
    pub gradient: Vec<f64>,
    pub pm: Vec<f64>,
    pub pp: Vec<f64>,
    pub flux: Vec<f64>,
    pub conserved: Vec<f64>,
}

impl Scratch1d {
    pub fn new(num_zones: i64) -> Self {
        let nq = euler1d::NUM_FIELDS;
        let nz = num_zones as usize;

        Self {
            gradient: vec![0.0; nz * nq],
            pm: vec![0.0; nz * nq],
            pp: vec![0.0; nz * nq],
            flux: vec![0.0; (nz - 1) * nq],
            conserved: vec![0.0; nz * nq],
        }
    }
}




// ============================================================================
/// One forward Euler sub-step over a 1D primitive field. The first and
/// last zones are never written; their gradient entries stay zero from
/// allocation.
pub struct Updater1d {
    pub gamma_law_index: f64,
    pub reconstruction: Reconstruction,
    pub mode: ExecutionMode,
}

impl Updater1d {
    pub fn advance(&self, primitive: &mut [f64], scratch: &mut Scratch1d, mesh: &Mesh1d, dt: f64) {
        use crate::hydro::euler1d::{riemann_hlle, Conserved, Primitive};

        let nq = euler1d::NUM_FIELDS;
        let nz = mesh.num_zones as usize;
        let lam = dt / mesh.cell_spacing();
        let gamma_law_index = self.gamma_law_index;
        let mode = self.mode;

        assert!(primitive.len() == nz * nq);

        let Scratch1d {
            gradient,
            pm,
            pp,
            flux,
            conserved,
        } = scratch;

        match self.reconstruction {
            Reconstruction::PiecewiseLinear { plm_theta } => {
                let p = &primitive[..];
                mode.zone_for_each(gradient, nq, |n, g| {
                    if n == 0 || n == nz - 1 {
                        return;
                    }
                    let m = n * nq;
                    for q in 0..nq {
                        g[q] = plm_minmod(p[m - nq + q], p[m + q], p[m + nq + q], plm_theta);
                    }
                });
                let g = &gradient[..];
                mode.zone_for_each(pm, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] - 0.5 * g[m + q];
                    }
                });
                mode.zone_for_each(pp, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] + 0.5 * g[m + q];
                    }
                });
                let (pm, pp) = (&pm[..], &pp[..]);
                mode.zone_for_each(flux, nq, |n, f| {
                    let pl = Primitive::from_slice(&pp[n * nq..]);
                    let pr = Primitive::from_slice(&pm[(n + 1) * nq..]);
                    riemann_hlle(pl, pr, gamma_law_index).write_to_slice(f)
                });
            }
            Reconstruction::PiecewiseConstant => {
                let p = &primitive[..];
                mode.zone_for_each(flux, nq, |n, f| {
                    let pl = Primitive::from_slice(&p[n * nq..]);
                    let pr = Primitive::from_slice(&p[(n + 1) * nq..]);
                    riemann_hlle(pl, pr, gamma_law_index).write_to_slice(f)
                });
            }
        }

        {
            let p = &primitive[..];
            let f = &flux[..];
            mode.zone_for_each(conserved, nq, |n, u| {
                Primitive::from_slice(&p[n * nq..])
                    .to_conserved(gamma_law_index)
                    .write_to_slice(u);
                if n == 0 || n == nz - 1 {
                    return;
                }
                let m = n * nq;
                for q in 0..nq {
                    u[q] -= (f[m + q] - f[m - nq + q]) * lam;
                }
            });
        }

        let u = &conserved[..];
        mode.zone_for_each(&mut primitive[nq..(nz - 1) * nq], nq, |n, out| {
            Conserved::from_slice(&u[(n + 1) * nq..])
                .to_primitive(gamma_law_index)
                .write_to_slice(out)
        });
    }
}




// ============================================================================
/// Scratch memory for the 2D update. The extrapolation buffers `pm`
/// and `pp` are shared between the two axis sweeps, so the face states
/// of each sweep are copied into the detached `pli`/`pri` and
/// `plj`/`prj` pairs before the other sweep overwrites them.
pub struct Scratch2d {
    pub gx: Vec<f64>,
    pub gy: Vec<f64>,
    pub pm: Vec<f64>,
    pub pp: Vec<f64>,
    pub pli: Vec<f64>,
    pub pri: Vec<f64>,
    pub plj: Vec<f64>,
    pub prj: Vec<f64>,
    pub flux_i: Vec<f64>,
    pub flux_j: Vec<f64>,
    pub conserved: Vec<f64>,
}

impl Scratch2d {
    pub fn new(size: (i64, i64)) -> Self {
        let nq = euler2d::NUM_FIELDS;
        let (ni, nj) = (size.0 as usize, size.1 as usize);

        Self {
            gx: vec![0.0; ni * nj * nq],
            gy: vec![0.0; ni * nj * nq],
            pm: vec![0.0; ni * nj * nq],
            pp: vec![0.0; ni * nj * nq],
            pli: vec![0.0; (ni - 1) * nj * nq],
            pri: vec![0.0; (ni - 1) * nj * nq],
            plj: vec![0.0; ni * (nj - 1) * nq],
            prj: vec![0.0; ni * (nj - 1) * nq],
            flux_i: vec![0.0; (ni - 1) * nj * nq],
            flux_j: vec![0.0; ni * (nj - 1) * nq],
            conserved: vec![0.0; ni * nj * nq],
        }
    }
}




// ============================================================================
/// One dimensionally split forward Euler sub-step over a 2D primitive
/// field. Both axis fluxes are formed from the same pre-step
/// primitives, both flux divergences are applied to one conserved
/// buffer, and a single back-conversion follows. Zones on the outer
/// rim are never written.
pub struct Updater2d {
    pub gamma_law_index: f64,
    pub reconstruction: Reconstruction,
    pub mode: ExecutionMode,
}

impl Updater2d {
    pub fn advance(&self, primitive: &mut [f64], scratch: &mut Scratch2d, mesh: &Mesh2d, dt: f64) {
        use crate::hydro::euler2d::{riemann_hlle, Conserved, Primitive};

        let nq = euler2d::NUM_FIELDS;
        let (ni, nj) = (mesh.size.0 as usize, mesh.size.1 as usize);
        let (dx, dy) = mesh.cell_spacing();
        let (lx, ly) = (dt / dx, dt / dy);
        let gamma_law_index = self.gamma_law_index;
        let mode = self.mode;
        let s = nj * nq;

        assert!(primitive.len() == ni * nj * nq);

        let Scratch2d {
            gx,
            gy,
            pm,
            pp,
            pli,
            pri,
            plj,
            prj,
            flux_i,
            flux_j,
            conserved,
        } = scratch;

        match self.reconstruction {
            Reconstruction::PiecewiseLinear { plm_theta } => {
                let p = &primitive[..];
                mode.zone_for_each(gx, nq, |n, g| {
                    let i = n / nj;
                    if i == 0 || i == ni - 1 {
                        return;
                    }
                    let m = n * nq;
                    for q in 0..nq {
                        g[q] = plm_minmod(p[m - s + q], p[m + q], p[m + s + q], plm_theta);
                    }
                });
                mode.zone_for_each(gy, nq, |n, g| {
                    let j = n % nj;
                    if j == 0 || j == nj - 1 {
                        return;
                    }
                    let m = n * nq;
                    for q in 0..nq {
                        g[q] = plm_minmod(p[m - nq + q], p[m + q], p[m + nq + q], plm_theta);
                    }
                });

                let g = &gx[..];
                mode.zone_for_each(pm, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] - 0.5 * g[m + q];
                    }
                });
                mode.zone_for_each(pp, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] + 0.5 * g[m + q];
                    }
                });
                pli.copy_from_slice(&pp[..(ni - 1) * s]);
                pri.copy_from_slice(&pm[s..]);

                let g = &gy[..];
                mode.zone_for_each(pm, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] - 0.5 * g[m + q];
                    }
                });
                mode.zone_for_each(pp, nq, |n, out| {
                    let m = n * nq;
                    for q in 0..nq {
                        out[q] = p[m + q] + 0.5 * g[m + q];
                    }
                });
                let (pm, pp) = (&pm[..], &pp[..]);
                mode.zone_for_each(plj, nq, |n, out| {
                    let (i, j) = (n / (nj - 1), n % (nj - 1));
                    let m = (i * nj + j) * nq;
                    out.copy_from_slice(&pp[m..m + nq])
                });
                mode.zone_for_each(prj, nq, |n, out| {
                    let (i, j) = (n / (nj - 1), n % (nj - 1));
                    let m = (i * nj + j + 1) * nq;
                    out.copy_from_slice(&pm[m..m + nq])
                });
            }
            Reconstruction::PiecewiseConstant => {
                let p = &primitive[..];
                pli.copy_from_slice(&p[..(ni - 1) * s]);
                pri.copy_from_slice(&p[s..]);
                mode.zone_for_each(plj, nq, |n, out| {
                    let (i, j) = (n / (nj - 1), n % (nj - 1));
                    let m = (i * nj + j) * nq;
                    out.copy_from_slice(&p[m..m + nq])
                });
                mode.zone_for_each(prj, nq, |n, out| {
                    let (i, j) = (n / (nj - 1), n % (nj - 1));
                    let m = (i * nj + j + 1) * nq;
                    out.copy_from_slice(&p[m..m + nq])
                });
            }
        }

        {
            let (pli, pri) = (&pli[..], &pri[..]);
            mode.zone_for_each(flux_i, nq, |n, f| {
                let pl = Primitive::from_slice(&pli[n * nq..]);
                let pr = Primitive::from_slice(&pri[n * nq..]);
                riemann_hlle(pl, pr, Axis::I, gamma_law_index).write_to_slice(f)
            });
            let (plj, prj) = (&plj[..], &prj[..]);
            mode.zone_for_each(flux_j, nq, |n, f| {
                let pl = Primitive::from_slice(&plj[n * nq..]);
                let pr = Primitive::from_slice(&prj[n * nq..]);
                riemann_hlle(pl, pr, Axis::J, gamma_law_index).write_to_slice(f)
            });
        }

        {
            let p = &primitive[..];
            let fi = &flux_i[..];
            let fj = &flux_j[..];
            mode.zone_for_each(conserved, nq, |n, u| {
                Primitive::from_slice(&p[n * nq..])
                    .to_conserved(gamma_law_index)
                    .write_to_slice(u);
                let (i, j) = (n / nj, n % nj);
                if i == 0 || i == ni - 1 || j == 0 || j == nj - 1 {
                    return;
                }
                let a = n * nq;
                let b = (i * (nj - 1) + j) * nq;
                for q in 0..nq {
                    u[q] -= (fi[a + q] - fi[a - s + q]) * lx + (fj[b + q] - fj[b - nq + q]) * ly;
                }
            });
        }

        let u = &conserved[..];
        mode.zone_for_each(primitive, nq, |n, out| {
            let (i, j) = (n / nj, n % nj);
            if i == 0 || i == ni - 1 || j == 0 || j == nj - 1 {
                return;
            }
            Conserved::from_slice(&u[n * nq..])
                .to_primitive(gamma_law_index)
                .write_to_slice(out)
        });
    }
}
