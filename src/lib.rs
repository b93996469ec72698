//! A patch-based finite-volume solver for the compressible Euler
//! equations in one and two dimensions. Fields of primitive
//! quantities are advanced with forward Euler sub-steps, using
//! piecewise linear or piecewise constant reconstruction and HLLE
//! Riemann fluxes. Two-dimensional domains can be decomposed into a
//! lattice of guard-zone patches which are advanced independently,
//! in serial or on a thread pool, and exchange guard data once per
//! fold of sub-steps.

pub mod backend;
pub mod driver;
pub mod hydro;
pub mod lattice;
pub mod reconstruct;
pub mod setup;
pub mod update;
