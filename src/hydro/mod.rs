//! Gas dynamics for the 1D and 2D Euler equations with a gamma-law
//! equation of state. The primitive variable layouts are `[rho, vx, p]`
//! in 1D and `[rho, vx, vy, p]` in 2D, with the gas pressure always in
//! the last slot. Conversions used inside the update loops are
//! infallible; checked admissibility lives on the conserved types and
//! is meant for the driver boundary, not the hot path.

pub mod error;
pub mod euler1d;
pub mod euler2d;

/**
 * Enum to hold one of the two grid axes
 */
#[derive(Clone, Copy)]
pub enum Axis {
    I,
    J,
}

// ============================================================================
impl Axis {
    pub fn along(&self, other: Axis) -> f64 {
        match (self, other) {
            (Axis::I, Axis::I) => 1.0,
            (Axis::J, Axis::J) => 1.0,
            _ => 0.0,
        }
    }
}
