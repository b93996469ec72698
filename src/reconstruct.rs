//! Spatial reconstruction of primitive data at zone faces. Piecewise
//! constant (PCM) uses the zone average on both faces and is first
//! order. Piecewise linear (PLM) estimates a limited slope from the
//! three-zone stencil and extrapolates by half a zone, second order on
//! smooth data.




// ============================================================================
#[derive(Clone, Copy, Debug)]
pub enum Reconstruction {
    PiecewiseConstant,
    PiecewiseLinear { plm_theta: f64 },
}

impl Default for Reconstruction {
    fn default() -> Self {
        Reconstruction::PiecewiseLinear { plm_theta: 1.5 }
    }
}




// ============================================================================
/// Generalized minmod slope for the zone with neighbor averages `yl`,
/// `yc`, `yr`. The parameter sharpens the slope between minmod
/// (plm_theta = 1) and monotonized central (plm_theta = 2); the slope
/// vanishes at local extrema.
pub fn plm_minmod(yl: f64, yc: f64, yr: f64, plm_theta: f64) -> f64 {
    let a = (yc - yl) * plm_theta;
    let b = (yr - yl) * 0.5;
    let c = (yr - yc) * plm_theta;

    0.25 * (a.signum() + b.signum()).abs()
        * (a.signum() + c.signum())
        * a.abs().min(b.abs()).min(c.abs())
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn slope_vanishes_at_extrema() {
        assert_eq!(plm_minmod(0.0, 1.0, 0.0, 1.5), 0.0);
        assert_eq!(plm_minmod(1.0, 0.0, 1.0, 1.5), 0.0);
    }

    #[test]
    fn slope_of_linear_data_is_exact() {
        assert_eq!(plm_minmod(1.0, 2.0, 3.0, 1.5), 1.0);
        assert_eq!(plm_minmod(3.0, 2.0, 1.0, 1.5), -1.0);
    }

    #[test]
    fn slope_has_sign_of_centered_difference() {
        let g = plm_minmod(0.0, 0.1, 1.0, 1.5);
        assert!(g > 0.0);
        let g = plm_minmod(1.0, 0.1, 0.0, 1.5);
        assert!(g < 0.0);
    }

    #[test]
    fn slope_is_bounded_by_one_sided_differences() {
        let (yl, yc, yr) = (0.0, 0.4, 1.0);
        let theta = 1.5;
        let g = plm_minmod(yl, yc, yr, theta);
        assert!(g.abs() <= theta * (yc - yl).abs());
        assert!(g.abs() <= theta * (yr - yc).abs());
    }

    #[test]
    fn zero_theta_collapses_the_slope() {
        assert_eq!(plm_minmod(0.0, 0.3, 1.0, 0.0), 0.0);
        assert_eq!(plm_minmod(5.0, -2.0, 7.0, 0.0), 0.0);
    }
}
