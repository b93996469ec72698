//! Initial condition models. Each model maps a cell center position
//! to a primitive state; meshes evaluate them zone by zone.

use crate::hydro::{euler1d, euler2d};




// ============================================================================
/// Sod-type shock tube: a dense, high pressure state on the left half
/// of the unit interval and a light, low pressure state on the right.
pub struct ShockTube;

impl ShockTube {
    pub fn primitive_at(&self, x: f64) -> euler1d::Primitive {
        if x < 0.5 {
            euler1d::Primitive(1.0, 0.0, 1.0)
        } else {
            euler1d::Primitive(0.1, 0.0, 0.125)
        }
    }
}




// ============================================================================
/// Cylindrical explosion: an over-dense, over-pressured disk centered
/// at the origin, at rest in a light ambient medium.
pub struct Explosion {
    pub radius: f64,
}

impl Explosion {
    pub fn primitive_at(&self, position: (f64, f64)) -> euler2d::Primitive {
        let (x, y) = position;

        if (x * x + y * y).sqrt() < self.radius {
            euler2d::Primitive(1.0, 0.0, 0.0, 1.0)
        } else {
            euler2d::Primitive(0.1, 0.0, 0.0, 0.125)
        }
    }
}




// ============================================================================
/// A Gaussian density pulse riding on a uniform velocity and pressure
/// background. With constant velocity and pressure the pulse advects
/// without change of shape, so `primitive_at_time` is an exact
/// solution to compare numerical profiles against.
pub struct DensityPulse {
    pub amplitude: f64,
    pub center: f64,
    pub width: f64,
    pub velocity: f64,
}

impl DensityPulse {
    pub fn primitive_at(&self, x: f64) -> euler1d::Primitive {
        let d = 1.0 + self.amplitude * (-((x - self.center) / self.width).powi(2)).exp();
        euler1d::Primitive(d, self.velocity, 1.0)
    }

    pub fn primitive_at_time(&self, x: f64, time: f64) -> euler1d::Primitive {
        self.primitive_at(x - self.velocity * time)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn shock_tube_has_two_uniform_states() {
        let model = ShockTube;
        assert_eq!(model.primitive_at(0.25).mass_density(), 1.0);
        assert_eq!(model.primitive_at(0.25).gas_pressure(), 1.0);
        assert_eq!(model.primitive_at(0.75).mass_density(), 0.1);
        assert_eq!(model.primitive_at(0.75).gas_pressure(), 0.125);
    }

    #[test]
    fn explosion_state_depends_only_on_radius() {
        let model = Explosion { radius: 0.25 };
        assert_eq!(model.primitive_at((0.1, 0.1)).mass_density(), 1.0);
        assert_eq!(model.primitive_at((0.3, 0.0)).mass_density(), 0.1);
        assert_eq!(model.primitive_at((0.0, 0.3)).mass_density(), 0.1);
    }

    #[test]
    fn density_pulse_advects_without_deformation() {
        let model = DensityPulse {
            amplitude: 0.5,
            center: 0.25,
            width: 0.05,
            velocity: 1.0,
        };
        assert_eq!(model.primitive_at(0.25).mass_density(), 1.5);
        assert_eq!(
            model.primitive_at_time(0.45, 0.2).mass_density(),
            model.primitive_at(0.25).mass_density()
        );
    }
}
