use super::error::Error;
use std::ops::{Add, Div, Mul, Sub};

pub const NUM_FIELDS: usize = 3;




// ============================================================================
#[derive(Clone, Copy)]
pub struct Conserved(pub f64, pub f64, pub f64);

#[derive(Clone, Copy)]
pub struct Primitive(pub f64, pub f64, pub f64);




// ============================================================================
impl Conserved {

    pub fn from_slice(cons: &[f64]) -> Self {
        Self(cons[0], cons[1], cons[2])
    }

    pub fn write_to_slice(&self, cons: &mut [f64]) {
        cons[0] = self.0;
        cons[1] = self.1;
        cons[2] = self.2;
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn momentum(&self) -> f64 {
        self.1
    }

    pub fn energy_density(&self) -> f64 {
        self.2
    }

    pub fn to_primitive(&self, gamma_law_index: f64) -> Primitive {
        let ek = 0.5 * self.momentum() * self.momentum() / self.mass_density();
        let et = self.energy_density() - ek;
        let pg = et * (gamma_law_index - 1.0);
        let vx = self.momentum() / self.mass_density();

        Primitive(self.mass_density(), vx, pg)
    }

    pub fn validate(&self, gamma_law_index: f64) -> Result<(), Error> {
        let ek = 0.5 * self.momentum() * self.momentum() / self.mass_density();
        let pg = (self.energy_density() - ek) * (gamma_law_index - 1.0);

        if self.mass_density() < 0.0 {
            Err(Error::NegativeMassDensity(self.mass_density()))
        } else if pg < 0.0 {
            Err(Error::NegativeGasPressure(pg))
        } else {
            Ok(())
        }
    }
}




// ============================================================================
impl Primitive {

    pub fn from_slice(prim: &[f64]) -> Self {
        Self(prim[0], prim[1], prim[2])
    }

    pub fn write_to_slice(&self, prim: &mut [f64]) {
        prim[0] = self.0;
        prim[1] = self.1;
        prim[2] = self.2;
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn velocity(&self) -> f64 {
        self.1
    }

    pub fn gas_pressure(&self) -> f64 {
        self.2
    }

    pub fn sound_speed_squared(&self, gamma_law_index: f64) -> f64 {
        gamma_law_index * self.gas_pressure() / self.mass_density()
    }

    pub fn outer_wavespeeds(&self, gamma_law_index: f64) -> (f64, f64) {
        let cs = self.sound_speed_squared(gamma_law_index).sqrt();
        let vn = self.velocity();
        (vn - cs, vn + cs)
    }

    pub fn to_conserved(&self, gamma_law_index: f64) -> Conserved {
        let d = self.mass_density();
        let p = self.gas_pressure();
        let v = self.velocity();

        Conserved(
            d,
            d * v,
            d * v * v * 0.5 + p / (gamma_law_index - 1.0),
        )
    }

    pub fn flux_vector(&self, gamma_law_index: f64) -> Conserved {
        let pg = self.gas_pressure();
        let vn = self.velocity();
        let u = self.to_conserved(gamma_law_index);

        Conserved(
            u.0 * vn,
            u.1 * vn + pg,
            u.2 * vn + pg * vn,
        )
    }
}




// ============================================================================
impl Add<Conserved> for Conserved {
    type Output = Conserved;
    fn add(self, u: Self) -> Conserved {
        Conserved(self.0 + u.0, self.1 + u.1, self.2 + u.2)
    }
}

impl Sub<Conserved> for Conserved {
    type Output = Self;
    fn sub(self, u: Self) -> Self {
        Self(self.0 - u.0, self.1 - u.1, self.2 - u.2)
    }
}

impl Mul<f64> for Conserved {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a, self.2 * a)
    }
}

impl Div<f64> for Conserved {
    type Output = Self;
    fn div(self, a: f64) -> Self {
        Self(self.0 / a, self.1 / a, self.2 / a)
    }
}




// ============================================================================
pub fn riemann_hlle(pl: Primitive, pr: Primitive, gamma_law_index: f64) -> Conserved {
    let ul = pl.to_conserved(gamma_law_index);
    let ur = pr.to_conserved(gamma_law_index);
    let fl = pl.flux_vector(gamma_law_index);
    let fr = pr.flux_vector(gamma_law_index);

    let (alm, alp) = pl.outer_wavespeeds(gamma_law_index);
    let (arm, arp) = pr.outer_wavespeeds(gamma_law_index);
    let ap = alp.max(arp).max(0.0);
    let am = alm.min(arm).min(0.0);

    (fl * ap - fr * am - (ul - ur) * ap * am) / (ap - am)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    const GAMMA: f64 = 5.0 / 3.0;

    #[test]
    fn primitive_round_trip_recovers_input() {
        let p0 = Primitive(1.2, -0.4, 2.5);
        let p1 = p0.to_conserved(GAMMA).to_primitive(GAMMA);
        assert!((p1.mass_density() - p0.mass_density()).abs() < 1e-12);
        assert!((p1.velocity() - p0.velocity()).abs() < 1e-12);
        assert!((p1.gas_pressure() - p0.gas_pressure()).abs() < 1e-12);
    }

    #[test]
    fn slice_round_trip_recovers_input() {
        let mut zone = [0.0; NUM_FIELDS];
        Primitive(0.7, 1.3, 0.9).write_to_slice(&mut zone);
        let p = Primitive::from_slice(&zone);
        assert_eq!(p.mass_density(), 0.7);
        assert_eq!(p.velocity(), 1.3);
        assert_eq!(p.gas_pressure(), 0.9);
    }

    #[test]
    fn validate_rejects_negative_density_and_pressure() {
        assert!(Conserved(-1.0, 0.0, 1.0).validate(GAMMA).is_err());
        assert!(Conserved(1.0, 0.0, -1.0).validate(GAMMA).is_err());
        assert!(Primitive(1.0, 0.0, 1.0)
            .to_conserved(GAMMA)
            .validate(GAMMA)
            .is_ok());
    }

    #[test]
    fn hlle_flux_of_uniform_state_is_advective() {
        let p = Primitive(1.0, 0.5, 1.0);
        let f = riemann_hlle(p, p, GAMMA);
        let e = p.flux_vector(GAMMA);
        assert!((f.0 - e.0).abs() < 1e-12);
        assert!((f.1 - e.1).abs() < 1e-12);
        assert!((f.2 - e.2).abs() < 1e-12);
    }

    #[test]
    fn hlle_flux_is_upwind_for_supersonic_flow() {
        let pl = Primitive(1.0, 3.0, 1.0);
        let pr = Primitive(0.5, 3.0, 0.4);
        let f = riemann_hlle(pl, pr, GAMMA);
        let e = pl.flux_vector(GAMMA);
        assert!((f.0 - e.0).abs() < 1e-12);
        assert!((f.1 - e.1).abs() < 1e-12);
        assert!((f.2 - e.2).abs() < 1e-12);
    }
}
