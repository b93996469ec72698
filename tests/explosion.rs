use patchflow::backend::ExecutionMode;
use patchflow::hydro::euler2d;
use patchflow::reconstruct::Reconstruction;
use patchflow::setup::Explosion;
use patchflow::update::{Mesh2d, Scratch2d, Updater2d};


const GAMMA_LAW_INDEX: f64 = 5.0 / 3.0;


fn evolve(num_zones: i64, num_steps: usize, reconstruction: Reconstruction) -> (Mesh2d, Vec<f64>) {
    let mesh = Mesh2d {
        area: (-0.5..0.5, -0.5..0.5),
        size: (num_zones, num_zones),
    };
    let dt = 0.1 * mesh.cell_spacing().0;
    let model = Explosion { radius: 0.1 };
    let updater = Updater2d {
        gamma_law_index: GAMMA_LAW_INDEX,
        reconstruction,
        mode: ExecutionMode::Serial,
    };
    let mut primitive = mesh.evaluate(|x| model.primitive_at(x));
    let mut scratch = Scratch2d::new(mesh.size);

    for _ in 0..num_steps {
        updater.advance(&mut primitive, &mut scratch, &mesh, dt)
    }
    (mesh, primitive)
}

fn zone(primitive: &[f64], num_zones: i64, i: i64, j: i64) -> euler2d::Primitive {
    let n = (i * num_zones + j) as usize;
    euler2d::Primitive::from_slice(&primitive[n * euler2d::NUM_FIELDS..])
}


#[test]
fn explosion_stays_within_physical_bounds() {
    let (_, primitive) = evolve(64, 32, Reconstruction::default());

    for chunk in primitive.chunks_exact(euler2d::NUM_FIELDS) {
        let p = euler2d::Primitive::from_slice(chunk);
        assert!(p.mass_density().is_finite());
        assert!(p.mass_density() > 0.05 && p.mass_density() < 1.05);
        assert!(p.gas_pressure() > 0.01 && p.gas_pressure() < 1.05);
        assert!(p.velocity_squared() < 4.0);
    }
}

#[test]
fn pcm_radial_step_is_bounded_and_mirror_symmetric() {
    let n = 100;
    let (_, primitive) = evolve(n, 100, Reconstruction::PiecewiseConstant);

    for chunk in primitive.chunks_exact(euler2d::NUM_FIELDS) {
        let p = euler2d::Primitive::from_slice(chunk);
        assert!(p.mass_density().is_finite());
        assert!(p.mass_density() >= 0.1 && p.mass_density() <= 1.0);
    }
    for i in 0..n {
        for j in 0..n {
            let a = zone(&primitive, n, i, j);
            let b = zone(&primitive, n, n - 1 - i, j);
            assert!((a.mass_density() - b.mass_density()).abs() < 1e-12);
        }
    }
}

#[test]
fn explosion_is_mirror_symmetric() {
    let n = 64;
    let (_, primitive) = evolve(n, 32, Reconstruction::default());

    for i in 0..n {
        for j in 0..n {
            let a = zone(&primitive, n, i, j);
            let b = zone(&primitive, n, n - 1 - i, j);
            assert!((a.mass_density() - b.mass_density()).abs() < 1e-12);
            assert!((a.velocity_1() + b.velocity_1()).abs() < 1e-12);
            assert!((a.velocity_2() - b.velocity_2()).abs() < 1e-12);
            assert!((a.gas_pressure() - b.gas_pressure()).abs() < 1e-12);
        }
    }
}

#[test]
fn explosion_is_transpose_symmetric() {
    let n = 64;
    let (_, primitive) = evolve(n, 32, Reconstruction::default());

    for i in 0..n {
        for j in 0..n {
            let a = zone(&primitive, n, i, j);
            let b = zone(&primitive, n, j, i);
            assert!((a.mass_density() - b.mass_density()).abs() < 1e-12);
            assert!((a.velocity_1() - b.velocity_2()).abs() < 1e-12);
            assert!((a.velocity_2() - b.velocity_1()).abs() < 1e-12);
            assert!((a.gas_pressure() - b.gas_pressure()).abs() < 1e-12);
        }
    }
}

#[test]
fn gas_flows_outward_from_the_explosion() {
    let n = 64;
    let (mesh, primitive) = evolve(n, 32, Reconstruction::default());

    for i in 0..n {
        for j in 0..n {
            let (x, y) = mesh.cell_center((i, j));
            let p = zone(&primitive, n, i, j);
            let outward = x * p.velocity_1() + y * p.velocity_2();
            assert!(outward > -1e-6, "inflow at ({}, {}): {}", x, y, outward);
        }
    }
}
