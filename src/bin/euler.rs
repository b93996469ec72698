use clap::Parser;
use log::{debug, info, LevelFilter};
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use patchflow::backend::ExecutionMode;
use patchflow::driver::Driver;
use patchflow::hydro::{euler1d, euler2d};
use patchflow::lattice::{Lattice, NUM_GUARD};
use patchflow::reconstruct::Reconstruction;
use patchflow::setup::{Explosion, ShockTube};
use patchflow::update::{Mesh1d, Mesh2d, Scratch1d, Scratch2d, Updater1d, Updater2d};


const GAMMA_LAW_INDEX: f64 = 5.0 / 3.0;




// ============================================================================
#[derive(Debug, Parser)]
#[clap(version, author)]
struct Opts {
    /// Grid resolution per dimension
    #[clap(short = 'n', long)]
    resolution: Option<i64>,

    /// Number of spatial dimensions
    #[clap(long, default_value = "1")]
    dim: i64,

    /// Number of patches per dimension (2D only)
    #[clap(short = 'p', long, default_value = "1")]
    patches: i64,

    /// Number of sub-steps between guard zone exchanges and messages
    #[clap(short = 'f', long)]
    fold: Option<usize>,

    /// PLM slope limiter parameter
    #[clap(long, default_value = "1.5")]
    plm_theta: f64,

    /// Use piecewise constant reconstruction
    #[clap(long)]
    pcm: bool,

    /// Time step size relative to the cell crossing time
    #[clap(long, default_value = "0.1")]
    cfl: f64,

    /// Time to run until
    #[clap(short = 't', long, default_value = "0.1")]
    tfinal: f64,

    /// Execution mode, serial or parallel
    #[clap(long, default_value = "serial")]
    mode: ExecutionMode,

    /// Write the final solution to this file in CBOR format
    #[clap(short = 'o', long)]
    output: Option<String>,

    /// Log debug messages
    #[clap(long)]
    verbose: bool,
}

impl Opts {
    fn reconstruction(&self) -> Reconstruction {
        if self.pcm {
            Reconstruction::PiecewiseConstant
        } else {
            Reconstruction::PiecewiseLinear {
                plm_theta: self.plm_theta,
            }
        }
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.fold == Some(0) {
            return Err("fold must be at least 1".into());
        }
        if let Some(resolution) = self.resolution {
            if resolution < 2 {
                return Err(format!("resolution {} must be at least 2", resolution).into());
            }
        }
        Ok(())
    }
}




// ============================================================================
#[derive(Serialize)]
struct Checkpoint1d<'a> {
    time: f64,
    iteration: u64,
    mesh: &'a Mesh1d,
    primitive: &'a [f64],
}

#[derive(Serialize)]
struct Checkpoint2d<'a> {
    time: f64,
    iteration: u64,
    mesh: &'a Mesh2d,
    primitive: &'a [f64],
}

#[derive(Serialize)]
struct PatchData<'a> {
    index: (i64, i64),
    mesh: &'a Mesh2d,
    primitive: &'a [f64],
}

#[derive(Serialize)]
struct CheckpointLattice<'a> {
    time: f64,
    iteration: u64,
    num_guard: i64,
    patches: Vec<PatchData<'a>>,
}

fn write_cbor<T: Serialize>(value: &T, filename: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut buffer = BufWriter::new(file);
    ciborium::ser::into_writer(value, &mut buffer)?;
    info!("wrote {}", filename);
    Ok(())
}




// ============================================================================
fn validate_1d(primitive: &[f64]) -> Result<(), Box<dyn Error>> {
    for zone in primitive.chunks_exact(euler1d::NUM_FIELDS) {
        euler1d::Primitive::from_slice(zone)
            .to_conserved(GAMMA_LAW_INDEX)
            .validate(GAMMA_LAW_INDEX)?
    }
    Ok(())
}

fn validate_2d(primitive: &[f64]) -> Result<(), Box<dyn Error>> {
    for zone in primitive.chunks_exact(euler2d::NUM_FIELDS) {
        euler2d::Primitive::from_slice(zone)
            .to_conserved(GAMMA_LAW_INDEX)
            .validate(GAMMA_LAW_INDEX)?
    }
    Ok(())
}




// ============================================================================
fn run_1d(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let num_zones = opts.resolution.unwrap_or(100_000);
    let fold = opts.fold.unwrap_or(100);
    let mesh = Mesh1d {
        interval: 0.0..1.0,
        num_zones,
    };
    let dt = opts.cfl * mesh.cell_spacing();
    let model = ShockTube;
    let mut primitive = mesh.evaluate(|x| model.primitive_at(x));
    let mut scratch = Scratch1d::new(num_zones);
    let updater = Updater1d {
        gamma_law_index: GAMMA_LAW_INDEX,
        reconstruction: opts.reconstruction(),
        mode: opts.mode,
    };
    let driver = Driver {
        fold,
        time_step: dt,
        final_time: opts.tfinal,
    };

    info!("shock tube on {} zones ({:?})", num_zones, opts.mode);
    debug!("dt={:.3e} fold={}", dt, fold);

    let stats = driver.run(num_zones, |dt| {
        for _ in 0..fold {
            updater.advance(&mut primitive, &mut scratch, &mesh, dt)
        }
    });

    validate_1d(&primitive)?;
    info!("finished at t={:.4} after {} sub-steps", stats.time, stats.iteration);

    if let Some(output) = &opts.output {
        let checkpoint = Checkpoint1d {
            time: stats.time,
            iteration: stats.iteration,
            mesh: &mesh,
            primitive: &primitive,
        };
        write_cbor(&checkpoint, output)?
    }
    Ok(())
}




// ============================================================================
fn run_2d(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let num_zones = opts.resolution.unwrap_or(100);
    let fold = opts.fold.unwrap_or(10);
    let mesh = Mesh2d {
        area: (-0.5..0.5, -0.5..0.5),
        size: (num_zones, num_zones),
    };
    let dt = opts.cfl * mesh.cell_spacing().0;
    let model = Explosion { radius: 0.1 };
    let mut primitive = mesh.evaluate(|x| model.primitive_at(x));
    let mut scratch = Scratch2d::new(mesh.size);
    let updater = Updater2d {
        gamma_law_index: GAMMA_LAW_INDEX,
        reconstruction: opts.reconstruction(),
        mode: opts.mode,
    };
    let driver = Driver {
        fold,
        time_step: dt,
        final_time: opts.tfinal,
    };

    info!(
        "cylindrical explosion on {} x {} zones ({:?})",
        num_zones, num_zones, opts.mode
    );
    debug!("dt={:.3e} fold={}", dt, fold);

    let stats = driver.run(mesh.total_zones(), |dt| {
        for _ in 0..fold {
            updater.advance(&mut primitive, &mut scratch, &mesh, dt)
        }
    });

    validate_2d(&primitive)?;
    info!("finished at t={:.4} after {} sub-steps", stats.time, stats.iteration);

    if let Some(output) = &opts.output {
        let checkpoint = Checkpoint2d {
            time: stats.time,
            iteration: stats.iteration,
            mesh: &mesh,
            primitive: &primitive,
        };
        write_cbor(&checkpoint, output)?
    }
    Ok(())
}




// ============================================================================
fn run_lattice(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let resolution = opts.resolution.unwrap_or(100);
    let fold = opts.fold.unwrap_or(10);

    if resolution % opts.patches != 0 {
        return Err(format!(
            "resolution {} does not divide into {} patches per dimension",
            resolution, opts.patches
        )
        .into());
    }
    let zones_per_patch = resolution / opts.patches;

    if zones_per_patch < NUM_GUARD {
        return Err(format!(
            "{} zones per patch cannot fill guard rings of width {}",
            zones_per_patch, NUM_GUARD
        )
        .into());
    }
    let dt = opts.cfl / resolution as f64;
    let model = Explosion { radius: 0.1 };

    // Parallelism over the lattice is coarse grained, one task per
    // patch, so the per-patch updater runs serially.
    let updater = Updater2d {
        gamma_law_index: GAMMA_LAW_INDEX,
        reconstruction: opts.reconstruction(),
        mode: ExecutionMode::Serial,
    };
    let mut lattice = Lattice::new(opts.patches, zones_per_patch, updater, opts.mode, |x| {
        model.primitive_at(x)
    });
    let driver = Driver {
        fold,
        time_step: dt,
        final_time: opts.tfinal,
    };

    info!(
        "cylindrical explosion on {} x {} patches of {} x {} zones ({:?})",
        opts.patches, opts.patches, zones_per_patch, zones_per_patch, opts.mode
    );
    debug!("dt={:.3e} fold={}", dt, fold);

    let stats = driver.run(lattice.total_interior_zones(), |dt| {
        lattice.advance(fold, dt)
    });

    for patch in lattice.patches.values() {
        validate_2d(&patch.primitive)?
    }
    info!("finished at t={:.4} after {} sub-steps", stats.time, stats.iteration);

    if let Some(output) = &opts.output {
        let patches: Vec<_> = lattice
            .patches
            .values()
            .map(|patch| PatchData {
                index: patch.index,
                mesh: &patch.mesh,
                primitive: &patch.primitive,
            })
            .collect();
        let checkpoint = CheckpointLattice {
            time: stats.time,
            iteration: stats.iteration,
            num_guard: NUM_GUARD,
            patches,
        };
        write_cbor(&checkpoint, output)?
    }
    Ok(())
}




// ============================================================================
fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();

    SimpleLogger::new()
        .with_level(if opts.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init()?;

    opts.validate()?;

    match opts.dim {
        1 => run_1d(&opts),
        2 if opts.patches > 1 => run_lattice(&opts),
        2 => run_2d(&opts),
        _ => Err(format!("invalid dimension {}, expected 1 or 2", opts.dim).into()),
    }
}
