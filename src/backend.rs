//! Execution backend for the solver loops. Every pass over a field is
//! phrased as an independent operation per zone, so the same numerical
//! code runs serially or data-parallel; only the iteration strategy
//! changes here.

use rayon::prelude::*;
use std::str::FromStr;




// ============================================================================
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    Serial,
    Parallel,
}




// ============================================================================
impl ExecutionMode {

    /// Apply `op` to each zone of `data`, which holds `num_fields`
    /// contiguous values per zone. The zone index passed to `op` is
    /// relative to the start of `data`. `op` must not depend on the
    /// order zones are visited in.
    pub fn zone_for_each<F>(&self, data: &mut [f64], num_fields: usize, op: F)
    where
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        match self {
            ExecutionMode::Serial => {
                for (n, zone) in data.chunks_exact_mut(num_fields).enumerate() {
                    op(n, zone)
                }
            }
            ExecutionMode::Parallel => data
                .par_chunks_exact_mut(num_fields)
                .enumerate()
                .for_each(|(n, zone)| op(n, zone)),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(ExecutionMode::Serial),
            "parallel" => Ok(ExecutionMode::Parallel),
            _ => Err(format!("no execution mode named '{}'", s)),
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::ExecutionMode;

    fn fill_squares(mode: ExecutionMode) -> Vec<f64> {
        let mut data = vec![0.0; 300];
        mode.zone_for_each(&mut data, 3, |n, zone| {
            for (q, x) in zone.iter_mut().enumerate() {
                *x = (n * n + q) as f64;
            }
        });
        data
    }

    #[test]
    fn serial_and_parallel_zone_sweeps_agree() {
        assert_eq!(
            fill_squares(ExecutionMode::Serial),
            fill_squares(ExecutionMode::Parallel)
        );
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("serial".parse(), Ok(ExecutionMode::Serial));
        assert_eq!("parallel".parse(), Ok(ExecutionMode::Parallel));
        assert!("gpu".parse::<ExecutionMode>().is_err());
    }
}
