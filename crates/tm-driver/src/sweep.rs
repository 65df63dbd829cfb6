//! Expand a performance map (one or more values per boundary-condition
//! field) into the Cartesian product of individual operating points, and
//! drive that whole sweep across a `rayon` thread pool.

use rayon::prelude::*;

use crate::cache::WarmStartCache;
use crate::error::DriverResult;
use crate::model::ModelConfig;
use crate::point::OperatingPoint;
use crate::solve::{solve_operating_point, OperatingPointSolution};
use tm_geometry::MachineGeometry;
use tm_solver::NewtonConfig;

/// One field of a performance map: either a single fixed value or a list of
/// values to sweep over. Every field not already a list is treated as a
/// list of one, so a performance map can mix swept and fixed fields freely.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMap {
    pub fluid_name: String,
    pub p0_in: Vec<f64>,
    pub t0_in: Vec<f64>,
    pub p_out: Vec<f64>,
    pub alpha_in: Vec<f64>,
    pub omega: Vec<f64>,
}

/// The Cartesian product of every field's values, in nested order
/// `p0_in, t0_in, p_out, alpha_in, omega` (outermost to innermost).
pub fn generate_operating_points(map: &PerformanceMap) -> Vec<OperatingPoint> {
    let mut points = Vec::with_capacity(
        map.p0_in.len() * map.t0_in.len() * map.p_out.len() * map.alpha_in.len() * map.omega.len(),
    );
    for &p0_in in &map.p0_in {
        for &t0_in in &map.t0_in {
            for &p_out in &map.p_out {
                for &alpha_in in &map.alpha_in {
                    for &omega in &map.omega {
                        points.push(OperatingPoint {
                            fluid_name: map.fluid_name.clone(),
                            p0_in,
                            t0_in,
                            p_out,
                            alpha_in,
                            omega,
                        });
                    }
                }
            }
        }
    }
    points
}

/// Solve every point in `map` across a `rayon` thread pool, one operating
/// point per task.
///
/// Each task gets its own [`WarmStartCache`] seeded empty: sharing one cache
/// mutably across the pool would serialize the very work this function
/// parallelizes, so warm-starting from a neighboring point only helps within
/// a single call to [`solve_operating_point`]'s retry ladder, not across
/// points here. Sweep the map through a sequential loop over
/// `solve_operating_point` instead when warm-starting between points matters
/// more than wall-clock time.
pub fn run_performance_map(
    map: &PerformanceMap,
    geometry: &MachineGeometry,
    model: &ModelConfig,
    fluid: &(dyn tm_fluids::PropertyOracle + Sync),
    newton_config: &NewtonConfig,
) -> Vec<DriverResult<OperatingPointSolution>> {
    generate_operating_points(map)
        .into_par_iter()
        .map(|point| {
            let mut cache = WarmStartCache::new();
            solve_operating_point(&point, geometry, model, fluid, &mut cache, newton_config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_valued_fields_produce_one_point() {
        let map = PerformanceMap {
            fluid_name: "air".to_string(),
            p0_in: vec![3.0e5],
            t0_in: vec![450.0],
            p_out: vec![1.2e5],
            alpha_in: vec![0.0],
            omega: vec![1200.0],
        };
        assert_eq!(generate_operating_points(&map).len(), 1);
    }

    #[test]
    fn swept_field_multiplies_point_count() {
        let map = PerformanceMap {
            fluid_name: "air".to_string(),
            p0_in: vec![3.0e5],
            t0_in: vec![450.0],
            p_out: vec![1.0e5, 1.2e5, 1.5e5],
            alpha_in: vec![0.0],
            omega: vec![1000.0, 1200.0],
        };
        assert_eq!(generate_operating_points(&map).len(), 6);
    }

    #[test]
    fn empty_field_produces_no_points() {
        let map = PerformanceMap {
            fluid_name: "air".to_string(),
            p0_in: vec![],
            t0_in: vec![450.0],
            p_out: vec![1.2e5],
            alpha_in: vec![0.0],
            omega: vec![1200.0],
        };
        assert!(generate_operating_points(&map).is_empty());
    }
}
