//! Warm-start cache: remembers the converged unknown vector of every
//! operating point solved so far, so a sweep over a performance map can
//! seed each new point from its nearest already-solved neighbor instead of
//! a cold heuristic guess.

use nalgebra::DVector;

use crate::distance::operating_point_distance;
use crate::point::OperatingPoint;

#[derive(Debug, Clone)]
struct CacheEntry {
    point: OperatingPoint,
    solution: DVector<f64>,
}

/// A simple linear-scan nearest-neighbor cache.
///
/// Performance maps are swept points at a time (tens to low thousands), so
/// a linear scan over previously solved points is not worth replacing with
/// a spatial index.
#[derive(Debug, Clone, Default)]
pub struct WarmStartCache {
    entries: Vec<CacheEntry>,
}

impl WarmStartCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record a converged solution so later points can warm-start from it.
    pub fn insert(&mut self, point: OperatingPoint, solution: DVector<f64>) {
        self.entries.push(CacheEntry { point, solution });
    }

    /// The converged unknown vector of the nearest previously-solved point,
    /// and its distance, or `None` if the cache is empty.
    pub fn nearest(&self, point: &OperatingPoint) -> Option<(&DVector<f64>, f64)> {
        self.entries
            .iter()
            .map(|entry| (&entry.solution, operating_point_distance(point, &entry.point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(p_out: f64) -> OperatingPoint {
        OperatingPoint {
            fluid_name: "air".to_string(),
            p0_in: 3.0e5,
            t0_in: 450.0,
            p_out,
            alpha_in: 0.0,
            omega: 1200.0,
        }
    }

    #[test]
    fn empty_cache_has_no_neighbor() {
        let cache = WarmStartCache::new();
        assert!(cache.nearest(&point(1.2e5)).is_none());
    }

    #[test]
    fn finds_the_closest_of_several_entries() {
        let mut cache = WarmStartCache::new();
        cache.insert(point(1.0e5), DVector::from_vec(vec![1.0]));
        cache.insert(point(1.2e5), DVector::from_vec(vec![2.0]));
        cache.insert(point(2.0e5), DVector::from_vec(vec![3.0]));

        let (solution, distance) = cache.nearest(&point(1.21e5)).unwrap();
        assert_eq!(solution[0], 2.0);
        assert!(distance < 0.1);
    }
}
