//! Nearest-neighbor distance between two operating points, for warm-start
//! cache lookups.
//!
//! Each field contributes its relative deviation (so fields of very
//! different scale -- a pressure in Pa, an angle in degrees -- weigh in
//! comparably); `alpha_in` is the exception, normalized by a quarter-turn
//! rather than by its own magnitude since it can legitimately sit at or
//! near zero.

use crate::point::OperatingPoint;

const DELTA: f64 = 1e-8;
const QUARTER_TURN_DEG: f64 = 90.0;

fn relative_deviation(a: f64, b: f64) -> f64 {
    let max_val = a.abs().max(b.abs()).max(DELTA);
    (a - b).abs() / max_val
}

/// Two-norm over each field's relative deviation.
pub fn operating_point_distance(a: &OperatingPoint, b: &OperatingPoint) -> f64 {
    let deviations = [
        relative_deviation(a.p0_in, b.p0_in),
        relative_deviation(a.t0_in, b.t0_in),
        relative_deviation(a.p_out, b.p_out),
        (a.alpha_in - b.alpha_in).abs() / QUARTER_TURN_DEG,
        relative_deviation(a.omega, b.omega),
    ];
    deviations.iter().map(|d| d * d).sum::<f64>().sqrt()
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
    fn identical_points_have_zero_distance() {
        let p = point(1.2e5);
        assert_eq!(operating_point_distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_grows_with_pressure_ratio_difference() {
        let a = point(1.2e5);
        let near = point(1.25e5);
        let far = point(2.0e5);
        assert!(operating_point_distance(&a, &near) < operating_point_distance(&a, &far));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(1.2e5);
        let b = point(1.5e5);
        assert!((operating_point_distance(&a, &b) - operating_point_distance(&b, &a)).abs() < 1e-15);
    }
}
