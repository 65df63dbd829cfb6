use crate::CoreError;

/// Floating point type used throughout the engine.
pub type Real = f64;

/// One tolerance pair for everything: absolute near zero, relative elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Method used to blend a piecewise branch into a smooth, differentiable surrogate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMethod {
    /// Shifted log-sum-exp.
    LogSumExp,
    /// Boltzmann-weighted average.
    Boltzmann,
    /// p-norm (only meaningful for strictly positive inputs).
    PNorm,
}

/// Approximate `max(xs)` (or `min(xs)` for negative `alpha`) with a smooth surrogate.
///
/// `alpha` controls the sharpness of the approximation: large `|alpha|` tracks the
/// hard max/min closely, small `|alpha|` approaches a plain average. Mirrors the
/// shift-stabilized log-sum-exp / Boltzmann-weighted-average / p-norm constructions
/// used elsewhere in this codebase to replace branchy `if`/`max`/`min` chains with
/// functions a Newton solver can differentiate through.
pub fn smooth_max(xs: &[Real], method: BlendMethod, alpha: Real) -> Real {
    match method {
        BlendMethod::LogSumExp => logsumexp(xs, alpha),
        BlendMethod::Boltzmann => boltzmann(xs, alpha),
        BlendMethod::PNorm => pnorm(xs, alpha),
    }
}

/// Approximate `min(xs)` with a smooth surrogate; equivalent to `smooth_max` with
/// the sign of `alpha` flipped.
pub fn smooth_min(xs: &[Real], method: BlendMethod, alpha: Real) -> Real {
    smooth_max(xs, method, -alpha)
}

/// Smooth approximation of `|x|` as `smooth_max([x, -x], method, alpha)`.
pub fn smooth_abs(x: Real, method: BlendMethod, alpha: Real) -> Real {
    smooth_max(&[x, -x], method, alpha.abs())
}

/// Smoothly switch from `below` to `above` as `x` crosses `threshold`: a
/// differentiable drop-in for `if x < threshold { below } else { above }`.
///
/// Built entirely from `smooth_min`/`smooth_max` rather than a fresh sigmoid:
/// a soft clamp of the linear ramp `sharpness * (x - threshold) + 0.5` into
/// `[0, 1]` gives a blend weight, which then interpolates between the two
/// branch values. `sharpness` is the reciprocal of the transition width in
/// `x`'s own units (e.g. `1.0 / 2e4` gives a ~2e4-wide transition for a
/// Reynolds-number threshold); larger tracks the hard switch more closely.
pub fn smooth_switch(
    x: Real,
    threshold: Real,
    below: Real,
    above: Real,
    method: BlendMethod,
    sharpness: Real,
) -> Real {
    const CLAMP_ALPHA: Real = 30.0;
    let ramp = sharpness * (x - threshold) + 0.5;
    let weight = smooth_min(
        &[smooth_max(&[ramp, 0.0], method, CLAMP_ALPHA), 1.0],
        method,
        CLAMP_ALPHA,
    );
    below + (above - below) * weight
}

fn logsumexp(xs: &[Real], alpha: Real) -> Real {
    let sign = alpha.signum();
    let shift = xs
        .iter()
        .map(|&x| sign * x)
        .fold(Real::NEG_INFINITY, Real::max);
    let sum: Real = xs.iter().map(|&x| (alpha * (x - shift)).exp()).sum();
    (sum.ln() + alpha * shift) / alpha
}

fn boltzmann(xs: &[Real], alpha: Real) -> Real {
    let sign = alpha.signum();
    let shift = xs
        .iter()
        .map(|&x| sign * x)
        .fold(Real::NEG_INFINITY, Real::max);
    let mut weighted = 0.0;
    let mut weight = 0.0;
    for &x in xs {
        let w = (alpha * (x - shift)).exp();
        weighted += x * w;
        weight += w;
    }
    weighted / (weight + Real::EPSILON)
}

fn pnorm(xs: &[Real], alpha: Real) -> Real {
    let sum: Real = xs.iter().map(|&x| x.powf(alpha)).sum();
    sum.powf(1.0 / alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn smooth_max_tracks_hard_max_at_high_sharpness() {
        let xs = [1.0, 5.0, 3.0];
        for method in [BlendMethod::LogSumExp, BlendMethod::Boltzmann] {
            let approx = smooth_max(&xs, method, 200.0);
            assert!((approx - 5.0).abs() < 1e-3, "{method:?} -> {approx}");
        }
    }

    #[test]
    fn smooth_min_tracks_hard_min_at_high_sharpness() {
        let xs = [1.0, 5.0, 3.0];
        let approx = smooth_min(&xs, BlendMethod::LogSumExp, 200.0);
        assert!((approx - 1.0).abs() < 1e-3);
    }

    #[test]
    fn smooth_abs_matches_plain_abs_at_high_sharpness() {
        let approx = smooth_abs(-2.5, BlendMethod::Boltzmann, 200.0);
        assert!((approx - 2.5).abs() < 1e-3);
    }

    #[test]
    fn smooth_switch_matches_branches_away_from_threshold() {
        let below = smooth_switch(0.0, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 50.0);
        let above = smooth_switch(2.0, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 50.0);
        assert!((below - 10.0).abs() < 1e-3);
        assert!((above - 20.0).abs() < 1e-3);
    }

    #[test]
    fn smooth_switch_is_continuous_through_threshold() {
        let a = smooth_switch(0.999, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 50.0);
        let b = smooth_switch(1.0, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 50.0);
        let c = smooth_switch(1.001, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 50.0);
        assert!(a < b && b < c, "expected monotone transition, got {a} {b} {c}");
        assert!((b - 15.0).abs() < 1.0);
    }

    #[test]
    fn smooth_switch_matches_hard_switch_in_the_limit() {
        for &x in &[0.2, 0.8, 1.2, 1.8] {
            let soft = smooth_switch(x, 1.0, 10.0, 20.0, BlendMethod::LogSumExp, 500.0);
            let hard = if x < 1.0 { 10.0 } else { 20.0 };
            assert!((soft - hard).abs() < 1e-2, "x={x} soft={soft} hard={hard}");
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn smooth_max_is_between_average_and_true_max(
            xs in prop::collection::vec(-1e3_f64..1e3, 2..6),
            alpha in 1.0_f64..300.0,
        ) {
            let true_max = xs.iter().cloned().fold(Real::NEG_INFINITY, Real::max);
            let mean = xs.iter().sum::<Real>() / xs.len() as Real;
            let approx = smooth_max(&xs, BlendMethod::LogSumExp, alpha);
            // max <= logsumexp <= max + ln(n)/alpha (standard log-sum-exp bound).
            prop_assert!(approx <= true_max + (xs.len() as Real).ln() / alpha + 1e-6);
            prop_assert!(approx >= mean - 1e-6);
        }

        #[test]
        fn smooth_switch_stays_within_branch_bounds(
            x in -1e3_f64..1e3,
            threshold in -1e3_f64..1e3,
            below in -1e3_f64..1e3,
            above in -1e3_f64..1e3,
            sharpness in 1e-3_f64..10.0,
        ) {
            // The inner clamp's own log-sum-exp sharpness (see `smooth_switch`)
            // can overshoot [0, 1] by up to ln(2)/CLAMP_ALPHA; the blend weight
            // carries that same overshoot into the branch-value interpolation.
            let clamp_overshoot = (2.0_f64).ln() / 30.0;
            let spread = (above - below).abs() * clamp_overshoot + 1e-6;
            let lo = below.min(above) - spread;
            let hi = below.max(above) + spread;
            let blended = smooth_switch(x, threshold, below, above, BlendMethod::LogSumExp, sharpness);
            prop_assert!(blended >= lo && blended <= hi);
        }
    }
}
