//! Velocity triangles at a cascade plane.
//!
//! The inlet triangle is built from the absolute velocity and flow angle
//! (known at the inlet boundary condition); the exit/throat triangle is
//! built from the relative velocity and flow angle (the cascade's own
//! unknowns). Both produce the same set of components.

use tm_core::degtrig::{arctand, cosd, sind};

/// Every component of a velocity triangle at one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityTriangle {
    pub u: f64,
    pub v: f64,
    pub v_m: f64,
    pub v_t: f64,
    pub alpha: f64,
    pub w: f64,
    pub w_m: f64,
    pub w_t: f64,
    pub beta: f64,
}

/// Build the triangle at a cascade inlet from blade speed, absolute
/// velocity, and absolute flow angle.
pub fn triangle_from_absolute(u: f64, v: f64, alpha: f64) -> VelocityTriangle {
    let v_t = v * sind(alpha);
    let v_m = v * cosd(alpha);
    let w_t = v_t - u;
    let w_m = v_m;
    let w = (w_t.powi(2) + w_m.powi(2)).sqrt();
    let beta = arctand(w_t / w_m);

    VelocityTriangle {
        u,
        v,
        v_m,
        v_t,
        alpha,
        w,
        w_m,
        w_t,
        beta,
    }
}

/// Build the triangle at a cascade throat/exit from blade speed, relative
/// velocity, and relative flow angle.
pub fn triangle_from_relative(u: f64, w: f64, beta: f64) -> VelocityTriangle {
    let w_t = w * sind(beta);
    let w_m = w * cosd(beta);
    let v_t = w_t + u;
    let v_m = w_m;
    let v = (v_t.powi(2) + v_m.powi(2)).sqrt();
    let alpha = arctand(v_t / v_m);

    VelocityTriangle {
        u,
        v,
        v_m,
        v_t,
        alpha,
        w,
        w_m,
        w_t,
        beta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_both_directions() {
        let t_in = triangle_from_absolute(150.0, 200.0, 20.0);
        let t_out = triangle_from_relative(150.0, t_in.w, t_in.beta);
        assert!((t_in.v - t_out.v).abs() < 1e-9);
        assert!((t_in.alpha - t_out.alpha).abs() < 1e-9);
    }

    #[test]
    fn zero_swirl_has_zero_tangential_component() {
        let t = triangle_from_absolute(0.0, 100.0, 0.0);
        assert!(t.v_t.abs() < 1e-12);
        assert!((t.w - t.v).abs() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn absolute_and_relative_triangles_round_trip(
            u in 0.0_f64..400.0,
            v in 1.0_f64..400.0,
            alpha in -80.0_f64..80.0,
        ) {
            let t_in = triangle_from_absolute(u, v, alpha);
            let t_out = triangle_from_relative(u, t_in.w, t_in.beta);
            prop_assert!((t_in.v - t_out.v).abs() / v < 1e-9);
            prop_assert!((t_in.alpha - t_out.alpha).abs() < 1e-9);
            prop_assert!((t_in.v_t - t_out.v_t).abs() / v < 1e-9);
            prop_assert!((t_in.v_m - t_out.v_m).abs() / v < 1e-9);
        }

        #[test]
        fn tangential_components_differ_by_blade_speed(
            u in 0.0_f64..400.0,
            v in 1.0_f64..400.0,
            alpha in -80.0_f64..80.0,
        ) {
            let t = triangle_from_absolute(u, v, alpha);
            prop_assert!((t.v_t - t.w_t - u).abs() < 1e-9);
            prop_assert!((t.v_m - t.w_m).abs() < 1e-9);
        }
    }
}
