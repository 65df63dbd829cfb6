//! An operating point: the boundary conditions a machine is evaluated at.

use crate::error::{DriverError, DriverResult};

/// Inlet stagnation state, inlet flow angle, shaft speed, and exit static
/// pressure -- the full set of boundary conditions a converged solve needs.
///
/// Working-fluid identity travels with the point (rather than being fixed
/// once per driver) so a single performance-map sweep can, in principle,
/// span more than one fluid; the property oracle a caller wires in is
/// expected to recognize `fluid_name` or ignore it if it only ever serves
/// one fluid.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint {
    pub fluid_name: String,
    pub p0_in: f64,
    pub t0_in: f64,
    pub p_out: f64,
    pub alpha_in: f64,
    pub omega: f64,
}

impl OperatingPoint {
    /// Reject operating points with non-physical boundary conditions:
    /// non-positive pressures or temperature, a subsonic-incompatible
    /// pressure ratio (`p_out >= p0_in`, which drives no flow), or a flow
    /// angle outside what a velocity triangle can represent.
    pub fn validate(&self) -> DriverResult<()> {
        let checks: &[(&str, f64)] = &[
            ("p0_in", self.p0_in),
            ("t0_in", self.t0_in),
            ("p_out", self.p_out),
            ("alpha_in", self.alpha_in),
            ("omega", self.omega),
        ];
        for (name, value) in checks {
            if !value.is_finite() {
                return Err(DriverError::InvalidOperatingPoint {
                    what: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.p0_in <= 0.0 || self.t0_in <= 0.0 || self.p_out <= 0.0 {
            return Err(DriverError::InvalidOperatingPoint {
                what: "p0_in, t0_in, and p_out must be strictly positive".to_string(),
            });
        }
        if self.p_out >= self.p0_in {
            return Err(DriverError::InvalidOperatingPoint {
                what: format!(
                    "p_out ({}) must be below p0_in ({}) to drive flow through the turbine",
                    self.p_out, self.p0_in
                ),
            });
        }
        if !(-90.0..=90.0).contains(&self.alpha_in) {
            return Err(DriverError::InvalidOperatingPoint {
                what: format!("alpha_in must lie in [-90, 90] deg, got {}", self.alpha_in),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> OperatingPoint {
        OperatingPoint {
            fluid_name: "air".to_string(),
            p0_in: 3.0e5,
            t0_in: 450.0,
            p_out: 1.2e5,
            alpha_in: 0.0,
            omega: 1200.0,
        }
    }

    #[test]
    fn well_formed_point_validates() {
        assert!(point().validate().is_ok());
    }

    #[test]
    fn rejects_non_expanding_pressure_ratio() {
        let mut p = point();
        p.p_out = p.p0_in;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_inlet_angle() {
        let mut p = point();
        p.alpha_in = 120.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_fields() {
        let mut p = point();
        p.omega = f64::NAN;
        assert!(p.validate().is_err());
    }
}
