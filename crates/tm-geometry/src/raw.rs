//! Raw, user-specified blade-row geometry (before derived quantities are built).

use crate::error::{GeometryError, GeometryResult};

/// Whether a cascade is a stationary row (nozzle) or a rotating row (rotor).
///
/// The loss model's tip-clearance and shock terms, and the velocity-triangle
/// convention (rothalpy vs. stagnation enthalpy conservation), both branch on
/// this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeType {
    Stator,
    Rotor,
}

/// Every independently-specified geometric parameter of one blade row.
///
/// Angles (`stagger_angle`, `metal_angle_le`, `metal_angle_te`, `wedge_angle_le`)
/// are plain `f64` degrees, per [`tm_core::units::degtrig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeGeometry {
    pub cascade_type: CascadeType,

    /// Hub radius at the cascade inlet and outlet planes [m].
    pub radius_hub_in: f64,
    pub radius_hub_out: f64,
    /// Tip radius at the cascade inlet and outlet planes [m].
    pub radius_tip_in: f64,
    pub radius_tip_out: f64,

    /// Blade pitch (circumferential spacing) [m].
    pub pitch: f64,
    /// Blade chord length [m].
    pub chord: f64,
    /// Stagger angle [deg].
    pub stagger_angle: f64,
    /// Throat opening (minimum flow passage width) [m].
    pub opening: f64,
    /// Leading-edge diameter [m].
    pub diameter_le: f64,
    /// Leading-edge wedge angle [deg].
    pub wedge_angle_le: f64,
    /// Inlet metal angle [deg].
    pub metal_angle_le: f64,
    /// Exit metal angle [deg].
    pub metal_angle_te: f64,
    /// Trailing-edge thickness [m].
    pub thickness_te: f64,
    /// Tip clearance gap [m].
    pub tip_clearance: f64,
    /// Maximum blade thickness [m].
    pub thickness_max: f64,
}

/// Parameters for which the model tolerates (and expects) negative values:
/// turning direction flips sign across stator/rotor rows and across the
/// mean line, so only angles are exempt from the non-negativity check.
const NON_NEGATIVE_EXEMPT_ANGLES: bool = true;

impl CascadeGeometry {
    /// Validate internal consistency: radii must be positive and ordered
    /// (tip above hub), and every non-angle geometric quantity must be
    /// non-negative.
    pub fn validate(&self) -> GeometryResult<()> {
        let _ = NON_NEGATIVE_EXEMPT_ANGLES;
        let checks: &[(&str, f64)] = &[
            ("radius_hub_in", self.radius_hub_in),
            ("radius_hub_out", self.radius_hub_out),
            ("radius_tip_in", self.radius_tip_in),
            ("radius_tip_out", self.radius_tip_out),
            ("pitch", self.pitch),
            ("chord", self.chord),
            ("opening", self.opening),
            ("diameter_le", self.diameter_le),
            ("thickness_te", self.thickness_te),
            ("tip_clearance", self.tip_clearance),
            ("thickness_max", self.thickness_max),
            ("wedge_angle_le", self.wedge_angle_le),
        ];
        for (name, value) in checks {
            if !value.is_finite() {
                return Err(GeometryError::InvalidConfiguration {
                    what: format!("{name} must be finite, got {value}"),
                });
            }
            if *value < 0.0 {
                return Err(GeometryError::InvalidConfiguration {
                    what: format!("{name} must be non-negative, got {value}"),
                });
            }
        }
        for (name, value) in [
            ("stagger_angle", self.stagger_angle),
            ("metal_angle_le", self.metal_angle_le),
            ("metal_angle_te", self.metal_angle_te),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::InvalidConfiguration {
                    what: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.radius_tip_in <= self.radius_hub_in {
            return Err(GeometryError::InvalidConfiguration {
                what: "radius_tip_in must exceed radius_hub_in".to_string(),
            });
        }
        if self.radius_tip_out <= self.radius_hub_out {
            return Err(GeometryError::InvalidConfiguration {
                what: "radius_tip_out must exceed radius_hub_out".to_string(),
            });
        }
        if self.chord <= 0.0 || self.pitch <= 0.0 {
            return Err(GeometryError::InvalidConfiguration {
                what: "chord and pitch must be strictly positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CascadeGeometry {
        CascadeGeometry {
            cascade_type: CascadeType::Stator,
            radius_hub_in: 0.09,
            radius_hub_out: 0.085,
            radius_tip_in: 0.11,
            radius_tip_out: 0.115,
            pitch: 0.02,
            chord: 0.03,
            stagger_angle: 30.0,
            opening: 0.01,
            diameter_le: 0.002,
            wedge_angle_le: 20.0,
            metal_angle_le: 0.0,
            metal_angle_te: -65.0,
            thickness_te: 0.001,
            tip_clearance: 0.0005,
            thickness_max: 0.005,
        }
    }

    #[test]
    fn valid_geometry_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_tip_below_hub() {
        let mut g = sample();
        g.radius_tip_in = g.radius_hub_in;
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_negative_chord() {
        let mut g = sample();
        g.chord = -0.01;
        assert!(g.validate().is_err());
    }

    #[test]
    fn allows_negative_metal_angle() {
        let mut g = sample();
        g.metal_angle_te = -89.0;
        assert!(g.validate().is_ok());
    }
}
