//! Subsonic exit-flow-angle deviation models.
//!
//! Every cascade exit flow turns less than the blade metal angle would
//! suggest; these models estimate that shortfall (the deviation) as a
//! function of exit Mach number, blending smoothly from a low-speed
//! correlation towards zero deviation as the flow approaches its critical
//! (choking) condition.

use tm_core::degtrig::{arccosd, cosd};
use tm_core::numeric::{smooth_switch, BlendMethod};

/// Sharpness used to smooth the `Ma_exit` cutovers in the low/medium/
/// supersonic deviation blends: a transition width of roughly `0.01` in
/// Mach number, tight enough to leave the correlations' calibrated ranges
/// intact while remaining differentiable across the switch.
const MACH_SWITCH_SHARPNESS: f64 = 100.0;

use crate::error::{DeviationError, DeviationResult};

/// The deviation models available to a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviationModel {
    /// Aungier (2006): quintic blend between a low-speed correlation and
    /// zero deviation, referenced against the cascade's own critical Mach
    /// number.
    Aungier,
    /// Ainley-Mathieson (1951): a simpler low-speed correlation with the
    /// same quintic blend shape, but the supersonic cutoff is pinned at
    /// `Ma_exit >= 1` rather than at the critical Mach number.
    AinleyMathieson,
    /// Exit flow leaves exactly at the gauging angle (no deviation) at every
    /// subsonic condition.
    ZeroDeviation,
    /// Borg-Agromayor: a single smoothstep-like blend from the low-speed
    /// incidence angle to the metal angle, parameterized directly by the
    /// critical Mach number (no separate low/medium-speed split).
    BorgAgromayor,
}

/// Everything a deviation model needs to know about the cascade's current
/// operating point and geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationInput {
    /// Mach number at the plane where the deviation is evaluated.
    pub ma_exit: f64,
    /// Critical Mach number the blend is referenced against.
    pub ma_crit_exit: f64,
    /// Exit metal (blade) angle [deg].
    pub metal_angle_te: f64,
    /// Throat area [m^2], used only by [`DeviationModel::BorgAgromayor`]-
    /// adjacent gauging-angle calculations.
    pub area_throat: f64,
    /// Exit area [m^2].
    pub area_exit: f64,
}

impl DeviationInput {
    fn validate(&self) -> DeviationResult<()> {
        let fields: &[(&str, f64)] = &[
            ("ma_exit", self.ma_exit),
            ("ma_crit_exit", self.ma_crit_exit),
            ("metal_angle_te", self.metal_angle_te),
            ("area_throat", self.area_throat),
            ("area_exit", self.area_exit),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(DeviationError::InvalidInput {
                    what: format!("{name} must be finite, got {v}"),
                });
            }
        }
        if self.area_exit <= 0.0 {
            return Err(DeviationError::InvalidInput {
                what: "area_exit must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// The quintic blend `1 - 10X^3 + 15X^4 - 6X^5` shared by the Aungier and
/// Ainley-Mathieson low/medium-speed correlations.
fn quintic_blend(x: f64) -> f64 {
    1.0 - 10.0 * x.powi(3) + 15.0 * x.powi(4) - 6.0 * x.powi(5)
}

impl DeviationModel {
    /// Subsonic (and choked-limit) exit relative flow angle, in degrees.
    pub fn exit_flow_angle(&self, input: DeviationInput) -> DeviationResult<f64> {
        input.validate()?;
        let angle = match self {
            DeviationModel::Aungier => exit_flow_angle_aungier(input),
            DeviationModel::AinleyMathieson => exit_flow_angle_ainley_mathieson(input),
            DeviationModel::ZeroDeviation => exit_flow_angle_zero_deviation(input),
            DeviationModel::BorgAgromayor => exit_flow_angle_borg_agromayor(input),
        };
        Ok(angle)
    }
}

fn exit_flow_angle_aungier(input: DeviationInput) -> f64 {
    let gauging_angle = arccosd(input.area_throat / input.area_exit);
    let beta_g = 90.0 - gauging_angle.abs();
    let delta_0 = low_speed_exit_angle_aungier(gauging_angle, beta_g) - beta_g;

    let mid = {
        let x = (2.0 * input.ma_exit - 1.0) / (2.0 * input.ma_crit_exit - 1.0);
        delta_0 * quintic_blend(x)
    };
    let upper = smooth_switch(
        input.ma_exit,
        input.ma_crit_exit,
        mid,
        0.0,
        BlendMethod::LogSumExp,
        MACH_SWITCH_SHARPNESS,
    );
    let delta = smooth_switch(
        input.ma_exit,
        0.50,
        delta_0,
        upper,
        BlendMethod::LogSumExp,
        MACH_SWITCH_SHARPNESS,
    );

    gauging_angle.abs() - delta
}

/// `arcsind(cosd(gauging_angle) * (1 + (1 - cosd(gauging_angle)) * (beta_g/90)^2))`
fn low_speed_exit_angle_aungier(gauging_angle: f64, beta_g: f64) -> f64 {
    let c = cosd(gauging_angle);
    let arg = c * (1.0 + (1.0 - c) * (beta_g / 90.0).powi(2));
    arg.clamp(-1.0, 1.0).asin().to_degrees()
}

fn exit_flow_angle_ainley_mathieson(input: DeviationInput) -> f64 {
    let gauging_angle = arccosd(input.area_throat / input.area_exit);
    let delta_0 =
        gauging_angle.abs() - (35.0 + (80.0 - 35.0) / (79.0 - 40.0) * (gauging_angle.abs() - 40.0));

    // Note: the supersonic cutoff here is pinned to Ma_exit >= 1, unlike the
    // Aungier model which cuts off at Ma_crit_exit.
    let mid = {
        let x = (2.0 * input.ma_exit - 1.0) / (2.0 * input.ma_crit_exit - 1.0);
        delta_0 * quintic_blend(x)
    };
    let upper = smooth_switch(
        input.ma_exit,
        1.00,
        mid,
        0.0,
        BlendMethod::LogSumExp,
        MACH_SWITCH_SHARPNESS,
    );
    let delta = smooth_switch(
        input.ma_exit,
        0.50,
        delta_0,
        upper,
        BlendMethod::LogSumExp,
        MACH_SWITCH_SHARPNESS,
    );

    gauging_angle.abs() - delta
}

fn exit_flow_angle_zero_deviation(input: DeviationInput) -> f64 {
    arccosd(input.area_throat / input.area_exit)
}

fn exit_flow_angle_borg_agromayor(input: DeviationInput) -> f64 {
    let gauging_angle = arccosd(input.area_throat / input.area_exit).abs();
    let beta_inc = 35.0 + (80.0 - 35.0) / (79.0 - 40.0) * (gauging_angle - 40.0);
    let ma_inc = 0.5;

    let x = (input.ma_exit - ma_inc) / (input.ma_crit_exit - ma_inc);
    let y = if x > 0.0 { x.powi(2) * (2.0 - x) } else { 0.0 };

    beta_inc + (gauging_angle - beta_inc) * y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input(ma_exit: f64) -> DeviationInput {
        DeviationInput {
            ma_exit,
            ma_crit_exit: 0.95,
            metal_angle_te: -65.0,
            area_throat: 0.01,
            area_exit: 0.012,
        }
    }

    fn gauging_angle(input: &DeviationInput) -> f64 {
        arccosd(input.area_throat / input.area_exit)
    }

    #[test]
    fn aungier_reaches_zero_deviation_past_critical() {
        let input = base_input(0.99);
        let beta = DeviationModel::Aungier.exit_flow_angle(input).unwrap();
        assert!((beta - gauging_angle(&input)).abs() < 1e-9);
    }

    #[test]
    fn aungier_low_speed_deviation_is_constant_below_half_mach() {
        let beta_a = DeviationModel::Aungier.exit_flow_angle(base_input(0.1)).unwrap();
        let beta_b = DeviationModel::Aungier.exit_flow_angle(base_input(0.4)).unwrap();
        assert!((beta_a - beta_b).abs() < 1e-12);
    }

    #[test]
    fn ainley_mathieson_supersonic_cutoff_is_literally_one() {
        let mut input = base_input(0.97);
        input.ma_crit_exit = 0.90;
        let beta = DeviationModel::AinleyMathieson.exit_flow_angle(input).unwrap();
        assert!(beta < gauging_angle(&input));
    }

    #[test]
    fn zero_deviation_ignores_mach_number() {
        let input_low = base_input(0.1);
        let input_high = base_input(0.9);
        let beta_low = DeviationModel::ZeroDeviation.exit_flow_angle(input_low).unwrap();
        let beta_high = DeviationModel::ZeroDeviation.exit_flow_angle(input_high).unwrap();
        assert!((beta_low - beta_high).abs() < 1e-12);
    }

    #[test]
    fn borg_agromayor_is_metal_angle_at_critical_mach() {
        let mut input = base_input(0.0);
        input.ma_exit = input.ma_crit_exit;
        let beta = DeviationModel::BorgAgromayor.exit_flow_angle(input).unwrap();
        assert!((beta - gauging_angle(&input)).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_finite_input() {
        let mut input = base_input(f64::NAN);
        input.ma_exit = f64::NAN;
        assert!(DeviationModel::Aungier.exit_flow_angle(input).is_err());
    }
}
