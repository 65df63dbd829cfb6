//! The Kacker-Okapuu / Benner loss model: five additive loss coefficients
//! (profile, trailing edge, secondary, tip clearance, incidence), three of
//! which are corrected for the penetration depth of secondary-flow
//! structures into the blade passage.

use tm_core::degtrig::{arctand, cosd, tand};
use tm_core::numeric::{smooth_min, smooth_switch, BlendMethod};
use tm_geometry::CascadeType;

use crate::error::{LossError, LossResult};

/// Sharpness used to smooth the Reynolds-number knots in [`profile_loss`]'s
/// `f_re` (thresholds at `2e5` and `1e6`): a transition width of ~2e4.
const RE_SWITCH_SHARPNESS: f64 = 5e-5;
/// Sharpness used to smooth Mach-number knots (thresholds like `0.2`, `1.0`):
/// a transition width of ~0.02.
const MA_SWITCH_SHARPNESS: f64 = 50.0;
/// Sharpness used to smooth the `phi` (blade turning angle) knots in
/// [`nozzle_blades`]/[`impulse_blades`] (thresholds at `27`/`30` deg): a
/// transition width of ~1 deg.
const PHI_SWITCH_SHARPNESS: f64 = 1.0;
/// Sharpness used to smooth the aspect-ratio knot in [`secondary_loss`]
/// (threshold at `2.0`): a transition width of ~0.1.
const AR_SWITCH_SHARPNESS: f64 = 10.0;
/// Sharpness used to smooth the incidence-parameter knots in
/// [`incidence_profile_loss_increment`].
const CHI_SWITCH_SHARPNESS: f64 = 20.0;

/// Flow conditions at the cascade inlet/outlet needed by the loss model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossFlowInput {
    pub re_in: f64,
    pub re_out: f64,
    pub ma_rel_in: f64,
    pub ma_rel_out: f64,
    pub p0_rel_in: f64,
    pub p_in: f64,
    pub p0_rel_out: f64,
    pub p_out: f64,
    pub beta_in: f64,
    pub beta_out: f64,
    /// Ratio of specific heats at the cascade exit, used to convert the
    /// incidence loss's kinetic-energy-coefficient form into a pressure
    /// loss coefficient.
    pub gamma_out: f64,
}

/// Geometric parameters the loss model reads; a subset of
/// [`tm_geometry::CascadeGeometry`]/[`tm_geometry::CascadeGeometryDerived`]
/// gathered into one place for convenience.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossGeometryInput {
    pub cascade_type: CascadeType,
    pub hub_tip_ratio_in: f64,
    pub pitch: f64,
    pub chord: f64,
    pub axial_chord: f64,
    pub stagger_angle: f64,
    pub metal_angle_le: f64,
    pub metal_angle_te: f64,
    pub thickness_max: f64,
    pub thickness_te: f64,
    pub opening: f64,
    pub height: f64,
    pub tip_clearance: f64,
    pub diameter_le: f64,
    pub wedge_angle_le: f64,
}

/// Tunable model options (spec §6, `loss_model` config block).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossModelOptions {
    pub inlet_displacement_thickness_height_ratio: f64,
}

impl Default for LossModelOptions {
    fn default() -> Self {
        Self {
            inlet_displacement_thickness_height_ratio: 0.011,
        }
    }
}

/// The five additive loss coefficients plus their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossBreakdown {
    pub profile: f64,
    pub trailing_edge: f64,
    pub secondary: f64,
    pub tip_clearance: f64,
    pub incidence: f64,
    pub total: f64,
}

fn check_finite(name: &'static str, value: f64) -> LossResult<()> {
    if !value.is_finite() {
        return Err(LossError::InvalidInput {
            what: format!("{name} must be finite, got {value}"),
        });
    }
    Ok(())
}

/// Evaluate every loss component for one cascade at one operating point.
pub fn compute_losses(
    flow: &LossFlowInput,
    geometry: &LossGeometryInput,
    options: &LossModelOptions,
) -> LossResult<LossBreakdown> {
    check_finite("re_out", flow.re_out)?;
    check_finite("ma_rel_out", flow.ma_rel_out)?;
    if flow.p0_rel_out - flow.p_out == 0.0 {
        return Err(LossError::InvalidInput {
            what: "p0_rel_out - p_out must be nonzero".to_string(),
        });
    }

    let beta_des = geometry.metal_angle_le;

    let delta_height = options.inlet_displacement_thickness_height_ratio
        * (flow.re_in / 3e5).powf(-1.0 / 7.0);

    let mut y_p = profile_loss(flow, geometry);
    let mut y_te = trailing_edge_loss(flow, geometry);
    let y_s = secondary_loss(flow, geometry, delta_height);
    let y_cl = tip_clearance_loss(flow, geometry);
    let mut y_inc = incidence_loss(flow, geometry, beta_des);

    let z_te = penetration_depth(flow, geometry, delta_height);
    y_p *= 1.0 - z_te;
    y_te *= 1.0 - z_te;
    y_inc *= 1.0 - z_te;

    Ok(LossBreakdown {
        profile: y_p,
        trailing_edge: y_te,
        secondary: y_s,
        tip_clearance: y_cl,
        incidence: y_inc,
        total: y_p + y_te + y_s + y_cl + y_inc,
    })
}

fn profile_loss(flow: &LossFlowInput, geometry: &LossGeometryInput) -> f64 {
    let re = flow.re_out;
    let ma_rel_out = flow.ma_rel_out;
    let ma_rel_in = flow.ma_rel_in;

    let f_re_low = (re / 2e5).powf(-0.4);
    let f_re_high = (re / 1e6).powf(-0.2);
    let f_re_mid = smooth_switch(re, 1e6, 1.0, f_re_high, BlendMethod::LogSumExp, RE_SWITCH_SHARPNESS);
    let f_re = smooth_switch(re, 2e5, f_re_low, f_re_mid, BlendMethod::LogSumExp, RE_SWITCH_SHARPNESS);

    let f_ma_high = 1.0 + 60.0 * (ma_rel_out - 1.0).powi(2);
    let f_ma = smooth_switch(
        ma_rel_out,
        1.0,
        1.0,
        f_ma_high,
        BlendMethod::LogSumExp,
        MA_SWITCH_SHARPNESS,
    );

    let f_hub = hub_to_mean_mach_ratio(geometry.hub_tip_ratio_in, geometry.cascade_type);
    let a = (f_hub * ma_rel_in - 0.4).max(0.0);
    let mut y_shock =
        0.75 * a.powf(1.75) * geometry.hub_tip_ratio_in * (flow.p0_rel_in - flow.p_in)
            / (flow.p0_rel_out - flow.p_out);
    y_shock = y_shock.max(0.0);

    let (kp, _k2, _k1) = compressible_correction_factors(ma_rel_in, ma_rel_out);

    let angle_out_bis = flow.beta_out.abs().max(40.0);
    let r_sc = geometry.pitch / geometry.chord;
    let yp_reaction = nozzle_blades(r_sc, angle_out_bis);
    let yp_impulse = impulse_blades(r_sc, angle_out_bis);

    let theta_in = geometry.metal_angle_le;
    let ratio = theta_in / flow.beta_out;
    let mut y_p = yp_reaction - ratio.abs() * ratio * (yp_impulse - yp_reaction);
    y_p = y_p.max(0.8 * yp_reaction);

    let aa = (-ratio).max(0.0);
    y_p *= ((geometry.thickness_max / geometry.chord) / 0.2).powf(aa);
    y_p = 0.914 * (2.0 / 3.0 * y_p * kp + y_shock);

    f_re * f_ma * y_p
}

fn trailing_edge_loss(flow: &LossFlowInput, geometry: &LossGeometryInput) -> f64 {
    let r_to_data = [0.0, 0.2, 0.4];
    let phi_data_reaction = [0.0, 0.045, 0.15];
    let phi_data_impulse = [0.0, 0.025, 0.075];

    let r_to = (geometry.thickness_te / geometry.opening).min(0.4);

    let d_phi2_reaction = linear_interp(r_to, &r_to_data, &phi_data_reaction);
    let d_phi2_impulse = linear_interp(r_to, &r_to_data, &phi_data_impulse);

    let angle_in = geometry.metal_angle_le;
    let angle_out = flow.beta_out;
    let ratio = angle_in / angle_out;
    let mut d_phi2 =
        d_phi2_reaction - ratio.abs() * ratio * (d_phi2_impulse - d_phi2_reaction);
    d_phi2 = d_phi2.max(d_phi2_impulse / 2.0);

    1.0 / (1.0 - d_phi2) - 1.0
}

fn secondary_loss(flow: &LossFlowInput, geometry: &LossGeometryInput, delta_height: f64) -> f64 {
    let ar = geometry.height / geometry.chord;
    let cr = cosd(flow.beta_in) / cosd(flow.beta_out);
    let stagger = geometry.stagger_angle;

    let low_ar = {
        let denom = cosd(stagger).sqrt()
            * cr
            * ar.powf(0.55)
            * (cosd(flow.beta_out) / cosd(stagger)).powf(0.55);
        (0.038 + 0.41 * (1.2 * delta_height).tanh()) / denom
    };
    let high_ar = {
        let denom =
            cosd(stagger).sqrt() * cr * ar * (cosd(flow.beta_out) / cosd(stagger)).powf(0.55);
        (0.052 + 0.56 * (1.2 * delta_height).tanh()) / denom
    };
    smooth_switch(ar, 2.0, low_ar, high_ar, BlendMethod::LogSumExp, AR_SWITCH_SHARPNESS)
}

fn tip_clearance_loss(flow: &LossFlowInput, geometry: &LossGeometryInput) -> f64 {
    let angle_m = arctand((tand(flow.beta_in) + tand(flow.beta_out)) / 2.0);
    let z = 4.0 * (tand(flow.beta_in) - tand(flow.beta_out)).powi(2) * cosd(flow.beta_out).powi(2)
        / cosd(angle_m);

    let b = match geometry.cascade_type {
        CascadeType::Stator => 0.0,
        CascadeType::Rotor => 0.37,
    };

    b * z * geometry.chord / geometry.height * (geometry.tip_clearance / geometry.height).powf(0.78)
}

fn incidence_loss(flow: &LossFlowInput, geometry: &LossGeometryInput, beta_des: f64) -> f64 {
    let chi = incidence_parameter(
        geometry.diameter_le,
        geometry.pitch,
        geometry.wedge_angle_le,
        geometry.metal_angle_le,
        geometry.metal_angle_te,
        flow.beta_in,
        beta_des,
    );
    let d_phip = incidence_profile_loss_increment(chi, 5.0, Some(0.5));
    convert_kinetic_energy_coefficient(d_phip, flow.gamma_out, flow.ma_rel_out)
}

fn hub_to_mean_mach_ratio(r_ht: f64, cascade_type: CascadeType) -> f64 {
    let r_ht = r_ht.max(0.5);
    let r_ht_data = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
    let f_data = match cascade_type {
        CascadeType::Stator => [1.4, 1.18, 1.05, 1.0, 1.0, 1.0],
        CascadeType::Rotor => [2.15, 1.7, 1.35, 1.12, 1.0, 1.0],
    };
    linear_interp(r_ht, &r_ht_data, &f_data)
}

fn compressible_correction_factors(ma_rel_in: f64, ma_rel_out: f64) -> (f64, f64, f64) {
    let k1_mid = 1.0 - 1.25 * (ma_rel_out - 0.2);
    let k1_upper = smooth_switch(
        ma_rel_out,
        1.0,
        k1_mid,
        0.0,
        BlendMethod::LogSumExp,
        MA_SWITCH_SHARPNESS,
    );
    let k1 = smooth_switch(
        ma_rel_out,
        0.2,
        1.0,
        k1_upper,
        BlendMethod::LogSumExp,
        MA_SWITCH_SHARPNESS,
    );
    let k2 = (ma_rel_in / ma_rel_out).powi(2);
    let kp = (1.0 - k2 * (1.0 - k1)).max(0.1);
    (kp, k2, k1)
}

fn nozzle_blades(r_sc: f64, angle_out: f64) -> f64 {
    let phi = 90.0 - angle_out;
    let r_sc_min = smooth_switch(
        phi,
        30.0,
        0.46 + phi / 77.0,
        0.614 + phi / 130.0,
        BlendMethod::LogSumExp,
        PHI_SWITCH_SHARPNESS,
    );
    let x = r_sc - r_sc_min;
    let a = smooth_switch(
        phi,
        27.0,
        0.025 + (27.0 - phi) / 530.0,
        0.025 + (27.0 - phi) / 3085.0,
        BlendMethod::LogSumExp,
        PHI_SWITCH_SHARPNESS,
    );
    let b = 0.1583 - phi / 1640.0;
    let c = 0.08 * ((phi / 30.0).powi(2) - 1.0);
    let n = 1.0 + phi / 30.0;
    let low_phi = a + b * x.powi(2) + c * x.powi(3);
    let high_phi = a + b * x.abs().powf(n);
    smooth_switch(phi, 30.0, low_phi, high_phi, BlendMethod::LogSumExp, PHI_SWITCH_SHARPNESS)
}

fn impulse_blades(r_sc: f64, angle_out: f64) -> f64 {
    let phi = 90.0 - angle_out;
    let r_sc_min = 0.224 + 1.575 * (phi / 90.0) - (phi / 90.0).powi(2);
    let x = r_sc - r_sc_min;
    let a = 0.242 - phi / 151.0 + (phi / 127.0).powi(2);
    let b = smooth_switch(
        phi,
        30.0,
        0.3 + (30.0 - phi) / 50.0,
        0.3 + (30.0 - phi) / 275.0,
        BlendMethod::LogSumExp,
        PHI_SWITCH_SHARPNESS,
    );
    let c = 0.88 - phi / 42.4 + (phi / 72.8).powi(2);
    a + b * x.powi(2) - c * x.powi(3)
}

fn penetration_depth(flow: &LossFlowInput, geometry: &LossGeometryInput, delta_height: f64) -> f64 {
    let cr = cosd(flow.beta_in) / cosd(flow.beta_out);
    let bsx = geometry.axial_chord / geometry.pitch;
    let ar = geometry.height / geometry.chord;

    let ft = ft_blade_loading(bsx, flow.beta_in, flow.beta_out);

    let z_te = 0.10 * ft.powf(0.79) / cr.sqrt() / ar.powf(0.55) + 32.70 * delta_height.powi(2);
    z_te.min(0.99)
}

fn convert_kinetic_energy_coefficient(d_phi: f64, gamma: f64, ma_rel_out: f64) -> f64 {
    let denom = 1.0 - (1.0 + (gamma - 1.0) / 2.0 * ma_rel_out.powi(2)).powf(-gamma / (gamma - 1.0));
    let numer = (1.0 - (gamma - 1.0) / 2.0 * ma_rel_out.powi(2) * (1.0 / (1.0 - d_phi) - 1.0))
        .powf(-gamma / (gamma - 1.0))
        - 1.0;
    numer / denom
}

/// Coefficients for `chi >= 0`, degree 1..8 (lowest degree first).
const INCIDENCE_COEFFS_POS: [f64; 8] = [
    -6.149e-5, 1.327e-3, -2.506e-4, -1.542e-4, 9.017e-5, 1.106e-5, -5.318e-6, 3.711e-7,
];
/// Coefficients for `chi < 0`, degree 1..2 (lowest degree first).
const INCIDENCE_COEFFS_NEG: [f64; 2] = [-8.72e-4, 1.358e-4];

fn poly_eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(i, a)| a * x.powi(i as i32 + 1))
        .sum()
}

fn poly_slope(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let degree = i as i32 + 1;
            (degree as f64) * a * x.powi(degree - 1)
        })
        .sum()
}

fn incidence_profile_loss_increment(chi: f64, chi_extrapolation: f64, loss_limit: Option<f64>) -> f64 {
    let loss_poly = smooth_switch(
        chi,
        0.0,
        poly_eval(&INCIDENCE_COEFFS_NEG, chi),
        poly_eval(&INCIDENCE_COEFFS_POS, chi),
        BlendMethod::LogSumExp,
        CHI_SWITCH_SHARPNESS,
    );

    let loss = poly_eval(&INCIDENCE_COEFFS_POS, chi_extrapolation);
    let slope = poly_slope(&INCIDENCE_COEFFS_POS, chi_extrapolation);
    let loss_extrap = loss + slope * (chi - chi_extrapolation);

    let mut loss_increment = smooth_switch(
        chi,
        chi_extrapolation,
        loss_poly,
        loss_extrap,
        BlendMethod::LogSumExp,
        CHI_SWITCH_SHARPNESS,
    );

    if let Some(limit) = loss_limit {
        loss_increment = smooth_min(&[loss_increment, limit], BlendMethod::LogSumExp, 25.0);
    }

    loss_increment
}

fn incidence_parameter(
    le: f64,
    s: f64,
    we: f64,
    theta_in: f64,
    theta_out: f64,
    beta_in: f64,
    beta_des: f64,
) -> f64 {
    (le / s).powf(-0.05)
        * we.powf(-0.2)
        * (cosd(theta_in) / cosd(theta_out)).powf(-1.4)
        * (beta_in.abs() - beta_des.abs())
}

fn ft_blade_loading(bsx: f64, beta_in: f64, beta_out: f64) -> f64 {
    let a_m = arctand(0.5 * (tand(beta_in) + tand(beta_out)));
    2.0 / bsx * cosd(a_m).powi(2) * (tand(beta_in).abs() + tand(beta_out).abs())
}

/// `numpy.interp`-style linear interpolation with flat extrapolation at the
/// ends; `xs` must be sorted ascending.
fn linear_interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + t * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> LossFlowInput {
        LossFlowInput {
            re_in: 5e5,
            re_out: 5e5,
            ma_rel_in: 0.3,
            ma_rel_out: 0.7,
            p0_rel_in: 2.1e5,
            p_in: 1.9e5,
            p0_rel_out: 1.6e5,
            p_out: 1.4e5,
            beta_in: 20.0,
            beta_out: -65.0,
            gamma_out: 1.4,
        }
    }

    fn geometry() -> LossGeometryInput {
        LossGeometryInput {
            cascade_type: CascadeType::Stator,
            hub_tip_ratio_in: 0.8,
            pitch: 0.02,
            chord: 0.03,
            axial_chord: 0.026,
            stagger_angle: 30.0,
            metal_angle_le: 0.0,
            metal_angle_te: -65.0,
            thickness_max: 0.005,
            thickness_te: 0.001,
            opening: 0.01,
            height: 0.02,
            tip_clearance: 0.0005,
            diameter_le: 0.002,
            wedge_angle_le: 20.0,
        }
    }

    #[test]
    fn total_loss_is_sum_of_components() {
        let breakdown = compute_losses(&flow(), &geometry(), &LossModelOptions::default()).unwrap();
        let sum = breakdown.profile
            + breakdown.trailing_edge
            + breakdown.secondary
            + breakdown.tip_clearance
            + breakdown.incidence;
        assert!((breakdown.total - sum).abs() < 1e-12);
    }

    #[test]
    fn rotor_has_nonzero_tip_clearance_loss_stator_does_not() {
        let mut geo_rotor = geometry();
        geo_rotor.cascade_type = CascadeType::Rotor;
        let rotor_loss = tip_clearance_loss(&flow(), &geo_rotor);
        let stator_loss = tip_clearance_loss(&flow(), &geometry());
        assert_eq!(stator_loss, 0.0);
        assert!(rotor_loss > 0.0);
    }

    #[test]
    fn all_loss_components_are_finite_and_non_negative() {
        let breakdown = compute_losses(&flow(), &geometry(), &LossModelOptions::default()).unwrap();
        assert!(breakdown.profile.is_finite() && breakdown.profile >= 0.0);
        assert!(breakdown.trailing_edge.is_finite() && breakdown.trailing_edge >= 0.0);
        assert!(breakdown.secondary.is_finite() && breakdown.secondary >= 0.0);
        assert!(breakdown.incidence.is_finite());
    }

    #[test]
    fn rejects_degenerate_pressure_drop() {
        let mut bad_flow = flow();
        bad_flow.p0_rel_out = bad_flow.p_out;
        assert!(compute_losses(&bad_flow, &geometry(), &LossModelOptions::default()).is_err());
    }

    #[test]
    fn incidence_loss_increment_is_clamped_to_loss_limit() {
        let increment = incidence_profile_loss_increment(1000.0, 5.0, Some(0.5));
        assert!(increment < 0.51);
    }
}
