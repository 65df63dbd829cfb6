//! YAML configuration schema.
//!
//! Deserializes the `operation_points`, `performance_map`, `geometry`,
//! `model_options`, and `solver` sections into the types `tm-geometry` and
//! `tm-driver` already consume, rather than inventing a parallel config-only
//! representation. Every field is validated before the run starts: a
//! malformed or out-of-range value becomes `CliError::InvalidConfiguration`
//! here, never a panic or a failed solve later.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tm_cascade::{ChokingModel, ThroatBlockage};
use tm_deviation::DeviationModel;
use tm_driver::{ModelConfig, OperatingPoint, PerformanceMap};
use tm_fluids::IdealGasOracle;
use tm_geometry::{CascadeGeometry, CascadeType, MachineGeometry};
use tm_solver::{NewtonConfig, SolverMethod};

use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CascadeTypeConfig {
    Stator,
    Rotor,
}

impl From<CascadeTypeConfig> for CascadeType {
    fn from(value: CascadeTypeConfig) -> Self {
        match value {
            CascadeTypeConfig::Stator => CascadeType::Stator,
            CascadeTypeConfig::Rotor => CascadeType::Rotor,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CascadeGeometryConfig {
    cascade_type: CascadeTypeConfig,
    radius_hub_in: f64,
    radius_hub_out: f64,
    radius_tip_in: f64,
    radius_tip_out: f64,
    pitch: f64,
    chord: f64,
    stagger_angle: f64,
    opening: f64,
    diameter_le: f64,
    wedge_angle_le: f64,
    metal_angle_le: f64,
    metal_angle_te: f64,
    thickness_te: f64,
    tip_clearance: f64,
    thickness_max: f64,
}

impl From<CascadeGeometryConfig> for CascadeGeometry {
    fn from(c: CascadeGeometryConfig) -> Self {
        CascadeGeometry {
            cascade_type: c.cascade_type.into(),
            radius_hub_in: c.radius_hub_in,
            radius_hub_out: c.radius_hub_out,
            radius_tip_in: c.radius_tip_in,
            radius_tip_out: c.radius_tip_out,
            pitch: c.pitch,
            chord: c.chord,
            stagger_angle: c.stagger_angle,
            opening: c.opening,
            diameter_le: c.diameter_le,
            wedge_angle_le: c.wedge_angle_le,
            metal_angle_le: c.metal_angle_le,
            metal_angle_te: c.metal_angle_te,
            thickness_te: c.thickness_te,
            tip_clearance: c.tip_clearance,
            thickness_max: c.thickness_max,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeometryConfig {
    cascades: Vec<CascadeGeometryConfig>,
}

#[derive(Debug, Deserialize)]
struct OperatingPointConfig {
    p0_in: f64,
    t0_in: f64,
    p_out: f64,
    #[serde(default)]
    alpha_in: f64,
    #[serde(default)]
    omega: f64,
}

#[derive(Debug, Deserialize)]
struct PerformanceMapConfig {
    #[serde(default)]
    p0_in: Vec<f64>,
    #[serde(default)]
    t0_in: Vec<f64>,
    #[serde(default)]
    p_out: Vec<f64>,
    #[serde(default)]
    alpha_in: Vec<f64>,
    #[serde(default)]
    omega: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ChokingModelConfig {
    EvaluateCascadeCritical,
    EvaluateCascadeThroat,
    EvaluateCascadeIsentropicThroat,
}

impl From<ChokingModelConfig> for ChokingModel {
    fn from(value: ChokingModelConfig) -> Self {
        match value {
            ChokingModelConfig::EvaluateCascadeCritical => ChokingModel::Critical,
            ChokingModelConfig::EvaluateCascadeThroat => ChokingModel::Throat,
            ChokingModelConfig::EvaluateCascadeIsentropicThroat => ChokingModel::IsentropicThroat,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DeviationModelConfig {
    Aungier,
    AinleyMathieson,
    ZeroDeviation,
    BorgAgromayor,
}

impl From<DeviationModelConfig> for DeviationModel {
    fn from(value: DeviationModelConfig) -> Self {
        match value {
            DeviationModelConfig::Aungier => DeviationModel::Aungier,
            DeviationModelConfig::AinleyMathieson => DeviationModel::AinleyMathieson,
            DeviationModelConfig::ZeroDeviation => DeviationModel::ZeroDeviation,
            DeviationModelConfig::BorgAgromayor => DeviationModel::BorgAgromayor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BlockageModelConfig {
    FlatPlateTurbulent,
    None,
    Fixed(f64),
}

impl From<BlockageModelConfig> for ThroatBlockage {
    fn from(value: BlockageModelConfig) -> Self {
        match value {
            BlockageModelConfig::FlatPlateTurbulent => ThroatBlockage::FlatPlateTurbulent,
            BlockageModelConfig::None => ThroatBlockage::None,
            BlockageModelConfig::Fixed(value) => ThroatBlockage::Fixed(value),
        }
    }
}

fn default_loss_model() -> String {
    "benner".to_string()
}

fn default_blockage_model() -> BlockageModelConfig {
    BlockageModelConfig::FlatPlateTurbulent
}

fn default_rel_step_fd() -> f64 {
    1e-6
}

#[derive(Debug, Deserialize)]
struct ModelOptionsConfig {
    #[serde(default = "default_loss_model")]
    loss_model: String,
    choking_model: ChokingModelConfig,
    deviation_model: DeviationModelConfig,
    #[serde(default = "default_blockage_model")]
    blockage_model: BlockageModelConfig,
    #[serde(default = "default_rel_step_fd")]
    rel_step_fd: f64,
}

/// `lm` selects the Levenberg-Marquardt-equivalent damped Newton core with
/// backtracking line search; `hybr` selects Powell's hybrid dogleg
/// trust-region method. See `tm_solver::SolverMethod`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SolverMethodConfig {
    Lm,
    Hybr,
}

impl From<SolverMethodConfig> for SolverMethod {
    fn from(value: SolverMethodConfig) -> Self {
        match value {
            SolverMethodConfig::Lm => SolverMethod::LevenbergMarquardt,
            SolverMethodConfig::Hybr => SolverMethod::PowellHybrid,
        }
    }
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    200
}

/// `derivative_method` and `derivative_rel_step` are accepted and validated
/// for schema compatibility, but neither one reaches `NewtonConfig` yet --
/// the Jacobian step is fixed to forward differences at a compiled-in
/// relative step, not a user-selectable knob.
#[derive(Debug, Deserialize)]
struct SolverConfig {
    #[serde(default)]
    method: Option<SolverMethodConfig>,
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    #[serde(default = "default_max_iterations")]
    max_iterations: usize,
    #[serde(default)]
    #[allow(dead_code)]
    derivative_method: Option<String>,
    #[serde(default = "default_tolerance")]
    #[allow(dead_code)]
    derivative_rel_step: f64,
}

#[derive(Debug, Deserialize)]
struct FluidConfig {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RunConfig {
    fluid: FluidConfig,
    #[serde(default)]
    operation_points: Vec<OperatingPointConfig>,
    #[serde(default)]
    performance_map: Option<PerformanceMapConfig>,
    geometry: GeometryConfig,
    model_options: ModelOptionsConfig,
    #[serde(default)]
    solver: Option<SolverConfig>,
}

/// Everything a run needs, after validation: ready-to-use domain types
/// instead of the raw deserialized schema.
pub struct LoadedConfig {
    pub fluid_name: String,
    pub fluid: IdealGasOracle,
    pub geometry: MachineGeometry,
    pub model: ModelConfig,
    pub points: Vec<OperatingPoint>,
    pub performance_map: Option<PerformanceMap>,
    pub newton_config: NewtonConfig,
}

pub fn load_config(path: &Path) -> CliResult<LoadedConfig> {
    let content = fs::read_to_string(path)?;
    let raw: RunConfig = serde_yaml::from_str(&content)?;

    if raw.geometry.cascades.is_empty() {
        return Err(CliError::InvalidConfiguration {
            what: "geometry.cascades must contain at least one cascade".to_string(),
        });
    }
    if raw.operation_points.is_empty() && raw.performance_map.is_none() {
        return Err(CliError::InvalidConfiguration {
            what: "configuration must specify at least one of operation_points or performance_map"
                .to_string(),
        });
    }
    if let Some(map) = &raw.performance_map {
        let fields: &[(&str, &Vec<f64>)] = &[
            ("p0_in", &map.p0_in),
            ("t0_in", &map.t0_in),
            ("p_out", &map.p_out),
            ("alpha_in", &map.alpha_in),
            ("omega", &map.omega),
        ];
        for (name, values) in fields {
            if values.is_empty() {
                return Err(CliError::InvalidConfiguration {
                    what: format!("performance_map.{name} must list at least one value"),
                });
            }
        }
    }
    if raw.model_options.loss_model != "benner" {
        return Err(CliError::InvalidConfiguration {
            what: format!(
                "unknown loss_model '{}'; only 'benner' is implemented",
                raw.model_options.loss_model
            ),
        });
    }
    if let Some(solver) = &raw.solver {
        if solver.tolerance <= 0.0 {
            return Err(CliError::InvalidConfiguration {
                what: format!("solver.tolerance must be positive, got {}", solver.tolerance),
            });
        }
        if solver.max_iterations == 0 {
            return Err(CliError::InvalidConfiguration {
                what: "solver.max_iterations must be at least 1".to_string(),
            });
        }
    }

    let fluid = match raw.fluid.name.as_str() {
        "air" | "ideal-gas" => IdealGasOracle::air(),
        other => {
            return Err(CliError::InvalidConfiguration {
                what: format!("unknown fluid '{other}'; only 'air' (ideal gas) is built in"),
            });
        }
    };

    let cascades: Vec<CascadeGeometry> = raw
        .geometry
        .cascades
        .into_iter()
        .map(CascadeGeometry::from)
        .collect();
    let geometry = MachineGeometry::build(cascades)?;

    let model = ModelConfig {
        deviation_model: raw.model_options.deviation_model.into(),
        choking_model: raw.model_options.choking_model.into(),
        blockage: raw.model_options.blockage_model.into(),
        loss_options: Default::default(),
        rel_step_fd: raw.model_options.rel_step_fd,
    };

    let fluid_name = raw.fluid.name.clone();
    let points: Vec<OperatingPoint> = raw
        .operation_points
        .into_iter()
        .map(|p| OperatingPoint {
            fluid_name: fluid_name.clone(),
            p0_in: p.p0_in,
            t0_in: p.t0_in,
            p_out: p.p_out,
            alpha_in: p.alpha_in,
            omega: p.omega,
        })
        .collect();
    for point in &points {
        point.validate()?;
    }

    let performance_map = raw.performance_map.map(|m| PerformanceMap {
        fluid_name: fluid_name.clone(),
        p0_in: m.p0_in,
        t0_in: m.t0_in,
        p_out: m.p_out,
        alpha_in: m.alpha_in,
        omega: m.omega,
    });

    let solver = raw.solver.unwrap_or(SolverConfig {
        method: None,
        tolerance: default_tolerance(),
        max_iterations: default_max_iterations(),
        derivative_method: None,
        derivative_rel_step: default_tolerance(),
    });
    let newton_config = NewtonConfig {
        method: solver.method.map(SolverMethod::from).unwrap_or_default(),
        max_iterations: solver.max_iterations,
        abs_tol: solver.tolerance,
        rel_tol: solver.tolerance,
        ..NewtonConfig::default()
    };

    Ok(LoadedConfig {
        fluid_name,
        fluid,
        geometry,
        model,
        points,
        performance_map,
        newton_config,
    })
}
