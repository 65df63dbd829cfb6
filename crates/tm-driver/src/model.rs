//! Turn a [`MachineGeometry`] plus model choices into the [`SeriesContext`]
//! `tm-assembly` needs to evaluate a cascade series.

use tm_assembly::{CascadeSpec, SeriesContext};
use tm_cascade::{ChokingModel, ExitGeometry, InletGeometry, ReferenceValues, ThroatBlockage};
use tm_deviation::DeviationModel;
use tm_fluids::PropertyOracle;
use tm_geometry::MachineGeometry;
use tm_loss::{LossGeometryInput, LossModelOptions};

/// Model choices applied uniformly to every cascade in a machine. A mixed
/// configuration (different choking models per row) is representable by
/// building [`CascadeSpec`]s directly instead of going through this helper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub deviation_model: DeviationModel,
    pub choking_model: ChokingModel,
    pub blockage: ThroatBlockage,
    pub loss_options: LossModelOptions,
    pub rel_step_fd: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            deviation_model: DeviationModel::Aungier,
            choking_model: ChokingModel::Throat,
            blockage: ThroatBlockage::FlatPlateTurbulent,
            loss_options: LossModelOptions::default(),
            rel_step_fd: 1e-6,
        }
    }
}

/// Build one [`CascadeSpec`] per cascade in `geometry`, applying `model` to
/// all of them.
pub fn build_cascade_specs(geometry: &MachineGeometry, model: &ModelConfig) -> Vec<CascadeSpec> {
    geometry
        .cascades
        .iter()
        .zip(&geometry.derived)
        .map(|(raw, derived)| CascadeSpec {
            cascade_type: raw.cascade_type,
            inlet_geometry: InletGeometry {
                radius_mean_in: derived.radius_mean_in,
                chord: raw.chord,
                area_in: derived.area_in,
            },
            exit_geometry: ExitGeometry {
                radius_mean: derived.radius_mean_out,
                area: derived.area_out,
                chord: raw.chord,
                opening: raw.opening,
            },
            throat_geometry: ExitGeometry {
                radius_mean: 0.5 * (derived.radius_throat_in + derived.radius_throat_out),
                area: derived.area_throat,
                chord: raw.chord,
                opening: raw.opening,
            },
            metal_angle_le: raw.metal_angle_le,
            metal_angle_te: raw.metal_angle_te,
            area_throat: derived.area_throat,
            area_exit: derived.area_out,
            loss_geometry: LossGeometryInput {
                cascade_type: raw.cascade_type,
                hub_tip_ratio_in: derived.hub_tip_ratio_in,
                pitch: raw.pitch,
                chord: raw.chord,
                axial_chord: derived.axial_chord,
                stagger_angle: raw.stagger_angle,
                metal_angle_le: raw.metal_angle_le,
                metal_angle_te: raw.metal_angle_te,
                thickness_max: raw.thickness_max,
                thickness_te: raw.thickness_te,
                opening: raw.opening,
                height: derived.height,
                tip_clearance: raw.tip_clearance,
                diameter_le: raw.diameter_le,
                wedge_angle_le: raw.wedge_angle_le,
            },
            deviation_model: model.deviation_model,
            choking_model: model.choking_model,
        })
        .collect()
}

/// Build the full [`SeriesContext`] for one solve: cascade specs plus the
/// shared fluid/blockage/loss/reference configuration.
pub fn build_series_context<'a>(
    geometry: &MachineGeometry,
    model: &'a ModelConfig,
    fluid: &'a dyn PropertyOracle,
    reference: &'a ReferenceValues,
) -> SeriesContext<'a> {
    SeriesContext {
        fluid,
        cascades: build_cascade_specs(geometry, model),
        blockage: model.blockage,
        loss_options: &model.loss_options,
        reference,
        rel_step_fd: model.rel_step_fd,
    }
}
