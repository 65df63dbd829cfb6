//! Quantities derived from a [`CascadeGeometry`] (areas, ratios, throat radii, ...).

use crate::raw::CascadeGeometry;
use tm_core::degtrig::cosd;

/// The Ainley-Mathieson rule of thumb for locating the throat radius between
/// the inlet and outlet mean radii: closer to the outlet radius because the
/// throat sits near the blade trailing edge.
pub fn throat_radius(radius_in: f64, radius_out: f64) -> f64 {
    (1.0 / 6.0) * radius_in + (5.0 / 6.0) * radius_out
}

/// Every quantity that follows mechanically from a [`CascadeGeometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeGeometryDerived {
    pub axial_chord: f64,
    pub radius_mean_in: f64,
    pub radius_mean_out: f64,
    pub radius_throat_in: f64,
    pub radius_throat_out: f64,
    pub radius_shroud_in: f64,
    pub radius_shroud_out: f64,
    pub hub_tip_ratio_in: f64,
    pub hub_tip_ratio_out: f64,
    pub height_in: f64,
    pub height_out: f64,
    pub height: f64,
    pub area_in: f64,
    pub area_out: f64,
    pub area_throat: f64,
    pub flaring_angle: f64,
    pub aspect_ratio: f64,
    pub pitch_to_chord_ratio: f64,
    pub thickness_max_to_chord_ratio: f64,
    pub thickness_te_to_opening_ratio: f64,
    pub tip_clearance_to_height_ratio: f64,
    pub diameter_le_to_chord_ratio: f64,
}

/// Build every derived geometric quantity for one cascade.
///
/// Mirrors the reference implementation's `calculate_full_geometry`: axial
/// chord projects the chord onto the machine axis via the stagger angle,
/// flaring angle is the half-angle subtended by the change in blade height
/// across the axial chord, and the throat areas/radii follow the
/// [`throat_radius`] rule.
pub fn compute_derived_geometry(geom: &CascadeGeometry) -> CascadeGeometryDerived {
    let axial_chord = geom.chord * cosd(geom.stagger_angle);

    let radius_mean_in = 0.5 * (geom.radius_hub_in + geom.radius_tip_in);
    let radius_mean_out = 0.5 * (geom.radius_hub_out + geom.radius_tip_out);

    let radius_throat_in = throat_radius(geom.radius_hub_in, geom.radius_hub_out);
    let radius_throat_out = throat_radius(geom.radius_tip_in, geom.radius_tip_out);

    let radius_shroud_in = geom.radius_tip_in + geom.tip_clearance;
    let radius_shroud_out = geom.radius_tip_out + geom.tip_clearance;

    let hub_tip_ratio_in = geom.radius_hub_in / geom.radius_tip_in;
    let hub_tip_ratio_out = geom.radius_hub_out / geom.radius_tip_out;

    let height_in = geom.radius_tip_in - geom.radius_hub_in;
    let height_out = geom.radius_tip_out - geom.radius_hub_out;
    let height = 0.5 * (height_in + height_out);

    let area_in = std::f64::consts::PI * (geom.radius_tip_in.powi(2) - geom.radius_hub_in.powi(2));
    let area_out =
        std::f64::consts::PI * (geom.radius_tip_out.powi(2) - geom.radius_hub_out.powi(2));
    let area_throat =
        std::f64::consts::PI * (radius_throat_out.powi(2) - radius_throat_in.powi(2));

    let flaring_angle = ((height_out - height_in) / (2.0 * axial_chord)).atan().to_degrees();
    let aspect_ratio = height / geom.chord;
    let pitch_to_chord_ratio = geom.pitch / geom.chord;
    let thickness_max_to_chord_ratio = geom.thickness_max / geom.chord;
    let thickness_te_to_opening_ratio = geom.thickness_te / geom.opening;
    let tip_clearance_to_height_ratio = geom.tip_clearance / height;
    let diameter_le_to_chord_ratio = geom.diameter_le / geom.chord;

    CascadeGeometryDerived {
        axial_chord,
        radius_mean_in,
        radius_mean_out,
        radius_throat_in,
        radius_throat_out,
        radius_shroud_in,
        radius_shroud_out,
        hub_tip_ratio_in,
        hub_tip_ratio_out,
        height_in,
        height_out,
        height,
        area_in,
        area_out,
        area_throat,
        flaring_angle,
        aspect_ratio,
        pitch_to_chord_ratio,
        thickness_max_to_chord_ratio,
        thickness_te_to_opening_ratio,
        tip_clearance_to_height_ratio,
        diameter_le_to_chord_ratio,
    }
}
