//! Assembling individual cascades into the full turbine flow path.

use crate::derived::{compute_derived_geometry, CascadeGeometryDerived};
use crate::error::{GeometryError, GeometryResult};
use crate::raw::CascadeGeometry;

/// The ordered chain of cascades (alternating stator/rotor, starting with a
/// stator) that make up one multi-stage axial turbine, plus every derived
/// geometric quantity for each.
#[derive(Debug, Clone)]
pub struct MachineGeometry {
    pub cascades: Vec<CascadeGeometry>,
    pub derived: Vec<CascadeGeometryDerived>,
}

impl MachineGeometry {
    /// Validate and build derived geometry for each cascade in `cascades`,
    /// in the order they flow.
    pub fn build(cascades: Vec<CascadeGeometry>) -> GeometryResult<Self> {
        if cascades.is_empty() {
            return Err(GeometryError::InvalidConfiguration {
                what: "a machine must contain at least one cascade".to_string(),
            });
        }
        for geom in &cascades {
            geom.validate()?;
        }
        let derived = cascades.iter().map(compute_derived_geometry).collect();
        Ok(Self { cascades, derived })
    }

    pub fn number_of_cascades(&self) -> usize {
        self.cascades.len()
    }

    /// A stage is one stator/rotor pair. A lone trailing stator (odd cascade
    /// count) contributes no additional stage.
    pub fn number_of_stages(&self) -> usize {
        let n = self.number_of_cascades();
        if n > 1 {
            n / 2
        } else {
            0
        }
    }
}
