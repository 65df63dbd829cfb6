//! Scaled unknown vectors: the Newton solver's `x` is a flat `DVector<f64>`
//! of order-one quantities; these types give that vector a named, per-cascade
//! shape and convert between the two.

use nalgebra::{DVector, Vector3};
use tm_cascade::{ChokingModel, ThroatUnknowns};

/// The critical-point unknowns for one cascade, shaped by which choking
/// model that cascade uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CriticalUnknowns {
    /// `[v*_in, w*_throat, s*_throat]`.
    Critical(Vector3<f64>),
    /// `w*_throat, s*_throat, beta*_throat`.
    Throat(ThroatUnknowns),
    /// `w*_throat` only -- beta and entropy are fixed by the model.
    IsentropicThroat { w_throat_scaled: f64 },
}

impl CriticalUnknowns {
    pub fn model(&self) -> ChokingModel {
        match self {
            CriticalUnknowns::Critical(_) => ChokingModel::Critical,
            CriticalUnknowns::Throat(_) => ChokingModel::Throat,
            CriticalUnknowns::IsentropicThroat { .. } => ChokingModel::IsentropicThroat,
        }
    }

    fn len(&self) -> usize {
        match self {
            CriticalUnknowns::Critical(_) => 3,
            CriticalUnknowns::Throat(_) => 3,
            CriticalUnknowns::IsentropicThroat { .. } => 1,
        }
    }

    fn push_into(&self, out: &mut Vec<f64>) {
        match self {
            CriticalUnknowns::Critical(v) => out.extend_from_slice(v.as_slice()),
            CriticalUnknowns::Throat(t) => {
                out.push(t.w_throat_scaled);
                out.push(t.s_throat_scaled);
                out.push(t.beta_throat_scaled);
            }
            CriticalUnknowns::IsentropicThroat { w_throat_scaled } => out.push(*w_throat_scaled),
        }
    }

    fn from_slice(model: ChokingModel, s: &[f64]) -> Self {
        match model {
            ChokingModel::Critical => CriticalUnknowns::Critical(Vector3::new(s[0], s[1], s[2])),
            ChokingModel::Throat => CriticalUnknowns::Throat(ThroatUnknowns {
                w_throat_scaled: s[0],
                s_throat_scaled: s[1],
                beta_throat_scaled: s[2],
            }),
            ChokingModel::IsentropicThroat => CriticalUnknowns::IsentropicThroat {
                w_throat_scaled: s[0],
            },
        }
    }
}

/// The scaled unknowns solved for at one cascade: the actual throat plane
/// (relative velocity and entropy; its flow angle is not a free unknown --
/// always fixed to the geometric exit metal angle), the actual exit plane
/// (relative velocity, entropy, and flow angle), and the mode-dependent
/// choking/critical-point unknowns.
///
/// The actual throat plane is independent of the choking model: every mode
/// still needs the mass/loss residuals at the geometric throat opening.
/// `critical` is a separate unknown set used only to evaluate the choking
/// condition and (for [`ChokingModel::Critical`]) the true critical state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeUnknowns {
    pub w_throat_scaled: f64,
    pub s_throat_scaled: f64,
    pub w_out_scaled: f64,
    pub s_out_scaled: f64,
    pub beta_out_scaled: f64,
    pub critical: CriticalUnknowns,
}

impl CascadeUnknowns {
    const FIXED_LEN: usize = 5;

    fn len(&self) -> usize {
        Self::FIXED_LEN + self.critical.len()
    }

    fn push_into(&self, out: &mut Vec<f64>) {
        out.push(self.w_throat_scaled);
        out.push(self.s_throat_scaled);
        out.push(self.w_out_scaled);
        out.push(self.s_out_scaled);
        out.push(self.beta_out_scaled);
        self.critical.push_into(out);
    }

    fn from_slice(model: ChokingModel, s: &[f64]) -> Self {
        CascadeUnknowns {
            w_throat_scaled: s[0],
            s_throat_scaled: s[1],
            w_out_scaled: s[2],
            s_out_scaled: s[3],
            beta_out_scaled: s[4],
            critical: CriticalUnknowns::from_slice(model, &s[Self::FIXED_LEN..]),
        }
    }
}

/// The unknowns for an entire series of cascades: the turbine inlet
/// absolute velocity, plus each cascade's own unknowns.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineUnknowns {
    pub v_in_scaled: f64,
    pub cascades: Vec<CascadeUnknowns>,
}

impl MachineUnknowns {
    pub fn to_vector(&self) -> DVector<f64> {
        let mut out = Vec::with_capacity(1 + self.cascades.iter().map(|c| c.len()).sum::<usize>());
        out.push(self.v_in_scaled);
        for cascade in &self.cascades {
            cascade.push_into(&mut out);
        }
        DVector::from_vec(out)
    }

    /// Reconstruct a [`MachineUnknowns`] from a flat vector, given the
    /// choking model each cascade uses (needed to know each cascade's
    /// unknown count).
    pub fn from_vector(x: &DVector<f64>, models: &[ChokingModel]) -> Self {
        let mut offset = 1;
        let mut cascades = Vec::with_capacity(models.len());
        for &model in models {
            let fixed_end = offset + CascadeUnknowns::FIXED_LEN;
            let critical_len = match model {
                ChokingModel::Critical | ChokingModel::Throat => 3,
                ChokingModel::IsentropicThroat => 1,
            };
            let end = fixed_end + critical_len;
            let slice: Vec<f64> = x.rows(offset, end - offset).iter().copied().collect();
            cascades.push(CascadeUnknowns::from_slice(model, &slice));
            offset = end;
        }
        MachineUnknowns {
            v_in_scaled: x[0],
            cascades,
        }
    }
}
