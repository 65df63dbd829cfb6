//! On-disk storage for a sweep's result records, one JSON Lines file per
//! run plus a manifest, following the teacher's run-directory layout.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::{ResultsError, ResultsResult};
use crate::types::OperatingPointResult;

pub type RunId = String;

/// Metadata for one sweep run: when it was solved and against which
/// solver build, so stored results can be told apart without re-reading
/// every record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub fluid_name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub point_count: usize,
}

impl RunManifest {
    pub fn new(run_id: RunId, fluid_name: String, solver_version: String, point_count: usize) -> Self {
        Self {
            run_id,
            fluid_name,
            timestamp: Utc::now().to_rfc3339(),
            solver_version,
            point_count,
        }
    }
}

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    /// Persist a sweep's manifest and per-point records.
    pub fn save_run(&self, manifest: &RunManifest, results: &[OperatingPointResult]) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_path = run_dir.join("manifest.json");
        fs::write(manifest_path, serde_json::to_string_pretty(manifest)?)?;

        let results_path = run_dir.join("results.jsonl");
        let mut content = String::new();
        for result in results {
            content.push_str(&serde_json::to_string(result)?);
            content.push('\n');
        }
        fs::write(results_path, content)?;

        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");
        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_results(&self, run_id: &str) -> ResultsResult<Vec<OperatingPointResult>> {
        let results_path = self.run_dir(run_id).join("results.jsonl");
        if !results_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(results_path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(ResultsError::from))
            .collect()
    }

    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        if !self.root_dir.exists() {
            return Ok(runs);
        }
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id) {
                    runs.push(manifest);
                }
            }
        }
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OperationPointRecord, SolverRecord};

    fn result(p_out: f64) -> OperatingPointResult {
        OperatingPointResult {
            operation_point: OperationPointRecord {
                fluid_name: "air".to_string(),
                p0_in: 3.0e5,
                t0_in: 450.0,
                p_out,
                alpha_in: 0.0,
                omega: 1200.0,
            },
            overall: None,
            plane: Vec::new(),
            cascade: Vec::new(),
            stage: Vec::new(),
            solver: SolverRecord {
                converged: false,
                initial_guess_source: "test".to_string(),
                iterations: 0,
                residual_norm: f64::NAN,
            },
        }
    }

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("{prefix}_{nanos}"));
        dir
    }

    #[test]
    fn save_and_load_run_roundtrips() {
        let store = RunStore::new(unique_temp_dir("tm_results_test")).unwrap();
        let manifest = RunManifest::new("run1".to_string(), "air".to_string(), "0.1.0".to_string(), 2);
        let results = vec![result(1.0e5), result(1.2e5)];

        store.save_run(&manifest, &results).unwrap();

        let loaded_manifest = store.load_manifest("run1").unwrap();
        assert_eq!(loaded_manifest.point_count, 2);

        let loaded_results = store.load_results("run1").unwrap();
        assert_eq!(loaded_results.len(), 2);
        assert_eq!(loaded_results[1].operation_point.p_out, 1.2e5);
    }

    #[test]
    fn missing_run_errors() {
        let store = RunStore::new(unique_temp_dir("tm_results_test_missing")).unwrap();
        assert!(store.load_manifest("does-not-exist").is_err());
    }
}
