use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tm_driver::OperatingPoint;
use tm_results::{build_non_convergence_result, RunManifest, RunStore};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{prefix}_{nanos}"));
    dir
}

#[test]
fn non_convergent_point_still_gets_a_storable_record() {
    let point = OperatingPoint {
        fluid_name: "air".to_string(),
        p0_in: 3.0e5,
        t0_in: 450.0,
        p_out: 1.2e5,
        alpha_in: 0.0,
        omega: 1200.0,
    };
    let record = build_non_convergence_result(
        &point,
        "exhausted warm start, default heuristic, and all 11 retry-ladder variants".to_string(),
    );
    assert!(!record.solver.converged);
    assert!(record.overall.is_none());
    assert!(record.plane.is_empty());

    let store = RunStore::new(unique_temp_dir("tm_results_nonconv_test")).unwrap();
    let manifest = RunManifest::new("run-nonconv".to_string(), "air".to_string(), "0.1.0".to_string(), 1);
    store.save_run(&manifest, &[record]).unwrap();

    let loaded = store.load_results("run-nonconv").unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(!loaded[0].solver.converged);
}
