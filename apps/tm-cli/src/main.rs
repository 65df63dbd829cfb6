use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "tm-cli")]
#[command(about = "Turbine mean-line performance analyzer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file's syntax and structure
    Validate {
        /// Path to the configuration YAML file
        config_path: PathBuf,
    },
    /// Solve a configuration's operating points and/or performance map
    Run {
        /// Path to the configuration YAML file
        config_path: PathBuf,
        /// Directory to persist the run under (default: print JSON to stdout)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Run identifier to store results under (default: derived from the point count)
        #[arg(long)]
        run_id: Option<String>,
    },
    /// List cached runs in a run-store directory
    Runs {
        /// Run-store directory
        store_dir: PathBuf,
    },
    /// Show a summary of a cached run
    ShowRun {
        /// Run-store directory
        store_dir: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a cached run's per-point overall performance as CSV
    Export {
        /// Run-store directory
        store_dir: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            output_dir,
            run_id,
        } => cmd_run(&config_path, output_dir, run_id),
        Commands::Runs { store_dir } => cmd_runs(&store_dir),
        Commands::ShowRun { store_dir, run_id } => cmd_show_run(&store_dir, &run_id),
        Commands::Export {
            store_dir,
            run_id,
            output,
        } => cmd_export(&store_dir, &run_id, output.as_deref()),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let loaded = config::load_config(config_path)?;

    println!("✓ Configuration is valid");
    println!("  Cascades: {}", loaded.geometry.number_of_cascades());
    println!("  Stages:   {}", loaded.geometry.number_of_stages());
    println!("  Operating points: {}", loaded.points.len());
    if let Some(map) = &loaded.performance_map {
        println!(
            "  Performance map points: {}",
            tm_driver::generate_operating_points(map).len()
        );
    }
    Ok(())
}

fn cmd_run(config_path: &Path, output_dir: Option<PathBuf>, run_id: Option<String>) -> CliResult<()> {
    info!(path = %config_path.display(), "loading configuration");
    let loaded = config::load_config(config_path)?;
    let number_of_stages = loaded.geometry.number_of_stages();

    let mut records = Vec::new();

    if !loaded.points.is_empty() {
        info!(count = loaded.points.len(), "solving individual operating points");
        let mut cache = tm_driver::WarmStartCache::new();
        for (index, point) in loaded.points.iter().enumerate() {
            match tm_driver::solve_operating_point(
                point,
                &loaded.geometry,
                &loaded.model,
                &loaded.fluid,
                &mut cache,
                &loaded.newton_config,
            ) {
                Ok(solution) => {
                    info!(
                        index,
                        guess = %solution.stats.initial_guess_source,
                        iterations = solution.stats.iterations,
                        residual = solution.stats.residual_norm,
                        "operating point converged"
                    );
                    records.push(tm_results::build_operating_point_result(&solution, number_of_stages)?);
                }
                Err(err) => {
                    warn!(index, error = %err, "operating point failed to converge");
                    records.push(tm_results::build_non_convergence_result(point, err.to_string()));
                }
            }
        }
    }

    if let Some(map) = &loaded.performance_map {
        let points = tm_driver::generate_operating_points(map);
        info!(count = points.len(), "running performance map sweep");
        let solutions = tm_driver::run_performance_map(
            map,
            &loaded.geometry,
            &loaded.model,
            &loaded.fluid,
            &loaded.newton_config,
        );
        for (point, solution) in points.iter().zip(solutions.into_iter()) {
            match solution {
                Ok(solution) => {
                    records.push(tm_results::build_operating_point_result(&solution, number_of_stages)?);
                }
                Err(err) => {
                    warn!(point = ?point, error = %err, "sweep point failed to converge");
                    records.push(tm_results::build_non_convergence_result(point, err.to_string()));
                }
            }
        }
    }

    let converged = records.iter().filter(|r| r.solver.converged).count();
    info!(total = records.len(), converged, "sweep complete");

    match output_dir {
        Some(dir) => {
            let run_id = run_id.unwrap_or_else(|| format!("run-{}", records.len()));
            let store = tm_results::RunStore::new(dir)?;
            let manifest = tm_results::RunManifest::new(
                run_id.clone(),
                loaded.fluid_name,
                env!("CARGO_PKG_VERSION").to_string(),
                records.len(),
            );
            store.save_run(&manifest, &records)?;
            println!("✓ Saved {} records to run '{}'", records.len(), run_id);
        }
        None => {
            let json = serde_json::to_string_pretty(&records)?;
            println!("{json}");
        }
    }

    Ok(())
}

fn cmd_runs(store_dir: &Path) -> CliResult<()> {
    let store = tm_results::RunStore::new(store_dir.to_path_buf())?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        println!("No cached runs found in {}", store_dir.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} points, fluid={})",
                manifest.run_id, manifest.timestamp, manifest.point_count, manifest.fluid_name
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store_dir: &Path, run_id: &str) -> CliResult<()> {
    let store = tm_results::RunStore::new(store_dir.to_path_buf())?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_results(run_id)?;
    let converged = records.iter().filter(|r| r.solver.converged).count();

    println!("Run: {} ({})", manifest.run_id, manifest.timestamp);
    println!("  Fluid: {}", manifest.fluid_name);
    println!("  Points: {} ({} converged)", records.len(), converged);
    for record in &records {
        let op = &record.operation_point;
        match &record.overall {
            Some(overall) => println!(
                "  p_out={:.0} Pa  mass_flow={:.4} kg/s  eta_ts={:.3}  eta_tt={:.3}",
                op.p_out, overall.mass_flow_rate, overall.efficiency_ts, overall.efficiency_tt
            ),
            None => println!(
                "  p_out={:.0} Pa  NOT CONVERGED ({})",
                op.p_out, record.solver.initial_guess_source
            ),
        }
    }
    Ok(())
}

fn cmd_export(store_dir: &Path, run_id: &str, output: Option<&Path>) -> CliResult<()> {
    let store = tm_results::RunStore::new(store_dir.to_path_buf())?;
    let records = store.load_results(run_id)?;

    let mut csv = String::from("p0_in,t0_in,p_out,mass_flow_rate,efficiency_ts,efficiency_tt,converged\n");
    for record in &records {
        let op = &record.operation_point;
        match &record.overall {
            Some(overall) => csv.push_str(&format!(
                "{},{},{},{},{},{},true\n",
                op.p0_in, op.t0_in, op.p_out, overall.mass_flow_rate, overall.efficiency_ts, overall.efficiency_tt
            )),
            None => csv.push_str(&format!("{},{},{},,,,false\n", op.p0_in, op.t0_in, op.p_out)),
        }
    }

    match output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            println!("✓ Exported {} records to {}", records.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
