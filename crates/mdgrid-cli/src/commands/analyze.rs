use crate::cli::AnalyzeArgs;
use crate::config::PartialAnalysisConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdgrid::engine::progress::ProgressReporter;
use mdgrid::workflows;
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialAnalysisConfig::from_file(path)?,
        None => PartialAnalysisConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(&args)?;

    if let Some(output) = &final_config.output {
        std::fs::create_dir_all(&output.directory)?;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Analyzing {} on grids {:?}...",
        final_config.trajectory_path.display(),
        final_config.grids.resolutions()
    );
    info!("Invoking the core analysis workflow...");
    let result = workflows::analyze::run(&final_config, &reporter)?;

    let summary = &result.summary;
    println!(
        "Processed {} frame(s) of {} atom(s).",
        summary.frames, summary.atom_count
    );
    println!(
        "Mean bulk density: {:.4} amu/nm^3 ({:.2} kg/m^3)",
        summary.mean_density,
        summary.mean_density_kg_m3()
    );

    if result.artifacts.is_empty() {
        info!("No output configured; skipping artifacts.");
    }
    for path in &result.artifacts {
        println!("  Wrote {}", path.display());
    }

    Ok(())
}
