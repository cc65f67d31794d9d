use crate::core::io::stats_binary::BinaryStats;
use crate::core::io::stats_text::TextStats;
use crate::core::io::traits::StatsFormat;
use crate::core::io::trajectory::TrajectoryReader;
use crate::core::models::frame::{Frame, Trajectory};
use crate::core::models::stats::StatsCollection;
use crate::engine::accumulator::StatsAccumulator;
use crate::engine::config::{AnalysisConfig, GridSet, OutputConfig, OutputMode};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Converts a mass density in amu/nm³ to kg/m³.
pub const AMU_PER_NM3_TO_KG_PER_M3: f64 = 1.66054;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub frames: usize,
    pub atom_count: usize,
    /// Bulk mass density averaged over all frames, in amu/nm³.
    pub mean_density: f64,
}

impl AnalysisSummary {
    pub fn mean_density_kg_m3(&self) -> f64 {
        self.mean_density * AMU_PER_NM3_TO_KG_PER_M3
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub collection: StatsCollection,
    pub summary: AnalysisSummary,
    /// Artifact paths in grid order; empty when no output is configured.
    pub artifacts: Vec<PathBuf>,
}

#[derive(Default)]
struct BulkDensity {
    frames: usize,
    sum: f64,
}

impl BulkDensity {
    fn add(&mut self, frame: &Frame) {
        self.frames += 1;
        self.sum += frame.total_mass() / frame.box_volume();
    }

    fn mean(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.sum / self.frames as f64
        }
    }
}

/// Runs the full pipeline for one trajectory file.
///
/// Frames are processed one at a time and dropped once their statistics are
/// collected. Any error aborts the run before artifacts are written, so a
/// structurally invalid trajectory never produces partial output.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<AnalysisResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Accumulating statistics",
    });
    info!(
        path = %config.trajectory_path.display(),
        grids = ?config.grids.resolutions(),
        parallel = config.parallel,
        "Starting trajectory analysis."
    );

    let file_len = std::fs::metadata(&config.trajectory_path)
        .map(|m| m.len())
        .ok();
    let mut reader = TrajectoryReader::open(&config.trajectory_path, config.variant)?;
    let accumulator =
        StatsAccumulator::new(config.grids.clone()).with_parallel(config.parallel);

    let mut collection = StatsCollection::new();
    let mut density = BulkDensity::default();
    while let Some(frame) = reader.next_frame()? {
        if collection.is_empty() {
            let total_steps = file_len.zip(reader.atom_count()).map(|(len, natoms)| {
                let body = len.saturating_sub(reader.header_bytes() as u64);
                body / config.variant.frame_bytes(natoms) as u64
            });
            reporter.report(Progress::TaskStart { total_steps });
        }
        collection.push(accumulator.process_frame(&frame)?);
        density.add(&frame);
        reporter.report(Progress::FrameProcessed {
            step: frame.step,
            time: frame.time,
        });
    }
    reporter.report(Progress::TaskFinish);
    if reader.is_truncated() {
        reporter.report(Progress::Message(format!(
            "Trajectory ends inside frame {}; the partial frame was discarded.",
            reader.frames_read()
        )));
    }

    let atom_count = reader.atom_count().unwrap_or(0);
    if collection.is_empty() {
        return Err(EngineError::EmptyTrajectory(config.trajectory_path.clone()));
    }
    let summary = AnalysisSummary {
        frames: collection.len(),
        atom_count,
        mean_density: density.mean(),
    };
    info!(
        frames = summary.frames,
        atoms = summary.atom_count,
        mean_density = summary.mean_density,
        "Accumulation complete."
    );
    reporter.report(Progress::PhaseFinish);

    let artifacts = match &config.output {
        Some(output) => {
            reporter.report(Progress::PhaseStart {
                name: "Writing artifacts",
            });
            let paths = write_collection(&collection, &config.grids, output)?;
            reporter.report(Progress::PhaseFinish);
            paths
        }
        None => Vec::new(),
    };

    Ok(AnalysisResult {
        collection,
        summary,
        artifacts,
    })
}

/// Accumulates an in-memory trajectory.
pub fn accumulate_trajectory(
    trajectory: &Trajectory,
    accumulator: &StatsAccumulator,
) -> Result<StatsCollection, EngineError> {
    let mut collection = StatsCollection::new();
    for frame in trajectory {
        collection.push(accumulator.process_frame(frame)?);
    }
    Ok(collection)
}

/// Writes one artifact per grid. Artifacts already written stay on disk if a
/// later grid fails.
pub fn write_collection(
    collection: &StatsCollection,
    grids: &GridSet,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>, EngineError> {
    match output.mode {
        OutputMode::Binary => write_with(
            &BinaryStats::new(output.include_step),
            collection,
            grids,
            output,
        ),
        OutputMode::Text => write_with(&TextStats, collection, grids, output),
    }
}

fn write_with<F: StatsFormat>(
    format: &F,
    collection: &StatsCollection,
    grids: &GridSet,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut paths = Vec::with_capacity(grids.len());
    for (index, &grid) in grids.iter().enumerate() {
        let path = output.path_for(grid, format.extension());
        debug!(path = %path.display(), resolution = grid.resolution(), "Writing artifact.");
        format.write_series_to_path(collection, index, &path)?;
        paths.push(path);
    }
    info!(count = paths.len(), "Artifacts written.");
    Ok(paths)
}
