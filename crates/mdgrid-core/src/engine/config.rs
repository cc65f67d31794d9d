use crate::core::geometry::grid::GridSpec;
use crate::core::io::trajectory::ReaderVariant;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("At least one grid resolution is required")]
    EmptyGridList,
    #[error("Grid resolution at position {position} must be greater than zero")]
    ZeroResolution { position: usize },
    #[error("Grid resolution {0} is listed more than once")]
    DuplicateResolution(usize),
    #[error("Grid resolution {0} is too large: {0}^3 cells cannot be indexed")]
    ResolutionTooLarge(usize),
}

/// An ordered, non-empty list of distinct grid resolutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSet {
    grids: Vec<GridSpec>,
}

impl GridSet {
    pub fn new<I: IntoIterator<Item = usize>>(resolutions: I) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut grids = Vec::new();
        for (position, resolution) in resolutions.into_iter().enumerate() {
            if resolution == 0 {
                return Err(ConfigError::ZeroResolution { position });
            }
            if resolution.checked_pow(3).is_none() {
                return Err(ConfigError::ResolutionTooLarge(resolution));
            }
            let grid = GridSpec::new(resolution).ok_or(ConfigError::ZeroResolution { position })?;
            if !seen.insert(resolution) {
                return Err(ConfigError::DuplicateResolution(resolution));
            }
            grids.push(grid);
        }
        if grids.is_empty() {
            return Err(ConfigError::EmptyGridList);
        }
        Ok(Self { grids })
    }

    pub fn grids(&self) -> &[GridSpec] {
        &self.grids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridSpec> {
        self.grids.iter()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn resolutions(&self) -> Vec<usize> {
        self.grids.iter().map(GridSpec::resolution).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    Binary,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub mode: OutputMode,
    /// Prefix every binary record with the frame's step number.
    pub include_step: bool,
}

impl OutputConfig {
    /// `<directory>/<prefix>_<N>.<extension>`.
    pub fn path_for(&self, grid: GridSpec, extension: &str) -> PathBuf {
        self.directory
            .join(format!("{}_{}.{}", self.prefix, grid.resolution(), extension))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub trajectory_path: PathBuf,
    pub variant: ReaderVariant,
    pub grids: GridSet,
    /// Artifacts are written only when an output is configured.
    pub output: Option<OutputConfig>,
    pub parallel: bool,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    trajectory_path: Option<PathBuf>,
    variant: Option<ReaderVariant>,
    resolutions: Option<Vec<usize>>,
    output: Option<OutputConfig>,
    parallel: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trajectory_path(mut self, path: PathBuf) -> Self {
        self.trajectory_path = Some(path);
        self
    }
    pub fn variant(mut self, variant: ReaderVariant) -> Self {
        self.variant = Some(variant);
        self
    }
    pub fn resolutions(mut self, resolutions: Vec<usize>) -> Self {
        self.resolutions = Some(resolutions);
        self
    }
    pub fn output(mut self, output: Option<OutputConfig>) -> Self {
        self.output = output;
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let resolutions = self
            .resolutions
            .ok_or(ConfigError::MissingParameter("resolutions"))?;
        Ok(AnalysisConfig {
            trajectory_path: self
                .trajectory_path
                .ok_or(ConfigError::MissingParameter("trajectory_path"))?,
            variant: self.variant.unwrap_or_default(),
            grids: GridSet::new(resolutions)?,
            output: self.output,
            parallel: self.parallel.unwrap_or(false),
        })
    }
}
