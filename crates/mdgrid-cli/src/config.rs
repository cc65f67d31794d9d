mod defaults;

use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use defaults::DefaultsConfig;
use mdgrid::core::io::trajectory::{MassLayout, ReaderVariant};
use mdgrid::engine::config::{self as core_config, OutputMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialTrajectoryConfig {
    path: Option<PathBuf>,
    layout: Option<MassLayout>,
    forces: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialGridsConfig {
    resolutions: Option<Vec<usize>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    mode: Option<OutputMode>,
    directory: Option<PathBuf>,
    prefix: Option<String>,
    #[serde(rename = "include-step")]
    include_step: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEngineConfig {
    parallel: Option<bool>,
}

/// Configuration as read from a TOML file, before command-line overrides.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAnalysisConfig {
    trajectory: Option<PartialTrajectoryConfig>,
    grids: Option<PartialGridsConfig>,
    output: Option<PartialOutputConfig>,
    engine: Option<PartialEngineConfig>,
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves every key with the precedence command line, then `--set`
    /// values and the file, then defaults.
    pub fn merge_with_cli(mut self, args: &AnalyzeArgs) -> Result<core_config::AnalysisConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let trajectory = self.trajectory.take().unwrap_or_default();
        let grids = self.grids.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();
        let engine = self.engine.take().unwrap_or_default();

        let trajectory_path = args.input.clone().or(trajectory.path).ok_or_else(|| {
            CliError::Config(
                "A trajectory path is required either in `[trajectory] path` or via --input."
                    .to_string(),
            )
        })?;

        let layout = args
            .layout
            .map(MassLayout::from)
            .or(trajectory.layout)
            .unwrap_or(defaults.layout);
        let forces = args
            .forces
            .resolve()
            .or(trajectory.forces)
            .unwrap_or(defaults.forces);

        let resolutions = if args.grids.is_empty() {
            grids.resolutions.ok_or_else(|| {
                CliError::Config(
                    "Grid resolutions are required either in `[grids] resolutions` or via --grids."
                        .to_string(),
                )
            })?
        } else {
            args.grids.clone()
        };

        let output = if args.no_output {
            None
        } else {
            Some(core_config::OutputConfig {
                directory: args
                    .output_dir
                    .clone()
                    .or(output.directory)
                    .unwrap_or_else(|| PathBuf::from(defaults.output_directory)),
                prefix: args
                    .prefix
                    .clone()
                    .or(output.prefix)
                    .unwrap_or_else(|| defaults.output_prefix.to_string()),
                mode: args
                    .mode
                    .map(OutputMode::from)
                    .or(output.mode)
                    .unwrap_or(defaults.output_mode),
                include_step: args
                    .include_step
                    .resolve()
                    .or(output.include_step)
                    .unwrap_or(defaults.include_step),
            })
        };

        let parallel = !args.sequential && engine.parallel.unwrap_or(defaults.parallel);

        core_config::AnalysisConfigBuilder::new()
            .trajectory_path(trajectory_path)
            .variant(ReaderVariant::new(layout, forces))
            .resolutions(resolutions)
            .output(output)
            .parallel(parallel)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "trajectory.path" => {
                    self.trajectory.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value_str));
                }
                "trajectory.layout" => {
                    self.trajectory.get_or_insert_with(Default::default).layout = Some(
                        parser::parse_layout(value_str)
                            .map_err(|e| CliError::Config(e.to_string()))?,
                    );
                }
                "trajectory.forces" => {
                    self.trajectory.get_or_insert_with(Default::default).forces =
                        Some(parse_value(key, value_str)?);
                }
                "grids.resolutions" => {
                    self.grids.get_or_insert_with(Default::default).resolutions = Some(
                        parser::parse_resolutions(value_str)
                            .map_err(|e| CliError::Config(e.to_string()))?,
                    );
                }
                "output.mode" => {
                    self.output.get_or_insert_with(Default::default).mode = Some(
                        parser::parse_mode(value_str)
                            .map_err(|e| CliError::Config(e.to_string()))?,
                    );
                }
                "output.directory" => {
                    self.output.get_or_insert_with(Default::default).directory =
                        Some(PathBuf::from(value_str));
                }
                "output.prefix" => {
                    self.output.get_or_insert_with(Default::default).prefix =
                        Some(value_str.to_string());
                }
                "output.include-step" => {
                    self.output.get_or_insert_with(Default::default).include_step =
                        Some(parse_value(key, value_str)?);
                }
                "engine.parallel" => {
                    self.engine.get_or_insert_with(Default::default).parallel =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}
