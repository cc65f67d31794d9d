use clap::{Args, Parser, Subcommand, ValueEnum};
use mdgrid::core::io::trajectory::MassLayout;
use mdgrid::engine::config::OutputMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "mdgrid - control-volume statistics (density, momentum, velocity tensor) from binary MD trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel accumulation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Accumulate per-cell statistics on one or more grids and write one artifact per grid.
    Analyze(AnalyzeArgs),
    /// Print the header, masses and a few atoms of a trajectory.
    Inspect(InspectArgs),
    /// Print the time series of one cell from a binary statistics artifact.
    Cell(CellArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// Every atom record carries its own mass.
    PerAtomMass,
    /// A global atom count and mass table precede the frames.
    HeaderMass,
}

impl From<LayoutArg> for MassLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::PerAtomMass => MassLayout::PerAtomMass,
            LayoutArg::HeaderMass => MassLayout::HeaderMass,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Binary,
    Text,
}

impl From<ModeArg> for OutputMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Binary => OutputMode::Binary,
            ModeArg::Text => OutputMode::Text,
        }
    }
}

/// Mutually exclusive flags selecting whether atom records carry forces.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct ForcesFlag {
    /// Atom records include a force vector.
    #[arg(long)]
    pub forces: bool,
    /// Atom records carry positions and velocities only.
    #[arg(long)]
    pub no_forces: bool,
}

impl ForcesFlag {
    pub fn resolve(&self) -> Option<bool> {
        if self.forces {
            Some(true)
        } else if self.no_forces {
            Some(false)
        } else {
            None
        }
    }
}

/// Mutually exclusive flags selecting whether binary records start with the step.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct IncludeStepFlag {
    /// Prefix each binary record with the frame's step number.
    #[arg(long)]
    pub include_step: bool,
    /// Write binary records without the step number.
    #[arg(long)]
    pub no_include_step: bool,
}

impl IncludeStepFlag {
    pub fn resolve(&self) -> Option<bool> {
        if self.include_step {
            Some(true)
        } else if self.no_include_step {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    // --- Core Arguments ---
    /// Path to the binary trajectory file (e.g., traj.000000.out).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Grid resolutions (cells per axis), comma separated. Example: -g 1,2,3,5
    #[arg(short, long, value_name = "N,...", value_delimiter = ',')]
    pub grids: Vec<usize>,

    // --- Reader Overrides ---
    /// On-disk layout of the trajectory.
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutArg>,

    #[command(flatten)]
    pub forces: ForcesFlag,

    // --- Output Overrides ---
    /// Directory receiving one artifact per grid.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Artifact file name prefix; files are named <prefix>_<N>.<ext>.
    #[arg(long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Artifact encoding.
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    #[command(flatten)]
    pub include_step: IncludeStepFlag,

    /// Only print the summary; do not write artifacts.
    #[arg(long)]
    pub no_output: bool,

    // --- Engine Overrides ---
    /// Accumulate atoms on a single thread.
    #[arg(long)]
    pub sequential: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.prefix=run1
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the binary trajectory file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// On-disk layout of the trajectory.
    #[arg(short, long, value_enum, default_value = "per-atom-mass")]
    pub layout: LayoutArg,

    #[command(flatten)]
    pub forces: ForcesFlag,

    /// Number of atoms to print from the last frame.
    #[arg(short = 'n', long, default_value_t = 5, value_name = "INT")]
    pub atoms: usize,
}

/// Arguments for the `cell` subcommand.
#[derive(Args, Debug)]
pub struct CellArgs {
    /// Path to a binary statistics artifact (e.g., output_3.dat).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Grid resolution the artifact was written with.
    #[arg(short, long, required = true, value_name = "N")]
    pub grid: usize,

    /// Cell to print, as i,j,k.
    #[arg(short, long, default_value = "0,0,0", value_name = "I,J,K")]
    pub cell: String,

    /// The artifact records start with the frame's step number.
    #[arg(long)]
    pub include_step: bool,
}
