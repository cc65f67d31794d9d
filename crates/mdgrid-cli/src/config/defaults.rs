use mdgrid::core::io::trajectory::MassLayout;
use mdgrid::engine::config::OutputMode;

/// Values used when neither the config file nor the command line sets a key.
pub struct DefaultsConfig {
    pub layout: MassLayout,
    pub forces: bool,
    pub output_directory: &'static str,
    pub output_prefix: &'static str,
    pub output_mode: OutputMode,
    pub include_step: bool,
    pub parallel: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            layout: MassLayout::PerAtomMass,
            forces: false,
            output_directory: ".",
            output_prefix: "output",
            output_mode: OutputMode::Binary,
            include_step: false,
            parallel: true,
        }
    }
}
