use super::config::ConfigError;
use crate::core::geometry::GeometryError;
use crate::core::io::traits::OutputError;
use crate::core::io::trajectory::TrajectoryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    #[error("Geometry error in frame at step {step}: {source}")]
    Geometry {
        step: i32,
        #[source]
        source: GeometryError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Trajectory '{path}' contains no complete frames", path = .0.display())]
    EmptyTrajectory(PathBuf),
}
