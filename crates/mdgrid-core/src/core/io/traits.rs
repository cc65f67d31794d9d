use crate::core::models::stats::StatsCollection;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output file '{path}': {source}", path = path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write output file '{path}': {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Grid index {0} is missing from a frame of the collection")]
    MissingGrid(usize),
    #[error("Malformed statistics artifact: {0}")]
    Malformed(String),
}

impl OutputError {
    fn at_path(self, path: &Path) -> Self {
        match self {
            OutputError::Io(source) => OutputError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

/// Defines how the time series of one grid is encoded into an artifact.
///
/// One artifact holds every frame of a [`StatsCollection`] for a single grid,
/// selected by its position in the configured grid list.
pub trait StatsFormat {
    /// File extension used for artifacts of this format, without the dot.
    fn extension(&self) -> &'static str;

    /// Writes the series of grid `grid_index` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::MissingGrid`] if a frame has no statistics for
    /// the grid, or an I/O error if writing fails.
    fn write_series(
        &self,
        collection: &StatsCollection,
        grid_index: usize,
        writer: &mut impl Write,
    ) -> Result<(), OutputError>;

    /// Creates (or truncates) `path` and writes the series into it.
    fn write_series_to_path<P: AsRef<Path>>(
        &self,
        collection: &StatsCollection,
        grid_index: usize,
        path: P,
    ) -> Result<(), OutputError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_series(collection, grid_index, &mut writer)
            .map_err(|e| e.at_path(path))?;
        writer.flush().map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Checks that every frame carries statistics for `grid_index`.
pub(crate) fn ensure_grid_present(
    collection: &StatsCollection,
    grid_index: usize,
) -> Result<(), OutputError> {
    if collection
        .frames()
        .iter()
        .all(|f| f.grids.len() > grid_index)
    {
        Ok(())
    } else {
        Err(OutputError::MissingGrid(grid_index))
    }
}
