use super::config::GridSet;
use super::error::EngineError;
use crate::core::geometry::GeometryError;
use crate::core::geometry::grid::validate_box_edge;
use crate::core::geometry::periodic::wrap_position;
use crate::core::models::frame::{AtomSample, Frame};
use crate::core::models::stats::{CellStats, FrameStats, GridStats};
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Atoms per parallel work item; smaller frames are accumulated sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK_ATOMS: usize = 4096;

type CellBuffers = Vec<Vec<CellStats>>;

/// Reduces frames to per-cell statistics on every configured grid.
///
/// Each call to [`process_frame`](Self::process_frame) starts from zeroed
/// cells, so frames are independent of each other. Raw sums are normalized at
/// the end of the frame: density and momentum by the cell volume, the tensor by
/// `density * cell_volume`.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    grids: GridSet,
    parallel: bool,
}

impl StatsAccumulator {
    pub fn new(grids: GridSet) -> Self {
        Self {
            grids,
            parallel: false,
        }
    }

    /// Splits the atom loop across the rayon pool when the `parallel` feature
    /// is enabled. Partial sums are merged before normalization, so results
    /// match the sequential path up to floating-point rounding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn grids(&self) -> &GridSet {
        &self.grids
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    #[instrument(skip_all, level = "trace", fields(step = frame.step))]
    pub fn process_frame(&self, frame: &Frame) -> Result<FrameStats, EngineError> {
        let geometry = |source| EngineError::Geometry {
            step: frame.step,
            source,
        };
        let edge = validate_box_edge(frame.box_edge()).map_err(geometry)?;
        let sums = self.accumulate(&frame.atoms, edge).map_err(geometry)?;

        let grids = self
            .grids
            .iter()
            .zip(sums)
            .map(|(&grid, mut cells)| {
                let cell_volume = grid.cell_volume(edge);
                for cell in &mut cells {
                    cell.normalize(cell_volume);
                }
                GridStats {
                    grid,
                    cell_volume,
                    cells,
                }
            })
            .collect();

        Ok(FrameStats {
            step: frame.step,
            time: frame.time,
            grids,
        })
    }

    fn accumulate(&self, atoms: &[AtomSample], edge: f64) -> Result<CellBuffers, GeometryError> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel && atoms.len() > PARALLEL_CHUNK_ATOMS {
                return self.accumulate_parallel(atoms, edge);
            }
        }
        let mut buffers = self.zeroed_buffers();
        accumulate_into(&mut buffers, &self.grids, atoms, edge)?;
        Ok(buffers)
    }

    #[cfg(feature = "parallel")]
    fn accumulate_parallel(
        &self,
        atoms: &[AtomSample],
        edge: f64,
    ) -> Result<CellBuffers, GeometryError> {
        atoms
            .par_chunks(PARALLEL_CHUNK_ATOMS)
            .try_fold(
                || self.zeroed_buffers(),
                |mut partial, chunk| -> Result<CellBuffers, GeometryError> {
                    accumulate_into(&mut partial, &self.grids, chunk, edge)?;
                    Ok(partial)
                },
            )
            .try_reduce(
                || self.zeroed_buffers(),
                |mut total, partial| -> Result<CellBuffers, GeometryError> {
                    merge_buffers(&mut total, partial);
                    Ok(total)
                },
            )
    }

    fn zeroed_buffers(&self) -> CellBuffers {
        self.grids
            .iter()
            .map(|grid| vec![CellStats::default(); grid.cell_count()])
            .collect()
    }
}

fn accumulate_into(
    buffers: &mut [Vec<CellStats>],
    grids: &GridSet,
    atoms: &[AtomSample],
    edge: f64,
) -> Result<(), GeometryError> {
    for atom in atoms {
        let wrapped = wrap_position(&atom.position, edge);
        let mass = atom.mass as f64;
        let velocity = [
            atom.velocity.x as f64,
            atom.velocity.y as f64,
            atom.velocity.z as f64,
        ];
        for (grid, cells) in grids.iter().zip(buffers.iter_mut()) {
            let id = grid.cell_id(wrapped, edge)?;
            cells[id].add_sample(mass, velocity);
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn merge_buffers(total: &mut [Vec<CellStats>], partial: CellBuffers) {
    for (cells, partial_cells) in total.iter_mut().zip(partial) {
        for (cell, part) in cells.iter_mut().zip(partial_cells) {
            *cell += part;
        }
    }
}
