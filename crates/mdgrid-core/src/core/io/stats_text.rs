use super::traits::{OutputError, StatsFormat, ensure_grid_present};
use crate::core::geometry::grid::GridSpec;
use crate::core::models::stats::StatsCollection;
use std::io::{self, Write};

/// Tab-delimited density table.
///
/// A header row names the columns (`step`, `time`, then `density_i_j_k` for
/// every cell in linear order); each following row is one frame. Momentum and
/// tensor channels are only available in the binary artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats;

impl TextStats {
    pub fn header(grid: GridSpec) -> Vec<String> {
        let mut columns = Vec::with_capacity(2 + grid.cell_count());
        columns.push("step".to_string());
        columns.push("time".to_string());
        for id in 0..grid.cell_count() {
            if let Some((i, j, k)) = grid.cell_coords(id) {
                columns.push(format!("density_{}_{}_{}", i, j, k));
            }
        }
        columns
    }
}

impl StatsFormat for TextStats {
    fn extension(&self) -> &'static str {
        "tsv"
    }

    fn write_series(
        &self,
        collection: &StatsCollection,
        grid_index: usize,
        writer: &mut impl Write,
    ) -> Result<(), OutputError> {
        ensure_grid_present(collection, grid_index)?;
        let mut table = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let mut header_written = false;
        let mut row = Vec::new();
        for (step, time, grid) in collection.series(grid_index) {
            if !header_written {
                table.write_record(Self::header(grid.grid)).map_err(io::Error::from)?;
                header_written = true;
            }
            row.clear();
            row.push(step.to_string());
            row.push(time.to_string());
            row.extend(grid.cells.iter().map(|c| (c.density as f32).to_string()));
            table.write_record(&row).map_err(io::Error::from)?;
        }
        table.flush()?;
        Ok(())
    }
}
