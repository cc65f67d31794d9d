use super::traits::{OutputError, StatsFormat, ensure_grid_present};
use crate::core::geometry::grid::GridSpec;
use crate::core::models::stats::{CHANNELS_PER_CELL, CellStats, StatsCollection};
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Fixed-width binary artifact.
///
/// Each frame is one record: `[step: i32]`, `time: f32`, `cell_volume: f32`,
/// then every cell in linear order as ten `f32` channels. The step is present
/// only when `include_step` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryStats {
    pub include_step: bool,
}

impl BinaryStats {
    pub fn new(include_step: bool) -> Self {
        Self { include_step }
    }

    /// Size in bytes of one frame record for `grid`.
    pub fn record_bytes(&self, grid: GridSpec) -> usize {
        let step = if self.include_step { 4 } else { 0 };
        step + 8 + grid.cell_count() * CHANNELS_PER_CELL * 4
    }
}

impl StatsFormat for BinaryStats {
    fn extension(&self) -> &'static str {
        "dat"
    }

    fn write_series(
        &self,
        collection: &StatsCollection,
        grid_index: usize,
        writer: &mut impl Write,
    ) -> Result<(), OutputError> {
        ensure_grid_present(collection, grid_index)?;
        let mut record = Vec::new();
        for (step, time, grid) in collection.series(grid_index) {
            record.clear();
            record.reserve(self.record_bytes(grid.grid));
            if self.include_step {
                record.write_i32::<NativeEndian>(step)?;
            }
            record.write_f32::<NativeEndian>(time)?;
            record.write_f32::<NativeEndian>(grid.cell_volume as f32)?;
            for cell in &grid.cells {
                for value in cell.channels() {
                    record.write_f32::<NativeEndian>(value as f32)?;
                }
            }
            writer.write_all(&record)?;
        }
        Ok(())
    }
}

/// One frame record read back from a binary artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    pub step: Option<i32>,
    pub time: f32,
    pub cell_volume: f32,
    pub cells: Vec<CellStats>,
}

impl SeriesFrame {
    pub fn cell(&self, grid: GridSpec, i: usize, j: usize, k: usize) -> Option<&CellStats> {
        grid.linear_id(i, j, k).and_then(|id| self.cells.get(id))
    }
}

/// Parses a binary artifact written for `grid`.
///
/// The layout carries no self-description, so the resolution and the step
/// flag must match the ones used when writing.
pub fn read_series<R: Read>(
    mut reader: R,
    grid: GridSpec,
    format: BinaryStats,
) -> Result<Vec<SeriesFrame>, OutputError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let record = format.record_bytes(grid);
    if bytes.len() % record != 0 {
        return Err(OutputError::Malformed(format!(
            "{} bytes is not a whole number of {}-byte records for a {}^3 grid",
            bytes.len(),
            record,
            grid.resolution()
        )));
    }

    let mut frames = Vec::with_capacity(bytes.len() / record);
    let mut values = [0f32; CHANNELS_PER_CELL];
    for mut chunk in bytes.chunks_exact(record) {
        let step = if format.include_step {
            Some(chunk.read_i32::<NativeEndian>()?)
        } else {
            None
        };
        let time = chunk.read_f32::<NativeEndian>()?;
        let cell_volume = chunk.read_f32::<NativeEndian>()?;
        let mut cells = Vec::with_capacity(grid.cell_count());
        for _ in 0..grid.cell_count() {
            chunk.read_f32_into::<NativeEndian>(&mut values)?;
            cells.push(CellStats::from_channels(values.map(f64::from)));
        }
        frames.push(SeriesFrame {
            step,
            time,
            cell_volume,
            cells,
        });
    }
    Ok(frames)
}

pub fn read_series_from_path<P: AsRef<Path>>(
    path: P,
    grid: GridSpec,
    format: BinaryStats,
) -> Result<Vec<SeriesFrame>, OutputError> {
    let file = File::open(path)?;
    read_series(BufReader::new(file), grid, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::stats::{FrameStats, GridStats};
    use std::io::Cursor;

    fn collection() -> StatsCollection {
        let g1 = GridSpec::new(1).unwrap();
        let g2 = GridSpec::new(2).unwrap();
        let mut collection = StatsCollection::new();
        for step in 0..3 {
            let mut fine = vec![CellStats::default(); 8];
            fine[7].density = 0.25 * (step + 1) as f64;
            fine[7].momentum = [1.0, 2.0, 3.0];
            fine[7].tensor = [4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
            let coarse = CellStats {
                density: 1.5,
                ..CellStats::default()
            };
            collection.push(FrameStats {
                step: step * 100,
                time: step as f32 * 0.5,
                grids: vec![
                    GridStats {
                        grid: g1,
                        cell_volume: 1000.0,
                        cells: vec![coarse],
                    },
                    GridStats {
                        grid: g2,
                        cell_volume: 125.0,
                        cells: fine,
                    },
                ],
            });
        }
        collection
    }

    #[test]
    fn record_size_matches_layout() {
        let g = GridSpec::new(3).unwrap();
        assert_eq!(BinaryStats::new(false).record_bytes(g), 8 + 27 * 40);
        assert_eq!(BinaryStats::new(true).record_bytes(g), 12 + 27 * 40);
    }

    #[test]
    fn writes_one_fixed_size_record_per_frame() {
        let format = BinaryStats::new(true);
        let mut out = Vec::new();
        format.write_series(&collection(), 1, &mut out).unwrap();
        let g = GridSpec::new(2).unwrap();
        assert_eq!(out.len(), 3 * format.record_bytes(g));

        let mut cursor = &out[format.record_bytes(g)..];
        assert_eq!(cursor.read_i32::<NativeEndian>().unwrap(), 100);
        assert_eq!(cursor.read_f32::<NativeEndian>().unwrap(), 0.5);
        assert_eq!(cursor.read_f32::<NativeEndian>().unwrap(), 125.0);
    }

    #[test]
    fn omitting_step_starts_record_with_time() {
        let format = BinaryStats::new(false);
        let mut out = Vec::new();
        format.write_series(&collection(), 0, &mut out).unwrap();
        assert_eq!(out.len(), 3 * (8 + 40));
        let mut cursor = &out[..];
        assert_eq!(cursor.read_f32::<NativeEndian>().unwrap(), 0.0);
        assert_eq!(cursor.read_f32::<NativeEndian>().unwrap(), 1000.0);
        assert_eq!(cursor.read_f32::<NativeEndian>().unwrap(), 1.5);
    }

    #[test]
    fn written_artifact_reads_back_in_cell_order() {
        let format = BinaryStats::new(false);
        let g = GridSpec::new(2).unwrap();
        let mut out = Vec::new();
        format.write_series(&collection(), 1, &mut out).unwrap();

        let frames = read_series(Cursor::new(out), g, format).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].step, None);
        assert_eq!(frames[2].time, 1.0);
        let corner = frames[2].cell(g, 1, 1, 1).unwrap();
        assert_eq!(corner.density, 0.75);
        assert_eq!(corner.momentum, [1.0, 2.0, 3.0]);
        assert_eq!(corner.tensor, [4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(frames[2].cell(g, 0, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn trailing_partial_record_is_malformed() {
        let format = BinaryStats::new(false);
        let mut out = Vec::new();
        format.write_series(&collection(), 0, &mut out).unwrap();
        out.pop();
        let err = read_series(Cursor::new(out), GridSpec::new(1).unwrap(), format).unwrap_err();
        assert!(matches!(err, OutputError::Malformed(_)));
    }

    #[test]
    fn unknown_grid_index_is_rejected() {
        let mut out = Vec::new();
        let err = BinaryStats::default()
            .write_series(&collection(), 2, &mut out)
            .unwrap_err();
        assert!(matches!(err, OutputError::MissingGrid(2)));
        assert!(out.is_empty());
    }

    #[test]
    fn write_to_unwritable_path_is_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out_2.dat");
        let err = BinaryStats::default()
            .write_series_to_path(&collection(), 1, &path)
            .unwrap_err();
        assert!(matches!(err, OutputError::Create { .. }));
    }
}
