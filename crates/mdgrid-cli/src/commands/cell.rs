use crate::cli::CellArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use mdgrid::core::geometry::grid::GridSpec;
use mdgrid::core::io::stats_binary::{BinaryStats, read_series_from_path};
use mdgrid::core::models::stats::CHANNEL_NAMES;
use tracing::info;

pub fn run(args: CellArgs) -> Result<()> {
    let grid = GridSpec::new(args.grid).ok_or_else(|| {
        CliError::Argument(format!("Invalid grid resolution: {}", args.grid))
    })?;
    let (i, j, k) =
        parser::parse_cell(&args.cell).map_err(|e| CliError::Argument(e.to_string()))?;
    if grid.linear_id(i, j, k).is_none() {
        return Err(CliError::Argument(format!(
            "Cell ({}, {}, {}) lies outside a {}^3 grid.",
            i, j, k, args.grid
        )));
    }

    info!("Reading statistics artifact {:?}", &args.input);
    let series = read_series_from_path(&args.input, grid, BinaryStats::new(args.include_step))?;
    println!(
        "{} frame(s) in {}, cell ({}, {}, {})",
        series.len(),
        args.input.display(),
        i,
        j,
        k
    );

    let mut header = vec!["step".to_string(), "time".to_string(), "volume".to_string()];
    header.extend(CHANNEL_NAMES.iter().map(|name| name.to_string()));
    println!("{}", header.join("\t"));

    for frame in &series {
        let Some(cell) = frame.cell(grid, i, j, k) else {
            continue;
        };
        let step = frame
            .step
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut row = vec![step, frame.time.to_string(), frame.cell_volume.to_string()];
        row.extend(cell.channels().iter().map(|v| (*v as f32).to_string()));
        println!("{}", row.join("\t"));
    }

    Ok(())
}
