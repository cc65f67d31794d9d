use mdgrid::core::io::trajectory::MassLayout;
use mdgrid::engine::config::OutputMode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid cell '{0}'. Expected three comma-separated indices 'i,j,k' (e.g., '0,1,2').")]
    InvalidCell(String),

    #[error("Invalid mass layout '{0}'. Expected 'per-atom-mass' or 'header-mass'.")]
    InvalidLayout(String),

    #[error("Invalid output mode '{0}'. Expected 'binary' or 'text'.")]
    InvalidMode(String),

    #[error("Invalid grid list '{0}'. Expected comma-separated positive integers (e.g., '1,2,3,5').")]
    InvalidResolutions(String),
}

/// Parses `"i,j,k"` into a cell coordinate triple.
pub fn parse_cell(value: &str) -> Result<(usize, usize, usize), ParseError> {
    let indices = value
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ParseError::InvalidCell(value.to_string()))?;
    match indices.as_slice() {
        [i, j, k] => Ok((*i, *j, *k)),
        _ => Err(ParseError::InvalidCell(value.to_string())),
    }
}

pub fn parse_layout(value: &str) -> Result<MassLayout, ParseError> {
    match value.trim() {
        "per-atom-mass" => Ok(MassLayout::PerAtomMass),
        "header-mass" => Ok(MassLayout::HeaderMass),
        _ => Err(ParseError::InvalidLayout(value.to_string())),
    }
}

pub fn parse_mode(value: &str) -> Result<OutputMode, ParseError> {
    match value.trim() {
        "binary" => Ok(OutputMode::Binary),
        "text" => Ok(OutputMode::Text),
        _ => Err(ParseError::InvalidMode(value.to_string())),
    }
}

/// Parses a comma-separated resolution list. Range checks happen later, when
/// the grid set is built.
pub fn parse_resolutions(value: &str) -> Result<Vec<usize>, ParseError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ParseError::InvalidResolutions(value.to_string()))
}
