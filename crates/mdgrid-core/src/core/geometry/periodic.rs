use nalgebra::Vector3;

/// Maps a coordinate component into the canonical box domain `[0, edge)`.
///
/// Uses a modulo reduction, so arbitrarily large displacements are handled in
/// constant time. A value that lands exactly on `edge` after rounding (e.g. a
/// tiny negative input) is folded back to zero. Non-finite input is returned
/// unchanged and rejected later by the grid.
#[inline]
pub fn wrap_coordinate(c: f64, edge: f64) -> f64 {
    let w = c.rem_euclid(edge);
    if w >= edge { w - edge } else { w }
}

#[inline]
pub fn wrap_position(position: &Vector3<f32>, edge: f64) -> [f64; 3] {
    [
        wrap_coordinate(position.x as f64, edge),
        wrap_coordinate(position.y as f64, edge),
        wrap_coordinate(position.z as f64, edge),
    ]
}
