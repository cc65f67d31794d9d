use super::GeometryError;
use super::periodic::wrap_position;
use nalgebra::Vector3;

/// A uniform cubic grid with `resolution` cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSpec {
    resolution: usize,
}

impl GridSpec {
    /// Returns `None` for a zero resolution or one whose `N³` cells cannot be
    /// indexed.
    pub fn new(resolution: usize) -> Option<Self> {
        let indexable = resolution.checked_pow(3).is_some();
        (resolution > 0 && indexable).then_some(Self { resolution })
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.resolution.pow(3)
    }

    pub fn cell_edge(&self, box_edge: f64) -> f64 {
        box_edge / self.resolution as f64
    }

    pub fn cell_volume(&self, box_edge: f64) -> f64 {
        self.cell_edge(box_edge).powi(3)
    }

    /// Linear id `i + N·j + N²·k`, or `None` if any index is out of range.
    pub fn linear_id(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let n = self.resolution;
        (i < n && j < n && k < n).then(|| i + n * j + n * n * k)
    }

    pub fn cell_coords(&self, id: usize) -> Option<(usize, usize, usize)> {
        let n = self.resolution;
        (id < self.cell_count()).then(|| (id % n, (id / n) % n, id / (n * n)))
    }

    /// Index of a wrapped coordinate along one axis.
    pub fn axis_index(
        &self,
        axis: usize,
        wrapped: f64,
        box_edge: f64,
    ) -> Result<usize, GeometryError> {
        if !wrapped.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate(wrapped));
        }
        let index = (wrapped / box_edge * self.resolution as f64).floor() as i64;
        if index < 0 || index >= self.resolution as i64 {
            return Err(GeometryError::IndexOutOfRange {
                axis,
                index,
                resolution: self.resolution,
                coordinate: wrapped,
            });
        }
        Ok(index as usize)
    }

    /// Linear cell id of an already wrapped coordinate triple.
    pub fn cell_id(&self, wrapped: [f64; 3], box_edge: f64) -> Result<usize, GeometryError> {
        let i = self.axis_index(0, wrapped[0], box_edge)?;
        let j = self.axis_index(1, wrapped[1], box_edge)?;
        let k = self.axis_index(2, wrapped[2], box_edge)?;
        let n = self.resolution;
        Ok(i + n * j + n * n * k)
    }

    /// Wraps a raw position into the box and returns its linear cell id.
    pub fn bin_position(
        &self,
        position: &Vector3<f32>,
        box_edge: f64,
    ) -> Result<usize, GeometryError> {
        self.cell_id(wrap_position(position, box_edge), box_edge)
    }
}

/// Rejects box edges that cannot define a periodic domain.
pub fn validate_box_edge(box_edge: f64) -> Result<f64, GeometryError> {
    if box_edge.is_finite() && box_edge > 0.0 {
        Ok(box_edge)
    } else {
        Err(GeometryError::InvalidBoxEdge(box_edge))
    }
}
