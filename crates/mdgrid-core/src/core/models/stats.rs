use crate::core::geometry::grid::GridSpec;
use std::ops::{Add, AddAssign};

/// Number of values stored per cell: density, momentum (3), tensor (6).
pub const CHANNELS_PER_CELL: usize = 10;

/// Names of the per-cell channels in serialization order.
pub const CHANNEL_NAMES: [&str; CHANNELS_PER_CELL] = [
    "density", "mom_x", "mom_y", "mom_z", "vv_xx", "vv_yy", "vv_zz", "vv_xy", "vv_xz", "vv_yz",
];

/// Aggregated statistics of one control volume.
///
/// During accumulation the fields hold raw sums (`Σm`, `Σm·v`, `Σm·vᵢ·vⱼ`);
/// after [`CellStats::normalize`] they hold densities and the mass-weighted
/// velocity second moment. The tensor is symmetric and stored as
/// `[xx, yy, zz, xy, xz, yz]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellStats {
    pub density: f64,
    pub momentum: [f64; 3],
    pub tensor: [f64; 6],
}

/// Upper-triangle index pairs in tensor storage order.
pub const TENSOR_PAIRS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (0, 2), (1, 2)];

impl CellStats {
    #[inline]
    pub fn add_sample(&mut self, mass: f64, velocity: [f64; 3]) {
        self.density += mass;
        for axis in 0..3 {
            self.momentum[axis] += mass * velocity[axis];
        }
        for (slot, &(i, j)) in TENSOR_PAIRS.iter().enumerate() {
            self.tensor[slot] += mass * velocity[i] * velocity[j];
        }
    }

    /// Turns raw sums into volume-normalized values. Density and momentum are
    /// divided by the cell volume; the tensor by `density * volume`, which is
    /// skipped for an empty cell so that it stays zero.
    pub fn normalize(&mut self, cell_volume: f64) {
        self.density /= cell_volume;
        for m in &mut self.momentum {
            *m /= cell_volume;
        }
        let weight = self.density * cell_volume;
        if weight != 0.0 {
            for t in &mut self.tensor {
                *t /= weight;
            }
        }
    }

    pub fn channels(&self) -> [f64; CHANNELS_PER_CELL] {
        let [mx, my, mz] = self.momentum;
        let [xx, yy, zz, xy, xz, yz] = self.tensor;
        [self.density, mx, my, mz, xx, yy, zz, xy, xz, yz]
    }

    pub fn from_channels(c: [f64; CHANNELS_PER_CELL]) -> Self {
        Self {
            density: c[0],
            momentum: [c[1], c[2], c[3]],
            tensor: [c[4], c[5], c[6], c[7], c[8], c[9]],
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for CellStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for CellStats {
    fn add_assign(&mut self, rhs: Self) {
        self.density += rhs.density;
        for (a, b) in self.momentum.iter_mut().zip(rhs.momentum) {
            *a += b;
        }
        for (a, b) in self.tensor.iter_mut().zip(rhs.tensor) {
            *a += b;
        }
    }
}

/// Statistics for every cell of one grid in one frame, in linear cell order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStats {
    pub grid: GridSpec,
    pub cell_volume: f64,
    pub cells: Vec<CellStats>,
}

impl GridStats {
    pub fn cell(&self, i: usize, j: usize, k: usize) -> Option<&CellStats> {
        self.grid
            .linear_id(i, j, k)
            .and_then(|id| self.cells.get(id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub step: i32,
    pub time: f32,
    /// One entry per configured grid, in configuration order.
    pub grids: Vec<GridStats>,
}

/// Time series of frame statistics in trajectory order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsCollection {
    frames: Vec<FrameStats>,
}

impl StatsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stats: FrameStats) {
        self.frames.push(stats);
    }

    pub fn frames(&self) -> &[FrameStats] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterates the series of one grid (by its position in the grid list)
    /// together with each frame's step and time.
    pub fn series(&self, grid_index: usize) -> impl Iterator<Item = (i32, f32, &GridStats)> + '_ {
        self.frames
            .iter()
            .filter_map(move |f| f.grids.get(grid_index).map(|g| (f.step, f.time, g)))
    }
}
