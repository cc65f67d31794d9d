use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomSample {
    pub mass: f32,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub force: Option<Vector3<f32>>,
}

impl AtomSample {
    pub fn new(mass: f32, position: Vector3<f32>, velocity: Vector3<f32>) -> Self {
        Self {
            mass,
            position,
            velocity,
            force: None,
        }
    }

    pub fn with_force(mut self, force: Vector3<f32>) -> Self {
        self.force = Some(force);
        self
    }
}

/// One time-stamped snapshot of every atom in the box.
///
/// The box is assumed cubic; only the x edge is used for geometry, the y and z
/// edges are kept as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub step: i32,
    /// Simulation time in picoseconds.
    pub time: f32,
    /// Box edge lengths in nanometres.
    pub box_edges: Vector3<f32>,
    pub atoms: Vec<AtomSample>,
}

impl Frame {
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn box_edge(&self) -> f64 {
        self.box_edges.x as f64
    }

    pub fn box_volume(&self) -> f64 {
        self.box_edge().powi(3)
    }

    pub fn total_mass(&self) -> f64 {
        self.atoms.iter().map(|a| a.mass as f64).sum()
    }
}

/// An ordered sequence of frames sharing one atom count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    atom_count: usize,
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame. The first frame fixes the atom count; a frame with a
    /// different count is handed back unchanged.
    pub fn push(&mut self, frame: Frame) -> Result<(), Frame> {
        if self.frames.is_empty() {
            self.atom_count = frame.atom_count();
        } else if frame.atom_count() != self.atom_count {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Number of atoms per frame, or zero for an empty trajectory.
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
