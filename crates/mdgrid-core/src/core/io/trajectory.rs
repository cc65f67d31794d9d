use crate::core::models::frame::{AtomSample, Frame, Trajectory};
use byteorder::{NativeEndian, ReadBytesExt};
use nalgebra::Vector3;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// step (i32), atom count (i32), time (f32), box x/y/z (f32).
pub const FRAME_HEADER_BYTES: usize = 24;

const VALUE_BYTES: usize = 4;

/// Where atom masses are stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MassLayout {
    /// Self-contained frames: every atom record starts with its mass.
    #[default]
    PerAtomMass,
    /// A global header (atom count + one mass per atom) precedes the frames.
    HeaderMass,
}

/// Selects the on-disk layout when a trajectory is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderVariant {
    pub layout: MassLayout,
    /// Whether each atom record carries a force vector.
    pub forces: bool,
}

impl ReaderVariant {
    pub fn new(layout: MassLayout, forces: bool) -> Self {
        Self { layout, forces }
    }

    /// Number of 32-bit values in one atom record.
    pub fn values_per_atom(&self) -> usize {
        let mass = usize::from(self.layout == MassLayout::PerAtomMass);
        let vectors = if self.forces { 3 } else { 2 };
        mass + 3 * vectors
    }

    /// Size in bytes of a complete frame holding `atom_count` atoms.
    pub fn frame_bytes(&self, atom_count: usize) -> usize {
        FRAME_HEADER_BYTES + atom_count * self.values_per_atom() * VALUE_BYTES
    }
}

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("Failed to open trajectory file '{path}': {source}", path = path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Format error in frame {frame}: {kind}")]
    Format { frame: usize, kind: FormatErrorKind },
    #[error("Format error in mass header: {0}")]
    Header(FormatErrorKind),
    #[error("Mass header is truncated: expected {expected} bytes, found {found}")]
    TruncatedHeader { expected: usize, found: usize },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatErrorKind {
    #[error("declared atom count must be positive (found {0})")]
    NonPositiveAtomCount(i32),
    #[error("atom count {found} differs from the established count {expected}")]
    AtomCountMismatch { expected: usize, found: usize },
}

/// Streams frames out of a binary trajectory.
///
/// Yields `Result<Frame, TrajectoryError>` items. A frame cut short by the end
/// of the stream is dropped and ends the iteration without an error; a format
/// error is yielded once and ends the iteration as well.
pub struct TrajectoryReader<R> {
    reader: R,
    variant: ReaderVariant,
    masses: Option<Vec<f32>>,
    atom_count: Option<usize>,
    frames_read: usize,
    finished: bool,
    truncated: bool,
    buffer: Vec<u8>,
}

impl TrajectoryReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, variant: ReaderVariant) -> Result<Self, TrajectoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TrajectoryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?variant, "Opened trajectory file.");
        Self::new(BufReader::new(file), variant)
    }
}

impl<R: Read> TrajectoryReader<R> {
    /// Wraps a byte stream. For [`MassLayout::HeaderMass`] the global mass
    /// header is consumed immediately.
    pub fn new(mut reader: R, variant: ReaderVariant) -> Result<Self, TrajectoryError> {
        let (masses, atom_count) = match variant.layout {
            MassLayout::PerAtomMass => (None, None),
            MassLayout::HeaderMass => {
                let masses = read_mass_header(&mut reader)?;
                let count = masses.len();
                (Some(masses), Some(count))
            }
        };
        Ok(Self {
            reader,
            variant,
            masses,
            atom_count,
            frames_read: 0,
            finished: false,
            truncated: false,
            buffer: Vec::new(),
        })
    }

    pub fn variant(&self) -> ReaderVariant {
        self.variant
    }

    /// The established atom count, known after the mass header or first frame.
    pub fn atom_count(&self) -> Option<usize> {
        self.atom_count
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Bytes occupied by the global mass header (zero for self-contained frames).
    pub fn header_bytes(&self) -> usize {
        self.masses
            .as_ref()
            .map_or(0, |m| VALUE_BYTES + m.len() * VALUE_BYTES)
    }

    pub fn masses(&self) -> Option<&[f32]> {
        self.masses.as_deref()
    }

    /// Whether the stream ended inside a frame that was then discarded.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Reads the next complete frame, or `None` at the end of the stream.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, TrajectoryError> {
        if self.finished {
            return Ok(None);
        }
        match self.read_frame() {
            Ok(Some(frame)) => {
                self.frames_read += 1;
                Ok(Some(frame))
            }
            other => {
                self.finished = true;
                other
            }
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, TrajectoryError> {
        let mut header = [0u8; FRAME_HEADER_BYTES];
        let got = read_up_to(&mut self.reader, &mut header)?;
        if got == 0 {
            debug!(frames = self.frames_read, "Reached end of trajectory.");
            return Ok(None);
        }
        if got < FRAME_HEADER_BYTES {
            warn!(
                frame = self.frames_read,
                bytes = got,
                "Trajectory ends inside a frame header; discarding the partial frame."
            );
            self.truncated = true;
            return Ok(None);
        }

        let mut cursor = &header[..];
        let step = cursor.read_i32::<NativeEndian>()?;
        let declared = cursor.read_i32::<NativeEndian>()?;
        let time = cursor.read_f32::<NativeEndian>()?;
        let box_edges = Vector3::new(
            cursor.read_f32::<NativeEndian>()?,
            cursor.read_f32::<NativeEndian>()?,
            cursor.read_f32::<NativeEndian>()?,
        );

        if declared <= 0 {
            return Err(TrajectoryError::Format {
                frame: self.frames_read,
                kind: FormatErrorKind::NonPositiveAtomCount(declared),
            });
        }
        let natoms = declared as usize;
        match self.atom_count {
            None => self.atom_count = Some(natoms),
            Some(expected) if expected != natoms => {
                return Err(TrajectoryError::Format {
                    frame: self.frames_read,
                    kind: FormatErrorKind::AtomCountMismatch {
                        expected,
                        found: natoms,
                    },
                });
            }
            Some(_) => {}
        }

        // The buffer grows only as bytes arrive, so a bogus atom count in a
        // short file reads as truncation instead of a huge allocation.
        let block_bytes = natoms
            .checked_mul(self.variant.values_per_atom() * VALUE_BYTES)
            .unwrap_or(usize::MAX);
        self.buffer.clear();
        let got = read_bounded(&mut self.reader, block_bytes, &mut self.buffer)?;
        if got < block_bytes {
            warn!(
                frame = self.frames_read,
                expected = block_bytes,
                found = got,
                "Trajectory ends inside an atom block; discarding the partial frame."
            );
            self.truncated = true;
            return Ok(None);
        }

        let atoms = decode_atoms(&self.buffer, natoms, self.variant, self.masses.as_deref())?;
        trace!(step, time, natoms, "Decoded frame.");
        Ok(Some(Frame {
            step,
            time,
            box_edges,
            atoms,
        }))
    }
}

impl<R: Read> Iterator for TrajectoryReader<R> {
    type Item = Result<Frame, TrajectoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Reads a whole trajectory into memory.
///
/// All or nothing: a format error discards every frame read so far.
pub fn read_trajectory<P: AsRef<Path>>(
    path: P,
    variant: ReaderVariant,
) -> Result<Trajectory, TrajectoryError> {
    let reader = TrajectoryReader::open(path, variant)?;
    collect_trajectory(reader)
}

pub fn read_trajectory_from<R: Read>(
    reader: R,
    variant: ReaderVariant,
) -> Result<Trajectory, TrajectoryError> {
    collect_trajectory(TrajectoryReader::new(reader, variant)?)
}

fn collect_trajectory<R: Read>(
    reader: TrajectoryReader<R>,
) -> Result<Trajectory, TrajectoryError> {
    let mut trajectory = Trajectory::new();
    for (index, frame) in reader.enumerate() {
        trajectory
            .push(frame?)
            .map_err(|rejected| TrajectoryError::Format {
                frame: index,
                kind: FormatErrorKind::AtomCountMismatch {
                    expected: trajectory.atom_count(),
                    found: rejected.atom_count(),
                },
            })?;
    }
    Ok(trajectory)
}

fn read_mass_header<R: Read>(reader: &mut R) -> Result<Vec<f32>, TrajectoryError> {
    let mut count_bytes = [0u8; VALUE_BYTES];
    let got = read_up_to(reader, &mut count_bytes)?;
    if got < VALUE_BYTES {
        return Err(TrajectoryError::TruncatedHeader {
            expected: VALUE_BYTES,
            found: got,
        });
    }
    let declared = (&count_bytes[..]).read_i32::<NativeEndian>()?;
    if declared <= 0 {
        return Err(TrajectoryError::Header(
            FormatErrorKind::NonPositiveAtomCount(declared),
        ));
    }

    let natoms = declared as usize;
    let table_bytes = natoms.checked_mul(VALUE_BYTES).unwrap_or(usize::MAX);
    let mut bytes = Vec::new();
    let got = read_bounded(reader, table_bytes, &mut bytes)?;
    if got < table_bytes {
        return Err(TrajectoryError::TruncatedHeader {
            expected: VALUE_BYTES.saturating_add(table_bytes),
            found: VALUE_BYTES + got,
        });
    }
    let mut masses = vec![0f32; natoms];
    (&bytes[..]).read_f32_into::<NativeEndian>(&mut masses)?;
    debug!(natoms, "Read global mass header.");
    Ok(masses)
}

/// Decodes one atom block. Components are interleaved per axis: `x` of r, v
/// (and f), then `y`, then `z`.
fn decode_atoms(
    block: &[u8],
    natoms: usize,
    variant: ReaderVariant,
    masses: Option<&[f32]>,
) -> io::Result<Vec<AtomSample>> {
    let mut cursor = block;
    let mut atoms = Vec::with_capacity(natoms);
    for n in 0..natoms {
        let mass = match masses {
            Some(table) => table[n],
            None => cursor.read_f32::<NativeEndian>()?,
        };
        let mut r = [0f32; 3];
        let mut v = [0f32; 3];
        let mut f = [0f32; 3];
        for axis in 0..3 {
            r[axis] = cursor.read_f32::<NativeEndian>()?;
            v[axis] = cursor.read_f32::<NativeEndian>()?;
            if variant.forces {
                f[axis] = cursor.read_f32::<NativeEndian>()?;
            }
        }
        let mut atom = AtomSample::new(mass, Vector3::from(r), Vector3::from(v));
        if variant.forces {
            atom = atom.with_force(Vector3::from(f));
        }
        atoms.push(atom);
    }
    Ok(atoms)
}

/// Appends at most `limit` bytes to `buf` and reports how many arrived.
fn read_bounded<R: Read>(reader: &mut R, limit: usize, buf: &mut Vec<u8>) -> io::Result<usize> {
    reader.by_ref().take(limit as u64).read_to_end(buf)
}

/// Fills `buf` as far as the stream allows and reports how many bytes arrived.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use byteorder::WriteBytesExt;

    pub struct RawAtom {
        pub mass: f32,
        pub r: [f32; 3],
        pub v: [f32; 3],
        pub f: [f32; 3],
    }

    impl RawAtom {
        pub fn at(mass: f32, r: [f32; 3]) -> Self {
            Self {
                mass,
                r,
                v: [0.0; 3],
                f: [0.0; 3],
            }
        }

        pub fn moving(mass: f32, r: [f32; 3], v: [f32; 3]) -> Self {
            Self {
                mass,
                r,
                v,
                f: [0.0; 3],
            }
        }
    }

    /// Builds trajectory byte streams in either layout.
    pub struct TrajectoryBytes {
        variant: ReaderVariant,
        bytes: Vec<u8>,
    }

    impl TrajectoryBytes {
        pub fn new(variant: ReaderVariant) -> Self {
            Self {
                variant,
                bytes: Vec::new(),
            }
        }

        pub fn mass_header(mut self, masses: &[f32]) -> Self {
            self.bytes
                .write_i32::<NativeEndian>(masses.len() as i32)
                .unwrap();
            for &m in masses {
                self.bytes.write_f32::<NativeEndian>(m).unwrap();
            }
            self
        }

        pub fn frame_with_count(
            mut self,
            step: i32,
            time: f32,
            edge: f32,
            declared: i32,
            atoms: &[RawAtom],
        ) -> Self {
            let b = &mut self.bytes;
            b.write_i32::<NativeEndian>(step).unwrap();
            b.write_i32::<NativeEndian>(declared).unwrap();
            b.write_f32::<NativeEndian>(time).unwrap();
            for _ in 0..3 {
                b.write_f32::<NativeEndian>(edge).unwrap();
            }
            for atom in atoms {
                if self.variant.layout == MassLayout::PerAtomMass {
                    b.write_f32::<NativeEndian>(atom.mass).unwrap();
                }
                for axis in 0..3 {
                    b.write_f32::<NativeEndian>(atom.r[axis]).unwrap();
                    b.write_f32::<NativeEndian>(atom.v[axis]).unwrap();
                    if self.variant.forces {
                        b.write_f32::<NativeEndian>(atom.f[axis]).unwrap();
                    }
                }
            }
            self
        }

        pub fn frame(self, step: i32, time: f32, edge: f32, atoms: &[RawAtom]) -> Self {
            let declared = atoms.len() as i32;
            self.frame_with_count(step, time, edge, declared, atoms)
        }

        pub fn truncate_by(mut self, bytes: usize) -> Self {
            let len = self.bytes.len().saturating_sub(bytes);
            self.bytes.truncate(len);
            self
        }

        pub fn build(self) -> Vec<u8> {
            self.bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::io::{Cursor, Write};

    const PER_ATOM: ReaderVariant = ReaderVariant {
        layout: MassLayout::PerAtomMass,
        forces: false,
    };
    const PER_ATOM_FORCES: ReaderVariant = ReaderVariant {
        layout: MassLayout::PerAtomMass,
        forces: true,
    };
    const HEADER: ReaderVariant = ReaderVariant {
        layout: MassLayout::HeaderMass,
        forces: false,
    };

    fn two_atoms() -> Vec<RawAtom> {
        vec![
            RawAtom::moving(1.0, [1.0, 2.0, 3.0], [0.1, 0.2, 0.3]),
            RawAtom::moving(2.0, [4.0, 5.0, 6.0], [0.4, 0.5, 0.6]),
        ]
    }

    #[test]
    fn values_per_atom_reflects_variant() {
        assert_eq!(PER_ATOM.values_per_atom(), 7);
        assert_eq!(PER_ATOM_FORCES.values_per_atom(), 10);
        assert_eq!(HEADER.values_per_atom(), 6);
        assert_eq!(PER_ATOM.frame_bytes(2), 24 + 2 * 7 * 4);
    }

    #[test]
    fn reads_self_contained_frames() {
        let bytes = TrajectoryBytes::new(PER_ATOM)
            .frame(10, 0.5, 3.0, &two_atoms())
            .frame(20, 1.0, 3.5, &two_atoms())
            .build();
        let trajectory = read_trajectory_from(Cursor::new(bytes), PER_ATOM).unwrap();

        assert_eq!(trajectory.atom_count(), 2);
        assert_eq!(trajectory.len(), 2);
        let frame = &trajectory.frames()[1];
        assert_eq!(frame.step, 20);
        assert_eq!(frame.time, 1.0);
        assert_eq!(frame.box_edges, Vector3::new(3.5, 3.5, 3.5));
        assert_eq!(frame.atoms[1].mass, 2.0);
        assert_eq!(frame.atoms[1].position, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(frame.atoms[1].velocity, Vector3::new(0.4, 0.5, 0.6));
        assert_eq!(frame.atoms[1].force, None);
    }

    #[test]
    fn reads_forces_with_per_axis_interleaving() {
        let atoms = [RawAtom {
            mass: 3.0,
            r: [1.0, 2.0, 3.0],
            v: [4.0, 5.0, 6.0],
            f: [7.0, 8.0, 9.0],
        }];
        let bytes = TrajectoryBytes::new(PER_ATOM_FORCES)
            .frame(0, 0.0, 10.0, &atoms)
            .build();
        assert_eq!(bytes.len(), PER_ATOM_FORCES.frame_bytes(1));

        let trajectory = read_trajectory_from(Cursor::new(bytes), PER_ATOM_FORCES).unwrap();
        let atom = trajectory.frames()[0].atoms[0];
        assert_eq!(atom.mass, 3.0);
        assert_eq!(atom.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.velocity, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(atom.force, Some(Vector3::new(7.0, 8.0, 9.0)));
    }

    #[test]
    fn header_layout_applies_global_masses_to_every_frame() {
        let bytes = TrajectoryBytes::new(HEADER)
            .mass_header(&[12.0, 16.0])
            .frame(1, 0.1, 2.0, &two_atoms())
            .frame(2, 0.2, 2.0, &two_atoms())
            .build();
        let reader = TrajectoryReader::new(Cursor::new(bytes), HEADER).unwrap();
        assert_eq!(reader.atom_count(), Some(2));
        assert_eq!(reader.header_bytes(), 12);
        assert_eq!(reader.masses(), Some(&[12.0, 16.0][..]));

        let frames: Vec<Frame> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.atoms[0].mass, 12.0);
            assert_eq!(frame.atoms[1].mass, 16.0);
            assert_eq!(frame.atoms[0].position, Vector3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn header_layout_rejects_frame_with_different_atom_count() {
        let bytes = TrajectoryBytes::new(HEADER)
            .mass_header(&[1.0, 1.0, 1.0])
            .frame(1, 0.1, 2.0, &two_atoms())
            .build();
        let err = read_trajectory_from(Cursor::new(bytes), HEADER).unwrap_err();
        assert!(matches!(
            err,
            TrajectoryError::Format {
                frame: 0,
                kind: FormatErrorKind::AtomCountMismatch {
                    expected: 3,
                    found: 2
                }
            }
        ));
    }

    #[test]
    fn truncated_mass_header_is_an_error() {
        let mut bytes = TrajectoryBytes::new(HEADER)
            .mass_header(&[1.0, 2.0])
            .build();
        bytes.pop();
        let err = TrajectoryReader::new(Cursor::new(bytes), HEADER).err().unwrap();
        assert!(matches!(
            err,
            TrajectoryError::TruncatedHeader {
                expected: 12,
                found: 11
            }
        ));
    }

    #[test]
    fn non_positive_header_count_is_an_error() {
        let mut bytes = Vec::new();
        bytes.write_all(&0i32.to_ne_bytes()).unwrap();
        let err = TrajectoryReader::new(Cursor::new(bytes), HEADER).err().unwrap();
        assert!(matches!(
            err,
            TrajectoryError::Header(FormatErrorKind::NonPositiveAtomCount(0))
        ));
    }

    #[test]
    fn non_positive_frame_count_invalidates_trajectory() {
        let bytes = TrajectoryBytes::new(PER_ATOM)
            .frame(0, 0.0, 3.0, &two_atoms())
            .frame_with_count(1, 0.1, 3.0, -4, &[])
            .build();
        let err = read_trajectory_from(Cursor::new(bytes), PER_ATOM).unwrap_err();
        assert!(matches!(
            err,
            TrajectoryError::Format {
                frame: 1,
                kind: FormatErrorKind::NonPositiveAtomCount(-4)
            }
        ));
    }

    #[test]
    fn changing_atom_count_invalidates_trajectory() {
        let three = [
            RawAtom::at(1.0, [0.0; 3]),
            RawAtom::at(1.0, [0.0; 3]),
            RawAtom::at(1.0, [0.0; 3]),
        ];
        let bytes = TrajectoryBytes::new(PER_ATOM)
            .frame(0, 0.0, 3.0, &two_atoms())
            .frame(1, 0.1, 3.0, &two_atoms())
            .frame(2, 0.2, 3.0, &three)
            .build();
        let err = read_trajectory_from(Cursor::new(bytes), PER_ATOM).unwrap_err();
        assert!(matches!(
            err,
            TrajectoryError::Format {
                frame: 2,
                kind: FormatErrorKind::AtomCountMismatch {
                    expected: 2,
                    found: 3
                }
            }
        ));
    }

    #[test]
    fn partial_atom_block_is_discarded_without_error() {
        let bytes = TrajectoryBytes::new(PER_ATOM)
            .frame(0, 0.0, 3.0, &two_atoms())
            .frame(1, 0.1, 3.0, &two_atoms())
            .frame(2, 0.2, 3.0, &two_atoms())
            .truncate_by(5)
            .build();
        let trajectory = read_trajectory_from(Cursor::new(bytes), PER_ATOM).unwrap();
        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.frames()[1].step, 1);
    }

    #[test]
    fn partial_frame_header_is_discarded_without_error() {
        let mut bytes = TrajectoryBytes::new(PER_ATOM)
            .frame(0, 0.0, 3.0, &two_atoms())
            .build();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let mut reader = TrajectoryReader::new(Cursor::new(bytes), PER_ATOM).unwrap();
        assert!(reader.next_frame().unwrap().is_some());
        assert!(reader.next_frame().unwrap().is_none());
        assert!(reader.is_truncated());
    }

    #[test]
    fn oversized_atom_count_in_short_file_reads_as_truncation() {
        let mut bytes = TrajectoryBytes::new(PER_ATOM_FORCES)
            .frame_with_count(0, 0.0, 3.0, i32::MAX, &[])
            .build();
        bytes.extend_from_slice(&[0u8; 28]);
        assert_eq!(bytes.len(), FRAME_HEADER_BYTES + 28);

        let trajectory = read_trajectory_from(Cursor::new(bytes), PER_ATOM_FORCES).unwrap();
        assert!(trajectory.is_empty());
    }

    #[test]
    fn oversized_mass_header_in_short_file_is_truncated_header() {
        let mut bytes = Vec::new();
        bytes.write_all(&i32::MAX.to_ne_bytes()).unwrap();
        bytes.write_all(&[0u8; 8]).unwrap();
        let err = TrajectoryReader::new(Cursor::new(bytes), HEADER).err().unwrap();
        assert!(matches!(
            err,
            TrajectoryError::TruncatedHeader { found: 12, .. }
        ));
    }

    #[test]
    fn header_layout_with_forces_discards_partial_atom_block() {
        let variant = ReaderVariant::new(MassLayout::HeaderMass, true);
        let bytes = TrajectoryBytes::new(variant)
            .mass_header(&[1.0, 2.0])
            .frame(0, 0.0, 3.0, &two_atoms())
            .frame(1, 0.1, 3.0, &two_atoms())
            .truncate_by(4)
            .build();
        // Header, one full frame, and all but one value of the second frame.
        assert_eq!(bytes.len(), 12 + 2 * variant.frame_bytes(2) - 4);

        let trajectory = read_trajectory_from(Cursor::new(bytes), variant).unwrap();
        assert_eq!(trajectory.len(), 1);
        let atom = trajectory.frames()[0].atoms[1];
        assert_eq!(atom.mass, 2.0);
        assert_eq!(atom.position, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(atom.force, Some(Vector3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_stream_yields_empty_trajectory() {
        let trajectory = read_trajectory_from(Cursor::new(Vec::new()), PER_ATOM).unwrap();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.atom_count(), 0);

        let mut reader = TrajectoryReader::new(Cursor::new(Vec::new()), PER_ATOM).unwrap();
        assert!(reader.next_frame().unwrap().is_none());
        assert!(!reader.is_truncated());
    }

    #[test]
    fn every_frame_has_established_atom_count() {
        let mut builder = TrajectoryBytes::new(PER_ATOM);
        for step in 0..5 {
            builder = builder.frame(step, step as f32, 3.0, &two_atoms());
        }
        let trajectory = read_trajectory_from(Cursor::new(builder.build()), PER_ATOM).unwrap();
        assert!(
            trajectory
                .iter()
                .all(|f| f.atom_count() == trajectory.atom_count())
        );
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let bytes = TrajectoryBytes::new(PER_ATOM)
            .frame_with_count(0, 0.0, 3.0, 0, &[])
            .frame(1, 0.1, 3.0, &two_atoms())
            .build();
        let mut reader = TrajectoryReader::new(Cursor::new(bytes), PER_ATOM).unwrap();
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
        assert_eq!(reader.frames_read(), 0);
    }

    #[test]
    fn reading_same_file_twice_is_identical() {
        let bytes = TrajectoryBytes::new(PER_ATOM_FORCES)
            .frame(0, 0.0, 3.0, &two_atoms())
            .frame(1, 0.1, 3.0, &two_atoms())
            .build();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let first = read_trajectory(file.path(), PER_ATOM_FORCES).unwrap();
        let second = read_trajectory(file.path(), PER_ATOM_FORCES).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.out");
        let err = read_trajectory(&path, PER_ATOM).unwrap_err();
        match err {
            TrajectoryError::Open { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
