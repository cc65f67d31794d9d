use crate::cli::InspectArgs;
use crate::error::Result;
use mdgrid::core::io::trajectory::{MassLayout, ReaderVariant, TrajectoryReader};
use mdgrid::core::models::frame::Frame;
use tracing::info;

const MASSES_SHOWN: usize = 5;

pub fn run(args: InspectArgs) -> Result<()> {
    let variant = ReaderVariant::new(
        MassLayout::from(args.layout),
        args.forces.resolve().unwrap_or(false),
    );
    info!("Opening {:?} as {:?}", &args.input, variant);
    let mut reader = TrajectoryReader::open(&args.input, variant)?;

    if let Some(masses) = reader.masses() {
        println!("Atoms (header): {}", masses.len());
        println!("First masses: {:?}", &masses[..masses.len().min(MASSES_SHOWN)]);
    }

    let mut frames = 0usize;
    let mut last: Option<Frame> = None;
    while let Some(frame) = reader.next_frame()? {
        frames += 1;
        last = Some(frame);
    }

    println!("Frames: {}", frames);
    let Some(frame) = last else {
        println!("No complete frames in file.");
        return Ok(());
    };

    if reader.masses().is_none() {
        let masses: Vec<f32> = frame
            .atoms
            .iter()
            .take(MASSES_SHOWN)
            .map(|a| a.mass)
            .collect();
        println!("Atoms: {}", frame.atom_count());
        println!("First masses: {:?}", masses);
    }

    println!(
        "Last frame: step = {}, time = {} ps, box = ({}, {}, {}) nm",
        frame.step, frame.time, frame.box_edges.x, frame.box_edges.y, frame.box_edges.z
    );
    for (index, atom) in frame.atoms.iter().take(args.atoms).enumerate() {
        let r = atom.position;
        let v = atom.velocity;
        match atom.force {
            Some(f) => println!(
                "  [{}] r = ({}, {}, {})  v = ({}, {}, {})  f = ({}, {}, {})",
                index, r.x, r.y, r.z, v.x, v.y, v.z, f.x, f.y, f.z
            ),
            None => println!(
                "  [{}] r = ({}, {}, {})  v = ({}, {}, {})",
                index, r.x, r.y, r.z, v.x, v.y, v.z
            ),
        }
    }

    Ok(())
}
