use crate::util::config::GridConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes a random but always-valid edit script for soak testing the
/// recompute pipeline. Only the four canonical blocks (and blockages the
/// script itself created) are referenced, so every command resolves.
pub fn generate_random_script(
    filename: &str,
    edits: usize,
    seed: u64,
    grid: &GridConfig,
) -> std::io::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let file = File::create(filename)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# generated: {} edits, seed {}", edits, seed)?;
    writeln!(out, "reset")?;

    let movable = ["clock", "control", "register", "alu0"];
    let mut blockages: Vec<String> = Vec::new();

    for i in 0..edits {
        match rng.gen_range(0..10) {
            0 => writeln!(out, "width {}", rng.gen_range(1..=16))?,
            1 => writeln!(out, "regs {}", rng.gen_range(1..=8))?,
            2 => writeln!(out, "alus {}", rng.gen_range(1..=4))?,
            3 => writeln!(out, "rotate {}", movable[rng.gen_range(0..movable.len())])?,
            4 => {
                let name = format!("bk{}", i);
                writeln!(
                    out,
                    "block {} {} {} {} {}",
                    name,
                    rng.gen_range(0..grid.width),
                    rng.gen_range(0..grid.height),
                    rng.gen_range(0..3),
                    rng.gen_range(0..3),
                )?;
                blockages.push(name);
            }
            5 if !blockages.is_empty() => {
                let name = blockages.swap_remove(rng.gen_range(0..blockages.len()));
                writeln!(out, "remove {}", name)?;
            }
            _ => writeln!(
                out,
                "move {} {} {}",
                movable[rng.gen_range(0..movable.len())],
                rng.gen_range(0..grid.width),
                rng.gen_range(0..grid.height),
            )?,
        }
    }

    log::info!("generated {} edits into {}", edits, filename);
    Ok(())
}
