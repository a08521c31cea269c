use crate::db::core::PairTable;
use crate::db::parser::pairs::format_pairs;
use rand::Rng;
use std::fs::File;
use std::io::Write;

/// Generates a random routable instance: each net's two terminals are
/// scattered over the free positions of a 2 x columns slot array, which is
/// then folded into the contact table column by column.
pub fn random_pairs<R: Rng>(columns: usize, nets: usize, rng: &mut R) -> PairTable {
    if columns == 0 {
        return PairTable::default();
    }

    // Two slots per net; clamp requests the channel cannot hold.
    let nets = if nets > columns {
        log::warn!(
            "Requested {} nets do not fit {} columns. Clamped to {}.",
            nets,
            columns,
            columns
        );
        columns
    } else {
        nets
    };

    let mut slots = vec![0u32; 2 * columns];
    for label in 1..=nets as u32 {
        for _ in 0..2 {
            loop {
                let k = rng.gen_range(0..slots.len());
                if slots[k] == 0 {
                    slots[k] = label;
                    break;
                }
            }
        }
    }

    let mut table = PairTable::default();
    for j in 0..columns {
        table.top.push(slots[2 * j]);
        table.bottom.push(slots[2 * j + 1]);
    }
    table
}

/// [`random_pairs`] with the thread-local generator, for callers that do
/// not need reproducibility.
pub fn random_pairs_default(columns: usize, nets: usize) -> PairTable {
    random_pairs(columns, nets, &mut rand::thread_rng())
}

pub fn write_pairs_file(filename: &str, table: &PairTable) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", format_pairs(table))?;
    Ok(())
}
