//! Compares linear scan, binary search, and hash lookup over the same
//! keys, printing the human report and writing the JSON report.
//!
//! Work runs many times per cycle against the same scratch state, so
//! each case only reads its state.

use std::collections::HashMap;

use veribench::prelude::*;
use veribench::{format_human_output, to_json, HarnessConfig, Run};

const LEN: u64 = 1024;
const NEEDLE: u64 = 997;

fn keys() -> Vec<u64> {
    // Deterministic pseudo-shuffle, same data for every case.
    (0..LEN).map(|i| i.wrapping_mul(2654435761) % LEN).collect()
}

fn main() -> anyhow::Result<()> {
    let config = HarnessConfig::discover().unwrap_or_default();
    let mut run = Run::new()?.with_defaults(config.case_defaults()?)?;

    run.register(Case::with_state("linear_scan", keys, |v| {
        v.iter().position(|&x| x == NEEDLE)
    }))?;
    run.register(Case::with_state(
        "binary_search",
        || {
            let mut v = keys();
            v.sort_unstable();
            v
        },
        |v| v.binary_search(&NEEDLE).ok(),
    ))?;
    run.register(Case::with_state(
        "hash_lookup",
        || {
            keys()
                .into_iter()
                .enumerate()
                .map(|(i, k)| (k, i))
                .collect::<HashMap<u64, usize>>()
        },
        |m| m.get(&NEEDLE).copied(),
    ))?;

    let report = run.execute();
    print!("{}", format_human_output(&report));

    std::fs::create_dir_all(&config.output.directory)?;
    let path = std::path::Path::new(&config.output.directory).join("report.json");
    std::fs::write(&path, to_json(&report)?)?;
    println!("JSON report written to {}", path.display());

    Ok(())
}
