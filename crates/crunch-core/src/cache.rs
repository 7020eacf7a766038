//! Incremental build cache: skip repacking when the CLI arguments and every
//! input file's content bytes hash the same as the previous run.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::hash::HashCombiner;

/// Combines every CLI argument token and the content bytes of every resolved
/// input file (directories already expanded to their files, in traversal
/// order) into one build fingerprint.
pub fn compute_build_hash(args: &[String], resolved_files: &[PathBuf]) -> Result<u64> {
    let mut h = HashCombiner::new();
    for arg in args {
        h.combine_str(arg);
    }
    for file in resolved_files {
        let bytes = std::fs::read(file)?;
        h.combine_bytes(&bytes);
    }
    Ok(h.finish())
}

/// Reads the previous run's hash from `<out_dir>/<name>.hash`, if present.
pub fn load_cached_hash(out_dir: &Path, name: &str) -> Option<u64> {
    let contents = std::fs::read_to_string(out_dir.join(format!("{name}.hash"))).ok()?;
    contents.trim().parse().ok()
}

pub fn save_hash(out_dir: &Path, name: &str, hash: u64) -> Result<()> {
    std::fs::write(out_dir.join(format!("{name}.hash")), hash.to_string())?;
    Ok(())
}

/// Every path a previous run could have written: the hash sidecar, the three
/// descriptor formats, and up to 16 atlas pages.
pub fn stale_output_paths(out_dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut paths = vec![
        out_dir.join(format!("{name}.hash")),
        out_dir.join(format!("{name}.bin")),
        out_dir.join(format!("{name}.xml")),
        out_dir.join(format!("{name}.json")),
    ];
    paths.extend((0..16).map(|i| out_dir.join(format!("{name}{i}.png"))));
    paths
}

/// Removes every stale output that exists, before a repack begins.
pub fn clean_stale_outputs(out_dir: &Path, name: &str) -> Result<()> {
    for path in stale_output_paths(out_dir, name) {
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}
