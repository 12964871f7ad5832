//! Normalize command implementation.

use super::{read_manifest, CommandResult};
use std::path::Path;

/// Runs the normalize command, printing the canonical form of a manifest
/// file: streams sorted by path, blank lines dropped, names re-escaped.
pub fn run(file: &Path) -> CommandResult {
    let manifest = read_manifest(file)?;
    print!("{}", manifest.to_text()?);
    Ok(())
}
