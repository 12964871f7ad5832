//! Combine command implementation.

use super::{open_store, CommandResult};
use collate_core::{Combiner, MergeConfig};
use std::path::Path;
use tracing::info;

/// Runs the combine command.
pub fn run(
    store_path: &Path,
    selectors: &[String],
    name: Option<String>,
    compact: bool,
    dry_run: bool,
) -> CommandResult {
    let mut config = MergeConfig::new().compact_blocks(compact);
    if let Some(name) = name {
        config = config.collection_name(name);
    }

    let store = open_store(store_path, !dry_run)?;
    let combiner = Combiner::with_config(&store, config);

    if dry_run {
        let merged = combiner.merge(selectors)?;
        info!(
            streams = merged.len(),
            files = merged.file_count(),
            "Dry run, nothing stored"
        );
        print!("{}", merged.to_text()?);
        return Ok(());
    }

    let outcome = combiner.combine(selectors)?;
    println!("{}", outcome.collection_id);
    println!(
        "Created \"{}\": {} streams, {} files",
        outcome.name, outcome.streams, outcome.files
    );
    Ok(())
}
