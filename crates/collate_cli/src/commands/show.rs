//! Show command implementation.

use super::{open_store, parse_id, CommandResult};
use collate_store::CollectionStore;
use std::path::Path;

/// Runs the show command, printing the stored manifest text.
pub fn run(store_path: &Path, id: &str) -> CommandResult {
    let id = parse_id(id)?;
    let store = open_store(store_path, false)?;
    print!("{}", store.fetch_manifest(&id)?);
    Ok(())
}
