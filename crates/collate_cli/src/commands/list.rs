//! List command implementation.

use super::{open_store, CommandResult};
use collate_store::{CollectionInfo, CollectionStore};
use std::path::Path;

/// Runs the list command.
pub fn run(store_path: &Path, format: &str) -> CommandResult {
    let store = open_store(store_path, false)?;
    let infos = store.list_collections()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&infos)?);
        }
        _ => {
            for line in text_lines(&infos) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn text_lines(infos: &[CollectionInfo]) -> Vec<String> {
    if infos.is_empty() {
        return vec!["No collections".to_string()];
    }
    infos
        .iter()
        .map(|info| {
            let name = if info.name.is_empty() {
                "(no name)"
            } else {
                info.name.as_str()
            };
            format!(
                "{}  {:>8}  {}  {}",
                info.id,
                info.manifest_len,
                &info.digest[..info.digest.len().min(12)],
                name
            )
        })
        .collect()
}
