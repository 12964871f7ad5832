//! CLI command implementations.

pub mod combine;
pub mod import;
pub mod inspect;
pub mod list;
pub mod normalize;
pub mod show;

use collate_manifest::Manifest;
use collate_store::{CollectionId, FileStore};
use std::fs;
use std::path::Path;

/// Result type shared by all commands.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opens the store at `path`, creating it only when `create` is set.
pub fn open_store(path: &Path, create: bool) -> CommandResult<FileStore> {
    if !create && !path.exists() {
        return Err(format!("No collection store found at {}", path.display()).into());
    }
    Ok(FileStore::open(path, create)?)
}

/// Parses a collection id argument.
pub fn parse_id(raw: &str) -> CommandResult<CollectionId> {
    CollectionId::parse(raw).ok_or_else(|| format!("Invalid collection id: {raw}").into())
}

/// Reads and parses a manifest file.
pub fn read_manifest(path: &Path) -> CommandResult<Manifest> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    Ok(Manifest::parse(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        assert!(open_store(&path, false).is_err());
        assert!(!path.exists());
        assert!(open_store(&path, true).is_ok());
    }

    #[test]
    fn id_argument_forms() {
        assert!(parse_id("zzzzz-4zz18-znfnqtbbv4spc3w").is_ok());
        assert!(parse_id("0b6a3fb6-0e88-4d5e-9a3c-6c2f2f0c6e11").is_ok());
        assert!(parse_id("7a6ef4c162a5c6413070a8bd0bffc818+150").is_err());
    }
}
