//! Import command implementation.

use super::{open_store, read_manifest, CommandResult};
use collate_store::CollectionStore;
use std::path::Path;
use tracing::info;

/// Runs the import command.
///
/// The manifest is validated and stored in canonical form.
pub fn run(store_path: &Path, name: &str, file: &Path) -> CommandResult {
    let manifest = read_manifest(file)?;
    let text = manifest.to_text()?;

    let store = open_store(store_path, true)?;
    let id = store.create_collection(name, &text)?;
    info!(
        collection = %id,
        streams = manifest.streams.len(),
        files = manifest.file_count(),
        "Imported collection"
    );

    println!("{id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn import_stores_canonical_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("in.manifest");
        fs::write(
            &file,
            "./b acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:foo\n\n. 37b51d194a7513e45b56f6524f2d51f2+3 0:0:bar\n",
        )
        .unwrap();
        let store_path = dir.path().join("store");
        run(&store_path, "sample", &file).unwrap();

        let store = open_store(&store_path, false).unwrap();
        let infos = store.list_collections().unwrap();
        assert_eq!(infos.len(), 1);
        let text = store.fetch_manifest(&infos[0].id).unwrap();
        assert!(text.starts_with(". 37b51d194a7513e45b56f6524f2d51f2+3 0:0:bar\n"));
    }

    #[test]
    fn import_rejects_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.manifest");
        fs::write(&file, ". 0:0:foo\n").unwrap();
        let store_path = dir.path().join("store");
        assert!(run(&store_path, "bad", &file).is_err());
        assert!(!store_path.exists());
    }
}
