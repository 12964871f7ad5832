//! Fixture collections and store helpers.
//!
//! The fixture set covers the shapes the merge engine has to handle:
//! single-file collections that all contain `foo`, collections with
//! `./dir1` and `./dir2` streams full of duplicate names, a multilevel
//! collection of empty files and a collection with `foo` in `./dir1`.

use collate_store::{CollectionId, CollectionStore, FileStore, InMemoryStore};
use std::ops::Deref;
use tempfile::TempDir;
use uuid::Uuid;

/// Locator of the 3-byte block `foo`.
pub const FOO_BLOCK: &str = "acbd18db4cc2f85cedef654fccc4a4d8+3";
/// Locator of the 3-byte block `bar`.
pub const BAR_BLOCK: &str = "37b51d194a7513e45b56f6524f2d51f2+3";
/// Locator of the 3-byte block `baz`.
pub const BAZ_BLOCK: &str = "73feffa4b7f6bb68e44cf984c85f6e88+3";
/// Locator of the empty block.
pub const EMPTY_BLOCK: &str = "d41d8cd98f00b204e9800998ecf8427e+0";
/// A block that no fixture collection references, used as a bare locator.
pub const LOOSE_BLOCK: &str = "7a6ef4c162a5c6413070a8bd0bffc818+150";

const fn fixture_id(n: u128) -> CollectionId {
    CollectionId::from_uuid(Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0000 | n))
}

/// `. foo`
pub const FOO_COLLECTION: CollectionId = fixture_id(0xf001);
/// `. foo`, stored without a name.
pub const NONAME_FOO_COLLECTION: CollectionId = fixture_id(0xf002);
/// `. foo`, a third copy.
pub const OTHER_FOO_COLLECTION: CollectionId = fixture_id(0xf003);
/// `. bar`
pub const BAR_COLLECTION: CollectionId = fixture_id(0xba01);
/// `. baz`
pub const BAZ_COLLECTION: CollectionId = fixture_id(0xba02);
/// `./dir1` with `alice`, `alice.txt`, `bob.txt`, `carol.txt`; `./dir2` with `alice.txt`.
pub const DUPLICATE_NAMES_1: CollectionId = fixture_id(0xd001);
/// `./dir1` with `alice`, `alice.txt`; `./dir2` with `alice.txt`.
pub const DUPLICATE_NAMES_2: CollectionId = fixture_id(0xd002);
/// `.`, `./dir1/subdir` and `./dir2`, each with `file1`, `file2`, `file3`.
pub const MULTILEVEL_COLLECTION: CollectionId = fixture_id(0xe001);
/// `./dir1` with `foo` and `bar`.
pub const FOO_AND_BAR_IN_DIR: CollectionId = fixture_id(0xe002);
/// `./subdir` with `foo`.
pub const FOO_IN_SUBDIR: CollectionId = fixture_id(0xe003);

/// A fixture collection: id, name and manifest text.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Well-known id.
    pub id: CollectionId,
    /// Collection name.
    pub name: &'static str,
    /// Manifest text.
    pub manifest_text: String,
}

/// Returns every fixture collection.
#[must_use]
pub fn fixtures() -> Vec<Fixture> {
    let empty_files = "0:0:file1 0:0:file2 0:0:file3";
    vec![
        fixture(FOO_COLLECTION, "foo_file", format!(". {FOO_BLOCK} 0:0:foo\n")),
        fixture(NONAME_FOO_COLLECTION, "", format!(". {FOO_BLOCK} 0:0:foo\n")),
        fixture(
            OTHER_FOO_COLLECTION,
            "foo_file_copy",
            format!(". {FOO_BLOCK} 0:0:foo\n"),
        ),
        fixture(BAR_COLLECTION, "bar_file", format!(". {BAR_BLOCK} 0:0:bar\n")),
        fixture(BAZ_COLLECTION, "baz_file", format!(". {BAZ_BLOCK} 0:0:baz\n")),
        fixture(
            DUPLICATE_NAMES_1,
            "duplicate_names_1",
            format!(
                "./dir1 {EMPTY_BLOCK} 0:0:alice 0:0:alice.txt 0:0:bob.txt 0:0:carol.txt\n\
                 ./dir2 {EMPTY_BLOCK} 0:0:alice.txt\n"
            ),
        ),
        fixture(
            DUPLICATE_NAMES_2,
            "duplicate_names_2",
            format!(
                "./dir1 {EMPTY_BLOCK} 0:0:alice 0:0:alice.txt\n\
                 ./dir2 {EMPTY_BLOCK} 0:0:alice.txt\n"
            ),
        ),
        fixture(
            MULTILEVEL_COLLECTION,
            "multilevel_collection",
            format!(
                ". {EMPTY_BLOCK} {empty_files}\n\
                 ./dir1/subdir {EMPTY_BLOCK} {empty_files}\n\
                 ./dir2 {EMPTY_BLOCK} {empty_files}\n"
            ),
        ),
        fixture(
            FOO_AND_BAR_IN_DIR,
            "foo_and_bar_files_in_dir",
            format!("./dir1 {FOO_BLOCK} {BAR_BLOCK} 0:0:foo 1:0:bar\n"),
        ),
        fixture(
            FOO_IN_SUBDIR,
            "foo_in_subdir",
            format!("./subdir {FOO_BLOCK} 0:0:foo\n"),
        ),
    ]
}

fn fixture(id: CollectionId, name: &'static str, manifest_text: String) -> Fixture {
    Fixture {
        id,
        name,
        manifest_text,
    }
}

/// Returns the manifest text of a fixture collection.
///
/// # Panics
///
/// Panics if `id` is not a fixture id.
#[must_use]
pub fn fixture_text(id: CollectionId) -> String {
    fixtures()
        .into_iter()
        .find(|f| f.id == id)
        .map(|f| f.manifest_text)
        .unwrap_or_else(|| panic!("{id} is not a fixture collection"))
}

/// Creates an in-memory store holding every fixture collection.
#[must_use]
pub fn fixture_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    for f in fixtures() {
        store.insert_with_id(f.id, f.name, f.manifest_text);
    }
    store
}

/// A store for tests, removed when dropped.
pub struct TestStore {
    store: Box<dyn CollectionStore>,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates an empty in-memory store.
    pub fn memory() -> Self {
        Self {
            store: Box::new(InMemoryStore::new()),
            _temp_dir: None,
        }
    }

    /// Creates an in-memory store seeded with the fixtures.
    pub fn with_fixtures() -> Self {
        Self {
            store: Box::new(fixture_store()),
            _temp_dir: None,
        }
    }

    /// Creates an empty file store in a temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::open(&temp_dir.path().join("store"), true)
            .expect("Failed to open file store");
        Self {
            store: Box::new(store),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the store.
    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }
}

impl Deref for TestStore {
    type Target = dyn CollectionStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}

/// Runs a test against the fixture store.
///
/// # Example
///
/// ```rust
/// use collate_testkit::{with_fixture_store, FOO_COLLECTION};
///
/// with_fixture_store(|store| {
///     let text = store.fetch_manifest(&FOO_COLLECTION).unwrap();
///     assert!(text.contains("0:0:foo"));
/// });
/// ```
pub fn with_fixture_store<F, R>(f: F) -> R
where
    F: FnOnce(&dyn CollectionStore) -> R,
{
    let store = TestStore::with_fixtures();
    f(store.store())
}

/// Runs a test against an empty temporary file store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&dyn CollectionStore) -> R,
{
    let store = TestStore::file();
    f(store.store())
}
