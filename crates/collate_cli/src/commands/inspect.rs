//! Inspect command implementation.

use super::{open_store, parse_id, CommandResult};
use collate_manifest::{FileSummary, Manifest};
use collate_store::CollectionStore;
use serde::Serialize;
use std::path::PathBuf;

/// Where the manifest to inspect comes from.
pub enum Source {
    /// A collection in the store at the given path.
    Collection(PathBuf, String),
    /// A manifest file.
    File(PathBuf),
}

/// Manifest inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Collection id or file path.
    pub source: String,
    /// Number of streams.
    pub stream_count: usize,
    /// Number of block references across all streams.
    pub block_count: usize,
    /// Number of files across all streams.
    pub file_count: usize,
    /// Bytes referenced by all files.
    pub total_bytes: u64,
    /// Per-stream details.
    pub streams: Vec<StreamStats>,
}

/// Statistics for a single stream.
#[derive(Debug, Serialize)]
pub struct StreamStats {
    /// Stream path.
    pub path: String,
    /// Number of blocks in the stream's block list.
    pub blocks: usize,
    /// Bytes referenced by the stream's files.
    pub bytes: u64,
    /// Files in order of first appearance.
    pub files: Vec<FileSummary>,
}

/// Runs the inspect command.
pub fn run(source: Source, format: &str) -> CommandResult {
    let (label, manifest) = match source {
        Source::File(path) => (path.display().to_string(), super::read_manifest(&path)?),
        Source::Collection(store_path, id) => {
            let id = parse_id(&id)?;
            let store = open_store(&store_path, false)?;
            let text = store.fetch_manifest(&id)?;
            (id.to_string(), Manifest::parse(&text)?)
        }
    };
    let result = inspect(label, &manifest);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Builds the inspection result for a parsed manifest.
pub fn inspect(source: String, manifest: &Manifest) -> InspectResult {
    InspectResult {
        source,
        stream_count: manifest.streams.len(),
        block_count: manifest.block_count(),
        file_count: manifest.file_count(),
        total_bytes: manifest.total_bytes(),
        streams: manifest
            .streams
            .iter()
            .map(|s| StreamStats {
                path: s.path.clone(),
                blocks: s.locators.len(),
                bytes: s.total_bytes(),
                files: s.files(),
            })
            .collect(),
    }
}

fn print_text_output(result: &InspectResult) {
    println!("Manifest Inspection");
    println!("===================");
    println!();
    println!("Source: {}", result.source);
    println!();
    println!("Totals:");
    println!("  Streams: {}", result.stream_count);
    println!("  Blocks:  {}", result.block_count);
    println!("  Files:   {}", result.file_count);
    println!("  Size:    {}", format_size(result.total_bytes));

    for stream in &result.streams {
        println!();
        println!(
            "{} ({} blocks, {})",
            stream.path,
            stream.blocks,
            format_size(stream.bytes)
        );
        for file in &stream.files {
            let parts = if file.segments > 1 {
                format!(" in {} segments", file.segments)
            } else {
                String::new()
            };
            println!("  {}  {}{}", file.name, format_size(file.size), parts);
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_counts_streams_and_files() {
        let manifest = Manifest::parse(
            ". acbd18db4cc2f85cedef654fccc4a4d8+3 37b51d194a7513e45b56f6524f2d51f2+3 0:0:foo 1:1:foo 1:0:bar\n\
             ./dir1 d41d8cd98f00b204e9800998ecf8427e+0 0:0:empty\n",
        )
        .unwrap();
        let result = inspect("test".into(), &manifest);
        assert_eq!(result.stream_count, 2);
        assert_eq!(result.block_count, 3);
        assert_eq!(result.file_count, 3);
        assert_eq!(result.total_bytes, 3 + 2 + 3);

        let root = &result.streams[0];
        assert_eq!(root.files[0].name, "foo");
        assert_eq!(root.files[0].segments, 2);
        assert_eq!(root.files[0].size, 5);
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(12), "12 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
