//! Collate CLI
//!
//! Command-line tools for building collections out of existing ones.
//!
//! # Commands
//!
//! - `import` - Store a manifest file as a new collection
//! - `combine` - Combine selected collections, files and blocks into a new collection
//! - `show` - Print a collection's manifest
//! - `list` - List stored collections
//! - `inspect` - Summarize the streams and files of a manifest
//! - `normalize` - Print a manifest file in canonical form

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Collate command-line tools.
#[derive(Parser)]
#[command(name = "collate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the collection store directory
    #[arg(global = true, short, long, default_value = ".collate")]
    store: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a manifest file as a new collection
    Import {
        /// Collection name
        name: String,

        /// Manifest file to import
        file: PathBuf,
    },

    /// Combine selections into a new collection
    ///
    /// Selectors are `<id>`, `<id>/<path>` or `<hash>+<size>`.
    Combine {
        /// Selectors, in priority order
        #[arg(required = true)]
        selectors: Vec<String>,

        /// Name for the new collection
        #[arg(short, long)]
        name: Option<String>,

        /// Keep only the blocks that selected files use
        #[arg(short, long)]
        compact: bool,

        /// Print the merged manifest without storing it
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Print a collection's manifest
    Show {
        /// Collection id
        id: String,
    },

    /// List stored collections
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Summarize the streams and files of a manifest
    Inspect {
        /// Collection id
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        id: Option<String>,

        /// Read the manifest from a file instead of the store
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a manifest file in canonical form
    Normalize {
        /// Manifest file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Import { name, file } => {
            commands::import::run(&cli.store, &name, &file)?;
        }
        Commands::Combine {
            selectors,
            name,
            compact,
            dry_run,
        } => {
            commands::combine::run(&cli.store, &selectors, name, compact, dry_run)?;
        }
        Commands::Show { id } => {
            commands::show::run(&cli.store, &id)?;
        }
        Commands::List { format } => {
            commands::list::run(&cli.store, &format)?;
        }
        Commands::Inspect { id, file, format } => {
            let source = match (id, file) {
                (_, Some(file)) => commands::inspect::Source::File(file),
                (Some(id), None) => commands::inspect::Source::Collection(cli.store, id),
                (None, None) => return Err("Collection id or --file required for inspect".into()),
            };
            commands::inspect::run(source, &format)?;
        }
        Commands::Normalize { file } => {
            commands::normalize::run(&file)?;
        }
        Commands::Version => {
            println!("Collate CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
