//! Ariadne CLI - storage verbs over an Ariadne node store.
//!
//! Command-line interface exposing each storage-adapter operation as a
//! subcommand. Nodes live in a JSON snapshot file loaded into an in-memory
//! CMS for each invocation.

use anyhow::{Context, Result};
use ariadne_core::{AdapterConfig, AriadneAdapter, MemoryCms, StorageAdapter};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Ariadne - path-oriented storage over Ariadne CMS nodes
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Snapshot file holding the node store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// CMS path the adapter is rooted at
    #[arg(long, global = true)]
    root: Option<String>,

    /// Configuration file (defaults to .ariadne/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Create an empty node store with a root directory
    Init,

    /// Check whether a path exists
    Exists {
        /// Path relative to the root
        path: String,
    },

    /// List directory contents as JSON metadata
    Ls {
        /// Directory relative to the root
        #[arg(default_value = "")]
        path: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Print the metadata of a file or directory as JSON
    Stat {
        /// Path relative to the root
        path: String,
    },

    /// Write the contents of a file to stdout
    Cat {
        /// Path relative to the root
        path: String,
    },

    /// Write a file, creating missing directories
    Put {
        /// Path relative to the root
        path: String,

        /// Inline contents
        #[arg(conflicts_with = "file")]
        data: Option<String>,

        /// Read contents from a local file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Create a directory and its missing ancestors
    Mkdir {
        /// Path relative to the root
        path: String,
    },

    /// Delete a file
    Rm {
        /// Path relative to the root
        path: String,
    },

    /// Delete an empty directory
    Rmdir {
        /// Path relative to the root
        path: String,
    },

    /// Copy a file or directory
    Cp {
        /// Source path
        from: String,
        /// Destination path
        to: String,
    },

    /// Move a file or directory
    Mv {
        /// Source path
        from: String,
        /// Destination path
        to: String,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Put { .. }
                | Commands::Mkdir { .. }
                | Commands::Rm { .. }
                | Commands::Rmdir { .. }
                | Commands::Cp { .. }
                | Commands::Mv { .. }
        )
    }
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("ariadne=debug,ariadne_core=debug")
    } else {
        EnvFilter::new("ariadne=info,ariadne_core=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Resolve configuration and dispatch the command
fn run(cli: Cli) -> Result<()> {
    let workdir = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(workdir, cli.config.as_deref(), cli.store, cli.root.as_deref())?;

    if let Commands::Init = cli.command {
        return run_init(&config);
    }

    let cms = open_store(&config)?;
    let adapter = AriadneAdapter::from_config(cms.clone(), &config)
        .with_context(|| format!("Failed to open adapter at {}", config.root_path))?;

    let mutates = cli.command.mutates();
    run_command(&adapter, cli.command)?;

    if mutates {
        cms.save(&config.store_file)
            .with_context(|| format!("Failed to save store {}", config.store_file.display()))?;
    }
    Ok(())
}

/// Execute a storage command against the adapter
fn run_command(adapter: &impl StorageAdapter, command: Commands) -> Result<()> {
    match command {
        Commands::Init => anyhow::bail!("init runs before the store is opened"),
        Commands::Exists { path } => {
            println!("{}", adapter.has(&path));
        }
        Commands::Ls { path, recursive } => {
            let entries = adapter
                .list_contents(&path, recursive)
                .with_context(|| format!("Failed to list {}", path))?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Stat { path } => {
            let metadata = adapter
                .get_metadata(&path)
                .with_context(|| format!("Failed to stat {}", path))?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Commands::Cat { path } => {
            let file = adapter
                .read(&path)
                .with_context(|| format!("Failed to read {}", path))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&file.contents)?;
            stdout.flush()?;
        }
        Commands::Put { path, data, file } => {
            let metadata = match file {
                Some(local) => {
                    let mut reader = std::fs::File::open(&local)
                        .with_context(|| format!("Failed to open {}", local.display()))?;
                    adapter.write_stream(&path, &mut reader)
                }
                None => adapter.write(&path, data.unwrap_or_default().as_bytes()),
            }
            .with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {}", metadata.path);
            println!("✔ Wrote {} ({} bytes)", metadata.path, metadata.size);
        }
        Commands::Mkdir { path } => {
            let metadata = adapter
                .create_dir(&path)
                .with_context(|| format!("Failed to create directory {}", path))?;
            println!("✔ Created {}", metadata.path);
        }
        Commands::Rm { path } => {
            adapter
                .delete(&path)
                .with_context(|| format!("Failed to delete {}", path))?;
            println!("✔ Deleted {}", path);
        }
        Commands::Rmdir { path } => {
            adapter
                .delete_dir(&path)
                .with_context(|| format!("Failed to delete directory {}", path))?;
            println!("✔ Deleted directory {}", path);
        }
        Commands::Cp { from, to } => {
            adapter
                .copy(&from, &to)
                .with_context(|| format!("Failed to copy {} to {}", from, to))?;
            println!("✔ Copied {} -> {}", from, to);
        }
        Commands::Mv { from, to } => {
            adapter
                .rename(&from, &to)
                .with_context(|| format!("Failed to move {} to {}", from, to))?;
            println!("✔ Moved {} -> {}", from, to);
        }
    }
    Ok(())
}

/// Run the init command
fn run_init(config: &AdapterConfig) -> Result<()> {
    if config.store_file.exists() {
        anyhow::bail!(
            "Store already initialized: {}",
            config.store_file.display()
        );
    }

    let cms = MemoryCms::with_root(&config.root_path, &config.default_nls);
    cms.save(&config.store_file)
        .with_context(|| format!("Failed to write store {}", config.store_file.display()))?;

    info!("Initialized store at {}", config.store_file.display());
    println!("✔ Created store {}", config.store_file.display());
    println!("✔ Root directory {} (locale {})", config.root_path, config.default_nls);
    Ok(())
}

/// Load the node store named by the configuration
fn open_store(config: &AdapterConfig) -> Result<MemoryCms> {
    if !config.store_file.exists() {
        anyhow::bail!(
            "Store not initialized. Run 'ariadne init' first.\n\
             Expected file: {}",
            config.store_file.display()
        );
    }
    MemoryCms::load(&config.store_file)
        .with_context(|| format!("Failed to load store {}", config.store_file.display()))
}

/// Load configuration and apply command-line overrides
fn load_config(
    workdir: PathBuf,
    config_file: Option<&Path>,
    store: Option<PathBuf>,
    root: Option<&str>,
) -> Result<AdapterConfig> {
    let mut config = match config_file {
        Some(file) => AdapterConfig::load_from(workdir.clone(), file),
        None => AdapterConfig::load(workdir.clone()),
    }
    .context("Failed to load configuration")?;

    if let Some(store) = store {
        config.store_file = workdir.join(store);
    }
    if let Some(root) = root {
        config = config.with_root_path(root);
    }
    Ok(config)
}
