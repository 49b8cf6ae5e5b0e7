//! Vistrail history migration CLI.
//!
//! Provides the `vtmigrate` binary:
//!
//! - `migrate` reads a legacy history dump (JSON), rewrites it into the
//!   generic-operation schema and writes the new history together with the
//!   final id counters and any warnings.
//! - `inspect` materializes one version of a migrated history and prints
//!   its live objects.
//!
//! Exit codes: 0 = success, 1 = migration or replay error, 3 = I/O or parse
//! error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, Level};

use vistrail_core::{ActionId, Vistrail};
use vistrail_migrate::{DanglingDeletePolicy, FunctionAliasing, LegacyVistrail, MigrationConfig};

/// Vistrail history migration tools.
#[derive(Parser)]
#[command(name = "vtmigrate", about = "Migrate legacy vistrail histories")]
struct Cli {
    /// Log every action entered and left.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Migrate a legacy history to the generic-operation schema.
    Migrate {
        /// Legacy history dump (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the migrated history (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on deletes of objects that are not visible.
        #[arg(long)]
        strict_deletes: bool,

        /// Only alias function changes when parameter counts match.
        #[arg(long)]
        strict_aliasing: bool,
    },

    /// Print the objects of one version of a migrated history.
    Inspect {
        /// Migrated history, as written by `migrate`.
        #[arg(short, long)]
        input: PathBuf,

        /// Version (action id) to materialize.
        #[arg(long)]
        version: u64,
    },
}

/// The part of a `migrate` output file that `inspect` needs.
#[derive(Deserialize)]
struct MigratedFile {
    vistrail: Vistrail,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let exit_code = match cli.command {
        Commands::Migrate {
            input,
            output,
            strict_deletes,
            strict_aliasing,
        } => {
            let config = MigrationConfig {
                function_aliasing: if strict_aliasing {
                    FunctionAliasing::Strict
                } else {
                    FunctionAliasing::NameAndPosition
                },
                dangling_deletes: if strict_deletes {
                    DanglingDeletePolicy::Fail
                } else {
                    DanglingDeletePolicy::Warn
                },
            };
            run_migrate(&input, output.as_deref(), &config)
        }
        Commands::Inspect { input, version } => run_inspect(&input, ActionId(version)),
    };
    process::exit(exit_code);
}

/// Execute the migrate subcommand.
fn run_migrate(input: &Path, output: Option<&Path>, config: &MigrationConfig) -> i32 {
    let legacy: LegacyVistrail = match read_json(input) {
        Ok(legacy) => legacy,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let migration = match vistrail_migrate::migrate_with_config(&legacy, config) {
        Ok(migration) => migration,
        Err(e) => {
            eprintln!("Migration error: {}", e);
            return 1;
        }
    };

    let json = match serde_json::to_string_pretty(&migration) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to serialize migrated history: {}", e);
            return 3;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
            info!(output = %path.display(), "wrote migrated history");
        }
        None => println!("{}", json),
    }
    0
}

/// Execute the inspect subcommand.
fn run_inspect(input: &Path, version: ActionId) -> i32 {
    let file: MigratedFile = match read_json(input) {
        Ok(file) => file,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let workflow = match file.vistrail.materialize(version) {
        Ok(workflow) => workflow,
        Err(e) => {
            eprintln!("Error: cannot materialize version {}: {}", version, e);
            return 1;
        }
    };

    let objects: Vec<_> = workflow.objects().collect();
    match serde_json::to_string_pretty(&objects) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize workflow: {}", e);
            3
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("failed to parse '{}': {}", path.display(), e))
}
