//! Breadboard CLI - validate, inspect, and render circuit files.

mod error;
mod report;
mod store;

use bb_core::catalog::Catalog;
use bb_core::lint::{has_warnings, lint_document};
use bb_core::model::Document;
use bb_core::persist::{self, STORAGE_KEY};
use bb_core::simulate::SimulateRequest;
use bb_editor::svg::render_board_svg;
use bb_editor::wiring::WireTool;
use clap::{Parser, Subcommand};
use error::{CliError, ErrorCode};
use report::{Report, format_diagnostics};
use std::path::{Path, PathBuf};
use std::process;
use store::DirStorage;

#[derive(Parser)]
#[command(name = "bb")]
#[command(about = "Breadboard circuit file tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a circuit file for structural problems
    Validate {
        /// Path to a circuit JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Summarize a circuit: components, wires, nets, diagnostics
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the board as SVG
    Svg {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Print the simulation request body for a circuit
    Payload {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write an empty circuit
    New {
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Store a circuit file in a storage directory
    Save {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Storage directory
        #[arg(long, value_name = "DIR")]
        store: PathBuf,

        /// Storage key
        #[arg(long, default_value = STORAGE_KEY)]
        key: String,
    },

    /// Read a circuit back out of a storage directory
    Load {
        #[arg(long, value_name = "DIR")]
        store: PathBuf,

        #[arg(long, default_value = STORAGE_KEY)]
        key: String,

        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                e.exit();
            }
            let _ = e.print();
            process::exit(ErrorCode::Usage as i32);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> Result<(), CliError> {
    let catalog = Catalog::builtin();
    match command {
        Commands::Validate { file } => {
            let doc = read_document(&file)?;
            let diags = lint_document(&doc, &catalog);
            print!("{}", format_diagnostics(&diags));
            if has_warnings(&diags) {
                return Err(CliError::input(format!(
                    "{} failed validation",
                    file.display()
                )));
            }
            Ok(())
        }
        Commands::Inspect { file, json } => {
            let doc = read_document(&file)?;
            let report = Report::build(&doc, &catalog);
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::processing(e.to_string()))?;
                println!("{text}");
            } else {
                print!("{}", report.to_text());
            }
            Ok(())
        }
        Commands::Svg { file, output } => {
            let doc = read_document(&file)?;
            let svg = render_board_svg(&doc, &catalog, &WireTool::new(), None);
            write_output(output.as_deref(), &svg)
        }
        Commands::Payload { file } => {
            let doc = read_document(&file)?;
            let body = SimulateRequest::from_document(&doc, &catalog)
                .to_json()
                .map_err(|e| CliError::processing(e.to_string()))?;
            println!("{body}");
            Ok(())
        }
        Commands::New { output } => {
            let text = persist::to_json(&Document::new())?;
            write_output(output.as_deref(), &text)
        }
        Commands::Save { file, store, key } => {
            let doc = read_document(&file)?;
            let mut storage = DirStorage::new(store);
            persist::save(&mut storage, &key, &doc)?;
            log::info!("wrote {}", storage.path_for(&key).display());
            Ok(())
        }
        Commands::Load { store, key, output } => {
            let storage = DirStorage::new(store);
            let doc = persist::load(&storage, &key).map_err(|e| match e {
                persist::LoadError::NotFound => CliError::input(format!(
                    "no circuit saved under `{key}` in {}",
                    storage.root().display()
                )),
                other => other.into(),
            })?;
            let text = persist::to_json(&doc)?;
            write_output(output.as_deref(), &text)
        }
    }
}

fn read_document(path: &Path) -> Result<Document, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))?;
    persist::parse(&text).map_err(|e| CliError::input(format!("{}: {e}", path.display())))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| CliError::processing(format!("cannot write {}: {e}", path.display())))?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
