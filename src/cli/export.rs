//! CLI commands for data export
//!
//! Every export goes to stdout unless an output file is given.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{EventraError, EventraResult};
use crate::export::{export_expenses_csv, export_full_json, export_full_yaml};
use crate::services::EventService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data as JSON
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Export all data as YAML
    Yaml {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one event's expenses as CSV
    ExpensesCsv {
        /// Event title or ID
        event: String,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> EventraResult<()> {
    match cmd {
        ExportCommands::Json { output, pretty } => {
            write_to(output.as_deref(), |w| export_full_json(storage, w, pretty))?;
            match output {
                Some(path) => println!("Full export written to: {}", path.display()),
                None => println!(),
            }
        }
        ExportCommands::Yaml { output } => {
            write_to(output.as_deref(), |w| export_full_yaml(storage, w))?;
            if let Some(path) = output {
                println!("Full export written to: {}", path.display());
            }
        }
        ExportCommands::ExpensesCsv { event, output } => {
            let event = EventService::new(storage).require(&event)?;
            let mut count = 0;
            write_to(output.as_deref(), |w| {
                count = export_expenses_csv(storage, event.id, w)?;
                Ok(())
            })?;
            if let Some(path) = output {
                println!("{} expenses exported to: {}", count, path.display());
            }
        }
    }

    Ok(())
}

fn write_to<F>(output: Option<&Path>, write: F) -> EventraResult<()>
where
    F: FnOnce(&mut dyn Write) -> EventraResult<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                EventraError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
