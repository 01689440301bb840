use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use importador_redacoes::config::DbConfig;
use importador_redacoes::loader::{TracingLoadObserver, DEFAULT_CHUNK_SIZE};
use importador_redacoes::observability::TracingObserver;
use importador_redacoes::pipeline::{run_import, ImportOptions, ImportOutcome};
use importador_redacoes::store::{open_connection, MemoryStore, MAX_ROWS_PER_INSERT};
use importador_redacoes::ImportResult;

/// Replace the contents of `temp_analise_correcao_humano` with the essays in a CSV/XLSX file.
///
/// Database settings come from `.env` or the environment: DB_HOST, DB_PORT, DB_DATABASE,
/// DB_USERNAME, DB_PASSWORD.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Spreadsheet to import (.csv, or any workbook format such as .xlsx/.xls).
    file: PathBuf,

    /// Validate and load into an in-memory table instead of MySQL.
    #[arg(long)]
    dry_run: bool,

    /// Rows per atomic insert (1 to 4681, the most one MySQL statement can bind).
    #[arg(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_ROWS_PER_INSERT as u64)
    )]
    chunk_size: u64,

    /// Print the final summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let bytes = match std::fs::read(&cli.file) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %cli.file.display(), error = %e, "could not read input file");
            eprintln!("could not read {}: {e}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };
    let filename = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match run(&cli, &bytes, &filename) {
        Ok(outcome) => {
            report(&outcome, cli.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, bytes: &[u8], filename: &str) -> ImportResult<ImportOutcome> {
    let options = ImportOptions {
        chunk_size: cli.chunk_size as usize,
        load_observer: Some(Arc::new(TracingLoadObserver)),
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };

    if cli.dry_run {
        let mut store = MemoryStore::new();
        return run_import(&mut store, bytes, filename, &options);
    }

    let config = DbConfig::from_env()?;
    let mut store = open_connection(&config)?;
    run_import(&mut store, bytes, filename, &options)
}

fn report(outcome: &ImportOutcome, json: bool) {
    let summary = outcome.summary();
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(s) => println!("{s}"),
            Err(e) => error!(error = %e, "could not serialize summary"),
        }
        return;
    }

    let v = &summary.validation;
    println!("file:               {}", summary.filename);
    println!("rows read:          {}", v.rows_read);
    println!("dropped (no id):    {}", v.dropped_blank_id);
    println!("dropped (bad id):   {}", v.dropped_invalid_id);
    println!("duplicates removed: {}", v.duplicates_removed);
    match outcome {
        ImportOutcome::Imported(s) => {
            println!("rows inserted:      {}", s.rows_inserted());
            if let Some(method) = s.load.as_ref().and_then(|l| l.clear_method) {
                println!("table cleared with: {method}");
            }
        }
        ImportOutcome::NothingToImport(_) => println!("nothing to import after validation"),
    }
}
