//! `importador-redacoes` loads a spreadsheet of essay records into the MySQL staging table
//! `temp_analise_correcao_humano`, where they wait for automated grading.
//!
//! An import runs four steps, each usable on its own:
//!
//! 1. [`store::open_connection`]: validated settings ([`config::DbConfig`]) → live connection
//! 2. [`ingestion::parse_table`]: uploaded bytes + filename → [`types::Table`]
//! 3. [`processing::validate_and_normalize`]: table → [`types::ImportBatch`]
//! 4. [`loader::load`]: clear the staging table, then insert the batch in atomic chunks
//!
//! [`pipeline::run_import`] chains steps 2 to 4 for callers that already hold a connection.
//!
//! ## What you can import
//!
//! **File formats (chosen by filename):**
//!
//! - **CSV**: `.csv`
//! - **Spreadsheets**: anything else (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`), first sheet
//!
//! **Required columns** (matched after trimming, lowercasing and replacing spaces with `_`):
//! `redacao_id`, `arquivo_nome_armazenamento`, `tema`, `redacao_texto`, `co_redacao_grade_id`.
//!
//! Every staged row gets `corretor = "IA"` and `nota_c1..nota_c5 = 0`. Rows without a usable
//! `redacao_id` are dropped, and when an id repeats the last row wins.
//!
//! ## Quick example: dry run against an in-memory table
//!
//! ```rust
//! use importador_redacoes::pipeline::{run_import, ImportOptions, ImportOutcome};
//! use importador_redacoes::store::MemoryStore;
//!
//! # fn main() -> Result<(), importador_redacoes::ImportError> {
//! let csv = "redacao_id,arquivo_nome_armazenamento,tema,redacao_texto,co_redacao_grade_id\n\
//!            1,a.png,Tema A,Texto A,10\n\
//!            1,b.png,Tema A,Texto B,10\n\
//!            2,c.png,Tema B,Texto C,11\n";
//!
//! let mut store = MemoryStore::new();
//! let outcome = run_import(&mut store, csv.as_bytes(), "lote.csv", &ImportOptions::default())?;
//!
//! assert!(matches!(outcome, ImportOutcome::Imported(_)));
//! assert_eq!(store.rows().len(), 2);
//! assert_eq!(store.rows()[0].redacao_texto, "Texto B");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: database settings from `.env` / environment
//! - [`ingestion`]: CSV and spreadsheet readers
//! - [`processing`]: validation and normalization
//! - [`store`]: staging-table backends (MySQL, in-memory)
//! - [`loader`]: clear-then-insert bulk loader with progress events
//! - [`pipeline`]: one-call import
//! - [`observability`]: outcome observers and severities
//! - [`error`]: the error type shared by every step

pub mod config;
pub mod error;
pub mod ingestion;
pub mod loader;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod store;
pub mod types;

pub use error::{ImportError, ImportResult};
