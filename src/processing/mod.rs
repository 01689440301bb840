//! Row validation and normalization.
//!
//! The processing layer turns the loosely typed [`crate::types::Table`] produced by ingestion
//! into an [`crate::types::ImportBatch`] shaped like the staging table. It is purely in-memory
//! and never mutates its input.
//!
//! ## Example
//!
//! ```rust
//! use importador_redacoes::processing::validate_and_normalize;
//! use importador_redacoes::types::{Table, Value, REQUIRED_COLUMNS};
//!
//! let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
//! let text = |s: &str| Value::Utf8(s.to_string());
//! let table = Table::new(
//!     columns,
//!     vec![
//!         vec![text("1"), text("a.png"), text("Tema A"), text("Texto A"), text("10")],
//!         vec![text("1"), text("b.png"), text("Tema A"), text("Texto B"), text("10")],
//!     ],
//! );
//!
//! let batch = validate_and_normalize(&table).unwrap();
//! assert_eq!(batch.len(), 1);
//! assert_eq!(batch.rows[0].redacao_texto, "Texto B");
//! assert_eq!(batch.rows[0].corretor, "IA");
//! ```

pub mod coerce;
pub mod validate;

pub use validate::validate_and_normalize;
