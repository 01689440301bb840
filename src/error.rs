use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by every stage of an import.
///
/// Each variant maps to exactly one operator-facing message. Low-level causes (driver errors,
/// parser positions) are logged at `debug` by the stage that hit them and never appear in the
/// `Display` output, and no variant ever carries a credential value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Required database settings are missing (or unusable) after cleaning.
    #[error("{}", configuration_message(.missing, .invalid))]
    Configuration {
        /// Names of settings that are absent or blank, e.g. `DB_HOST`.
        missing: Vec<String>,
        /// Names of settings that are present but unusable, e.g. a non-numeric `DB_PORT`.
        invalid: Vec<String>,
    },

    /// The database could not be reached or rejected the connection.
    #[error("could not connect to the MySQL database; check host, port and permissions")]
    Connectivity,

    /// The uploaded file could not be read as a table in the selected format.
    #[error("failed to read the spreadsheet: {message}")]
    MalformedInput { message: String },

    /// The table lacks one or more required columns.
    #[error("the spreadsheet is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The destination table could not be emptied; nothing was inserted.
    #[error("failed to clear the destination table; check TRUNCATE/DELETE permissions")]
    ClearFailed,

    /// A chunk insert failed. Rows from earlier chunks stay committed.
    #[error(
        "failed to insert records after {inserted} of {total} row(s); check that column names and types match"
    )]
    InsertFailed { inserted: usize, total: usize },
}

fn configuration_message(missing: &[String], invalid: &[String]) -> String {
    match (missing.is_empty(), invalid.is_empty()) {
        (false, true) => format!("missing database settings: {}", missing.join(", ")),
        (true, false) => format!("invalid database settings: {}", invalid.join(", ")),
        _ => format!(
            "missing database settings: {}; invalid database settings: {}",
            missing.join(", "),
            invalid.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::ImportError;

    #[test]
    fn configuration_message_lists_every_missing_setting() {
        let err = ImportError::Configuration {
            missing: vec!["DB_HOST".to_string(), "DB_PASSWORD".to_string()],
            invalid: Vec::new(),
        };
        assert_eq!(err.to_string(), "missing database settings: DB_HOST, DB_PASSWORD");
    }

    #[test]
    fn configuration_message_mentions_invalid_settings() {
        let err = ImportError::Configuration {
            missing: vec!["DB_USERNAME".to_string()],
            invalid: vec!["DB_PORT".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing database settings: DB_USERNAME"));
        assert!(msg.contains("invalid database settings: DB_PORT"));
    }

    #[test]
    fn insert_failure_reports_true_count() {
        let err = ImportError::InsertFailed {
            inserted: 1000,
            total: 1200,
        };
        assert!(err.to_string().contains("after 1000 of 1200"));
    }
}
