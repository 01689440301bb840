//! MySQL staging store.
//!
//! `sqlx` is async; the import is blocking. [`MySqlStore`] owns a current-thread tokio runtime
//! and a single-connection pool, and drives every statement to completion with `block_on`.

use std::fmt;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument, warn};

use crate::config::DbConfig;
use crate::error::{ImportError, ImportResult};
use crate::types::{DestinationRow, DESTINATION_TABLE, INSERT_COLUMNS};

use super::{StagingStore, StoreError, MAX_ROWS_PER_INSERT};

/// Live connection to the staging table.
pub struct MySqlStore {
    runtime: Runtime,
    pool: MySqlPool,
    table: String,
}

impl fmt::Debug for MySqlStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlStore")
            .field("table", &self.table)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

/// Connect to MySQL and run one liveness probe (`SELECT 1`).
///
/// Any failure, from DNS to rejected credentials, is reported as
/// [`ImportError::Connectivity`]. The driver error is logged at `debug` only, because MySQL
/// echoes the user name in access-denied messages.
#[instrument(skip_all, fields(database = %config.database, port = config.port))]
pub fn open_connection(config: &DbConfig) -> ImportResult<MySqlStore> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            warn!(error = %e, "failed to start database runtime");
            ImportError::Connectivity
        })?;

    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.database)
        .charset("utf8mb4");

    let pool = runtime
        .block_on(async {
            let pool = MySqlPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(config.connect_timeout)
                .test_before_acquire(true)
                .connect_with(options)
                .await?;
            sqlx::query("SELECT 1").execute(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        })
        .map_err(|e| {
            debug!(error = %e, "database liveness probe failed");
            warn!("database unreachable or credentials rejected");
            ImportError::Connectivity
        })?;

    info!("connected to database");
    Ok(MySqlStore {
        runtime,
        pool,
        table: DESTINATION_TABLE.to_string(),
    })
}

impl MySqlStore {
    fn execute(&self, sql: &str) -> Result<(), StoreError> {
        self.runtime
            .block_on(sqlx::query(sql).execute(&self.pool))
            .map(|done| debug!(rows_affected = done.rows_affected(), sql, "statement done"))
            .map_err(StoreError::from)
    }
}

/// Multi-row `INSERT` for `rows`; callers keep `rows` within [`MAX_ROWS_PER_INSERT`].
fn insert_statement<'a>(table: &str, rows: &'a [DestinationRow]) -> QueryBuilder<'a, MySql> {
    let mut qb: QueryBuilder<'a, MySql> =
        QueryBuilder::new(format!("INSERT INTO {table} ({}) ", INSERT_COLUMNS.join(", ")));
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.redacao_id)
            .push_bind(row.corretor)
            .push_bind(row.situacao_nota_zero.as_deref())
            .push_bind(row.nota_c1)
            .push_bind(row.nota_c2)
            .push_bind(row.nota_c3)
            .push_bind(row.nota_c4)
            .push_bind(row.nota_c5)
            .push_bind(row.arquivo_nome_armazenamento.as_str())
            .push_bind(row.tema.as_str())
            .push_bind(row.redacao_texto.as_str())
            .push_bind(row.co_redacao_grade_id)
            .push_bind(row.ocr_confianca)
            .push_bind(row.arquivo_anonimo_nome_armazenamento.as_deref());
    });
    qb
}

impl StagingStore for MySqlStore {
    fn truncate(&mut self) -> Result<(), StoreError> {
        self.execute(&format!("TRUNCATE TABLE {}", self.table))
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.execute(&format!("DELETE FROM {}", self.table))
    }

    fn insert_chunk(&mut self, rows: &[DestinationRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        // Chunks larger than one statement can bind are split, but still commit together.
        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await?;
            for statement_rows in rows.chunks(MAX_ROWS_PER_INSERT) {
                let mut qb = insert_statement(&self.table, statement_rows);
                qb.build().execute(&mut *tx).await?;
            }
            tx.commit().await?;
            Ok::<_, sqlx::Error>(())
        })?;
        Ok(())
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self
            .runtime
            .block_on(sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool))?;
        Ok(count.max(0) as u64)
    }
}
