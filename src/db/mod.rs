//! Database module providing connection management, migrations, and queries.

pub mod uploads;
pub mod users;

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, QueryResult, Statement, TransactionTrait, Value,
};
use sea_orm_migration::MigratorTrait;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// How long a request may wait for a free pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared PostgreSQL connection pool.
///
/// Constructed once in `main`, handed to handlers as `web::Data<DbPool>` and
/// closed after the HTTP server stops. Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Open the pool described by the configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let settings = &config.database;
        let mut options = ConnectOptions::new(settings.connection_url().expose_secret().to_string());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            // Broken idle connections are discarded (and logged by the pool)
            // instead of being handed to a request.
            .test_before_acquire(true)
            .sqlx_logging(config.is_development());

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Get the pooled connection handle for single-statement queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Run one parameterized statement on any available pooled connection.
    ///
    /// Never retries; a failure is reported as `AppError::Database`.
    pub async fn execute(
        &self,
        sql: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> AppResult<Vec<QueryResult>> {
        let stmt = Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values);
        self.conn
            .query_all_raw(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Liveness probe used at startup and by the readiness endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        self.execute("SELECT 1", []).await?;
        Ok(())
    }

    /// Check out one dedicated connection for a multi-statement unit of work.
    pub async fn acquire(&self) -> AppResult<ScopedConnection> {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to check out connection: {}", e)))?;

        debug!("Checked out scoped connection");
        Ok(ScopedConnection { txn })
    }

    /// Apply pending schema migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Drain and close every pooled connection.
    pub async fn close(self) -> AppResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| AppError::Database(format!("Failed to close pool: {}", e)))?;
        info!("Database pool closed");
        Ok(())
    }
}

/// One pooled connection pinned to a unit of work.
///
/// `commit` finishes the work and returns the connection to the pool. Dropping
/// the value on any other path (early return, `?`, panic) rolls the work back
/// and also returns the connection, so checkouts cannot leak.
pub struct ScopedConnection {
    txn: DatabaseTransaction,
}

impl ScopedConnection {
    /// Connection to run statements on.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commit and release the connection.
    pub async fn commit(self) -> AppResult<()> {
        self.txn
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit: {}", e)))?;
        debug!("Released scoped connection");
        Ok(())
    }
}
