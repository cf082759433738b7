use std::str::FromStr;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};

use crate::config::db::{db_url, sanitize_db_url, DbKind, DbProfile};
use crate::error::AppError;

const PG_MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Connect for a profile and bring the schema up to date.
///
/// In-memory SQLite lives exactly as long as its single connection, so that
/// pool is pinned to one connection that is never recycled. Writers queue for
/// it, which serializes them.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(&profile)?;
    let kind = DbKind::from_url(&url)?;
    info!(db = %sanitize_db_url(&url), kind = ?kind, "Connecting to database");

    let conn = match kind {
        DbKind::Postgres => connect_postgres(&url).await?,
        DbKind::SqliteFile | DbKind::SqliteMemory => connect_sqlite(&url, kind).await?,
    };

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("Migrations failed: {e}")))?;
    Ok(conn)
}

async fn connect_sqlite(url: &str, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| AppError::config(format!("Invalid SQLite URL: {e}")))?
        .foreign_keys(true)
        .busy_timeout(ACQUIRE_TIMEOUT)
        .create_if_missing(true);

    let pool_options = match kind {
        DbKind::SqliteMemory => SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None),
        _ => SqlitePoolOptions::new().max_connections(4),
    };

    let pool = pool_options
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(|e| AppError::config(format!("Failed to open SQLite pool: {e}")))?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

async fn connect_postgres(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = PgPoolOptions::new()
            .max_connections(PG_MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(Duration::from_secs(30))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET timezone = 'UTC'")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(url)
            .await;

        match result {
            Ok(pool) => {
                if attempt > 1 {
                    info!(attempt, "Postgres connection succeeded after retry");
                }
                return Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool));
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(attempt, max_attempts = CONNECT_ATTEMPTS, error = %e, "Postgres connection failed, retrying");
                tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Failed to connect to Postgres after {attempt} attempts: {e}"
                )))
            }
        }
    }
}
