//! Database connection setup for the admin binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use runtime::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::SqlitePoolOptions;
use url::Url;

const MEMORY_DSN: &str = "sqlite::memory:";
const DEFAULT_SQLITE_BUSY_TIMEOUT_MS: u32 = 5000;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Detect DB backend from URL scheme (sqlite/postgres).
pub fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<Backend> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so the file is created on first use.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Open a SeaORM connection for `db`; `mock` swaps in an in-memory SQLite database.
pub async fn connect(db: &DatabaseConfig, home_dir: &Path, mock: bool) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(db)?;

    let mut dsn = if mock {
        MEMORY_DSN.to_string()
    } else {
        db.url.trim().to_owned()
    };

    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite://") {
        dsn = absolutize_sqlite_dsn(&dsn, home_dir, true)?;
    }

    tracing::info!("Connecting to database: {}", dsn);
    let conn = match (backend, mock) {
        (Backend::Postgres, false) => connect_postgres(&dsn, db).await?,
        _ => connect_sqlite(&dsn, db).await?,
    };
    tracing::info!("Connected DB backend: {:?}", conn.get_database_backend());
    Ok(conn)
}

async fn connect_postgres(dsn: &str, db: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.max_connections(db.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    Ok(Database::connect(opts).await?)
}

async fn connect_sqlite(dsn: &str, db: &DatabaseConfig) -> Result<DatabaseConnection> {
    let memory = is_memory_dsn(dsn);

    // An in-memory database lives inside a single connection
    let max_conns = if memory { 1 } else { db.max_conns.unwrap_or(10) };
    let busy_timeout = db.busy_timeout_ms.unwrap_or(DEFAULT_SQLITE_BUSY_TIMEOUT_MS);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if memory {
                    sqlx::query("PRAGMA journal_mode = DELETE")
                        .execute(&mut *conn)
                        .await?;
                } else {
                    sqlx::query("PRAGMA journal_mode = WAL")
                        .execute(&mut *conn)
                        .await?;
                    let stmt = format!("PRAGMA busy_timeout = {busy_timeout}");
                    sqlx::query(&stmt).execute(&mut *conn).await?;
                }
                Ok(())
            })
        })
        .connect(dsn)
        .await?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
