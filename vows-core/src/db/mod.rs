//! SQLite persistence.
//!
//! Uniqueness (RSVP email, confirmation code, event calendar UID) is enforced
//! by the schema; a violation comes back as [`VowsError::Conflict`].

mod events;
mod photos;
mod registry;
mod rsvps;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::{VowsError, VowsResult};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) and migrate the database at `url`.
    pub async fn connect(url: &str) -> VowsResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection.
        let in_memory = url.contains(":memory:");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let db = Database { pool };
        db.migrate().await?;
        info!(url, "Database ready");

        Ok(db)
    }

    /// Fresh private database, for tests and dry runs.
    pub async fn in_memory() -> VowsResult<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> VowsResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Turn unique-constraint violations into conflicts; pass everything else on.
fn map_write_error(err: sqlx::Error) -> VowsError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            VowsError::Conflict(db_err.message().to_string())
        }
        _ => VowsError::Database(err),
    }
}
