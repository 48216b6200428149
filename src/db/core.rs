use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Pool, Sqlite,
};
use std::str::FromStr;
use tokio::time::Duration;
use tracing::{info, instrument};

use crate::TARGET_DB;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Get access to the database pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

impl Database {
    #[instrument(target = "db_query", level = "info")]
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(target: TARGET_DB, "Creating database pool for: {}", database_url);

        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", database_url))?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;

        info!(target: TARGET_DB, "Database pool created");

        // Initialize schema
        let db = Database { pool };
        db.initialize_schema().await?;

        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs.
    ///
    /// Every SQLite connection to `:memory:` opens a separate database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?;

        let db = Database { pool };
        db.initialize_schema().await?;

        Ok(db)
    }

    /// Row counts of every table, for the CLI summary
    pub async fn collect_stats(&self) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
        let queries = [
            ("issues", "SELECT COUNT(*) FROM issues"),
            ("pending issues", "SELECT COUNT(*) FROM issues WHERE analyzed = 0"),
            ("persons", "SELECT COUNT(*) FROM persons"),
            ("signatures", "SELECT COUNT(*) FROM signatures"),
            ("raw signatures", "SELECT COUNT(*) FROM raw_signatures"),
        ];

        let mut results = Vec::with_capacity(queries.len());
        for (label, query) in queries {
            let count: i64 = sqlx::query_scalar(query).fetch_one(&self.pool).await?;
            results.push((label, count));
        }

        Ok(results)
    }
}
