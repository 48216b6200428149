use tracing::info;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS issues (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file TEXT NOT NULL,
                number TEXT NOT NULL,
                title TEXT NOT NULL UNIQUE,
                date TEXT NOT NULL,
                type TEXT NOT NULL, -- gazette series, e.g. Α
                analyzed INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_issues_pending ON issues (analyzed, type, date);

            CREATE TABLE IF NOT EXISTS persons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE -- normalized name
            );

            -- One stored signature per person and issue; data holds the extracted pair as JSON
            CREATE TABLE IF NOT EXISTS signatures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_id INTEGER NOT NULL,
                issue_id INTEGER NOT NULL,
                data TEXT NOT NULL,
                FOREIGN KEY (person_id) REFERENCES persons (id) ON DELETE CASCADE,
                FOREIGN KEY (issue_id) REFERENCES issues (id) ON DELETE CASCADE,
                UNIQUE (person_id, issue_id)
            );
            CREATE INDEX IF NOT EXISTS idx_signatures_issue_id ON signatures (issue_id);

            -- Observations before cross-issue reconciliation; role is rewritten in place
            CREATE TABLE IF NOT EXISTS raw_signatures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_name TEXT NOT NULL,
                role TEXT NOT NULL,
                issue_title TEXT NOT NULL,
                issue_date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_raw_signatures_person_name ON raw_signatures (person_name);
            CREATE INDEX IF NOT EXISTS idx_raw_signatures_role ON raw_signatures (role);
            CREATE INDEX IF NOT EXISTS idx_raw_signatures_issue ON raw_signatures (issue_title, person_name, role);
            "#,
        )
        .execute(&mut *conn)
        .await?;
        info!(target: TARGET_DB, "Tables ensured to exist");

        Ok(())
    }
}
