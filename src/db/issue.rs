use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use tracing::debug;

use super::core::Database;
use super::query::{Conditions, IssueColumn};
use crate::signature::{Issue, NewIssue};
use crate::TARGET_DB;

fn issue_from_row(row: &SqliteRow) -> Issue {
    Issue {
        id: row.get("id"),
        file: row.get("file"),
        number: row.get("number"),
        title: row.get("title"),
        date: row.get("date"),
        kind: row.get("type"),
        analyzed: row.get::<i64, _>("analyzed") != 0,
    }
}

impl Database {
    /// Insert an issue, or return the id of the issue with the same title
    pub async fn add_issue(&self, issue: &NewIssue) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO issues (file, number, title, date, type)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(title) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&issue.file)
        .bind(&issue.number)
        .bind(&issue.title)
        .bind(&issue.date)
        .bind(&issue.kind)
        .fetch_optional(self.pool())
        .await?;

        if let Some(row) = result {
            Ok(row.get("id"))
        } else {
            debug!(target: TARGET_DB, "Issue '{}' already exists", issue.title);
            sqlx::query_scalar("SELECT id FROM issues WHERE title = ?1")
                .bind(&issue.title)
                .fetch_one(self.pool())
                .await
        }
    }

    /// Load issues matching the conditions, oldest first
    pub async fn load_issues(
        &self,
        conditions: &Conditions<IssueColumn>,
    ) -> Result<Vec<Issue>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, file, number, title, date, type, analyzed FROM issues",
        );
        conditions.push_where(&mut builder);
        builder.push(" ORDER BY date ASC, id ASC");

        let rows = builder.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(issue_from_row).collect())
    }

    pub async fn set_issue_analyzed(&self, issue_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE issues SET analyzed = 1 WHERE id = ?1")
            .bind(issue_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
