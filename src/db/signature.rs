use super::core::Database;

impl Database {
    pub async fn signature_exists(&self, person_id: i64, issue_id: i64) -> Result<bool, sqlx::Error> {
        let exists = sqlx::query("SELECT 1 FROM signatures WHERE person_id = ?1 AND issue_id = ?2")
            .bind(person_id)
            .bind(issue_id)
            .fetch_optional(self.pool())
            .await?
            .is_some();
        Ok(exists)
    }

    /// Store the JSON payload of an extracted signature
    pub async fn add_signature(
        &self,
        person_id: i64,
        issue_id: i64,
        data: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO signatures (person_id, issue_id, data)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(person_id, issue_id) DO UPDATE SET data = excluded.data
            RETURNING id
            "#,
        )
        .bind(person_id)
        .bind(issue_id)
        .bind(data)
        .fetch_one(self.pool())
        .await
    }

    /// Stored payloads of an issue, in insertion order
    pub async fn get_issue_signatures(&self, issue_id: i64) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT data FROM signatures WHERE issue_id = ?1 ORDER BY id ASC")
            .bind(issue_id)
            .fetch_all(self.pool())
            .await
    }
}
