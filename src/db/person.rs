use sqlx::Row;

use super::core::Database;
use crate::signature::Person;

impl Database {
    pub async fn load_person_by_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Person>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name FROM persons WHERE name = ?1")
            .bind(normalized_name)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|row| Person {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Add a person, or return the existing one with the same normalized name
    pub async fn add_person(&self, normalized_name: &str) -> Result<Person, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO persons (name)
            VALUES (?1)
            ON CONFLICT(name) DO UPDATE SET name = excluded.name
            RETURNING id
            "#,
        )
        .bind(normalized_name)
        .fetch_one(self.pool())
        .await?;

        Ok(Person {
            id,
            name: normalized_name.to_string(),
        })
    }
}
