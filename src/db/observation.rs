use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use tracing::debug;

use super::core::Database;
use super::query::{Conditions, ObservationColumn};
use crate::signature::RawSignatureObservation;
use crate::TARGET_DB;

fn observation_from_row(row: &SqliteRow) -> RawSignatureObservation {
    RawSignatureObservation {
        person_name: row.get("person_name"),
        role: row.get("role"),
        issue_title: row.get("issue_title"),
        issue_date: row.get("issue_date"),
    }
}

impl Database {
    /// Insert many observations in one transaction
    pub async fn add_raw_signatures(
        &self,
        observations: &[RawSignatureObservation],
    ) -> Result<u64, sqlx::Error> {
        if observations.is_empty() {
            return Ok(0);
        }

        let mut transaction = self.pool().begin().await?;
        let mut inserted = 0;
        for observation in observations {
            inserted += sqlx::query(
                r#"
                INSERT INTO raw_signatures (person_name, role, issue_title, issue_date)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&observation.person_name)
            .bind(&observation.role)
            .bind(&observation.issue_title)
            .bind(&observation.issue_date)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
        }
        transaction.commit().await?;

        debug!(target: TARGET_DB, "Inserted {} raw signatures", inserted);
        Ok(inserted)
    }

    pub async fn raw_signature_exists(
        &self,
        observation: &RawSignatureObservation,
    ) -> Result<bool, sqlx::Error> {
        let exists = sqlx::query(
            r#"
            SELECT 1 FROM raw_signatures
            WHERE issue_title = ?1 AND person_name = ?2 AND role = ?3
            LIMIT 1
            "#,
        )
        .bind(&observation.issue_title)
        .bind(&observation.person_name)
        .bind(&observation.role)
        .fetch_optional(self.pool())
        .await?
        .is_some();
        Ok(exists)
    }

    /// Observations matching the conditions, in insertion order
    pub async fn load_raw_signatures(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT person_name, role, issue_title, issue_date FROM raw_signatures",
        );
        conditions.push_where(&mut builder);
        builder.push(" ORDER BY id ASC");

        let rows = builder.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(observation_from_row).collect())
    }

    /// First observation of every distinct person among those matching the conditions
    pub async fn load_raw_signatures_grouped_by_person(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT person_name, role, issue_title, issue_date FROM raw_signatures \
             WHERE id IN (SELECT MIN(id) FROM raw_signatures",
        );
        conditions.push_where(&mut builder);
        builder.push(" GROUP BY person_name) ORDER BY id ASC");

        let rows = builder.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(observation_from_row).collect())
    }

    pub async fn count_raw_signatures(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM raw_signatures");
        conditions.push_where(&mut builder);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
    }

    /// Set `role` on every observation matching the conditions; no conditions means
    /// every row
    pub async fn update_raw_signature_roles(
        &self,
        role: &str,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE raw_signatures SET role = ");
        builder.push_bind(role.to_string());
        conditions.push_where(&mut builder);

        let result = builder.build().execute(self.pool()).await?;
        debug!(
            target: TARGET_DB,
            "Set role '{}' on {} raw signatures", role, result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::query::Operator;

    fn observation(person: &str, role: &str, issue: &str) -> RawSignatureObservation {
        RawSignatureObservation {
            person_name: person.to_string(),
            role: role.to_string(),
            issue_title: issue.to_string(),
            issue_date: "2018-01-01 00:00:00".to_string(),
        }
    }

    async fn seeded() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.add_raw_signatures(&[
            observation("ΝΙΚΟΣ ΒΟΥΤΣΗΣ", "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ", "Α 1"),
            observation("ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ", "ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ", "Α 1"),
            observation("ΝΙΚΟΣ ΒΟΥΤΣΗΣ", "ΥΓΕΙΑΣ", "Α 2"),
            observation("ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ", "ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ", "Α 3"),
        ])
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_bulk_insert_and_load() {
        let db = seeded().await;
        let all = db.load_raw_signatures(&Conditions::new()).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].person_name, "ΝΙΚΟΣ ΒΟΥΤΣΗΣ");

        assert!(db
            .raw_signature_exists(&observation("ΝΙΚΟΣ ΒΟΥΤΣΗΣ", "ΥΓΕΙΑΣ", "Α 2"))
            .await
            .unwrap());
        assert!(!db
            .raw_signature_exists(&observation("ΝΙΚΟΣ ΒΟΥΤΣΗΣ", "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ", "Α 2"))
            .await
            .unwrap());
        assert!(!db
            .raw_signature_exists(&observation("ΝΙΚΟΣ ΒΟΥΤΣΗΣ", "ΥΓΕΙΑΣ", "Α 3"))
            .await
            .unwrap());
        assert_eq!(db.add_raw_signatures(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_grouped_by_person_keeps_first_observation() {
        let db = seeded().await;
        let persons = db
            .load_raw_signatures_grouped_by_person(&Conditions::new())
            .await
            .unwrap();
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[0].person_name, "ΝΙΚΟΣ ΒΟΥΤΣΗΣ");
        assert_eq!(persons[0].role, "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ");
        assert_eq!(persons[1].person_name, "ΓΙΑΝΝΗΣ ΚΩΣΤΑΣ");

        let filtered = db
            .load_raw_signatures_grouped_by_person(
                &Conditions::new().eq(ObservationColumn::IssueTitle, "Α 3"),
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].role, "ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ");
    }

    #[tokio::test]
    async fn test_count_by_role_suffix() {
        let db = seeded().await;
        let count = |suffix: &'static str| {
            let db = db.clone();
            async move {
                db.count_raw_signatures(&Conditions::new().with(
                    ObservationColumn::Role,
                    Operator::EndsWith,
                    suffix,
                ))
                .await
                .unwrap()
            }
        };

        assert_eq!(count("ΟΙΚΟΝΟΜΙΚΩΝ").await, 2);
        assert_eq!(count("ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ").await, 2);
        assert_eq!(count("ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ").await, 1);
        assert_eq!(count("ΥΓΕΙΑΣ").await, 2);
        assert_eq!(count("%").await, 0);
    }

    #[tokio::test]
    async fn test_update_roles_within_conditions() {
        let db = seeded().await;
        let updated = db
            .update_raw_signature_roles(
                "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ",
                &Conditions::new().eq(ObservationColumn::PersonName, "ΝΙΚΟΣ ΒΟΥΤΣΗΣ"),
            )
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let roles: Vec<String> = db
            .load_raw_signatures(&Conditions::new().eq(ObservationColumn::PersonName, "ΝΙΚΟΣ ΒΟΥΤΣΗΣ"))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.role)
            .collect();
        assert_eq!(roles, vec!["ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ", "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ"]);

        let others = db
            .count_raw_signatures(&Conditions::new().eq(ObservationColumn::Role, "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ"))
            .await
            .unwrap();
        assert_eq!(others, 2);
    }
}
