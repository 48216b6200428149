use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::TARGET_RECONCILE;
use crate::db::query::{Conditions, ObservationColumn, Operator};
use crate::store::ObservationStore;

/// The one role kept verbatim: it names no ministry
pub const PRIME_MINISTER: &str = "ΠΡΩΘΥΠΟΥΡΓΟΣ";

/// Rank words removed from a ministry title. Order matters: "ΥΦΥΠΟΥΡΓΟΣ" contains
/// "ΥΠΟΥΡΓΟΣ".
pub const ROLE_QUALIFIERS: &[&str] = &["ΥΦΥΠΟΥΡΓΟΣ", "ΥΠΟΥΡΓΟΣ", "ΑΝΑΠΛΗΡΩΤΗΣ"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinistryTitle {
    // Suffix of the role at which probing stopped
    pub suffix: String,

    // Suffix one word shorter than `suffix`, when probing stopped at a count change
    pub stable_suffix: Option<String>,

    // `suffix` without rank qualifiers
    pub title: String,
}

/// Finds which trailing words of a role identify the ministry, by counting how
/// many stored roles end with a growing suffix of it.
pub struct MinistryResolver<'a, S: ObservationStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ObservationStore + ?Sized> MinistryResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Grow the suffix one word at a time from the end of the role. Probing stops
    /// at the first suffix whose count differs from the previous one, and that
    /// suffix is the one returned.
    pub async fn resolve(&self, role: &str) -> Result<MinistryTitle> {
        let words: Vec<&str> = role.split_whitespace().collect();
        let mut suffix = String::new();
        let mut previous: Option<(String, i64)> = None;
        let mut stable_suffix = None;

        for start in (0..words.len()).rev() {
            suffix = words[start..].join(" ");
            let conditions =
                Conditions::new().with(ObservationColumn::Role, Operator::EndsWith, suffix.as_str());
            let count = self.store.count_raw_observations(&conditions).await?;
            debug!(target: TARGET_RECONCILE, "'{}' ends {} role(s)", suffix, count);

            if let Some((previous_suffix, previous_count)) = previous.take() {
                if previous_count != count {
                    stable_suffix = Some(previous_suffix);
                    break;
                }
            }
            previous = Some((suffix.clone(), count));
        }

        let title = if suffix == PRIME_MINISTER {
            suffix.clone()
        } else {
            strip_qualifiers(&suffix)
        };

        Ok(MinistryTitle {
            suffix,
            stable_suffix,
            title,
        })
    }
}

/// Remove rank words and tidy the spacing they leave behind
pub fn strip_qualifiers(title: &str) -> String {
    let mut stripped = title.to_string();
    for qualifier in ROLE_QUALIFIERS {
        stripped = stripped.replace(qualifier, "");
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::signature::RawSignatureObservation;

    async fn corpus(roles: &[&str]) -> Database {
        let db = Database::in_memory().await.unwrap();
        let observations: Vec<RawSignatureObservation> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| RawSignatureObservation {
                person_name: format!("ΠΡΟΣΩΠΟ {}", i),
                role: role.to_string(),
                issue_title: format!("Α {}/2018", i),
                issue_date: "2018-05-01 00:00:00".to_string(),
            })
            .collect();
        db.add_raw_signatures(&observations).await.unwrap();
        db
    }

    #[test]
    fn test_strip_qualifiers() {
        assert_eq!(strip_qualifiers("ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ"), "ΟΙΚΟΝΟΜΙΚΩΝ");
        assert_eq!(strip_qualifiers("ΥΦΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ"), "ΥΓΕΙΑΣ");
        assert_eq!(strip_qualifiers("ΕΣΩΤΕΡΙΚΩΝ"), "ΕΣΩΤΕΡΙΚΩΝ");
    }

    #[tokio::test]
    async fn test_prime_minister_is_kept() {
        let db = corpus(&["ΠΡΩΘΥΠΟΥΡΓΟΣ", "ΠΡΩΘΥΠΟΥΡΓΟΣ", "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ"]).await;
        let ministry = MinistryResolver::new(&db).resolve("ΠΡΩΘΥΠΟΥΡΓΟΣ").await.unwrap();

        assert_eq!(ministry.title, "ΠΡΩΘΥΠΟΥΡΓΟΣ");
        assert_eq!(ministry.suffix, "ΠΡΩΘΥΠΟΥΡΓΟΣ");
        assert_eq!(ministry.stable_suffix, None);
    }

    #[tokio::test]
    async fn test_stops_at_first_count_change() {
        let db = corpus(&[
            "ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ",
            "ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ",
            "ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ",
            "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ",
        ])
        .await;
        let ministry = MinistryResolver::new(&db)
            .resolve("ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ")
            .await
            .unwrap();

        // 3 roles end in "ΟΙΚΟΝΟΜΙΚΩΝ" and in "ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ", 1 in the full role
        assert_eq!(ministry.suffix, "ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ");
        assert_eq!(ministry.stable_suffix.as_deref(), Some("ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ"));
        assert_eq!(ministry.title, "ΟΙΚΟΝΟΜΙΚΩΝ");
    }

    #[tokio::test]
    async fn test_multi_word_ministry() {
        let db = corpus(&["ΥΠΟΥΡΓΟΣ ΨΗΦΙΑΚΗΣ ΠΟΛΙΤΙΚΗΣ", "ΥΠΟΥΡΓΟΣ ΕΞΩΤΕΡΙΚΗΣ ΠΟΛΙΤΙΚΗΣ"]).await;
        let ministry = MinistryResolver::new(&db)
            .resolve("ΥΠΟΥΡΓΟΣ ΨΗΦΙΑΚΗΣ ΠΟΛΙΤΙΚΗΣ")
            .await
            .unwrap();

        assert_eq!(ministry.suffix, "ΨΗΦΙΑΚΗΣ ΠΟΛΙΤΙΚΗΣ");
        assert_eq!(ministry.stable_suffix.as_deref(), Some("ΠΟΛΙΤΙΚΗΣ"));
        assert_eq!(ministry.title, "ΨΗΦΙΑΚΗΣ ΠΟΛΙΤΙΚΗΣ");
    }

    #[tokio::test]
    async fn test_unchanged_count_uses_whole_role() {
        let db = corpus(&["ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ", "ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ"]).await;
        let ministry = MinistryResolver::new(&db).resolve("ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ").await.unwrap();

        assert_eq!(ministry.suffix, "ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ");
        assert_eq!(ministry.stable_suffix, None);
        assert_eq!(ministry.title, "ΥΓΕΙΑΣ");
    }

    #[tokio::test]
    async fn test_empty_role() {
        let db = corpus(&["ΥΠΟΥΡΓΟΣ ΥΓΕΙΑΣ"]).await;
        let ministry = MinistryResolver::new(&db).resolve("").await.unwrap();
        assert_eq!(ministry.title, "");
    }
}
