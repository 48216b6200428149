use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::signature::names::normalize_name;
use crate::signature::{Person, TARGET_SIGNATURE};
use crate::store::PersonStore;

/// Maps a name as printed in an issue to a stored identity
#[async_trait]
pub trait PersonResolver: Send + Sync {
    async fn resolve_person(&self, name: &str) -> Result<Option<Person>>;
}

/// Looks persons up by normalized name and records the ones seen for the first time.
///
/// No external enrichment happens here: an unknown person becomes a bare record
/// keyed by the normalized name.
pub struct StoredPersonResolver<'a, S: PersonStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PersonStore + ?Sized> StoredPersonResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a, S: PersonStore + ?Sized> PersonResolver for StoredPersonResolver<'a, S> {
    async fn resolve_person(&self, name: &str) -> Result<Option<Person>> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Ok(None);
        }

        if let Some(person) = self.store.load_person_by_name(&normalized).await? {
            debug!(target: TARGET_SIGNATURE, "Known person '{}' (id {})", person.name, person.id);
            return Ok(Some(person));
        }

        let person = self.store.create_person(&normalized).await?;
        info!(target: TARGET_SIGNATURE, "Recorded new person '{}' (id {})", person.name, person.id);
        Ok(Some(person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn test_resolves_spelling_variants_to_one_person() {
        let db = Database::in_memory().await.unwrap();
        let resolver = StoredPersonResolver::new(&db);

        let first = resolver.resolve_person("Νίκος Βούτσης").await.unwrap().unwrap();
        let second = resolver.resolve_person("ΝΙΚΟΣ  ΒΟΥΤΣΗΣ").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, "ΝΙΚΟΣ ΒΟΥΤΣΗΣ");
    }

    #[tokio::test]
    async fn test_blank_name_is_not_resolved() {
        let db = Database::in_memory().await.unwrap();
        let resolver = StoredPersonResolver::new(&db);
        assert!(resolver.resolve_person("  ").await.unwrap().is_none());
    }
}
