use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ministry::{MinistryResolver, MinistryTitle};
use super::TARGET_RECONCILE;
use crate::db::query::{Conditions, ObservationColumn};
use crate::signature::RawSignatureObservation;
use crate::store::ObservationStore;

/// Which rows a majority-role rewrite touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateScope {
    /// Every row matching the caller's filter. An empty filter means the whole table.
    #[default]
    Filter,
    /// Rows matching the caller's filter that also belong to the person being reconciled
    Person,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonReconciliation {
    pub person_name: String,
    // (role, occurrences) in the order the roles were first seen
    pub role_counts: Vec<(String, usize)>,
    // Set only when the person had more than one role
    pub chosen_role: Option<String>,
    pub ministry: MinistryTitle,
    pub rows_updated: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub persons: Vec<PersonReconciliation>,
}

impl ReconciliationReport {
    pub fn persons_updated(&self) -> usize {
        self.persons.iter().filter(|p| p.chosen_role.is_some()).count()
    }

    pub fn rows_updated(&self) -> u64 {
        self.persons.iter().map(|p| p.rows_updated).sum()
    }
}

/// Rewrites each person's raw observations to the role they were most often seen with.
pub struct RoleReconciler<'a, S: ObservationStore + ?Sized> {
    store: &'a S,
    scope: UpdateScope,
}

impl<'a, S: ObservationStore + ?Sized> RoleReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            scope: UpdateScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: UpdateScope) -> Self {
        self.scope = scope;
        self
    }

    pub async fn reconcile(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<ReconciliationReport> {
        if self.scope == UpdateScope::Filter && conditions.is_empty() {
            warn!(
                target: TARGET_RECONCILE,
                "No filter given: majority roles will be written to every raw signature"
            );
        }

        let representatives = self.store.load_distinct_persons(conditions).await?;
        info!(
            target: TARGET_RECONCILE,
            "Reconciling roles for {} person(s)",
            representatives.len()
        );

        let resolver = MinistryResolver::new(self.store);
        let mut report = ReconciliationReport::default();

        for representative in representatives {
            let observations = self
                .store
                .load_raw_observations_by_person(&representative.person_name)
                .await?;
            let role_counts = tally_roles(&observations);
            let ministry = resolver.resolve(&representative.role).await?;
            debug!(
                target: TARGET_RECONCILE,
                "{}: {} role(s), ministry '{}'",
                representative.person_name,
                role_counts.len(),
                ministry.title
            );

            let mut chosen_role = None;
            let mut rows_updated = 0;
            if role_counts.len() > 1 {
                if let Some(role) = majority_role(&role_counts) {
                    let update_conditions = self.update_conditions(conditions, &representative);
                    rows_updated = self
                        .store
                        .update_raw_observation_roles(role, &update_conditions)
                        .await?;
                    info!(
                        target: TARGET_RECONCILE,
                        "{}: set role '{}' on {} row(s)",
                        representative.person_name,
                        role,
                        rows_updated
                    );
                    chosen_role = Some(role.to_string());
                }
            }

            report.persons.push(PersonReconciliation {
                person_name: representative.person_name,
                role_counts,
                chosen_role,
                ministry,
                rows_updated,
            });
        }

        Ok(report)
    }

    fn update_conditions(
        &self,
        conditions: &Conditions<ObservationColumn>,
        representative: &RawSignatureObservation,
    ) -> Conditions<ObservationColumn> {
        match self.scope {
            UpdateScope::Filter => conditions.clone(),
            UpdateScope::Person => conditions.clone().and_group(
                Conditions::new().eq(ObservationColumn::PersonName, representative.person_name.as_str()),
            ),
        }
    }
}

/// Count roles, keeping first-seen order
pub fn tally_roles(observations: &[RawSignatureObservation]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for observation in observations {
        match counts.iter_mut().find(|(role, _)| *role == observation.role) {
            Some((_, count)) => *count += 1,
            None => counts.push((observation.role.clone(), 1)),
        }
    }
    counts
}

/// Most frequent role; ties go to the one seen first
pub fn majority_role(counts: &[(String, usize)]) -> Option<&str> {
    let mut best: Option<&(String, usize)> = None;
    for entry in counts {
        match best {
            Some((_, best_count)) if *best_count >= entry.1 => {}
            _ => best = Some(entry),
        }
    }
    best.map(|(role, _)| role.as_str())
}
