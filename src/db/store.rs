use anyhow::{Context, Result};
use async_trait::async_trait;

use super::core::Database;
use super::query::{Conditions, IssueColumn, ObservationColumn};
use crate::signature::{Issue, NewIssue, Person, RawSignatureObservation};
use crate::store::{IssueStore, ObservationStore, PersonStore, SignatureStore};

#[async_trait]
impl IssueStore for Database {
    async fn load_issues(&self, conditions: &Conditions<IssueColumn>) -> Result<Vec<Issue>> {
        Database::load_issues(self, conditions)
            .await
            .context("Failed to load issues")
    }

    async fn mark_issue_analyzed(&self, issue_id: i64) -> Result<()> {
        self.set_issue_analyzed(issue_id)
            .await
            .with_context(|| format!("Failed to mark issue {} as analyzed", issue_id))
    }

    async fn add_issue(&self, issue: &NewIssue) -> Result<i64> {
        Database::add_issue(self, issue)
            .await
            .with_context(|| format!("Failed to add issue '{}'", issue.title))
    }
}

#[async_trait]
impl PersonStore for Database {
    async fn load_person_by_name(&self, normalized_name: &str) -> Result<Option<Person>> {
        Database::load_person_by_name(self, normalized_name)
            .await
            .context("Failed to load person")
    }

    async fn create_person(&self, normalized_name: &str) -> Result<Person> {
        self.add_person(normalized_name)
            .await
            .with_context(|| format!("Failed to add person '{}'", normalized_name))
    }
}

#[async_trait]
impl SignatureStore for Database {
    async fn signature_exists(&self, person_id: i64, issue_id: i64) -> Result<bool> {
        Database::signature_exists(self, person_id, issue_id)
            .await
            .context("Failed to look up signature")
    }

    async fn create_signature(&self, person_id: i64, issue_id: i64, payload: &str) -> Result<i64> {
        self.add_signature(person_id, issue_id, payload)
            .await
            .context("Failed to add signature")
    }
}

#[async_trait]
impl ObservationStore for Database {
    async fn create_raw_observations(
        &self,
        observations: &[RawSignatureObservation],
    ) -> Result<u64> {
        self.add_raw_signatures(observations)
            .await
            .context("Failed to add raw signatures")
    }

    async fn raw_observation_exists(&self, observation: &RawSignatureObservation) -> Result<bool> {
        self.raw_signature_exists(observation)
            .await
            .context("Failed to look up raw signature")
    }

    async fn load_raw_observations(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>> {
        self.load_raw_signatures(conditions)
            .await
            .context("Failed to load raw signatures")
    }

    async fn load_distinct_persons(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>> {
        self.load_raw_signatures_grouped_by_person(conditions)
            .await
            .context("Failed to group raw signatures by person")
    }

    async fn count_raw_observations(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<i64> {
        self.count_raw_signatures(conditions)
            .await
            .context("Failed to count raw signatures")
    }

    async fn update_raw_observation_roles(
        &self,
        role: &str,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<u64> {
        self.update_raw_signature_roles(role, conditions)
            .await
            .context("Failed to update raw signature roles")
    }
}
