//! Persistence seams used by the analyzer and the reconciler.
//!
//! `db::Database` implements all of them on SQLite. Absent rows are reported as
//! `None`/`false`, never as errors.

use anyhow::Result;
use async_trait::async_trait;

use crate::db::query::{Conditions, IssueColumn, ObservationColumn};
use crate::signature::{Issue, NewIssue, Person, RawSignatureObservation};

#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn load_issues(&self, conditions: &Conditions<IssueColumn>) -> Result<Vec<Issue>>;

    async fn mark_issue_analyzed(&self, issue_id: i64) -> Result<()>;

    /// Returns the id of the new issue, or of the existing one with the same title
    async fn add_issue(&self, issue: &NewIssue) -> Result<i64>;
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn load_person_by_name(&self, normalized_name: &str) -> Result<Option<Person>>;

    async fn create_person(&self, normalized_name: &str) -> Result<Person>;
}

#[async_trait]
pub trait SignatureStore: Send + Sync {
    async fn signature_exists(&self, person_id: i64, issue_id: i64) -> Result<bool>;

    /// `payload` is the JSON form of the extracted signature
    async fn create_signature(&self, person_id: i64, issue_id: i64, payload: &str) -> Result<i64>;
}

#[async_trait]
pub trait ObservationStore: Send + Sync {
    async fn create_raw_observations(&self, observations: &[RawSignatureObservation])
        -> Result<u64>;

    /// Whether the same person was already recorded with the same role in the same issue
    async fn raw_observation_exists(&self, observation: &RawSignatureObservation) -> Result<bool>;

    async fn load_raw_observations(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>>;

    /// One observation per distinct person, the earliest recorded
    async fn load_distinct_persons(
        &self,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<Vec<RawSignatureObservation>>;

    async fn count_raw_observations(&self, conditions: &Conditions<ObservationColumn>)
        -> Result<i64>;

    async fn update_raw_observation_roles(
        &self,
        role: &str,
        conditions: &Conditions<ObservationColumn>,
    ) -> Result<u64>;

    async fn load_raw_observations_by_person(
        &self,
        person_name: &str,
    ) -> Result<Vec<RawSignatureObservation>> {
        let conditions = Conditions::new().eq(ObservationColumn::PersonName, person_name);
        self.load_raw_observations(&conditions).await
    }
}

/// Everything the issue analyzer needs from storage
pub trait Repository: IssueStore + PersonStore + SignatureStore + ObservationStore {}

impl<T> Repository for T where T: IssueStore + PersonStore + SignatureStore + ObservationStore {}
