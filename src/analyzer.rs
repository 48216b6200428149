//! Per-issue driver: document text to blocks, blocks to (role, name) pairs, pairs to
//! stored signatures and raw observations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::db::query::{Conditions, IssueColumn, Operator};
use crate::identity::{PersonResolver, StoredPersonResolver};
use crate::signature::names::normalize_name;
use crate::signature::role_text::normalize_role;
use crate::signature::{
    extract_from_text, ExtractedSignature, Issue, RawSignatureObservation, TARGET_SIGNATURE,
};
use crate::store::Repository;
use crate::text_source::TextSource;

/// Which issues a run picks up
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub kind: String,
    pub from: NaiveDate,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            kind: "Α".to_string(),
            from: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default(),
        }
    }
}

impl AnalyzerOptions {
    fn pending_issues(&self) -> Conditions<IssueColumn> {
        Conditions::new()
            .eq(IssueColumn::Analyzed, false)
            .eq(IssueColumn::Kind, self.kind.as_str())
            .with(
                IssueColumn::Date,
                Operator::Ge,
                self.from.format("%Y-%m-%d 00:00:00").to_string(),
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub issues_seen: usize,
    pub issues_analyzed: usize,
    // issues without a document, left pending
    pub issues_skipped: usize,
    pub issues_without_text: usize,
    pub issues_without_signatures: usize,
    pub signatures_found: usize,
    pub signatures_stored: usize,
    pub observations_stored: u64,
    pub unresolved_names: usize,
}

pub struct IssueAnalyzer<'a, R: Repository + ?Sized, T: TextSource + ?Sized> {
    store: &'a R,
    texts: &'a T,
    config: &'a AnalysisConfig,
    resolver: Box<dyn PersonResolver + 'a>,
    options: AnalyzerOptions,
}

impl<'a, R: Repository + ?Sized, T: TextSource + ?Sized> IssueAnalyzer<'a, R, T> {
    pub fn new(store: &'a R, texts: &'a T, config: &'a AnalysisConfig) -> Self {
        Self {
            store,
            texts,
            config,
            resolver: Box::new(StoredPersonResolver::new(store)),
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn PersonResolver + 'a>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Analyze every pending issue, one at a time, oldest first
    pub async fn run(&self) -> Result<AnalysisSummary> {
        let issues = self
            .store
            .load_issues(&self.options.pending_issues())
            .await?;
        info!(
            target: TARGET_SIGNATURE,
            "{} issue(s) of type {} pending since {}",
            issues.len(),
            self.options.kind,
            self.options.from
        );

        let mut summary = AnalysisSummary::default();
        for issue in &issues {
            summary.issues_seen += 1;
            self.analyze_issue(issue, &mut summary)
                .await
                .with_context(|| format!("Failed to analyze issue '{}'", issue.title))?;
        }

        info!(
            target: TARGET_SIGNATURE,
            "Analyzed {} issue(s): {} signature(s) found, {} observation(s) stored",
            summary.issues_analyzed,
            summary.signatures_found,
            summary.observations_stored
        );
        Ok(summary)
    }

    pub async fn analyze_issue(&self, issue: &Issue, summary: &mut AnalysisSummary) -> Result<()> {
        if !issue.has_file() {
            debug!(target: TARGET_SIGNATURE, "Issue '{}' has no document", issue.title);
            summary.issues_skipped += 1;
            return Ok(());
        }

        let text = match self.texts.load_text(&issue.file).await? {
            Some(text) => text,
            None => {
                summary.issues_without_text += 1;
                String::new()
            }
        };

        if !text.trim().is_empty() {
            let started = Instant::now();
            let signatures = extract_from_text(&text, issue.year(), self.config);
            info!(
                target: TARGET_SIGNATURE,
                "Extracted {} signature(s) from '{}' in {:?}",
                signatures.len(),
                issue.title,
                started.elapsed()
            );

            if signatures.is_empty() {
                info!(target: TARGET_SIGNATURE, "Issue '{}' has no relevant signatures", issue.title);
                summary.issues_without_signatures += 1;
            } else {
                summary.signatures_found += signatures.len();
                self.store_signatures(issue, &signatures, summary).await?;
            }
        }

        self.store.mark_issue_analyzed(issue.id).await?;
        summary.issues_analyzed += 1;
        Ok(())
    }

    async fn store_signatures(
        &self,
        issue: &Issue,
        signatures: &[ExtractedSignature],
        summary: &mut AnalysisSummary,
    ) -> Result<()> {
        let mut observations: Vec<RawSignatureObservation> = Vec::new();

        for signature in signatures {
            let Some(person) = self.resolver.resolve_person(&signature.name).await? else {
                warn!(target: TARGET_SIGNATURE, "Could not resolve '{}' in '{}'", signature.name, issue.title);
                summary.unresolved_names += 1;
                continue;
            };

            if !self.store.signature_exists(person.id, issue.id).await? {
                let payload = serde_json::to_string(signature)?;
                self.store
                    .create_signature(person.id, issue.id, &payload)
                    .await?;
                summary.signatures_stored += 1;
            }

            let observation = RawSignatureObservation {
                person_name: normalize_name(&person.name),
                role: normalize_name(&normalize_role(&signature.role)),
                issue_title: issue.title.clone(),
                issue_date: issue.date.clone(),
            };

            // Only rows from an earlier run are skipped: repeated pairs within this
            // issue each count towards the person's role tally
            if self.store.raw_observation_exists(&observation).await? {
                debug!(
                    target: TARGET_SIGNATURE,
                    "'{}' as '{}' already observed in '{}'",
                    observation.person_name,
                    observation.role,
                    issue.title
                );
                continue;
            }
            observations.push(observation);
        }

        if !observations.is_empty() {
            summary.observations_stored += self.store.create_raw_observations(&observations).await?;
        }
        Ok(())
    }
}
