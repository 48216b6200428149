//! # gazette
//!
//! Extracts minister signatures from converted gazette issues and reconciles the
//! roles they were recorded with.
//!
//! ## Usage
//!
//! ```
//! # Analyze every pending issue
//! gazette extract
//!
//! # Give each person the role they were most often seen with
//! gazette reconcile --from-date 2019-07-09 --scope-person
//!
//! # Show which ministry a role refers to
//! gazette ministry "ΑΝΑΠΛΗΡΩΤΗΣ ΥΠΟΥΡΓΟΣ ΟΙΚΟΝΟΜΙΚΩΝ"
//!
//! # Check what would be extracted from a single text file
//! gazette preview a_12.txt --year 2018
//! ```
//!
//! ## Configuration
//!
//! See `environment::Settings` for the environment variables read at startup.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gazette::analyzer::IssueAnalyzer;
use gazette::db::{Conditions, Database, ObservationColumn, Operator};
use gazette::environment::Settings;
use gazette::reconcile::{MinistryResolver, ReconciliationReport, RoleReconciler, UpdateScope};
use gazette::signature::names::normalize_name;
use gazette::signature::role_text::normalize_role;
use gazette::signature::{extractor, segmenter, NewIssue};
use gazette::store::IssueStore;
use gazette::text_source::TextDirectory;
use prettytable::{Cell, Row as PrettyRow, Table};
use std::path::{Path, PathBuf};
use tokio::main;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract signatures from every pending issue
    Extract,

    /// Rewrite each person's raw signatures to their most frequent role
    Reconcile {
        /// Only this person (normalized name)
        #[arg(short, long)]
        person: Option<String>,

        /// Only roles matching this LIKE pattern, e.g. "%ΟΙΚΟΝΟΜΙΚΩΝ"
        #[arg(short, long)]
        role_like: Option<String>,

        /// Only signatures from issues on or after this date (YYYY-MM-DD)
        #[arg(short, long)]
        from_date: Option<String>,

        /// Restrict each rewrite to the person being reconciled
        #[arg(short, long)]
        scope_person: bool,
    },

    /// Resolve the ministry a role refers to
    Ministry {
        /// Role text as printed or as stored
        role: String,
    },

    /// Show the blocks and signatures found in a single text file
    Preview {
        /// Plain-text file
        file: PathBuf,

        /// Four-digit year of the issue
        #[arg(short, long)]
        year: String,
    },

    /// Import issue metadata from a JSON array
    ImportIssues {
        /// JSON file of `{file, number, title, date, kind}` objects
        path: PathBuf,
    },

    /// Display row counts of every table
    Stats,
}

#[main]
async fn main() -> Result<()> {
    // Initialize tracing
    gazette::logging::configure_logging();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Extract => {
            let db = connect(&settings).await?;
            let config = settings.load_analysis_config()?;
            let texts = TextDirectory::new(&settings.documents_path);
            info!(
                "Analyzing issues with texts from {}",
                texts.root().display()
            );

            let summary = IssueAnalyzer::new(&db, &texts, &config)
                .with_options(settings.analyzer_options())
                .run()
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Reconcile {
            person,
            role_like,
            from_date,
            scope_person,
        } => {
            let mut conditions = Conditions::new();
            if let Some(person) = person {
                conditions = conditions.eq(ObservationColumn::PersonName, normalize_name(&person));
            }
            if let Some(pattern) = role_like {
                conditions = conditions.with(ObservationColumn::Role, Operator::Like, pattern);
            }
            if let Some(date) = from_date {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --from-date '{}'", date))?;
                conditions = conditions.with(
                    ObservationColumn::IssueDate,
                    Operator::Ge,
                    date.format("%Y-%m-%d 00:00:00").to_string(),
                );
            }

            let db = connect(&settings).await?;
            let scope = if scope_person {
                UpdateScope::Person
            } else {
                UpdateScope::Filter
            };
            let report = RoleReconciler::new(&db)
                .with_scope(scope)
                .reconcile(&conditions)
                .await?;
            print_report(&report);
        }

        Commands::Ministry { role } => {
            let db = connect(&settings).await?;
            let role = normalize_name(&normalize_role(&role));
            let ministry = MinistryResolver::new(&db).resolve(&role).await?;
            println!("{}", serde_json::to_string_pretty(&ministry)?);
        }

        Commands::Preview { file, year } => preview(&settings, &file, &year)?,

        Commands::ImportIssues { path } => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let issues: Vec<NewIssue> = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid issue list in {}", path.display()))?;

            let db = connect(&settings).await?;
            for issue in &issues {
                IssueStore::add_issue(&db, issue).await?;
            }
            println!("Imported {} issue(s) from {}", issues.len(), path.display());
        }

        Commands::Stats => {
            let db = connect(&settings).await?;
            let mut table = Table::new();
            table.add_row(PrettyRow::new(vec![Cell::new("Table"), Cell::new("Rows")]));
            for (label, count) in db.collect_stats().await? {
                table.add_row(PrettyRow::new(vec![
                    Cell::new(label),
                    Cell::new(&count.to_string()),
                ]));
            }
            table.printstd();
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> Result<Database> {
    Database::new(&settings.database_path)
        .await
        .context("Failed to connect to database")
}

fn preview(settings: &Settings, file: &Path, year: &str) -> Result<()> {
    let config = settings.load_analysis_config()?;
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let blocks = segmenter::segment(&text, year, &config);
    println!("{} block(s) in {}", blocks.len(), file.display());

    for (idx, block) in blocks.iter().enumerate() {
        println!(
            "\nBlock {} at byte {} ({})",
            idx + 1,
            block.start,
            if block.end_known { "closed" } else { "open-ended" }
        );

        let mut table = Table::new();
        table.add_row(PrettyRow::new(vec![Cell::new("Role"), Cell::new("Name")]));
        for signature in extractor::extract_signatures(block, &config.names) {
            table.add_row(PrettyRow::new(vec![
                Cell::new(&signature.role),
                Cell::new(&signature.name),
            ]));
        }
        table.printstd();
    }

    Ok(())
}

fn print_report(report: &ReconciliationReport) {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Person"),
        Cell::new("Roles"),
        Cell::new("Chosen role"),
        Cell::new("Ministry"),
        Cell::new("Rows updated"),
    ]));

    for person in &report.persons {
        let roles = person
            .role_counts
            .iter()
            .map(|(role, count)| format!("{} ({})", role, count))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(PrettyRow::new(vec![
            Cell::new(&person.person_name),
            Cell::new(&roles),
            Cell::new(person.chosen_role.as_deref().unwrap_or("-")),
            Cell::new(&person.ministry.title),
            Cell::new(&person.rows_updated.to_string()),
        ]));
    }

    table.printstd();
    println!(
        "{} person(s), {} reconciled, {} row(s) updated",
        report.persons.len(),
        report.persons_updated(),
        report.rows_updated()
    );
}
