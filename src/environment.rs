use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

use crate::analyzer::AnalyzerOptions;
use crate::config::AnalysisConfig;

pub const DEFAULT_DATABASE_PATH: &str = "gazette.db";
pub const DEFAULT_DOCUMENTS_PATH: &str = ".";
pub const DEFAULT_ISSUE_KIND: &str = "Α";
pub const DEFAULT_ANALYZE_FROM: &str = "2017-01-01";

/// Runtime settings read from the environment.
///
/// - `DATABASE_PATH`: SQLite database file (default: "gazette.db")
/// - `DOCUMENTS_PATH`: directory holding the converted issue texts (default: ".")
/// - `ANALYSIS_CONFIG`: optional JSON file overriding the built-in `AnalysisConfig`
/// - `ISSUE_KIND`: issue series to analyze (default: "Α")
/// - `ANALYZE_FROM`: earliest issue date to analyze, `YYYY-MM-DD` (default: "2017-01-01")
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: String,
    pub documents_path: PathBuf,
    pub analysis_config: Option<PathBuf>,
    pub issue_kind: String,
    pub analyze_from: NaiveDate,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let analyze_from = value("ANALYZE_FROM", DEFAULT_ANALYZE_FROM);
        let analyze_from = NaiveDate::parse_from_str(&analyze_from, "%Y-%m-%d")
            .with_context(|| format!("ANALYZE_FROM is not a YYYY-MM-DD date: '{}'", analyze_from))?;

        Ok(Settings {
            database_path: value("DATABASE_PATH", DEFAULT_DATABASE_PATH),
            documents_path: PathBuf::from(value("DOCUMENTS_PATH", DEFAULT_DOCUMENTS_PATH)),
            analysis_config: lookup("ANALYSIS_CONFIG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            issue_kind: value("ISSUE_KIND", DEFAULT_ISSUE_KIND),
            analyze_from,
        })
    }

    /// The configured analysis rules, or the built-in ones
    pub fn load_analysis_config(&self) -> Result<AnalysisConfig> {
        match &self.analysis_config {
            Some(path) => AnalysisConfig::from_json_file(path),
            None => Ok(AnalysisConfig::default()),
        }
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            kind: self.issue_kind.clone(),
            from: self.analyze_from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.database_path, "gazette.db");
        assert_eq!(settings.documents_path, PathBuf::from("."));
        assert!(settings.analysis_config.is_none());
        assert_eq!(settings.issue_kind, "Α");
        assert_eq!(settings.analyze_from, NaiveDate::from_ymd_opt(2017, 1, 1).unwrap());
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("DATABASE_PATH", "/tmp/g.db"),
            ("DOCUMENTS_PATH", "/srv/fek"),
            ("ISSUE_KIND", "Β"),
            ("ANALYZE_FROM", "2019-06-30"),
        ])
        .unwrap();
        assert_eq!(settings.database_path, "/tmp/g.db");
        assert_eq!(settings.documents_path, PathBuf::from("/srv/fek"));
        assert_eq!(settings.analyzer_options().kind, "Β");
        assert_eq!(
            settings.analyzer_options().from,
            NaiveDate::from_ymd_opt(2019, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(settings(&[("ANALYZE_FROM", "30/06/2019")]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let settings = settings(&[("ANALYSIS_CONFIG", "/nonexistent/analysis.json")]).unwrap();
        assert!(settings.load_analysis_config().is_err());
    }
}
