use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored in `issues.file` when no document is available for an issue.
pub const FILE_NOT_AVAILABLE: &str = "N/A";

/// A single gazette issue and its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,

    // Path of the source document, or `FILE_NOT_AVAILABLE`
    pub file: String,

    pub number: String,
    pub title: String,

    // ISO-like timestamp, e.g. "2018-03-14 00:00:00"
    pub date: String,

    // Issue series (the first gazette series is "Α")
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub analyzed: bool,
}

fn default_kind() -> String {
    "Α".to_string()
}

impl Issue {
    pub fn has_file(&self) -> bool {
        !self.file.is_empty() && self.file != FILE_NOT_AVAILABLE
    }

    /// The four-digit year prefix of the issue date
    pub fn year(&self) -> &str {
        self.date.get(..4).unwrap_or(&self.date)
    }
}

/// Issue metadata prior to insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub file: String,
    pub number: String,
    pub title: String,
    pub date: String,
    #[serde(default = "default_kind")]
    pub kind: String,
}

/// One (role, name) pair found in a signature block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSignature {
    pub role: String,
    pub name: String,
}

impl ExtractedSignature {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        ExtractedSignature {
            role: role.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ExtractedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// A (person, role) pairing as seen in one issue, before reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignatureObservation {
    pub person_name: String,
    pub role: String,
    pub issue_title: String,
    pub issue_date: String,
}

/// A resolved identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
}
