use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::signature::TARGET_SIGNATURE;

/// Supplies the plain text of an issue's document
#[async_trait]
pub trait TextSource: Send + Sync {
    /// `None` when no text exists for `file`
    async fn load_text(&self, file: &str) -> Result<Option<String>>;
}

/// Reads the `.txt` conversion stored next to each document under a root directory.
///
/// `issues/2018/a_12.pdf` resolves to `<root>/issues/2018/a_12.txt`.
#[derive(Debug, Clone)]
pub struct TextDirectory {
    root: PathBuf,
}

impl TextDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text_path(&self, file: &str) -> PathBuf {
        self.root
            .join(file.trim_start_matches('/'))
            .with_extension("txt")
    }
}

#[async_trait]
impl TextSource for TextDirectory {
    async fn load_text(&self, file: &str) -> Result<Option<String>> {
        let path = self.text_path(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(target: TARGET_SIGNATURE, "No text found at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
