//! Document attachment listing
//!
//! Attachments live on disk under `<root>/<company_id>/<bucket>/<document_id>/`.
//! Writes go through an external blob store; services only list what is
//! there.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::context::CompanyId;
use crate::{Error, Result};

/// One stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Read-only view over the attachment folders
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder(&self, company_id: &CompanyId, bucket: &str, document_id: &str) -> Result<PathBuf> {
        for part in [company_id.as_str(), bucket, document_id] {
            if !is_safe_segment(part) {
                return Err(Error::InvalidInput(format!(
                    "Invalid path segment: {:?}",
                    part
                )));
            }
        }
        Ok(self
            .root
            .join(company_id.as_str())
            .join(bucket)
            .join(document_id))
    }

    /// Files attached to one document, sorted by name; empty when none exist
    pub async fn list(
        &self,
        company_id: &CompanyId,
        bucket: &str,
        document_id: &str,
    ) -> Result<Vec<FileMetadata>> {
        let folder = self.folder(company_id, bucket, document_id)?;

        let mut entries = match tokio::fs::read_dir(&folder).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No attachment folder at {}", folder.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(FileMetadata {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_folder_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let files = store
            .list(&CompanyId::new("acme"), "issues", "abc")
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_lists_files_sorted_and_skips_folders() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("acme").join("purchase-orders").join("po1");
        std::fs::create_dir_all(folder.join("nested")).unwrap();
        std::fs::write(folder.join("b.pdf"), b"12345").unwrap();
        std::fs::write(folder.join("a.txt"), b"1").unwrap();

        let store = DocumentStore::new(dir.path());
        let files = store
            .list(&CompanyId::new("acme"), "purchase-orders", "po1")
            .await
            .unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.pdf"]);
        assert_eq!(files[1].size, 5);
        assert!(files[0].modified.is_some());
    }

    #[tokio::test]
    async fn test_other_tenant_files_are_not_visible() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("globex").join("issues").join("i1");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("photo.jpg"), b"x").unwrap();

        let store = DocumentStore::new(dir.path());
        let files = store
            .list(&CompanyId::new("acme"), "issues", "i1")
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let store = DocumentStore::new("/tmp");
        let err = store
            .list(&CompanyId::new("acme"), "issues", "..")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store
            .list(&CompanyId::new("acme"), "issues", "a/b")
            .await
            .is_err());
    }
}
