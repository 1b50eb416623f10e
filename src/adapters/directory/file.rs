//! Offline member directory: a JSON array of member rows on disk.
//!
//! Re-read on every call so edits between sends are picked up.

use crate::adapters::directory::row::parse_rows;
use crate::domain::{DomainError, MemberRecord};
use crate::ports::MemberDirectory;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonFileDirectory {
    path: PathBuf,
}

impl JsonFileDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl MemberDirectory for JsonFileDirectory {
    async fn list_members(&self) -> Result<Vec<MemberRecord>, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::DirectoryUnavailable(format!("read {}: {}", self.path.display(), e))
        })?;
        parse_rows(&content).map_err(|e| {
            DomainError::DirectoryUnavailable(format!("parse {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_members() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"email":"Exec@X.com","role":"executive","rank":null}}]"#
        )
        .unwrap();

        let members = JsonFileDirectory::new(file.path())
            .list_members()
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, Role::Executive);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileDirectory::new(dir.path().join("members.json"))
            .list_members()
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DirectoryUnavailable(_)));
    }
}
