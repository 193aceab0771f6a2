//!
//! File Writer Utility
//!
//! Writes exported artifacts (name lists, JSON reports) to disk, creating parent directories as
//! needed.

use crate::error::DiffError;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

async fn ensure_parent(path: &Path) -> Result<(), DiffError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| {
                error!("Failed to create directory `{}`: {}", parent.display(), e);
                DiffError::Io(format!("Cannot create directory {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

/// Write `content` to `path`, replacing any existing file.
pub async fn write_text(path: &Path, content: &str) -> Result<(), DiffError> {
    ensure_parent(path).await?;
    info!("Writing content to file `{}`.", path.display());
    fs::write(path, content).await.map_err(|e| {
        error!("Failed to write content to file `{}`: {}", path.display(), e);
        DiffError::Io(format!("Cannot write {}: {e}", path.display()))
    })?;
    info!("Content written to file `{}`.", path.display());
    Ok(())
}

/// Write one name per line (`.lst` format).
pub async fn write_name_list<I, S>(path: &Path, names: I) -> Result<usize, DiffError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut content = String::new();
    let mut count = 0;
    for name in names {
        content.push_str(name.as_ref());
        content.push('\n');
        count += 1;
    }
    write_text(path, &content).await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_name_list_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports/nested/passed.lst");
        let written = write_name_list(&path, ["Case_A", "Case_B"]).await.unwrap();
        assert_eq!(written, 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Case_A\nCase_B\n");
    }

    #[tokio::test]
    async fn test_write_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.lst");
        let names: Vec<String> = Vec::new();
        assert_eq!(write_name_list(&path, names).await.unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_text_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_text(&path, "first content").await.unwrap();
        write_text(&path, "2nd").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2nd");
    }
}
