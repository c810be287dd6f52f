//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Extract the file path from a `sqlite:` connection URL.
///
/// Returns `None` for in-memory databases and non-sqlite URLs.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}

/// Ensure the directory holding an embedded database file exists.
pub async fn ensure_env(database_url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(database_url) else {
        return Ok(());
    };
    let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "database directory not found; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "database directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_paths_are_extracted() {
        assert_eq!(sqlite_file_path("sqlite://data/catalog.db?mode=rwc"), Some("data/catalog.db"));
        assert_eq!(sqlite_file_path("sqlite:catalog.db"), Some("catalog.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/catalog"), None);
    }

    #[tokio::test]
    async fn ensure_env_creates_parent_dir() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("nested").join("db");
        let url = format!("sqlite://{}/catalog.db?mode=rwc", dir.display());
        ensure_env(&url).await?;
        assert!(dir.is_dir());
        Ok(())
    }
}
