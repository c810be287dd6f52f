
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use crate::db::connect_with_config;

/// Migrated database living inside a temp dir; keep the dir alive for the
/// duration of the test.
pub async fn temp_db() -> anyhow::Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let cfg = configs::DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("models.db").display()),
        ..configs::DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok((dir, db))
}
