use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::{any::AnyConnectOptions, AnyPool, ConnectOptions, migrate::Migrator};
use sqlx::any::AnyPoolOptions;
use std::{path::PathBuf, str::FromStr};
use std::sync::Once;

use crate::storage::Storage;

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed key/value store that outlives the process.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // If database_url is None, use a SQLite file in the user's data directory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        let pool = AnyPoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        tracing::debug!(%url, "database connected");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }
}

#[async_trait::async_trait]
impl Storage for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(*key)
                .bind(value.as_str())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await.context("committing cache entries")?;
        Ok(())
    }
}

const UPSERT: &str = "INSERT INTO kv_store(key, value) VALUES (?, ?)\n             ON CONFLICT(key) DO UPDATE SET value=excluded.value";

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("dev", "portal", "portal")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path).with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("portal.db");

    // Encode spaces in the path for a valid sqlite URL
    let mut path_str = path.to_string_lossy().to_string();
    if path_str.contains(' ') { path_str = path_str.replace(' ', "%20"); }
    Ok(format!("sqlite://{path_str}?mode=rwc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_db(dir: &tempfile::TempDir) -> Database {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("cache.db").display());
        let db = Database::connect(Some(&url)).await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn stores_and_overwrites_values() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;
        assert_eq!(db.get("cachedCourses").await.unwrap(), None);
        db.put("cachedCourses", "[]").await.unwrap();
        db.put("cachedCourses", "[1]").await.unwrap();
        assert_eq!(db.get("cachedCourses").await.unwrap().as_deref(), Some("[1]"));
        db.remove("cachedCourses").await.unwrap();
        assert_eq!(db.get("cachedCourses").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_all_writes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;
        db.put_all(&[("a", "1".to_string()), ("b", "2".to_string())]).await.unwrap();
        assert_eq!(db.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(db.get("b").await.unwrap().as_deref(), Some("2"));

        // Survives reconnecting to the same file
        drop(db);
        let again = temp_db(&dir).await;
        assert_eq!(again.get("b").await.unwrap().as_deref(), Some("2"));
    }
}
