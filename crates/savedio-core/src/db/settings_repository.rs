//! Settings repository implementation

use crate::error::{Error, Result};
use crate::models::{Settings, SortOrder, SyncResult};
use libsql::{params, Connection};

const USER_API_KEY: &str = "user_api_key";
const SMART_FAVORITES: &str = "smart_favorites";
const SORT_ORDER: &str = "sort_order";
const LAST_SYNC_TIME: &str = "last_sync_time";

/// Trait for settings and sync bookkeeping storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Load settings from the database
    async fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    async fn save(&self, settings: &Settings) -> Result<()>;

    /// Time of the last successful reconciliation (Unix ms), 0 when never synced
    async fn last_sync_time(&self) -> Result<i64>;

    /// Record the time of a successful reconciliation
    async fn set_last_sync_time(&self, millis: i64) -> Result<()>;

    /// Outcome of the most recent reconciliation attempt
    async fn load_sync_result(&self) -> Result<Option<SyncResult>>;

    /// Overwrite the reconciliation outcome record
    async fn save_sync_result(&self, result: &SyncResult) -> Result<()>;
}

/// libSQL implementation of `SettingsRepository`
pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(value) = self.get_setting(USER_API_KEY).await? {
            settings.user_api_key = Some(value);
        }

        if let Some(value) = self.get_setting(SMART_FAVORITES).await? {
            settings.smart_favorites = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(value) = self.get_setting(SORT_ORDER).await? {
            settings.sort_order =
                serde_json::from_str::<SortOrder>(&format!("\"{value}\"")).unwrap_or_default();
        }

        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        match settings.user_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                self.set_setting(USER_API_KEY, key.trim()).await?;
            }
            _ => self.remove_setting(USER_API_KEY).await?,
        }
        self.set_setting(
            SMART_FAVORITES,
            if settings.smart_favorites {
                "true"
            } else {
                "false"
            },
        )
        .await?;
        let sort_order = serde_json::to_string(&settings.sort_order)?
            .trim_matches('"')
            .to_string();
        self.set_setting(SORT_ORDER, &sort_order).await?;
        Ok(())
    }

    async fn last_sync_time(&self) -> Result<i64> {
        match self.get_setting(LAST_SYNC_TIME).await? {
            Some(value) => value.trim().parse().map_err(|_| {
                Error::Database(format!("Invalid {LAST_SYNC_TIME} value: {value}"))
            }),
            None => Ok(0),
        }
    }

    async fn set_last_sync_time(&self, millis: i64) -> Result<()> {
        self.set_setting(LAST_SYNC_TIME, &millis.to_string()).await
    }

    async fn load_sync_result(&self) -> Result<Option<SyncResult>> {
        let mut rows = self
            .conn
            .query(
                "SELECT success, message, updated_at FROM sync_result WHERE id = 1",
                (),
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(SyncResult {
                success: row.get::<i32>(0)? != 0,
                message: row.get(1)?,
                updated_at: row.get(2)?,
            })),
            None => Ok(None),
        }
    }

    async fn save_sync_result(&self, result: &SyncResult) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO sync_result (id, success, message, updated_at)
                 VALUES (1, ?, ?, ?)",
                params![
                    i64::from(result.success),
                    result.message.as_str(),
                    result.updated_at
                ],
            )
            .await?;
        Ok(())
    }
}

impl LibSqlSettingsRepository<'_> {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM settings WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
                [key, value],
            )
            .await?;
        Ok(())
    }

    async fn remove_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", [key])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_load_default_settings() {
        let db = setup().await;
        let repo = LibSqlSettingsRepository::new(db.connection());

        let settings = repo.load().await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(repo.last_sync_time().await.unwrap(), 0);
        assert!(repo.load_sync_result().await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_and_load_settings() {
        let db = setup().await;
        let repo = LibSqlSettingsRepository::new(db.connection());

        let settings = Settings {
            user_api_key: Some("user-key".to_string()),
            smart_favorites: true,
            sort_order: SortOrder::Clicks,
        };
        repo.save(&settings).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), settings);

        repo.save(&Settings::default()).await.unwrap();
        assert_eq!(repo.load().await.unwrap().user_api_key, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_last_sync_time() {
        let db = setup().await;
        let repo = LibSqlSettingsRepository::new(db.connection());

        repo.set_last_sync_time(1_488_456_521_000).await.unwrap();
        assert_eq!(repo.last_sync_time().await.unwrap(), 1_488_456_521_000);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_result_is_overwritten() {
        let db = setup().await;
        let repo = LibSqlSettingsRepository::new(db.connection());

        repo.save_sync_result(&SyncResult::succeeded("0 removed, 1 created, 0 updated"))
            .await
            .unwrap();
        repo.save_sync_result(&SyncResult::failed("network error"))
            .await
            .unwrap();

        let stored = repo.load_sync_result().await.unwrap().unwrap();
        assert!(!stored.success);
        assert_eq!(stored.message, "network error");
    }
}
