//! Bookmark creation and deletion, online or offline.
//!
//! With a user key, changes go to saved.io first and are stored locally only
//! once the server accepted them. Without one, bookmarks live only in the
//! local database and get generated ids.

use crate::export::ExportBookmark;
use crate::models::{normalize_list_name, Bookmark, BookmarkId};
use crate::sync::{RemoteBookmarkSource, SavedioClient, SyncError};
use crate::util::process_url;
use crate::{Error, Result};

use super::DatabaseService;

/// A validated bookmark that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub notes: String,
    /// Normalized list name, empty for none
    pub list_name: String,
}

impl NewBookmark {
    /// Validate user input.
    ///
    /// The URL gets a default scheme and the list name must be alphanumeric.
    pub fn new(url: &str, title: &str, notes: &str, list: Option<&str>) -> Result<Self> {
        let url = process_url(url);
        if url.is_empty() {
            return Err(Error::InvalidInput("URL must not be empty".to_string()));
        }

        let list_name = match list.map(str::trim).filter(|list| !list.is_empty()) {
            Some(list) => normalize_list_name(list)?,
            None => String::new(),
        };

        Ok(Self {
            url,
            title: title.trim().to_string(),
            notes: notes.trim().to_string(),
            list_name,
        })
    }

    fn list(&self) -> Option<&str> {
        Some(self.list_name.as_str()).filter(|list| !list.is_empty())
    }
}

/// Creates and deletes bookmarks against the remote API and the local store
#[derive(Clone)]
pub struct BookmarkService {
    db: DatabaseService,
    client: SavedioClient,
}

impl BookmarkService {
    pub const fn new(db: DatabaseService, client: SavedioClient) -> Self {
        Self { db, client }
    }

    /// Whether changes are sent to saved.io
    pub fn is_online(&self) -> bool {
        self.client.has_credentials()
    }

    /// Create a bookmark.
    ///
    /// Online, the server assigns id and date; offline, a local id and the
    /// current date are used.
    pub async fn create_bookmark(
        &self,
        draft: NewBookmark,
    ) -> std::result::Result<Bookmark, SyncError> {
        let mut bookmark = Bookmark::new(draft.url.clone(), draft.title.clone());
        bookmark.notes.clone_from(&draft.notes);
        bookmark.list_name.clone_from(&draft.list_name);

        if self.is_online() {
            let created = self
                .client
                .create_bookmark(&draft.url, &draft.title, draft.list())
                .await?;
            if created.date.is_empty() {
                return Err(SyncError::Serialization(format!(
                    "bookmark {} has no date",
                    created.id
                )));
            }
            bookmark.id = created.bookmark_id();
            bookmark.date = created.date;
        }

        self.db.add_bookmark(&bookmark).await?;
        tracing::info!(id = %bookmark.id, online = self.is_online(), "Created bookmark");
        Ok(bookmark)
    }

    /// Delete a bookmark, remotely first when online.
    ///
    /// A remote failure leaves the local copy in place.
    pub async fn delete_bookmark(
        &self,
        id: &BookmarkId,
    ) -> std::result::Result<Bookmark, SyncError> {
        if self.is_online() {
            self.client.delete_bookmark(id).await?;
        }

        let removed = self.db.remove_bookmark(id).await?;
        tracing::info!(id = %id, "Deleted bookmark");
        Ok(removed)
    }

    /// Create each imported bookmark, skipping the ones that fail.
    ///
    /// Returns how many bookmarks were stored.
    pub async fn import_bookmarks(&self, items: Vec<ExportBookmark>) -> usize {
        let total = items.len();
        let mut imported = 0;
        for item in items {
            let list = Some(item.list.as_str());
            let draft = match NewBookmark::new(&item.url, &item.title, &item.notes, list) {
                Ok(draft) => draft,
                Err(error) => {
                    tracing::warn!(url = %item.url, "Skipping imported bookmark: {error}");
                    continue;
                }
            };
            match self.create_bookmark(draft).await {
                Ok(_) => imported += 1,
                Err(error) => {
                    tracing::warn!(url = %item.url, "Failed to import bookmark: {error}");
                }
            }
        }

        tracing::info!(imported, total, "Imported bookmarks");
        imported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    async fn service(base_url: Option<String>, user_key: Option<&str>) -> BookmarkService {
        let config = ApiConfig {
            base_url: base_url.unwrap_or_else(|| "http://127.0.0.1:9/".to_string()),
            dev_key: Some("dev".to_string()),
        };
        let client = SavedioClient::new(&config, user_key.map(str::to_string)).unwrap();
        let db = DatabaseService::open_in_memory().await.unwrap();
        BookmarkService::new(db, client)
    }

    #[test]
    fn new_bookmark_normalizes_input() {
        let draft = NewBookmark::new(" rust-lang.org ", " Rust ", "", Some(" Work ")).unwrap();
        assert_eq!(draft.url, "http://rust-lang.org");
        assert_eq!(draft.title, "Rust");
        assert_eq!(draft.list_name, "work");

        let no_list = NewBookmark::new("https://a.example", "A", "", Some("  ")).unwrap();
        assert_eq!(no_list.list(), None);
    }

    #[test]
    fn new_bookmark_rejects_bad_input() {
        assert!(NewBookmark::new("  ", "Empty", "", None).is_err());
        assert!(NewBookmark::new("https://a.example", "A", "", Some("read later")).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_create_uses_local_id_and_date() {
        let service = service(None, None).await;
        let draft = NewBookmark::new("https://a.example", "A", "note", Some("work")).unwrap();

        let created = service.create_bookmark(draft).await.unwrap();

        assert!(!created.id.as_str().is_empty());
        assert_eq!(created.notes, "note");
        assert_eq!(service.db.list_names().await.unwrap(), vec!["work".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn online_create_stores_server_id_and_date() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bookmarks/");
                then.status(200).json_body(json!({"bk_id": "srv-1"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bookmarks/srv-1");
                then.status(200).json_body(json!({
                    "bk_id": "srv-1",
                    "bk_url": "https://a.example",
                    "bk_title": "A",
                    "bk_date": "2017-03-02 13:08:41"
                }));
            })
            .await;
        let service = service(Some(server.base_url()), Some("user")).await;

        let draft = NewBookmark::new("https://a.example", "A", "", None).unwrap();
        let created = service.create_bookmark(draft).await.unwrap();

        assert_eq!(created.id.as_str(), "srv-1");
        assert_eq!(created.date, "2017-03-02 13:08:41");
        assert!(service
            .db
            .get_bookmark(&BookmarkId::from("srv-1"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn online_delete_failure_keeps_local_copy() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/bookmarks/");
                then.status(500).body("down");
            })
            .await;
        let service = service(Some(server.base_url()), Some("user")).await;
        let mut bookmark = Bookmark::new("https://a.example", "A");
        bookmark.id = BookmarkId::from("srv-1");
        service.db.add_bookmark(&bookmark).await.unwrap();

        let result = service.delete_bookmark(&bookmark.id).await;

        assert!(matches!(result, Err(SyncError::Server { status: 500, .. })));
        assert!(service.db.get_bookmark(&bookmark.id).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn import_skips_invalid_entries() {
        let service = service(None, None).await;
        let items = vec![
            ExportBookmark {
                title: "Rust".to_string(),
                list: "Work".to_string(),
                url: "rust-lang.org".to_string(),
                notes: String::new(),
            },
            ExportBookmark {
                title: "Bad list".to_string(),
                list: "read later".to_string(),
                url: "https://b.example".to_string(),
                notes: String::new(),
            },
        ];

        assert_eq!(service.import_bookmarks(items).await, 1);

        let stored = service
            .db
            .list_bookmarks(&crate::db::BookmarkFilter::All, crate::models::SortOrder::Date)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].url, "http://rust-lang.org");
        assert_eq!(stored[0].list_name, "work");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_delete_removes_locally() {
        let service = service(None, None).await;
        let draft = NewBookmark::new("https://a.example", "A", "", Some("work")).unwrap();
        let created = service.create_bookmark(draft).await.unwrap();

        let removed = service.delete_bookmark(&created.id).await.unwrap();

        assert_eq!(removed.id, created.id);
        assert!(service.db.list_names().await.unwrap().is_empty());
    }
}
