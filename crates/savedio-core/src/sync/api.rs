//! saved.io HTTP API client.

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::SyncError;
use crate::config::ApiConfig;
use crate::models::{Bookmark, BookmarkId};
use crate::util::{compact_text, normalize_text_option};

/// Number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A bookmark as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RemoteBookmark {
    #[serde(rename = "bk_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "bk_url", default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(rename = "bk_title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "bk_note", default, deserialize_with = "lenient_string")]
    pub note: String,
    #[serde(rename = "bk_date", default, deserialize_with = "lenient_string")]
    pub date: String,
    /// Not every API version reports the list; empty when absent
    #[serde(rename = "bk_list", default, deserialize_with = "lenient_string")]
    pub list: String,
}

impl RemoteBookmark {
    /// Identifier of the record
    pub fn bookmark_id(&self) -> BookmarkId {
        BookmarkId::new(self.id.clone())
    }

    /// Build a new local bookmark from this record
    pub fn to_bookmark(&self) -> Bookmark {
        Bookmark {
            id: self.bookmark_id(),
            url: self.url.clone(),
            title: self.title.clone(),
            notes: self.note.clone(),
            date: self.date.clone(),
            list_name: self.list.clone(),
            is_favorite: false,
            click_counter: 0,
        }
    }

    /// Whether any synchronized field differs from the local copy.
    ///
    /// Strict string comparison, no normalization.
    pub fn differs_from(&self, local: &Bookmark) -> bool {
        self.title != local.title
            || self.url != local.url
            || self.note != local.notes
            || self.date != local.date
    }

    /// Overwrite the synchronized fields of a local bookmark.
    ///
    /// Local-only state (favorite flag, clicks, list) is left untouched.
    pub fn apply_to(&self, local: &mut Bookmark) {
        local.title.clone_from(&self.title);
        local.url.clone_from(&self.url);
        local.notes.clone_from(&self.note);
        local.date.clone_from(&self.date);
    }
}

/// Null, missing or non-string values decode to strings instead of failing
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(value)) => value,
        Some(other) => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct CreateBookmarkResponse {
    #[serde(rename = "bk_id", default, deserialize_with = "lenient_string")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Read access to the remote bookmark collection
#[allow(async_fn_in_trait)]
pub trait RemoteBookmarkSource {
    /// Whether a user key is available; without one the app is offline
    fn has_credentials(&self) -> bool;

    /// Fetch one page of bookmarks. Pages start at 1; page 0 means page 1.
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<RemoteBookmark>, SyncError>;
}

/// Application and user keys sent with every request
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub dev_key: String,
    pub user_key: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiCredentials")
            .field("dev_key", &"[REDACTED]")
            .field("user_key", &"[REDACTED]")
            .finish()
    }
}

/// reqwest client for the saved.io API
#[derive(Clone)]
pub struct SavedioClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<ApiCredentials>,
}

impl SavedioClient {
    /// Create a client; without a non-blank user key it stays offline.
    pub fn new(config: &ApiConfig, user_key: Option<String>) -> Result<Self, SyncError> {
        let credentials = normalize_text_option(user_key).map(|user_key| ApiCredentials {
            dev_key: config.dev_key.clone().unwrap_or_default(),
            user_key,
        });
        if credentials.is_some() && config.dev_key.is_none() {
            tracing::warn!("No saved.io developer key configured; requests will be rejected");
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().build()?,
            credentials,
        })
    }

    /// Create a bookmark remotely and return it as stored by the server.
    ///
    /// The create call only answers with the id, so the record is fetched
    /// again to learn its date.
    pub async fn create_bookmark(
        &self,
        url: &str,
        title: &str,
        list: Option<&str>,
    ) -> Result<RemoteBookmark, SyncError> {
        let credentials = self.credentials()?;
        let mut query = vec![
            ("devkey", credentials.dev_key.as_str()),
            ("key", credentials.user_key.as_str()),
            ("url", url),
            ("title", title),
        ];
        if let Some(list) = list.filter(|list| !list.is_empty()) {
            query.push(("list", list));
        }

        let response = self
            .client
            .post(self.endpoint("bookmarks/"))
            .query(&query)
            .send()
            .await?;
        let created: CreateBookmarkResponse = decode(&read_body(response).await?)?;
        if created.id.trim().is_empty() {
            return Err(SyncError::Serialization(
                "create response did not include bk_id".to_string(),
            ));
        }

        tracing::debug!("Created remote bookmark {}", created.id);
        self.get_bookmark(&BookmarkId::new(created.id)).await
    }

    /// Fetch a single bookmark by id.
    pub async fn get_bookmark(&self, id: &BookmarkId) -> Result<RemoteBookmark, SyncError> {
        let credentials = self.credentials()?;
        let response = self
            .client
            .get(self.endpoint(&format!("bookmarks/{id}")))
            .query(&[
                ("devkey", credentials.dev_key.as_str()),
                ("key", credentials.user_key.as_str()),
            ])
            .send()
            .await?;
        decode(&read_body(response).await?)
    }

    /// Delete a bookmark remotely.
    pub async fn delete_bookmark(&self, id: &BookmarkId) -> Result<(), SyncError> {
        let credentials = self.credentials()?;
        let response = self
            .client
            .delete(self.endpoint("bookmarks/"))
            .query(&[
                ("devkey", credentials.dev_key.as_str()),
                ("key", credentials.user_key.as_str()),
                ("id", id.as_str()),
            ])
            .send()
            .await?;
        read_body(response).await?;
        tracing::debug!("Deleted remote bookmark {id}");
        Ok(())
    }

    fn credentials(&self) -> Result<&ApiCredentials, SyncError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| SyncError::Auth("no user key configured".to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl RemoteBookmarkSource for SavedioClient {
    fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<RemoteBookmark>, SyncError> {
        let credentials = self.credentials()?;
        let page = page.max(1).to_string();
        let limit = limit.to_string();

        let response = self
            .client
            .get(self.endpoint("bookmarks/"))
            .query(&[
                ("devkey", credentials.dev_key.as_str()),
                ("key", credentials.user_key.as_str()),
                ("page", page.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        decode(&read_body(response).await?)
    }
}

/// Read the body, mapping non-success statuses to errors
async fn read_body(response: reqwest::Response) -> Result<String, SyncError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::Auth(parse_api_error(status, &body)));
    }
    if !status.is_success() {
        return Err(SyncError::Server {
            status: status.as_u16(),
            message: parse_api_error(status, &body),
        });
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SyncError> {
    serde_json::from_str(body).map_err(|error| SyncError::Serialization(error.to_string()))
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
