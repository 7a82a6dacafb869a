//! Bookmark repository implementation

use std::collections::HashMap;

use libsql::{params, Connection, Row, Value};

use crate::error::Result;
use crate::models::{Bookmark, BookmarkId, BookmarkList};

const BOOKMARK_COLUMNS: &str =
    "id, url, title, notes, date, COALESCE(list_name, ''), is_favorite, click_counter";

/// Which bookmarks a query returns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookmarkFilter {
    /// Every bookmark
    #[default]
    All,
    /// Bookmarks flagged as favorite
    Favorites,
    /// Members of the named list
    InList(String),
    /// Bookmarks opened at least once
    Clicked,
}

/// Trait for bookmark and list storage operations (async)
#[allow(async_fn_in_trait)]
pub trait BookmarkRepository {
    /// Get a bookmark by ID
    async fn find_by_id(&self, id: &BookmarkId) -> Result<Option<Bookmark>>;

    /// List bookmarks matching a filter, in insertion order
    async fn find_all(&self, filter: &BookmarkFilter) -> Result<Vec<Bookmark>>;

    /// Insert a bookmark, or overwrite every field of an existing one
    ///
    /// A non-empty list name must reference an existing list.
    async fn upsert(&self, bookmark: &Bookmark) -> Result<()>;

    /// Delete a bookmark, returning whether it existed
    async fn delete(&self, id: &BookmarkId) -> Result<bool>;

    /// Get a list with its members
    async fn find_list(&self, name: &str) -> Result<Option<BookmarkList>>;

    /// Get every list with its members, ordered by name
    async fn find_lists(&self) -> Result<Vec<BookmarkList>>;

    /// Create a list if it doesn't exist yet and return it
    async fn upsert_list(&self, name: &str) -> Result<BookmarkList>;

    /// Set the notify flag of a list, returning whether the list exists
    async fn set_list_notify(&self, name: &str, notify: bool) -> Result<bool>;

    /// Delete a list, returning whether it existed
    ///
    /// Fails while bookmarks still reference the list.
    async fn delete_list(&self, name: &str) -> Result<bool>;
}

/// libSQL implementation of `BookmarkRepository`
pub struct LibSqlBookmarkRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlBookmarkRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_bookmark(row: &Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: BookmarkId::new(row.get::<String>(0)?),
            url: row.get(1)?,
            title: row.get(2)?,
            notes: row.get(3)?,
            date: row.get(4)?,
            list_name: row.get(5)?,
            is_favorite: row.get::<i32>(6)? != 0,
            click_counter: row.get(7)?,
        })
    }

    async fn query_bookmarks(&self, sql: &str, list: Option<&str>) -> Result<Vec<Bookmark>> {
        let mut rows = match list {
            Some(name) => self.conn.query(sql, [name]).await?,
            None => self.conn.query(sql, ()).await?,
        };

        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }
        Ok(bookmarks)
    }

    async fn member_ids(&self, name: &str) -> Result<Vec<BookmarkId>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id FROM bookmarks WHERE list_name = ? ORDER BY rowid",
                [name],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(BookmarkId::new(row.get::<String>(0)?));
        }
        Ok(ids)
    }
}

impl BookmarkRepository for LibSqlBookmarkRepository<'_> {
    async fn find_by_id(&self, id: &BookmarkId) -> Result<Option<Bookmark>> {
        let sql = format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = ?");
        let mut rows = self.conn.query(&sql, [id.as_str()]).await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_bookmark(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, filter: &BookmarkFilter) -> Result<Vec<Bookmark>> {
        let (condition, list) = match filter {
            BookmarkFilter::All => ("1 = 1", None),
            BookmarkFilter::Favorites => ("is_favorite = 1", None),
            BookmarkFilter::InList(name) => ("list_name = ?", Some(name.as_str())),
            BookmarkFilter::Clicked => ("click_counter > 0", None),
        };
        let sql =
            format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE {condition} ORDER BY rowid");
        self.query_bookmarks(&sql, list).await
    }

    async fn upsert(&self, bookmark: &Bookmark) -> Result<()> {
        let list_name = if bookmark.has_list() {
            Value::Text(bookmark.list_name.clone())
        } else {
            Value::Null
        };

        self.conn
            .execute(
                "INSERT INTO bookmarks (id, url, title, notes, date, list_name, is_favorite, click_counter)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    url = excluded.url,
                    title = excluded.title,
                    notes = excluded.notes,
                    date = excluded.date,
                    list_name = excluded.list_name,
                    is_favorite = excluded.is_favorite,
                    click_counter = excluded.click_counter",
                params![
                    bookmark.id.as_str(),
                    bookmark.url.as_str(),
                    bookmark.title.as_str(),
                    bookmark.notes.as_str(),
                    bookmark.date.as_str(),
                    list_name,
                    i64::from(bookmark.is_favorite),
                    bookmark.click_counter,
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &BookmarkId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", [id.as_str()])
            .await?;
        Ok(affected > 0)
    }

    async fn find_list(&self, name: &str) -> Result<Option<BookmarkList>> {
        let mut rows = self
            .conn
            .query("SELECT name, notify FROM bookmark_lists WHERE name = ?", [name])
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut list = BookmarkList::new(row.get::<String>(0)?);
        list.notify = row.get::<i32>(1)? != 0;
        list.bookmarks = self.member_ids(name).await?;
        Ok(Some(list))
    }

    async fn find_lists(&self) -> Result<Vec<BookmarkList>> {
        let mut members: HashMap<String, Vec<BookmarkId>> = HashMap::new();
        let mut rows = self
            .conn
            .query(
                "SELECT id, list_name FROM bookmarks WHERE list_name IS NOT NULL ORDER BY rowid",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            let id = BookmarkId::new(row.get::<String>(0)?);
            members.entry(row.get::<String>(1)?).or_default().push(id);
        }

        let mut rows = self
            .conn
            .query("SELECT name, notify FROM bookmark_lists ORDER BY name", ())
            .await?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next().await? {
            let mut list = BookmarkList::new(row.get::<String>(0)?);
            list.notify = row.get::<i32>(1)? != 0;
            list.bookmarks = members.remove(&list.name).unwrap_or_default();
            lists.push(list);
        }
        Ok(lists)
    }

    async fn upsert_list(&self, name: &str) -> Result<BookmarkList> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO bookmark_lists (name, notify) VALUES (?, 0)",
                [name],
            )
            .await?;

        self.find_list(name)
            .await?
            .ok_or_else(|| crate::error::Error::NotFound(format!("list {name}")))
    }

    async fn set_list_notify(&self, name: &str, notify: bool) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "UPDATE bookmark_lists SET notify = ? WHERE name = ?",
                params![i64::from(notify), name],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_list(&self, name: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmark_lists WHERE name = ?", [name])
            .await?;
        Ok(affected > 0)
    }
}

/// Delete the named list when it no longer has members.
///
/// Returns whether the list was deleted.
pub async fn purge_list_if_empty(repo: &impl BookmarkRepository, name: &str) -> Result<bool> {
    match repo.find_list(name).await? {
        Some(list) if list.is_empty() => repo.delete_list(name).await,
        _ => Ok(false),
    }
}
