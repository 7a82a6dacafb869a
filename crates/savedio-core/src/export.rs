//! Bookmark export and import.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Bookmark;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "savediopp",
            Self::Markdown => "md",
        }
    }
}

/// Portable bookmark representation.
///
/// Ids, dates and local state are not exported: importing creates new
/// bookmarks. Field aliases accept files written by older app versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBookmark {
    #[serde(default, alias = "mTitle")]
    pub title: String,
    #[serde(default, alias = "mListName")]
    pub list: String,
    #[serde(alias = "mUrl")]
    pub url: String,
    #[serde(default, alias = "mNotes")]
    pub notes: String,
}

impl From<&Bookmark> for ExportBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            list: bookmark.list_name.clone(),
            url: bookmark.url.clone(),
            notes: bookmark.notes.clone(),
        }
    }
}

/// Render bookmarks as pretty-printed JSON.
pub fn render_json_export(bookmarks: &[Bookmark]) -> Result<String> {
    if bookmarks.is_empty() {
        return Err(Error::InvalidInput("There are no bookmarks to export".to_string()));
    }
    let items: Vec<ExportBookmark> = bookmarks.iter().map(ExportBookmark::from).collect();
    Ok(serde_json::to_string_pretty(&items)?)
}

/// Render bookmarks as a Markdown link list grouped by list.
#[must_use]
pub fn render_markdown_export(bookmarks: &[Bookmark]) -> String {
    let mut sorted: Vec<&Bookmark> = bookmarks.iter().collect();
    sorted.sort_by(|a, b| a.list_name.cmp(&b.list_name));

    let mut output = String::new();
    let mut current_list: Option<&str> = None;
    for bookmark in sorted {
        if current_list != Some(bookmark.list_name.as_str()) {
            if current_list.is_some() {
                output.push('\n');
            }
            let heading = if bookmark.has_list() {
                bookmark.list_name.as_str()
            } else {
                "Unlisted"
            };
            let _ = writeln!(output, "## {heading}");
            let _ = writeln!(output);
            current_list = Some(bookmark.list_name.as_str());
        }

        let title = if bookmark.title.is_empty() {
            bookmark.url.as_str()
        } else {
            bookmark.title.as_str()
        };
        let _ = writeln!(output, "- [{title}]({})", bookmark.url);
        if !bookmark.notes.is_empty() {
            let _ = writeln!(output, "  {}", bookmark.notes);
        }
    }

    output
}

/// Render bookmarks based on selected export format.
pub fn render_bookmarks_export(bookmarks: &[Bookmark], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => render_json_export(bookmarks),
        ExportFormat::Markdown => Ok(render_markdown_export(bookmarks)),
    }
}

/// Parse an exported JSON array.
///
/// Elements may be objects or JSON-encoded object strings. Every element
/// needs a URL and the array must not be empty.
pub fn parse_json_import(payload: &str) -> Result<Vec<ExportBookmark>> {
    let elements: Vec<Value> = serde_json::from_str(payload.trim())?;
    if elements.is_empty() {
        return Err(Error::InvalidInput("The file contains no bookmarks".to_string()));
    }

    elements
        .into_iter()
        .map(|element| -> Result<ExportBookmark> {
            match element {
                Value::String(encoded) => Ok(serde_json::from_str(&encoded)?),
                other => Ok(serde_json::from_value(other)?),
            }
        })
        .collect()
}

/// Build the default file name for an export made on `date`.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("Bookmarks-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bookmark(title: &str, list: &str, notes: &str) -> Bookmark {
        let mut bookmark = Bookmark::new(format!("https://example.com/{title}"), title);
        bookmark.list_name = list.to_string();
        bookmark.notes = notes.to_string();
        bookmark
    }

    #[test]
    fn json_export_keeps_portable_fields_only() {
        let rendered = render_json_export(&[bookmark("rust", "work", "read")]).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            parsed[0],
            serde_json::json!({
                "title": "rust",
                "list": "work",
                "url": "https://example.com/rust",
                "notes": "read"
            })
        );
    }

    #[test]
    fn empty_export_is_rejected() {
        assert!(render_json_export(&[]).is_err());
    }

    #[test]
    fn import_reads_exported_file() {
        let rendered = render_json_export(&[bookmark("a", "", ""), bookmark("b", "work", "")])
            .unwrap();
        let imported = parse_json_import(&rendered).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[1].list, "work");
    }

    #[test]
    fn import_accepts_encoded_legacy_elements() {
        let payload = r#"["{\"mTitle\":\"Rust\",\"mListName\":\"\",\"mUrl\":\"https://rust-lang.org\",\"mNotes\":\"\"}"]"#;
        let imported = parse_json_import(payload).unwrap();

        assert_eq!(imported[0].title, "Rust");
        assert_eq!(imported[0].url, "https://rust-lang.org");
    }

    #[test]
    fn import_requires_url_and_elements() {
        assert!(parse_json_import("[]").is_err());
        assert!(parse_json_import(r#"[{"title": "no url"}]"#).is_err());
        assert!(parse_json_import("not json").is_err());
    }

    #[test]
    fn markdown_groups_by_list() {
        let rendered = render_markdown_export(&[
            bookmark("b", "work", "note"),
            bookmark("a", "", ""),
        ]);

        assert_eq!(
            rendered,
            "## Unlisted\n\n- [a](https://example.com/a)\n\n## work\n\n- [b](https://example.com/b)\n  note\n"
        );
    }

    #[test]
    fn suggested_file_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 2).unwrap();
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, date),
            "Bookmarks-2017-03-02.savediopp"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, date),
            "Bookmarks-2017-03-02.md"
        );
    }
}
