use std::path::Path;

use savedio_core::services::NewBookmark;

use crate::commands::common::{bookmark_service, open_database};
use crate::error::CliError;

pub async fn run_add(
    url: &str,
    title: Option<&str>,
    list: Option<&str>,
    notes: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let draft = NewBookmark::new(url, title.unwrap_or(""), notes.unwrap_or(""), list)?;

    let db = open_database(db_path).await?;
    let service = bookmark_service(&db).await?;
    let bookmark = service.create_bookmark(draft).await?;

    println!("{}", bookmark.id);
    Ok(())
}
