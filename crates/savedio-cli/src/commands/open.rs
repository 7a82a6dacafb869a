use std::path::Path;

use crate::commands::common::{open_database, resolve_bookmark};
use crate::error::CliError;

pub async fn run_open(id: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let bookmark = resolve_bookmark(id, &db).await?;
    let clicked = db.record_click(&bookmark.id).await?;

    if clicked.is_favorite && !bookmark.is_favorite {
        tracing::info!(id = %clicked.id, "Bookmark promoted to favorite");
    }
    println!("{}", clicked.url);
    Ok(())
}
