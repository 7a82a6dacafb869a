use std::path::Path;

use crate::commands::common::{bookmark_service, open_database, resolve_bookmark};
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let bookmark = resolve_bookmark(id, &db).await?;

    let service = bookmark_service(&db).await?;
    let removed = service.delete_bookmark(&bookmark.id).await?;

    println!("{}", removed.id);
    Ok(())
}
