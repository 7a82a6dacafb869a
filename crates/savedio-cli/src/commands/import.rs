use std::path::Path;

use savedio_core::export::parse_json_import;

use crate::commands::common::{bookmark_service, open_database};
use crate::error::CliError;

pub async fn run_import(input_path: &Path, db_path: &Path) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(input_path)?;
    let items = parse_json_import(&payload)?;
    let total = items.len();

    let db = open_database(db_path).await?;
    let service = bookmark_service(&db).await?;
    let imported = service.import_bookmarks(items).await;

    println!("Imported {imported} of {total} bookmarks");
    Ok(())
}
