use std::path::{Path, PathBuf};

use chrono::Local;
use savedio_core::db::BookmarkFilter;
use savedio_core::export::{render_bookmarks_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::open_database;
use crate::error::CliError;

/// Directories get the suggested export file name appended.
pub fn resolve_export_path(output_path: &Path, format: ExportFormat) -> PathBuf {
    if output_path.is_dir() {
        output_path.join(suggested_export_file_name(
            format.into(),
            Local::now().date_naive(),
        ))
    } else {
        output_path.to_path_buf()
    }
}

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let order = db.load_settings().await?.sort_order;
    let bookmarks = db.list_bookmarks(&BookmarkFilter::All, order).await?;
    let rendered = render_bookmarks_export(&bookmarks, format.into())?;

    if let Some(path) = output_path {
        let path = resolve_export_path(path, format);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
