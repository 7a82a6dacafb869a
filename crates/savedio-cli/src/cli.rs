use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use savedio_core::models::SortOrder;

#[derive(Parser)]
#[command(name = "savedio")]
#[command(about = "Keep saved.io bookmarks at hand from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a new bookmark
    #[command(alias = "new")]
    Add {
        /// Bookmark URL (`http://` is assumed when no scheme is given)
        url: String,
        /// Bookmark title
        #[arg(short, long)]
        title: Option<String>,
        /// List to file the bookmark under (letters and digits only)
        #[arg(short, long)]
        list: Option<String>,
        /// Free-form notes, kept locally
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Only bookmarks in this list
        #[arg(long, conflicts_with_all = ["favorites", "clicked"])]
        list: Option<String>,
        /// Only favorite bookmarks
        #[arg(long, conflicts_with = "clicked")]
        favorites: bool,
        /// Only bookmarks opened at least once
        #[arg(long)]
        clicked: bool,
        /// Ordering (defaults to the configured order)
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Maximum number of bookmarks to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show bookmark lists
    Lists {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a bookmark URL and count the visit
    Open {
        /// Bookmark ID or unique ID prefix
        id: String,
    },
    /// Delete a bookmark
    Delete {
        /// Bookmark ID or unique ID prefix
        id: String,
    },
    /// Mark a bookmark as favorite
    Favorite {
        /// Bookmark ID or unique ID prefix
        id: String,
        /// Remove the favorite mark instead
        #[arg(long)]
        off: bool,
    },
    /// Manage favorites in bulk
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Enable or disable sync notifications for a list
    Notify {
        /// List name
        list: String,
        /// Disable notifications instead
        #[arg(long)]
        off: bool,
    },
    /// Synchronize local bookmarks with saved.io once a day
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
        /// Sync now even if the last sync is less than a day old
        #[arg(long, conflicts_with = "watch")]
        immediate: bool,
        /// Keep running and sync once a day until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Export bookmarks
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import bookmarks from a JSON export
    Import {
        /// Exported file
        path: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for savedio_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Date,
    Title,
    Clicks,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Date => Self::Date,
            SortArg::Title => Self::Title,
            SortArg::Clicks => Self::Clicks,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// Mark the most opened bookmarks as favorites
    Smart,
    /// Remove every favorite mark
    Clear,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show the outcome of the last sync
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show,
    /// Store the saved.io user key and go online
    SetKey {
        /// saved.io user key
        key: String,
    },
    /// Forget the user key and work offline
    ClearKey,
    /// Promote frequently opened bookmarks to favorites automatically
    SmartFavorites {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Set the default bookmark ordering
    Sort {
        #[arg(value_enum)]
        order: SortArg,
    },
}
