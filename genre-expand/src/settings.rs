use std::path::PathBuf;

use log::LevelFilter;

/// Depth used when `--level` is not given.
pub const MAX_LEVEL: usize = 1000;

/// Raw search results kept when none of them look music-related.
pub const ARTIST_SEARCH_LIMIT: usize = 3;

/// Titles requested from the encyclopedia per search.
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Longest genre string written to a tag, in characters.
pub const MAX_GENRE_CHARS: usize = 255;

/// Title fragments that mark a topic as music-related.
pub static MUSIC_KEYWORDS: &[&str] = &["artist", "singer", "rapper", "music", "band"];

/// Runtime configuration for one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_dir: PathBuf,
    /// Deepest directory visited, counted in path components below `search_dir`.
    pub level: usize,
    pub force: bool,
    pub force_save: bool,
    pub missing_only: bool,
    pub quiet: bool,
}

impl Settings {
    /// A non-recursive run never descends, whatever `level` says.
    pub fn new(search_dir: PathBuf, recursive: bool, level: usize) -> Self {
        Self {
            search_dir,
            level: if recursive { level } else { 0 },
            force: false,
            force_save: false,
            missing_only: false,
            quiet: false,
        }
    }

    /// Whether genre and overwrite confirmations are skipped.
    pub fn skips_save_prompt(&self) -> bool {
        self.force || self.force_save
    }

    /// Status and diagnostics are shown at info unless the run is quiet.
    pub fn log_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Off
        } else {
            LevelFilter::Info
        }
    }
}
