//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::{LookupError, TagError};
use crate::prompt::Prompt;
use crate::settings::{MAX_LEVEL, Settings};
use crate::tags::{Song, TagStore};
use crate::wiki::{Encyclopedia, Page};

pub fn settings() -> Settings {
    Settings::new(PathBuf::from("/music"), true, MAX_LEVEL)
}

#[derive(Default)]
pub struct FakeWiki {
    searches: HashMap<String, Vec<String>>,
    pages: HashMap<String, String>,
    ambiguous: HashMap<String, Vec<String>>,
    pub search_calls: Cell<usize>,
    pub resolve_calls: Cell<usize>,
    pub html_fetches: Cell<usize>,
}

impl FakeWiki {
    pub fn with_search(mut self, query: &str, titles: &[&str]) -> Self {
        self.searches.insert(
            query.to_string(),
            titles.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn with_page(mut self, title: &str, html: &str) -> Self {
        self.pages.insert(title.to_string(), html.to_string());
        self
    }

    pub fn with_ambiguous(mut self, title: &str, options: &[&str]) -> Self {
        self.ambiguous.insert(
            title.to_string(),
            options.iter().map(ToString::to_string).collect(),
        );
        self
    }
}

impl Encyclopedia for FakeWiki {
    fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        self.search_calls.set(self.search_calls.get() + 1);
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    fn resolve(&self, title: &str) -> Result<Page, LookupError> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        if let Some(options) = self.ambiguous.get(title) {
            return Err(LookupError::Ambiguous {
                title: title.to_string(),
                options: options.clone(),
            });
        }
        if self.pages.contains_key(title) {
            Ok(Page::new(title))
        } else {
            Err(LookupError::NotFound(title.to_string()))
        }
    }

    fn fetch_html(&self, title: &str) -> Result<String, LookupError> {
        self.html_fetches.set(self.html_fetches.get() + 1);
        self.pages
            .get(title)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(title.to_string()))
    }
}

/// Replies from a script; panics if asked more than scripted.
pub struct ScriptedPrompt {
    replies: VecDeque<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(ToString::to_string).collect(),
            questions: Vec::new(),
        }
    }

    pub fn silent() -> Self {
        Self::new(&[])
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        match self.replies.pop_front() {
            Some(reply) => Ok(reply),
            None => panic!("unexpected prompt: {question}"),
        }
    }
}

#[derive(Default)]
pub struct MemoryTagStore {
    songs: HashMap<PathBuf, Song>,
    failing: HashSet<PathBuf>,
    pub saves: Vec<(PathBuf, String)>,
}

impl MemoryTagStore {
    pub fn with_song(mut self, path: &str, artist: Option<&str>, genre: Option<&str>) -> Self {
        let path = PathBuf::from(path);
        self.songs.insert(
            path.clone(),
            Song {
                path,
                artist: artist.map(str::to_string),
                genre: genre.map(str::to_string),
                title: None,
            },
        );
        self
    }

    pub fn failing_on(mut self, path: &str) -> Self {
        self.failing.insert(PathBuf::from(path));
        self
    }
}

impl TagStore for MemoryTagStore {
    fn load(&self, path: &Path) -> Option<Song> {
        self.songs.get(path).cloned()
    }

    fn save_genre(&mut self, song: &Song) -> Result<(), TagError> {
        if self.failing.contains(&song.path) {
            return Err(TagError::NoWritableTag(song.path.clone()));
        }
        self.saves
            .push((song.path.clone(), song.genre_name().to_string()));
        self.songs.insert(song.path.clone(), song.clone());
        Ok(())
    }
}

thread_local! {
    static LOG_FILTER: Cell<LevelFilter> = const { Cell::new(LevelFilter::Off) };
    static LOG_RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log lines per test thread, so parallel tests stay apart.
struct ThreadLogCapture;

impl Log for ThreadLogCapture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_FILTER.with(Cell::get)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            LOG_RECORDS.with(|records| {
                records
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()));
            });
        }
    }

    fn flush(&self) {}
}

static LOG_CAPTURE: ThreadLogCapture = ThreadLogCapture;
static INSTALL_LOG_CAPTURE: Once = Once::new();

/// Run `f` with the given level filter and return what it logged on this thread.
pub fn capture_logs(filter: LevelFilter, f: impl FnOnce()) -> Vec<(Level, String)> {
    INSTALL_LOG_CAPTURE.call_once(|| {
        log::set_logger(&LOG_CAPTURE).expect("no other logger in tests");
        log::set_max_level(LevelFilter::Trace);
    });

    LOG_RECORDS.with(|records| records.borrow_mut().clear());
    LOG_FILTER.with(|level| level.set(filter));
    f();
    LOG_FILTER.with(|level| level.set(LevelFilter::Off));
    LOG_RECORDS.with(|records| records.take())
}
