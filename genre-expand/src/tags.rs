use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::Tag;
use log::{debug, warn};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey, Value};
use symphonia::core::probe::Hint;

use crate::error::TagError;

/// One audio file and the tag fields the genre workflow cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub path: PathBuf,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub title: Option<String>,
}

impl Song {
    pub fn genre_name(&self) -> &str {
        self.genre.as_deref().unwrap_or_default()
    }

    /// Title for status output, falling back to the file name.
    pub fn display_name(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Reads songs from disk and writes their genre back.
pub trait TagStore {
    /// `None` when the file cannot be parsed at all.
    fn load(&self, path: &Path) -> Option<Song>;

    /// Persist `song.genre` to the file.
    fn save_genre(&mut self, song: &Song) -> Result<(), TagError>;
}

pub struct LoftyTagStore;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_non_empty(
    primary: Option<&Tag>,
    tags: &[Tag],
    get: impl Fn(&Tag) -> Option<String>,
) -> Option<String> {
    primary
        .and_then(|tag| non_empty(get(tag)))
        .or_else(|| tags.iter().find_map(|tag| non_empty(get(tag))))
}

fn read_with_lofty(path: &Path) -> Option<Song> {
    let tagged_file = read_from_path(path).ok()?;
    let primary = tagged_file.primary_tag();
    let tags = tagged_file.tags();

    Some(Song {
        path: path.to_path_buf(),
        artist: first_non_empty(primary, tags, |tag| tag.artist().map(|v| v.into_owned())),
        genre: first_non_empty(primary, tags, |tag| tag.genre().map(|v| v.into_owned())),
        title: first_non_empty(primary, tags, |tag| tag.title().map(|v| v.into_owned())),
    })
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(v) => non_empty(Some(v.clone())),
        _ => None,
    }
}

fn read_with_symphonia(path: &Path) -> Option<Song> {
    let file = std::fs::File::open(path).ok()?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext_str) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext_str);
    }

    let mut probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .ok()?;

    let mut song = Song {
        path: path.to_path_buf(),
        artist: None,
        genre: None,
        title: None,
    };

    // ID3 tags land on the probe result, Vorbis comments on the format reader.
    let probed_meta = probed.metadata.get();
    let probed_tags = probed_meta
        .as_ref()
        .and_then(|m| m.current())
        .map(MetadataRevision::tags)
        .unwrap_or_default()
        .iter();
    let format_meta = probed.format.metadata();
    let format_tags = format_meta
        .current()
        .map(MetadataRevision::tags)
        .unwrap_or_default()
        .iter();

    for tag in probed_tags.chain(format_tags) {
        let slot = match tag.std_key {
            Some(StandardTagKey::Artist) => &mut song.artist,
            Some(StandardTagKey::Genre) => &mut song.genre,
            Some(StandardTagKey::TrackTitle) => &mut song.title,
            _ => continue,
        };
        if slot.is_none() {
            *slot = string_value(&tag.value);
        }
    }
    Some(song)
}

impl TagStore for LoftyTagStore {
    fn load(&self, path: &Path) -> Option<Song> {
        if let Some(song) = read_with_lofty(path) {
            return Some(song);
        }
        debug!("lofty could not read {}, probing with symphonia", path.display());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            read_with_symphonia(path)
        }));
        if let Ok(song) = result {
            song
        } else {
            warn!("Panic while reading {}, skipping", path.display());
            None
        }
    }

    fn save_genre(&mut self, song: &Song) -> Result<(), TagError> {
        let lofty_error = |source| TagError::Lofty {
            path: song.path.clone(),
            source,
        };

        let mut tagged_file = read_from_path(&song.path).map_err(lofty_error)?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::NoWritableTag(song.path.clone()))?;

        match song.genre.as_deref() {
            Some(genre) if !genre.is_empty() => tag.set_genre(genre.to_string()),
            _ => tag.remove_genre(),
        }

        tagged_file
            .save_to_path(&song.path, WriteOptions::default())
            .map_err(lofty_error)
    }
}
