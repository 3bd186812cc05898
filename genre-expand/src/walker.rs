use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tags::{Song, TagStore};

static AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "m4a", "opus", "wma", "aac", "aiff", "aif", "alac", "ape", "wav", "wv",
];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Audio files found directly inside one directory.
#[derive(Debug)]
pub struct DirBatch {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Songs in one directory sharing an artist.
#[derive(Debug)]
pub struct ArtistGroup {
    pub artist: String,
    /// Genre of the first file seen for this artist, for display.
    pub existing_genre: String,
    /// Songs eligible for modification.
    pub songs: Vec<Song>,
}

/// Visit `root` and its subdirectories down to `level` below it, one batch
/// per directory, parents before children.
pub fn walk_level(root: &Path, level: usize) -> Vec<DirBatch> {
    let mut batches = Vec::new();
    collect_batches(root, 0, level, &mut batches);
    batches
}

fn collect_batches(dir: &Path, depth: usize, level: usize, batches: &mut Vec<DirBatch>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        // Linked directories are not followed; linked tracks still count.
        if file_type.is_dir() {
            subdirs.push(path);
        } else if path.is_file() && is_audio_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    batches.push(DirBatch {
        dir: dir.to_path_buf(),
        files,
    });

    if depth < level {
        for subdir in subdirs {
            collect_batches(&subdir, depth + 1, level, batches);
        }
    }
}

/// Load each file and bucket it by artist, in first-seen order.
///
/// Files without a readable artist are dropped. With `missing_only`, songs
/// that already carry a genre stay out of `songs`.
pub fn group_by_artist<S: TagStore + ?Sized>(
    files: &[PathBuf],
    store: &S,
    missing_only: bool,
) -> Vec<ArtistGroup> {
    let mut groups: Vec<ArtistGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in files {
        let Some(song) = store.load(path) else {
            continue;
        };
        let Some(artist) = song.artist.clone() else {
            continue;
        };

        let slot = *index.entry(artist.clone()).or_insert_with(|| {
            groups.push(ArtistGroup {
                artist,
                existing_genre: song.genre_name().to_string(),
                songs: Vec::new(),
            });
            groups.len() - 1
        });

        if missing_only && !song.genre_name().is_empty() {
            continue;
        }
        groups[slot].songs.push(song);
    }
    groups
}
