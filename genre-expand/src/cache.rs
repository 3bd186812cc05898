use std::collections::HashMap;

/// What a previous resolution attempt decided for an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Genre(String),
    /// No genre was found, or the operator turned it down.
    Declined,
}

impl CacheEntry {
    /// The genre to apply, empty for a declined artist.
    pub fn genre(&self) -> &str {
        match self {
            CacheEntry::Genre(genre) => genre,
            CacheEntry::Declined => "",
        }
    }
}

/// Artist name to resolved genre, kept for the lifetime of one run.
#[derive(Debug, Default)]
pub struct ArtistCache {
    entries: HashMap<String, CacheEntry>,
}

impl ArtistCache {
    pub fn get(&self, artist: &str) -> Option<&CacheEntry> {
        self.entries.get(artist)
    }

    /// True when the artist has no entry yet or was declined.
    pub fn is_unresolved(&self, artist: &str) -> bool {
        matches!(self.get(artist), None | Some(CacheEntry::Declined))
    }

    /// Records a genre unless the artist already has an entry.
    pub fn remember(&mut self, artist: &str, genre: &str) {
        if !self.entries.contains_key(artist) {
            self.entries
                .insert(artist.to_string(), CacheEntry::Genre(genre.to_string()));
        }
    }

    pub fn decline(&mut self, artist: &str) {
        self.entries.insert(artist.to_string(), CacheEntry::Declined);
    }
}
