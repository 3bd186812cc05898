use std::collections::HashSet;

use log::{debug, info, warn};

use crate::cache::ArtistCache;
use crate::genres::{filter_genres, join_genres};
use crate::modify::{ModifyReport, modify_songs};
use crate::pages::{SearchMode, find_pages};
use crate::prompt::{Confirmer, Prompt};
use crate::settings::Settings;
use crate::tags::{Song, TagStore};
use crate::walker::{ArtistGroup, group_by_artist, walk_level};
use crate::wiki::Encyclopedia;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub artists_resolved: usize,
    pub artists_declined: usize,
    pub files_saved: usize,
    pub save_failures: usize,
}

/// Drives one traversal: owns the artist cache and the collaborators.
pub struct Expander<E, P, S> {
    settings: Settings,
    wiki: E,
    confirmer: Confirmer<P>,
    store: S,
    cache: ArtistCache,
    summary: RunSummary,
}

impl<E: Encyclopedia, P: Prompt, S: TagStore> Expander<E, P, S> {
    pub fn new(settings: Settings, wiki: E, prompt: P, store: S) -> Self {
        let confirmer = Confirmer::new(prompt, &settings);
        Self {
            settings,
            wiki,
            confirmer,
            store,
            cache: ArtistCache::default(),
            summary: RunSummary::default(),
        }
    }

    pub fn run(&mut self) -> RunSummary {
        for batch in walk_level(&self.settings.search_dir, self.settings.level) {
            debug!(
                "Scanning {} ({} audio files)",
                batch.dir.display(),
                batch.files.len()
            );
            let groups = group_by_artist(&batch.files, &self.store, self.settings.missing_only);
            for group in groups {
                self.process_group(group);
            }
        }

        info!(
            "Done: {} artists tagged, {} skipped, {} files saved, {} failed",
            self.summary.artists_resolved,
            self.summary.artists_declined,
            self.summary.files_saved,
            self.summary.save_failures,
        );
        self.summary
    }

    pub fn process_group(&mut self, mut group: ArtistGroup) {
        if group.songs.is_empty() {
            debug!("Every song by {} already has a genre", group.artist);
            return;
        }

        if let Some(genre) = self.cache.get(&group.artist).map(|e| e.genre().to_string()) {
            self.apply(&group.artist, &mut group.songs, &genre, true);
            return;
        }

        info!(
            "Artist: {}\tOld Genre: {}",
            group.artist, group.existing_genre
        );
        let genres = self.find_genres(&group.artist);
        if genres.is_empty() {
            info!("No new genres found for {}.", group.artist);
            self.cache.decline(&group.artist);
            self.summary.artists_declined += 1;
            return;
        }

        let report = self.apply(&group.artist, &mut group.songs, &join_genres(&genres), false);
        if report.declined {
            self.summary.artists_declined += 1;
        } else {
            self.summary.artists_resolved += 1;
        }
    }

    fn apply(
        &mut self,
        artist: &str,
        songs: &mut [Song],
        genre: &str,
        already_cached: bool,
    ) -> ModifyReport {
        let report = modify_songs(
            &mut self.confirmer,
            &mut self.cache,
            &mut self.store,
            artist,
            songs,
            genre,
            already_cached,
        );
        self.summary.files_saved += report.saved;
        self.summary.save_failures += report.failed;
        report
    }

    /// Scan candidate pages until the operator accepts one page's genres.
    ///
    /// Keyword-ranked search results come first; the disambiguation route is
    /// only queried when none of them yields accepted genres. A page is never
    /// examined twice.
    pub fn find_genres(&mut self, artist: &str) -> Vec<String> {
        let mut searched = HashSet::new();
        for mode in [SearchMode::Ranked, SearchMode::Disambiguate] {
            for page in find_pages(&self.wiki, &mut self.confirmer, artist, mode) {
                if !searched.insert(page.title.clone()) {
                    continue;
                }
                info!("Searching page on {}", page.title);
                let genres = match page.html(&self.wiki) {
                    Ok(html) => filter_genres(html),
                    Err(e) => {
                        warn!("Could not load {}: {e}", page.title);
                        continue;
                    }
                };
                if !genres.is_empty() && self.confirmer.confirm_genres(artist, &genres) {
                    return genres;
                }
            }
        }
        Vec::new()
    }
}
