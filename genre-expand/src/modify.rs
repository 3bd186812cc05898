use log::{error, info};

use crate::cache::ArtistCache;
use crate::prompt::{Confirmer, Prompt};
use crate::tags::{Song, TagStore};

/// Per-group write counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifyReport {
    pub saved: usize,
    pub failed: usize,
    pub declined: bool,
}

/// Apply `new_genre` to an artist's songs.
///
/// Nothing is written when the genre is empty, the group is empty, or the
/// first song already carries exactly this genre. Replacing a different
/// existing genre asks first unless the artist already has a cached genre;
/// a refusal marks the artist declined. Each failed save is reported and the
/// remaining songs are still written.
pub fn modify_songs<P: Prompt, S: TagStore + ?Sized>(
    confirmer: &mut Confirmer<P>,
    cache: &mut ArtistCache,
    store: &mut S,
    artist: &str,
    songs: &mut [Song],
    new_genre: &str,
    already_cached: bool,
) -> ModifyReport {
    let mut report = ModifyReport::default();
    if new_genre.is_empty() {
        return report;
    }
    let Some(first) = songs.first() else {
        return report;
    };

    let old_genre = first.genre_name().to_string();
    if old_genre == new_genre {
        if !already_cached {
            info!("New and old genre match; moving on...");
        }
        cache.remember(artist, new_genre);
        return report;
    }

    if !old_genre.is_empty()
        && cache.is_unresolved(artist)
        && !confirmer.confirm_overwrite(artist, &old_genre, new_genre)
    {
        cache.decline(artist);
        report.declined = true;
        return report;
    }

    cache.remember(artist, new_genre);

    info!("Artist: {artist}\tNew Genre: {new_genre}");
    for song in songs.iter_mut() {
        song.genre = Some(new_genre.to_string());
        info!("Saving {}...", song.display_name());
        match store.save_genre(song) {
            Ok(()) => report.saved += 1,
            Err(e) => {
                error!("Error during saving: {e}");
                report.failed += 1;
            }
        }
    }
    report
}
