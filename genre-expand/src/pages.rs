use log::warn;

use crate::error::LookupError;
use crate::prompt::{Confirmer, Prompt};
use crate::settings::{ARTIST_SEARCH_LIMIT, MUSIC_KEYWORDS};
use crate::wiki::{Encyclopedia, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Keyword-filtered search results, narrowed by the operator.
    Ranked,
    /// Resolve the artist name directly, expanding a disambiguation page.
    Disambiguate,
}

fn is_music_related(title: &str) -> bool {
    let lower = title.to_lowercase();
    MUSIC_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// The first search result plus every music-related one.
pub fn filter_candidates(results: &[String]) -> Vec<String> {
    let candidates: Vec<String> = results
        .iter()
        .enumerate()
        .filter(|(i, title)| *i == 0 || is_music_related(title))
        .map(|(_, title)| title.clone())
        .collect();

    if candidates.is_empty() {
        results.iter().take(ARTIST_SEARCH_LIMIT).cloned().collect()
    } else {
        candidates
    }
}

/// Candidate pages, each resolved only when the caller pulls it.
pub struct LazyPages<'a, E: ?Sized> {
    wiki: &'a E,
    resolved: Option<Page>,
    titles: std::vec::IntoIter<String>,
}

impl<'a, E: Encyclopedia + ?Sized> LazyPages<'a, E> {
    fn new(wiki: &'a E, resolved: Option<Page>, titles: Vec<String>) -> Self {
        Self {
            wiki,
            resolved,
            titles: titles.into_iter(),
        }
    }
}

impl<E: Encyclopedia + ?Sized> Iterator for LazyPages<'_, E> {
    type Item = Page;

    fn next(&mut self) -> Option<Page> {
        if let Some(page) = self.resolved.take() {
            return Some(page);
        }
        for title in self.titles.by_ref() {
            match self.wiki.resolve(&title) {
                Ok(page) => return Some(page),
                Err(e) => warn!("Could not open page {title}: {e}"),
            }
        }
        None
    }
}

/// Topic pages worth scanning for an artist's genres.
///
/// Any operator choice happens up front; page lookups wait for iteration.
pub fn find_pages<'a, E, P>(
    wiki: &'a E,
    confirmer: &mut Confirmer<P>,
    artist: &str,
    mode: SearchMode,
) -> LazyPages<'a, E>
where
    E: Encyclopedia + ?Sized,
    P: Prompt,
{
    match mode {
        SearchMode::Ranked => match wiki.search(artist) {
            Ok(results) => {
                let chosen = confirmer.choose_titles(&filter_candidates(&results));
                LazyPages::new(wiki, None, chosen)
            }
            Err(e) => {
                warn!("Search for {artist} failed: {e}");
                LazyPages::new(wiki, None, Vec::new())
            }
        },
        SearchMode::Disambiguate => match wiki.resolve(artist) {
            Ok(page) => LazyPages::new(wiki, Some(page), Vec::new()),
            Err(LookupError::Ambiguous { options, .. }) => {
                let music: Vec<String> = options
                    .into_iter()
                    .filter(|title| is_music_related(title))
                    .collect();
                LazyPages::new(wiki, None, music)
            }
            Err(e) => {
                warn!("Could not resolve {artist}: {e}");
                LazyPages::new(wiki, None, Vec::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeWiki, ScriptedPrompt, settings};

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keeps_first_and_music_titles() {
        let results = titles(&[
            "Low (David Bowie album)",
            "Low (band)",
            "Low-pass filter",
            "Low Cut Connie (rock band)",
            "Flo Rida singer",
        ]);
        assert_eq!(
            filter_candidates(&results),
            titles(&[
                "Low (David Bowie album)",
                "Low (band)",
                "Low Cut Connie (rock band)",
                "Flo Rida singer",
            ])
        );
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert!(is_music_related("Swans (BAND)"));
        assert!(is_music_related("American Musician"));
        assert!(!is_music_related("Swan"));
    }

    #[test]
    fn ranked_search_with_single_candidate_needs_no_prompt() {
        let wiki = FakeWiki::default()
            .with_search("Swans", &["Swans (band)", "Swan"])
            .with_page("Swans (band)", "");
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &settings());
        let pages: Vec<Page> = find_pages(&wiki, &mut confirmer, "Swans", SearchMode::Ranked).collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Swans (band)");
    }

    #[test]
    fn ranked_search_failure_yields_nothing() {
        let wiki = FakeWiki::default();
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &settings());
        assert!(
            find_pages(&wiki, &mut confirmer, "Nobody", SearchMode::Ranked)
                .next()
                .is_none()
        );
    }

    #[test]
    fn disambiguation_keeps_music_alternatives() {
        let wiki = FakeWiki::default()
            .with_ambiguous(
                "Low",
                &["Low (band)", "Low (David Bowie album)", "Low (rapper)", "Low tide"],
            )
            .with_page("Low (band)", "")
            .with_page("Low (rapper)", "");
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &settings());
        let pages: Vec<Page> =
            find_pages(&wiki, &mut confirmer, "Low", SearchMode::Disambiguate).collect();
        let names: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(names, vec!["Low (band)", "Low (rapper)"]);
    }

    #[test]
    fn pages_are_resolved_on_demand() {
        let wiki = FakeWiki::default()
            .with_search("Low", &["Low (band)", "Low (rapper)", "Low (singer)"])
            .with_page("Low (band)", "")
            .with_page("Low (rapper)", "")
            .with_page("Low (singer)", "");
        let mut s = settings();
        s.force = true;
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &s);

        let mut pages = find_pages(&wiki, &mut confirmer, "Low", SearchMode::Ranked);
        assert_eq!(wiki.resolve_calls.get(), 0);
        assert_eq!(pages.next().map(|p| p.title), Some("Low (band)".to_string()));
        assert_eq!(wiki.resolve_calls.get(), 1);
    }

    #[test]
    fn unresolvable_candidate_is_skipped() {
        let wiki = FakeWiki::default()
            .with_search("Low", &["Low (band)", "Low (rapper)"])
            .with_page("Low (rapper)", "");
        let mut s = settings();
        s.force = true;
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &s);

        let names: Vec<String> = find_pages(&wiki, &mut confirmer, "Low", SearchMode::Ranked)
            .map(|p| p.title)
            .collect();
        assert_eq!(names, vec!["Low (rapper)"]);
    }

    #[test]
    fn direct_resolution_returns_the_page() {
        let wiki = FakeWiki::default().with_page("Swans", "");
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &settings());
        let pages = find_pages(&wiki, &mut confirmer, "Swans", SearchMode::Disambiguate);
        assert_eq!(pages.count(), 1);
    }

    #[test]
    fn unresolvable_name_yields_nothing() {
        let wiki = FakeWiki::default();
        let mut confirmer = Confirmer::new(ScriptedPrompt::silent(), &settings());
        assert!(
            find_pages(&wiki, &mut confirmer, "Nobody", SearchMode::Disambiguate)
                .next()
                .is_none()
        );
    }
}
