use log::warn;

use crate::settings::MAX_GENRE_CHARS;

const SECTION_MARKER: &str = "Genres";
const SECTION_END: &str = "<th";
const LABEL_START: &str = "\">";

/// Pull genre labels out of a rendered infobox.
///
/// The labels sit between the first `Genres` and the next `<th` (or a second
/// `Genres`, whichever comes first), each one following a `">` and running up
/// to the next `<`.
pub fn filter_genres(html: &str) -> Vec<String> {
    let Some((_, after_marker)) = html.split_once(SECTION_MARKER) else {
        warn!("No genre found on page.");
        return Vec::new();
    };
    let after_marker = after_marker
        .split_once(SECTION_MARKER)
        .map_or(after_marker, |(section, _)| section);
    let section = after_marker
        .split_once(SECTION_END)
        .map_or(after_marker, |(section, _)| section);

    let mut genres = Vec::<String>::new();
    let mut rest = section;
    while let Some((_, tail)) = rest.split_once(LABEL_START) {
        let label = tail.split('<').next().unwrap_or_default().trim();
        if !label.is_empty() && !genres.iter().any(|g| g == label) {
            genres.push(label.to_string());
        }
        rest = tail;
    }
    genres
}

/// Join labels with `;`, clipped to the tag length limit.
pub fn join_genres(genres: &[String]) -> String {
    genres.join(";").chars().take(MAX_GENRE_CHARS).collect()
}
