//! Text normalization shared by filtering and day-name lookup.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds `text` into an accent-insensitive comparison key.
///
/// The text is decomposed (NFD) and every combining mark is dropped, so
/// `"Előadás"` becomes `"Eloadas"`. Case is preserved; callers compare
/// case-insensitively themselves.
pub fn fold(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Trims `text` and collapses every internal whitespace run to one space.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
