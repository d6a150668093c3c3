//! Query and field text canonicalization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase, strip diacritics and trim.
///
/// Text is decomposed (NFD), combining marks are dropped, and the remainder
/// is lowercased. Lowercasing can itself produce decomposable characters
/// (e.g. `İ` → `i̇`), so the fold runs a second decomposition pass to stay
/// idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered: String = strip_marks(text).flat_map(char::to_lowercase).collect();
    strip_marks(&lowered).collect::<String>().trim().to_string()
}

fn strip_marks(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().filter(|c| !is_combining_mark(*c))
}
