use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form used to key persons and stored roles.
///
/// Strips diacritics (tonos, dialytika), upper-cases, and collapses whitespace, so
/// "Ιωάννης  Παπαδόπουλος" and "ΙΩΑΝΝΗΣ ΠΑΠΑΔΟΠΟΥΛΟΣ" share one key.
pub fn normalize_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
