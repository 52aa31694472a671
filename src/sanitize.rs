//! Turn arbitrary display text into a safe file name.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a sanitized name, not counting the file extension.
pub const MAX_NAME_LENGTH: usize = 115;

static RE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[|:]\s*").expect("Failed to compile separator regex"));

static RE_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Failed to compile reserved characters regex"));

static RE_NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E]").expect("Failed to compile non-printable regex"));

/// Sanitize text for use as a file name.
///
/// Accents are decomposed and dropped, separators like `:` become `" - "`,
/// characters reserved on common filesystems are removed and the result is
/// limited to [`MAX_NAME_LENGTH`] characters without trailing dots or whitespace.
///
/// ```rust
/// use episode_align::sanitize::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Foo: Bar/Baz?"), "Foo - Bar-Baz");
/// assert_eq!(sanitize_filename("Café…"), "Cafe");
/// ```
#[must_use]
pub fn sanitize_filename(text: &str) -> String {
    let decomposed: String = text.nfd().collect();
    let apostrophes = decomposed.replace(['\u{2018}', '\u{2019}', '`'], "'");
    let separated = RE_SEPARATOR.replace_all(&apostrophes, " - ");
    let dashed = separated.replace('\u{2013}', "-").replace('/', "-");
    let stripped = RE_RESERVED.replace_all(&dashed, "");
    let printable = RE_NON_PRINTABLE.replace_all(&stripped, "");

    // Only printable ASCII is left, so byte length equals character count.
    let truncated = if printable.len() > MAX_NAME_LENGTH {
        &printable[..MAX_NAME_LENGTH]
    } else {
        &printable[..]
    };

    truncated
        .trim_end_matches(|c: char| c.is_whitespace() || c == '.')
        .trim_start()
        .to_string()
}
