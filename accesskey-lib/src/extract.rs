//! Candidate access keys from a title image.
//!
//! Access keys are 8 lowercase hex digits, stored either as UTF-16LE or as a
//! plain NUL-prefixed ASCII string. UTF-16 hits are ranked first; in practice
//! the right key is usually among the earliest candidates.

use regex::bytes::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::constants::ACCESS_KEY_LEN;
use crate::error::KeyError;

static UTF16_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?-u)\x00(?:[a-f0-9]\x00){{{ACCESS_KEY_LEN}}}")).expect("UTF-16 key pattern must compile")
});

static ASCII_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?-u)\x00[a-f0-9]{{{ACCESS_KEY_LEN}}}")).expect("ASCII key pattern must compile")
});

/// Scan `image` for candidate keys, UTF-16 matches first, duplicates removed.
pub fn extract_candidates(image: &[u8]) -> Vec<String> {
    let utf16: Vec<String> = UTF16_KEY.find_iter(image).map(|m| strip_nuls(m.as_bytes())).collect();
    let ascii: Vec<String> = ASCII_KEY.find_iter(image).map(|m| strip_nuls(m.as_bytes())).collect();
    debug!(utf16 = utf16.len(), ascii = ascii.len(), "Pattern matches in image");

    let candidates = dedup_preserving_order(utf16.into_iter().chain(ascii));
    debug!(unique = candidates.len(), "Candidate access keys");
    candidates
}

/// Read a title image from disk and extract its candidate keys.
pub fn extract_candidates_from_file(path: impl AsRef<Path>) -> Result<Vec<String>, KeyError> {
    let image = std::fs::read(path.as_ref())?;
    debug!(path = ?path.as_ref(), size = image.len(), "Read title image");
    Ok(extract_candidates(&image))
}

/// Drop repeated keys, keeping each one at its first position.
pub fn dedup_preserving_order<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    keys.into_iter().filter(|key| seen.insert(key.clone())).collect()
}

// Matches are pure ASCII once the NULs are gone
fn strip_nuls(bytes: &[u8]) -> String {
    bytes.iter().filter(|&&b| b != 0).map(|&b| char::from(b)).collect()
}
