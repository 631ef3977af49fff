//! Identity Manager
//!
//! Derives slugs from display names and resolves collisions within a scope.
//! `unique_in` is a pure function of the scope it is given; two callers racing
//! on the same collection are kept apart by the collection lock, so the second
//! one always sees the first one's insert.

use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, folds accented Latin letters to their base letter, collapses every
/// run of other characters into one hyphen and trims hyphens from both ends.
/// `slugify(slugify(x)) == slugify(x)` for every input.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Return `candidate` if unused in `scope`, else the first free `candidate-N`, N >= 1.
pub fn unique_in<'a, I>(scope: I, candidate: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = scope.into_iter().collect();
    if !taken.contains(candidate) {
        return candidate.to_string();
    }

    (1u64..)
        .map(|n| format!("{}-{}", candidate, n))
        .find(|probe| !taken.contains(probe.as_str()))
        .unwrap_or_else(|| candidate.to_string())
}

/// Whether `identity` is a usable asset-naming identity: non-empty and a single
/// path segment.
pub fn is_path_safe(identity: &str) -> bool {
    !identity.is_empty()
        && identity != "."
        && identity != ".."
        && !identity.contains(['/', '\\', '\0'])
}
