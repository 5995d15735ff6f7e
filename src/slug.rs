// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Filename-safe rendering of branch names.
//!
//! Slugs produced by this module contain only lowercase ASCII alphanumeric
//! characters separated by single hyphens, so a `{branch}` placeholder can
//! never introduce path separators into an artifact name.

/// Fallback used when a branch name has no slug-worthy characters.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Builds a slug from a branch name.
///
/// Returns `None` when nothing remains after normalization.
///
/// # Examples
///
/// ```
/// use covbadge::slugify;
///
/// assert_eq!(slugify(" Feature/Login_v2 ").as_deref(), Some("feature-login-v2"));
/// assert_eq!(slugify("///"), None);
/// ```
pub fn slugify(source: &str) -> Option<String> {
    let trimmed = source.trim();
    let mut slug = String::with_capacity(trimmed.len());
    let mut previous_hyphen = false;

    for candidate in trimmed.chars() {
        if candidate.is_ascii_alphanumeric() {
            slug.push(candidate.to_ascii_lowercase());
            previous_hyphen = false;
        } else if !previous_hyphen && !slug.is_empty() {
            slug.push('-');
            previous_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() { None } else { Some(slug) }
}

/// Slug of a branch name, or [`UNKNOWN_BRANCH`] when none can be derived.
pub fn branch_slug(branch: &str) -> String {
    slugify(branch).unwrap_or_else(|| UNKNOWN_BRANCH.to_owned())
}
