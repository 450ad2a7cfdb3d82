//! Slug shape rules shared by posts, categories and tags.

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex pattern"));

/// Lowercase ASCII alphanumeric runs joined by single hyphens.
pub fn is_valid_slug(candidate: &str) -> bool {
    SLUG_PATTERN.is_match(candidate)
}
