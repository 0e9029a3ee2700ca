//! Slug generation for short links.

use rand::{Rng, distr::Alphanumeric};

/// Length of generated slugs.
pub const SLUG_LENGTH: usize = 12;

/// Generates a random slug of [`SLUG_LENGTH`] alphanumeric characters.
///
/// Characters are drawn uniformly from `[a-zA-Z0-9]`, independently per call.
/// Uniqueness is NOT guaranteed here: it is enforced by the unique constraint
/// on `links.slug`, and callers retry with a fresh slug when the insert
/// reports a conflict.
///
/// # Examples
///
/// ```ignore
/// let slug = generate_slug();
/// assert_eq!(slug.len(), 12);
/// assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_slug() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SLUG_LENGTH)
        .map(char::from)
        .collect()
}
