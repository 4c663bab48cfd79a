//! URL slugs for catalog entries.

/// Lowercase `text` and join its alphanumeric runs with single hyphens.
///
/// ```
/// use nest_commerce::catalog::slugify;
/// assert_eq!(slugify("The Rust Programming Language!"), "the-rust-programming-language");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a slug from `text` that `taken` reports as free, appending
/// `-1`, `-2`, ... on collision.
pub fn unique_slug<E>(
    text: &str,
    mut taken: impl FnMut(&str) -> Result<bool, E>,
) -> Result<String, E> {
    let base = match slugify(text) {
        s if s.is_empty() => "item".to_string(),
        s => s,
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    while taken(&candidate)? {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
    Ok(candidate)
}
