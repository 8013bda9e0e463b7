// Slug derivation for the `file_name:` part of an uploaded image record.

use std::path::Path;

use deunicode::deunicode;

/// Used when a file name has nothing left after slugifying.
pub const FALLBACK_SLUG: &str = "image";

/// Slug of a file's base name, extension stripped.
///
/// `"/tmp/My Photo #1.PNG"` becomes `"my-photo-1"`.
pub fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let slug = slugify(&stem);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Lower-case ASCII slug: letters and digits kept, every other run of
/// characters collapsed into a single `-`, no leading or trailing `-`.
/// Non-ASCII text is transliterated first, so `"Œuvre"` keeps its `oe`
/// and CJK characters still separate the digits around them.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
