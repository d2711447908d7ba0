//! Page and label naming.
//!
//! Every project gets a stable, human-readable directory name built from its
//! 1-based display position and a slug of its title:
//!
//! - position 0, `"Atlas"` → `01-atlas`
//! - position 11, `"Poster: Berlin 2019"` → `12-poster-berlin-2019`
//!
//! Positions are zero-padded to two digits, matching the row numbers shown
//! in the Index view.

const MAX_SLUG_LEN: usize = 80;

/// Zero-padded, 1-based label for display position `position`.
///
/// `0` → `"01"`, `9` → `"10"`, `99` → `"100"`.
pub fn row_number_label(position: usize) -> String {
    format!("{:02}", position + 1)
}

/// Sanitize a title string for use in URLs and filenames.
///
/// - Lowercases ASCII letters
/// - Replaces non-alphanumeric characters (except dashes) with dashes
/// - Collapses consecutive dashes into one
/// - Strips leading and trailing dashes
/// - Truncates to `MAX_SLUG_LEN` characters (breaks at last dash before limit)
pub fn sanitize_slug(title: &str) -> String {
    let mut collapsed = String::with_capacity(title.len());
    let mut prev_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            collapsed.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            collapsed.push('-');
            prev_dash = true;
        }
    }

    let trimmed = collapsed.trim_matches('-');

    // Truncate at word boundary (last dash before limit)
    if trimmed.len() <= MAX_SLUG_LEN {
        trimmed.to_string()
    } else {
        let truncated = &trimmed[..MAX_SLUG_LEN];
        match truncated.rfind('-') {
            Some(pos) => truncated[..pos].to_string(),
            None => truncated.to_string(),
        }
    }
}

/// Directory name for the project at display position `position`.
///
/// Titles without any usable characters fall back to the number alone.
pub fn project_dir_name(position: usize, title: &str) -> String {
    let slug = sanitize_slug(title);
    if slug.is_empty() {
        row_number_label(position)
    } else {
        format!("{}-{}", row_number_label(position), slug)
    }
}
