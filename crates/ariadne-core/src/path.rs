//! Path helpers for CMS object paths.
//!
//! Ariadne addresses every object by an absolute, slash-separated path
//! that always begins and ends with `/` (a file `a.txt` in `/docs/` lives
//! at `/docs/a.txt/`). The adapter works with paths relative to its root
//! and converts them with [`join`] before every CMS call.

/// Normalizes an absolute CMS path.
///
/// Repeated slashes collapse, `.` segments are dropped and `..` removes
/// the previous segment without climbing above `/`. The result always
/// starts and ends with `/`.
///
/// # Examples
///
/// ```
/// use ariadne_core::path::make_path;
///
/// assert_eq!(make_path("/sites//demo/./docs/../files"), "/sites/demo/files/");
/// assert_eq!(make_path(""), "/");
/// ```
pub fn make_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len() + 2);
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    out.push('/');
    out
}

/// Joins a relative path onto a root path.
///
/// The relative part is normalized on its own first, so `..` never leaves
/// the root.
pub fn join(root: &str, relative: &str) -> String {
    let root = make_path(root);
    let relative = make_path(relative);
    format!("{}{}", root, &relative[1..])
}

/// Returns the non-empty segments of a path, in order.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Returns the last segment of a path, ignoring trailing slashes.
///
/// The root (or an empty path) has an empty basename.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Returns everything before the last segment of a path.
///
/// `dirname("docs/a.txt")` is `"docs"`, `dirname("a.txt")` is `""`
/// (the root).
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..idx].trim_end_matches('/'),
        None => "",
    }
}

/// Strips the root prefix from an absolute path.
///
/// Paths outside the root are returned unchanged.
pub fn strip_root<'a>(root: &str, absolute: &'a str) -> &'a str {
    absolute.strip_prefix(root).unwrap_or(absolute)
}
