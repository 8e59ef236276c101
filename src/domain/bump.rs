use std::sync::LazyLock;

use regex::Regex;

/// Matches the first version identifier of a manifest.
///
/// Supports the JSON form (`"version": "1.2.3"`, package.json, composer.json, ...)
/// and the TOML form at the start of a line (`version = "1.2.3"`, Cargo.toml,
/// pyproject.toml, ...).
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)("version"\s*:\s*"|^[ \t]*version\s*=\s*")([^"\n]*)(")"#)
        .expect("version identifier regex is valid")
});

/// Replaces the first version identifier in `contents` with `new_version`.
///
/// Formatting around the value is kept untouched.
///
/// # Returns
/// * `Some(String)` - Updated contents
/// * `None` - If no version identifier is present
pub fn replace_version(contents: &str, new_version: &str) -> Option<String> {
    let captures = VERSION_RE.captures(contents)?;
    let value = captures.get(2)?;

    let mut updated = String::with_capacity(contents.len() + new_version.len());
    updated.push_str(&contents[..value.start()]);
    updated.push_str(new_version);
    updated.push_str(&contents[value.end()..]);
    Some(updated)
}
