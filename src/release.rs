/// Prefix git puts in front of tag refs.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Trim the raw `GIT_COMMIT_TAGS` value and drop one leading `refs/tags/`.
/// Absent input becomes an empty string.
pub fn normalize_commit_tags(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or("");
    trimmed
        .strip_prefix(TAG_REF_PREFIX)
        .unwrap_or(trimmed)
        .to_string()
}

/// Pick the release identifier.
///
/// Precedence: explicit value, then the first commit tag when it looks like a
/// version (`v...`), then `v{package_version}`, then `unknown`.
pub fn resolve_release_tag(
    explicit: Option<&str>,
    commit_tags: &str,
    package_version: Option<&str>,
) -> String {
    if let Some(t) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return t.to_string();
    }

    if let Some(first) = commit_tags.split_whitespace().next() {
        let first = first.strip_prefix(TAG_REF_PREFIX).unwrap_or(first);
        if first.starts_with('v') {
            return first.to_string();
        }
    }

    match package_version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("v{v}"),
        None => "unknown".to_string(),
    }
}
