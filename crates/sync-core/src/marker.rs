//! Managed-region markers inside issue descriptions.
//!
//! A description can carry at most one region delimited by the marker
//! sentinels. The region belongs to the sync; everything before the
//! start marker belongs to whoever edited the issue remotely and must
//! survive every rewrite verbatim.
//!
//! The sentinels are deployed literals. Changing them orphans the
//! regions already embedded in remote descriptions, so they stay fixed.

/// Start sentinel for the synced region of a description.
pub const MARKER_START: &str = "<!-- obsidian-sync-start -->";

/// End sentinel for the synced region of a description.
pub const MARKER_END: &str = "<!-- obsidian-sync-end -->";

/// True if both marker sentinels appear in the text. Ordering is
/// validated by `extract_managed`, not here.
pub fn has_managed_region(text: &str) -> bool {
    text.contains(MARKER_START) && text.contains(MARKER_END)
}

/// Content outside the managed region: the trimmed text before the
/// start marker, or the whole trimmed text when no marker is present.
pub fn extract_foreign(description: Option<&str>) -> String {
    let Some(text) = description else {
        return String::new();
    };

    match text.find(MARKER_START) {
        Some(start) => text[..start].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Content strictly between the first start marker and the first end
/// marker. Markers that are absent or out of order yield an empty
/// string; the text then counts as entirely foreign.
pub fn extract_managed(description: Option<&str>) -> String {
    let Some(text) = description else {
        return String::new();
    };

    let (Some(start), Some(end)) = (text.find(MARKER_START), text.find(MARKER_END)) else {
        return String::new();
    };

    if start >= end {
        return String::new();
    }

    text[start + MARKER_START.len()..end].trim().to_string()
}

/// Combine foreign content with a freshly wrapped managed region.
///
/// Every new description goes through here, so foreign content can
/// never be dropped and the region is always well formed afterwards.
pub fn build_description(foreign: &str, managed: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if !foreign.is_empty() {
        parts.push(foreign);
        parts.push("");
    }

    parts.push(MARKER_START);
    parts.push(managed);
    parts.push(MARKER_END);

    parts.join("\n")
}
