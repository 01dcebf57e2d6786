use chrono::{DateTime, SecondsFormat, Utc};

/// Placeholder for absent free text
pub const NO_DESCRIPTION: &str = "—";

/// Collapse a possibly multi-line description onto one line
pub fn flatten_description(description: &str) -> String {
    description.trim().replace(['\r', '\n'], " ")
}

/// Format a timestamp the way the GitHub API does (`2025-09-01T08:00:00Z`)
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
