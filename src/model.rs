//! Entity types for the four backend collections, plus the lenient parsing
//! helpers the aggregations rely on.
//!
//! Every field deserializes with a default so a sparse or malformed record
//! never aborts a whole collection. Foreign keys are plain strings and may
//! dangle; nothing here enforces referential integrity.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A link between the platform and an external application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub authorization_status: String,
}

impl Connection {
    /// `"success"` means authorized. Anything else non-empty is a failure;
    /// an empty status is neither.
    pub fn is_active(&self) -> bool {
        self.authorization_status == "success"
    }

    pub fn is_failed(&self) -> bool {
        !self.authorization_status.is_empty() && !self.is_active()
    }
}

/// One execution of a recipe. `completed_at` is absent while in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub recipe_id: String,
}

impl Job {
    /// Completion instant, if present and parseable. Garbage timestamps are
    /// treated the same as absent ones.
    pub fn completed_when(&self) -> Option<NaiveDateTime> {
        self.completed_at.as_deref().and_then(parse_when)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub folder_id: String,
}

/// A configured workflow. The succeeded/failed counters are pre-aggregated
/// by the backend and arrive as strings, independent of the job collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub running: String,
    #[serde(default)]
    pub job_succeeded_count: String,
    #[serde(default)]
    pub job_failed_count: String,
    #[serde(default)]
    pub project_id: String,
}

impl Recipe {
    pub fn is_running(&self) -> bool {
        self.running == "TRUE"
    }
}

/// The four raw collections, exactly as the loader installed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

/// Parse an ISO-ish timestamp. Accepts RFC3339, a naive datetime with either
/// `T` or space separator, or a bare date (midnight). Anything else is None.
pub fn parse_when(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Short month/day label used to bucket the daily series, e.g. "Jan 5".
pub fn day_label(when: &NaiveDateTime) -> String {
    when.format("%b %-d").to_string()
}

/// Backend counters are strings; anything non-numeric collapses to zero.
pub fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}
