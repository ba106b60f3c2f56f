//! The four dashboard filters and the predicates they induce.
//!
//! Each selector has an explicit "inactive" sentinel so the default state
//! filters nothing. The predicates are pure; they borrow the record and the
//! filter state and never mutate either.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{parse_when, Job, Recipe};

/// Sentinel for the project and recipe selectors.
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub selected_project: String,
    pub selected_recipe: String,
    pub start_date: String,
    pub end_date: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self {
            selected_project: ALL.to_string(),
            selected_recipe: ALL.to_string(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    /// Restore every selector to its sentinel in one transition.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn project_active(&self) -> bool {
        self.selected_project != ALL
    }

    pub fn recipe_active(&self) -> bool {
        self.selected_recipe != ALL
    }

    /// A job passes when it matches the recipe selector and its completion
    /// instant falls inside the active date range. A job with no parseable
    /// `completed_at` fails any active date bound; with both bounds inactive
    /// it passes regardless. An inverted range simply matches nothing.
    pub fn job_passes(&self, job: &Job) -> bool {
        if self.recipe_active() && job.recipe_id != self.selected_recipe {
            return false;
        }
        let start = date_bound(&self.start_date);
        let end = date_bound(&self.end_date);
        if start.is_none() && end.is_none() {
            return true;
        }
        let completed = match job.completed_when() {
            Some(when) => when,
            None => return false,
        };
        if let Some(start) = start {
            if completed < start {
                return false;
            }
        }
        if let Some(end) = end {
            if completed > end {
                return false;
            }
        }
        true
    }

    /// A recipe passes when the project selector is inactive or matches its
    /// owning project. Used for the option list and to scope performance.
    pub fn recipe_passes(&self, recipe: &Recipe) -> bool {
        !self.project_active() || recipe.project_id == self.selected_project
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

// An empty bound is inactive; an unparseable one degrades to inactive rather
// than faulting or matching nothing.
fn date_bound(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        None
    } else {
        parse_when(raw)
    }
}
