//! View-model derivation.
//!
//! `build` is a pure function of the raw collections and the filter state.
//! It is re-run in full on every state change; there is no incremental or
//! memoized path. Malformed input degrades to zeros and empties, never a
//! fault.

use serde::Serialize;

use crate::filter::FilterState;
use crate::model::{day_label, parse_count, Collections, Job, Project, Recipe};

/// Positional cap on the recipe performance chart.
const TOP_RECIPES: usize = 5;
/// Trailing groups kept in the daily series.
const SERIES_DAYS: usize = 7;
/// Rows shown in the recent-projects table.
const RECENT_PROJECTS: usize = 8;
/// Characters of a recipe name kept before the ellipsis marker.
const RECIPE_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStats {
    pub total: usize,
    pub active: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecipeTotals {
    pub total: usize,
    pub running: usize,
}

/// One slice of the connections-by-application breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSlice {
    pub name: String,
    pub value: u64,
}

/// One bar pair of the recipe performance chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipePerf {
    pub name: String,
    pub succeeded: u64,
    pub failed: u64,
}

/// One bucket of the daily succeeded/failed series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub succeeded: u64,
    pub failed: u64,
}

/// Everything the presentation layer needs, fully derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub connection_stats: ConnectionStats,
    pub job_stats: JobStats,
    pub project_stats: ProjectStats,
    pub recipe_totals: RecipeTotals,
    pub app_data: Vec<AppSlice>,
    pub recipe_stats: Vec<RecipePerf>,
    pub daily_job_data: Vec<DailyPoint>,
    /// First rows of the project table, collection order.
    pub recent_projects: Vec<Project>,
    /// Unfiltered, for the project option list.
    pub projects: Vec<Project>,
    /// Project-scoped, for the recipe option list.
    pub recipes: Vec<Recipe>,
}

pub fn build(data: &Collections, filters: &FilterState) -> ViewModel {
    let filtered_jobs: Vec<&Job> = data
        .jobs
        .iter()
        .filter(|job| filters.job_passes(job))
        .collect();
    let scoped_recipes: Vec<Recipe> = data
        .recipes
        .iter()
        .filter(|recipe| filters.recipe_passes(recipe))
        .cloned()
        .collect();

    let connection_stats = ConnectionStats {
        total: data.connections.len(),
        active: data.connections.iter().filter(|c| c.is_active()).count(),
        failed: data.connections.iter().filter(|c| c.is_failed()).count(),
    };

    let job_stats = JobStats {
        total: filtered_jobs.len(),
        succeeded: filtered_jobs
            .iter()
            .filter(|j| j.status == "succeeded")
            .count(),
        failed: filtered_jobs.iter().filter(|j| j.status == "failed").count(),
    };

    let project_stats = ProjectStats {
        total: data.projects.len(),
    };

    let recipe_totals = RecipeTotals {
        total: data.recipes.len(),
        running: data.recipes.iter().filter(|r| r.is_running()).count(),
    };

    ViewModel {
        connection_stats,
        job_stats,
        project_stats,
        recipe_totals,
        app_data: group_by_application(data),
        recipe_stats: top_recipe_performance(&scoped_recipes),
        daily_job_data: daily_series(&filtered_jobs),
        recent_projects: data.projects.iter().take(RECENT_PROJECTS).cloned().collect(),
        projects: data.projects.clone(),
        recipes: scoped_recipes,
    }
}

// Deliberately ignores every UI filter: the application breakdown always
// covers the full connection collection. Slice order is first-seen.
fn group_by_application(data: &Collections) -> Vec<AppSlice> {
    let mut slices: Vec<AppSlice> = Vec::new();
    for conn in &data.connections {
        match slices.iter_mut().find(|s| s.name == conn.application) {
            Some(slice) => slice.value += 1,
            None => slices.push(AppSlice {
                name: conn.application.clone(),
                value: 1,
            }),
        }
    }
    slices
}

// First five in collection order, no ranking. The ellipsis marker is
// appended whether or not the name was actually clipped.
fn top_recipe_performance(recipes: &[Recipe]) -> Vec<RecipePerf> {
    recipes
        .iter()
        .take(TOP_RECIPES)
        .map(|r| RecipePerf {
            name: clipped_name(&r.name),
            succeeded: parse_count(&r.job_succeeded_count),
            failed: parse_count(&r.job_failed_count),
        })
        .collect()
}

fn clipped_name(name: &str) -> String {
    let mut short: String = name.chars().take(RECIPE_NAME_CHARS).collect();
    short.push_str("...");
    short
}

// Buckets appear in first-occurrence order of the scan, not calendar order,
// and the series keeps the trailing seven buckets of that order. Jobs with
// no parseable completion instant are skipped; statuses other than
// succeeded/failed hit neither counter.
fn daily_series(jobs: &[&Job]) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = Vec::new();
    for job in jobs {
        let completed = match job.completed_when() {
            Some(when) => when,
            None => continue,
        };
        let label = day_label(&completed);
        let idx = match points.iter().position(|p| p.date == label) {
            Some(idx) => idx,
            None => {
                points.push(DailyPoint {
                    date: label,
                    succeeded: 0,
                    failed: 0,
                });
                points.len() - 1
            }
        };
        match job.status.as_str() {
            "succeeded" => points[idx].succeeded += 1,
            "failed" => points[idx].failed += 1,
            _ => {}
        }
    }
    if points.len() > SERIES_DAYS {
        points.drain(..points.len() - SERIES_DAYS);
    }
    points
}
