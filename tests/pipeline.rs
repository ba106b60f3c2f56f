//! End-to-end validation of the load → filter → derive pipeline.
//!
//! These tests drive the whole stack the way the binary does (source →
//! dashboard state → view-model) and pin down the observable properties the
//! presentation layer depends on.

use insight_dash::api::{CollectionSource, FileSource, StaticSource};
use insight_dash::filter::FilterState;
use insight_dash::logging::digest;
use insight_dash::model::{Collections, Connection, Job, Project, Recipe};
use insight_dash::state::DashboardState;
use insight_dash::view;

fn connection(application: &str, status: &str) -> Connection {
    Connection {
        application: application.into(),
        name: format!("{} connector", application),
        authorization_status: status.into(),
    }
}

fn job(status: &str, completed_at: Option<&str>, recipe_id: &str) -> Job {
    Job {
        status: status.into(),
        completed_at: completed_at.map(|s| s.to_string()),
        started_at: "2024-01-01T00:00:00".into(),
        recipe_id: recipe_id.into(),
    }
}

fn recipe(id: &str, project_id: &str, succeeded: &str, failed: &str) -> Recipe {
    Recipe {
        id: id.into(),
        name: format!("Sync pipeline {}", id),
        running: "TRUE".into(),
        job_succeeded_count: succeeded.into(),
        job_failed_count: failed.into(),
        project_id: project_id.into(),
    }
}

fn project(id: &str, name: &str) -> Project {
    Project {
        name: name.into(),
        id: id.into(),
        folder_id: format!("f-{}", id),
    }
}

fn fixture() -> Collections {
    Collections {
        connections: vec![
            connection("CRM", "success"),
            connection("CRM", "error"),
            connection("ERP", ""),
            connection("Billing", "success"),
        ],
        jobs: vec![
            job("succeeded", Some("2024-01-05"), "r1"),
            job("failed", Some("2024-01-05"), "r1"),
            job("succeeded", Some("2024-01-06"), "r2"),
            job("pending", None, "r1"),
            job("succeeded", None, "r3"),
            job("failed", Some("2024-02-01T08:30:00"), "ghost-recipe"),
        ],
        projects: vec![project("p1", "Orders"), project("p2", "Billing")],
        recipes: vec![
            recipe("r1", "p1", "10", "2"),
            recipe("r2", "p1", "7", "0"),
            recipe("r3", "p2", "broken", ""),
        ],
    }
}

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(fut)
}

// ---------------------------------------------------------------------------
// P01: Job totals account for every filtered job; terminal statuses never
// exceed the total.
// ---------------------------------------------------------------------------
#[test]
fn p01_job_totals_consistent_under_every_filter() {
    let data = fixture();
    let filter_cases = [
        FilterState::new(),
        FilterState {
            selected_recipe: "r1".into(),
            ..FilterState::new()
        },
        FilterState {
            start_date: "2024-01-05".into(),
            end_date: "2024-01-06".into(),
            ..FilterState::new()
        },
        FilterState {
            selected_project: "p2".into(),
            selected_recipe: "r1".into(),
            start_date: "2024-01-01".into(),
            ..FilterState::new()
        },
    ];
    for filters in filter_cases {
        let vm = view::build(&data, &filters);
        let expected = data.jobs.iter().filter(|j| filters.job_passes(j)).count();
        assert_eq!(vm.job_stats.total, expected);
        assert!(vm.job_stats.succeeded + vm.job_stats.failed <= vm.job_stats.total);
    }
}

// ---------------------------------------------------------------------------
// P02: reset() is idempotent and restores every sentinel.
// ---------------------------------------------------------------------------
#[test]
fn p02_reset_idempotent() {
    let mut dash = DashboardState::new();
    dash.finish_load(fixture());
    dash.set_project("p1");
    dash.set_recipe("r1");
    dash.set_start_date("2024-01-01");
    dash.set_end_date("2024-02-01");

    dash.reset_filters();
    let after_once = dash.filters().clone();
    dash.reset_filters();
    assert_eq!(dash.filters(), &after_once);
    assert_eq!(after_once, FilterState::new());
    assert_eq!(after_once.selected_project, "all");
    assert_eq!(after_once.selected_recipe, "all");
    assert_eq!(after_once.start_date, "");
    assert_eq!(after_once.end_date, "");
}

// ---------------------------------------------------------------------------
// P03: derivation is pure — identical inputs give byte-identical output,
// array order included.
// ---------------------------------------------------------------------------
#[test]
fn p03_builder_is_pure() {
    let data = fixture();
    let mut filters = FilterState::new();
    filters.selected_project = "p1".into();
    filters.start_date = "2024-01-01".into();

    let first = view::build(&data, &filters);
    let second = view::build(&data, &filters);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(digest(&first), digest(&second));
}

// ---------------------------------------------------------------------------
// P04: output caps hold for any input size.
// ---------------------------------------------------------------------------
#[test]
fn p04_output_caps() {
    let mut data = Collections::default();
    for i in 0..40 {
        data.recipes.push(recipe(&format!("r{}", i), "p1", "1", "1"));
        data.projects.push(project(&format!("p{}", i), "bulk"));
        data.jobs.push(job(
            "succeeded",
            Some(&format!("2024-03-{:02}", (i % 28) + 1)),
            "r1",
        ));
    }
    let vm = view::build(&data, &FilterState::new());
    assert!(vm.recipe_stats.len() <= 5);
    assert!(vm.daily_job_data.len() <= 7);
    assert!(vm.recent_projects.len() <= 8);
}

// ---------------------------------------------------------------------------
// P05: a job without completed_at stays in the stats (no date filter) but
// never reaches the daily series.
// ---------------------------------------------------------------------------
#[test]
fn p05_incomplete_job_in_stats_not_series() {
    let data = Collections {
        jobs: vec![job("succeeded", None, "r1")],
        ..Default::default()
    };
    let mut filters = FilterState::new();
    filters.selected_recipe = "r1".into();
    let vm = view::build(&data, &filters);
    assert_eq!(vm.job_stats.total, 1);
    assert_eq!(vm.job_stats.succeeded, 1);
    assert!(vm.daily_job_data.is_empty());
}

// ---------------------------------------------------------------------------
// P06: worked example — connection stats and application breakdown.
// ---------------------------------------------------------------------------
#[test]
fn p06_connection_example() {
    let data = Collections {
        connections: vec![
            connection("CRM", "success"),
            connection("CRM", "error"),
            connection("ERP", ""),
        ],
        ..Default::default()
    };
    let vm = view::build(&data, &FilterState::new());
    assert_eq!(vm.connection_stats.total, 3);
    assert_eq!(vm.connection_stats.active, 1);
    assert_eq!(vm.connection_stats.failed, 1);
    assert_eq!(vm.app_data.len(), 2);
    assert_eq!(vm.app_data[0].name, "CRM");
    assert_eq!(vm.app_data[0].value, 2);
    assert_eq!(vm.app_data[1].name, "ERP");
    assert_eq!(vm.app_data[1].value, 1);
}

// ---------------------------------------------------------------------------
// P07: worked example — project filter scopes the recipe set.
// ---------------------------------------------------------------------------
#[test]
fn p07_recipe_project_scoping() {
    let data = fixture();
    let mut filters = FilterState::new();
    filters.selected_project = "p1".into();
    let vm = view::build(&data, &filters);
    let ids: Vec<&str> = vm.recipes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2"]);
    assert!(vm.recipe_stats.iter().all(|r| !r.name.is_empty()));
}

// ---------------------------------------------------------------------------
// P08: worked example — one day, one succeeded, one failed.
// ---------------------------------------------------------------------------
#[test]
fn p08_daily_series_example() {
    let data = Collections {
        jobs: vec![
            job("succeeded", Some("2024-01-05"), "r1"),
            job("failed", Some("2024-01-05"), "r1"),
        ],
        ..Default::default()
    };
    let vm = view::build(&data, &FilterState::new());
    assert_eq!(vm.daily_job_data.len(), 1);
    assert_eq!(vm.daily_job_data[0].date, "Jan 5");
    assert_eq!(vm.daily_job_data[0].succeeded, 1);
    assert_eq!(vm.daily_job_data[0].failed, 1);
}

// ---------------------------------------------------------------------------
// P09: inverted date range degrades to an empty job set, never a fault.
// ---------------------------------------------------------------------------
#[test]
fn p09_inverted_range_empty() {
    let mut dash = DashboardState::new();
    dash.finish_load(fixture());
    dash.set_start_date("2024-02-01");
    dash.set_end_date("2024-01-01");
    assert_eq!(dash.view().job_stats.total, 0);
    assert!(dash.view().daily_job_data.is_empty());
}

// ---------------------------------------------------------------------------
// P10: loading flag transitions true → false exactly once, on success and
// failure (empty batch) alike.
// ---------------------------------------------------------------------------
#[test]
fn p10_loading_flag_lifecycle() {
    let mut dash = DashboardState::new();
    assert!(dash.loading());
    dash.finish_load(fixture());
    assert!(!dash.loading());

    let mut failed = DashboardState::new();
    assert!(failed.loading());
    failed.finish_load(Collections::default());
    assert!(!failed.loading());
    assert_eq!(failed.view().connection_stats.total, 0);
}

// ---------------------------------------------------------------------------
// P11: dangling foreign keys yield empty matches, not errors.
// ---------------------------------------------------------------------------
#[test]
fn p11_dangling_keys_harmless() {
    let mut dash = DashboardState::new();
    dash.finish_load(fixture());

    dash.set_recipe("ghost-recipe");
    // One job references the missing recipe; it still filters cleanly.
    assert_eq!(dash.view().job_stats.total, 1);
    assert_eq!(dash.view().job_stats.failed, 1);

    dash.reset_filters();
    dash.set_project("no-such-project");
    assert!(dash.view().recipes.is_empty());
    assert!(dash.view().recipe_stats.is_empty());
}

// ---------------------------------------------------------------------------
// P12: full pipeline through a source, as the binary runs it.
// ---------------------------------------------------------------------------
#[test]
fn p12_static_source_end_to_end() {
    let source = StaticSource::new(fixture());
    let data = block_on(source.fetch_all());

    let mut dash = DashboardState::new();
    dash.finish_load(data);
    dash.set_project("p1");
    dash.set_recipe("r1");

    let vm = dash.view();
    assert_eq!(vm.job_stats.total, 3);
    assert_eq!(vm.job_stats.succeeded, 1);
    assert_eq!(vm.job_stats.failed, 1);
    assert_eq!(vm.recipes.len(), 2);
    // Unfiltered option list and breakdown survive the filters.
    assert_eq!(vm.projects.len(), 2);
    assert_eq!(vm.app_data.len(), 3);
}

// ---------------------------------------------------------------------------
// P13: file source feeds the same pipeline from JSON on disk.
// ---------------------------------------------------------------------------
#[test]
fn p13_file_source_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = fixture();
    let dump = |name: &str, body: String| {
        std::fs::write(dir.path().join(format!("{}.json", name)), body).unwrap();
    };
    dump("projects", serde_json::to_string(&data.projects).unwrap());
    dump(
        "connections",
        serde_json::to_string(&data.connections).unwrap(),
    );
    dump("jobs", serde_json::to_string(&data.jobs).unwrap());
    dump("recipes", serde_json::to_string(&data.recipes).unwrap());

    let source = FileSource::new(&dir.path().to_string_lossy());
    let loaded = block_on(source.fetch_all());
    assert_eq!(loaded, data);

    let mut dash = DashboardState::new();
    dash.finish_load(loaded);
    assert_eq!(
        serde_json::to_string(dash.view()).unwrap(),
        serde_json::to_string(&view::build(&data, &FilterState::new())).unwrap()
    );
}
