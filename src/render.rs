//! Terminal presentation of the view-model. Pure consumer: it reads the
//! derived structure and produces text, nothing more.

use std::fmt::Write;

use anyhow::Result;

use crate::view::ViewModel;

/// Render the dashboard as plain text, section per card/chart.
pub fn dashboard_text(vm: &ViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Connections ===");
    let _ = writeln!(
        out,
        "total {}  active {}  failed {}",
        vm.connection_stats.total, vm.connection_stats.active, vm.connection_stats.failed
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Jobs ===");
    let _ = writeln!(
        out,
        "total {}  succeeded {}  failed {}",
        vm.job_stats.total, vm.job_stats.succeeded, vm.job_stats.failed
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Projects ===");
    let _ = writeln!(out, "total {}", vm.project_stats.total);

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Recipes ===");
    let _ = writeln!(
        out,
        "total {}  running {}",
        vm.recipe_totals.total, vm.recipe_totals.running
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Connections by Application ===");
    for slice in &vm.app_data {
        let _ = writeln!(out, "{:<24} {}", slice.name, slice.value);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Top 5 Recipes ===");
    for perf in &vm.recipe_stats {
        let _ = writeln!(
            out,
            "{:<24} succeeded {:<6} failed {}",
            perf.name, perf.succeeded, perf.failed
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Daily Jobs ===");
    for point in &vm.daily_job_data {
        let _ = writeln!(
            out,
            "{:<8} succeeded {:<6} failed {}",
            point.date, point.succeeded, point.failed
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Recent Projects ===");
    for project in &vm.recent_projects {
        let _ = writeln!(
            out,
            "{:<32} {:<16} {}",
            project.name, project.id, project.folder_id
        );
    }

    out
}

/// The view-model as pretty JSON, for piping into other tools.
pub fn to_json(vm: &ViewModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(vm)?)
}
