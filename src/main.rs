use anyhow::Result;

use insight_dash::api::SourceKind;
use insight_dash::logging::{digest, log, obj, v_num, v_str, Domain, Level};
use insight_dash::render;
use insight_dash::state::{Config, DashboardState};

struct CliArgs {
    project: Option<String>,
    recipe: Option<String>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs {
        project: None,
        recipe: None,
        from: None,
        to: None,
        json: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--project" => args.project = iter.next(),
            "--recipe" => args.recipe = iter.next(),
            "--from" => args.from = iter.next(),
            "--to" => args.to = iter.next(),
            "--json" => args.json = true,
            other => {
                eprintln!("unknown argument: {}", other);
                eprintln!(
                    "usage: insight-dash [--project ID] [--recipe ID] [--from DATE] [--to DATE] [--json]"
                );
                std::process::exit(2);
            }
        }
    }
    args
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let args = parse_args();
    let kind = SourceKind::from_env();
    let source = kind.build(&cfg)?;

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("source", v_str(&format!("{:?}", kind).to_lowercase())),
            ("api_base", v_str(&cfg.api_base)),
        ]),
    );

    let mut dash = DashboardState::new();

    log(
        Level::Info,
        Domain::Loader,
        "fetch_start",
        obj(&[("loading", v_str("true"))]),
    );
    let data = source.fetch_all().await;
    log(
        Level::Info,
        Domain::Loader,
        "fetch_settled",
        obj(&[
            ("projects", v_num(data.projects.len() as u64)),
            ("connections", v_num(data.connections.len() as u64)),
            ("jobs", v_num(data.jobs.len() as u64)),
            ("recipes", v_num(data.recipes.len() as u64)),
        ]),
    );
    dash.finish_load(data);

    if let Some(project) = &args.project {
        dash.set_project(project);
    }
    if let Some(recipe) = &args.recipe {
        dash.set_recipe(recipe);
    }
    if let Some(from) = &args.from {
        dash.set_start_date(from);
    }
    if let Some(to) = &args.to {
        dash.set_end_date(to);
    }

    log(
        Level::Info,
        Domain::View,
        "view_built",
        obj(&[
            ("loading", v_str(if dash.loading() { "true" } else { "false" })),
            ("digest", v_str(&digest(dash.view()))),
            ("jobs_total", v_num(dash.view().job_stats.total as u64)),
        ]),
    );

    if args.json {
        println!("{}", render::to_json(dash.view())?);
    } else {
        print!("{}", render::dashboard_text(dash.view()));
    }

    Ok(())
}
