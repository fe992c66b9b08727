// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, bail};
use config::{BASE_URL_ENV, Config};
use horizon_api::Client;
use horizon_app::{AppState, CATEGORY_FILTERS, CatalogFilters, FILTER_ALL, Project, STATUS_FILTERS};
use runtime::{ApiRuntime, DEMO_SEED, DemoRuntime};
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `horizon --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        logging::init_stderr()?;
        return check(&config, options.demo);
    }

    if let Some(listing) = &options.list {
        logging::init_stderr()?;
        let projects = if options.demo {
            let demo = DemoRuntime::new(DEMO_SEED);
            if listing.featured {
                demo.featured()
            } else {
                demo.collection().to_vec()
            }
        } else {
            let client = build_client(&config)?;
            let fetched = if listing.featured {
                client.fetch_featured_projects()
            } else {
                client.fetch_projects()
            };
            fetched.with_context(|| {
                format!(
                    "list projects from {}; is the backend running?",
                    client.base_url()
                )
            })?
        };
        print!("{}", format_listing(&projects, &listing.filters));
        return Ok(());
    }

    let log_path = logging::default_log_path()?;
    logging::init_file(&log_path)?;

    let mut state = AppState {
        screen: config.start_screen(),
        ..AppState::default()
    };

    if options.demo {
        info!("starting in demo mode");
        let mut runtime = DemoRuntime::new(DEMO_SEED);
        return horizon_tui::run_app(&mut state, &mut runtime, config.app_name());
    }

    let client = build_client(&config)?;
    info!(base_url = client.base_url(), "starting");
    let mut runtime = ApiRuntime::new(client);
    horizon_tui::run_app(&mut state, &mut runtime, config.app_name())
}

fn build_client(config: &Config) -> Result<Client> {
    Client::new(&config.api_base_url()?, config.api_timeout()?)
        .context("invalid [api] config; fix base_url/timeout values")
}

fn check(config: &Config, demo: bool) -> Result<()> {
    let client = build_client(config)?;
    if demo {
        println!("config ok (demo mode, {} not probed)", client.base_url());
        return Ok(());
    }
    client.health().with_context(|| {
        format!(
            "backend at {} is not healthy; start it or point [api].base_url / {} elsewhere",
            client.base_url(),
            BASE_URL_ENV
        )
    })?;
    println!("ok: {} is healthy", client.base_url());
    Ok(())
}

/// One line per matching project followed by the result counter.
fn format_listing(projects: &[Project], filters: &CatalogFilters) -> String {
    let visible = filters.apply(projects);
    let mut out = String::new();
    for project in &visible {
        let featured = if project.featured { "  *" } else { "" };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}{}\n",
            project.id.as_str(),
            project.title,
            project.category,
            project.status,
            project.started_label(),
            featured
        ));
    }
    out.push_str(&horizon_tui::projects_found_label(visible.len()));
    out.push('\n');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListOptions {
    featured: bool,
    filters: CatalogFilters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    demo: bool,
    list: Option<ListOptions>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        demo: false,
        list: None,
        show_help: false,
    };
    let mut list_projects = false;
    let mut featured = false;
    let mut category: Option<String> = None;
    let mut status: Option<String> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--list-projects" => {
                list_projects = true;
            }
            "--featured" => {
                featured = true;
            }
            "--category" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--category requires a value"))?;
                category = Some(checked_filter("--category", value.as_ref(), &CATEGORY_FILTERS)?);
            }
            "--status" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--status requires a value"))?;
                status = Some(checked_filter("--status", value.as_ref(), &STATUS_FILTERS)?);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if list_projects {
        options.list = Some(ListOptions {
            featured,
            filters: CatalogFilters::new(
                category.unwrap_or_else(|| FILTER_ALL.to_owned()),
                status.unwrap_or_else(|| FILTER_ALL.to_owned()),
            ),
        });
    } else if featured || category.is_some() || status.is_some() {
        bail!("--featured, --category and --status only apply with --list-projects");
    }

    Ok(options)
}

fn checked_filter(flag: &str, value: &str, options: &[&str]) -> Result<String> {
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(value))
        .map(|option| (*option).to_owned())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{flag} {value:?} is not a known value; use one of: {}",
                options.join(", ")
            )
        })
}

fn print_help() {
    println!("horizon (Rust)");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Serve a generated catalog; inquiries stay local");
    println!("  --check                  Validate config and probe the backend health endpoint");
    println!("  --list-projects          Print the catalog and exit");
    println!("    --featured             Only featured projects");
    println!("    --category <name>      Filter by category (e.g. \"Web Development\")");
    println!("    --status <name>        Filter by status (e.g. Completed)");
    println!("  --help                   Show this help");
}
