use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use owo_colors::OwoColorize;

use crate::{cli::Cli, config::Config, notify::Mailer, record::ResultKind};

mod cli;
mod config;
mod error;
mod feed;
mod notify;
mod pipeline;
mod query;
mod record;
mod report;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{} digest run failed", "✗".red());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    let run_date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let target = run_date - chrono::Days::new(config.search.lag_days);
    info!("building digest for {target} (run date {run_date})");

    let agent = feed::agent(config.search.timeout());
    let mut sets = Vec::with_capacity(ResultKind::ALL.len());
    for kind in ResultKind::ALL {
        let search = query::build_query(kind, &config.criteria);
        let url = query::request_url(&config.search.endpoint, &search, config.search.max_results)?;
        debug!("{kind} query: {url}");
        let records = feed::fetch(&agent, &url, kind)?;
        let set = pipeline::process(&records, kind, &config.criteria, target);
        info!(
            "{kind} search: {} entries fetched, {} kept",
            records.len(),
            set.len()
        );
        sets.push(set);
    }

    let html = report::render(&sets, target);
    let summary = sets
        .iter()
        .map(|s| format!("{} {}", s.len(), s.kind))
        .collect::<Vec<_>>()
        .join(", ");

    if args.dry_run {
        println!("{html}");
        eprintln!("{} digest for {target}: {summary}", "✓".green());
        return Ok(());
    }

    let password = config.mail.password()?;
    let mailer = Mailer::open(&config.mail, &password)?;
    mailer.send(&config.mail, html)?;
    info!("digest sent to {}", config.mail.to);
    eprintln!(
        "{} digest for {target}: {summary}, sent to {}",
        "✓".green(),
        config.mail.to
    );
    Ok(())
}
