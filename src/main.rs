#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::{env, fs, io, process};

use anyhow::Context;
use clap::Parser;
use swipenav::cli::{Cli, Sub};
use swipenav::replay::{parse_trace, replay};
use swipenav::utils::{default_config_path, load_config};
use swipenav_config::Config;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "swipenav=debug,swipenav_config=debug";

fn main() -> anyhow::Result<()> {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    match cli.subcommand {
        Sub::Validate => validate(cli.config),
        Sub::Replay { trace } => {
            let config = load_config(cli.config)?;

            let text = fs::read_to_string(&trace)
                .with_context(|| format!("error reading {trace:?}"))?;
            let events = parse_trace(&text)?;
            info!("replaying {} events from {trace:?}", events.len());

            for record in replay(&config, events)? {
                println!("{}", serde_json::to_string(&record)?);
            }
            Ok(())
        }
    }
}

fn validate(path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path.or_else(default_config_path) else {
        anyhow::bail!("no config path given and no home directory to look in");
    };

    if let Err(err) = Config::load(&path) {
        eprintln!("{err:?}");
        process::exit(1);
    }

    info!("config is valid");
    Ok(())
}
