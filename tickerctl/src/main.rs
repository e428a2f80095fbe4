use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ticker_config::{ConfigLoad, ConfigSource, TickerConfigLoader, util::parse_duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod simulate;

#[derive(Parser)]
#[command(name = "tickerctl", about = "Headless driver for the ticker engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drive a ticker over the sample feed and report what it did
    Run(RunArgs),
    /// Inspect the resolved ticker configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration and where it came from
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Config file (TOML or JSON); otherwise TICKER_CONFIG_PATH and defaults apply
    #[arg(long)]
    config: Option<PathBuf>,
    /// How long to run before stopping
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub(crate) duration: Duration,
    /// Speed multiplier (points per second = speed * 10)
    #[arg(long)]
    speed: Option<f32>,
    /// Gap between items
    #[arg(long)]
    spacing: Option<f32>,
    /// Delay before auto-resume after a tap or drag
    #[arg(long, value_parser = parse_duration)]
    resume_delay: Option<Duration>,
    /// Tap the first headline at this point of the run
    #[arg(long, value_parser = parse_duration)]
    pub(crate) tap_at: Option<Duration>,
    /// Drag the strip at this point of the run
    #[arg(long, value_parser = parse_duration)]
    pub(crate) drag_at: Option<Duration>,
    /// Final drag translation in points (negative drags left)
    #[arg(long, default_value_t = -120.0, allow_hyphen_values = true)]
    pub(crate) drag_by: f32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ticker::engine=info,tickerctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let mut load = resolve(args.config.as_ref())?;
            if let Some(speed) = args.speed {
                load.config.speed = speed;
            }
            if let Some(spacing) = args.spacing {
                load.config.spacing = spacing;
            }
            if let Some(delay) = args.resume_delay {
                load.config.resume_delay_ms =
                    ticker_config::util::duration_to_millis(delay);
            }
            load.config
                .validate()
                .context("invalid ticker settings")?;

            let summary = simulate::run(load.config, &args).await?;
            println!("{summary}");
        }
        Command::Config {
            action: ConfigAction::Show { config, json },
        } => {
            let load = resolve(config.as_ref())?;
            for warning in load.warnings.iter() {
                eprintln!("warning: {warning}");
            }
            if json {
                eprintln!("source: {}", describe_source(&load.source));
                println!("{}", serde_json::to_string_pretty(&load.config)?);
            } else {
                println!("# source: {}", describe_source(&load.source));
                if !load.overrides.is_empty() {
                    println!("# overrides: {}", load.overrides.join(", "));
                }
                print!("{}", ticker_config::to_toml_string(&load.config)?);
            }
        }
    }

    Ok(())
}

fn resolve(path: Option<&PathBuf>) -> Result<ConfigLoad> {
    let mut loader = TickerConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_path(path);
    }
    loader.load().context("failed to load ticker config")
}

fn describe_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Default => "defaults".to_string(),
        ConfigSource::Explicit(path) => format!("--config {}", path.display()),
        ConfigSource::EnvPath(path) => {
            format!("TICKER_CONFIG_PATH {}", path.display())
        }
        ConfigSource::EnvInline => "TICKER_CONFIG_JSON".to_string(),
        ConfigSource::File(path) => path.display().to_string(),
    }
}
