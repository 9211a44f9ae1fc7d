mod context;
mod display;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ecasa_core::{AppConfig, Visualization};
use tracing::info;

use context::AppContext;

#[derive(Parser)]
#[command(name = "ecasa", version, about = "Climate change tweet sentiment classifier")]
struct Cli {
    /// Directory holding Models/, Files/ and Visuals/.
    #[arg(long, global = true, env = "ECASA_RESOURCES")]
    resources: Option<PathBuf>,

    /// JSON config file overriding artifact locations.
    #[arg(long, global = true, env = "ECASA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a tweet's stance on man-made climate change.
    Predict {
        /// Model display name or slug (lr, svc, nb, knn).
        #[arg(long, short, default_value = "Logistic Regression")]
        model: String,
        /// Print a JSON object instead of a sentence.
        #[arg(long)]
        json: bool,
        /// Tweet text. Read from stdin when omitted.
        text: Option<String>,
    },
    /// List the configured models and their artifacts.
    Models,
    /// Show raw training data and its class balance.
    Explore {
        /// Number of sample rows to print.
        #[arg(long, default_value_t = 10)]
        rows: usize,
        /// Print only the class distribution.
        #[arg(long)]
        distribution: bool,
    },
    /// List the exploratory data analysis images.
    Gallery {
        /// Visualization slug, e.g. `common-words`. All when omitted.
        visualization: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    info!("ecasa v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    match cli.command {
        Command::Predict { model, json, text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let ctx = AppContext::load(config)?;
            let prediction = ctx
                .dispatcher
                .predict(&model, &text)
                .with_context(|| format!("predicting with {model:?}"))?;
            if json {
                display::print_prediction_json(&prediction)?;
            } else {
                display::print_prediction(&prediction);
            }
        }
        Command::Models => {
            let ctx = AppContext::load(config)?;
            display::print_models(ctx.dispatcher.models());
            println!();
            println!(
                "Vectorizer: {} ({} features)",
                ctx.config.vectorizer_path().display(),
                ctx.dispatcher.vectorizer().dim()
            );
        }
        Command::Explore { rows, distribution } => {
            let ctx = AppContext::load(config)?;
            if !ctx.tweets.has_tweets() {
                bail!("dataset not loaded from {}", ctx.config.dataset_path().display());
            }
            let total = ctx.tweets.tweet_count()?;
            println!("{total} tweets in {}", ctx.config.dataset_path().display());
            println!();
            if !distribution {
                display::print_sample(&ctx.tweets.sample(rows)?)?;
                println!();
            }
            display::print_distribution(&ctx.tweets.sentiment_distribution()?);
        }
        Command::Gallery { visualization } => {
            let visualization = visualization
                .map(|v| v.parse::<Visualization>())
                .transpose()?;
            display::print_gallery(&config, visualization);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.resources {
        config = config.with_resources_dir(dir);
    }
    Ok(config)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading tweet text from stdin")?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}
