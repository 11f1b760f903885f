use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use fakenews::config::Config;
use fakenews::pipeline::evaluate::EvaluateParams;
use fakenews::pipeline::train::{TrainParams, CI_SAMPLE_SIZE};
use fakenews::tracking::{FileTracker, NoopTracker, RunTracker};

/// Sample paragraph used by `clean` when no text is given.
const SAMPLE_TEXT: &str =
    "Breaking News!!! The government announced new policies today. Read more at https://news.example.com";

/// fakenews: classify news articles as FAKE or REAL.
///
/// Trains a TF-IDF + logistic regression model on two labeled CSVs, evaluates
/// the persisted artifacts, and serves predictions over HTTP.
#[derive(Parser)]
#[command(name = "fakenews", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a piece of text is cleaned before vectorizing
    Clean {
        /// Text to clean (defaults to a sample news paragraph)
        text: Option<String>,
    },

    /// Train the vectorizer and classifier and save both artifacts
    Train {
        /// CSV of fake articles (default: FAKENEWS_FAKE_CSV)
        #[arg(long)]
        fake: Option<PathBuf>,

        /// CSV of real articles (default: FAKENEWS_TRUE_CSV)
        #[arg(long)]
        real: Option<PathBuf>,
    },

    /// Evaluate the saved artifacts against labeled CSVs
    Evaluate {
        /// CSV of fake articles (default: FAKENEWS_FAKE_CSV)
        #[arg(long)]
        fake: Option<PathBuf>,

        /// CSV of real articles (default: FAKENEWS_TRUE_CSV)
        #[arg(long)]
        real: Option<PathBuf>,

        /// Record the evaluation as a tracked run
        #[arg(long)]
        track: bool,
    },

    /// Classify one article with the saved artifacts
    Predict {
        /// The article text
        text: String,
    },

    /// Show system status (dataset, artifacts, last tracked run)
    Status,

    /// Serve POST /predict over HTTP
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: FAKENEWS_PORT or 5000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: FAKENEWS_BIND or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fakenews=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { text } => {
            let original = text.as_deref().unwrap_or(SAMPLE_TEXT);
            let cleaned = fakenews::text::clean_text(original);
            fakenews::output::terminal::display_cleaned(original, &cleaned);
        }

        Commands::Train { fake, real } => {
            let mut config = Config::load()?;
            override_csvs(&mut config, fake, real);
            config.require_dataset()?;

            let params = TrainParams::for_ci(config.ci);
            info!(ci = config.ci, seed = params.seed, "Starting training run");
            if config.ci {
                println!(
                    "{}",
                    format!("CI mode: training on a {CI_SAMPLE_SIZE}-row sample").yellow()
                );
            }
            println!(
                "Training on {} + {}...",
                config.fake_csv.display(),
                config.real_csv.display()
            );

            let mut tracker = FileTracker::start(&config.tracking_dir, &config.experiment)?;
            let outcome = fakenews::pipeline::train::run(
                &config.fake_csv,
                &config.real_csv,
                &config.model_dir,
                &params,
                &mut tracker,
            )?;
            fakenews::output::terminal::display_training(&outcome, tracker.run_id());
        }

        Commands::Evaluate { fake, real, track } => {
            let mut config = Config::load()?;
            override_csvs(&mut config, fake, real);
            config.require_dataset()?;
            config.require_artifacts()?;

            let (vectorizer, model) = fakenews::model::artifacts::load(&config.model_dir)?;
            let params = EvaluateParams {
                sample_size: config.ci.then_some(CI_SAMPLE_SIZE),
                ..EvaluateParams::default()
            };

            let mut tracker: Box<dyn RunTracker> = if track {
                Box::new(FileTracker::start(&config.tracking_dir, &config.experiment)?)
            } else {
                Box::new(NoopTracker)
            };

            println!("Evaluating saved artifacts...");
            let evaluation = fakenews::pipeline::evaluate::run(
                &vectorizer,
                &model,
                &config.fake_csv,
                &config.real_csv,
                &params,
                tracker.as_mut(),
            )?;
            fakenews::output::terminal::display_evaluation(&evaluation);
            if let Some(id) = tracker.run_id() {
                println!("  {} {}", "Run:".dimmed(), id);
            }
        }

        Commands::Predict { text } => {
            let config = Config::load()?;
            config.require_artifacts()?;
            let predictor =
                fakenews::scoring::Predictor::load(&config.model_dir, config.policy()?)?;
            let result = predictor.predict(&text);
            fakenews::output::terminal::display_prediction(&text, &result, config.threshold);
        }

        Commands::Status => {
            let config = Config::load()?;
            fakenews::status::show(&config)?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_artifacts()?;
            let predictor =
                fakenews::scoring::Predictor::load(&config.model_dir, config.policy()?)?;
            info!(
                features = predictor.dimension(),
                threshold = config.threshold,
                "Artifacts loaded"
            );

            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            fakenews::web::run_server(predictor, port, &bind).await?;
        }
    }

    Ok(())
}

/// Apply --fake / --real overrides on top of the configured CSV paths.
fn override_csvs(config: &mut Config, fake: Option<PathBuf>, real: Option<PathBuf>) {
    if let Some(path) = fake {
        config.fake_csv = path;
    }
    if let Some(path) = real {
        config.real_csv = path;
    }
}
