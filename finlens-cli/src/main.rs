use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use finlens_assistant::{
    Answer, CompletionClient, IntentResolver, OfflineClient, OpenAiClient, QueryOrchestrator,
};
use finlens_core::{aggregate_with, layout_with, Transaction};
use finlens_ingest::{load_transactions, sort_newest_first};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod auth;
mod config;
mod render;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINLENS_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "finlens", version = VERSION, about = "Personal finance dashboard, map markers and assistant")]
struct Cli {
    /// Log filter, e.g. `debug` or `finlens_core=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, month-over-month change, categories and recent records
    Dashboard {
        /// Transaction snapshot (.json or .csv)
        #[arg(long)]
        file: PathBuf,

        /// Reference date (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Keep file order instead of sorting newest-first
        #[arg(long)]
        keep_order: bool,

        #[arg(long)]
        json: bool,
    },

    /// Map markers with co-located records spread apart
    Markers {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        keep_order: bool,

        #[arg(long)]
        json: bool,
    },

    /// Ask the assistant a question about your finances
    Ask {
        #[arg(long)]
        file: PathBuf,

        /// Never call the remote service; answer from local rules
        #[arg(long)]
        offline: bool,

        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Manage ~/.finlens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store credentials in ~/.finlens/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an OpenAI API key (stored locally)
    PasteOpenaiApiKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --log-level > RUST_LOG > warn
    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Dashboard {
            file,
            as_of,
            keep_order,
            json,
        } => {
            let cfg = config::load_config()?;
            let txns = load(&file, keep_order)?;
            let today = as_of.unwrap_or_else(|| Local::now().date_naive());
            let stats = aggregate_with(&txns, today, &cfg.aggregate_options());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::dashboard(&stats));
            }
        }

        Command::Markers {
            file,
            keep_order,
            json,
        } => {
            let cfg = config::load_config()?;
            let txns = load(&file, keep_order)?;
            let layout = layout_with(&txns, &cfg.geo_options()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print!("{}", render::markers(&layout));
            }
        }

        Command::Ask {
            file,
            offline,
            question,
        } => {
            let question = question.join(" ");
            if question.trim().is_empty() {
                bail!("question is empty");
            }
            let cfg = config::load_config()?;
            let txns = load(&file, false)?;

            let client: Box<dyn CompletionClient> = if offline || !cfg.ai.enabled {
                Box::new(OfflineClient)
            } else {
                let key = auth::resolve_api_key()?;
                Box::new(OpenAiClient::new(cfg.openai_settings(key))?)
            };

            let orchestrator = QueryOrchestrator::new(IntentResolver::new()?);
            let answer = orchestrator.answer(&question, &txns, client.as_ref()).await;
            if let Answer::Fallback { reason, .. } = &answer {
                tracing::info!(%reason, "answered from local rules");
            }
            println!("{}", answer.text());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
        },
    }

    Ok(())
}

fn load(path: &Path, keep_order: bool) -> Result<Vec<Transaction>> {
    let txns = load_transactions(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(count = txns.len(), file = %path.display(), "loaded transactions");
    if keep_order {
        Ok(txns)
    } else {
        Ok(sort_newest_first(&txns))
    }
}
