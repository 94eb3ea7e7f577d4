use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use scout_common::ProblemRecord;
use scout_common::observability::init_logging;
use scout_config::{ScoutConfig, ScoutConfigLoader, default_config_path};
use scout_platforms::{PlatformRegistry, ProblemScraper};

mod export;
mod render;

#[derive(Parser)]
#[command(name = "scout", about = "Fetch coding problems with their statement and discussion")]
struct Cli {
    /// Config file (default: <config dir>/scout/scout.yaml, if present)
    #[arg(long, global = true, env = "SCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Duplicate logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one problem page and print it
    Scrape {
        url: String,
        /// Platform name; detected from the URL when omitted
        #[arg(long)]
        platform: Option<String>,
        /// Comments to show (default: comments_limit from config)
        #[arg(short = 'n', long)]
        comments: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Scrape a problem and save a solution file with a problem header
    Export {
        url: String,
        /// File holding the solution text
        #[arg(long)]
        solution: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        platform: Option<String>,
    },
    /// List registered platform names
    Platforms,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<ScoutConfig> {
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => ScoutConfigLoader::new().with_file(path),
        (None, Some(path)) => ScoutConfigLoader::new().with_optional_file(path),
        (None, None) => ScoutConfigLoader::new(),
    };
    loader.load().context("failed to load configuration")
}

fn pick_scraper(
    registry: &PlatformRegistry,
    platform: Option<&str>,
    fallback: &str,
    url: &str,
) -> Result<Arc<dyn ProblemScraper>> {
    if let Some(name) = platform {
        return Ok(registry.get(name)?);
    }
    match registry.detect(url) {
        Some(scraper) => Ok(scraper),
        None => Ok(registry.get(fallback)?),
    }
}

/// Fold command-line flags into the loaded config, so the scraper asks
/// upstream for as many comments as the command wants to show.
fn apply_cli_overrides(cfg: &mut ScoutConfig, cli: &Cli) {
    if cli.verbose {
        cfg.logging.stderr = true;
    }
    if let Commands::Scrape {
        comments: Some(n), ..
    } = &cli.command
    {
        cfg.comments_limit = *n;
    }
}

async fn scrape(scraper: &dyn ProblemScraper, url: &str) -> Result<ProblemRecord> {
    scraper
        .scrape(url)
        .await
        .with_context(|| format!("scrape failed for {url}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.as_ref())?;
    apply_cli_overrides(&mut cfg, &cli);

    let log = init_logging(cfg.logging.to_log_config("scout"))?;
    tracing::debug!(log_path = %log.path().display(), "app.logging.ready");

    let registry = PlatformRegistry::from_config(&cfg)?;

    match cli.command {
        Commands::Platforms => {
            for name in registry.names() {
                println!("{name}");
            }
        }
        Commands::Scrape {
            url,
            platform,
            comments,
            format,
        } => {
            let scraper = pick_scraper(&registry, platform.as_deref(), &cfg.platform, &url)?;
            let record = scrape(scraper.as_ref(), &url).await?;
            let limit = comments.unwrap_or(cfg.comments_limit);
            tracing::debug!(limit, "app.scrape.comment_limit");
            match format {
                OutputFormat::Text => print!("{}", render::record_text(&record, limit)),
                OutputFormat::Json => {
                    let mut shown = record;
                    shown.comments.truncate(limit);
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                }
            }
        }
        Commands::Export {
            url,
            solution,
            out_dir,
            platform,
        } => {
            let solution_text = tokio::fs::read_to_string(&solution)
                .await
                .with_context(|| format!("failed to read {}", solution.display()))?;
            if solution_text.trim().is_empty() {
                bail!("solution file {} is empty", solution.display());
            }
            let scraper = pick_scraper(&registry, platform.as_deref(), &cfg.platform, &url)?;
            let record = scrape(scraper.as_ref(), &url).await?;
            let path = export::write_export(&out_dir, &record, &solution_text).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
