//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use cdpdocs_core::{DocIndex, ProgressReporter, QueryEngine, build_index_for};
use cdpdocs_crawler::{CrawlReport, Crawler};
use cdpdocs_shared::{
    AppConfig, CrawlConfig, Platform, PlatformRegistry, init_config, load_config,
    load_config_from, write_config_to,
};

use crate::repl;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cdpdocs: answer questions from Customer Data Platform documentation.
#[derive(Parser)]
#[command(
    name = "cdpdocs",
    version,
    about = "Crawl Segment, mParticle, Lytics, and Zeotap docs and answer questions about them.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.cdpdocs/cdpdocs.toml).
    #[arg(long, env = "CDPDOCS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Stop each platform crawl after this many pages.
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Do not follow links deeper than this from the seed URL.
    #[arg(long, global = true)]
    pub max_depth: Option<u32>,

    /// Defaults to `chat`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl all platforms, then answer questions interactively.
    Chat,

    /// Crawl all platforms and answer a single question.
    Ask {
        /// The question, e.g. "How do I set up a source in Segment?".
        question: String,
    },

    /// Crawl and print an indexing summary.
    Crawl {
        /// Only crawl this platform (segment, mparticle, lytics, zeotap).
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// List platforms and their seed URLs.
    Platforms,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cdpdocs=info",
        1 => "cdpdocs=debug",
        _ => "cdpdocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Command::Chat) => cmd_chat(&cli).await,
        Some(Command::Ask { question }) => cmd_ask(&cli, question).await,
        Some(Command::Crawl { platform }) => cmd_crawl(&cli, *platform).await,
        Some(Command::Platforms) => cmd_platforms(&cli),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(&cli),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

/// Config file from `--config`, or the default location.
fn load_app_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Crawl settings with CLI flags layered over the config file.
fn crawl_config(cli: &Cli, config: &AppConfig) -> CrawlConfig {
    let mut crawl = CrawlConfig::from(config);
    crawl.max_pages = cli.max_pages.or(crawl.max_pages);
    crawl.max_depth = cli.max_depth.or(crawl.max_depth);
    crawl
}

/// Crawl `platforms` and build the index, showing a spinner.
async fn crawl_platforms(cli: &Cli, platforms: &[Platform]) -> Result<(DocIndex, Vec<CrawlReport>)> {
    let config = load_app_config(cli)?;
    let registry = PlatformRegistry::from_config(&config.seeds)?;
    let crawler = Crawler::new(crawl_config(cli, &config))?;

    info!(
        platforms = platforms.len(),
        max_pages = ?crawler.config().max_pages,
        max_depth = ?crawler.config().max_depth,
        "building documentation index"
    );

    let reporter = CliProgress::new();
    Ok(build_index_for(&registry, &crawler, platforms, &reporter).await)
}

async fn cmd_chat(cli: &Cli) -> Result<()> {
    let (index, _reports) = crawl_platforms(cli, &Platform::ALL).await?;
    let engine = QueryEngine::new(&index);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let answered = repl::run(&engine, stdin.lock(), stdout.lock())?;
    info!(answered, "session ended");

    Ok(())
}

async fn cmd_ask(cli: &Cli, question: &str) -> Result<()> {
    let (index, _reports) = crawl_platforms(cli, &Platform::ALL).await?;
    let engine = QueryEngine::new(&index);
    println!("{}", engine.respond(question));
    Ok(())
}

async fn cmd_crawl(cli: &Cli, platform: Option<Platform>) -> Result<()> {
    let platforms: Vec<Platform> = match platform {
        Some(p) => vec![p],
        None => Platform::ALL.to_vec(),
    };
    let (index, reports) = crawl_platforms(cli, &platforms).await?;

    println!();
    for report in &reports {
        println!(
            "  {:<10} {:>6} pages  {:>4} errors  {:>7.1}s  {}{}",
            report.platform.name(),
            report.pages_indexed,
            report.errors.len(),
            report.duration.as_secs_f64(),
            report.seed,
            if report.truncated { "  (truncated)" } else { "" },
        );
    }
    println!();
    println!("  Total indexed pages: {}", index.total_pages());
    println!();

    Ok(())
}

fn cmd_platforms(cli: &Cli) -> Result<()> {
    let config = load_app_config(cli)?;
    let registry = PlatformRegistry::from_config(&config.seeds)?;
    for (platform, seed) in registry.iter() {
        println!("  {:<10} {:<10} {seed}", platform.name(), platform.alias());
    }
    Ok(())
}

fn cmd_config_init(cli: &Cli) -> Result<()> {
    let path = match &cli.config {
        Some(path) => {
            write_config_to(path, &AppConfig::default())?;
            path.clone()
        }
        None => init_config()?,
    };
    println!("Created config file: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = load_app_config(cli)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, platform: Platform, url: &str, current: usize) {
        self.spinner
            .set_message(format!("{platform} [{current}] {url}"));
    }

    fn platform_done(&self, report: &CrawlReport) {
        self.spinner.println(format!(
            "  {} indexed {} pages ({} errors)",
            report.platform,
            report.pages_indexed,
            report.errors.len()
        ));
    }

    fn done(&self, _index: &DocIndex) {
        self.spinner.finish_and_clear();
    }
}
