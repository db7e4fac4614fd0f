use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use paper_scout::config::{find_config_file, load_config, Config};
use paper_scout::models::SearchMode;
use paper_scout::resolver::MirrorResolver;
use paper_scout::retrieve::{read_doi_file, Retriever};
use paper_scout::sources::{CrossRefClient, DblpClient};
use paper_scout::ui;
use paper_scout::utils::HttpClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// paper-scout - Search DBLP and fetch paper PDFs from mirror services by DOI
#[derive(Parser, Debug)]
#[command(name = "paper-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search DBLP and fetch paper PDFs from mirror services by DOI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, plain otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Search mode selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Search publications
    Publication,
    /// Search authors
    Author,
    /// Search venues
    Venue,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Publication => SearchMode::Publication,
            Mode::Author => SearchMode::Author,
            Mode::Venue => SearchMode::Venue,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the DBLP bibliography
    Search {
        /// Search term
        query: String,

        /// Which DBLP endpoint to query
        #[arg(long, short, value_enum, default_value_t = Mode::Publication)]
        mode: Mode,

        /// Maximum number of results (defaults to the configured value)
        #[arg(long, short = 'n')]
        max_results: Option<usize>,
    },

    /// Resolve a DOI to a direct PDF URL
    Resolve {
        /// Digital Object Identifier
        doi: String,
    },

    /// Download PDFs for a file of DOIs (one per line)
    Fetch {
        /// Input file with one DOI per line; blank lines are ignored
        #[arg(long, short)]
        input: PathBuf,

        /// Download directory (defaults to the configured value)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Resolve a DOI and open the PDF in the system browser
    Open {
        /// Digital Object Identifier
        doi: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("paper_scout={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?
    } else {
        Config::default()
    };

    let client = HttpClient::new().context("failed to build HTTP client")?;

    match cli.command {
        Commands::Search {
            query,
            mode,
            max_results,
        } => {
            let dblp = DblpClient::new(client, config.search.endpoints());
            let max = max_results.unwrap_or(config.search.max_results);

            let papers = dblp.search(mode.into(), &query, max).await?;

            match effective_format(cli.output) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&papers)?),
                OutputFormat::Table | OutputFormat::Auto => {
                    ui::success(&format!("Found {} results", papers.len()));
                    println!("{}", ui::render_paper_table(&papers));
                }
                OutputFormat::Plain => println!("{}", ui::render_paper_lines(&papers)),
            }
        }

        Commands::Resolve { doi } => {
            let resolver = MirrorResolver::new(client, config.mirrors.bases.clone());

            match resolver.resolve(&doi).await {
                Some(url) => println!("{}", url),
                None => {
                    ui::error(&format!("PDF not found for DOI: {}", doi));
                    std::process::exit(1);
                }
            }
        }

        Commands::Fetch { input, output_dir } => {
            // A missing input file is the only condition fatal to the run
            let dois = read_doi_file(&input)
                .with_context(|| format!("DOI file not found: {}", input.display()))?;

            let mut downloads = config.downloads.clone();
            if let Some(dir) = output_dir {
                downloads.dir = dir;
            }

            let resolver = MirrorResolver::new(client.clone(), config.mirrors.bases.clone());
            let crossref = CrossRefClient::with_base(client.clone(), &config.crossref.api_base);
            let retriever = Retriever::new(resolver, crossref, client, downloads);

            ui::success(&format!("Fetching {} DOIs", dois.len()));
            let report = retriever.fetch_all(&dois).await;

            ui::success(&format!(
                "Done: {} saved, {} not found, {} failed",
                report.saved, report.not_found, report.failed
            ));
        }

        Commands::Open { doi } => {
            let resolver = MirrorResolver::new(client, config.mirrors.bases.clone());

            match resolver.resolve(&doi).await {
                Some(url) => {
                    ui::success(&format!("Opening PDF in browser: {}", url));
                    open::that(&url).with_context(|| format!("failed to open {}", url))?;
                }
                None => {
                    ui::error(&format!("PDF not available for DOI: {}", doi));
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Resolve `Auto` to table on a TTY and plain otherwise.
fn effective_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if ui::is_terminal() {
                OutputFormat::Table
            } else {
                OutputFormat::Plain
            }
        }
        other => other,
    }
}
