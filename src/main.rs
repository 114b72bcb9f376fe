use anyhow::{Context, Result};
use clap::Parser;
use doi_fill::bib::{output_path, read_bibliography, write_bibliography};
use doi_fill::config::{find_config_file, load_config, Config};
use doi_fill::enrich::{enrich, EnrichOptions};
use doi_fill::models::AuthorQuery;
use doi_fill::sources::CrossRefResolver;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// doi-fill - Add missing DOIs to a BibTeX file by searching CrossRef
#[derive(Parser, Debug)]
#[command(name = "doi-fill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Add missing DOIs to a BibTeX file by searching CrossRef", long_about = None)]
struct Cli {
    /// BibTeX file to enrich
    #[arg(required_unless_present = "print_config")]
    bibfile: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file (default: <BIBFILE>_doi.bib)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Attempts per entry before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Contact email sent to CrossRef
    #[arg(long)]
    mailto: Option<String>,

    /// Query with normalized title and author last names instead of raw fields
    #[arg(long)]
    last_names: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of file/env configuration
    fn apply(&self, config: &mut Config) {
        if let Some(max_attempts) = self.max_attempts {
            config.lookup.max_attempts = max_attempts;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.lookup.retry_delay_ms = delay;
        }
        if let Some(timeout) = self.timeout {
            config.lookup.timeout_secs = timeout;
        }
        if let Some(mailto) = &self.mailto {
            config.lookup.mailto = Some(mailto.clone());
        }
        if self.last_names {
            config.lookup.author_query = AuthorQuery::LastNames;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
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
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("doi_fill={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let input = cli
        .bibfile
        .clone()
        .context("missing BibTeX file argument")?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path(&input, &config.output.suffix));

    if !cli.quiet {
        println!("Reading Bibliography...");
    }
    let mut bibliography = read_bibliography(&input)
        .with_context(|| format!("cannot load {}", input.display()))?;

    let resolver =
        CrossRefResolver::from_config(&config.lookup).context("failed to create HTTP client")?;
    let options = EnrichOptions {
        author_query: config.lookup.author_query,
        show_progress: !cli.quiet,
        indent: config.output.indent.clone(),
    };

    if !cli.quiet {
        println!("Looking for Dois...");
    }
    let summary = enrich(&mut bibliography, &resolver, &options)
        .await
        .context("lookup aborted")?;

    if !cli.quiet {
        println!("{}", summary);
        println!("Writing result to {}", output.display());
    }
    write_bibliography(&bibliography, &output, &options.indent)
        .with_context(|| format!("cannot write {}", output.display()))?;

    Ok(())
}
