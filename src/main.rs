use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use yamlfmt::config::{Config, SimpleRule};
use yamlfmt::file::{read_input, write_output};
use yamlfmt::format::{lint_bytes, string_ordering, validate, Rule};

/// openapi-fmt - An opinionated formatter of openapi.yaml files
#[derive(Parser)]
#[command(name = "openapi-fmt")]
#[command(version)]
#[command(about = "Opinionated formatter of openapi.yaml files", long_about = None)]
struct Cli {
    /// Path to openapi.yaml file (omit or `-` to read from stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to node to sort alphabetically (e.g. '$.key')
    #[arg(long, value_name = "PATH")]
    alphabetical: Vec<String>,

    /// path=keys of node to sort, with a comma separated list of keys (e.g. '$.info=title,version')
    #[arg(long, value_name = "PATH=KEYS")]
    simple: Vec<SimpleRule>,

    /// Config file (default: ~/.config/openapi-fmt/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not apply the built-in OpenAPI rules
    #[arg(long)]
    no_default_rules: bool,

    /// Don't write anything, exit with status 1 if the input is not formatted
    #[arg(long)]
    check: bool,

    /// Log rule application to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if cli.no_default_rules {
        config.default_rules = false;
    }

    // command line rules run after the configured ones
    let mut rules = config.rules();
    rules.extend(
        cli.alphabetical
            .iter()
            .map(|path| Rule::new(path.as_str(), vec![string_ordering()])),
    );
    rules.extend(cli.simple.into_iter().map(SimpleRule::into_rule));

    validate(&rules).context("Invalid rules")?;
    debug!(rules = rules.len(), "rules validated");

    let input = read_input(cli.file.as_deref())?;
    let output = lint_bytes(&input, &rules).context("Failed to format document")?;

    if cli.check {
        if output != input {
            info!("input is not formatted");
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    match &cli.output {
        Some(path) => {
            write_output(path, &output, &config)?;
            info!(path = %path.display(), "formatted document written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&output)
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
