use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deprisk::{
    analyzer::TyposquatDetector,
    checker::OsvClient,
    config::Config,
    model::ScanOutcome,
    output::{format_outcome_to_string, print_error, print_outcome, OutputFormat},
    ScanOrchestrator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VULNERABLE: u8 = 2;
    pub const SUSPICIOUS: u8 = 3;
}

#[derive(Parser)]
#[command(name = "deprisk")]
#[command(
    author,
    version,
    about = "Check a dependency manifest for known vulnerabilities and typosquatting"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a package.json manifest
    Scan {
        /// Manifest path; reads stdin when omitted or "-"
        manifest: Option<String>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Write the JSON payload to a file
        #[arg(short, long)]
        output: Option<String>,

        /// Exit non-zero if packages at or above this verdict are found
        #[arg(long, value_enum)]
        fail_on: Option<FailLevel>,

        /// Advisory query endpoint
        #[arg(long)]
        advisory_url: Option<String>,
    },

    /// Check a single package name for typosquatting
    CheckName {
        name: String,
    },

    /// Show effective settings or create the config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FailLevel {
    Vulnerable,
    Suspicious,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });

    match cli.command {
        Commands::Scan {
            manifest,
            format,
            output,
            fail_on,
            advisory_url,
        } => {
            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
            let advisory_url = advisory_url.unwrap_or_else(|| config.advisory_url.clone());

            let text = read_manifest(manifest.as_deref()).await?;
            let orchestrator = ScanOrchestrator::new(OsvClient::with_endpoint(advisory_url))
                .with_ignore(config.ignore.clone());

            run_scan(&orchestrator, &text, format, output, fail_on).await
        }
        Commands::CheckName { name } => {
            let verdict = TyposquatDetector::new().detect(&name);
            match (verdict.target_package, verdict.distance) {
                (Some(target), Some(distance)) => {
                    println!(
                        "{} looks like '{}' (edit distance {})",
                        name, target, distance
                    );
                    Ok(exit_codes::SUSPICIOUS)
                }
                _ => {
                    println!("{} does not resemble a trusted package", name);
                    Ok(exit_codes::SUCCESS)
                }
            }
        }
        Commands::Config { init, path } => {
            handle_config(&config, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn read_manifest(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read manifest from stdin")?;
            Ok(text)
        }
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read manifest {}", path)),
    }
}

async fn run_scan(
    orchestrator: &ScanOrchestrator,
    text: &str,
    format: OutputFormat,
    output_file: Option<String>,
    fail_on: Option<FailLevel>,
) -> Result<u8> {
    let is_interactive = format == OutputFormat::Table;

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Checking dependencies...");
        Some(pb)
    } else {
        None
    };

    let result = orchestrator.scan(text).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            print_error(&e.to_payload(), format)?;
            return Ok(exit_codes::ERROR);
        }
    };

    if let Some(path) = output_file {
        std::fs::write(&path, format_outcome_to_string(&outcome)?)?;
        if is_interactive {
            println!("Results written to: {}", path);
        }
    } else {
        print_outcome(&outcome, format)?;
    }

    Ok(determine_exit_code(&outcome, fail_on))
}

/// Determine the exit code based on verdicts found and --fail-on setting
fn determine_exit_code(outcome: &ScanOutcome, fail_on: Option<FailLevel>) -> u8 {
    let (Some(fail_on), Some(report)) = (fail_on, outcome.report()) else {
        return exit_codes::SUCCESS;
    };

    let has_vulnerable = report.stats.vulnerable_count > 0;
    let has_suspicious = report.stats.suspicious_count > 0;

    match fail_on {
        FailLevel::Vulnerable if has_vulnerable => exit_codes::VULNERABLE,
        FailLevel::Suspicious if has_vulnerable => exit_codes::VULNERABLE,
        FailLevel::Suspicious if has_suspicious => exit_codes::SUSPICIOUS,
        _ => exit_codes::SUCCESS,
    }
}

fn handle_config(config: &Config, init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
    } else if init && config_path.exists() {
        println!(
            "Leaving existing config untouched: {}",
            config_path.display()
        );
    } else if init {
        Config::default().save()?;
        println!("Wrote default settings to {}", config_path.display());
    } else {
        let origin = config_path
            .exists()
            .then(|| config_path.display().to_string());
        print!("{}", render_config(config, origin.as_deref())?);
    }

    Ok(())
}

/// Effective settings as TOML, headed by where they were loaded from.
fn render_config(config: &Config, origin: Option<&str>) -> Result<String> {
    let header = match origin {
        Some(path) => format!("# loaded from {}\n", path),
        None => "# built-in defaults (create a file with `deprisk config --init`)\n".to_string(),
    };
    Ok(format!("{}{}", header, toml::to_string_pretty(config)?))
}
