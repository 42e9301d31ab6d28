//! Command-line interface for the `aspen` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use aspen_core::config::{LogFormat, Mode, NetworkAddress, WebsiteConfig};
use aspen_core::error::AppError;
use aspen_core::result::AppResult;
use aspen_hooks::{HookError, HookPhase, lifecycle_fn};

use crate::website::Website;

/// Aspen — resolve a website's configuration and drive its lifecycle hooks
#[derive(Debug, Parser)]
#[command(name = "aspen", version, about, long_about = None)]
pub struct Cli {
    /// The IP or Unix address to bind to [:8080]
    #[arg(short, long)]
    pub address: Option<NetworkAddress>,

    /// One of: debugging, development, staging, production [development]
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// The root publishing directory [.]
    #[arg(short = 'w', long)]
    pub www_root: Option<PathBuf>,

    /// Directory holding project code outside the web root
    #[arg(short, long)]
    pub project_root: Option<PathBuf>,

    /// Report the website unavailable for this many minutes
    #[arg(short, long)]
    pub unavailable: Option<u32>,

    /// Log output format: compact, verbose, or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Output format for `check` and `hooks`
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run startup hooks, wait for Ctrl+C, then run shutdown hooks
    Run,
    /// Print the resolved configuration
    Check,
    /// Print the registered hooks per phase
    Hooks,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON output
    Json,
}

impl Cli {
    /// Overlay command-line flags onto `config`.
    pub fn apply(&self, config: &mut WebsiteConfig) {
        if let Some(address) = &self.address {
            config.network_address = address.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(root) = &self.www_root {
            config.www_root = Some(root.clone());
        }
        if let Some(root) = &self.project_root {
            config.project_root = Some(root.clone());
        }
        if let Some(minutes) = self.unavailable {
            config.unavailable = minutes;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }

    /// Overlay the flags onto `config` loaded from the environment, then
    /// validate the result. Flags win, so a stale variable they replace
    /// never fails the check.
    pub fn resolve(&self, mut config: WebsiteConfig) -> AppResult<WebsiteConfig> {
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Execute the selected command against a resolved configuration.
    pub async fn execute(&self, config: WebsiteConfig) -> AppResult<()> {
        let mut website: Website = Website::new(config)?;
        website.configure(register_builtin_hooks)?;

        match self.command.unwrap_or(Commands::Run) {
            Commands::Run => run(&website).await,
            Commands::Check => print_config(&website.config, self.format),
            Commands::Hooks => print_hooks(&website, self.format),
        }
    }
}

/// Hooks every website run from the command line gets.
pub fn register_builtin_hooks(website: &mut Website) -> AppResult<()> {
    website.hooks.register_lifecycle(
        HookPhase::Startup,
        lifecycle_fn("check_www_root", |config| {
            let root = config
                .resolved_www_root()
                .map_err(|e| HookError::failed("check_www_root", e.to_string()))?;
            if !root.is_dir() {
                return Err(HookError::failed(
                    "check_www_root",
                    format!("{} does not point to a directory", root.display()),
                ));
            }
            info!(www_root = %root.display(), "Publishing directory ready");
            Ok(())
        }),
    )?;
    website.hooks.register_lifecycle(
        HookPhase::Shutdown,
        lifecycle_fn("announce_shutdown", |config| {
            info!(address = %config.network_address, "No longer serving");
            Ok(())
        }),
    )?;
    Ok(())
}

async fn run(website: &Website) -> AppResult<()> {
    website.start().await?;
    info!(
        engine = %website.config.network_engine,
        "Waiting for the network engine; press Ctrl+C to stop"
    );

    shutdown_signal().await?;
    info!("Shutdown signal received");

    let failures = website.stop().await;
    if failures.is_empty() {
        return Ok(());
    }
    let hooks: Vec<&str> = failures.iter().map(|f| f.hook.as_str()).collect();
    Err(AppError::hook(format!(
        "{} shutdown hook(s) failed: {}",
        failures.len(),
        hooks.join(", ")
    )))
}

/// Configuration as JSON, plus the index file a request for the
/// publishing root would be served.
fn config_report(config: &WebsiteConfig) -> AppResult<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;
    let index = config
        .find_index(&config.resolved_www_root()?)
        .map(|path| path.display().to_string());
    if let Some(fields) = value.as_object_mut() {
        fields.insert("root_index".to_string(), serde_json::json!(index));
    }
    Ok(value)
}

fn print_config(config: &WebsiteConfig, format: OutputFormat) -> AppResult<()> {
    let value = config_report(config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => {
            if let Some(fields) = value.as_object() {
                for (key, value) in fields {
                    print_kv(key, &value.to_string());
                }
            }
        }
    }
    Ok(())
}

fn print_hooks(website: &Website, format: OutputFormat) -> AppResult<()> {
    let summary = website.hooks.summary();
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = summary
                .into_iter()
                .map(|(phase, names)| (phase.to_string(), serde_json::json!(names)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Text => {
            for (phase, names) in summary {
                let listed = if names.is_empty() {
                    "-".to_string()
                } else {
                    names.join(", ")
                };
                print_kv(phase.as_str(), &listed);
            }
        }
    }
    Ok(())
}

/// Print a key-value pair
fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() -> AppResult<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
