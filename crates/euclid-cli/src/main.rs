//! EUCLID - keeps a mod folder in step with a remote manifest
//!
//! Usage:
//!   euclid sync              # Download and apply pending updates
//!   euclid status            # Show what a sync would do
//!   euclid config show       # Print the local config

mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use euclid_core::config::{self, Config, ConfigStore};
use euclid_core::context::AppContext;
use euclid_core::error::SyncError;
use euclid_core::orchestrator::{SyncOrchestrator, SyncPreview};
use euclid_core::plan::Decision;
use euclid_core::sync::{CancelToken, SyncReport};

use crate::interactive::SyncPrompt;

#[derive(Parser)]
#[command(name = "euclid")]
#[command(about = "Mod folder updater", long_about = None)]
struct Cli {
    /// Directory holding euclid.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "EUCLID_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Directory for temporary downloads (defaults to the platform cache dir)
    #[arg(long, global = true, env = "EUCLID_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and apply every pending component
    Sync {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Move a corrupt config aside and start from defaults without asking
        #[arg(long)]
        reset_corrupt: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show installed versions against the remote manifest
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Inspect or edit the local config
    Config(ConfigArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only show issues (non-zero exit if problems)
    Quiet,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print the config
    Show {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the config file location
    Path,

    /// Point at a different remote manifest
    SetUrl {
        /// Manifest URL (.yml, .json or .toml)
        url: String,
    },

    /// Set the game directory components are installed into
    SetInstallRoot {
        path: PathBuf,
    },

    /// Move the current config aside and write defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "euclid_core=info,euclid=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = build_context(cli.config_dir, cli.cache_dir)?;

    match cli.command {
        Commands::Sync {
            format,
            reset_corrupt,
            yes,
        } => run_sync(&ctx, format, reset_corrupt, yes),
        Commands::Status { format } => run_status(&ctx, format),
        Commands::Config(args) => run_config(&ctx, args),
    }
}

fn build_context(config_dir: Option<PathBuf>, cache_dir: Option<PathBuf>) -> Result<AppContext> {
    let config_dir = match config_dir {
        Some(dir) => dir,
        None => config::default_config_dir()?,
    };
    let cache_dir = match cache_dir {
        Some(dir) => dir,
        None => config::default_cache_dir()?,
    };
    Ok(AppContext::new(config_dir, cache_dir).with_detected_install_root(config::detect_install_root()))
}

// =============================================================================
// sync
// =============================================================================

fn run_sync(ctx: &AppContext, format: OutputFormat, reset_corrupt: bool, yes: bool) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let interactive = format == OutputFormat::Table;
    let mut prompt = SyncPrompt::new(yes || reset_corrupt || !interactive);

    let preview = match orchestrator.check() {
        Err(SyncError::ConfigCorrupt { path, message }) => {
            if !(reset_corrupt || interactive) {
                anyhow::bail!(
                    "Config is corrupt ({}): {}. Re-run with --reset-corrupt or `euclid config reset`",
                    path.display(),
                    message
                );
            }
            if !prompt.confirm_reset(&path, &message)? {
                println!("Aborted.");
                return Ok(());
            }
            orchestrator.config_store().reset()?;
            orchestrator.check()?
        }
        other => other?,
    };

    if interactive && !SyncPrompt::new(yes).confirm_plan(&preview.config, &preview.plan)? {
        println!("Aborted.");
        return Ok(());
    }

    let cancel = CancelToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let report = orchestrator.sync(&cancel)?;

    match format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => print_report_json(&orchestrator, &report)?,
        OutputFormat::Quiet => print_report_quiet(&report),
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    if !report.cancelled.is_empty() {
        std::process::exit(130);
    }
    Ok(())
}

/// First Ctrl-C stops the cycle before its next component; a second one exits.
fn cancel_on_ctrl_c(cancel: CancelToken) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!(error = %err, "Failed to install Ctrl-C handler");
                return;
            }
        };

        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            eprintln!(
                "{}",
                style("Cancelling after the current component (Ctrl-C again to abort)").yellow()
            );
            cancel.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });
    });
}

fn print_report(report: &SyncReport) {
    for (id, version) in &report.applied {
        println!("  {} {} {}", style("[OK]").green(), id, version);
    }
    for (id, err) in &report.failed {
        println!("  {} {} {}", style("[Failed]").red(), id, err);
    }
    for id in &report.cancelled {
        println!("  {} {}", style("[Cancelled]").yellow(), id);
    }

    println!();
    println!(
        "Summary: {} applied, {} failed, {} up to date, {} cancelled",
        report.succeeded.len(),
        report.failed.len(),
        report.skipped.len(),
        report.cancelled.len()
    );
}

fn print_report_json(orchestrator: &SyncOrchestrator, report: &SyncReport) -> Result<()> {
    let failed: serde_json::Map<String, serde_json::Value> = report
        .failed
        .iter()
        .map(|(id, err)| {
            (
                id.clone(),
                serde_json::json!({ "kind": err.kind(), "message": err.to_string() }),
            )
        })
        .collect();

    // Wrap in versioned output
    let output = serde_json::json!({
        "schema_version": 1,
        "phase": orchestrator.phase(),
        "applied": report.applied,
        "failed": failed,
        "skipped": report.skipped,
        "cancelled": report.cancelled,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_report_quiet(report: &SyncReport) {
    for (id, err) in &report.failed {
        println!("{id}: {err}");
    }
}

// =============================================================================
// status
// =============================================================================

fn run_status(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let orchestrator = ctx.orchestrator()?;
    let preview = match orchestrator.check() {
        Err(SyncError::ConfigCorrupt { path, message }) => anyhow::bail!(
            "Config is corrupt ({}): {}. Run `euclid config reset` to start over",
            path.display(),
            message
        ),
        other => other?,
    };

    match format {
        OutputFormat::Table => print_status_table(&preview),
        OutputFormat::Json => print_status_json(&preview)?,
        OutputFormat::Quiet => {
            let pending = preview.plan.pending().count();
            if pending > 0 {
                println!("{pending} components pending");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_status_table(preview: &SyncPreview) {
    let config = &preview.config;
    println!("Manifest: {}", config.remote_manifest_url);
    match &config.install_root {
        Some(root) => println!("Install root: {}", root.display()),
        None => println!(
            "Install root: {} (run 'euclid config set-install-root <PATH>')",
            style("not set").red()
        ),
    }
    println!();

    if preview.plan.is_empty() {
        println!("The manifest lists no components.");
    } else {
        println!(
            "  {:<24} {:<12} {:<12} Status",
            "Component", "Installed", "Available"
        );
        println!("  {}", "-".repeat(64));

        for entry in preview.plan.entries() {
            let installed = config
                .installed_version(&entry.id)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let available = preview
                .manifest
                .component(&entry.id)
                .map(|c| c.version.to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "  {:<24} {:<12} {:<12} {}",
                truncate(&entry.id, 24),
                truncate(&installed, 12),
                truncate(&available, 12),
                decision_symbol(&entry.decision)
            );
        }
    }

    for id in &preview.orphaned {
        println!(
            "  {:<24} {} (no longer in manifest, left in place)",
            truncate(id, 24),
            style("Orphaned").yellow()
        );
    }

    println!();
    let pending = preview.plan.pending().count();
    if pending > 0 {
        println!(
            "Summary: {} components, {} pending (run 'euclid sync' to apply)",
            preview.plan.len(),
            pending
        );
    } else {
        println!("Summary: {} components, all up to date", preview.plan.len());
    }
}

fn print_status_json(preview: &SyncPreview) -> Result<()> {
    let output = serde_json::json!({
        "schema_version": 1,
        "remote_manifest_url": preview.config.remote_manifest_url,
        "install_root": preview.config.install_root,
        "installed": preview.config.component_versions,
        "plan": preview.plan.entries(),
        "orphaned": preview.orphaned,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// =============================================================================
// config
// =============================================================================

fn run_config(ctx: &AppContext, args: ConfigArgs) -> Result<()> {
    let store = ctx.config_store();

    match args.command {
        ConfigSubcommand::Show { format } => {
            let config = store.load()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Table | OutputFormat::Quiet => print!("{}", config::to_toml(&config)?),
            }
        }
        ConfigSubcommand::Path => println!("{}", store.config_path().display()),
        ConfigSubcommand::SetUrl { url } => {
            update_config(&store, |config| config.remote_manifest_url = url)?;
        }
        ConfigSubcommand::SetInstallRoot { path } => {
            if !path.is_dir() {
                warn!(path = %path.display(), "Install root does not exist yet; it will be created on sync");
            }
            update_config(&store, |config| config.install_root = Some(path))?;
        }
        ConfigSubcommand::Reset { yes } => {
            let confirmed = yes
                || dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Move {} aside and write defaults?",
                        store.config_path().display()
                    ))
                    .default(false)
                    .interact()?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
            store.reset()?;
            println!(
                "Config reset; previous file kept at {}",
                store.backup_path().display()
            );
        }
    }

    Ok(())
}

fn update_config(store: &ConfigStore, edit: impl FnOnce(&mut Config)) -> Result<()> {
    let mut config = store.load()?;
    edit(&mut config);
    config.validate().map_err(anyhow::Error::msg)?;
    store.save(&config)?;
    println!("Updated {}", store.config_path().display());
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn decision_symbol(decision: &Decision) -> String {
    match decision {
        Decision::UpToDate => style("OK").green().to_string(),
        Decision::NeedsUpdate { .. } => style("Update").yellow().to_string(),
        Decision::NeedsInstall { .. } => style("Install").cyan().to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
