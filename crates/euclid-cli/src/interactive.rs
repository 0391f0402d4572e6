//! Confirmation prompts for sync and config reset.
//!
//! Uses dialoguer for terminal UI prompts.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use euclid_core::config::Config;
use euclid_core::plan::{Decision, UpdatePlan};

/// Summarises pending work and asks before anything is downloaded.
pub struct SyncPrompt<W: Write = io::Stdout> {
    /// Skip all confirmations
    yes: bool,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl SyncPrompt<io::Stdout> {
    pub fn new(yes: bool) -> Self {
        Self {
            yes,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> SyncPrompt<W> {
    /// Create a prompt with a custom writer (for testing).
    #[cfg(test)]
    pub fn with_writer(yes: bool, writer: W) -> Self {
        Self {
            yes,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Print the plan and confirm it. A steady plan needs no confirmation.
    pub fn confirm_plan(&mut self, config: &Config, plan: &UpdatePlan) -> Result<bool> {
        if plan.is_steady() {
            writeln!(
                self.writer,
                "{}",
                style("All components are up to date.").green()
            )?;
            return Ok(true);
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Pending changes").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        for entry in plan.pending() {
            let installed = config
                .installed_version(&entry.id)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let (verb, target) = match &entry.decision {
                Decision::NeedsUpdate { target, .. } => ("update ", target),
                Decision::NeedsInstall { target, .. } => ("install", target),
                Decision::UpToDate => continue,
            };
            writeln!(
                self.writer,
                "  {} {:<24} {} -> {}",
                style(verb).cyan(),
                entry.id,
                installed,
                style(target).green()
            )?;
        }
        writeln!(self.writer)?;

        if self.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Download and apply these changes?")
            .default(true)
            .interact()?;

        Ok(confirmed)
    }

    /// Ask whether an unreadable config should be set aside and recreated.
    pub fn confirm_reset(&mut self, path: &Path, message: &str) -> Result<bool> {
        writeln!(
            self.writer,
            "{} {}",
            style("Config is corrupt:").red().bold(),
            path.display()
        )?;
        writeln!(self.writer, "  {message}")?;

        if self.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Move it aside and start from defaults?")
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}
