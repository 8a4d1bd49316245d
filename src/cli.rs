//! Command-line interface: one subcommand per lifecycle phase.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::tasks::{Phase, Transaction};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "/etc/vmware-installer/player-app.toml";

/// Top-level CLI entry point for the Player application component hooks.
#[derive(Parser, Debug)]
#[command(
    name = "player-app-installer",
    about = "Lifecycle hooks for the Player application installer component",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Installer configuration file (TOML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override the installation prefix
    #[arg(long, global = true)]
    pub prefix: Option<PathBuf>,

    /// Override the system configuration directory
    #[arg(long, global = true)]
    pub sysconfdir: Option<PathBuf>,

    /// Override the component payload directory
    #[arg(long, global = true)]
    pub component_dir: Option<PathBuf>,
}

/// Versions and mode passed by the transaction engine.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOpts {
    /// Version being replaced
    #[arg(long)]
    pub old: Option<String>,

    /// Version being installed
    #[arg(long)]
    pub new: Option<String>,

    /// This phase is part of an upgrade
    #[arg(long)]
    pub upgrade: bool,
}

impl TransactionOpts {
    /// The transaction these options describe.
    #[must_use]
    pub fn transaction(&self) -> Transaction {
        Transaction {
            old: self.old.clone(),
            new: self.new.clone(),
            upgrade: self.upgrade,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load resources needed by the questions
    PreTransactionInstall(TransactionOpts),
    /// Print the install questions as JSON
    InitializeQuestions(TransactionOpts),
    /// Print the ordered install plan as JSON
    InitializeInstall(TransactionOpts),
    /// Stop product processes before files are staged
    PreInstall(TransactionOpts),
    /// Configure the system after files were staged
    PostInstall(TransactionOpts),
    /// Unmount virtual disks before an uninstall proceeds
    InitializeUninstall(TransactionOpts),
    /// Deconfigure the system before files are removed
    PreUninstall(TransactionOpts),
    /// Clean up state left behind after files were removed
    PostUninstall(TransactionOpts),
    /// Print the detected distribution as JSON
    DetectSystem,
    /// Edit a managed block in a text file
    Sentinel {
        /// Edit to perform.
        #[command(subcommand)]
        action: SentinelAction,
    },
    /// Print version information
    Version,
}

/// Sentinel block edits.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SentinelAction {
    /// Insert (or replace) the managed block
    Insert {
        /// File to edit
        file: PathBuf,
        /// Block content, without the marker lines
        text: String,
        /// Put the block at the top of the file instead of the end
        #[arg(long)]
        prepend: bool,
    },
    /// Remove the managed block
    Remove {
        /// File to edit
        file: PathBuf,
    },
}

impl Command {
    /// The side-effecting lifecycle phase this command runs, with its options.
    #[must_use]
    pub const fn phase(&self) -> Option<(Phase, &TransactionOpts)> {
        match self {
            Self::PreTransactionInstall(o) => Some((Phase::PreTransactionInstall, o)),
            Self::PreInstall(o) => Some((Phase::PreInstall, o)),
            Self::PostInstall(o) => Some((Phase::PostInstall, o)),
            Self::InitializeUninstall(o) => Some((Phase::InitializeUninstall, o)),
            Self::PreUninstall(o) => Some((Phase::PreUninstall, o)),
            Self::PostUninstall(o) => Some((Phase::PostUninstall, o)),
            Self::InitializeQuestions(_)
            | Self::InitializeInstall(_)
            | Self::DetectSystem
            | Self::Sentinel { .. }
            | Self::Version => None,
        }
    }

    /// Name of the log file this command writes to.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::InitializeQuestions(_) => "initialize-questions",
            Self::InitializeInstall(_) => "initialize-install",
            Self::DetectSystem => "detect-system",
            Self::Sentinel { .. } => "sentinel",
            Self::Version => "version",
            Self::PreTransactionInstall(_) => Phase::PreTransactionInstall.as_str(),
            Self::PreInstall(_) => Phase::PreInstall.as_str(),
            Self::PostInstall(_) => Phase::PostInstall.as_str(),
            Self::InitializeUninstall(_) => Phase::InitializeUninstall.as_str(),
            Self::PreUninstall(_) => Phase::PreUninstall.as_str(),
            Self::PostUninstall(_) => Phase::PostUninstall.as_str(),
        }
    }
}
