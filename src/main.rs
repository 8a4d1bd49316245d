//! `player-app-installer` binary: parse the command line and dispatch.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use player_app_installer::cli::{Cli, Command};
use player_app_installer::commands;
use player_app_installer::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_subscriber(args.verbose, args.command.log_name());
    let log = Arc::new(Logger::new(args.command.log_name()));

    if let Some((phase, opts)) = args.command.phase() {
        return commands::phase::run(&args.global, phase, opts, &log);
    }

    match &args.command {
        Command::InitializeQuestions(_) => commands::plan::run_questions(&args.global, log.as_ref()),
        Command::InitializeInstall(_) => {
            commands::plan::run_install_plan(&args.global, log.as_ref())
        }
        Command::DetectSystem => commands::detect::run(&args.global, log.as_ref()),
        Command::Sentinel { action } => {
            commands::sentinel::run(action, log.as_ref()).map(|_| ())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
        // Dispatched through `Command::phase` above.
        Command::PreTransactionInstall(_)
        | Command::PreInstall(_)
        | Command::PostInstall(_)
        | Command::InitializeUninstall(_)
        | Command::PreUninstall(_)
        | Command::PostUninstall(_) => Ok(()),
    }
}
