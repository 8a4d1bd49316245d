//! Commands: print the declarative phases as JSON.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::config::questions::initialize_questions;
use crate::config::targets::initialize_install;
use crate::logging::Log;
use crate::tasks::help_text::load_help_text;

/// The install questions as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn questions_json(setup: &CommandSetup, log: &dyn Log) -> Result<String> {
    let help = load_help_text(&setup.layout.learn_more(), log);
    let questions = initialize_questions(&setup.config.answers, &help);
    log.debug(&format!("{} questions", questions.len()));
    serde_json::to_string_pretty(&questions).context("serialize questions")
}

/// The ordered install plan as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn install_plan_json(setup: &CommandSetup, log: &dyn Log) -> Result<String> {
    let plan = initialize_install(&setup.layout, &setup.config.installer);
    log.debug(&format!(
        "{} targets, {} permissions",
        plan.targets().len(),
        plan.permissions().len()
    ));
    serde_json::to_string_pretty(&plan).context("serialize install plan")
}

/// Print the install questions.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_questions(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    println!("{}", questions_json(&setup, log)?);
    Ok(())
}

/// Print the install plan.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_install_plan(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    println!("{}", install_plan_json(&setup, log)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::layout::Layout;
    use crate::config::{InstallerConfig, YesNo};
    use crate::logging::isolated_logger;

    fn setup(config: InstallerConfig) -> CommandSetup {
        let layout = Layout::resolve(&config.paths);
        CommandSetup { config, layout }
    }

    #[test]
    fn questions_carry_previous_answers() {
        let (log, _tmp, _guard) = isolated_logger();
        let mut config = InstallerConfig::default();
        config.paths.component_dir = "/nonexistent/component".into();
        config.answers.data_collection_enabled = Some(YesNo::No);

        let json: serde_json::Value =
            serde_json::from_str(&questions_json(&setup(config), &log).unwrap()).unwrap();
        assert_eq!(json[0]["key"], "softwareUpdateEnabled");
        assert_eq!(json[0]["level"], "REGULAR");
        assert_eq!(json[1]["default"], "no");
        assert_eq!(json[1]["level"], "CUSTOM");
    }

    #[test]
    fn install_plan_lists_targets_in_order() {
        let (log, _tmp, _guard) = isolated_logger();
        let mut config = InstallerConfig::default();
        config.paths.prefix = "/nonexistent/usr".into();

        let json: serde_json::Value =
            serde_json::from_str(&install_plan_json(&setup(config), &log).unwrap()).unwrap();
        assert_eq!(json["targets"][0]["source"], "bin/*");
        assert_eq!(json["targets"][1]["source"], "sbin/*");
        assert!(json["permissions"].as_array().unwrap().len() >= 3);
    }
}
