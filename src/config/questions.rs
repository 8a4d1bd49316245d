//! Yes/no questions asked before installation.
use serde::Serialize;

use super::{Answers, YesNo};

/// Prompt shown for the update-check question.
pub const SOFTWARE_UPDATE_TEXT: &str = "Would you like to check for product updates on startup?";

/// Prompt shown for the usage-statistics question.
pub const DATA_COLLECTION_TEXT: &str = "Would you like to help make VMware software better by \
                                        sending anonymous system data and usage statistics to \
                                        VMware?";

/// Label of the help link attached to both questions.
const LEARN_MORE_LABEL: &str = "Learn More";

/// Whether a question is shown in the regular flow or only in custom mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionLevel {
    /// No previous answer; asked with the built-in default.
    Regular,
    /// A previous answer exists and becomes the default.
    Custom,
}

/// Kind of question understood by the transaction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionKind {
    /// A yes/no prompt.
    YesNo,
}

/// One question declaration handed to the transaction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Question kind.
    pub kind: QuestionKind,
    /// Answer key the response is recorded under.
    pub key: &'static str,
    /// Prompt text.
    pub text: &'static str,
    /// The engine may proceed without an answer.
    pub required: bool,
    /// Preselected answer.
    pub default: YesNo,
    /// Help link as a `[label, body]` pair.
    pub html: [String; 2],
    /// Presentation level.
    pub level: QuestionLevel,
}

impl Question {
    fn yes_no(key: &'static str, text: &'static str, previous: Option<YesNo>, help: &str) -> Self {
        let (default, level) = match previous {
            Some(answer) => (answer, QuestionLevel::Custom),
            None => (YesNo::Yes, QuestionLevel::Regular),
        };
        Self {
            kind: QuestionKind::YesNo,
            key,
            text,
            required: false,
            default,
            html: [LEARN_MORE_LABEL.to_string(), help.to_string()],
            level,
        }
    }
}

/// Build the two yes/no questions.
///
/// A previously recorded answer becomes the default at custom level;
/// otherwise the default is `yes` at regular level.
#[must_use]
pub fn initialize_questions(answers: &Answers, learn_more: &str) -> Vec<Question> {
    vec![
        Question::yes_no(
            "softwareUpdateEnabled",
            SOFTWARE_UPDATE_TEXT,
            answers.software_update_enabled,
            learn_more,
        ),
        Question::yes_no(
            "dataCollectionEnabled",
            DATA_COLLECTION_TEXT,
            answers.data_collection_enabled,
            learn_more,
        ),
    ]
}
