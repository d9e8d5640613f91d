use serde::{Deserialize, Serialize};

/// Commands the presentation layer may issue against a quiz session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "command", content = "payload")]
pub enum QuizCommand {
    SelectOption { answer: String },
    /// Select by position in the current question's option list.
    SelectOptionAt { position: usize },
    Submit,
    Advance,
}

/// Emitted by a transition that actually changed the session.
/// Guarded no-ops produce no event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event_type", content = "data")]
pub enum QuizEvent {
    QuestionsLoaded {
        total: usize,
    },
    LoadFailed {
        reason: String,
    },
    OptionSelected {
        index: usize,
        answer: String,
    },
    AnswerSubmitted {
        index: usize,
        correct: bool,
        feedback: String,
        score: u32,
    },
    QuestionChanged {
        index: usize,
    },
    QuizCompleted {
        score: u32,
        total: usize,
    },
}

impl QuizEvent {
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::QuestionsLoaded { .. } => "QuestionsLoaded",
            QuizEvent::LoadFailed { .. } => "LoadFailed",
            QuizEvent::OptionSelected { .. } => "OptionSelected",
            QuizEvent::AnswerSubmitted { .. } => "AnswerSubmitted",
            QuizEvent::QuestionChanged { .. } => "QuestionChanged",
            QuizEvent::QuizCompleted { .. } => "QuizCompleted",
        }
    }
}
