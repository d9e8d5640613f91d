pub mod messages;
pub use messages::{QuizCommand, QuizEvent};

pub mod utils;

pub mod quiz;

pub use quiz::{QuizSession, QuizSnapshot, SessionStatus};
