use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::TriviaRecord;
use crate::game_logic::messages::{QuizCommand, QuizEvent};
use crate::game_logic::utils::{decode_html_entities, shuffle_options};

pub const FEEDBACK_CORRECT: &str = "Correct!";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    /// Correct plus incorrect answers, shuffled once at load time.
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Question {
    /// Builds a question from a provider record, decoding entities and
    /// shuffling the options.
    pub fn from_record<R: Rng + ?Sized>(record: TriviaRecord, rng: &mut R) -> Self {
        let prompt = decode_html_entities(&record.question);
        let correct_answer = decode_html_entities(&record.correct_answer);

        let mut choices = Vec::with_capacity(record.incorrect_answers.len() + 1);
        choices.push(correct_answer.clone());
        choices.extend(
            record
                .incorrect_answers
                .iter()
                .map(|answer| decode_html_entities(answer)),
        );

        if choices[1..].contains(&correct_answer) {
            tracing::warn!(
                question = %prompt,
                correct_answer = %correct_answer,
                "Provider listed the correct answer among the incorrect ones"
            );
        }

        Self {
            options: shuffle_options(&choices, rng),
            prompt,
            correct_answer,
            category: record.category.as_deref().map(decode_html_entities),
            difficulty: record.difficulty,
            kind: record.kind,
        }
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum QuizPhase {
    Loading,
    Ready {
        index: usize,
        selected: Option<String>,
    },
    Answered {
        index: usize,
        selected: String,
        correct: bool,
        feedback: String,
    },
    Complete,
    Failed {
        reason: String,
    },
}

/// Coarse phase tag for consumers that only need to branch on the screen to show.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready,
    Answered,
    Complete,
    Failed,
}

impl QuizPhase {
    pub fn status(&self) -> SessionStatus {
        match self {
            QuizPhase::Loading => SessionStatus::Loading,
            QuizPhase::Ready { .. } => SessionStatus::Ready,
            QuizPhase::Answered { .. } => SessionStatus::Answered,
            QuizPhase::Complete => SessionStatus::Complete,
            QuizPhase::Failed { .. } => SessionStatus::Failed,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub total: usize,
    pub correct: u32,
    pub incorrect: usize,
}

impl QuizSummary {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Total Questions: {}", self.total),
            format!("Correct Answers: {}", self.correct),
            format!("Incorrect Answers: {}", self.incorrect),
        ]
    }
}

/// Read-only view of the session for the presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub status: SessionStatus,
    pub total: usize,
    pub current_index: usize,
    pub score: u32,
    pub question: Option<Question>,
    pub selected_option: Option<String>,
    pub is_submitted: bool,
    pub is_complete: bool,
    pub feedback: Option<String>,
    pub summary: Option<QuizSummary>,
    pub failure: Option<String>,
}

impl QuizSnapshot {
    pub fn question_number(&self) -> usize {
        self.current_index + 1
    }
}

/// Single-player quiz session over a fixed batch of questions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    phase: QuizPhase,
    score: u32,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            phase: QuizPhase::Loading,
            score: 0,
        }
    }

    #[cfg(test)]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let mut session = Self::new();
        session.load_questions(questions);
        session
    }

    pub fn load_records<R: Rng + ?Sized>(
        &mut self,
        records: Vec<TriviaRecord>,
        rng: &mut R,
    ) -> Option<QuizEvent> {
        if self.phase != QuizPhase::Loading {
            return None;
        }
        let questions = records
            .into_iter()
            .map(|record| Question::from_record(record, &mut *rng))
            .collect();
        self.load_questions(questions)
    }

    pub fn load_questions(&mut self, questions: Vec<Question>) -> Option<QuizEvent> {
        if self.phase != QuizPhase::Loading {
            return None;
        }

        if questions.is_empty() {
            tracing::warn!("Question batch was empty");
            return self.load_failed("No questions!".to_string());
        }

        let total = questions.len();
        self.questions = questions;
        self.score = 0;
        self.phase = QuizPhase::Ready {
            index: 0,
            selected: None,
        };
        tracing::info!(questions.count = total, "Quiz session ready");
        Some(QuizEvent::QuestionsLoaded { total })
    }

    pub fn load_failed(&mut self, reason: String) -> Option<QuizEvent> {
        if self.phase != QuizPhase::Loading {
            return None;
        }
        self.questions.clear();
        self.phase = QuizPhase::Failed {
            reason: reason.clone(),
        };
        Some(QuizEvent::LoadFailed { reason })
    }

    pub fn apply(&mut self, command: QuizCommand) -> Option<QuizEvent> {
        match command {
            QuizCommand::SelectOption { answer } => self.select_option(&answer),
            QuizCommand::SelectOptionAt { position } => self.select_option_at(position),
            QuizCommand::Submit => self.submit(),
            QuizCommand::Advance => self.advance(),
        }
    }

    pub fn select_option(&mut self, answer: &str) -> Option<QuizEvent> {
        let QuizPhase::Ready { index, .. } = self.phase else {
            return None;
        };
        if !self.questions.get(index)?.has_option(answer) {
            tracing::debug!(answer = %answer, "Ignoring selection outside the current options");
            return None;
        }

        self.phase = QuizPhase::Ready {
            index,
            selected: Some(answer.to_string()),
        };
        Some(QuizEvent::OptionSelected {
            index,
            answer: answer.to_string(),
        })
    }

    pub fn select_option_at(&mut self, position: usize) -> Option<QuizEvent> {
        let QuizPhase::Ready { index, .. } = self.phase else {
            return None;
        };
        let answer = self.questions.get(index)?.options.get(position)?.clone();
        self.select_option(&answer)
    }

    pub fn submit(&mut self) -> Option<QuizEvent> {
        let QuizPhase::Ready {
            index,
            selected: Some(selected),
        } = &self.phase
        else {
            return None;
        };
        let index = *index;
        let selected = selected.clone();
        let question = self.questions.get(index)?;

        let correct = question.is_correct(&selected);
        let feedback = if correct {
            FEEDBACK_CORRECT.to_string()
        } else {
            format!("Wrong! The correct answer is {}", question.correct_answer)
        };
        if correct {
            self.score += 1;
        }

        tracing::debug!(
            question.index = index,
            answer.correct = correct,
            score = self.score,
            "Answer submitted"
        );

        self.phase = QuizPhase::Answered {
            index,
            selected,
            correct,
            feedback: feedback.clone(),
        };
        Some(QuizEvent::AnswerSubmitted {
            index,
            correct,
            feedback,
            score: self.score,
        })
    }

    pub fn advance(&mut self) -> Option<QuizEvent> {
        let QuizPhase::Answered { index, .. } = self.phase else {
            return None;
        };

        if index + 1 < self.questions.len() {
            self.phase = QuizPhase::Ready {
                index: index + 1,
                selected: None,
            };
            Some(QuizEvent::QuestionChanged { index: index + 1 })
        } else {
            self.phase = QuizPhase::Complete;
            tracing::info!(
                score = self.score,
                questions.count = self.questions.len(),
                "Quiz completed"
            );
            Some(QuizEvent::QuizCompleted {
                score: self.score,
                total: self.questions.len(),
            })
        }
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[cfg(test)]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Stays on the last question once complete.
    pub fn current_index(&self) -> usize {
        match &self.phase {
            QuizPhase::Ready { index, .. } | QuizPhase::Answered { index, .. } => *index,
            QuizPhase::Complete => self.questions.len().saturating_sub(1),
            QuizPhase::Loading | QuizPhase::Failed { .. } => 0,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            QuizPhase::Ready { index, .. } | QuizPhase::Answered { index, .. } => {
                self.questions.get(*index)
            }
            _ => None,
        }
    }

    pub fn selected_option(&self) -> Option<&str> {
        match &self.phase {
            QuizPhase::Ready { selected, .. } => selected.as_deref(),
            QuizPhase::Answered { selected, .. } => Some(selected.as_str()),
            _ => None,
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match &self.phase {
            QuizPhase::Answered { feedback, .. } => Some(feedback.as_str()),
            _ => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, QuizPhase::Answered { .. })
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    pub fn summary(&self) -> Option<QuizSummary> {
        if !self.is_complete() {
            return None;
        }
        let total = self.questions.len();
        Some(QuizSummary {
            total,
            correct: self.score,
            incorrect: total.saturating_sub(self.score as usize),
        })
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            status: self.phase.status(),
            total: self.total(),
            current_index: self.current_index(),
            score: self.score(),
            question: self.current_question().cloned(),
            selected_option: self.selected_option().map(str::to_string),
            is_submitted: self.is_submitted(),
            is_complete: self.is_complete(),
            feedback: self.feedback().map(str::to_string),
            summary: self.summary(),
            failure: match &self.phase {
                QuizPhase::Failed { reason } => Some(reason.clone()),
                _ => None,
            },
        }
    }
}
