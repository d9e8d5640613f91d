use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::content::{QuestionSource, TriviaRecord};
use crate::error::{AppError, ProviderError, Result as AppResult};
use crate::game_logic::{QuizCommand, QuizEvent, QuizSession, QuizSnapshot};

#[derive(Debug)]
pub enum SessionMessage {
    Command {
        command: QuizCommand,
        respond_to: oneshot::Sender<Option<QuizEvent>>,
    },
    GetSnapshot {
        respond_to: oneshot::Sender<QuizSnapshot>,
    },
    Shutdown {
        respond_to: oneshot::Sender<()>,
    },
    InternalLoadFinished(Result<Vec<TriviaRecord>, ProviderError>),
}

/// Owns the quiz session; every mutation goes through its mailbox.
pub struct QuizSessionActor {
    receiver: mpsc::Receiver<SessionMessage>,
    session: QuizSession,
    fetch_task: Option<JoinHandle<()>>,
}

impl QuizSessionActor {
    fn new(receiver: mpsc::Receiver<SessionMessage>) -> Self {
        QuizSessionActor {
            receiver,
            session: QuizSession::new(),
            fetch_task: None,
        }
    }

    /// Issues the one and only question fetch. The task holds a weak sender, so
    /// a result arriving after teardown has nowhere to go and is dropped.
    fn start_fetch<S: QuestionSource>(
        &mut self,
        source: Arc<S>,
        self_sender: mpsc::WeakSender<SessionMessage>,
    ) {
        let task = tokio::spawn(async move {
            let result = source.fetch_questions().await;
            let Some(sender) = self_sender.upgrade() else {
                tracing::debug!("Quiz session torn down before questions arrived; discarding");
                return;
            };
            if sender
                .send(SessionMessage::InternalLoadFinished(result))
                .await
                .is_err()
            {
                tracing::debug!("Quiz session closed before questions arrived; discarding");
            }
        });
        self.fetch_task = Some(task);
    }

    #[tracing::instrument(skip(self, msg), fields(
        msg_type = %std::any::type_name_of_val(&msg)
    ))]
    fn handle_message(&mut self, msg: SessionMessage) -> bool {
        match msg {
            SessionMessage::Command {
                command,
                respond_to,
            } => {
                let event = self.session.apply(command.clone());
                match &event {
                    Some(event) => tracing::debug!(event = event.name(), "Quiz transition applied"),
                    None => tracing::trace!(?command, "Quiz command ignored in current phase"),
                }
                let _ = respond_to.send(event);
            }
            SessionMessage::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.session.snapshot());
            }
            SessionMessage::InternalLoadFinished(result) => {
                self.fetch_task = None;
                match result {
                    Ok(records) => {
                        self.session.load_records(records, &mut rand::thread_rng());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to load quiz questions");
                        self.session.load_failed(e.to_string());
                    }
                }
                tracing::debug!(status = ?self.session.phase().status(), "Question load handled");
            }
            SessionMessage::Shutdown { respond_to } => {
                self.abort_fetch();
                let _ = respond_to.send(());
                return true;
            }
        }
        false
    }

    fn abort_fetch(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            tracing::debug!("Aborting outstanding question fetch");
            task.abort();
        }
    }
}

#[tracing::instrument(skip(actor))]
pub async fn run_session_actor(mut actor: QuizSessionActor) {
    tracing::info!("Quiz session actor started");
    while let Some(msg) = actor.receiver.recv().await {
        if actor.handle_message(msg) {
            tracing::info!("Quiz session shutdown requested");
            break;
        }
    }
    actor.abort_fetch();
    tracing::info!("Quiz session actor stopped");
}

#[derive(Clone, Debug)]
pub struct QuizSessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl QuizSessionHandle {
    /// Spawns the session actor and kicks off the question fetch.
    pub fn spawn<S: QuestionSource>(source: Arc<S>, buffer_size: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut actor = QuizSessionActor::new(receiver);
        actor.start_fetch(source, sender.downgrade());
        tokio::spawn(run_session_actor(actor));
        Self { sender }
    }

    async fn command(&self, command: QuizCommand) -> AppResult<Option<QuizEvent>> {
        let (respond_to, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::Command {
                command,
                respond_to,
            })
            .await
            .map_err(|e| AppError::Session(format!("Failed to send command: {}", e)))?;
        rx.await
            .map_err(|e| AppError::Session(format!("Quiz session no response: {}", e)))
    }

    #[cfg(test)]
    pub async fn select_option(&self, answer: impl Into<String>) -> AppResult<Option<QuizEvent>> {
        self.command(QuizCommand::SelectOption {
            answer: answer.into(),
        })
        .await
    }

    pub async fn select_option_at(&self, position: usize) -> AppResult<Option<QuizEvent>> {
        self.command(QuizCommand::SelectOptionAt { position }).await
    }

    pub async fn submit(&self) -> AppResult<Option<QuizEvent>> {
        self.command(QuizCommand::Submit).await
    }

    pub async fn advance(&self) -> AppResult<Option<QuizEvent>> {
        self.command(QuizCommand::Advance).await
    }

    /// Returns `None` once the actor has gone away.
    pub async fn snapshot(&self) -> Option<QuizSnapshot> {
        let (respond_to, rx) = oneshot::channel();
        if self
            .sender
            .send(SessionMessage::GetSnapshot { respond_to })
            .await
            .is_err()
        {
            return None;
        }
        rx.await.ok()
    }

    pub async fn shutdown(&self) {
        let (respond_to, rx) = oneshot::channel();
        if self
            .sender
            .send(SessionMessage::Shutdown { respond_to })
            .await
            .is_err()
        {
            tracing::debug!("Quiz session already stopped");
            return;
        }
        let _ = rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::SessionStatus;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct StaticSource(Vec<TriviaRecord>);

    impl QuestionSource for StaticSource {
        async fn fetch_questions(&self) -> Result<Vec<TriviaRecord>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl QuestionSource for FailingSource {
        async fn fetch_questions(&self) -> Result<Vec<TriviaRecord>, ProviderError> {
            Err(ProviderError::Parse("unexpected end of input".to_string()))
        }
    }

    struct GatedSource {
        gate: Arc<Notify>,
        finished: Arc<AtomicBool>,
    }

    impl QuestionSource for GatedSource {
        async fn fetch_questions(&self) -> Result<Vec<TriviaRecord>, ProviderError> {
            self.gate.notified().await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(vec![record("Late?", "Yes", &["No"])])
        }
    }

    fn record(question: &str, correct: &str, incorrect: &[&str]) -> TriviaRecord {
        TriviaRecord {
            question: question.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
            category: Some("General Knowledge".to_string()),
            difficulty: Some("easy".to_string()),
            kind: Some("multiple".to_string()),
        }
    }

    async fn wait_for_status(handle: &QuizSessionHandle, status: SessionStatus) -> QuizSnapshot {
        for _ in 0..200 {
            let snapshot = handle.snapshot().await.expect("actor alive");
            if snapshot.status == status {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never reached {:?}", status);
    }

    #[tokio::test]
    async fn test_session_loads_and_plays_through() {
        let source = Arc::new(StaticSource(vec![
            record("What is 2+2?", "4", &["3", "5"]),
            record("Capital of Sweden?", "Stockholm", &["Oslo"]),
        ]));
        let handle = QuizSessionHandle::spawn(source, 8);

        let snapshot = wait_for_status(&handle, SessionStatus::Ready).await;
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.question.unwrap().prompt, "What is 2+2?");

        assert!(handle.submit().await.unwrap().is_none());
        assert!(handle.select_option("4").await.unwrap().is_some());
        let submitted = handle.submit().await.unwrap();
        assert!(matches!(
            submitted,
            Some(QuizEvent::AnswerSubmitted { correct: true, .. })
        ));
        assert!(handle.submit().await.unwrap().is_none());
        handle.advance().await.unwrap();

        handle.select_option("Oslo").await.unwrap();
        handle.submit().await.unwrap();
        let done = handle.advance().await.unwrap();
        assert_eq!(done, Some(QuizEvent::QuizCompleted { score: 1, total: 2 }));

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.is_complete);
        let summary = snapshot.summary.unwrap();
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_session_load_failure_reaches_terminal_state() {
        let handle = QuizSessionHandle::spawn(Arc::new(FailingSource), 8);

        let snapshot = wait_for_status(&handle, SessionStatus::Failed).await;
        assert_eq!(snapshot.total, 0);
        assert!(snapshot.question.is_none());
        assert!(snapshot.failure.unwrap().contains("unexpected end of input"));

        assert!(handle.select_option_at(0).await.unwrap().is_none());
        assert!(handle.advance().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shutdown_while_fetch_pending_discards_result() {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(AtomicBool::new(false));
        let handle = QuizSessionHandle::spawn(
            Arc::new(GatedSource {
                gate: gate.clone(),
                finished: finished.clone(),
            }),
            8,
        );

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Loading);

        handle.shutdown().await;
        gate.notify_waiters();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!finished.load(Ordering::SeqCst));
        assert!(handle.snapshot().await.is_none());
        assert!(handle.submit().await.is_err());
    }
}
