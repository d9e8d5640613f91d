use crate::game_logic::{QuizSnapshot, SessionStatus};
use crate::session::QuizSessionHandle;
use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*};

const POLL_INTERVAL_MS: u64 = 50;

const CORRECT_BG: Color = Color::Green;
const WRONG_BG: Color = Color::Red;
const SELECTED_BG: Color = Color::Gray;

pub struct App {
    handle: QuizSessionHandle,
    snapshot: Option<QuizSnapshot>,
    should_quit: bool,
}

impl App {
    pub fn new(handle: QuizSessionHandle) -> Self {
        App {
            handle,
            snapshot: None,
            should_quit: false,
        }
    }

    pub async fn run_ui(&mut self, mut terminal: Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            match self.handle.snapshot().await {
                Some(snapshot) => self.snapshot = Some(snapshot),
                None => {
                    tracing::warn!("Quiz session stopped; closing UI");
                    break;
                }
            }

            terminal.draw(|f| self.draw_ui(f))?;

            if event::poll(std::time::Duration::from_millis(POLL_INTERVAL_MS))? {
                if let CrosstermEvent::Key(key_event) = event::read()? {
                    self.handle_key_event(key_event).await?;
                }
            }
        }
        Ok(())
    }

    async fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(());
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(());
        };

        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Down if snapshot.status == SessionStatus::Ready => {
                let option_count = snapshot
                    .question
                    .as_ref()
                    .map(|q| q.options.len())
                    .unwrap_or(0);
                if option_count > 0 {
                    let next = match (selected_position(snapshot), key_event.code) {
                        (None, _) => 0,
                        (Some(pos), KeyCode::Up) => (pos + option_count - 1) % option_count,
                        (Some(pos), _) => (pos + 1) % option_count,
                    };
                    self.handle.select_option_at(next).await?;
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(position) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.handle.select_option_at(position).await?;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match snapshot.status {
                SessionStatus::Ready => {
                    self.handle.submit().await?;
                }
                SessionStatus::Answered => {
                    self.handle.advance().await?;
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn draw_ui(&self, f: &mut Frame) {
        if let Some(snapshot) = &self.snapshot {
            render_snapshot(f, snapshot);
        }
    }
}

fn selected_position(snapshot: &QuizSnapshot) -> Option<usize> {
    let question = snapshot.question.as_ref()?;
    let selected = snapshot.selected_option.as_deref()?;
    question.options.iter().position(|option| option == selected)
}

/// Draws whichever screen matches the snapshot's status.
pub fn render_snapshot(f: &mut Frame, snapshot: &QuizSnapshot) {
    let area = f.area();
    match snapshot.status {
        SessionStatus::Loading => draw_centered(f, area, vec![Line::from("Loading...")], "Trivia"),
        SessionStatus::Failed => {
            let mut lines = vec![
                Line::from("No questions available.").bold(),
                Line::from(""),
            ];
            if let Some(reason) = &snapshot.failure {
                lines.push(Line::from(reason.clone()).dim());
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Press q to quit"));
            draw_centered(f, area, lines, "Trivia");
        }
        SessionStatus::Complete => {
            let mut lines = vec![Line::from("Results").bold(), Line::from("")];
            if let Some(summary) = &snapshot.summary {
                lines.extend(summary.lines().into_iter().map(Line::from));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Press q to quit"));
            draw_centered(f, area, lines, "Results");
        }
        SessionStatus::Ready | SessionStatus::Answered => draw_question(f, area, snapshot),
    }
}

fn draw_centered(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>, title: &str) {
    let height = lines.len() as u16 + 2;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, middle);
}

fn draw_question(f: &mut Frame, area: Rect, snapshot: &QuizSnapshot) {
    let Some(question) = &snapshot.question else {
        return;
    };

    let layout = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .split(area);

    let mut meta = Vec::new();
    if let Some(category) = &question.category {
        meta.push(category.clone());
    }
    if let Some(difficulty) = &question.difficulty {
        meta.push(difficulty.clone());
    }
    let title = format!("Question {}/{}", snapshot.question_number(), snapshot.total);
    let prompt = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(format!("{}. ", snapshot.question_number())).bold(),
            Span::raw(question.prompt.clone()).bold(),
        ]),
        Line::from(meta.join(" · ")).dim(),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(prompt, layout[0]);

    let selected = snapshot.selected_option.as_deref();
    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = selected == Some(option.as_str());
            let style = if snapshot.is_submitted {
                if *option == question.correct_answer {
                    Style::default().bg(CORRECT_BG).fg(Color::White)
                } else if is_selected {
                    Style::default().bg(WRONG_BG)
                } else {
                    Style::default()
                }
            } else if is_selected {
                Style::default().bg(SELECTED_BG).fg(Color::Black)
            } else {
                Style::default()
            };
            ListItem::new(format!("{}) {}", i + 1, option)).style(style)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(list, layout[1]);

    let footer = match (&snapshot.feedback, snapshot.is_submitted) {
        (Some(feedback), true) => Line::from(vec![
            Span::raw(feedback.clone()).bold(),
            Span::raw("   [Enter] Next").dim(),
        ]),
        _ if selected.is_some() => Line::from("[↑/↓ or 1-9] Select   [Enter] Submit   [q] Quit"),
        _ => Line::from("[↑/↓ or 1-9] Select   [q] Quit"),
    };
    let footer = Paragraph::new(footer).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Score: {}", snapshot.score)),
    );
    f.render_widget(footer, layout[2]);
}
