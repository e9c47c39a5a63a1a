//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::components::{StatusDisplay, StatusType};
use super::events::AppEvent;
use super::screens::SurveyScreen;
use super::traits::ScreenAction;
use super::ui::{popup_rect, Styles};
use crate::api::SubmitResponse;
use crate::config::Config;
use crate::errors::SurveyError;
use crate::questions::{PRIVACY_NOTICE, SURVEY_TITLE};

const KEY_HINTS: &str =
    " Tab/Shift+Tab: Move | ↑/↓: Option | Space: Choose | Ctrl+S: Submit | Esc: Quit ";

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    pub survey: SurveyScreen,
    pub status: StatusDisplay,
    pub should_quit: bool,
    submitter: Arc<dyn SubmitResponse>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config, submitter: Arc<dyn SubmitResponse>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            survey: SurveyScreen::new(),
            status: StatusDisplay::new().with_timestamps(),
            should_quit: false,
            submitter,
            events_tx,
            events_rx,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.status.set_info(format!("Responses go to {}", self.config.api_url));

        loop {
            terminal.draw(|f| self.draw(f))?;

            while let Ok(app_event) = self.events_rx.try_recv() {
                self.handle_app_event(app_event);
            }

            // Poll so submission results are picked up while no key is pressed
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Wait for the next background event
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c')
            && key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        let form = &mut self.survey.form;

        // Open dialogs capture the keyboard
        if form.error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                form.dismiss_error();
                let showing_error = self
                    .status
                    .get_current()
                    .map_or(false, |m| m.status_type == StatusType::Error);
                if showing_error {
                    self.status.clear();
                }
            }
            return;
        }
        if form.is_acknowledgement_open() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                form.dismiss_acknowledgement();
            }
            return;
        }
        if form.is_submitted() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.should_quit = true;
            }
            return;
        }
        if form.is_loading() {
            debug!("Ignoring key while submitting: {:?}", key.code);
            return;
        }

        let action = self.survey.handle_key_event(key);
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Submit => self.start_submission(),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
    }

    /// Validate the form and hand the snapshot to a background task
    fn start_submission(&mut self) {
        let snapshot = match self.survey.form.begin_submit() {
            Ok(snapshot) => snapshot,
            Err(SurveyError::Validation(e)) => {
                self.survey.focus_invalid(&e);
                self.status.set_error(e.to_string());
                return;
            }
            Err(e) => {
                self.status.set_warning(e.to_string());
                return;
            }
        };

        info!("Submitting survey response");
        self.status.set_loading("Submitting your response...".to_string());

        let submitter = Arc::clone(&self.submitter);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = submitter.submit_response(&snapshot).await;
            if events_tx.send(AppEvent::SubmissionFinished(result)).is_err() {
                warn!("Submission finished after the app closed");
            }
        });
    }

    /// Apply an event coming from a background task
    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::SubmissionFinished(result) => match self.survey.finish_submission(result) {
                Ok(_) => self
                    .status
                    .set_success("Your survey response has been successfully submitted.".to_string()),
                Err(e) => self.status.set_error(e.user_message()),
            },
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.survey.draw(f, chunks[1]);
        self.status.render_with_title(f, chunks[2], KEY_HINTS);

        let form = &self.survey.form;
        if form.is_loading() {
            self.draw_dialog(
                f,
                size,
                "Please wait",
                vec![Line::from("⟳ Submitting your response...")],
                Styles::warning(),
            );
        } else if let Some(error) = form.error() {
            self.draw_dialog(
                f,
                size,
                "Error",
                vec![
                    Line::from(Span::styled(error.to_string(), Styles::error())),
                    Line::from(""),
                    Line::from(Span::styled("[ Close: Enter ]", Styles::inactive())),
                ],
                Styles::error(),
            );
        } else if form.is_acknowledgement_open() {
            self.draw_dialog(
                f,
                size,
                "Thank you for taking our survey!",
                vec![
                    Line::from("Your survey response has been successfully submitted."),
                    Line::from(""),
                    Line::from(Span::styled("[ X: Enter ]", Styles::inactive())),
                ],
                Styles::title(),
            );
        }
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(Span::styled(SURVEY_TITLE, Styles::title())),
            Line::from(Span::styled(PRIVACY_NOTICE, Styles::inactive())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM).border_style(Styles::inactive_border()));

        f.render_widget(header, area);
    }

    fn draw_dialog(
        &self,
        f: &mut Frame,
        area: Rect,
        title: &str,
        lines: Vec<Line>,
        border: ratatui::style::Style,
    ) {
        let popup_area = popup_rect(60, lines.len() as u16 + 4, area);
        f.render_widget(Clear, popup_area);

        let dialog = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(title.to_string(), border))
                    .borders(Borders::ALL)
                    .border_style(border),
            );

        f.render_widget(dialog, popup_area);
    }
}
