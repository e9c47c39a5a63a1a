//! Survey screen: personal details, the twelve questions and a submit button

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::warn;

use crate::{
    errors::{SubmissionError, SurveyError, ValidationError},
    form::SurveyForm,
    models::{FieldName, SubmissionResult},
    questions::{question_count, question_for_field, QUESTIONS},
    survey_tui::{
        components::{ChoiceField, FormField},
        handlers::CommonKeyHandler,
        traits::{CursorMovement, FormHandler, Navigable, ScreenAction},
        ui::Styles,
    },
};

/// Focusable fields, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyField {
    Name,
    Email,
    Question(usize),
    SubmitButton,
}

impl SurveyField {
    pub fn at(index: usize) -> SurveyField {
        match index {
            0 => SurveyField::Name,
            1 => SurveyField::Email,
            i if i < 2 + question_count() => SurveyField::Question(i - 2),
            _ => SurveyField::SubmitButton,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            SurveyField::Name => 0,
            SurveyField::Email => 1,
            SurveyField::Question(i) => 2 + i,
            SurveyField::SubmitButton => 2 + question_count(),
        }
    }
}

pub struct SurveyScreen {
    pub form: SurveyForm,
    pub name_input: FormField,
    pub email_input: FormField,
    pub choices: Vec<ChoiceField>,
    pub current_field: usize,
    pub scroll_offset: usize,
}

impl Default for SurveyScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            form: SurveyForm::new(),
            name_input: FormField::new("Full Name").with_placeholder("Enter your full name here"),
            email_input: FormField::new("Email").with_placeholder("Enter your email address"),
            choices: QUESTIONS
                .iter()
                .enumerate()
                .map(|(i, q)| ChoiceField::new(i, q))
                .collect(),
            current_field: 0,
            scroll_offset: 0,
        };
        screen.update_field_focus();
        screen
    }

    pub fn focused(&self) -> SurveyField {
        SurveyField::at(self.current_field)
    }

    fn update_field_focus(&mut self) {
        let focused = self.focused();
        self.name_input.set_focus(focused == SurveyField::Name);
        self.email_input.set_focus(focused == SurveyField::Email);
        for choice in &mut self.choices {
            choice.set_focus(focused == SurveyField::Question(choice.question_index));
        }
    }

    fn text_input_mut(&mut self) -> Option<(FieldName, &mut FormField)> {
        match self.focused() {
            SurveyField::Name => Some((FieldName::Name, &mut self.name_input)),
            SurveyField::Email => Some((FieldName::Email, &mut self.email_input)),
            _ => None,
        }
    }

    /// Push the focused text input's value into the form
    fn sync_text_input(&mut self) {
        let Some((field, input)) = self.text_input_mut() else {
            return;
        };
        let value = input.value.clone();
        if let Err(e) = self.form.update_field(field, value) {
            warn!("Ignoring edit of {}: {}", field.as_str(), e);
        }
    }

    /// Reload widgets from the form after it changed underneath them
    pub fn sync_from_form(&mut self) {
        let state = self.form.state().clone();
        self.name_input.set_value(&state.name);
        self.email_input.set_value(&state.email);
        for choice in &mut self.choices {
            choice.cursor = self
                .form
                .selected_option(choice.question_index)
                .and_then(|o| choice.question.option_index(o))
                .unwrap_or(0);
        }
    }

    fn progress(&self) -> String {
        format!("Answered {}/{}", self.form.answered_questions(), question_count())
    }

    /// Choose the option under the cursor of question `index`
    fn choose_current(&mut self, index: usize) -> ScreenAction {
        let cursor = self.choices[index].cursor;
        match self.form.choose(index, cursor) {
            Ok(()) => {
                self.choices[index].validation_error = None;
                ScreenAction::SetStatus(self.progress())
            }
            Err(e) => ScreenAction::SetError(e.to_string()),
        }
    }

    /// Mark the field a validation error is about and move focus there
    pub fn focus_invalid(&mut self, error: &ValidationError) {
        let target = match error {
            ValidationError::MissingDemographics => {
                let field = if self.form.state().age.is_empty() {
                    FieldName::Age
                } else {
                    FieldName::Education
                };
                let index = question_for_field(field).map_or(0, |(i, _)| i);
                self.choices[index].validation_error = Some(error.to_string());
                SurveyField::Question(index)
            }
            ValidationError::MissingName => {
                self.name_input.validation_error = Some(error.to_string());
                SurveyField::Name
            }
            ValidationError::MissingEmail | ValidationError::InvalidEmail(_) => {
                self.email_input.validation_error = Some(error.to_string());
                SurveyField::Email
            }
        };
        self.set_current_field(target.position());
    }

    /// Apply the outcome of a submission started by the app
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionResult, SubmissionError>,
    ) -> Result<SubmissionResult, SurveyError> {
        let outcome = self.form.finish_submit(result);
        if outcome.is_ok() {
            self.name_input.clear();
            self.email_input.clear();
            for choice in &mut self.choices {
                choice.validation_error = None;
            }
            self.sync_from_form();
            self.set_current_field(0);
            self.scroll_offset = 0;
        }
        outcome
    }

    /// Handle key events for the survey screen
    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some(action) = CommonKeyHandler::handle_global_keys(key) {
            return action;
        }

        match self.focused() {
            SurveyField::Name | SurveyField::Email => {
                if key.code == KeyCode::Enter {
                    self.next_field();
                    return ScreenAction::None;
                }
                CommonKeyHandler::handle_form_keys(self, key).unwrap_or(ScreenAction::None)
            }
            SurveyField::Question(index) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => self.choose_current(index),
                KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                    let option = c as usize - '1' as usize;
                    if option < self.choices[index].get_item_count() {
                        self.choices[index].set_selected_index(Some(option));
                        self.choose_current(index)
                    } else {
                        ScreenAction::None
                    }
                }
                _ => {
                    if let Some(action) =
                        CommonKeyHandler::handle_navigation_keys(&mut self.choices[index], key)
                    {
                        return action;
                    }
                    CommonKeyHandler::handle_form_keys(self, key).unwrap_or(ScreenAction::None)
                }
            },
            SurveyField::SubmitButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => ScreenAction::Submit,
                _ => CommonKeyHandler::handle_form_keys(self, key).unwrap_or(ScreenAction::None),
            },
        }
    }

    fn field_height(&self, field: SurveyField, width: u16) -> u16 {
        match field {
            SurveyField::Name | SurveyField::Email | SurveyField::SubmitButton => 3,
            SurveyField::Question(i) => self.choices[i].height(width),
        }
    }

    /// Adjust `scroll_offset` so the focused field fits in `height` rows
    fn ensure_visible(&mut self, width: u16, height: u16) {
        if self.current_field < self.scroll_offset {
            self.scroll_offset = self.current_field;
        }
        while self.scroll_offset < self.current_field {
            let needed: u16 = (self.scroll_offset..=self.current_field)
                .map(|i| self.field_height(SurveyField::at(i), width))
                .sum();
            if needed <= height {
                break;
            }
            self.scroll_offset += 1;
        }
    }

    /// Draw the screen content
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        if self.form.is_submitted() {
            let thanks = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Thank you! You have already submitted the survey.",
                    Styles::title(),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
            f.render_widget(thanks, area);
            return;
        }

        self.ensure_visible(area.width, area.height);

        let mut y = area.y;
        let bottom = area.y + area.height;
        for index in self.scroll_offset..self.get_field_count() {
            let field = SurveyField::at(index);
            let wanted = self.field_height(field, area.width);
            let available = bottom.saturating_sub(y);
            if available < 3 {
                break;
            }
            let rect = Rect {
                x: area.x,
                y,
                width: area.width,
                height: wanted.min(available),
            };

            match field {
                SurveyField::Name => self.name_input.render(f, rect),
                SurveyField::Email => self.email_input.render(f, rect),
                SurveyField::Question(i) => {
                    let selected = self
                        .form
                        .selected_option(i)
                        .and_then(|o| QUESTIONS[i].option_index(o));
                    self.choices[i].render(f, rect, selected);
                }
                SurveyField::SubmitButton => self.render_submit_button(f, rect),
            }

            y += rect.height;
        }
    }

    fn render_submit_button(&self, f: &mut Frame, area: Rect) {
        let focused = self.focused() == SurveyField::SubmitButton;
        let (style, border) = if focused {
            (Styles::selected(), Styles::active_border())
        } else {
            (Styles::default(), Styles::inactive_border())
        };
        let button = Paragraph::new(Span::styled(" Submit Response ", style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(button, area);
    }
}

impl FormHandler for SurveyScreen {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.get_field_count() {
            self.current_field = field;
            self.update_field_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        SurveyField::SubmitButton.position() + 1
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some((_, input)) = self.text_input_mut() {
            input.insert_char(c);
            self.sync_text_input();
        }
    }

    fn handle_backspace(&mut self) {
        if let Some((_, input)) = self.text_input_mut() {
            input.delete_char();
            self.sync_text_input();
        }
    }

    fn handle_delete(&mut self) {
        if let Some((_, input)) = self.text_input_mut() {
            input.delete_char_forward();
            self.sync_text_input();
        }
    }

    fn handle_cursor(&mut self, movement: CursorMovement) {
        if let Some((_, input)) = self.text_input_mut() {
            match movement {
                CursorMovement::Left => input.move_cursor_left(),
                CursorMovement::Right => input.move_cursor_right(),
                CursorMovement::Start => input.move_cursor_to_start(),
                CursorMovement::End => input.move_cursor_to_end(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut SurveyScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_field_positions_round_trip() {
        for i in 0..15 {
            assert_eq!(SurveyField::at(i).position(), i);
        }
        assert_eq!(SurveyField::at(2), SurveyField::Question(0));
        assert_eq!(SurveyField::at(14), SurveyField::SubmitButton);
    }

    #[test]
    fn test_typing_updates_form() {
        let mut screen = SurveyScreen::new();
        type_text(&mut screen, "Jane Doe");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, "jane@example.comm");
        screen.handle_key_event(key(KeyCode::Backspace));

        assert_eq!(screen.form.state().name, "Jane Doe");
        assert_eq!(screen.form.state().email, "jane@example.com");
    }

    #[test]
    fn test_space_chooses_option_under_cursor() {
        let mut screen = SurveyScreen::new();
        screen.set_current_field(SurveyField::Question(0).position());
        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Down));
        let action = screen.handle_key_event(key(KeyCode::Char(' ')));

        assert_eq!(screen.form.state().age, "25-34");
        assert_eq!(action, ScreenAction::SetStatus("Answered 1/12".to_string()));

        // Choosing again replaces the answer
        screen.handle_key_event(key(KeyCode::Up));
        screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(screen.form.state().age, "18-24");
    }

    #[test]
    fn test_digit_shortcut_answers_indexed_question() {
        let mut screen = SurveyScreen::new();
        screen.set_current_field(SurveyField::Question(4).position());
        screen.handle_key_event(key(KeyCode::Char('2')));
        assert_eq!(screen.form.selected_option(4), Some("No"));

        assert_eq!(screen.handle_key_event(key(KeyCode::Char('9'))), ScreenAction::None);
        assert_eq!(screen.form.selected_option(4), Some("No"));
    }

    #[test]
    fn test_submit_button_and_ctrl_s_submit() {
        let mut screen = SurveyScreen::new();
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(screen.handle_key_event(ctrl_s), ScreenAction::Submit);

        screen.set_current_field(SurveyField::SubmitButton.position());
        assert_eq!(screen.handle_key_event(key(KeyCode::Enter)), ScreenAction::Submit);
    }

    #[test]
    fn test_focus_invalid_targets_missing_field() {
        let mut screen = SurveyScreen::new();
        screen.form.choose(0, 1).unwrap();
        screen.focus_invalid(&ValidationError::MissingDemographics);
        assert_eq!(screen.focused(), SurveyField::Question(1));
        assert!(screen.choices[1].validation_error.is_some());

        screen.focus_invalid(&ValidationError::InvalidEmail("x".to_string()));
        assert_eq!(screen.focused(), SurveyField::Email);
        assert!(screen.email_input.validation_error.is_some());
    }

    #[test]
    fn test_ensure_visible_scrolls_to_focus() {
        let mut screen = SurveyScreen::new();
        screen.set_current_field(SurveyField::SubmitButton.position());
        screen.ensure_visible(80, 20);
        assert!(screen.scroll_offset > 0);

        screen.set_current_field(0);
        screen.ensure_visible(80, 20);
        assert_eq!(screen.scroll_offset, 0);
    }

    #[test]
    fn test_finish_submission_resets_widgets() {
        let mut screen = SurveyScreen::new();
        type_text(&mut screen, "Jane Doe");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, "jane@example.com");
        screen.email_input.validation_error = Some("Email is required.".to_string());
        screen.form.choose(0, 2).unwrap();
        screen.form.choose(1, 2).unwrap();

        screen.form.begin_submit().unwrap();
        screen
            .finish_submission(Ok(SubmissionResult::named("Jane Doe")))
            .unwrap();

        assert!(screen.name_input.is_empty());
        assert!(screen.email_input.is_empty());
        assert!(screen.email_input.validation_error.is_none());
        assert_eq!(screen.choices[0].cursor, 0);
        assert!(screen.form.is_submitted());
    }
}
