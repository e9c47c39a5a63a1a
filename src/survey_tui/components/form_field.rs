//! Form field components for user input

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::questions::QuestionDefinition;
use crate::survey_tui::{
    traits::Navigable,
    ui::{wrap_text, Styles},
};

/// Single-line text input
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Replace the content and move the cursor to the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index();
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let display_text = if self.value.is_empty() && !self.placeholder.is_empty() {
            &self.placeholder
        } else {
            &self.value
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let title = if let Some(ref error) = self.validation_error {
            format!("{} - {}", self.label, error)
        } else {
            self.label.clone()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if self.value.is_empty() && !self.placeholder.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused {
            let column = self.value[..self.byte_index()].width() as u16;
            let cursor_x = area.x + 1 + column;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Single-choice question rendered as a radio group
#[derive(Debug, Clone)]
pub struct ChoiceField {
    pub question_index: usize,
    pub question: &'static QuestionDefinition,
    pub cursor: usize,
    pub is_focused: bool,
    pub validation_error: Option<String>,
}

impl ChoiceField {
    pub fn new(question_index: usize, question: &'static QuestionDefinition) -> Self {
        Self {
            question_index,
            question,
            cursor: 0,
            is_focused: false,
            validation_error: None,
        }
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn label_lines(&self, width: u16) -> Vec<String> {
        wrap_text(
            &self.question.label(self.question_index),
            width.saturating_sub(2) as usize,
        )
    }

    /// Rows needed to draw the whole group at `width` columns
    pub fn height(&self, width: u16) -> u16 {
        (self.label_lines(width).len() + self.question.options.len() + 2) as u16
    }

    /// Render the group; `selected` is the currently chosen option
    pub fn render(&self, f: &mut Frame, area: Rect, selected: Option<usize>) {
        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if let Some(ref error) = self.validation_error {
            block = block.title(Span::styled(error.clone(), Styles::error()));
        }

        let mut lines: Vec<Line> = self
            .label_lines(area.width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Styles::label())))
            .collect();

        for (i, option) in self.question.options.iter().enumerate() {
            let pointer = if self.is_focused && i == self.cursor { "›" } else { " " };
            let mark = if selected == Some(i) { "(•)" } else { "( )" };
            let style = if self.is_focused && i == self.cursor {
                Styles::selected()
            } else if selected == Some(i) {
                Styles::success()
            } else {
                Styles::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{} {} {}", pointer, mark, option),
                style,
            )));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Navigable for ChoiceField {
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { count - 1 } else { self.cursor - 1 };
    }

    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % count;
    }

    fn get_selected_index(&self) -> Option<usize> {
        Some(self.cursor)
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        if let Some(i) = index {
            if i < self.get_item_count() {
                self.cursor = i;
            }
        }
    }

    fn get_item_count(&self) -> usize {
        self.question.options.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QUESTIONS;

    #[test]
    fn test_text_editing_handles_multibyte_chars() {
        let mut field = FormField::new("Full Name").with_value("José");
        field.move_cursor_left();
        field.insert_char('e');
        assert_eq!(field.value, "Joseé");
        assert_eq!(field.cursor_position, 4);
        field.delete_char_forward();
        assert_eq!(field.value, "Jose");
        field.move_cursor_to_end();
        field.delete_char();
        assert_eq!(field.value, "Jos");
        field.move_cursor_to_start();
        field.delete_char_forward();
        assert_eq!(field.value, "os");
        assert_eq!(field.cursor_position, 0);
    }

    #[test]
    fn test_editing_clears_validation_error() {
        let mut field = FormField::new("Email");
        field.validation_error = Some("Email is required.".to_string());
        field.insert_char('a');
        assert!(field.validation_error.is_none());
        field.clear();
        assert!(field.is_empty());
    }

    #[test]
    fn test_choice_cursor_wraps() {
        let mut choice = ChoiceField::new(4, &QUESTIONS[4]);
        choice.navigate_up();
        assert_eq!(choice.cursor, 1);
        choice.navigate_down();
        assert_eq!(choice.cursor, 0);
        choice.set_selected_index(Some(9));
        assert_eq!(choice.cursor, 0);
        choice.navigate_to_last();
        assert_eq!(choice.get_selected_index(), Some(1));
    }

    #[test]
    fn test_choice_height_grows_with_wrapping() {
        let choice = ChoiceField::new(2, &QUESTIONS[2]);
        let wide = choice.height(200);
        let narrow = choice.height(30);
        assert_eq!(wide, 1 + 4 + 2);
        assert!(narrow > wide);
    }
}
