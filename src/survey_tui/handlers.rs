//! Common event handlers for the survey TUI
//!
//! Reusable key handling that screens call before their own bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::traits::{CursorMovement, FormHandler, Navigable, ScreenAction};

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Handle navigation keys for list-based widgets
    pub fn handle_navigation_keys<T: Navigable>(
        navigable: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Up => {
                navigable.navigate_up();
                Some(ScreenAction::None)
            }
            KeyCode::Down => {
                navigable.navigate_down();
                Some(ScreenAction::None)
            }
            KeyCode::Home => {
                navigable.navigate_to_first();
                Some(ScreenAction::None)
            }
            KeyCode::End => {
                navigable.navigate_to_last();
                Some(ScreenAction::None)
            }
            _ => None,
        }
    }

    /// Handle form navigation and text input
    pub fn handle_form_keys<T: FormHandler>(
        form: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Tab => {
                form.next_field();
                Some(ScreenAction::None)
            }
            KeyCode::BackTab => {
                form.previous_field();
                Some(ScreenAction::None)
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                form.handle_char_input(c);
                Some(ScreenAction::None)
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                Some(ScreenAction::None)
            }
            KeyCode::Delete => {
                form.handle_delete();
                Some(ScreenAction::None)
            }
            KeyCode::Left => {
                form.handle_cursor(CursorMovement::Left);
                Some(ScreenAction::None)
            }
            KeyCode::Right => {
                form.handle_cursor(CursorMovement::Right);
                Some(ScreenAction::None)
            }
            KeyCode::Home => {
                form.handle_cursor(CursorMovement::Start);
                Some(ScreenAction::None)
            }
            KeyCode::End => {
                form.handle_cursor(CursorMovement::End);
                Some(ScreenAction::None)
            }
            _ => None,
        }
    }

    /// Handle global application keys
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(ScreenAction::Quit)
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(ScreenAction::Submit)
            }
            KeyCode::Esc => Some(ScreenAction::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        current: usize,
        text: String,
        moves: Vec<CursorMovement>,
    }

    impl FormHandler for Recorder {
        fn get_current_field(&self) -> usize {
            self.current
        }

        fn set_current_field(&mut self, field: usize) {
            self.current = field;
        }

        fn get_field_count(&self) -> usize {
            3
        }

        fn handle_char_input(&mut self, c: char) {
            self.text.push(c);
        }

        fn handle_backspace(&mut self) {
            self.text.pop();
        }

        fn handle_delete(&mut self) {}

        fn handle_cursor(&mut self, movement: CursorMovement) {
            self.moves.push(movement);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_form_keys_wrap_focus() {
        let mut form = Recorder::default();
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::BackTab));
        assert_eq!(form.current, 2);
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Tab));
        assert_eq!(form.current, 0);
    }

    #[test]
    fn test_form_keys_edit_text_but_skip_control_chords() {
        let mut form = Recorder::default();
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Char('h')));
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Char('i')));
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Backspace));
        CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Home));
        let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(CommonKeyHandler::handle_form_keys(&mut form, chord), None);

        assert_eq!(form.text, "h");
        assert_eq!(form.moves, vec![CursorMovement::Start]);
    }

    #[test]
    fn test_global_keys() {
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(CommonKeyHandler::handle_global_keys(ctrl_s), Some(ScreenAction::Submit));
        assert_eq!(CommonKeyHandler::handle_global_keys(key(KeyCode::Esc)), Some(ScreenAction::Quit));
        assert_eq!(CommonKeyHandler::handle_global_keys(key(KeyCode::Char('s'))), None);
    }
}
