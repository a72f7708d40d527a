use crossterm::event::KeyCode;

/// Text buffer and cursor for the row field currently being edited.
pub struct FieldInputState {
    pub value: String,
    pub editing: bool,
    cursor: usize,
}

impl FieldInputState {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            editing: false,
            cursor: value.chars().count(),
        }
    }

    /// Start editing a different value, cursor at the end.
    pub fn load(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
        self.editing = true;
    }

    /// Apply a key. Returns true when the value changed.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        if !self.editing {
            return false;
        }

        match key {
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.chars().count() {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }

    pub fn get_display_string(&self) -> String {
        if !self.editing {
            return self.value.clone();
        }

        let at = self.byte_offset(self.cursor);
        format!("{}|{}", &self.value[..at], &self.value[at..])
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(value: &str) -> FieldInputState {
        let mut input = FieldInputState::new("");
        input.load(value);
        input
    }

    #[test]
    fn typing_appends_at_the_cursor() {
        let mut input = editing("2.5");
        assert!(input.handle_input(KeyCode::Char('0')));
        assert_eq!(input.value, "2.50");
        assert_eq!(input.get_display_string(), "2.50|");
    }

    #[test]
    fn cursor_moves_and_edits_in_place() {
        let mut input = editing("Wdget");
        input.handle_input(KeyCode::Home);
        input.handle_input(KeyCode::Right);
        input.handle_input(KeyCode::Char('i'));
        assert_eq!(input.value, "Widget");
        assert_eq!(input.get_display_string(), "Wi|dget");

        assert!(input.handle_input(KeyCode::Delete));
        assert_eq!(input.value, "Wiget");
        assert!(input.handle_input(KeyCode::Backspace));
        assert_eq!(input.value, "Wget");
    }

    #[test]
    fn backspace_at_start_changes_nothing() {
        let mut input = editing("1");
        input.handle_input(KeyCode::Home);
        assert!(!input.handle_input(KeyCode::Backspace));
        assert_eq!(input.value, "1");
    }

    #[test]
    fn multibyte_characters_are_edited_whole() {
        let mut input = editing("Café");
        assert!(input.handle_input(KeyCode::Backspace));
        assert_eq!(input.value, "Caf");
        input.handle_input(KeyCode::Char('é'));
        input.handle_input(KeyCode::Left);
        assert_eq!(input.get_display_string(), "Caf|é");
    }

    #[test]
    fn ignores_keys_when_not_editing() {
        let mut input = FieldInputState::new("3");
        assert!(!input.handle_input(KeyCode::Char('4')));
        assert_eq!(input.get_display_string(), "3");
    }
}
