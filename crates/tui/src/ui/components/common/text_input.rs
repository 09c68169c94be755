//! UTF-8 safe single-line text input with cursor management.
//!
//! Used for the directory fields of the definitions view. The cursor is a
//! byte index that always sits on a character boundary.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    cursor: usize,
}

impl TextInputState {
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True when the value is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Replace the value and move the cursor to its end.
    #[cfg(test)]
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    /// Number of characters before the cursor, used for cursor placement.
    pub fn cursor_columns(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the character immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - previous.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            let end = self.cursor + next.len_utf8();
            self.input.drain(self.cursor..end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::default();
        st.set_input("dätä");
        st.move_home();
        st.move_right();
        st.move_right();
        st.backspace();
        assert_eq!(st.input(), "dtä");
        st.insert_char('ø');
        assert_eq!(st.input(), "døtä");
        assert_eq!(st.cursor_columns(), 2);
        st.move_end();
        st.move_left();
        st.delete();
        assert_eq!(st.input(), "døt");
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let mut st = TextInputState::default();
        assert!(st.is_blank());
        st.set_input("   ");
        assert!(st.is_blank());
        st.set_input(" in/");
        assert!(!st.is_blank());
    }
}
