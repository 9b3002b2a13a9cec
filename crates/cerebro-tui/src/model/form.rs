//! Editable text fields and the login/signup forms built from them.

/// Single-line text input with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
    masked: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field whose contents render as bullets.
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Text as it should appear on screen.
    pub fn display(&self) -> String {
        if self.masked {
            "\u{2022}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn display_cursor(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    pub fn set(&mut self, text: &str) {
        self.value = text.to_string();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.next_boundary();
            self.value.drain(self.cursor..next);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.cursor
            + self.value[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub input: TextField,
}

/// A vertical stack of labelled fields with one focused.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

pub const USERNAME: &str = "Username";
pub const EMAIL: &str = "Email";
pub const PASSWORD: &str = "Password";

impl Form {
    pub fn login() -> Self {
        Self::with_fields(vec![
            FormField {
                label: USERNAME,
                input: TextField::new(),
            },
            FormField {
                label: PASSWORD,
                input: TextField::masked(),
            },
        ])
    }

    pub fn signup() -> Self {
        Self::with_fields(vec![
            FormField {
                label: USERNAME,
                input: TextField::new(),
            },
            FormField {
                label: EMAIL,
                input: TextField::new(),
            },
            FormField {
                label: PASSWORD,
                input: TextField::masked(),
            },
        ])
    }

    fn with_fields(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        &mut self.fields[self.focus].input
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Current text of the field with `label`, empty if there is none.
    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.input.value())
            .unwrap_or_default()
    }

    pub fn set(&mut self, label: &str, text: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.input.set(text);
        }
    }

    /// Wipe masked fields, keeping the rest.
    pub fn clear_secrets(&mut self) {
        for field in &mut self.fields {
            if field.input.is_masked() {
                field.input.clear();
            }
        }
    }

    pub fn focus_label(&mut self, label: &str) {
        if let Some(idx) = self.fields.iter().position(|f| f.label == label) {
            self.focus = idx;
        }
    }
}
