//! Single-screen input forms built from `tui-textarea` fields.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Style;
use tui_textarea::TextArea;

#[derive(Clone)]
pub enum FieldInput {
    Text(TextArea<'static>),
    /// Cycled with Left/Right/Space.
    Choice { options: Vec<String>, selected: usize },
}

#[derive(Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    /// Display text: the first line of a text field or the chosen option.
    pub fn display(&self) -> String {
        match &self.input {
            FieldInput::Text(area) => area.lines().first().cloned().unwrap_or_default(),
            FieldInput::Choice { options, selected } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, label: &'static str, initial: &str) -> Self {
        let mut area = TextArea::new(vec![initial.to_string()]);
        area.set_cursor_line_style(Style::default());
        area.move_cursor(tui_textarea::CursorMove::End);
        self.fields.push(FormField {
            key,
            label,
            input: FieldInput::Text(area),
        });
        self
    }

    pub fn secret(mut self, key: &'static str, label: &'static str) -> Self {
        let mut area = TextArea::default();
        area.set_cursor_line_style(Style::default());
        area.set_mask_char('\u{2022}');
        self.fields.push(FormField {
            key,
            label,
            input: FieldInput::Text(area),
        });
        self
    }

    pub fn choice(
        mut self,
        key: &'static str,
        label: &'static str,
        options: Vec<String>,
        selected: usize,
    ) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        self.fields.push(FormField {
            key,
            label,
            input: FieldInput::Choice { options, selected },
        });
        self
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Trimmed value of a field, empty when the key is unknown.
    pub fn value(&self, key: &str) -> String {
        self.field(key)
            .map(|f| f.display().trim().to_string())
            .unwrap_or_default()
    }

    /// Value exactly as typed. Used for passwords.
    pub fn raw_value(&self, key: &str) -> String {
        self.field(key).map(|f| f.display()).unwrap_or_default()
    }

    /// `None` for an empty field.
    pub fn optional(&self, key: &str) -> Option<String> {
        Some(self.value(key)).filter(|v| !v.is_empty())
    }

    pub fn selected(&self, key: &str) -> Option<usize> {
        match self.field(key).map(|f| &f.input) {
            Some(FieldInput::Choice { selected, options }) if !options.is_empty() => {
                Some(*selected)
            }
            _ => None,
        }
    }

    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(FormField {
            input: FieldInput::Text(area),
            ..
        }) = self.fields.iter_mut().find(|f| f.key == key)
        {
            let mask = area.mask_char();
            let mut fresh = TextArea::new(vec![value.to_string()]);
            fresh.set_cursor_line_style(Style::default());
            if let Some(mask) = mask {
                fresh.set_mask_char(mask);
            }
            fresh.move_cursor(tui_textarea::CursorMove::End);
            *area = fresh;
        }
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(|f| f.key)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 {
                self.fields.len() - 1
            } else {
                self.focus - 1
            };
        }
    }

    /// Feeds a key to the focused field. Returns true when its value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        match &mut field.input {
            FieldInput::Text(area) => area.input(key),
            FieldInput::Choice { options, selected } => {
                if options.is_empty() {
                    return false;
                }
                match key.code {
                    KeyCode::Right | KeyCode::Char(' ') => {
                        *selected = (*selected + 1) % options.len();
                        true
                    }
                    KeyCode::Left => {
                        *selected = if *selected == 0 {
                            options.len() - 1
                        } else {
                            *selected - 1
                        };
                        true
                    }
                    _ => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn type_str(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_focused_field() {
        let mut form = Form::new().text("name", "Name", "").text("location", "Location", "");
        type_str(&mut form, "Kandy");
        form.focus_next();
        type_str(&mut form, " Hill St ");
        assert_eq!(form.value("name"), "Kandy");
        assert_eq!(form.value("location"), "Hill St");
        assert_eq!(form.optional("missing"), None);
    }

    #[test]
    fn initial_text_is_editable() {
        let mut form = Form::new().text("name", "Name", "Desk");
        form.handle_key(press(KeyCode::Backspace));
        assert_eq!(form.value("name"), "Des");
    }

    #[test]
    fn choice_cycles_both_ways() {
        let options = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut form = Form::new().choice("role", "Role", options, 0);
        form.handle_key(press(KeyCode::Left));
        assert_eq!(form.value("role"), "C");
        form.handle_key(press(KeyCode::Right));
        assert_eq!(form.selected("role"), Some(0));
        assert!(!form.handle_key(press(KeyCode::Char('x'))));
    }

    #[test]
    fn focus_wraps() {
        let mut form = Form::new().text("a", "A", "").secret("b", "B");
        form.focus_prev();
        assert_eq!(form.focused_key(), Some("b"));
        form.focus_next();
        assert_eq!(form.focused_key(), Some("a"));
    }

    #[test]
    fn secret_keeps_raw_value() {
        let mut form = Form::new().secret("password", "Password");
        type_str(&mut form, " pw ");
        assert_eq!(form.raw_value("password"), " pw ");
        form.set_text("password", "reset");
        assert_eq!(form.raw_value("password"), "reset");
    }
}
