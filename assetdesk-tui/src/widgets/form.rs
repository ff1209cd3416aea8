//! Form panel: one row per field, label on the left, input on the right.

use crate::form::{FieldInput, Form};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

pub struct FormPanel<'a> {
    pub form: &'a Form,
    pub label_style: Style,
    pub focus_style: Style,
    pub input_style: Style,
    /// Hides the cursor and focus marker, e.g. while a submit is in flight.
    pub locked: bool,
}

impl<'a> FormPanel<'a> {
    /// Rows needed to show every field.
    pub fn height(&self) -> u16 {
        u16::try_from(self.form.fields.len()).unwrap_or(u16::MAX)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let visible = usize::from(area.height).max(1);
        let start = self.form.focus.saturating_sub(visible - 1);

        for (row, (index, field)) in self
            .form
            .fields
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .enumerate()
        {
            let y = area.y + u16::try_from(row).unwrap_or(u16::MAX);
            let line = Rect::new(area.x, y, area.width, 1);
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(28), Constraint::Min(0)])
                .split(line);

            let focused = !self.locked && index == self.form.focus;
            let marker = if focused { "> " } else { "  " };
            let label_style = if focused { self.focus_style } else { self.label_style };
            f.render_widget(
                Paragraph::new(Span::styled(format!("{}{}", marker, field.label), label_style)),
                columns[0],
            );

            match &field.input {
                FieldInput::Text(area) => {
                    let mut area = area.clone();
                    area.set_style(self.input_style);
                    if !focused {
                        area.set_cursor_style(Style::default());
                    } else {
                        area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    f.render_widget(&area, columns[1]);
                }
                FieldInput::Choice { options, selected } => {
                    let value = options.get(*selected).map(String::as_str).unwrap_or("-");
                    let text = if focused {
                        format!("< {} >", value)
                    } else {
                        format!("  {}", value)
                    };
                    f.render_widget(
                        Paragraph::new(Span::styled(text, self.input_style)),
                        columns[1],
                    );
                }
            }
        }
    }
}
