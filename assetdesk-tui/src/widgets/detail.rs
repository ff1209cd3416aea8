//! Label/value panel shown beside every list.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    /// Style of the label column.
    pub style: Style,
}

impl DetailPanel<'_> {
    fn lines(&self) -> Vec<Line<'_>> {
        if self.fields.is_empty() {
            return vec![Line::from("Nothing selected")];
        }
        let width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        self.fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}  ", label, width = width), self.style),
                    Span::raw(value.as_str()),
                ])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title(self.title).borders(Borders::ALL);
        f.render_widget(
            Paragraph::new(self.lines()).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}
