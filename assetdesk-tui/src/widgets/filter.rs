//! One-line bar of filter chips; active chips are highlighted.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct FilterOption {
    pub label: String,
    pub active: bool,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, active: bool) -> Self {
        Self {
            label: label.into(),
            active,
        }
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterOption],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl FilterBar<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans = Vec::with_capacity(self.filters.len() * 2);
        for (i, chip) in self.filters.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.inactive_style));
            }
            let style = if chip.active {
                self.active_style.add_modifier(Modifier::BOLD)
            } else {
                self.inactive_style
            };
            spans.push(Span::styled(chip.label.as_str(), style));
        }
        let block = Block::default().title(self.title).borders(Borders::ALL);
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
