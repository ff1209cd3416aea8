//! Dashboard counter card: a large figure with its caption as the border title.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct CounterCard<'a> {
    pub label: &'a str,
    pub value: u64,
    pub style: Style,
}

impl CounterCard<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        // Center the figure vertically inside the bordered area.
        let pad = area.height.saturating_sub(3) / 2;
        let mut lines = vec![Line::from(""); pad as usize];
        lines.push(Line::from(self.value.to_string()));
        let card = Paragraph::new(lines)
            .style(self.style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(self.label)
                    .borders(Borders::ALL)
                    .border_style(self.style),
            );
        f.render_widget(card, area);
    }
}
