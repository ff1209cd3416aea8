//! Sign-in screen.

use crate::state::App;
use crate::views::helpers::centered_rect;
use crate::widgets::FormPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let boxed = centered_rect(60, 11, area);
    let block = Block::default()
        .title(Span::styled(
            "AssetDesk | Sign in",
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));
    let inner = block.inner(boxed);
    f.render_widget(block, boxed);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("Asset management for every branch").style(Style::default().fg(app.theme.text_dim)),
        rows[0],
    );

    FormPanel {
        form: &app.login.form,
        label_style: Style::default().fg(app.theme.text_dim),
        focus_style: Style::default().fg(app.theme.primary),
        input_style: Style::default().fg(app.theme.text),
        locked: app.login.submitting,
    }
    .render(f, rows[1]);

    let status = if app.login.submitting {
        Line::from(Span::styled("Signing in...", Style::default().fg(app.theme.info)))
    } else if let Some(error) = &app.login.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(app.theme.error)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), rows[3]);

    f.render_widget(
        Paragraph::new("Tab next field • Enter sign in • Esc quit")
            .style(Style::default().fg(app.theme.text_muted)),
        rows[4],
    );
}
