//! Modal dialogs drawn over the current page.

use crate::dialogs::{ModalTarget, Subject};
use crate::modal::{ModalMode, ModalPhase, OpenModal};
use crate::state::App;
use crate::views::helpers::{centered_rect, format_date, load, or_dash, Load};
use crate::widgets::FormPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App) {
    let Some(open) = app.modal.current() else {
        return;
    };

    let body_height = match open.mode {
        ModalMode::AssetHistory => 16,
        _ if open.form.fields.is_empty() => 3,
        _ => u16::try_from(open.form.fields.len()).unwrap_or(u16::MAX).min(16),
    };
    // Borders, subject line, spacer, status line and hint.
    let area = centered_rect(70, body_height + 6, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            open.mode.title(),
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(subject_line(&open.target)).style(Style::default().fg(app.theme.secondary)),
        rows[0],
    );

    if open.mode == ModalMode::AssetHistory {
        render_history(f, app, rows[2]);
    } else if open.form.fields.is_empty() {
        f.render_widget(
            Paragraph::new(confirm_text(open.mode))
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(app.theme.text)),
            rows[2],
        );
    } else {
        FormPanel {
            form: &open.form,
            label_style: Style::default().fg(app.theme.text_dim),
            focus_style: Style::default().fg(app.theme.primary),
            input_style: Style::default().fg(app.theme.text),
            locked: open.phase == ModalPhase::Submitting,
        }
        .render(f, rows[2]);
    }

    f.render_widget(Paragraph::new(status_line(app, open)), rows[3]);

    let hint = if open.mode.is_read_only() {
        "Esc close"
    } else if open.form.fields.is_empty() {
        "Enter confirm • Esc cancel"
    } else {
        "Tab/Up/Down field • Left/Right choose • Enter save • Esc cancel"
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(app.theme.text_muted)),
        rows[4],
    );
}

fn subject_line(target: &ModalTarget) -> String {
    match &target.subject {
        Subject::New => String::new(),
        Subject::Asset(asset) => format!("{} | {} | {}", asset.asset_code, asset.name, asset.status),
        Subject::Branch(branch) => format!("{} | {}", branch.name, branch.location),
        Subject::Transfer(t) => format!(
            "{} ({}) | {} -> {}",
            t.asset.name, t.asset.asset_code, t.from_branch.name, t.to_branch.name
        ),
        Subject::User(user) => format!("{} | {} | {}", user.name, user.email, user.role),
        Subject::Account => "Your account".to_string(),
    }
}

fn confirm_text(mode: ModalMode) -> &'static str {
    match mode {
        ModalMode::RestoreAsset => "Restore this asset to active service?",
        ModalMode::DeleteBranch => {
            "Delete this branch? The server refuses if assets or staff are still assigned to it."
        }
        ModalMode::DeleteUser => "Delete this user? They will no longer be able to sign in.",
        _ => "Continue?",
    }
}

fn status_line(app: &App, open: &OpenModal<ModalTarget>) -> Line<'static> {
    if open.phase == ModalPhase::Submitting {
        return Line::from(Span::styled("Saving...", Style::default().fg(app.theme.info)));
    }
    match &open.error {
        Some(error) => Line::from(Span::styled(error.clone(), Style::default().fg(app.theme.error))),
        None => Line::from(""),
    }
}

fn render_history(f: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem> = match load(&app.history) {
        Load::Waiting => vec![ListItem::new("Loading history...")],
        Load::Failed(message) => vec![ListItem::new(Span::styled(
            format!("Could not load history: {}", message),
            Style::default().fg(app.theme.error),
        ))],
        Load::Ready(entries, _) if entries.is_empty() => vec![ListItem::new("No history recorded")],
        Load::Ready(entries, _) => entries
            .iter()
            .map(|entry| {
                let who = or_dash(entry.user.as_ref().map(|u| u.name.as_str()));
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{} ", format_date(&entry.created_at)),
                            Style::default().fg(app.theme.text_dim),
                        ),
                        Span::styled(
                            entry.action.to_string(),
                            Style::default().fg(app.theme.tertiary),
                        ),
                        Span::raw(format!(" by {}", who)),
                    ]),
                    Line::from(format!("  {}", or_dash(entry.details.as_deref()))),
                ])
            })
            .collect(),
    };
    f.render_widget(List::new(items), area);
}
