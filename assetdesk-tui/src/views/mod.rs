//! View rendering dispatch.

pub mod assets;
pub mod branches;
pub mod dashboard;
pub mod helpers;
pub mod login;
pub mod modal;
pub mod transfers;
pub mod users;

pub use helpers::{centered_rect, format_lkr, load, two_column, Load};

use crate::nav::Page;
use crate::state::{App, Screen};
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    if app.screen == Screen::Login {
        login::render(f, app, f.size());
        render_toast_overlay(f, app);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.page {
        Page::Dashboard => dashboard::render(f, app, layout[1]),
        Page::Assets => assets::render_all(f, app, layout[1]),
        Page::Branches => branches::render(f, app, layout[1]),
        Page::BranchAssets(_) => assets::render_branch(f, app, layout[1]),
        Page::Transfers => transfers::render(f, app, layout[1]),
        Page::Users => users::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.modal.is_open() {
        modal::render(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let who = match app.current_user() {
        Some(user) => format!("{} ({}) | {}", user.name, user.role, user.branch_label()),
        None => "Signed out".to_string(),
    };
    let title = format!("AssetDesk | {}", who);

    let tabs = Page::tabs(app.can_manage_users());
    let titles: Vec<Line> = tabs.iter().map(|p| Line::from(p.title())).collect();
    let selected = tabs.iter().position(|p| p.index() == app.page.index()).unwrap_or(0);

    let widget = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            title,
            Style::default().fg(app.theme.primary),
        )));
    f.render_widget(widget, area);
}

fn help_text(app: &App) -> &'static str {
    if app.search.is_some() {
        return "type to filter • Enter keep • Esc clear";
    }
    match app.page {
        Page::Dashboard => "Tab/1-5 pages • Ctrl-r refresh • P password • L logout • q quit",
        Page::Assets => {
            "j/k move • / search • f status • c category • s sort • n new • e edit • d dispose • r restore • t transfer • h history • o export • q quit"
        }
        Page::BranchAssets(_) => {
            "j/k move • / search • f status • c category • s sort • n new • e edit • d dispose • r restore • t transfer • h history • o export • Esc back"
        }
        Page::Branches => "j/k move • / search • Enter open • n new • e edit • d delete • q quit",
        Page::Transfers => "j/k move • f status • a approve • x reject • q quit",
        Page::Users => "j/k move • / search • c role • n new • e role • d delete • q quit",
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(search) = &app.search {
        let text = format!("Search: {}", search.raw_value("search"));
        let footer = Paragraph::new(text)
            .style(Style::default().fg(app.theme.tertiary))
            .block(Block::default().borders(Borders::ALL).title(help_text(app)));
        f.render_widget(footer, area);
        return;
    }

    let (text, style) = if let Some(note) = app.toasts.latest() {
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (help_text(app).to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

/// Toasts on the login screen sit in the bottom row.
fn render_toast_overlay(f: &mut Frame<'_>, app: &App) {
    let Some(note) = app.toasts.latest() else {
        return;
    };
    let size = f.size();
    if size.height == 0 {
        return;
    }
    let area = Rect::new(size.x, size.y + size.height - 1, size.width, 1);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(format!("{}: {}", note.level.label(), note.message))
            .style(Style::default().fg(notification_color(note.level, &app.theme))),
        area,
    );
}
