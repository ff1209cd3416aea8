//! User administration. Only reachable for roles that manage users.

use crate::state::App;
use crate::theme::role_color;
use crate::views::helpers::{format_date, load, render_placeholder, two_column, Load};
use crate::widgets::{DetailPanel, FilterBar, FilterOption};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filter = &app.users.filter;
    let options = vec![
        FilterOption::new(
            format!("Role: {}", filter.role.map(|r| r.to_string()).unwrap_or_else(|| "All".to_string())),
            filter.role.is_some(),
        ),
        FilterOption::new(
            format!("Search: {}", if filter.search.is_empty() { "-" } else { filter.search.as_str() }),
            !filter.search.is_empty(),
        ),
    ];
    FilterBar {
        title: "Filters",
        filters: &options,
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, chunks[0]);

    let (data, stale_error) = match load(&app.users.users) {
        Load::Waiting => {
            render_placeholder(
                f,
                chunks[1],
                "Users",
                "Loading users...",
                Style::default().fg(app.theme.text_dim),
            );
            return;
        }
        Load::Failed(message) => {
            render_placeholder(
                f,
                chunks[1],
                "Users",
                &format!("Could not load users: {}", message),
                Style::default().fg(app.theme.error),
            );
            return;
        }
        Load::Ready(data, error) => (data, error),
    };

    let rows = filter.apply(&data);
    let (list_area, detail_area) = two_column(chunks[1], 65);

    let body: Vec<Row> = rows
        .iter()
        .map(|user| {
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.email.clone()),
                Cell::from(Span::styled(
                    user.role.to_string(),
                    Style::default().fg(role_color(user.role, &app.theme)),
                )),
                Cell::from(user.branch_label().to_string()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Name", "Email", "Role", "Branch"])
        .style(Style::default().fg(app.theme.secondary).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Length(15),
        Constraint::Percentage(20),
    ];

    let mut title = format!("Users ({})", rows.len());
    if let Some(error) = &stale_error {
        title = format!("{} | refresh failed: {}", title, error);
    }

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(app.users.selected.min(rows.len() - 1)));
    }

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary).bg(app.theme.bg_highlight));
    f.render_stateful_widget(table, list_area, &mut state);

    let mut fields = Vec::new();
    if let Some(user) = state.selected().and_then(|i| rows.get(i)) {
        fields.push(("Name", user.name.clone()));
        fields.push(("Email", user.email.clone()));
        fields.push(("Role", user.role.to_string()));
        fields.push(("Branch", user.branch_label().to_string()));
        fields.push(("Joined", format_date(&user.created_at)));
    }
    DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
    }
    .render(f, detail_area);
}
