//! Branch list: head office pinned first, regional branches below.

use crate::state::App;
use crate::views::helpers::{format_date, load, render_placeholder, two_column, Load};
use crate::widgets::DetailPanel;
use assetdesk_core::split_branches;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (data, stale_error) = match load(&app.branches.branches) {
        Load::Waiting => {
            render_placeholder(
                f,
                area,
                "Branches",
                "Loading branches...",
                Style::default().fg(app.theme.text_dim),
            );
            return;
        }
        Load::Failed(message) => {
            render_placeholder(
                f,
                area,
                "Branches",
                &format!("Could not load branches: {}", message),
                Style::default().fg(app.theme.error),
            );
            return;
        }
        Load::Ready(data, error) => (data, error),
    };

    let split = split_branches(&data, &app.branches.search);
    let ordered = split.ordered();
    let (list_area, detail_area) = two_column(area, 60);

    let body: Vec<Row> = ordered
        .iter()
        .map(|branch| {
            let name_style = if branch.is_head_office() {
                Style::default().fg(app.theme.tertiary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Row::new(vec![
                Cell::from(Span::styled(branch.name.clone(), name_style)),
                Cell::from(branch.location.clone()),
                Cell::from(branch.asset_count().to_string()),
                Cell::from(branch.staff_count().to_string()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Name", "Location", "Assets", "Staff"])
        .style(Style::default().fg(app.theme.secondary).add_modifier(Modifier::BOLD));
    let widths = [
        ratatui::layout::Constraint::Percentage(35),
        ratatui::layout::Constraint::Percentage(35),
        ratatui::layout::Constraint::Length(8),
        ratatui::layout::Constraint::Length(8),
    ];

    let mut title = format!("Branches ({})", ordered.len());
    if !app.branches.search.is_empty() {
        title = format!("{} | search: {}", title, app.branches.search);
    }
    if let Some(error) = &stale_error {
        title = format!("{} | refresh failed: {}", title, error);
    }

    let mut state = TableState::default();
    if !ordered.is_empty() {
        state.select(Some(app.branches.selected.min(ordered.len() - 1)));
    }

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary).bg(app.theme.bg_highlight));
    f.render_stateful_widget(table, list_area, &mut state);

    let mut fields = Vec::new();
    if let Some(branch) = state.selected().and_then(|i| ordered.get(i)) {
        fields.push(("Name", branch.name.clone()));
        fields.push(("Location", branch.location.clone()));
        fields.push((
            "Kind",
            if branch.is_head_office() { "Head office" } else { "Regional" }.to_string(),
        ));
        fields.push(("Assets", branch.asset_count().to_string()));
        fields.push(("Staff", branch.staff_count().to_string()));
        fields.push(("Opened", format_date(&branch.created_at)));
    }
    DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
    }
    .render(f, detail_area);
}
