//! Transfer requests between branches.

use crate::state::App;
use crate::theme::transfer_status_color;
use crate::views::helpers::{format_date, load, or_dash, render_placeholder, two_column, Load};
use crate::widgets::{DetailPanel, FilterBar, FilterOption};
use assetdesk_core::TransferFilter;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

const FILTERS: [TransferFilter; 4] = [
    TransferFilter::All,
    TransferFilter::Pending,
    TransferFilter::Approved,
    TransferFilter::Rejected,
];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let options: Vec<FilterOption> = FILTERS
        .iter()
        .map(|filter| FilterOption::new(filter.label(), *filter == app.transfers.filter))
        .collect();
    FilterBar {
        title: "Status [f]",
        filters: &options,
        active_style: Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, chunks[0]);

    let (data, stale_error) = match load(&app.transfers.transfers) {
        Load::Waiting => {
            render_placeholder(
                f,
                chunks[1],
                "Transfers",
                "Loading transfers...",
                Style::default().fg(app.theme.text_dim),
            );
            return;
        }
        Load::Failed(message) => {
            render_placeholder(
                f,
                chunks[1],
                "Transfers",
                &format!("Could not load transfers: {}", message),
                Style::default().fg(app.theme.error),
            );
            return;
        }
        Load::Ready(data, error) => (data, error),
    };

    let rows = app.transfers.filter.apply(&data);
    let (list_area, detail_area) = two_column(chunks[1], 65);

    let body: Vec<Row> = rows
        .iter()
        .map(|transfer| {
            Row::new(vec![
                Cell::from(transfer.asset.asset_code.clone()),
                Cell::from(transfer.asset.name.clone()),
                Cell::from(transfer.from_branch.name.clone()),
                Cell::from(transfer.to_branch.name.clone()),
                Cell::from(Span::styled(
                    transfer.status.to_string(),
                    Style::default().fg(transfer_status_color(transfer.status, &app.theme)),
                )),
                Cell::from(format_date(&transfer.request_date)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Code", "Asset", "From", "To", "Status", "Requested"])
        .style(Style::default().fg(app.theme.secondary).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Length(9),
        Constraint::Length(11),
    ];

    let mut title = format!("Transfers ({})", rows.len());
    if let Some(error) = &stale_error {
        title = format!("{} | refresh failed: {}", title, error);
    }

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(app.transfers.selected.min(rows.len() - 1)));
    }

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary).bg(app.theme.bg_highlight));
    f.render_stateful_widget(table, list_area, &mut state);

    let mut fields = Vec::new();
    if let Some(transfer) = state.selected().and_then(|i| rows.get(i)) {
        fields.push(("Asset", format!("{} ({})", transfer.asset.name, transfer.asset.asset_code)));
        fields.push(("From", transfer.from_branch.name.clone()));
        fields.push(("To", transfer.to_branch.name.clone()));
        fields.push(("Status", transfer.status.to_string()));
        fields.push(("Requested", format_date(&transfer.request_date)));
        fields.push(("Reason", transfer.reason.clone()));
        fields.push(("Remarks", or_dash(transfer.remarks.as_deref())));
    }
    DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
    }
    .render(f, detail_area);
}
