//! Asset inventory views: all assets, and the assets of one branch.

use crate::state::{loaded, App};
use crate::theme::asset_status_color;
use crate::views::helpers::{format_date, format_lkr, load, or_dash, render_placeholder, two_column, Load};
use crate::widgets::{DetailPanel, FilterBar, FilterOption};
use assetdesk_core::{total_value, Asset, AssetFilter};
use assetdesk_query::QueryObserver;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

struct AssetTable<'a> {
    title: String,
    observer: &'a Option<QueryObserver<Vec<Asset>>>,
    filter: &'a AssetFilter,
    selected: usize,
    show_branch: bool,
}

pub fn render_all(f: &mut Frame<'_>, app: &App, area: Rect) {
    let table = AssetTable {
        title: "Assets".to_string(),
        observer: &app.assets.assets,
        filter: &app.assets.filter,
        selected: app.assets.selected,
        show_branch: true,
    };
    render_assets(f, app, area, table);
}

pub fn render_branch(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = match loaded(&app.branch_assets.branch) {
        Some(branch) => format!("{} - {}", branch.name, branch.location),
        None => "Branch".to_string(),
    };
    let table = AssetTable {
        title,
        observer: &app.branch_assets.assets,
        filter: &app.branch_assets.filter,
        selected: app.branch_assets.selected,
        show_branch: false,
    };
    render_assets(f, app, area, table);
}

fn render_assets(f: &mut Frame<'_>, app: &App, area: Rect, table: AssetTable<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (data, stale_error) = match load(table.observer) {
        Load::Waiting => {
            render_filters(f, app, chunks[0], table.filter, None);
            render_placeholder(
                f,
                chunks[1],
                &table.title,
                "Loading assets...",
                Style::default().fg(app.theme.text_dim),
            );
            return;
        }
        Load::Failed(message) => {
            render_filters(f, app, chunks[0], table.filter, None);
            render_placeholder(
                f,
                chunks[1],
                &table.title,
                &format!("Could not load assets: {}", message),
                Style::default().fg(app.theme.error),
            );
            return;
        }
        Load::Ready(data, error) => (data, error),
    };

    let rows = table.filter.apply(&data);
    render_filters(f, app, chunks[0], table.filter, Some(rows.as_slice()));

    let (list_area, detail_area) = two_column(chunks[1], 65);

    let header_cells = if table.show_branch {
        vec!["Code", "Name", "Category", "Status", "Branch", "Value"]
    } else {
        vec!["Code", "Name", "Category", "Status", "Location", "Value"]
    };
    let header = Row::new(header_cells)
        .style(Style::default().fg(app.theme.secondary).add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|asset| {
            let place = if table.show_branch {
                or_dash(asset.branch_name())
            } else {
                or_dash(asset.current_location.as_deref())
            };
            Row::new(vec![
                Cell::from(asset.asset_code.clone()),
                Cell::from(asset.name.clone()),
                Cell::from(asset.category.clone()),
                Cell::from(Span::styled(
                    asset.status.to_string(),
                    Style::default().fg(asset_status_color(asset.status, &app.theme)),
                )),
                Cell::from(place),
                Cell::from(format_lkr(asset.value)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(30),
        Constraint::Percentage(18),
        Constraint::Length(9),
        Constraint::Percentage(18),
        Constraint::Length(16),
    ];

    let mut title = format!("{} ({})", table.title, rows.len());
    if let Some(error) = &stale_error {
        title = format!("{} | refresh failed: {}", title, error);
    }
    let title_style = if stale_error.is_some() {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.primary)
    };

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(table.selected.min(rows.len() - 1)));
    }

    let widget = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .title(Span::styled(title, title_style))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().fg(app.theme.primary).bg(app.theme.bg_highlight));
    f.render_stateful_widget(widget, list_area, &mut state);

    let selected = state.selected().and_then(|i| rows.get(i).copied());
    render_detail(f, app, detail_area, selected);
}

fn render_filters(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    filter: &AssetFilter,
    rows: Option<&[&Asset]>,
) {
    let options = vec![
        FilterOption::new(format!("Status: {}", filter.status.label()), true),
        FilterOption::new(
            format!("Category: {}", filter.category.as_deref().unwrap_or("All")),
            filter.category.is_some(),
        ),
        FilterOption::new(format!("Sort: {}", filter.sort.label()), true),
        FilterOption::new(
            format!("Search: {}", if filter.search.is_empty() { "-" } else { filter.search.as_str() }),
            !filter.search.is_empty(),
        ),
    ];
    let title = match rows {
        Some(rows) => format!(
            "Filters | {} shown | total {}",
            rows.len(),
            format_lkr(total_value(rows.iter().copied()))
        ),
        None => "Filters".to_string(),
    };
    FilterBar {
        title: &title,
        filters: &options,
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, area);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect, asset: Option<&Asset>) {
    let mut fields = Vec::new();
    if let Some(asset) = asset {
        fields.push(("Code", asset.asset_code.clone()));
        fields.push(("Name", asset.name.clone()));
        fields.push(("Category", asset.category.clone()));
        fields.push(("Status", asset.status.to_string()));
        fields.push(("Branch", or_dash(asset.branch_name())));
        fields.push(("Quantity", asset.quantity.to_string()));
        fields.push(("Value", format_lkr(asset.value)));
        if let Some(price) = asset.purchase_price {
            fields.push(("Purchase Price", format_lkr(price)));
        }
        if let Some(price) = asset.revaluation_price {
            fields.push(("Reevaluation", format_lkr(price)));
        }
        fields.push(("Purchased", or_dash(asset.purchase_date.as_deref())));
        fields.push(("GRN", or_dash(asset.grn_number.as_deref())));
        fields.push(("Inventory Page", or_dash(asset.inventory_page_no.as_deref())));
        fields.push(("Location", or_dash(asset.current_location.as_deref())));
        fields.push(("New Section", or_dash(asset.new_section.as_deref())));
        if let Some(category) = &asset.board_of_survey_category {
            fields.push(("Survey Category", category.name.clone()));
        }
        if let Some(year) = &asset.board_of_survey_year {
            fields.push(("Survey Year", year.year.to_string()));
        }
        fields.push(("Remarks", or_dash(asset.remarks.as_deref())));
        fields.push(("Added", format_date(&asset.created_at)));
    }

    DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
    }
    .render(f, area);
}
