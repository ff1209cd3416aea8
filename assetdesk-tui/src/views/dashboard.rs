//! Dashboard: headline counters and breakdown charts.

use crate::state::App;
use crate::views::helpers::{format_lkr, load, render_placeholder, Load};
use crate::widgets::CounterCard;
use assetdesk_core::ChartPoint;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{BarChart, Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (stats, stale_error) = match load(&app.dashboard.stats) {
        Load::Waiting => {
            render_placeholder(
                f,
                area,
                "Dashboard",
                "Loading dashboard...",
                Style::default().fg(app.theme.text_dim),
            );
            return;
        }
        Load::Failed(message) => {
            render_placeholder(
                f,
                area,
                "Dashboard",
                &format!("Could not load dashboard: {}", message),
                Style::default().fg(app.theme.error),
            );
            return;
        }
        Load::Ready(stats, error) => (stats, error),
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let counters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    let cards = [
        ("Total Assets", stats.total_assets, app.theme.primary),
        ("Pending Transfers", stats.pending_transfers, app.theme.warning),
        ("Branches", stats.total_branches, app.theme.secondary),
    ];
    for (i, (label, value, color)) in cards.into_iter().enumerate() {
        CounterCard {
            label,
            value,
            style: Style::default().fg(color),
        }
        .render(f, counters[i]);
    }

    let charts = stats.charts.clone().unwrap_or_default();
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(rows[1]);

    render_bars(f, app, body[0], "Assets by Category", &charts.assets_by_category);
    render_bars(f, app, body[1], "Assets by Status", &charts.assets_by_status);

    let mut value_title = "Value by Branch".to_string();
    if let Some(error) = stale_error {
        value_title = format!("{} | refresh failed: {}", value_title, error);
    }
    let items: Vec<ListItem> = charts
        .assets_value_by_branch
        .iter()
        .map(|point| ListItem::new(format!("{:<20} {}", point.name, format_lkr(point.value))))
        .collect();
    let list = List::new(items)
        .block(Block::default().title(value_title).borders(Borders::ALL))
        .style(Style::default().fg(app.theme.text));
    f.render_widget(list, body[2]);
}

fn render_bars(f: &mut Frame<'_>, app: &App, area: Rect, title: &str, points: &[ChartPoint]) {
    let data: Vec<(&str, u64)> = points
        .iter()
        .map(|p| (p.name.as_str(), p.value.max(0.0).round() as u64))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .data(data.as_slice())
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(app.theme.primary))
        .value_style(Style::default().fg(app.theme.bg).bg(app.theme.primary))
        .label_style(Style::default().fg(app.theme.text_dim));
    f.render_widget(chart, area);
}
