//! Layout and formatting helpers shared by the views.

use assetdesk_client::ApiError;
use assetdesk_core::Timestamp;
use assetdesk_query::{QueryError, QueryObserver};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

/// What a list can show for one subscription.
pub enum Load<T> {
    /// Not subscribed, or the first fetch is still running.
    Waiting,
    /// The first fetch failed; there is nothing to fall back on.
    Failed(String),
    /// Data to show, plus the error of the latest refetch if it failed.
    Ready(Arc<T>, Option<String>),
}

pub fn error_text(err: &QueryError) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => api_err.user_message(),
        None => err.to_string(),
    }
}

pub fn load<T: Send + Sync + 'static>(observer: &Option<QueryObserver<T>>) -> Load<T> {
    let Some(observer) = observer else {
        return Load::Waiting;
    };
    let state = observer.state();
    let error = state.error.as_ref().map(error_text);
    match (state.data, error) {
        (Some(data), error) => Load::Ready(data, error),
        (None, Some(error)) => Load::Failed(error),
        (None, None) => Load::Waiting,
    }
}

/// Two columns split at `left_percent`.
pub fn two_column(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let left_percent = left_percent.min(100);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// A `width_percent` wide, `height` tall box centred in `area`.
pub fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width_percent = width_percent.min(100);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

/// Bordered message used in place of a list that has nothing to show.
pub fn render_placeholder(f: &mut Frame<'_>, area: Rect, title: &str, message: &str, style: Style) {
    let widget = Paragraph::new(message.to_string())
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// `LKR 1,234.50`
pub fn format_lkr(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}LKR {}.{:02}", sign, grouped, cents % 100)
}

pub fn format_date(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lkr_groups_thousands() {
        assert_eq!(format_lkr(0.0), "LKR 0.00");
        assert_eq!(format_lkr(999.5), "LKR 999.50");
        assert_eq!(format_lkr(1234.5), "LKR 1,234.50");
        assert_eq!(format_lkr(1_234_567.0), "LKR 1,234,567.00");
        assert_eq!(format_lkr(-2500.0), "-LKR 2,500.00");
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 10, area);
        assert_eq!(inner.height, 10);
        assert_eq!(inner.y, 15);
        assert!(inner.x + inner.width <= 100);

        let tall = centered_rect(60, 80, area);
        assert_eq!(tall.height, 40);
    }

    #[test]
    fn oversized_percentages_are_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        let (left, right) = two_column(area, 150);
        assert_eq!(left.width, 100);
        assert_eq!(right.width, 0);

        let wide = centered_rect(250, 10, area);
        assert_eq!(wide.height, 10);
        assert!(wide.x + wide.width <= 100);
    }

    #[test]
    fn blank_values_show_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Store")), "Store");
    }
}
