//! Color palette and the status colors drawn from it.

use crate::notifications::NotificationLevel;
use assetdesk_core::{AssetStatus, TransferStatus, UserRole};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border_focus: Color,
}

impl Theme {
    /// Dark slate background with teal accents.
    pub fn ledger() -> Self {
        let teal = Color::Rgb(45, 212, 191);
        Self {
            bg: Color::Rgb(15, 23, 42),
            bg_highlight: Color::Rgb(51, 65, 85),
            primary: teal,
            secondary: Color::Rgb(167, 139, 250),
            tertiary: Color::Rgb(251, 191, 36),
            success: Color::Rgb(74, 222, 128),
            warning: Color::Rgb(250, 204, 21),
            error: Color::Rgb(248, 113, 113),
            info: Color::Rgb(96, 165, 250),
            text: Color::Rgb(241, 245, 249),
            text_dim: Color::Rgb(148, 163, 184),
            text_muted: Color::Rgb(100, 116, 139),
            border_focus: teal,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ledger()
    }
}

pub fn asset_status_color(status: AssetStatus, theme: &Theme) -> Color {
    match status {
        AssetStatus::Active => theme.success,
        AssetStatus::InUse => theme.info,
        AssetStatus::Damaged => theme.warning,
        AssetStatus::Disposed => theme.text_muted,
    }
}

pub fn transfer_status_color(status: TransferStatus, theme: &Theme) -> Color {
    match status {
        TransferStatus::Pending => theme.tertiary,
        TransferStatus::Approved => theme.success,
        TransferStatus::Rejected => theme.error,
    }
}

pub fn role_color(role: UserRole, theme: &Theme) -> Color {
    match role {
        UserRole::SuperAdmin => theme.secondary,
        UserRole::Admin => theme.primary,
        UserRole::BranchManager => theme.tertiary,
        UserRole::Staff => theme.text_dim,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &Theme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
