//! AssetDesk TUI library exports.

pub mod config;
pub mod dialogs;
pub mod error;
pub mod events;
pub mod form;
pub mod keys;
pub mod logging;
pub mod modal;
pub mod mutations;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod queries;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
