//! Event types for the event loop.

use crate::mutations::Mutation;
use assetdesk_client::{ApiError, Session};
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    LoginFinished(Result<Session, ApiError>),
    MutationFinished {
        ticket: u64,
        mutation: Mutation,
        result: Result<(), ApiError>,
    },
}
