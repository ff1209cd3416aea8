//! Modal dialog state machine.
//!
//! At most one modal is open; opening another replaces it. A submission moves
//! the modal to `Submitting` and hands back a ticket. The async result is
//! matched against that ticket, so a late result for a modal that was closed
//! or replaced in the meantime is ignored.

use crate::form::Form;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    CreateAsset,
    EditAsset,
    DisposeAsset,
    RestoreAsset,
    TransferAsset,
    AssetHistory,
    ApproveTransfer,
    RejectTransfer,
    CreateBranch,
    EditBranch,
    DeleteBranch,
    CreateUser,
    EditRole,
    DeleteUser,
    ChangePassword,
}

impl ModalMode {
    pub fn title(&self) -> &'static str {
        match self {
            ModalMode::CreateAsset => "Add Asset",
            ModalMode::EditAsset => "Edit Asset",
            ModalMode::DisposeAsset => "Dispose Asset",
            ModalMode::RestoreAsset => "Restore Asset",
            ModalMode::TransferAsset => "Transfer Asset",
            ModalMode::AssetHistory => "Asset History",
            ModalMode::ApproveTransfer => "Approve Transfer",
            ModalMode::RejectTransfer => "Reject Transfer",
            ModalMode::CreateBranch => "Add Branch",
            ModalMode::EditBranch => "Edit Branch",
            ModalMode::DeleteBranch => "Delete Branch",
            ModalMode::CreateUser => "Add User",
            ModalMode::EditRole => "Change Role",
            ModalMode::DeleteUser => "Delete User",
            ModalMode::ChangePassword => "Change Password",
        }
    }

    /// Read-only modals have nothing to submit.
    pub fn is_read_only(&self) -> bool {
        matches!(self, ModalMode::AssetHistory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Editing,
    Submitting,
}

#[derive(Clone)]
pub struct OpenModal<T> {
    pub target: T,
    pub mode: ModalMode,
    pub phase: ModalPhase,
    /// Inline error shown under the form.
    pub error: Option<String>,
    pub form: Form,
    pub ticket: u64,
}

#[derive(Clone)]
pub enum ModalState<T> {
    Closed,
    Open(OpenModal<T>),
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<T> ModalState<T> {
    /// Opens a modal, discarding whatever was open.
    pub fn open(&mut self, target: T, mode: ModalMode, form: Form) -> u64 {
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        *self = ModalState::Open(OpenModal {
            target,
            mode,
            phase: ModalPhase::Editing,
            error: None,
            form,
            ticket,
        });
        ticket
    }

    /// Runs `build` on the current form. On success the modal moves to
    /// `Submitting` and the built value is returned with the ticket; on
    /// failure the message is shown inline and the modal stays editable.
    pub fn submit<R, E, F>(&mut self, build: F) -> Option<(u64, R)>
    where
        E: Display,
        F: FnOnce(&T, ModalMode, &Form) -> Result<R, E>,
    {
        let ModalState::Open(modal) = self else {
            return None;
        };
        if modal.phase != ModalPhase::Editing || modal.mode.is_read_only() {
            return None;
        }
        match build(&modal.target, modal.mode, &modal.form) {
            Ok(value) => {
                modal.phase = ModalPhase::Submitting;
                modal.error = None;
                Some((modal.ticket, value))
            }
            Err(err) => {
                modal.error = Some(err.to_string());
                None
            }
        }
    }

    /// Closes the modal if `ticket` is the submission in flight.
    pub fn succeed(&mut self, ticket: u64) -> bool {
        if self.in_flight(ticket) {
            *self = ModalState::Closed;
            true
        } else {
            false
        }
    }

    /// Returns to `Editing` with the error if `ticket` is the submission in flight.
    pub fn fail(&mut self, ticket: u64, message: impl Into<String>) -> bool {
        if !self.in_flight(ticket) {
            return false;
        }
        if let ModalState::Open(modal) = self {
            modal.phase = ModalPhase::Editing;
            modal.error = Some(message.into());
        }
        true
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    fn in_flight(&self, ticket: u64) -> bool {
        matches!(self, ModalState::Open(m) if m.ticket == ticket && m.phase == ModalPhase::Submitting)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ModalState::Open(m) if m.phase == ModalPhase::Submitting)
    }

    pub fn current(&self) -> Option<&OpenModal<T>> {
        match self {
            ModalState::Open(modal) => Some(modal),
            ModalState::Closed => None,
        }
    }

    /// The form, while it may still be edited.
    pub fn editable_form(&mut self) -> Option<&mut Form> {
        match self {
            ModalState::Open(modal) if modal.phase == ModalPhase::Editing => Some(&mut modal.form),
            _ => None,
        }
    }
}
