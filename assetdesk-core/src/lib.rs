//! AssetDesk Core - Domain Types
//!
//! Entities exchanged with the AssetDesk REST API plus the pure functions the
//! front end derives its lists from. No I/O apart from CSV export.

pub mod entities;
pub mod enums;
pub mod error;
pub mod export;
pub mod filter;
pub mod identity;
pub mod validation;

pub use entities::*;
pub use enums::{
    AssetStatus, EnumParseError, HistoryAction, TransferDecision, TransferStatus, UserRole,
};
pub use error::{ExportError, ValidationError};
pub use export::{assets_to_csv, export_file_name, write_assets_csv, CSV_HEADER};
pub use filter::{
    split_branches, total_value, AssetFilter, AssetSort, BranchSplit, StatusFilter,
    TransferFilter, UserFilter,
};
pub use identity::{AssetId, BranchId, EntityIdType, HistoryId, Timestamp, TransferId, UserId};
