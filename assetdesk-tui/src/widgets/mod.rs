//! Widgets shared by the page views.

pub mod detail;
pub mod filter;
pub mod form;
pub mod status;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterOption};
pub use form::FormPanel;
pub use status::CounterCard;
