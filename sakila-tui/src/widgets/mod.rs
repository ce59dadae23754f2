//! Reusable widgets.

pub mod detail;
pub mod form;
pub mod pager;
pub mod search;

pub use detail::DetailPanel;
pub use form::FormView;
pub use pager::Pager;
pub use search::{CategoryOption, SearchBar};
