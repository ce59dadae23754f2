//! Sakila Core - records, backend trait and view state
//!
//! Everything here is independent of the terminal: the view states drive a
//! [`SakilaApi`] implementation and expose plain data for rendering.

pub mod api;
pub mod category;
pub mod error;
pub mod form;
pub mod home;
pub mod ids;
pub mod list;
pub mod pagination;
pub mod payload;
pub mod record;

pub use api::SakilaApi;
pub use category::{CustomerCategory, FilmCategory, SearchCategory};
pub use error::{ApiError, ApiResult, ValidationError};
pub use form::{FormBuffer, FormField};
pub use home::{HomePanel, HomeState};
pub use ids::{ActorId, CustomerId, FilmId, RecordId, RentalId};
pub use list::{
    Collection, Customers, Films, ListModal, ListViewState, RecordPage, SearchState, Selection,
    CUSTOMER_PAGE_SIZE,
};
pub use pagination::{page_window, total_pages, PageState, WINDOW_SIZE};
pub use payload::{
    is_open_rental, parse_customer_id, Ack, CustomerDetails, CustomerPage, CustomerPayload,
    RentalRequest,
};
pub use record::{Record, MISSING_FIELD};
