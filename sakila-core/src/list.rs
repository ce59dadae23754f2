//! Paged, searchable list state shared by the Customer and Films pages.
//!
//! State is only written after a request succeeds; a rejected call leaves
//! every field as it was before the call.

use crate::api::SakilaApi;
use crate::category::{CustomerCategory, FilmCategory, SearchCategory};
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::form::FormBuffer;
use crate::ids::{CustomerId, FilmId, RecordId, RentalId};
use crate::pagination::PageState;
use crate::payload::{parse_customer_id, Ack, CustomerDetails, CustomerPayload, RentalRequest};
use crate::record::Record;
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Customers shown per page.
pub const CUSTOMER_PAGE_SIZE: u32 = 10;

/// One page of records as returned by a collection's listing endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total_pages: u32,
}

impl RecordPage {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total_pages: 1,
        }
    }
}

/// A remote collection a [`ListViewState`] can page through and search.
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    type Id: RecordId;
    type Category: SearchCategory;
    type Detail: Clone + fmt::Debug + Send + Sync;

    /// Name used in log events.
    const NAME: &'static str;
    /// Field carrying the record identifier.
    const ID_FIELD: &'static str;
    /// Whether the backend lists this collection page by page. Unpaged
    /// collections are reachable through search only.
    const PAGED: bool;
    const PAGE_SIZE: u32;

    async fn fetch_page(api: &dyn SakilaApi, page: u32, per_page: u32) -> ApiResult<RecordPage>;

    async fn search(
        api: &dyn SakilaApi,
        query: &str,
        category: Self::Category,
    ) -> ApiResult<Vec<Record>>;

    /// Nested data loaded when a record is opened for viewing. `None` means
    /// the record itself carries everything shown.
    async fn fetch_detail(api: &dyn SakilaApi, id: Self::Id) -> ApiResult<Option<Self::Detail>>;
}

/// Customer table: server-side pagination, detail = rental history.
#[derive(Debug, Clone, Copy, Default)]
pub struct Customers;

#[async_trait]
impl Collection for Customers {
    type Id = CustomerId;
    type Category = CustomerCategory;
    type Detail = CustomerDetails;

    const NAME: &'static str = "customers";
    const ID_FIELD: &'static str = "customer_id";
    const PAGED: bool = true;
    const PAGE_SIZE: u32 = CUSTOMER_PAGE_SIZE;

    async fn fetch_page(api: &dyn SakilaApi, page: u32, per_page: u32) -> ApiResult<RecordPage> {
        let response = api.display_customers(page, per_page).await?;
        Ok(RecordPage {
            records: response.customers,
            total_pages: response.total_pages,
        })
    }

    async fn search(
        api: &dyn SakilaApi,
        query: &str,
        category: CustomerCategory,
    ) -> ApiResult<Vec<Record>> {
        api.search_customers(query, category).await
    }

    async fn fetch_detail(api: &dyn SakilaApi, id: CustomerId) -> ApiResult<Option<CustomerDetails>> {
        api.customer_details(id).await.map(Some)
    }
}

/// Film cards: reachable through search only, details render inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Films;

#[async_trait]
impl Collection for Films {
    type Id = FilmId;
    type Category = FilmCategory;
    type Detail = ();

    const NAME: &'static str = "films";
    const ID_FIELD: &'static str = "film_id";
    const PAGED: bool = false;
    const PAGE_SIZE: u32 = 1;

    async fn fetch_page(_api: &dyn SakilaApi, _page: u32, _per_page: u32) -> ApiResult<RecordPage> {
        Ok(RecordPage::empty())
    }

    async fn search(
        api: &dyn SakilaApi,
        query: &str,
        category: FilmCategory,
    ) -> ApiResult<Vec<Record>> {
        api.search_films(query, category).await
    }

    async fn fetch_detail(_api: &dyn SakilaApi, _id: FilmId) -> ApiResult<Option<()>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<K> {
    pub query: String,
    pub category: K,
    /// Results replace the paged records and pagination is hidden.
    pub active: bool,
    /// A search has been submitted, so an empty list means "no results".
    pub searched: bool,
}

impl<K: SearchCategory> SearchState<K> {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            category: K::default(),
            active: false,
            searched: false,
        }
    }
}

impl<K: SearchCategory> Default for SearchState<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// At most one record is selected for edit or expanded for viewing, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<Id> {
    None,
    Edit(Id),
    View(Id),
}

impl<Id: Copy> Selection<Id> {
    pub fn editing(&self) -> Option<Id> {
        match self {
            Selection::Edit(id) => Some(*id),
            _ => None,
        }
    }

    pub fn expanded(&self) -> Option<Id> {
        match self {
            Selection::View(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListModal<Id> {
    Create,
    Edit(Id),
    ConfirmDelete(Id),
    Details(Id),
    Rent(Id),
}

impl<Id> ListModal<Id> {
    /// Modals whose form stays open for correction when the write fails.
    pub fn has_form(&self) -> bool {
        matches!(self, ListModal::Create | ListModal::Edit(_) | ListModal::Rent(_))
    }
}

pub struct ListViewState<C: Collection> {
    pub records: Vec<Record>,
    pub results: Vec<Record>,
    pub page: PageState,
    pub search: SearchState<C::Category>,
    pub selection: Selection<C::Id>,
    pub detail: Option<C::Detail>,
    pub modal: Option<ListModal<C::Id>>,
    pub form: FormBuffer,
    /// Server message from the last rejected write, shown inside the modal.
    pub form_error: Option<String>,
    pub cursor: Option<usize>,
    collection: PhantomData<C>,
}

impl<C: Collection> ListViewState<C> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            results: Vec::new(),
            page: PageState::new(C::PAGE_SIZE),
            search: SearchState::new(),
            selection: Selection::None,
            detail: None,
            modal: None,
            form: FormBuffer::default(),
            form_error: None,
            cursor: None,
            collection: PhantomData,
        }
    }

    /// Rows currently on screen: search results while a search is active.
    pub fn visible(&self) -> &[Record] {
        if self.search.active {
            &self.results
        } else {
            &self.records
        }
    }

    pub fn show_pager(&self) -> bool {
        C::PAGED && !self.search.active
    }

    pub fn record_id(&self, record: &Record) -> Option<C::Id> {
        record.id(C::ID_FIELD)
    }

    pub fn find(&self, id: C::Id) -> Option<&Record> {
        self.visible()
            .iter()
            .find(|r| self.record_id(r) == Some(id))
    }

    pub fn highlighted(&self) -> Option<&Record> {
        self.cursor.and_then(|i| self.visible().get(i))
    }

    pub fn expanded_record(&self) -> Option<&Record> {
        self.selection.expanded().and_then(|id| self.find(id))
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(i) if i < len => (i + 1) % len,
            _ => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(0) | None => len - 1,
            Some(i) if i < len => i - 1,
            Some(_) => len - 1,
        });
    }

    /// Initial fetch when the view is entered.
    pub async fn load(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        self.fetch_page(api, 1).await
    }

    pub async fn set_page(&mut self, api: &dyn SakilaApi, page: u32) -> ApiResult<()> {
        if self.search.active {
            debug!(collection = C::NAME, page, "Ignoring page change while searching");
            return Ok(());
        }
        let page = self.page.clamp(page);
        self.fetch_page(api, page).await
    }

    pub async fn next_page(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        let page = self.page.current_page.saturating_add(1);
        self.set_page(api, page).await
    }

    pub async fn prev_page(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        let page = self.page.current_page.saturating_sub(1);
        self.set_page(api, page).await
    }

    pub async fn run_search(
        &mut self,
        api: &dyn SakilaApi,
        query: &str,
        category: C::Category,
    ) -> ApiResult<()> {
        let query = query.trim();
        if query.is_empty() {
            debug!(collection = C::NAME, "Empty search query, skipping request");
            self.apply_search(String::new(), category, Vec::new());
            return Ok(());
        }

        let results = C::search(api, query, category).await.inspect_err(|err| {
            warn!(collection = C::NAME, query, error = %err, "Search failed");
        })?;

        info!(
            collection = C::NAME,
            query,
            category = category.as_query(),
            results = results.len(),
            "Search completed"
        );
        self.apply_search(query.to_string(), category, results);
        Ok(())
    }

    pub async fn clear_search(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        let page = C::fetch_page(api, 1, self.page.page_size).await.inspect_err(|err| {
            warn!(collection = C::NAME, error = %err, "Reload after clearing search failed");
        })?;

        let category = self.search.category;
        self.search = SearchState::new();
        self.search.category = category;
        self.results.clear();
        self.page.reset();
        self.apply_page(1, page);
        Ok(())
    }

    /// Re-run whatever produced the rows on screen.
    pub async fn refresh(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        if self.search.active && !self.search.query.is_empty() {
            let query = self.search.query.clone();
            let category = self.search.category;
            self.run_search(api, &query, category).await
        } else if self.search.active {
            Ok(())
        } else {
            self.fetch_page(api, self.page.current_page).await
        }
    }

    /// Expand a record, or collapse it when it is already expanded. Detail
    /// data is fetched before anything changes.
    pub async fn select_for_view(&mut self, api: &dyn SakilaApi, record: &Record) -> ApiResult<()> {
        let id = record.require_id::<C::Id>(C::ID_FIELD)?;
        if self.selection.expanded() == Some(id) {
            self.collapse();
            return Ok(());
        }

        let detail = C::fetch_detail(api, id).await.inspect_err(|err| {
            warn!(collection = C::NAME, %id, error = %err, "Detail fetch failed");
        })?;

        self.selection = Selection::View(id);
        self.modal = detail.as_ref().map(|_| ListModal::Details(id));
        self.detail = detail;
        Ok(())
    }

    pub fn collapse(&mut self) {
        if self.selection.expanded().is_some() {
            self.selection = Selection::None;
            self.detail = None;
            if matches!(self.modal, Some(ListModal::Details(_))) {
                self.modal = None;
            }
        }
    }

    /// Dismiss the active modal, discarding any typed input.
    pub fn close_modal(&mut self) {
        match self.modal.take() {
            Some(ListModal::Details(_)) => {
                self.selection = Selection::None;
                self.detail = None;
            }
            Some(ListModal::Edit(_)) => {
                self.selection = Selection::None;
            }
            _ => {}
        }
        self.form.clear();
        self.form_error = None;
    }

    async fn fetch_page(&mut self, api: &dyn SakilaApi, page: u32) -> ApiResult<()> {
        let mut page = page.max(1);
        let mut outcome = C::fetch_page(api, page, self.page.page_size).await;
        if let Ok(fetched) = &outcome {
            // The list shrank under us (e.g. after a delete); step back to the last page.
            let last = fetched.total_pages.max(1);
            if page > last {
                debug!(collection = C::NAME, page, last, "Page out of range");
                page = last;
                outcome = C::fetch_page(api, page, self.page.page_size).await;
            }
        }

        let fetched = outcome.inspect_err(|err| {
            warn!(collection = C::NAME, page, error = %err, "Page fetch failed");
        })?;
        debug!(
            collection = C::NAME,
            page,
            total_pages = fetched.total_pages,
            records = fetched.records.len(),
            "Page loaded"
        );
        self.apply_page(page, fetched);
        Ok(())
    }

    fn apply_page(&mut self, page: u32, fetched: RecordPage) {
        self.records = fetched.records;
        self.page.total_pages = fetched.total_pages.max(1);
        self.page.current_page = page.min(self.page.total_pages);
        self.reset_view_selection();
    }

    fn apply_search(&mut self, query: String, category: C::Category, results: Vec<Record>) {
        self.search = SearchState {
            query,
            category,
            active: true,
            searched: true,
        };
        self.results = results;
        self.records.clear();
        self.page.reset();
        self.reset_view_selection();
    }

    fn reset_view_selection(&mut self) {
        self.selection = Selection::None;
        self.detail = None;
        self.cursor = if self.visible().is_empty() { None } else { Some(0) };
    }

    /// Write succeeded: close the modal, drop typed input, reload the rows.
    async fn finish_write(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        self.modal = None;
        self.selection = Selection::None;
        self.detail = None;
        self.form.clear();
        self.form_error = None;
        self.refresh(api).await
    }

    fn reject_write(&mut self, err: &ApiError) {
        warn!(collection = C::NAME, error = %err, "Write rejected");
        self.form_error = Some(err.to_string());
    }
}

impl<C: Collection> Default for ListViewState<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Collection> fmt::Debug for ListViewState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListViewState")
            .field("collection", &C::NAME)
            .field("records", &self.records.len())
            .field("results", &self.results.len())
            .field("page", &self.page)
            .field("search", &self.search)
            .field("selection", &self.selection)
            .field("modal", &self.modal)
            .field("form_error", &self.form_error)
            .finish()
    }
}

impl ListViewState<Customers> {
    pub fn open_create(&mut self) {
        self.selection = Selection::None;
        self.detail = None;
        self.form = FormBuffer::customer();
        self.form_error = None;
        self.modal = Some(ListModal::Create);
    }

    /// Open the edit form prefilled from `record`.
    pub fn select_for_edit(&mut self, record: &Record) -> ApiResult<()> {
        let id = record.require_id::<CustomerId>(Customers::ID_FIELD)?;
        self.selection = Selection::Edit(id);
        self.detail = None;
        self.form = FormBuffer::customer();
        self.form.prefill(record);
        self.form_error = None;
        self.modal = Some(ListModal::Edit(id));
        Ok(())
    }

    pub fn open_delete(&mut self, record: &Record) -> ApiResult<()> {
        let id = record.require_id::<CustomerId>(Customers::ID_FIELD)?;
        self.selection = Selection::None;
        self.detail = None;
        self.form_error = None;
        self.modal = Some(ListModal::ConfirmDelete(id));
        Ok(())
    }

    pub async fn submit_create(&mut self, api: &dyn SakilaApi, payload: &CustomerPayload) -> ApiResult<Ack> {
        match api.add_customer(payload).await {
            Ok(ack) => {
                info!(first_name = %payload.first_name, last_name = %payload.last_name, "Customer created");
                self.finish_write(api).await?;
                Ok(ack)
            }
            Err(err) => {
                self.reject_write(&err);
                Err(err)
            }
        }
    }

    pub async fn submit_edit(
        &mut self,
        api: &dyn SakilaApi,
        id: CustomerId,
        payload: &CustomerPayload,
    ) -> ApiResult<Ack> {
        match api.update_customer(id, payload).await {
            Ok(ack) => {
                info!(%id, "Customer updated");
                self.finish_write(api).await?;
                Ok(ack)
            }
            Err(err) => {
                self.reject_write(&err);
                Err(err)
            }
        }
    }

    pub async fn submit_delete(&mut self, api: &dyn SakilaApi, id: CustomerId) -> ApiResult<Ack> {
        match api.delete_customer(id).await {
            Ok(ack) => {
                info!(%id, "Customer deleted");
                self.finish_write(api).await?;
                Ok(ack)
            }
            Err(err) => {
                self.reject_write(&err);
                Err(err)
            }
        }
    }

    /// Close an open rental of the expanded customer and reload its history.
    pub async fn return_rental(&mut self, api: &dyn SakilaApi, rental_id: RentalId) -> ApiResult<Ack> {
        let customer_id = self
            .selection
            .expanded()
            .ok_or(ValidationError::NoCustomerOpen)?;

        let ack = api.return_rental(rental_id).await.inspect_err(|err| {
            warn!(%rental_id, error = %err, "Rental return failed");
        })?;
        info!(%rental_id, %customer_id, "Rental returned");

        let detail = Customers::fetch_detail(api, customer_id).await?;
        self.detail = detail;
        Ok(ack)
    }
}

impl ListViewState<Films> {
    pub fn open_rent(&mut self, record: &Record) -> ApiResult<()> {
        let id = record.require_id::<FilmId>(Films::ID_FIELD)?;
        self.form = FormBuffer::rental();
        self.form_error = None;
        self.modal = Some(ListModal::Rent(id));
        Ok(())
    }

    /// Rent `film_id` to the customer typed into the form. The id is checked
    /// locally first; invalid input never reaches the backend.
    pub async fn submit_rent(
        &mut self,
        api: &dyn SakilaApi,
        film_id: FilmId,
        customer_id_text: &str,
    ) -> ApiResult<Ack> {
        let customer_id = match parse_customer_id(customer_id_text) {
            Ok(id) => id,
            Err(err) => {
                let err = ApiError::from(err);
                self.form_error = Some(err.to_string());
                return Err(err);
            }
        };

        let request = RentalRequest {
            film_id,
            customer_id,
        };
        match api.rent_film(&request).await {
            Ok(ack) => {
                info!(%film_id, %customer_id, "Film rented");
                self.modal = None;
                self.form.clear();
                self.form_error = None;
                Ok(ack)
            }
            Err(err) => {
                self.reject_write(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer(id: i64, first: &str) -> Record {
        Record::new(json!({"customer_id": id, "first_name": first, "last_name": "X"}))
    }

    #[test]
    fn new_state_is_paginated_and_empty() {
        let state = ListViewState::<Customers>::new();
        assert!(state.visible().is_empty());
        assert!(state.show_pager());
        assert_eq!(state.page.current_page, 1);
        assert_eq!(state.page.page_size, CUSTOMER_PAGE_SIZE);
        assert_eq!(state.selection, Selection::None);
    }

    #[test]
    fn visible_switches_to_results_when_searching() {
        let mut state = ListViewState::<Customers>::new();
        state.records = vec![customer(1, "MARY")];
        state.apply_search("PAT".to_string(), CustomerCategory::FirstName, vec![customer(2, "PATRICIA")]);
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.visible()[0].text("first_name"), "PATRICIA");
        assert!(state.records.is_empty());
        assert!(!state.show_pager());
    }

    #[test]
    fn cursor_wraps_around() {
        let mut state = ListViewState::<Customers>::new();
        state.records = vec![customer(1, "A"), customer(2, "B")];
        state.select_next();
        assert_eq!(state.cursor, Some(0));
        state.select_next();
        state.select_next();
        assert_eq!(state.cursor, Some(0));
        state.select_previous();
        assert_eq!(state.cursor, Some(1));
    }

    #[test]
    fn unpaged_collections_never_show_pager() {
        let mut state = ListViewState::<Films>::new();
        assert!(!state.show_pager());
        state.apply_search("ALIEN".to_string(), FilmCategory::Title, Vec::new());
        assert!(!state.show_pager());
        state.search = SearchState::new();
        assert!(!state.show_pager());
    }

    #[test]
    fn cursor_is_none_on_empty_list() {
        let mut state = ListViewState::<Films>::new();
        state.select_next();
        assert_eq!(state.cursor, None);
        state.select_previous();
        assert_eq!(state.cursor, None);
    }

    #[test]
    fn edit_and_view_selection_are_exclusive() {
        let mut state = ListViewState::<Customers>::new();
        state.records = vec![customer(1, "MARY")];
        state.selection = Selection::View(CustomerId::new(1));
        state.select_for_edit(&customer(1, "MARY")).unwrap();
        assert_eq!(state.selection.editing(), Some(CustomerId::new(1)));
        assert_eq!(state.selection.expanded(), None);
        assert_eq!(state.form.value("first_name"), "MARY");
        assert_eq!(state.modal, Some(ListModal::Edit(CustomerId::new(1))));
    }

    #[test]
    fn close_modal_clears_form_and_error() {
        let mut state = ListViewState::<Customers>::new();
        state.open_create();
        state.form.insert_char('Z');
        state.form_error = Some("bad".to_string());
        state.close_modal();
        assert!(state.modal.is_none());
        assert!(state.form.is_empty());
        assert!(state.form_error.is_none());
    }

    #[test]
    fn records_without_id_cannot_be_edited() {
        let mut state = ListViewState::<Customers>::new();
        let err = state
            .select_for_edit(&Record::new(json!({"first_name": "NOID"})))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(state.modal.is_none());
    }

    #[test]
    fn only_form_modals_keep_input() {
        assert!(ListModal::<CustomerId>::Create.has_form());
        assert!(ListModal::Rent(FilmId::new(1)).has_form());
        assert!(!ListModal::ConfirmDelete(CustomerId::new(1)).has_form());
        assert!(!ListModal::Details(CustomerId::new(1)).has_form());
    }
}
