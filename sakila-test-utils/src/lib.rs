//! Sakila Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - [`MockApi`], an in-memory [`SakilaApi`] with scripted failures and a call log
//! - Record fixtures shaped like the backend's responses
//! - Proptest generators

pub use sakila_core::{
    Ack, ActorId, ApiError, ApiResult, CustomerCategory, CustomerDetails, CustomerId,
    CustomerPage, CustomerPayload, FilmCategory, FilmId, Record, RecordId, RentalId,
    RentalRequest, SakilaApi, SearchCategory,
};

use async_trait::async_trait;
use sakila_core::total_pages;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

// ============================================================================
// MOCK BACKEND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    DisplayCustomers,
    SearchCustomers,
    AddCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CustomerDetails,
    ReturnRental,
    TopMovies,
    TopActors,
    TopActorMovies,
    SearchFilms,
    RentFilm,
}

/// One recorded request: which endpoint and the arguments it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub args: Value,
}

#[derive(Debug, Default)]
struct MockState {
    customers: Vec<Record>,
    rentals: HashMap<i64, Vec<Record>>,
    films: Vec<Record>,
    top_movies: Vec<Record>,
    top_actors: Vec<Record>,
    actor_movies: HashMap<i64, Vec<Record>>,
    failures: HashMap<Endpoint, ApiError>,
    calls: Vec<Call>,
    next_rental_id: i64,
}

/// In-memory backend. Data lives behind a mutex so the mock can be shared
/// by reference with the view states under test.
#[derive(Debug, Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock preloaded with `count` customers (ids 1..=count).
    pub fn with_customers(count: usize) -> Self {
        let api = Self::new();
        api.lock().customers = customers(count);
        api
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_customers(&self, records: Vec<Record>) {
        self.lock().customers = records;
    }

    pub fn set_rentals(&self, customer_id: i64, rentals: Vec<Record>) {
        self.lock().rentals.insert(customer_id, rentals);
    }

    pub fn set_films(&self, records: Vec<Record>) {
        self.lock().films = records;
    }

    pub fn set_top_movies(&self, rows: Vec<Record>) {
        self.lock().top_movies = rows;
    }

    pub fn set_top_actors(&self, rows: Vec<Record>) {
        self.lock().top_actors = rows;
    }

    pub fn set_actor_movies(&self, actor_id: i64, rows: Vec<Record>) {
        self.lock().actor_movies.insert(actor_id, rows);
    }

    /// Every call to `endpoint` fails with `error` until [`MockApi::succeed`].
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.lock().failures.insert(endpoint, error);
    }

    pub fn succeed(&self, endpoint: Endpoint) {
        self.lock().failures.remove(&endpoint);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn customers(&self) -> Vec<Record> {
        self.lock().customers.clone()
    }

    /// Log the call and return the scripted failure, if any.
    fn begin(&self, endpoint: Endpoint, args: Value) -> Result<MutexGuard<'_, MockState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call { endpoint, args });
        if let Some(err) = state.failures.get(&endpoint).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

fn not_found(what: &str, id: i64) -> ApiError {
    ApiError::server(404, format!("{} {} not found", what, id))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn position_of(records: &[Record], field: &str, id: i64) -> Option<usize> {
    records.iter().position(|r| r.int(field) == Some(id))
}

#[async_trait]
impl SakilaApi for MockApi {
    async fn display_customers(&self, page: u32, per_page: u32) -> ApiResult<CustomerPage> {
        let state = self.begin(
            Endpoint::DisplayCustomers,
            json!({"page": page, "per_page": per_page}),
        )?;
        let total = total_pages(state.customers.len() as u64, per_page);
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let customers = state
            .customers
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok(CustomerPage {
            customers,
            total_pages: total,
        })
    }

    async fn search_customers(
        &self,
        query: &str,
        category: CustomerCategory,
    ) -> ApiResult<Vec<Record>> {
        let state = self.begin(
            Endpoint::SearchCustomers,
            json!({"query": query, "category": category.as_query()}),
        )?;
        let field = category.as_query();
        Ok(state
            .customers
            .iter()
            .filter(|c| match category {
                CustomerCategory::CustomerId => c.text(field) == query.trim(),
                _ => contains_ci(&c.text(field), query),
            })
            .cloned()
            .collect())
    }

    async fn add_customer(&self, payload: &CustomerPayload) -> ApiResult<Ack> {
        let mut state = self.begin(Endpoint::AddCustomer, json!(payload))?;
        let next_id = state
            .customers
            .iter()
            .filter_map(|c| c.int("customer_id"))
            .max()
            .unwrap_or(0)
            + 1;
        state.customers.push(customer_with_email(
            next_id,
            &payload.first_name,
            &payload.last_name,
            &payload.email,
        ));
        Ok(Ack {
            message: Some("Customer added successfully".to_string()),
        })
    }

    async fn update_customer(&self, id: CustomerId, payload: &CustomerPayload) -> ApiResult<Ack> {
        let mut state = self.begin(
            Endpoint::UpdateCustomer,
            json!({"id": id.get(), "payload": payload}),
        )?;
        let index = position_of(&state.customers, "customer_id", id.get())
            .ok_or_else(|| not_found("Customer", id.get()))?;
        state.customers[index] =
            customer_with_email(id.get(), &payload.first_name, &payload.last_name, &payload.email);
        Ok(Ack {
            message: Some("Customer updated successfully".to_string()),
        })
    }

    async fn delete_customer(&self, id: CustomerId) -> ApiResult<Ack> {
        let mut state = self.begin(Endpoint::DeleteCustomer, json!({"id": id.get()}))?;
        let index = position_of(&state.customers, "customer_id", id.get())
            .ok_or_else(|| not_found("Customer", id.get()))?;
        state.customers.remove(index);
        state.rentals.remove(&id.get());
        Ok(Ack {
            message: Some("Customer deleted successfully".to_string()),
        })
    }

    async fn customer_details(&self, id: CustomerId) -> ApiResult<CustomerDetails> {
        let state = self.begin(Endpoint::CustomerDetails, json!({"id": id.get()}))?;
        let index = position_of(&state.customers, "customer_id", id.get())
            .ok_or_else(|| not_found("Customer", id.get()))?;
        Ok(CustomerDetails {
            customer: state.customers[index].clone(),
            rentals: state.rentals.get(&id.get()).cloned().unwrap_or_default(),
        })
    }

    async fn return_rental(&self, id: RentalId) -> ApiResult<Ack> {
        let mut state = self.begin(Endpoint::ReturnRental, json!({"id": id.get()}))?;
        for rentals in state.rentals.values_mut() {
            if let Some(index) = position_of(rentals, "rental_id", id.get()) {
                let mut value = rentals[index].clone().into_value();
                value["return_date"] = json!("2006-02-23 04:12:08");
                rentals[index] = Record::new(value);
                return Ok(Ack {
                    message: Some("Rental returned".to_string()),
                });
            }
        }
        Err(not_found("Rental", id.get()))
    }

    async fn top_movies(&self) -> ApiResult<Vec<Record>> {
        let state = self.begin(Endpoint::TopMovies, Value::Null)?;
        Ok(state.top_movies.clone())
    }

    async fn top_actors(&self) -> ApiResult<Vec<Record>> {
        let state = self.begin(Endpoint::TopActors, Value::Null)?;
        Ok(state.top_actors.clone())
    }

    async fn top_actor_movies(&self, actor_id: ActorId) -> ApiResult<Vec<Record>> {
        let state = self.begin(Endpoint::TopActorMovies, json!({"actor_id": actor_id.get()}))?;
        Ok(state
            .actor_movies
            .get(&actor_id.get())
            .cloned()
            .unwrap_or_default())
    }

    async fn search_films(&self, query: &str, category: FilmCategory) -> ApiResult<Vec<Record>> {
        let state = self.begin(
            Endpoint::SearchFilms,
            json!({"query": query, "category": category.as_query()}),
        )?;
        let field = match category {
            FilmCategory::Title => "title",
            FilmCategory::Actor => "actor_name",
            FilmCategory::Genre => "genre",
        };
        Ok(state
            .films
            .iter()
            .filter(|f| contains_ci(&f.text(field), query))
            .cloned()
            .collect())
    }

    async fn rent_film(&self, request: &RentalRequest) -> ApiResult<Ack> {
        let mut state = self.begin(Endpoint::RentFilm, json!(request))?;
        let customer_id = request.customer_id.get();
        if position_of(&state.customers, "customer_id", customer_id).is_none() {
            return Err(not_found("Customer", customer_id));
        }
        state.next_rental_id += 1;
        let rental_id = 20_000 + state.next_rental_id;
        let title = state
            .films
            .iter()
            .find(|f| f.int("film_id") == Some(request.film_id.get()))
            .map(|f| f.text("title"))
            .unwrap_or_default();
        state
            .rentals
            .entry(customer_id)
            .or_default()
            .push(rental(rental_id, &title, true));
        Ok(Ack {
            message: Some("Film rented successfully".to_string()),
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn customer(id: i64, first_name: &str, last_name: &str) -> Record {
    let email = format!(
        "{}.{}@sakilacustomer.org",
        first_name.to_uppercase(),
        last_name.to_uppercase()
    );
    customer_with_email(id, first_name, last_name, &email)
}

pub fn customer_with_email(id: i64, first_name: &str, last_name: &str, email: &str) -> Record {
    Record::new(json!({
        "customer_id": id,
        "first_name": first_name,
        "last_name": last_name,
        "email": email,
    }))
}

/// `count` customers with ids `1..=count` and distinct names.
pub fn customers(count: usize) -> Vec<Record> {
    (1..=count as i64)
        .map(|id| customer(id, &format!("FIRST{}", id), &format!("LAST{}", id)))
        .collect()
}

pub fn film(id: i64, title: &str, genre: &str, actor_name: &str) -> Record {
    Record::new(json!({
        "film_id": id,
        "title": title,
        "genre": genre,
        "actor_name": actor_name,
        "release_year": 2006,
        "rental_rate": 2.99,
        "description": format!("A {} about {}", genre.to_lowercase(), title.to_lowercase()),
    }))
}

pub fn rental(id: i64, title: &str, open: bool) -> Record {
    let return_date = if open {
        Value::Null
    } else {
        json!("2005-05-26 22:04:30")
    };
    Record::new(json!({
        "rental_id": id,
        "title": title,
        "rental_date": "2005-05-24 22:53:30",
        "return_date": return_date,
    }))
}

/// `[film_id, title, rental_count, description, release_year, rental_rate]`
pub fn top_film_row(id: i64, title: &str, rentals: i64) -> Record {
    Record::new(json!([id, title, rentals, "A Epic Drama", 2006, 4.99]))
}

/// `[actor_id, first_name, last_name, film_count]`
pub fn top_actor_row(id: i64, first_name: &str, last_name: &str) -> Record {
    Record::new(json!([id, first_name, last_name, 42]))
}

/// `[film_id, title, rental_count]`
pub fn actor_film_row(id: i64, title: &str, rentals: i64) -> Record {
    Record::new(json!([id, title, rentals]))
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z]{2,12}"
    }

    pub fn arb_customer() -> impl Strategy<Value = Record> {
        (1i64..10_000, arb_name(), arb_name())
            .prop_map(|(id, first, last)| customer(id, &first, &last))
    }

    pub fn arb_film_category() -> impl Strategy<Value = FilmCategory> {
        prop_oneof![
            Just(FilmCategory::Title),
            Just(FilmCategory::Actor),
            Just(FilmCategory::Genre),
        ]
    }

    pub fn arb_customer_category() -> impl Strategy<Value = CustomerCategory> {
        prop_oneof![
            Just(CustomerCategory::CustomerId),
            Just(CustomerCategory::FirstName),
            Just(CustomerCategory::LastName),
        ]
    }

    /// Whitespace-only strings, which must never reach the backend as a search.
    pub fn arb_blank_query() -> impl Strategy<Value = String> {
        "[ \t]{0,8}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pages_are_sliced_from_customers() {
        let api = MockApi::with_customers(47);
        let page = api.display_customers(5, 10).await.unwrap();
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.customers.len(), 7);
        assert_eq!(page.customers[0].int("customer_id"), Some(41));
    }

    #[tokio::test]
    async fn scripted_failure_is_logged_and_returned() {
        let api = MockApi::with_customers(3);
        api.fail(Endpoint::DeleteCustomer, ApiError::server(500, "boom"));
        let err = api.delete_customer(CustomerId::new(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(api.call_count(Endpoint::DeleteCustomer), 1);
        assert_eq!(api.customers().len(), 3);

        api.succeed(Endpoint::DeleteCustomer);
        api.delete_customer(CustomerId::new(1)).await.unwrap();
        assert_eq!(api.customers().len(), 2);
    }

    #[tokio::test]
    async fn return_rental_sets_return_date() {
        let api = MockApi::with_customers(1);
        api.set_rentals(1, vec![rental(7, "ACE GOLDFINGER", true)]);
        api.return_rental(RentalId::new(7)).await.unwrap();
        let details = api.customer_details(CustomerId::new(1)).await.unwrap();
        assert_eq!(details.open_rentals().count(), 0);
    }
}
