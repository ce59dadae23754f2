//! Backend abstraction consumed by the view states.

use crate::category::{CustomerCategory, FilmCategory};
use crate::error::ApiResult;
use crate::ids::{ActorId, CustomerId, RentalId};
use crate::payload::{Ack, CustomerDetails, CustomerPage, CustomerPayload, RentalRequest};
use crate::record::Record;
use async_trait::async_trait;

/// One method per backend endpoint. Every call is a single one-shot request
/// whose parsed body (or error) is returned as-is.
#[async_trait]
pub trait SakilaApi: Send + Sync {
    /// `GET /displaycustomers?page&per_page`
    async fn display_customers(&self, page: u32, per_page: u32) -> ApiResult<CustomerPage>;

    /// `GET /searchcustomers?query&category`
    async fn search_customers(
        &self,
        query: &str,
        category: CustomerCategory,
    ) -> ApiResult<Vec<Record>>;

    /// `POST /addcustomer`
    async fn add_customer(&self, payload: &CustomerPayload) -> ApiResult<Ack>;

    /// `PUT /updatecustomer/{id}`
    async fn update_customer(&self, id: CustomerId, payload: &CustomerPayload) -> ApiResult<Ack>;

    /// `DELETE /deletecustomer/{id}`
    async fn delete_customer(&self, id: CustomerId) -> ApiResult<Ack>;

    /// `GET /api/customer/{id}`
    async fn customer_details(&self, id: CustomerId) -> ApiResult<CustomerDetails>;

    /// `PUT /api/returnRental/{id}`
    async fn return_rental(&self, id: RentalId) -> ApiResult<Ack>;

    /// `GET /top5movies`
    async fn top_movies(&self) -> ApiResult<Vec<Record>>;

    /// `GET /top5actors`
    async fn top_actors(&self) -> ApiResult<Vec<Record>>;

    /// `GET /top5actors_movies?actor_id`
    async fn top_actor_movies(&self, actor_id: ActorId) -> ApiResult<Vec<Record>>;

    /// `GET /searchfilms?query&category`
    async fn search_films(&self, query: &str, category: FilmCategory) -> ApiResult<Vec<Record>>;

    /// `POST /rentfilm`
    async fn rent_film(&self, request: &RentalRequest) -> ApiResult<Ack>;
}
