//! REST client for the Sakila backend.

use crate::config::TuiConfig;
use async_trait::async_trait;
use reqwest::Method;
use sakila_core::{
    Ack, ActorId, ApiError, ApiResult, CustomerCategory, CustomerDetails, CustomerId,
    CustomerPage, CustomerPayload, FilmCategory, Record, RecordId, RentalId, RentalRequest,
    SakilaApi, SearchCategory,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl From<ApiClientError> for ApiError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Http(e) => ApiError::Transport(e.to_string()),
            ApiClientError::Serde(e) => ApiError::Decode(e.to_string()),
            ApiClientError::Server { status, message } => ApiError::Server { status, message },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.client.get(self.url(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        let started = Instant::now();
        let response = request.send().await?;
        log_response("GET", path, response.status().as_u16(), started);
        self.parse_response(response).await
    }

    /// Issue a write and read back the acknowledgement.
    async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Ack, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let started = Instant::now();
        let response = request.send().await?;
        log_response(method.as_str(), path, response.status().as_u16(), started);
        let value: Value = self.parse_response(response).await?;
        Ok(Ack::from_value(&value))
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            let body = if text.trim().is_empty() { "null" } else { text.as_str() };
            Ok(serde_json::from_str::<T>(body)?)
        } else {
            let message = server_message(status.as_u16(), &text);
            warn!(status = status.as_u16(), message = %message, "Backend rejected request");
            Err(ApiClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn log_response(method: &str, path: &str, status: u16, started: Instant) {
    debug!(
        method,
        path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Backend request completed"
    );
}

/// Message shown to the user for a rejected request: the `error` or
/// `message` field of a JSON body, else the raw body, else the status.
pub fn server_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.trim().is_empty() {
                    return message.clone();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl SakilaApi for RestClient {
    async fn display_customers(&self, page: u32, per_page: u32) -> ApiResult<CustomerPage> {
        Ok(self
            .get_json("/displaycustomers", Some(&[("page", page), ("per_page", per_page)]))
            .await?)
    }

    async fn search_customers(
        &self,
        query: &str,
        category: CustomerCategory,
    ) -> ApiResult<Vec<Record>> {
        Ok(self
            .get_json(
                "/searchcustomers",
                Some(&[("query", query), ("category", category.as_query())]),
            )
            .await?)
    }

    async fn add_customer(&self, payload: &CustomerPayload) -> ApiResult<Ack> {
        Ok(self
            .send_json(Method::POST, "/addcustomer", Some(payload))
            .await?)
    }

    async fn update_customer(&self, id: CustomerId, payload: &CustomerPayload) -> ApiResult<Ack> {
        let path = format!("/updatecustomer/{}", id.get());
        Ok(self.send_json(Method::PUT, &path, Some(payload)).await?)
    }

    async fn delete_customer(&self, id: CustomerId) -> ApiResult<Ack> {
        let path = format!("/deletecustomer/{}", id.get());
        Ok(self.send_json::<()>(Method::DELETE, &path, None).await?)
    }

    async fn customer_details(&self, id: CustomerId) -> ApiResult<CustomerDetails> {
        let path = format!("/api/customer/{}", id.get());
        Ok(self.get_json::<_, ()>(&path, None).await?)
    }

    async fn return_rental(&self, id: RentalId) -> ApiResult<Ack> {
        let path = format!("/api/returnRental/{}", id.get());
        Ok(self.send_json::<()>(Method::PUT, &path, None).await?)
    }

    async fn top_movies(&self) -> ApiResult<Vec<Record>> {
        Ok(self.get_json::<_, ()>("/top5movies", None).await?)
    }

    async fn top_actors(&self) -> ApiResult<Vec<Record>> {
        Ok(self.get_json::<_, ()>("/top5actors", None).await?)
    }

    async fn top_actor_movies(&self, actor_id: ActorId) -> ApiResult<Vec<Record>> {
        Ok(self
            .get_json("/top5actors_movies", Some(&[("actor_id", actor_id.get())]))
            .await?)
    }

    async fn search_films(&self, query: &str, category: FilmCategory) -> ApiResult<Vec<Record>> {
        Ok(self
            .get_json(
                "/searchfilms",
                Some(&[("query", query), ("category", category.as_query())]),
            )
            .await?)
    }

    async fn rent_film(&self, request: &RentalRequest) -> ApiResult<Ack> {
        Ok(self
            .send_json(Method::POST, "/rentfilm", Some(request))
            .await?)
    }
}
