//! Backend product/order API client (the data gateway).
//!
//! Every public operation degrades to an empty or absent result instead of
//! raising: a failed call is logged and the rest of the pipeline always has
//! a well-formed (possibly empty) value to reason about.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{instrument, warn};

use shopmate_core::{OrderId, ProductId, UserId};

use crate::config::BackendConfig;
use crate::models::{Order, Product};

/// Per-call timeout for backend requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the backend API.
///
/// These never cross the gateway boundary: public operations convert them
/// to empty or absent results and log them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Backend product/order API client.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the product listing, bounded by `limit`.
    ///
    /// Returns an empty list on any failure.
    #[instrument(skip(self))]
    pub async fn fetch_all_products(&self, limit: u32) -> Vec<Product> {
        match self.get_json(&format!("/products?limit={limit}")).await {
            Ok(products) => products,
            Err(error) => {
                warn!(%error, "failed to fetch product listing");
                Vec::new()
            }
        }
    }

    /// Fetch a single product by ID.
    ///
    /// Returns `None` on any failure, including "not found".
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn fetch_product_by_id(&self, product_id: &ProductId) -> Option<Product> {
        match self.get_json(&format!("/product/{product_id}")).await {
            Ok(product) => Some(product),
            Err(error) => {
                warn!(%error, "failed to fetch product");
                None
            }
        }
    }

    /// Search products by name.
    ///
    /// Matching semantics are defined by the backend; returns an empty list
    /// on any failure.
    #[instrument(skip(self, term), fields(term_len = term.len()))]
    pub async fn search_products(&self, term: &str) -> Vec<Product> {
        let path = format!("/products/search?search={}", urlencoding::encode(term));
        match self.get_json(&path).await {
            Ok(products) => products,
            Err(error) => {
                warn!(%error, "product search failed");
                Vec::new()
            }
        }
    }

    /// Fetch a user's order history.
    ///
    /// Returns an empty list on any failure, including authorization failure.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn fetch_user_orders(&self, user_id: &UserId, token: &SecretString) -> Vec<Order> {
        let path = format!("/orders/by/user/{user_id}");
        match self.get_json_authorized(&path, token).await {
            Ok(orders) => orders,
            Err(error) => {
                warn!(%error, "failed to fetch order history");
                Vec::new()
            }
        }
    }

    /// Fetch a single order for a status lookup.
    ///
    /// Returns `None` on any failure.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn fetch_order_status(&self, order_id: &OrderId, token: &SecretString) -> Option<Order> {
        let path = format!("/order/status/{order_id}");
        match self.get_json_authorized(&path, token).await {
            Ok(order) => Some(order),
            Err(error) => {
                warn!(%error, "failed to fetch order status");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn get_json_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a response body, mapping HTTP error statuses to `GatewayError::Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::Api {
            status: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| GatewayError::Parse(e.to_string()))
}
