//! Data model for the assistant pipeline.
//!
//! Products and orders are decoded from the backend API and are read-only
//! here; the pipeline never mutates or persists them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;

use shopmate_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};

/// A product category as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default)]
    pub id: Option<CategoryId>,
    pub name: String,
}

/// A product as returned by the backend catalog endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub shipping: bool,
}

/// A line item within an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineItem {
    pub name: String,
    pub price: Decimal,
    pub count: u32,
}

/// An order as returned by the backend order endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    pub amount: Decimal,
    #[serde(default)]
    pub products: Vec<OrderLineItem>,
}

/// An authenticated caller.
///
/// Absence of a `UserContext` means the caller is anonymous, which disables
/// order-history retrieval entirely.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// The user's backend ID.
    pub id: UserId,
    /// Bearer credential for the backend order endpoints.
    pub token: SecretString,
}
