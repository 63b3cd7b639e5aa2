//! Context gathering: reshape catalog and order data for prompting.
//!
//! Given an interpreted intent and an optional authenticated user, this
//! module pulls the minimal relevant data through the gateway and reduces
//! it to compact summaries the prompt composer can serialize.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use shopmate_core::ProductId;

use crate::gateway::BackendClient;
use crate::intent::Intent;
use crate::models::{Order, OrderLineItem, Product, UserContext};

/// Maximum number of products pulled for a general query.
const PRODUCT_LISTING_LIMIT: u32 = 100;

/// Request-scoped context handed to the prompt composer.
///
/// Built from scratch per request and discarded after the completion call.
#[derive(Debug, Clone)]
pub struct PromptContext {
    /// Product summaries relevant to the query.
    pub products: Vec<ProductSummary>,
    /// Order summaries for the authenticated user; `None` for anonymous
    /// callers, which omits the order section from the prompt entirely.
    pub orders: Option<Vec<OrderSummary>>,
}

/// A product reduced to the fields worth prompting with.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    /// Category name, or "Not specified" when the product has none.
    pub category: String,
    pub quantity: i64,
    /// "Yes" or "No".
    pub shipping: &'static str,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product
                .category
                .as_ref()
                .map_or_else(|| "Not specified".to_string(), |c| c.name.clone()),
            quantity: product.quantity,
            shipping: if product.shipping { "Yes" } else { "No" },
        }
    }
}

/// An order reduced to the fields worth prompting with.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    /// Order date rendered as `YYYY-MM-DD` to keep prompt output stable
    /// across environments.
    pub date: String,
    pub status: String,
    pub amount: Decimal,
    pub products: Vec<OrderLineSummary>,
}

/// A line item within an order summary.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineSummary {
    pub name: String,
    pub price: Decimal,
    pub count: u32,
}

impl From<&OrderLineItem> for OrderLineSummary {
    fn from(item: &OrderLineItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            count: item.count,
        }
    }
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: order.created_at.format("%Y-%m-%d").to_string(),
            status: order.status.to_string(),
            amount: order.amount,
            products: order.products.iter().map(OrderLineSummary::from).collect(),
        }
    }
}

/// Gather the relevant product and order data for a query.
///
/// For a specific-product intent the first search hit is resolved to its
/// full detail record; a failed detail fetch falls back to the search
/// results, and an empty search falls back to the full (bounded) listing.
/// Order history is fetched only for authenticated users.
#[instrument(skip(backend, intent, user), fields(anonymous = user.is_none()))]
pub async fn gather(
    backend: &BackendClient,
    intent: &Intent,
    user: Option<&UserContext>,
) -> PromptContext {
    let products = match intent {
        Intent::SpecificProduct { subject } => {
            let results = backend.search_products(subject).await;
            let first_id = results.first().map(|product| product.id.clone());
            match first_id {
                Some(id) => match backend.fetch_product_by_id(&id).await {
                    Some(detail) => vec![detail],
                    None => results,
                },
                None => backend.fetch_all_products(PRODUCT_LISTING_LIMIT).await,
            }
        }
        Intent::General => backend.fetch_all_products(PRODUCT_LISTING_LIMIT).await,
    };

    let orders: Option<Vec<Order>> = match user {
        Some(user) => Some(backend.fetch_user_orders(&user.id, &user.token).await),
        None => None,
    };

    PromptContext {
        products: products.iter().map(ProductSummary::from).collect(),
        orders: orders.map(|orders| orders.iter().map(OrderSummary::from).collect()),
    }
}
