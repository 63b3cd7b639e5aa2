//! The assistant service: the one operation exposed to chat front ends.
//!
//! Per request the pipeline runs interpret, gather, compose, complete, in
//! that order. Every collaborator failure degrades inside its own component,
//! so the pipeline itself never branches on errors and always produces a
//! user-presentable string.

use secrecy::SecretString;
use tracing::{debug, info, instrument};

use shopmate_core::{OrderId, ProductId};

use crate::completion::{self, CompletionClient};
use crate::config::AssistantConfig;
use crate::context;
use crate::gateway::{BackendClient, GatewayError};
use crate::intent;
use crate::models::{Order, UserContext};
use crate::prompt;

/// The storefront product assistant.
///
/// Cheap to clone; both underlying HTTP clients are connection-pooled.
#[derive(Clone)]
pub struct Assistant {
    backend: BackendClient,
    completion: CompletionClient,
}

impl Assistant {
    /// Create an assistant from explicit clients.
    #[must_use]
    pub const fn new(backend: BackendClient, completion: CompletionClient) -> Self {
        Self {
            backend,
            completion,
        }
    }

    /// Create an assistant from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client fails to build.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            backend: BackendClient::new(&config.backend)?,
            completion: CompletionClient::new(config.completion.as_ref()),
        })
    }

    /// Answer a free-text question about products, enriched with catalog
    /// data and (for authenticated users) order history.
    ///
    /// Total: always resolves to displayable text, never an error. Each
    /// external call is attempted at most once per invocation.
    #[instrument(skip(self, query, user), fields(query_len = query.len(), anonymous = user.is_none()))]
    pub async fn ask_about_products(&self, query: &str, user: Option<&UserContext>) -> String {
        // The credential check comes first: an unconfigured completion
        // client answers without touching the backend at all.
        if !self.completion.is_enabled() {
            return completion::MISSING_CREDENTIAL_REPLY.to_string();
        }

        let intent = intent::classify(query);
        debug!(?intent, "query interpreted");

        let context = context::gather(&self.backend, &intent, user).await;
        info!(
            products = context.products.len(),
            orders = context.orders.as_ref().map(Vec::len),
            "context gathered"
        );

        let prompt = prompt::compose(query, &context);
        self.completion.complete(&prompt).await
    }

    /// Generate a description for a catalog product.
    ///
    /// Returns `None` when the product cannot be fetched.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn describe_product(&self, product_id: &ProductId) -> Option<String> {
        let product = self.backend.fetch_product_by_id(product_id).await?;
        Some(self.completion.describe_product(&product).await)
    }

    /// Look up a single order for a status check.
    ///
    /// Returns `None` when the order cannot be fetched.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn order_status(&self, order_id: &OrderId, token: &SecretString) -> Option<Order> {
        self.backend.fetch_order_status(order_id, token).await
    }
}
