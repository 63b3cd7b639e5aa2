//! Shopmate Assistant - query orchestration for the storefront assistant.
//!
//! This library answers free-text product questions by enriching a
//! language-model prompt with live catalog and order data:
//!
//! 1. [`intent`] classifies the query (specific product vs. general)
//! 2. [`context`] gathers the relevant products and orders via [`gateway`]
//! 3. [`prompt`] renders a deterministic instruction block
//! 4. [`completion`] sends the prompt to the completion endpoint
//!
//! The whole pipeline is total: every collaborator failure degrades to a
//! well-formed value (empty list, absent record, or fixed reply text), so
//! [`Assistant::ask_about_products`] always resolves to displayable text.
//!
//! Each request builds its own context from scratch; there is no shared
//! mutable state between concurrent invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assistant;
pub mod completion;
pub mod config;
pub mod context;
pub mod gateway;
pub mod intent;
pub mod models;
pub mod prompt;

pub use assistant::Assistant;
pub use config::{AssistantConfig, BackendConfig, CompletionConfig, ConfigError};
pub use models::UserContext;
