//! Shopmate Core - Shared types library.
//!
//! This crate provides common types used across all Shopmate components:
//! - `assistant` - Product-assistant pipeline library
//! - `cli` - Command-line front end for the assistant
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
