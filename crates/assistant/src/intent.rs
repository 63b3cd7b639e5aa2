//! Query interpretation.
//!
//! A single anchored pattern decides whether the user is asking about one
//! specific product ("tell me about the blue widget") or anything else
//! (listings, recommendations, store policy). Everything that is not a
//! clear specific-product ask is treated as general.

use std::sync::LazyLock;

use regex::Regex;

/// Lead-in phrases that signal a question about one specific product.
///
/// The match is anchored and case-insensitive; the captured remainder keeps
/// its original case.
static PRODUCT_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:tell me about|what is|describe|info on|information about|details of)\s+(.+)$",
    )
    .expect("product query pattern is valid")
});

/// The interpreted intent of a user query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The user is asking about one specific product by name.
    SpecificProduct {
        /// The product name extracted from the query, trimmed.
        subject: String,
    },
    /// Anything else: listings, recommendations, pricing, policy questions.
    General,
}

/// Classify a free-text query.
///
/// A lead-in match with an empty trimmed remainder ("what is ") carries no
/// searchable subject and is classified as [`Intent::General`].
#[must_use]
pub fn classify(query: &str) -> Intent {
    let Some(captures) = PRODUCT_QUERY.captures(query) else {
        return Intent::General;
    };

    let subject = captures.get(1).map_or("", |m| m.as_str()).trim();
    if subject.is_empty() {
        Intent::General
    } else {
        Intent::SpecificProduct {
            subject: subject.to_string(),
        }
    }
}
