//! Deterministic prompt assembly.
//!
//! The composed prompt is a pure function of the query and the gathered
//! context: identical inputs produce byte-identical output, which keeps the
//! pipeline testable. The order-history block (and the order-status
//! behavioral instruction) appears only when order context is present.

use askama::Template;

use crate::context::PromptContext;

/// User-turn prompt template for the completion endpoint.
#[derive(Template)]
#[template(path = "assistant/prompt.txt")]
struct AssistantPromptTemplate<'a> {
    query: &'a str,
    products: &'a str,
    orders: Option<&'a str>,
}

/// Render the prompt for a query and its gathered context.
#[must_use]
pub fn compose(query: &str, context: &PromptContext) -> String {
    let products =
        serde_json::to_string_pretty(&context.products).unwrap_or_else(|_| String::from("[]"));
    let orders = context
        .orders
        .as_ref()
        .map(|orders| serde_json::to_string_pretty(orders).unwrap_or_else(|_| String::from("[]")));

    let template = AssistantPromptTemplate {
        query,
        products: &products,
        orders: orders.as_deref(),
    };

    // The template has no fallible expressions, so rendering cannot fail in
    // practice; degrade to a bare instruction line rather than erroring.
    template.render().unwrap_or_else(|_| {
        format!("You are a helpful e-commerce assistant. The user has asked: \"{query}\"")
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use shopmate_core::ProductId;

    use super::*;
    use crate::context::{OrderSummary, ProductSummary};

    fn context(orders: Option<Vec<OrderSummary>>) -> PromptContext {
        PromptContext {
            products: vec![ProductSummary {
                id: ProductId::new("p-1"),
                name: "WidgetX".to_string(),
                price: Decimal::new(4999, 2),
                description: "A widget.".to_string(),
                category: "Widgets".to_string(),
                quantity: 3,
                shipping: "Yes",
            }],
            orders,
        }
    }

    fn order() -> OrderSummary {
        OrderSummary {
            id: "o-1".to_string(),
            date: "2026-01-15".to_string(),
            status: "Shipped".to_string(),
            amount: Decimal::new(10448, 2),
            products: Vec::new(),
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let context = context(Some(vec![order()]));
        let first = compose("where is my order?", &context);
        let second = compose("where is my order?", &context);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_includes_query_and_products() {
        let prompt = compose("Tell me about WidgetX", &context(None));
        assert!(prompt.contains("The user has asked: \"Tell me about WidgetX\""));
        assert!(prompt.contains("\"name\": \"WidgetX\""));
        assert!(prompt.contains("\"shipping\": \"Yes\""));
    }

    #[test]
    fn test_anonymous_prompt_has_no_order_section() {
        let prompt = compose("What products do you have?", &context(None));
        assert!(!prompt.contains("order history"));
        assert!(!prompt.contains("order status"));
    }

    #[test]
    fn test_authenticated_prompt_has_order_section() {
        let prompt = compose("where is my order?", &context(Some(vec![order()])));
        assert!(prompt.contains("Here is the user's order history:"));
        assert!(prompt.contains("\"status\": \"Shipped\""));
        assert!(prompt.contains(
            "If they're asking about their order history or order status"
        ));
    }

    #[test]
    fn test_empty_order_history_still_renders_section() {
        // A signed-in user with no orders keeps the block, with an empty list.
        let prompt = compose("anything new?", &context(Some(Vec::new())));
        assert!(prompt.contains("Here is the user's order history:"));
        assert!(prompt.contains("[]"));
    }
}
