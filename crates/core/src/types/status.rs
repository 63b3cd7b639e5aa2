//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order processing status.
///
/// Maps to the backend's order status strings. The backend owns the status
/// vocabulary, so unknown values decode to [`OrderStatus::Unknown`] instead
/// of failing the surrounding order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Not processed")]
    NotProcessed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Unknown,
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Not processed" => Self::NotProcessed,
            "Processing" => Self::Processing,
            "Shipped" => Self::Shipped,
            "Delivered" => Self::Delivered,
            "Cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotProcessed => write!(f, "Not processed"),
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
