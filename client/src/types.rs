//! Domain DTOs for the sweet shop API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently.
//! Integration tests against the mock server catch any schema drift between
//! the two crates. Ids are server-assigned integers and immutable after
//! creation.

use serde::{Deserialize, Serialize};

/// A single sweet returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Sweet {
    /// A sweet with zero stock cannot be purchased; the shell renders it as
    /// "Out of Stock" and disables the buy action.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

/// Request payload for creating a new sweet. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for updating an existing sweet. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSweet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Registration credentials. Validation beyond field presence is the
/// backend's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token issued on successful login or registration. The token is opaque;
/// its presence is what means "authenticated".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Request payload for purchasing a sweet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub quantity: u32,
}

impl Default for PurchaseRequest {
    fn default() -> Self {
        Self { quantity: 1 }
    }
}

/// Filters for `GET /sweets/search`. All fields are optional; absent fields
/// are omitted from the query string entirely.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchQuery {
    /// Name-substring filter, the only one the inventory view exposes.
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}
