//! Stateless HTTP request builder and response parser for the sweet shop API.
//!
//! # Design
//! `SweetShopClient` holds only a `base_url` and carries no mutable state
//! between calls. Each backend operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Every `build_*` method takes the current bearer token as
//! an argument and attaches it when present; the client itself never reads
//! ambient session state.
//!
//! Failure bodies of the shape `{"detail": "..."}` are parsed here, once, and
//! mapped to a discriminated `ApiError` kind with a per-operation fallback
//! message when the body carries no usable detail.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthResponse, CreateSweet, LoginRequest, PurchaseRequest, RegisterUser, SearchQuery, Sweet,
    UpdateSweet,
};

/// Synchronous, stateless client for the sweet shop API.
#[derive(Debug, Clone)]
pub struct SweetShopClient {
    base_url: String,
}

impl SweetShopClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // --- auth ---

    pub fn build_register(
        &self,
        token: Option<&str>,
        input: &RegisterUser,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Post,
            format!("{}/auth/register", self.base_url),
            token,
            input,
        )
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        if response.status != 201 {
            return Err(ApiError::Auth(detail_message(
                &response.body,
                "Registration failed",
            )));
        }
        deserialize(&response.body)
    }

    pub fn build_login(
        &self,
        token: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        let input = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.json_request(
            HttpMethod::Post,
            format!("{}/auth/login", self.base_url),
            token,
            &input,
        )
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        if response.status != 200 {
            return Err(ApiError::Auth(detail_message(
                &response.body,
                "Login failed",
            )));
        }
        deserialize(&response.body)
    }

    // --- inventory ---

    pub fn build_list_sweets(&self, token: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/sweets", self.base_url),
            headers: bearer_headers(token),
            body: None,
        }
    }

    pub fn parse_list_sweets(&self, response: HttpResponse) -> Result<Vec<Sweet>, ApiError> {
        check_status(&response, 200, "Failed to load sweets")?;
        deserialize(&response.body)
    }

    pub fn build_search_sweets(&self, token: Option<&str>, query: &SearchQuery) -> HttpRequest {
        let mut params = Vec::new();
        if let Some(name) = &query.name {
            params.push(format!("name={}", encode_query(name)));
        }
        if let Some(category) = &query.category {
            params.push(format!("category={}", encode_query(category)));
        }
        if let Some(min_price) = query.min_price {
            params.push(format!("min_price={min_price}"));
        }
        if let Some(max_price) = query.max_price {
            params.push(format!("max_price={max_price}"));
        }
        let mut path = format!("{}/sweets/search", self.base_url);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: bearer_headers(token),
            body: None,
        }
    }

    pub fn parse_search_sweets(&self, response: HttpResponse) -> Result<Vec<Sweet>, ApiError> {
        check_status(&response, 200, "Search failed")?;
        deserialize(&response.body)
    }

    pub fn build_create_sweet(
        &self,
        token: Option<&str>,
        input: &CreateSweet,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Post,
            format!("{}/sweets", self.base_url),
            token,
            input,
        )
    }

    pub fn parse_create_sweet(&self, response: HttpResponse) -> Result<Sweet, ApiError> {
        check_status(&response, 201, "Operation failed")?;
        deserialize(&response.body)
    }

    pub fn build_update_sweet(
        &self,
        token: Option<&str>,
        id: i64,
        input: &UpdateSweet,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            format!("{}/sweets/{id}", self.base_url),
            token,
            input,
        )
    }

    pub fn parse_update_sweet(&self, response: HttpResponse) -> Result<Sweet, ApiError> {
        check_status(&response, 200, "Operation failed")?;
        deserialize(&response.body)
    }

    pub fn build_delete_sweet(&self, token: Option<&str>, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/sweets/{id}", self.base_url),
            headers: bearer_headers(token),
            body: None,
        }
    }

    pub fn parse_delete_sweet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204, "Delete failed")
    }

    pub fn build_purchase_sweet(
        &self,
        token: Option<&str>,
        id: i64,
        quantity: u32,
    ) -> Result<HttpRequest, ApiError> {
        let input = PurchaseRequest { quantity };
        self.json_request(
            HttpMethod::Post,
            format!("{}/sweets/{id}/purchase", self.base_url),
            token,
            &input,
        )
    }

    pub fn parse_purchase_sweet(&self, response: HttpResponse) -> Result<Sweet, ApiError> {
        // 400 on purchase is the insufficient-stock rejection, not a
        // validation failure.
        if response.status == 400 {
            return Err(ApiError::Conflict(detail_message(
                &response.body,
                "Purchase failed",
            )));
        }
        check_status(&response, 200, "Purchase failed")?;
        deserialize(&response.body)
    }

    fn json_request<T: serde::Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        token: Option<&str>,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = bearer_headers(token);
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method,
            path,
            headers,
            body: Some(body),
        })
    }
}

fn bearer_headers(token: Option<&str>) -> Vec<(String, String)> {
    match token {
        Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
        None => Vec::new(),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant,
/// surfacing the backend's detail message when the body carries one.
fn check_status(response: &HttpResponse, expected: u16, fallback: &str) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(match response.status {
        401 | 403 => ApiError::Auth(detail_message(&response.body, "Not authenticated")),
        404 => ApiError::NotFound(detail_message(&response.body, fallback)),
        400 | 422 => ApiError::Validation(detail_message(&response.body, fallback)),
        _ => ApiError::Fetch(detail_message(&response.body, fallback)),
    })
}

/// Extract the backend's `{"detail": "..."}` message, falling back to a
/// generic per-operation message when the body has no usable string detail
/// (framework validation errors put an array there).
fn detail_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

fn deserialize<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Percent-encode a query-string component. Unreserved characters pass
/// through; everything else, including spaces, is `%XX`-escaped.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
