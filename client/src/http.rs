//! HTTP transport types and the execution seam.
//!
//! # Design
//! Requests and responses are described as plain data. `SweetShopClient`
//! builds `HttpRequest` values and parses `HttpResponse` values without ever
//! touching the network; the `Transport` impl executes the round-trip. This
//! separation keeps request construction and status interpretation fully
//! deterministic, and lets controller tests substitute a scripted transport
//! to observe exactly which requests an action issues.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded and
//! replayed freely.

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes a single HTTP round-trip.
///
/// Every call is single-shot: no retries, no cancellation. Non-2xx statuses
/// must come back as an `HttpResponse`, not an error; interpreting status
/// codes is the client's job. Only transport-level failures (connection
/// refused, DNS, timeouts) map to `ApiError::Fetch`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}
