//! Client-side session and data-synchronization layer for the sweet shop API.
//!
//! # Overview
//! Three pieces stack up from leaf to root:
//! - [`SessionStore`] owns the persisted token/display-name pair, read once
//!   at startup and cleared on logout.
//! - [`SweetShopClient`] builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network; [`Api`] wires it to
//!   a [`Transport`] and the session store, attaching the bearer token to
//!   every outgoing request.
//! - [`AuthFlow`] and [`Inventory`] are the controllers: login/registration
//!   with retry-safe error surfacing, and the item list with its strict
//!   fetch-after-mutation policy.
//!
//! # Design
//! - Requests are single-shot: no retries, no cancellation, last fetch wins.
//! - Errors are parsed once at the API boundary into a discriminated
//!   [`ApiError`] carrying the backend's human-readable detail.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod inventory;
pub mod session;
pub mod transport;
pub mod types;

pub use api::Api;
pub use auth::{AuthFlow, AuthState};
pub use client::SweetShopClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use inventory::{Inventory, Phase};
pub use session::{Session, SessionStore};
pub use transport::UreqTransport;
pub use types::{
    AuthResponse, CreateSweet, LoginRequest, PurchaseRequest, RegisterUser, SearchQuery, Sweet,
    UpdateSweet,
};
