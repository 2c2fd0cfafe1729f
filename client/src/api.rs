//! The injected API object: base URL + transport + session store.
//!
//! # Design
//! `Api` is constructed once and handed to the controllers. It reads the
//! current token from the session store for every outgoing request, executes
//! the round-trip through the injected `Transport`, and parses the response
//! at the client boundary. Every call is single-shot with no retries; the caller
//! decides whether to re-issue.

use std::sync::Arc;

use crate::client::SweetShopClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::session::SessionStore;
use crate::types::{AuthResponse, CreateSweet, RegisterUser, SearchQuery, Sweet, UpdateSweet};

pub struct Api {
    client: SweetShopClient,
    transport: Box<dyn Transport + Send + Sync>,
    session: Arc<SessionStore>,
}

impl Api {
    pub fn new(
        base_url: &str,
        transport: Box<dyn Transport + Send + Sync>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            client: SweetShopClient::new(base_url),
            transport,
            session,
        }
    }

    fn token(&self) -> Option<String> {
        self.session.get().map(|s| s.token)
    }

    pub fn register(&self, input: &RegisterUser) -> Result<AuthResponse, ApiError> {
        let token = self.token();
        let request = self.client.build_register(token.as_deref(), input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_register(response)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let token = self.token();
        let request = self.client.build_login(token.as_deref(), username, password)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_login(response)
    }

    pub fn list_sweets(&self) -> Result<Vec<Sweet>, ApiError> {
        let token = self.token();
        let request = self.client.build_list_sweets(token.as_deref());
        let response = self.transport.execute(&request)?;
        self.client.parse_list_sweets(response)
    }

    pub fn search_sweets(&self, query: &SearchQuery) -> Result<Vec<Sweet>, ApiError> {
        let token = self.token();
        let request = self.client.build_search_sweets(token.as_deref(), query);
        let response = self.transport.execute(&request)?;
        self.client.parse_search_sweets(response)
    }

    pub fn create_sweet(&self, input: &CreateSweet) -> Result<Sweet, ApiError> {
        let token = self.token();
        let request = self.client.build_create_sweet(token.as_deref(), input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_create_sweet(response)
    }

    pub fn update_sweet(&self, id: i64, input: &UpdateSweet) -> Result<Sweet, ApiError> {
        let token = self.token();
        let request = self.client.build_update_sweet(token.as_deref(), id, input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_update_sweet(response)
    }

    pub fn delete_sweet(&self, id: i64) -> Result<(), ApiError> {
        let token = self.token();
        let request = self.client.build_delete_sweet(token.as_deref(), id);
        let response = self.transport.execute(&request)?;
        self.client.parse_delete_sweet(response)
    }

    /// Purchase `quantity` units. The inventory view always passes 1.
    pub fn purchase_sweet(&self, id: i64, quantity: u32) -> Result<Sweet, ApiError> {
        let token = self.token();
        let request = self
            .client
            .build_purchase_sweet(token.as_deref(), id, quantity)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_purchase_sweet(response)
    }
}
