//! Inventory controller: owns the item snapshot and the re-fetch policy.
//!
//! # Design
//! The controller holds the only in-memory copy of the sweet list and rebuilds
//! it wholesale from the server on every cycle; a mutation response is never
//! trusted to patch local state. Every successful create/update/delete/
//! purchase is followed by exactly one unconditional full-list re-fetch, so
//! the displayed list always matches server truth at the cost of one extra
//! round trip.
//!
//! Failure recovery is deliberately asymmetric: a failed fetch/search empties
//! the list and raises the inline banner, while a failed mutation leaves the
//! list untouched and raises the blocking notice.

use std::sync::Arc;

use tracing::debug;

use crate::api::Api;
use crate::types::{CreateSweet, SearchQuery, Sweet, UpdateSweet};

/// Where the controller is inside one user action. Every action converges
/// back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Mutating,
}

pub struct Inventory {
    api: Arc<Api>,
    sweets: Vec<Sweet>,
    phase: Phase,
    banner: Option<String>,
    notice: Option<String>,
}

impl Inventory {
    pub fn new(api: Arc<Api>) -> Self {
        Self {
            api,
            sweets: Vec::new(),
            phase: Phase::Idle,
            banner: None,
            notice: None,
        }
    }

    /// The current snapshot. Empty is a valid "no items" state, not an error.
    pub fn sweets(&self) -> &[Sweet] {
        &self.sweets
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Inline error shown with the (emptied) list after a failed fetch/search.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Blocking message from the last mutation, success or failure.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Full, unfiltered list fetch. The result replaces the snapshot
    /// wholesale; on failure the snapshot is emptied and the banner raised.
    pub fn refresh(&mut self) {
        self.phase = Phase::Loading;
        self.banner = None;
        match self.api.list_sweets() {
            Ok(sweets) => {
                debug!(count = sweets.len(), "inventory refreshed");
                self.sweets = sweets;
            }
            Err(err) => {
                self.sweets.clear();
                self.banner = Some(err.to_string());
            }
        }
        self.phase = Phase::Idle;
    }

    /// Name-filtered search. An empty or whitespace-only term behaves exactly
    /// like an unfiltered list fetch.
    pub fn search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.refresh();
            return;
        }
        self.phase = Phase::Loading;
        self.banner = None;
        match self.api.search_sweets(&SearchQuery::by_name(term)) {
            Ok(sweets) => self.sweets = sweets,
            Err(err) => {
                self.sweets.clear();
                self.banner = Some(err.to_string());
            }
        }
        self.phase = Phase::Idle;
    }

    pub fn create(&mut self, input: &CreateSweet) {
        self.notice = None;
        self.phase = Phase::Mutating;
        match self.api.create_sweet(input) {
            Ok(sweet) => {
                debug!(id = sweet.id, "sweet created");
                self.notice = Some("Success!".to_string());
                self.refresh();
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                self.phase = Phase::Idle;
            }
        }
    }

    pub fn update(&mut self, id: i64, input: &UpdateSweet) {
        self.notice = None;
        self.phase = Phase::Mutating;
        match self.api.update_sweet(id, input) {
            Ok(_) => {
                self.notice = Some("Success!".to_string());
                self.refresh();
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                self.phase = Phase::Idle;
            }
        }
    }

    /// Delete requires explicit confirmation: without it no request is issued
    /// and the list stays as it was.
    pub fn delete(&mut self, id: i64, confirmed: bool) {
        self.notice = None;
        if !confirmed {
            return;
        }
        self.phase = Phase::Mutating;
        match self.api.delete_sweet(id) {
            Ok(()) => {
                self.notice = Some("Deleted successfully!".to_string());
                self.refresh();
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                self.phase = Phase::Idle;
            }
        }
    }

    /// Purchase one unit. Insufficient stock comes back as a conflict from
    /// the backend; the snapshot is never decremented locally.
    pub fn purchase(&mut self, id: i64) {
        self.notice = None;
        self.phase = Phase::Mutating;
        match self.api.purchase_sweet(id, 1) {
            Ok(_) => {
                self.notice = Some("Purchase successful!".to_string());
                self.refresh();
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                self.phase = Phase::Idle;
            }
        }
    }
}
