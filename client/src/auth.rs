//! Login/registration flow controller.
//!
//! # Design
//! `LoggedOut → Authenticating → LoggedIn` on success, or back to `LoggedOut`
//! with a surfaced error message on failure, leaving the form retry-safe.
//! A successful submit persists the returned token together with the
//! submitted username, which is what the shell displays as the identity.
//! A failed persist is logged but does not block the login: the in-memory
//! session still covers the current run.

use std::sync::Arc;

use tracing::warn;

use crate::api::Api;
use crate::session::SessionStore;
use crate::types::RegisterUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    Authenticating,
    LoggedIn,
}

pub struct AuthFlow {
    api: Arc<Api>,
    session: Arc<SessionStore>,
    state: AuthState,
    error: Option<String>,
}

impl AuthFlow {
    /// A session found in the store at startup means we start logged in.
    pub fn new(api: Arc<Api>, session: Arc<SessionStore>) -> Self {
        let state = if session.get().is_some() {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        };
        Self {
            api,
            session,
            state,
            error: None,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// The message to surface on the form, set by the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_login(&mut self, username: &str, password: &str) {
        if self.state == AuthState::Authenticating {
            return;
        }
        self.error = None;
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            self.error = Some("Username and password are required".to_string());
            return;
        }
        self.state = AuthState::Authenticating;
        match self.api.login(username, password) {
            Ok(auth) => self.complete(&auth.access_token, username),
            Err(err) => {
                self.error = Some(err.to_string());
                self.state = AuthState::LoggedOut;
            }
        }
    }

    /// Registration also yields a token: a successful register logs the user
    /// straight in.
    pub fn submit_register(&mut self, input: &RegisterUser) {
        if self.state == AuthState::Authenticating {
            return;
        }
        self.error = None;
        if input.username.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.trim().is_empty()
        {
            self.error = Some("Username, email and password are required".to_string());
            return;
        }
        self.state = AuthState::Authenticating;
        match self.api.register(input) {
            Ok(auth) => {
                let username = input.username.trim().to_string();
                self.complete(&auth.access_token, &username);
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.state = AuthState::LoggedOut;
            }
        }
    }

    /// Tear down the session: both persisted values go together.
    pub fn logout(&mut self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "failed to remove persisted session");
        }
        self.state = AuthState::LoggedOut;
        self.error = None;
    }

    fn complete(&mut self, token: &str, username: &str) {
        if let Err(err) = self.session.set(token, username) {
            warn!(error = %err, "failed to persist session");
        }
        self.state = AuthState::LoggedIn;
    }
}
