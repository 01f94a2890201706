//! Login form with the forgot-password sub-form.

use anyhow::Result;
use tracing::{debug, warn};

use super::Notice;
use crate::api::AuthApi;
use crate::models::Credentials;
use crate::store::{KeyValueStore, TOKEN_KEY};

const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
const LOGIN_UNAVAILABLE: &str = "An error occurred while logging in. Please try again later.";
const RESET_SENT: &str = "Password reset link has been sent to your email.";
const RESET_FAILED: &str = "Failed to send password reset link. Check the email address.";
const RESET_UNAVAILABLE: &str =
    "An error occurred while sending the password reset link. Please try again later.";

pub struct LoginView<A: AuthApi, S: KeyValueStore> {
    api: A,
    store: S,
    pub username: String,
    pub password: String,
    submitted: bool,
    loading: bool,
    error: Option<String>,
    /// `Some` while the forgot-password sub-form is shown; holds the email.
    forgot_email: Option<String>,
}

impl<A: AuthApi, S: KeyValueStore> LoginView<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            username: String::new(),
            password: String::new(),
            submitted: false,
            loading: false,
            error: None,
            forgot_email: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Exchange the entered credentials for a token and store it.
    ///
    /// Returns whether the login succeeded; failures are reported through
    /// [`LoginView::error`]. Only a store write failure is an `Err`.
    pub fn login(&mut self) -> Result<bool> {
        let credentials = Credentials::new(self.username.trim(), self.password.clone());
        if !credentials.is_complete() {
            self.error = Some("Username and password are required.".to_string());
            return Ok(false);
        }

        self.loading = true;
        let result = self.api.login(&credentials);
        self.loading = false;

        match result {
            Ok(token) => {
                self.store.set(TOKEN_KEY, &token)?;
                debug!(username = %credentials.username, "logged in");
                self.submitted = true;
                self.error = None;
                self.username.clear();
                self.password.clear();
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.error = Some(if e.is_network() {
                    LOGIN_UNAVAILABLE.to_string()
                } else {
                    e.user_message(LOGIN_FAILED)
                });
                Ok(false)
            }
        }
    }

    // ==================== FORGOT PASSWORD ====================

    pub fn is_forgot_password_shown(&self) -> bool {
        self.forgot_email.is_some()
    }

    pub fn show_forgot_password(&mut self) {
        self.forgot_email.get_or_insert_with(String::new);
    }

    pub fn cancel_forgot_password(&mut self) {
        self.forgot_email = None;
    }

    /// The sub-form's email field, if the sub-form is shown.
    pub fn forgot_email_mut(&mut self) -> Option<&mut String> {
        self.forgot_email.as_mut()
    }

    /// Request a reset link. Success hides and clears the sub-form.
    pub fn submit_forgot_password(&mut self) -> Notice {
        let email = self.forgot_email.as_deref().unwrap_or_default().trim().to_string();
        if email.is_empty() {
            return Notice::failure("Email is required.");
        }

        match self.api.forgot_password(&email) {
            Ok(()) => {
                self.forgot_email = None;
                Notice::success(RESET_SENT)
            }
            Err(e) => {
                warn!(error = %e, "password reset request failed");
                Notice::failure(if e.is_network() {
                    RESET_UNAVAILABLE.to_string()
                } else {
                    e.user_message(RESET_FAILED)
                })
            }
        }
    }
}
