use tracing::{debug, warn};

use crate::api::AuthApi;
use crate::models::Credentials;

const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

pub struct SignupView<A: AuthApi> {
    api: A,
    pub username: String,
    pub password: String,
    submitted: bool,
    error: Option<String>,
}

impl<A: AuthApi> SignupView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            username: String::new(),
            password: String::new(),
            submitted: false,
            error: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Register the entered credentials. No token is issued.
    pub fn signup(&mut self) -> bool {
        let credentials = Credentials::new(self.username.trim(), self.password.clone());
        if !credentials.is_complete() {
            self.error = Some("Username and password are required.".to_string());
            return false;
        }

        match self.api.signup(&credentials) {
            Ok(()) => {
                debug!(username = %credentials.username, "signed up");
                self.submitted = true;
                self.error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                self.error = Some(e.user_message(SIGNUP_FAILED));
                false
            }
        }
    }
}
