//! Remote note service interface.
//!
//! The views only see these traits; [`HttpClient`] is the production
//! implementation.

use thiserror::Error;

use crate::models::{Credentials, Note, NoteId, NoteInput};

mod client;

pub use client::{HttpClient, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("request rejected ({}){}", .status, rejection_suffix(.message))]
    Rejected { status: u16, message: Option<String> },
    /// A success response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the server in an `{error}` body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message when present, the caller's fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Decode(_))
    }
}

fn rejection_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Unauthenticated account endpoints.
pub trait AuthApi {
    /// Exchange credentials for a bearer token.
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError>;

    fn forgot_password(&self, email: &str) -> Result<(), ApiError>;
}

/// Note endpoints. `token` is sent as a bearer credential when present.
pub trait NotesApi {
    fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, ApiError>;

    fn create_note(&self, token: Option<&str>, note: &NoteInput) -> Result<Note, ApiError>;

    fn update_note(
        &self,
        token: Option<&str>,
        id: &NoteId,
        note: &NoteInput,
    ) -> Result<Note, ApiError>;

    fn delete_note(&self, token: Option<&str>, id: &NoteId) -> Result<(), ApiError>;
}

impl<T: AuthApi + ?Sized> AuthApi for &T {
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        (**self).login(credentials)
    }

    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError> {
        (**self).signup(credentials)
    }

    fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        (**self).forgot_password(email)
    }
}

impl<T: NotesApi + ?Sized> NotesApi for &T {
    fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, ApiError> {
        (**self).list_notes(token)
    }

    fn create_note(&self, token: Option<&str>, note: &NoteInput) -> Result<Note, ApiError> {
        (**self).create_note(token, note)
    }

    fn update_note(
        &self,
        token: Option<&str>,
        id: &NoteId,
        note: &NoteInput,
    ) -> Result<Note, ApiError> {
        (**self).update_note(token, id, note)
    }

    fn delete_note(&self, token: Option<&str>, id: &NoteId) -> Result<(), ApiError> {
        (**self).delete_note(token, id)
    }
}
