//! HTTP client for the remote note service.

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{ApiError, AuthApi, NotesApi};
use crate::models::{
    Credentials, ErrorBody, ForgotPasswordRequest, Note, NoteId, NoteInput, TokenResponse,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client speaking the `/api/...` JSON protocol.
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid API URL: {}", base_url));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn note_endpoint(&self, id: &NoteId) -> Url {
        let id = id.to_string();
        self.endpoint(&["api", "notes", &id])
    }

    fn authorized(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request, turning non-2xx responses into `ApiError::Rejected`.
    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let response = req.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response");

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.error);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl AuthApi for HttpClient {
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        debug!(username = %credentials.username, "login");
        let response = self.send(
            self.client
                .post(self.endpoint(&["api", "login"]))
                .json(credentials),
        )?;
        let body: TokenResponse = response.json()?;
        Ok(body.token)
    }

    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError> {
        debug!(username = %credentials.username, "signup");
        self.send(
            self.client
                .post(self.endpoint(&["api", "signup"]))
                .json(credentials),
        )?;
        Ok(())
    }

    fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        debug!("forgot password");
        self.send(
            self.client
                .post(self.endpoint(&["api", "forgot-password"]))
                .json(&ForgotPasswordRequest { email }),
        )?;
        Ok(())
    }
}

impl NotesApi for HttpClient {
    fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, ApiError> {
        let req = self.client.get(self.endpoint(&["api", "notes"]));
        let response = self.send(Self::authorized(req, token))?;
        Ok(response.json()?)
    }

    fn create_note(&self, token: Option<&str>, note: &NoteInput) -> Result<Note, ApiError> {
        let req = self.client.post(self.endpoint(&["api", "notes"])).json(note);
        let response = self.send(Self::authorized(req, token))?;
        Ok(response.json()?)
    }

    fn update_note(
        &self,
        token: Option<&str>,
        id: &NoteId,
        note: &NoteInput,
    ) -> Result<Note, ApiError> {
        let req = self.client.put(self.note_endpoint(id)).json(note);
        let response = self.send(Self::authorized(req, token))?;
        Ok(response.json()?)
    }

    fn delete_note(&self, token: Option<&str>, id: &NoteId) -> Result<(), ApiError> {
        let req = self.client.delete(self.note_endpoint(id));
        self.send(Self::authorized(req, token))?;
        Ok(())
    }
}
