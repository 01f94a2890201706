//! Test doubles: in-memory fakes of the remote API and a one-shot HTTP responder.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;

use crate::api::{ApiError, AuthApi, NotesApi};
use crate::models::{Credentials, Note, NoteId, NoteInput};

// ============================================================================
// Fake note service
// ============================================================================

/// Behaves like the remote note service, keeping notes in memory.
#[derive(Default)]
pub struct FakeNotesApi {
    notes: RefCell<Vec<Note>>,
    next_id: Cell<i64>,
    failures: RefCell<VecDeque<ApiError>>,
    pub calls: RefCell<Vec<String>>,
    pub tokens: RefCell<Vec<Option<String>>>,
}

impl FakeNotesApi {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let next_id = notes
            .iter()
            .filter_map(|n| match n.id {
                NoteId::Number(i) => Some(i),
                NoteId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            notes: RefCell::new(notes),
            next_id: Cell::new(next_id),
            ..Self::default()
        }
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.failures.borrow_mut().push_back(err);
    }

    pub fn server_notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    fn record(&self, call: String, token: Option<&str>) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        self.tokens.borrow_mut().push(token.map(String::from));
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Rejected {
            status: 404,
            message: Some("Note not found or forbidden".to_string()),
        }
    }

    fn to_note(id: NoteId, input: &NoteInput) -> Note {
        Note {
            id,
            title: input.title.clone(),
            content: input.content.clone(),
            tags: input.tags.clone(),
            date: Some(input.date),
        }
    }
}

impl NotesApi for FakeNotesApi {
    fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, ApiError> {
        self.record("list".to_string(), token)?;
        Ok(self.notes.borrow().clone())
    }

    fn create_note(&self, token: Option<&str>, note: &NoteInput) -> Result<Note, ApiError> {
        self.record("create".to_string(), token)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let created = Self::to_note(NoteId::Number(id), note);
        self.notes.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_note(
        &self,
        token: Option<&str>,
        id: &NoteId,
        note: &NoteInput,
    ) -> Result<Note, ApiError> {
        self.record(format!("update {}", id), token)?;
        let mut notes = self.notes.borrow_mut();
        let slot = notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(Self::not_found)?;
        *slot = Self::to_note(id.clone(), note);
        Ok(slot.clone())
    }

    fn delete_note(&self, token: Option<&str>, id: &NoteId) -> Result<(), ApiError> {
        self.record(format!("delete {}", id), token)?;
        let mut notes = self.notes.borrow_mut();
        let before = notes.len();
        notes.retain(|n| &n.id != id);
        if notes.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

// ============================================================================
// Fake account service
// ============================================================================

#[derive(Default)]
pub struct FakeAuthApi {
    users: RefCell<HashMap<String, String>>,
    failures: RefCell<VecDeque<ApiError>>,
    pub reset_requests: RefCell<Vec<String>>,
}

impl FakeAuthApi {
    pub fn with_user(username: &str, password: &str) -> Self {
        let api = Self::default();
        api.users
            .borrow_mut()
            .insert(username.to_string(), password.to_string());
        api
    }

    pub fn fail_next(&self, err: ApiError) {
        self.failures.borrow_mut().push_back(err);
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.users.borrow().contains_key(username)
    }

    fn injected(&self) -> Result<(), ApiError> {
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn rejected(status: u16, message: &str) -> ApiError {
        ApiError::Rejected {
            status,
            message: Some(message.to_string()),
        }
    }
}

impl AuthApi for FakeAuthApi {
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.injected()?;
        match self.users.borrow().get(&credentials.username) {
            None => Err(Self::rejected(404, "User not found")),
            Some(pw) if pw != &credentials.password => Err(Self::rejected(401, "Invalid password")),
            Some(_) => Ok(format!("token-{}", credentials.username)),
        }
    }

    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.injected()?;
        let mut users = self.users.borrow_mut();
        if users.contains_key(&credentials.username) {
            return Err(Self::rejected(400, "Username already exists"));
        }
        users.insert(credentials.username.clone(), credentials.password.clone());
        Ok(())
    }

    fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.injected()?;
        if !email.contains('@') {
            return Err(Self::rejected(400, "Unknown email"));
        }
        self.reset_requests.borrow_mut().push(email.to_string());
        Ok(())
    }
}

// ============================================================================
// One-shot HTTP responder
// ============================================================================

pub struct CannedResponse {
    status: u16,
    content_type: Option<&'static str>,
    body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }
}

#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serves the given responses in order, one connection each, then stops.
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl MockServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let mut recorded = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = line.split_once(':') {
                        headers.push((k.trim().to_string(), v.trim().to_string()));
                    }
                }

                let length = headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut body = vec![0u8; length];
                reader.read_exact(&mut body).unwrap();

                let mut head = format!("HTTP/1.1 {} Canned\r\n", response.status);
                if let Some(ct) = response.content_type {
                    head.push_str(&format!("Content-Type: {}\r\n", ct));
                }
                head.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    response.body.len()
                ));
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(response.body.as_bytes()).unwrap();
                stream.flush().unwrap();

                recorded.push(RecordedRequest {
                    method,
                    path,
                    headers,
                    body: String::from_utf8(body).unwrap(),
                });
            }
            recorded
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for every canned response to be served and return what was received.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap()
    }
}
