mod auth;
mod note;

pub use auth::{Credentials, ErrorBody, ForgotPasswordRequest, TokenResponse};
pub use note::{filter_notes, parse_tags, Note, NoteId, NoteInput};
