//! View models. Each holds the state of one screen and exposes handler
//! methods; rendering is left to the front end.

pub mod draft;
pub mod header;
pub mod login;
pub mod notes;
mod notice;
pub mod signup;

pub use draft::{DraftEditor, DraftSink, AUTOSAVE_INTERVAL, CHAR_LIMIT};
pub use header::HeaderView;
pub use login::LoginView;
pub use notes::{NoteForm, NotesView, Panels, Phase, ResetPolicy};
pub use notice::Notice;
pub use signup::SignupView;
