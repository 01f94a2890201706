//! Notes view: the session's note list plus the create/edit form, search
//! box and embedded draft editor, driven through handler methods.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

use super::draft::DraftEditor;
use super::Notice;
use crate::api::NotesApi;
use crate::models::{filter_notes, parse_tags, Note, NoteId, NoteInput};
use crate::store::{read_token, KeyValueStore};

/// What happens to the form after a create/update request completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Clear and hide the form and leave edit mode whatever the outcome.
    #[default]
    Always,
    /// Only clear on success; keep the entered values for a retry.
    OnSuccess,
}

impl ResetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::OnSuccess => "on-success",
        }
    }
}

impl FromStr for ResetPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "on-success" | "on_success" | "onsuccess" => Ok(Self::OnSuccess),
            other => Err(anyhow::anyhow!(
                "Unknown form reset policy '{}' (expected 'always' or 'on-success')",
                other
            )),
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Independent visibility flags for the view's panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub search: bool,
    pub form: bool,
    pub editor: bool,
    pub notes: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            search: false,
            form: false,
            editor: false,
            notes: true,
        }
    }
}

/// Create/edit form fields as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    /// Comma-separated.
    pub tags: String,
    pub date: Option<NaiveDate>,
}

impl NoteForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tags: String::new(),
            date: Some(today),
        }
    }

    fn from_note(note: &Note, today: NaiveDate) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags_label(),
            date: Some(note.date.unwrap_or(today)),
        }
    }

    /// First required field left empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.content.trim().is_empty() {
            Some("content")
        } else if self.date.is_none() {
            Some("date")
        } else {
            None
        }
    }

    fn to_input(&self) -> Option<NoteInput> {
        Some(NoteInput {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: parse_tags(&self.tags),
            date: self.date?,
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct NotesView<A: NotesApi, S: KeyValueStore + Clone> {
    api: A,
    store: S,
    reset_policy: ResetPolicy,
    notes: Vec<Note>,
    loaded: bool,
    form: NoteForm,
    editing: Option<NoteId>,
    search_query: String,
    panels: Panels,
    phase: Phase,
    editor: Option<DraftEditor<S>>,
}

impl<A: NotesApi, S: KeyValueStore + Clone> NotesView<A, S> {
    pub fn new(api: A, store: S, reset_policy: ResetPolicy) -> Self {
        Self {
            api,
            store,
            reset_policy,
            notes: Vec::new(),
            loaded: false,
            form: NoteForm::blank(today()),
            editing: None,
            search_query: String::new(),
            panels: Panels::default(),
            phase: Phase::Idle,
            editor: None,
        }
    }

    // ==================== STATE ====================

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| id.refers_to(&n.id))
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NoteForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<&NoteId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn panels(&self) -> Panels {
        self.panels
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Notes matching the current search, in list order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.search_query)
    }

    pub fn editor(&self) -> Option<&DraftEditor<S>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut DraftEditor<S>> {
        self.editor.as_mut()
    }

    /// Label for the button that shows, hides or cancels the form.
    pub fn form_toggle_label(&self) -> &'static str {
        match (self.panels.form, self.is_editing()) {
            (true, true) => "Cancel Edit",
            (true, false) => "Hide Form",
            (false, true) => "Edit Notes",
            (false, false) => "Add New Notes",
        }
    }

    // ==================== HANDLERS ====================

    /// Fetch the full note list. Only the first call does anything.
    pub fn load(&mut self) -> Option<Notice> {
        if self.loaded {
            return None;
        }
        self.loaded = true;

        let token = read_token(&self.store);
        self.phase = Phase::Submitting;
        let result = self.api.list_notes(token.as_deref());
        self.phase = Phase::Idle;

        match result {
            Ok(notes) => {
                debug!(count = notes.len(), "notes loaded");
                self.notes = notes;
                None
            }
            Err(e) => {
                warn!(error = %e, "loading notes failed");
                Some(Notice::failure(e.user_message("Failed to fetch notes")))
            }
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Load a note into the form and enter edit mode. Unknown ids are ignored.
    pub fn begin_edit(&mut self, id: &NoteId) -> bool {
        let Some(note) = self.find(id) else {
            return false;
        };
        let form = NoteForm::from_note(note, today());
        self.editing = Some(note.id.clone());
        self.form = form;
        self.panels.form = true;
        true
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Create or update from the form, depending on edit mode.
    pub fn submit(&mut self) -> Notice {
        if let Some(field) = self.form.missing_field() {
            return Notice::failure(format!("{} is required", field));
        }
        let Some(input) = self.form.to_input() else {
            return Notice::failure("date is required");
        };

        let token = read_token(&self.store);
        self.phase = Phase::Submitting;
        let notice = match self.editing.clone() {
            Some(id) => match self.api.update_note(token.as_deref(), &id, &input) {
                Ok(saved) => {
                    debug!(id = %id, "note updated");
                    for note in self.notes.iter_mut().filter(|n| n.id == id) {
                        *note = saved.clone();
                    }
                    Notice::success("Note updated successfully!")
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "updating note failed");
                    Notice::failure(e.user_message("Failed to save note"))
                }
            },
            None => match self.api.create_note(token.as_deref(), &input) {
                Ok(saved) => {
                    debug!(id = %saved.id, "note created");
                    self.notes.push(saved);
                    Notice::success("Note saved successfully!")
                }
                Err(e) => {
                    warn!(error = %e, "creating note failed");
                    Notice::failure(e.user_message("Failed to save note"))
                }
            },
        };
        self.phase = Phase::Idle;

        if notice.is_success() || self.reset_policy == ResetPolicy::Always {
            self.reset_form();
        }
        notice
    }

    /// Delete on the server, then drop the note locally.
    pub fn delete(&mut self, id: &NoteId) -> Notice {
        let id = &self.find(id).map_or_else(|| id.clone(), |n| n.id.clone());
        let token = read_token(&self.store);
        self.phase = Phase::Submitting;
        let result = self.api.delete_note(token.as_deref(), id);
        self.phase = Phase::Idle;

        match result {
            Ok(()) => {
                debug!(id = %id, "note deleted");
                self.notes.retain(|n| &n.id != id);
                Notice::success("Note deleted successfully!")
            }
            Err(e) => {
                warn!(id = %id, error = %e, "deleting note failed");
                Notice::failure(e.user_message("Failed to delete note"))
            }
        }
    }

    pub fn toggle_search(&mut self) {
        self.panels.search = !self.panels.search;
    }

    pub fn toggle_form(&mut self) {
        self.panels.form = !self.panels.form;
    }

    pub fn toggle_notes(&mut self) {
        self.panels.notes = !self.panels.notes;
    }

    /// Show or hide the draft editor. Showing mounts a fresh editor over
    /// the store; hiding unmounts it.
    pub fn toggle_editor(&mut self, now: Instant) -> Result<()> {
        if self.editor.take().is_none() {
            self.editor = Some(DraftEditor::mount(self.store.clone(), now)?);
        }
        self.panels.editor = self.editor.is_some();
        Ok(())
    }

    /// Forward the clock to the mounted editor, if any.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        match self.editor.as_mut() {
            Some(editor) => editor.tick(now),
            None => Ok(false),
        }
    }

    fn reset_form(&mut self) {
        self.form = NoteForm::blank(today());
        self.panels.form = false;
        self.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::store::{MemoryStore, DRAFT_KEY, TOKEN_KEY};
    use crate::testing::FakeNotesApi;
    use std::time::Duration;

    fn note(id: i64, title: &str, tags: &[&str]) -> Note {
        Note {
            id: NoteId::Number(id),
            title: title.to_string(),
            content: format!("{} body", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2024, 5, id as u32),
        }
    }

    fn seeded() -> FakeNotesApi {
        FakeNotesApi::with_notes(vec![
            note(1, "Shopping", &["errands"]),
            note(2, "Taxes", &["finance", "urgent"]),
            note(3, "Reading list", &[]),
        ])
    }

    fn logged_in_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "tok").unwrap();
        store
    }

    fn fill(view: &mut NotesView<&FakeNotesApi, &MemoryStore>, title: &str, content: &str, tags: &str) {
        let form = view.form_mut();
        form.title = title.to_string();
        form.content = content.to_string();
        form.tags = tags.to_string();
    }

    #[test]
    fn test_load_once_with_bearer_token() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);

        assert_eq!(view.load(), None);
        assert_eq!(view.notes().len(), 3);
        assert_eq!(view.load(), None);

        assert_eq!(*api.calls.borrow(), vec!["list"]);
        assert_eq!(*api.tokens.borrow(), vec![Some("tok".to_string())]);
        assert_eq!(view.phase(), Phase::Idle);
    }

    #[test]
    fn test_load_failure_shows_message() {
        let api = seeded();
        api.fail_next(ApiError::Rejected {
            status: 401,
            message: Some("Unauthorized".to_string()),
        });
        let store = MemoryStore::new();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);

        assert_eq!(view.load(), Some(Notice::failure("Unauthorized")));
        assert!(view.notes().is_empty());
        assert_eq!(*api.tokens.borrow(), vec![None]);

        let api = seeded();
        api.fail_next(ApiError::Network("refused".to_string()));
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        assert_eq!(view.load(), Some(Notice::failure("Failed to fetch notes")));
    }

    #[test]
    fn test_create_appends_server_record() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        view.toggle_form();

        fill(&mut view, "T", "C", "a, b");
        let notice = view.submit();

        assert_eq!(notice, Notice::success("Note saved successfully!"));
        assert_eq!(view.notes().len(), 4);
        let created = view.notes().last().unwrap();
        assert_eq!(created.tags, vec!["a", "b"]);
        assert_eq!(created.title, "T");
        assert_eq!(view.notes().iter().filter(|n| n.id == created.id).count(), 1);
        assert!(!view.panels().form);
        assert_eq!(view.form().title, "");
    }

    #[test]
    fn test_edit_replaces_by_id() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        let before = view.notes().to_vec();

        assert!(view.begin_edit(&NoteId::Number(2)));
        assert!(view.panels().form);
        assert_eq!(view.form().tags, "finance, urgent");
        assert_eq!(view.form_toggle_label(), "Cancel Edit");

        view.form_mut().title = "Taxes 2024".to_string();
        let notice = view.submit();

        assert_eq!(notice, Notice::success("Note updated successfully!"));
        assert_eq!(*api.calls.borrow(), vec!["list", "update 2"]);
        assert_eq!(view.notes().len(), 3);
        assert_eq!(view.find(&NoteId::Number(2)).unwrap().title, "Taxes 2024");
        assert_eq!(view.find(&NoteId::Number(2)).unwrap().tags, vec!["finance", "urgent"]);
        assert_eq!(view.notes()[0], before[0]);
        assert_eq!(view.notes()[2], before[2]);
        assert!(!view.is_editing());
    }

    #[test]
    fn test_begin_edit_unknown_id_is_noop() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();

        assert!(!view.begin_edit(&NoteId::Number(99)));
        assert!(!view.is_editing());
        assert!(!view.panels().form);
        assert_eq!(view.form_toggle_label(), "Add New Notes");
    }

    #[test]
    fn test_failed_submit_resets_form_by_default() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        view.begin_edit(&NoteId::Number(1));
        view.form_mut().title = "Changed".to_string();

        api.fail_next(ApiError::Rejected {
            status: 500,
            message: None,
        });
        let notice = view.submit();

        assert_eq!(notice, Notice::failure("Failed to save note"));
        assert_eq!(view.find(&NoteId::Number(1)).unwrap().title, "Shopping");
        assert!(!view.is_editing());
        assert!(!view.panels().form);
        assert_eq!(view.form().title, "");
    }

    #[test]
    fn test_failed_submit_keeps_form_on_success_policy() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::OnSuccess);
        view.load();
        view.toggle_form();
        fill(&mut view, "Draft", "Body", "x");

        api.fail_next(ApiError::Rejected {
            status: 400,
            message: Some("Title and content required".to_string()),
        });
        let notice = view.submit();

        assert_eq!(notice, Notice::failure("Title and content required"));
        assert_eq!(view.notes().len(), 3);
        assert!(view.panels().form);
        assert_eq!(view.form().title, "Draft");

        // Retry succeeds and then resets.
        assert!(view.submit().is_success());
        assert_eq!(view.notes().len(), 4);
        assert!(!view.panels().form);
    }

    #[test]
    fn test_submit_requires_fields() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        view.toggle_form();

        fill(&mut view, "", "C", "");
        assert_eq!(view.submit(), Notice::failure("title is required"));

        fill(&mut view, "T", "  ", "");
        assert_eq!(view.submit(), Notice::failure("content is required"));

        fill(&mut view, "T", "C", "");
        view.form_mut().date = None;
        assert_eq!(view.submit(), Notice::failure("date is required"));

        assert_eq!(*api.calls.borrow(), vec!["list"]);
        assert!(view.panels().form);
    }

    #[test]
    fn test_delete_removes_after_confirmation() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        let id = NoteId::Number(2);

        assert_eq!(view.delete(&id), Notice::success("Note deleted successfully!"));
        assert!(view.find(&id).is_none());
        assert_eq!(view.notes().len(), 2);

        let after_first = view.notes().to_vec();
        let notice = view.delete(&id);
        assert_eq!(notice, Notice::failure("Note not found or forbidden"));
        assert_eq!(view.notes(), after_first.as_slice());
    }

    #[test]
    fn test_delete_failure_keeps_note() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();

        api.fail_next(ApiError::Network("timed out".to_string()));
        assert_eq!(view.delete(&NoteId::Number(1)), Notice::failure("Failed to delete note"));
        assert!(view.find(&NoteId::Number(1)).is_some());
    }

    #[test]
    fn test_login_token_reaches_note_requests() {
        use crate::testing::FakeAuthApi;
        use crate::views::LoginView;

        let auth = FakeAuthApi::with_user("ann", "secret");
        let api = seeded();
        let store = MemoryStore::new();

        let mut login = LoginView::new(&auth, &store);
        login.username = "ann".to_string();
        login.password = "secret".to_string();
        assert!(login.login().unwrap());

        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        assert_eq!(view.load(), None);
        assert_eq!(view.notes().len(), 3);
        assert_eq!(*api.tokens.borrow(), vec![Some("token-ann".to_string())]);
    }

    #[test]
    fn test_failed_login_leaves_requests_anonymous() {
        use crate::testing::FakeAuthApi;
        use crate::views::LoginView;

        let auth = FakeAuthApi::with_user("ann", "secret");
        let api = seeded();
        let store = MemoryStore::new();

        let mut login = LoginView::new(&auth, &store);
        login.username = "ann".to_string();
        login.password = "wrong".to_string();
        assert!(!login.login().unwrap());

        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();
        assert_eq!(*api.tokens.borrow(), vec![None]);
    }

    #[test]
    fn test_typed_ids_match_string_ids() {
        let text_note = |id: &str, title: &str| Note {
            id: NoteId::Text(id.to_string()),
            ..note(1, title, &[])
        };
        let api = FakeNotesApi::with_notes(vec![text_note("007", "Bond"), text_note("7", "Seven")]);
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();

        let padded: NoteId = "007".parse().unwrap();
        assert_eq!(view.find(&padded).unwrap().title, "Bond");

        let plain: NoteId = "7".parse().unwrap();
        assert!(view.begin_edit(&plain));
        assert_eq!(view.editing(), Some(&NoteId::Text("7".to_string())));
        view.form_mut().title = "Seven up".to_string();
        assert!(view.submit().is_success());
        assert_eq!(view.find(&plain).unwrap().title, "Seven up");

        assert!(view.delete(&padded).is_success());
        let left: Vec<_> = api.server_notes().into_iter().map(|n| n.id).collect();
        assert_eq!(left, vec![NoteId::Text("7".to_string())]);
    }

    #[test]
    fn test_search_is_derived() {
        let api = seeded();
        let store = logged_in_store();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        view.load();

        view.set_search_query("URGENT");
        let hits: Vec<_> = view.visible_notes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(hits, vec![NoteId::Number(2)]);

        view.set_search_query("nothing like this");
        assert!(view.visible_notes().is_empty());
        assert_eq!(view.notes().len(), 3);

        view.set_search_query("");
        assert_eq!(view.visible_notes().len(), 3);
    }

    #[test]
    fn test_panels_toggle_independently() {
        let api = seeded();
        let store = MemoryStore::new();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);

        assert_eq!(view.panels(), Panels::default());
        view.toggle_search();
        view.toggle_notes();
        assert!(view.panels().search);
        assert!(!view.panels().notes);
        assert!(!view.panels().form);
        assert_eq!(view.form_toggle_label(), "Add New Notes");
        view.toggle_form();
        assert_eq!(view.form_toggle_label(), "Hide Form");
    }

    #[test]
    fn test_embedded_editor_mounts_and_unmounts() {
        let api = seeded();
        let store = MemoryStore::new();
        store.set(DRAFT_KEY, "left over").unwrap();
        let mut view = NotesView::new(&api, &store, ResetPolicy::Always);
        let start = Instant::now();

        assert!(!view.tick(start).unwrap());
        view.toggle_editor(start).unwrap();
        assert!(view.panels().editor);
        assert_eq!(view.editor().unwrap().content(), "left over");

        view.editor_mut().unwrap().set_content("new words");
        assert!(!view.tick(start).unwrap());
        assert!(view.tick(start + Duration::from_secs(5)).unwrap());
        assert_eq!(store.get(DRAFT_KEY).unwrap(), Some("new words".to_string()));

        view.toggle_editor(start).unwrap();
        assert!(!view.panels().editor);
        assert!(view.editor().is_none());
        assert!(!view.tick(start + Duration::from_secs(60)).unwrap());
    }
}
