//! Note commands and the interactive notes screen.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use std::time::Instant;

use super::display::{note_row, print_note, print_note_list, Palette};
use super::editor::edit_draft;
use super::ui::{
    clear_screen, confirm, is_interactive, prompt_field, read_key, selection_prefix, show_notice,
    status, term_size, text_input, wait_for_key, warning, FormResult, StatusBar,
};
use super::NoteArgs;
use crate::api::NotesApi;
use crate::models::NoteId;
use crate::store::KeyValueStore;
use crate::views::{NoteForm, NotesView, Notice, ResetPolicy};

impl NoteArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.date.is_none()
    }

    /// Copy the given fields into the form, leaving the rest as they are.
    fn apply(&self, form: &mut NoteForm) {
        if let Some(ref title) = self.title {
            form.title = title.clone();
        }
        if let Some(ref content) = self.content {
            form.content = content.clone();
        }
        if let Some(ref tags) = self.tags {
            form.tags = tags.clone();
        }
        if let Some(date) = self.date {
            form.date = Some(date);
        }
    }
}

/// Turn a notice into the command's outcome.
fn finish(notice: Notice) -> Result<()> {
    if notice.is_success() {
        status(notice.message());
        Ok(())
    } else {
        Err(anyhow!(notice.to_string()))
    }
}

/// Load the note list, failing the command if the server refuses.
fn load<A: NotesApi, S: KeyValueStore + Clone>(view: &mut NotesView<A, S>) -> Result<()> {
    match view.load() {
        Some(notice) => Err(anyhow!(notice.to_string())),
        None => Ok(()),
    }
}

/// Print the notes matching `query` (all notes without one).
pub fn run_list<A: NotesApi, S: KeyValueStore + Clone>(
    api: A,
    store: S,
    query: Option<&str>,
    palette: Palette,
) -> Result<()> {
    let mut view = NotesView::new(api, store, ResetPolicy::default());
    load(&mut view)?;
    view.set_search_query(query.unwrap_or_default());
    print_note_list(&view.visible_notes(), palette);
    Ok(())
}

/// Create a note from flags, prompting for missing fields on a terminal.
pub fn run_add<A: NotesApi, S: KeyValueStore + Clone>(
    api: A,
    store: S,
    policy: ResetPolicy,
    fields: &NoteArgs,
) -> Result<()> {
    let mut view = NotesView::new(api, store, policy);
    view.toggle_form();
    fields.apply(view.form_mut());

    if view.form().missing_field().is_some() && is_interactive() && !fill_form(view.form_mut())? {
        return Ok(());
    }

    finish(view.submit())
}

/// Update a note. Without flags the fields are edited interactively.
pub fn run_edit<A: NotesApi, S: KeyValueStore + Clone>(
    api: A,
    store: S,
    policy: ResetPolicy,
    id: &NoteId,
    fields: &NoteArgs,
) -> Result<()> {
    let mut view = NotesView::new(api, store, policy);
    load(&mut view)?;
    if !view.begin_edit(id) {
        return Err(anyhow!("No note with id {}", id));
    }

    if !fields.is_empty() {
        fields.apply(view.form_mut());
    } else if !is_interactive() {
        return Err(anyhow!(
            "Nothing to change. Pass --title, --content, --tags or --date."
        ));
    } else if !fill_form(view.form_mut())? {
        view.cancel_edit();
        return Ok(());
    }

    finish(view.submit())
}

/// Delete a note after confirmation (skipped with `force`).
pub fn run_delete<A: NotesApi, S: KeyValueStore + Clone>(
    api: A,
    store: S,
    id: &NoteId,
    force: bool,
    palette: Palette,
) -> Result<()> {
    let mut view = NotesView::new(api, store, ResetPolicy::default());
    load(&mut view)?;

    let Some(note) = view.find(id).cloned() else {
        return Err(anyhow!("No note with id {}", id));
    };

    if !force {
        print_note(&note, palette);
        println!();
        if !confirm(&format!("Delete {}?", note.title))? {
            return Ok(());
        }
    }

    finish(view.delete(id))
}

/// Prompt for every form field, showing current values.
/// Returns false if the user cancelled.
fn fill_form(form: &mut NoteForm) -> Result<bool> {
    let fields: [(&str, &mut String); 3] = [
        ("title", &mut form.title),
        ("content", &mut form.content),
        ("tags", &mut form.tags),
    ];
    for (label, value) in fields {
        match prompt_field(label, Some(value.as_str()))? {
            FormResult::Value(v) => *value = v,
            FormResult::Cancelled => return Ok(false),
        }
    }

    loop {
        let current = form.date.map(|d| d.to_string());
        match prompt_field("date", current.as_deref())? {
            FormResult::Cancelled => return Ok(false),
            FormResult::Value(v) if v.is_empty() => {
                form.date = None;
                return Ok(true);
            }
            FormResult::Value(v) => match parse_date(&v) {
                Some(date) => {
                    form.date = Some(date);
                    return Ok(true);
                }
                None => warning("Dates look like 2024-05-31."),
            },
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// Interactive screen
// ============================================================================

/// Browse, search and edit notes with single-key commands.
pub fn run_notes_screen<A: NotesApi, S: KeyValueStore + Clone>(
    api: A,
    store: S,
    policy: ResetPolicy,
    palette: Palette,
) -> Result<()> {
    let mut view = NotesView::new(api, store, policy);
    if let Some(notice) = view.load() {
        show_notice(&notice);
        wait_for_key()?;
    }

    let mut selected = 0usize;

    loop {
        let visible: Vec<NoteId> = view.visible_notes().iter().map(|n| n.id.clone()).collect();
        selected = selected.min(visible.len().saturating_sub(1));

        clear_screen()?;
        render_screen(&view, &visible, selected, palette);

        let notice = match read_key()? {
            KeyCode::Down | KeyCode::Char('j') => {
                if selected + 1 < visible.len() {
                    selected += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                selected = selected.saturating_sub(1);
                None
            }
            KeyCode::Char('/') => {
                view.toggle_search();
                if view.panels().search {
                    let current = view.search_query().to_string();
                    if let Some(query) = text_input("search: ", Some(current.as_str()))? {
                        view.set_search_query(query);
                    }
                } else {
                    view.set_search_query("");
                }
                selected = 0;
                None
            }
            KeyCode::Char('a') => {
                if view.panels().form {
                    view.cancel_edit();
                    None
                } else {
                    view.toggle_form();
                    submit_form(&mut view)?
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => match visible.get(selected) {
                Some(id) if view.begin_edit(id) => submit_form(&mut view)?,
                _ => None,
            },
            KeyCode::Char('d') => match visible.get(selected) {
                Some(id) => {
                    let title = view.find(id).map(|n| n.title.clone()).unwrap_or_default();
                    if confirm(&format!("Delete {}?", title))? {
                        Some(view.delete(id))
                    } else {
                        None
                    }
                }
                None => None,
            },
            KeyCode::Char('n') => {
                view.toggle_notes();
                None
            }
            KeyCode::Char('w') => {
                view.toggle_editor(Instant::now())?;
                if let Some(editor) = view.editor_mut() {
                    edit_draft(editor, None, "draft")?;
                }
                view.toggle_editor(Instant::now())?;
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            _ => None,
        };

        if let Some(notice) = notice {
            show_notice(&notice);
            wait_for_key()?;
        }
    }
}

/// Run the form prompts for the open form, then submit or cancel.
fn submit_form<A: NotesApi, S: KeyValueStore + Clone>(
    view: &mut NotesView<A, S>,
) -> Result<Option<Notice>> {
    println!();
    if fill_form(view.form_mut())? {
        Ok(Some(view.submit()))
    } else {
        view.cancel_edit();
        Ok(None)
    }
}

fn render_screen<A: NotesApi, S: KeyValueStore + Clone>(
    view: &NotesView<A, S>,
    visible: &[NoteId],
    selected: usize,
    palette: Palette,
) {
    println!("notes");
    if view.panels().search {
        println!("search: {}", view.search_query());
    }
    println!();

    if view.panels().notes {
        if visible.is_empty() {
            println!("No notes.");
        }
        let (width, _) = term_size();
        for (i, id) in visible.iter().enumerate() {
            if let Some(note) = view.find(id) {
                println!(
                    "{}{}",
                    selection_prefix(i == selected),
                    note_row(note, width.saturating_sub(2), palette)
                );
            }
        }
        println!();
    }

    let bar = StatusBar::new()
        .counter((selected + 1).min(visible.len()), visible.len())
        .action("a", "")
        .action("e", "dit")
        .action("d", "elete")
        .action("/", "search")
        .action("n", "otes")
        .action("w", "rite")
        .separator()
        .action("q", "uit");
    println!("{}  [a] {}", bar.render(), view.form_toggle_label());
}
