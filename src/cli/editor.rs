//! Raw-mode screen for the draft editor.

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::debug;

use super::ui::{is_interactive, StatusBar, Term};
use crate::api::NotesApi;
use crate::models::NoteInput;
use crate::store::{read_token, KeyValueStore};
use crate::views::{DraftEditor, DraftSink, Notice, CHAR_LIMIT};

/// How long to wait for a key before driving auto-persist.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Open the draft editor. With `publish`, Ctrl-S turns the draft into a
/// note with that title; without it, Ctrl-S only saves locally.
pub fn run_draft<A: NotesApi, S: KeyValueStore>(
    api: A,
    store: S,
    publish: Option<String>,
) -> Result<()> {
    if !is_interactive() {
        bail!("The draft editor requires a terminal.");
    }

    let mut editor = DraftEditor::mount(&store, Instant::now())?;

    match publish {
        Some(title) => {
            let heading = format!("draft: publishes as \"{}\"", title);
            let mut publish_note = |content: &str| -> Result<()> {
                if content.trim().is_empty() {
                    bail!("content is required");
                }
                let input = NoteInput {
                    title: title.clone(),
                    content: content.to_string(),
                    tags: Vec::new(),
                    date: Local::now().date_naive(),
                };
                let token = read_token(&store);
                let note = api
                    .create_note(token.as_deref(), &input)
                    .map_err(|e| anyhow!(e.user_message("Failed to save note")))?;
                debug!(id = %note.id, "draft published");
                Ok(())
            };
            let sink: &mut dyn DraftSink = &mut publish_note;
            edit_draft(&mut editor, Some(sink), &heading)
        }
        None => edit_draft(&mut editor, None, "draft"),
    }
}

/// Drive a mounted editor until the user leaves with Esc or Ctrl-C.
///
/// Keys edit the content, Ctrl-S saves (through `sink` when given) and the
/// editor is ticked between key presses so auto-persist keeps running.
pub fn edit_draft<S: KeyValueStore>(
    editor: &mut DraftEditor<S>,
    mut sink: Option<&mut dyn DraftSink>,
    heading: &str,
) -> Result<()> {
    let mut term = Term::try_raw()?;
    let mut notice: Option<Notice> = None;
    let mut dirty = true;

    loop {
        if dirty {
            render(&mut term, editor, heading, notice.as_ref(), sink.is_some());
            dirty = false;
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                dirty = true;
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if ctrl => break,
                    KeyCode::Char('s') if ctrl => {
                        notice = Some(match sink.as_deref_mut() {
                            Some(sink) => editor.save_with(sink)?,
                            None => {
                                editor.save()?;
                                Notice::success("Draft saved locally.")
                            }
                        });
                    }
                    KeyCode::Backspace => {
                        editor.pop_char();
                    }
                    KeyCode::Enter => {
                        notice = insert(editor, '\n');
                    }
                    KeyCode::Char(c) if !ctrl => {
                        notice = insert(editor, c);
                    }
                    _ => dirty = false,
                }
            }
        }

        editor.tick(Instant::now())?;
    }

    // Keep what was typed since the last auto-persist.
    editor.persist()?;
    drop(term);
    println!();
    Ok(())
}

fn insert<S: KeyValueStore>(editor: &mut DraftEditor<S>, c: char) -> Option<Notice> {
    if editor.push_char(c) {
        None
    } else {
        Some(Notice::failure(format!(
            "Limit of {} characters reached.",
            CHAR_LIMIT
        )))
    }
}

fn render<S: KeyValueStore>(
    term: &mut Term,
    editor: &DraftEditor<S>,
    heading: &str,
    notice: Option<&Notice>,
    publishes: bool,
) {
    term.clear();
    term.line(heading);
    term.line("");
    term.print(editor.content());
    term.line("");
    term.line("");

    if let Some(notice) = notice {
        term.line(notice.message());
    }

    let bar = StatusBar::new()
        .counter(editor.char_count(), CHAR_LIMIT)
        .action("ctrl-s", if publishes { " publish" } else { " save" })
        .separator()
        .action("esc", " close");
    term.print(&bar.render());
    term.flush();
}
