//! Draft editor: a single length-limited scratch text, auto-persisted
//! to the key-value store and handed to a save sink on demand.

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::debug;

use super::Notice;
use crate::store::{KeyValueStore, DRAFT_KEY};

/// Maximum draft length in characters.
pub const CHAR_LIMIT: usize = 2000;

/// How often a mounted editor writes its content to the store.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Receives finished draft content, e.g. to turn it into a note.
pub trait DraftSink {
    fn save_draft(&mut self, content: &str) -> Result<()>;
}

impl<F> DraftSink for F
where
    F: FnMut(&str) -> Result<()>,
{
    fn save_draft(&mut self, content: &str) -> Result<()> {
        self(content)
    }
}

/// A mounted draft editor. Dropping it stops auto-persisting.
pub struct DraftEditor<S: KeyValueStore> {
    store: S,
    content: String,
    char_count: usize,
    interval_start: Instant,
    /// Set by edits; the next tick restarts the interval.
    edited: bool,
}

impl<S: KeyValueStore> DraftEditor<S> {
    /// Mount the editor, restoring any draft left in the store.
    pub fn mount(store: S, now: Instant) -> Result<Self> {
        let content = store.get(DRAFT_KEY)?.unwrap_or_default();
        let char_count = content.chars().count();
        debug!(chars = char_count, "draft editor mounted");

        Ok(Self {
            store,
            content,
            char_count,
            interval_start: now,
            edited: false,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn remaining(&self) -> usize {
        CHAR_LIMIT.saturating_sub(self.char_count)
    }

    /// Replace the content. Values over the limit are ignored and `false`
    /// is returned.
    pub fn set_content(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let count = value.chars().count();
        if count > CHAR_LIMIT {
            return false;
        }
        self.content = value;
        self.char_count = count;
        self.edited = true;
        true
    }

    /// Append one character, subject to the same limit.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.char_count >= CHAR_LIMIT {
            return false;
        }
        self.content.push(c);
        self.char_count += 1;
        self.edited = true;
        true
    }

    pub fn pop_char(&mut self) -> Option<char> {
        let c = self.content.pop()?;
        self.char_count -= 1;
        self.edited = true;
        Some(c)
    }

    /// Drive auto-persist and return whether the content was written.
    ///
    /// The content is written each time a full interval passes without
    /// edits. The editor does not read the clock on edits, so an edit
    /// restarts the interval at the first tick after it rather than at the
    /// moment of the change. Callers that tick often (the terminal editor
    /// ticks at least every 250 ms) keep that lag below one tick period.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if self.edited {
            self.edited = false;
            self.interval_start = now;
            return Ok(false);
        }
        if now.saturating_duration_since(self.interval_start) < AUTOSAVE_INTERVAL {
            return Ok(false);
        }
        self.persist()?;
        self.interval_start = now;
        Ok(true)
    }

    /// Write the current content to the store.
    pub fn persist(&self) -> Result<()> {
        self.store.set(DRAFT_KEY, &self.content)
    }

    /// Save locally only; used when no sink is wired in.
    pub fn save(&mut self) -> Result<()> {
        self.persist()
    }

    /// Save locally, then hand the content to `sink`.
    ///
    /// On success the editor and the stored draft are cleared. On failure
    /// the content is kept for another attempt.
    pub fn save_with<D: DraftSink + ?Sized>(&mut self, sink: &mut D) -> Result<Notice> {
        self.persist()?;

        match sink.save_draft(&self.content) {
            Ok(()) => {
                self.content.clear();
                self.char_count = 0;
                self.store.remove(DRAFT_KEY)?;
                debug!("draft handed off");
                Ok(Notice::success("Draft saved."))
            }
            Err(e) => {
                debug!(error = %e, "draft sink failed");
                Ok(Notice::failure(e.to_string()))
            }
        }
    }
}
