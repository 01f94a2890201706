//! Shared UI primitives for notecmd
//!
//! Design principles:
//! - Minimal: Show only what's needed
//! - Clean: No decorative borders or lines
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `title: `
//! - Action hints: key in brackets: `[e]dit`
//! - Feedback: the notice text as the server or view model wrote it

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Password, PasswordDisplayMode, Text};
use std::io::{self, IsTerminal, Write};

use crate::views::Notice;

// ============================================================================
// Terminal Writer
// ============================================================================

/// Terminal writer that handles raw mode automatically.
///
/// In raw mode, newlines are `\r\n` (carriage return + line feed).
/// In cooked mode, newlines are `\n`.
pub struct Term {
    raw_mode: bool,
    stdout: io::Stdout,
}

impl Term {
    /// Create a new terminal writer in cooked (normal) mode
    #[inline]
    pub fn new() -> Self {
        Self {
            raw_mode: false,
            stdout: io::stdout(),
        }
    }

    /// Create a new terminal writer and enter raw mode, returning error on failure.
    pub fn try_raw() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self {
            raw_mode: true,
            stdout: io::stdout(),
        })
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        self.raw_mode
    }

    /// Write a line with proper newline handling
    #[inline]
    pub fn line(&mut self, s: &str) {
        if self.raw_mode {
            let _ = write!(self.stdout, "{}\r\n", s);
        } else {
            let _ = writeln!(self.stdout, "{}", s);
        }
    }

    /// Write text without a newline. Embedded `\n` are fixed up in raw mode.
    pub fn print(&mut self, s: &str) {
        if self.raw_mode && s.contains('\n') {
            let _ = write!(self.stdout, "{}", s.replace('\n', "\r\n"));
        } else {
            let _ = write!(self.stdout, "{}", s);
        }
    }

    /// Clear the screen and move cursor to top-left
    pub fn clear(&mut self) {
        let _ = self.stdout.execute(Clear(ClearType::All));
        let _ = self.stdout.execute(cursor::MoveTo(0, 0));
        let _ = self.stdout.flush();
    }

    #[inline]
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
    }
}

// ============================================================================
// Status Bar Builder
// ============================================================================

/// Maximum actions a status bar can hold (stack-allocated)
const MAX_STATUS_ACTIONS: usize = 10;

/// Builder for consistent status bar formatting.
///
/// Example output: "2/14 [a]dd [e]dit [d]elete [q]uit"
pub struct StatusBar<'a> {
    counter: Option<(usize, usize)>,
    actions: [Option<(&'a str, &'a str)>; MAX_STATUS_ACTIONS],
    action_count: usize,
}

impl<'a> StatusBar<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            counter: None,
            actions: [None; MAX_STATUS_ACTIONS],
            action_count: 0,
        }
    }

    /// Add a counter (current/total)
    #[inline]
    pub fn counter(mut self, current: usize, total: usize) -> Self {
        self.counter = Some((current, total));
        self
    }

    /// Add an action hint (key, label)
    /// Example: `.action("e", "dit")` produces `[e]dit`
    #[inline]
    pub fn action(mut self, key: &'a str, label: &'a str) -> Self {
        if self.action_count < MAX_STATUS_ACTIONS {
            self.actions[self.action_count] = Some((key, label));
            self.action_count += 1;
        }
        self
    }

    /// Add a visual separator (" | ")
    #[inline]
    pub fn separator(mut self) -> Self {
        if self.action_count < MAX_STATUS_ACTIONS {
            self.actions[self.action_count] = Some(("|", ""));
            self.action_count += 1;
        }
        self
    }

    pub fn render(&self) -> String {
        let mut result = String::with_capacity(12 + self.action_count * 18);

        if let Some((current, total)) = self.counter {
            result.push_str(&counter(current, total));
        }

        for (key, label) in self.actions.iter().take(self.action_count).flatten() {
            if *key == "|" {
                result.push_str(" | ");
                continue;
            }
            if !result.is_empty() && !result.ends_with(" | ") {
                result.push(' ');
            }
            result.push('[');
            result.push_str(key);
            result.push(']');
            result.push_str(label);
        }

        result
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Layout Primitives
// ============================================================================

/// Return selection prefix for list items
#[inline]
pub fn selection_prefix(selected: bool) -> &'static str {
    if selected {
        "> "
    } else {
        "  "
    }
}

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept)
}

/// Format a counter string (e.g., "12/345")
#[inline]
pub fn counter(current: usize, total: usize) -> String {
    format!("{}/{}", current, total)
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Show a view-model notice: successes on stdout, failures on stderr.
pub fn show_notice(notice: &Notice) {
    if notice.is_success() {
        status(notice.message());
    } else {
        error(notice.message());
    }
}

/// Whether stdin is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

// ============================================================================
// Raw Mode Guard
// ============================================================================

/// RAII guard that ensures raw mode is disabled on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Read one key press in raw mode. Non-key events are skipped.
pub fn read_key() -> Result<KeyCode> {
    let _guard = RawModeGuard::new()?;
    loop {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            return Ok(code);
        }
    }
}

/// Wait for any key press, accepting Enter, q, or Esc
pub fn wait_for_key() -> Result<()> {
    print!("[enter]");
    io::stdout().flush()?;
    loop {
        if matches!(read_key()?, KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc) {
            break;
        }
    }
    println!();
    Ok(())
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Prompt for text input with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    let mut builder = Text::new(prompt).with_render_config(minimal_render_config());

    if let Some(d) = default {
        if !d.is_empty() {
            builder = builder.with_default(d);
        }
    }

    let result = builder.prompt_skippable()?;
    Ok(result)
}

/// Prompt for a password. Input is masked; returns None if cancelled.
pub fn password_input(prompt: &str) -> Result<Option<String>> {
    let result = Password::new(prompt)
        .with_render_config(minimal_render_config())
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt_skippable()?;
    Ok(result)
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()?;
    Ok(result)
}

// ============================================================================
// Form Input Helpers
// ============================================================================

/// Result type for form inputs that can be cancelled
pub enum FormResult<T> {
    Value(T),
    Cancelled,
}

/// Prompt for a field with optional current value
/// Format: `field [current]: ` or `field: ` if no current value
/// Empty input returns the current value (or empty string if no current)
pub fn prompt_field(field: &str, current: Option<&str>) -> Result<FormResult<String>> {
    let has_value = current.map(|v| !v.is_empty()).unwrap_or(false);
    let prompt = match current {
        Some(val) if !val.is_empty() => format!("{} [{}] (- clears): ", field, truncate(val, 30)),
        _ => format!("{}: ", field),
    };

    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();

    match result {
        Ok(input) => Ok(FormResult::Value(resolve_field_input(
            input.trim(),
            current,
            has_value,
        ))),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

/// `-` clears an existing value, empty input keeps it.
fn resolve_field_input(input: &str, current: Option<&str>, has_value: bool) -> String {
    if input == "-" && has_value {
        String::new()
    } else if input.is_empty() {
        current.unwrap_or("").to_string()
    } else {
        input.to_string()
    }
}
