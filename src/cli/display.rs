use chrono::{Datelike, Local, NaiveDate};
use crossterm::style::Stylize;

use super::ui::{term_size, truncate};
use crate::models::Note;

/// Colours for note output, chosen by the dark-mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub dark: bool,
}

impl Palette {
    pub fn new(dark: bool) -> Self {
        Self { dark }
    }

    fn heading(&self, s: &str) -> String {
        if self.dark {
            s.cyan().bold().to_string()
        } else {
            s.dark_blue().bold().to_string()
        }
    }

    fn muted(&self, s: &str) -> String {
        if self.dark {
            s.grey().to_string()
        } else {
            s.dark_grey().to_string()
        }
    }
}

/// Print one note in full (only non-empty fields)
pub fn print_note(note: &Note, palette: Palette) {
    println!("{}", palette.heading(&note.title));
    println!("{}", palette.muted(&format!("#{}  {}", note.id, format_date(note.date))));

    if !note.tags.is_empty() {
        println!("{}", palette.muted(&note.tags_label()));
    }

    if !note.content.is_empty() {
        println!();
        for line in note.content.lines() {
            println!("  {}", line);
        }
    }
}

/// Print notes as one row each, or a placeholder when there are none.
pub fn print_note_list(notes: &[&Note], palette: Palette) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    let (width, _) = term_size();
    for note in notes {
        println!("{}", note_row(note, width, palette));
    }
}

/// `  12  May 3       Title  tag, tag` fitted to `width` columns.
pub fn note_row(note: &Note, width: usize, palette: Palette) -> String {
    let prefix = format!("{:>4}  {:<12}  ", note.id.to_string(), format_date(note.date));
    let room = width.saturating_sub(prefix.chars().count() + 1);
    let mut body = note.title.clone();
    if !note.tags.is_empty() {
        body.push_str("  ");
        body.push_str(&note.tags_label());
    }
    format!("{}{}", palette.muted(&prefix), truncate(&body, room))
}

/// Short date: this year omits the year, missing dates show a dash.
pub fn format_date(date: Option<NaiveDate>) -> String {
    let Some(date) = date else {
        return "-".to_string();
    };
    if date.year() == Local::now().year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}
