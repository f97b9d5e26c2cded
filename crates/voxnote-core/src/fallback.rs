//! Deterministic fallback extraction for when the generative step is
//! unavailable.
//!
//! A rule-based classifier turns a transcript into tasks, events, and notes
//! by keyword cues. It never consults the network, always terminates, and
//! never drops previously accumulated items, so a session degrades to
//! append-only capture instead of failing when credentials or credits run
//! out.
//!
//! Known limitation, preserved deliberately: event dates default to "today"
//! in local time even when the clause names another day ("next Friday").
//! Only the generative path resolves relative dates.

use chrono::{Local, NaiveDate};

use crate::defaults;
use crate::models::{Event, ExtractionOutcome, Note, StructuredState, Task};

/// Keyword cues that classify a clause as a task. Checked first; a clause
/// matching both a task cue and an event cue is always a task.
pub const TASK_CUES: &[&str] = &[
    "remind",
    "todo",
    "need to",
    "have to",
    "don't forget",
    "make sure",
];

/// Keyword cues that classify a clause as an event.
pub const EVENT_CUES: &[&str] = &["schedule", "meeting", "appointment", "call", "sync"];

/// Split a transcript into clauses on sentence-terminal punctuation,
/// discarding empty or whitespace-only clauses.
pub fn split_clauses(transcript: &str) -> Vec<&str> {
    transcript
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Extract tasks, events, and notes from a transcript without the
/// generative step, seeding the output with `previous` so nothing
/// accumulated is lost.
///
/// Every call produces at least one item: when neither the previous state
/// nor the transcript yields anything, the whole transcript becomes a
/// single "general" note.
pub fn extract(transcript: &str, previous: Option<&StructuredState>) -> ExtractionOutcome {
    extract_with_today(transcript, previous, Local::now().date_naive())
}

/// [`extract`] with an explicit "today", for deterministic tests.
pub fn extract_with_today(
    transcript: &str,
    previous: Option<&StructuredState>,
    today: NaiveDate,
) -> ExtractionOutcome {
    let mut state = previous.cloned().unwrap_or_default();

    for clause in split_clauses(transcript) {
        let lowered = clause.to_lowercase();

        if TASK_CUES.iter().any(|cue| lowered.contains(cue)) {
            state.tasks.push(Task::with_title(clause));
        } else if EVENT_CUES.iter().any(|cue| lowered.contains(cue)) {
            state.events.push(Event::on_date(clause, today));
        } else if clause.chars().count() > defaults::NOTE_MIN_CLAUSE_CHARS {
            state.notes.push(Note {
                content: clause.to_string(),
                category: Some(defaults::FALLBACK_NOTE_CATEGORY.to_string()),
            });
        }
        // Short clauses matching no cue are dropped.
    }

    if state.is_empty() {
        state.notes.push(Note {
            content: transcript.to_string(),
            category: Some(defaults::FALLBACK_NOTE_CATEGORY.to_string()),
        });
    }

    ExtractionOutcome {
        state,
        used_fallback: true,
    }
}

/// Deterministic document-mode fallback: append the transcript's clauses as
/// bullets under a notes section, preserving the existing document
/// byte-for-byte as a prefix.
pub fn append_to_document(current: Option<&str>, transcript: &str) -> String {
    let existing = current.map(str::trim_end).filter(|doc| !doc.is_empty());

    let mut bullets: Vec<String> = split_clauses(transcript)
        .into_iter()
        .map(|clause| format!("- {clause}"))
        .collect();
    if bullets.is_empty() {
        let whole = transcript.trim();
        if !whole.is_empty() {
            bullets.push(format!("- {whole}"));
        }
    }

    let mut document = String::new();
    match existing {
        Some(doc) => {
            document.push_str(doc);
            document.push('\n');
            if !doc.contains(defaults::DOCUMENT_NOTES_HEADING) {
                document.push('\n');
                document.push_str(defaults::DOCUMENT_NOTES_HEADING);
                document.push('\n');
            }
        }
        None => {
            document.push_str(defaults::DOCUMENT_TITLE);
            document.push_str("\n\n");
            document.push_str(defaults::DOCUMENT_NOTES_HEADING);
            document.push('\n');
        }
    }
    for bullet in &bullets {
        document.push_str(bullet);
        document.push('\n');
    }

    document
}
