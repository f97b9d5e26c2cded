//! Extraction response schema validation.
//!
//! The generative step is instructed to return `{tasks, events, notes}`
//! matching the wire contract exactly. Responses are parsed strictly and
//! then semantically validated; any deviation is an extraction error, never
//! a silent fallback.

use crate::error::{Error, Result};
use crate::models::StructuredState;

/// Strip a single surrounding markdown code fence, if present.
///
/// Models occasionally wrap the JSON body in ```` ```json ... ``` ````
/// despite instructions; the payload inside is still contract-conformant.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "markdown", ...) on the opening fence.
    match body.split_once('\n') {
        Some((_, content)) => content.trim(),
        None => body.trim(),
    }
}

/// Parse and validate a structured extraction response.
pub fn parse_extraction(raw: &str) -> Result<StructuredState> {
    let body = strip_code_fence(raw);
    let state: StructuredState = serde_json::from_str(body)
        .map_err(|e| Error::Extraction(format!("response is not valid extraction JSON: {e}")))?;
    validate(&state)?;
    Ok(state)
}

/// Semantic validation on top of the serde shape check: required string
/// fields must be non-blank.
pub fn validate(state: &StructuredState) -> Result<()> {
    for (index, task) in state.tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(Error::Extraction(format!(
                "task {index} has an empty title"
            )));
        }
        for (sub_index, subtask) in task.subtasks.iter().enumerate() {
            if subtask.title.trim().is_empty() {
                return Err(Error::Extraction(format!(
                    "task {index} subtask {sub_index} has an empty title"
                )));
            }
        }
    }
    for (index, event) in state.events.iter().enumerate() {
        if event.title.trim().is_empty() {
            return Err(Error::Extraction(format!(
                "event {index} has an empty title"
            )));
        }
    }
    for (index, note) in state.notes.iter().enumerate() {
        if note.content.trim().is_empty() {
            return Err(Error::Extraction(format!(
                "note {index} has empty content"
            )));
        }
    }
    Ok(())
}
