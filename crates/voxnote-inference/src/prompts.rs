//! System prompts for the generative extraction and merge steps.
//!
//! Both builders are pure functions of the prior state, today's date, and
//! optional free-text context. The prompts define the entire merge
//! contract: the model receives the previous state in full and must return
//! the complete next state, never a diff.

use chrono::NaiveDate;

use voxnote_core::StructuredState;

/// System prompt for structured extraction.
///
/// When a non-empty previous state is supplied, the prompt switches into
/// merge mode: the model must update referenced items in place, append new
/// ones, drop or complete cancelled ones, and retain everything the new
/// transcript does not mention.
pub fn structured_extraction_prompt(
    previous: Option<&StructuredState>,
    today: NaiveDate,
    context: Option<&str>,
) -> String {
    let mut prompt = String::from(
        "You are an AI assistant that extracts actionable items from voice note transcripts.\n\
         \n\
         This is an ITERATIVE session. The user may record multiple audio segments in sequence.\n",
    );

    match previous.filter(|state| !state.is_empty()) {
        Some(state) => {
            let serialized = serde_json::to_string_pretty(state)
                .unwrap_or_else(|_| "{}".to_string());
            prompt.push_str(
                "\n**IMPORTANT: Previous State Exists**\n\
                 You have been provided with the user's previous tasks, events, and notes from \
                 earlier recordings.\n\
                 The user's NEW transcript may:\n\
                 - Add new tasks, events, or notes\n\
                 - Update or modify existing items (e.g., \"move that deadline to next week\", \
                 \"cancel the meeting\")\n\
                 - Complete or delete tasks (e.g., \"I finished the report\", \"scratch that task\")\n\
                 - Add subtasks to existing tasks\n\
                 - Reference previous items implicitly or explicitly\n\
                 \n\
                 Your job is to MERGE the new transcript with the previous state intelligently:\n\
                 1. If the user mentions updating/modifying an existing item, UPDATE it in your output\n\
                 2. If the user adds new items, ADD them to the existing ones\n\
                 3. If the user completes or cancels items, REMOVE them or mark as completed\n\
                 4. Maintain all items that aren't mentioned in the new transcript\n\
                 5. Use context clues to match references (e.g., \"the meeting\" likely refers to \
                 a recent event)\n\
                 \n\
                 PREVIOUS STATE:\n",
            );
            prompt.push_str(&serialized);
            prompt.push('\n');
        }
        None => {
            prompt.push_str(
                "\nThis is the FIRST recording in the session. Extract all tasks, events, and \
                 notes from the transcript.\n",
            );
        }
    }

    prompt.push_str(
        "\nAnalyze the NEW transcript and extract/update:\n\
         1. **Tasks**: Action items with optional due dates, priority, and subtasks\n\
         2. **Events**: Calendar events with dates and times\n\
         3. **Notes**: General information or ideas\n\
         \n\
         Return ONLY valid JSON in this exact format (ALL items, merged with previous state):\n\
         {\n\
         \x20 \"tasks\": [\n\
         \x20   {\n\
         \x20     \"title\": \"string\",\n\
         \x20     \"description\": \"string\",\n\
         \x20     \"due_date\": \"YYYY-MM-DD or null\",\n\
         \x20     \"priority\": \"low|medium|high\",\n\
         \x20     \"subtasks\": [\n\
         \x20       {\n\
         \x20         \"title\": \"string\",\n\
         \x20         \"completed\": false\n\
         \x20       }\n\
         \x20     ]\n\
         \x20   }\n\
         \x20 ],\n\
         \x20 \"events\": [\n\
         \x20   {\n\
         \x20     \"title\": \"string\",\n\
         \x20     \"date\": \"YYYY-MM-DD\",\n\
         \x20     \"time\": \"HH:MM or null\",\n\
         \x20     \"description\": \"string\"\n\
         \x20   }\n\
         \x20 ],\n\
         \x20 \"notes\": [\n\
         \x20   {\n\
         \x20     \"content\": \"string\",\n\
         \x20     \"category\": \"string or null\"\n\
         \x20   }\n\
         \x20 ]\n\
         }\n\
         \n\
         Important:\n\
         - Break down complex tasks into subtasks when appropriate\n\
         - Subtasks should be specific, actionable steps\n\
         - The \"subtasks\" array can be empty or omitted if not needed\n\
         - All subtasks default to completed: false\n\
         - When merging, include ALL relevant items (previous + new/updated)\n\
         - Use intelligent matching to identify which previous items are being referenced\n\
         \n",
    );
    prompt.push_str(&format!("Today's date is {today}.\n"));

    if let Some(extra) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\nAdditional Context: {extra}\n"));
    }

    prompt
}

/// System prompt for the document-mode merge.
///
/// The model receives the current Markdown document verbatim and must
/// return the complete replacement document as raw text; the entire
/// response body becomes the new document.
pub fn document_update_prompt(
    current: Option<&str>,
    today: NaiveDate,
    context: Option<&str>,
) -> String {
    let mut prompt = String::from(
        "You are an AI assistant that maintains and updates a Markdown document based on voice \
         note transcripts.\n\
         \n\
         This is an ITERATIVE session. The user may record multiple audio segments in sequence, \
         and you will update the same Markdown document with each new transcript.\n",
    );

    match current.filter(|doc| !doc.trim().is_empty()) {
        Some(document) => {
            prompt.push_str(
                "\n**IMPORTANT: Existing Document Provided**\n\
                 You have been given the current state of the user's Markdown document.\n\
                 The user's NEW transcript may:\n\
                 - Add new tasks, events, or notes to the document\n\
                 - Update or modify existing items (e.g., \"move that deadline to next week\", \
                 \"cancel the meeting\")\n\
                 - Complete tasks (mark checkboxes as checked)\n\
                 - Delete or remove items (e.g., \"scratch that task\", \"I finished the report - \
                 remove it\")\n\
                 - Add details or context to existing items\n\
                 - Reference previous items implicitly or explicitly\n\
                 \n\
                 Your job is to UPDATE the Markdown document intelligently:\n\
                 1. If the user mentions updating/modifying an existing item, UPDATE it in place, \
                 preserving its position\n\
                 2. If the user adds new items, ADD them to the appropriate section\n\
                 3. If the user completes tasks, CHECK the checkbox: - [ ] becomes - [x]\n\
                 4. If the user cancels or removes items, DELETE the entire item and its nested \
                 sub-bullets\n\
                 5. Maintain all items that aren't mentioned in the new transcript\n\
                 6. Use context clues to match references (e.g., \"the meeting\" likely refers to \
                 a recent event)\n\
                 7. Preserve the overall structure and formatting of the document\n\
                 \n\
                 CURRENT MARKDOWN DOCUMENT:\n\
                 ```markdown\n",
            );
            prompt.push_str(document);
            prompt.push_str("\n```\n");
        }
        None => {
            prompt.push_str(
                "\nThis is the FIRST recording in the session. Create a new Markdown document \
                 with all tasks, events, and notes from the transcript.\n",
            );
        }
    }

    prompt.push_str(
        "\n## Instructions\n\
         \n\
         Analyze the NEW transcript and update the Markdown document accordingly.\n\
         \n\
         ### Document Structure\n\
         \n\
         Use this recommended structure (adapt as needed based on content):\n\
         \n\
         ```markdown\n\
         # My Notes\n\
         \n\
         ## Tasks\n\
         - [ ] Task title (due: YYYY-MM-DD) [priority: high/medium/low]\n\
         \x20 - Additional details or description\n\
         \x20 - [ ] Subtask 1\n\
         \x20 - [ ] Subtask 2\n\
         \n\
         ## Events\n\
         - **Event title**: YYYY-MM-DD @ HH:MM\n\
         \x20 - Event description or details\n\
         \n\
         ## Notes\n\
         - General note or idea\n\
         - Another observation\n\
         ```\n\
         \n\
         ### Merging Logic\n\
         \n\
         - **Adding new items**: Append to the appropriate section\n\
         - **Updating items**: Modify in place, preserving position unless reordering is mentioned\n\
         - **Completing tasks**: Change - [ ] to - [x]\n\
         - **Removing items**: Delete the entire item and its sub-bullets/details\n\
         - **Context matching**: Use semantic understanding to match references (e.g., \"the \
         dentist appointment\" matches \"Dentist checkup\")\n\
         - **Date handling**: If the user says \"tomorrow\", \"next week\", etc., calculate the \
         actual date based on today\n\
         \n\
         ### Output Format\n\
         \n\
         Return ONLY the updated Markdown document. Do not include:\n\
         - JSON formatting\n\
         - Code fences around the entire output\n\
         - Explanations or commentary\n\
         - Metadata or frontmatter (unless already present in the current document)\n\
         \n\
         Just output the raw Markdown text that should replace the current document.\n\
         \n",
    );
    prompt.push_str(&format!("Today's date is {today}.\n"));

    if let Some(extra) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\nAdditional Context: {extra}\n"));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxnote_core::models::Task;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_first_recording_prompt_has_no_merge_section() {
        let prompt = structured_extraction_prompt(None, today(), None);
        assert!(prompt.contains("FIRST recording"));
        assert!(!prompt.contains("PREVIOUS STATE"));
        assert!(prompt.contains("Today's date is 2026-08-05"));
    }

    #[test]
    fn test_empty_previous_state_treated_as_first_recording() {
        let empty = StructuredState::default();
        let prompt = structured_extraction_prompt(Some(&empty), today(), None);
        assert!(prompt.contains("FIRST recording"));
    }

    #[test]
    fn test_previous_state_serialized_in_full() {
        let previous = StructuredState {
            tasks: vec![Task::with_title("Call the dentist")],
            ..Default::default()
        };
        let prompt = structured_extraction_prompt(Some(&previous), today(), None);
        assert!(prompt.contains("PREVIOUS STATE"));
        assert!(prompt.contains("Call the dentist"));
        assert!(prompt.contains("MERGE"));
        assert!(prompt.contains("Maintain all items that aren't mentioned"));
    }

    #[test]
    fn test_structured_prompt_declares_json_shape() {
        let prompt = structured_extraction_prompt(None, today(), None);
        assert!(prompt.contains("\"due_date\": \"YYYY-MM-DD or null\""));
        assert!(prompt.contains("\"priority\": \"low|medium|high\""));
        assert!(prompt.contains("\"time\": \"HH:MM or null\""));
        assert!(prompt.contains("\"subtasks\""));
        assert!(prompt.contains("\"category\": \"string or null\""));
    }

    #[test]
    fn test_context_is_appended() {
        let prompt = structured_extraction_prompt(None, today(), Some("Work session"));
        assert!(prompt.contains("Additional Context: Work session"));
    }

    #[test]
    fn test_document_prompt_embeds_current_document() {
        let document = "# My Notes\n\n## Tasks\n- [ ] Buy milk";
        let prompt = document_update_prompt(Some(document), today(), None);
        assert!(prompt.contains(document));
        assert!(prompt.contains("- [ ] becomes - [x]"));
        assert!(prompt.contains("Delete the entire item and its sub-bullets"));
        assert!(prompt.contains("Today's date is 2026-08-05"));
    }

    #[test]
    fn test_document_prompt_without_document_creates_layout() {
        let prompt = document_update_prompt(None, today(), None);
        assert!(prompt.contains("Create a new Markdown document"));
        assert!(prompt.contains("## Tasks"));
        assert!(prompt.contains("## Events"));
        assert!(prompt.contains("## Notes"));
        assert!(prompt.contains("- [ ] Task title"));
        assert!(prompt.contains("**Event title**"));
    }

    #[test]
    fn test_document_prompt_demands_raw_output() {
        let prompt = document_update_prompt(None, today(), None);
        assert!(prompt.contains("Return ONLY the updated Markdown document"));
        assert!(prompt.contains("Explanations or commentary"));
    }

    #[test]
    fn test_blank_document_treated_as_missing() {
        let prompt = document_update_prompt(Some("   \n"), today(), None);
        assert!(prompt.contains("Create a new Markdown document"));
    }
}
