//! Calendar deep link building.
//!
//! A pure string transform from an event to a Google Calendar event-edit
//! URL. No network call, no side effects; all free-text fields are
//! percent-encoded.

use tracing::warn;

use voxnote_core::{defaults, Error, Event, Result};

/// Build the calendar deep link for one event.
///
/// The `dates` parameter uses `YYYYMMDD` for all-day events and
/// `YYYYMMDDTHHMM00` when a time is present; start and end are identical.
pub fn event_link(event: &Event) -> Result<String> {
    let title = event.title.trim();
    if title.is_empty() {
        return Err(Error::CalendarLink("event title is empty".to_string()));
    }

    let stamp = match event.time {
        Some(time) => format!(
            "{}T{}00",
            event.date.format("%Y%m%d"),
            time.format("%H%M")
        ),
        None => event.date.format("%Y%m%d").to_string(),
    };

    let mut url = format!(
        "{}?text={}&dates={}/{}",
        defaults::CALENDAR_BASE_URL,
        urlencoding::encode(title),
        stamp,
        stamp
    );
    if let Some(description) = event.description.as_deref().filter(|d| !d.trim().is_empty()) {
        url.push_str(&format!("&details={}", urlencoding::encode(description)));
    }
    Ok(url)
}

/// Attach links to every event that lacks one.
///
/// Per-event failures are logged and skipped; the rest of the batch still
/// gets links. Returns the number of links attached.
pub fn attach_links(events: &mut [Event]) -> usize {
    let mut attached = 0;
    for event in events.iter_mut().filter(|e| e.calendar_link.is_none()) {
        match event_link(event) {
            Ok(link) => {
                event.calendar_link = Some(link);
                attached += 1;
            }
            Err(e) => {
                warn!(error = %e, title = %event.title, "skipping calendar link for event");
            }
        }
    }
    attached
}
