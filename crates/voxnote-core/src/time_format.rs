//! Serde helpers for the wire time format.
//!
//! Event times travel as `"HH:MM"` (24h). chrono's default `NaiveTime`
//! serde uses `HH:MM:SS%.f`, which does not round-trip against the
//! extraction contract, so the `Option<NaiveTime>` fields use this module.

/// Serde module for `Option<NaiveTime>` as `"HH:MM"`.
///
/// Deserialization also accepts `"HH:MM:SS"` since some model responses
/// include seconds despite the instructions.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                NaiveTime::parse_from_str(trimmed, FORMAT)
                    .or_else(|_| NaiveTime::parse_from_str(trimmed, FORMAT_WITH_SECONDS))
                    .map(Some)
                    .map_err(|_| {
                        serde::de::Error::custom(format!("invalid HH:MM time: {trimmed:?}"))
                    })
            }
        }
    }
}
