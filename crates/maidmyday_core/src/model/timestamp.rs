//! Serde adapter storing epoch-millisecond fields as ISO-8601 text.
//!
//! Snapshots are written as `2024-05-01T09:30:00.000Z` (UTC, millisecond
//! precision), the form the mobile UI persists. Reads also accept plain
//! epoch-millisecond integers written by earlier builds.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    EpochMs(i64),
    Iso(String),
}

pub fn serialize<S: Serializer>(epoch_ms: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    let instant = DateTime::<Utc>::from_timestamp_millis(*epoch_ms)
        .ok_or_else(|| S::Error::custom(format!("timestamp {epoch_ms} is out of range")))?;
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match StoredTimestamp::deserialize(deserializer)? {
        StoredTimestamp::EpochMs(epoch_ms) => Ok(epoch_ms),
        StoredTimestamp::Iso(text) => DateTime::parse_from_rfc3339(text.trim())
            .map(|parsed| parsed.timestamp_millis())
            .map_err(|err| D::Error::custom(format!("invalid timestamp `{text}`: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super")]
        at: i64,
    }

    #[test]
    fn writes_iso_text_with_millis() {
        let json = serde_json::to_string(&Stamped { at: 1_714_555_800_123 }).unwrap();
        assert_eq!(json, r#"{"at":"2024-05-01T09:30:00.123Z"}"#);
    }

    #[test]
    fn reads_iso_text_and_legacy_integers() {
        let iso: Stamped = serde_json::from_str(r#"{"at":"2024-05-01T11:30:00.123+02:00"}"#).unwrap();
        assert_eq!(iso.at, 1_714_555_800_123);
        let legacy: Stamped = serde_json::from_str(r#"{"at":1714555800123}"#).unwrap();
        assert_eq!(legacy.at, 1_714_555_800_123);
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
    }
}
