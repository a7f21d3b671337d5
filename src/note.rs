//! Core data model: the care note and its draft form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single authored care record.
///
/// Notes are append-only: after creation the only permitted mutations are
/// the `is_synced` false-to-true transition and the rewrite of a placeholder
/// id to the server-issued one once the backend confirms the note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Server-issued id, or a locally synthesized placeholder while the
    /// note is still waiting for confirmation.
    pub id: i64,
    pub resident_name: String,
    pub author_name: String,
    pub content: String,
    /// Authoring timestamp, set when the caregiver wrote the note (not
    /// when it reached storage). RFC 3339 on the wire.
    pub date_time: DateTime<Utc>,
    /// True iff the backend has accepted this exact note. Server payloads
    /// omit the field, so it defaults to false on deserialization.
    #[serde(default)]
    pub is_synced: bool,
}

impl Note {
    /// Rebuild the draft this note was authored from, for re-submission
    /// during the drain phase.
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            resident_name: self.resident_name.clone(),
            author_name: self.author_name.clone(),
            content: self.content.clone(),
            date_time: self.date_time,
        }
    }
}

/// Author-supplied fields of a note that does not yet have an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub resident_name: String,
    pub author_name: String,
    pub content: String,
    pub date_time: DateTime<Utc>,
}

impl NoteDraft {
    /// Materialize the draft as a stored note under the given id.
    pub fn into_note(self, id: i64, is_synced: bool) -> Note {
        Note {
            id,
            resident_name: self.resident_name,
            author_name: self.author_name,
            content: self.content,
            date_time: self.date_time,
            is_synced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let note = Note {
            id: 7,
            resident_name: "A".to_string(),
            author_name: "B".to_string(),
            content: "stable".to_string(),
            date_time: Utc::now(),
            is_synced: true,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("residentName").is_some());
        assert!(json.get("authorName").is_some());
        assert!(json.get("dateTime").is_some());
        assert!(json.get("isSynced").is_some());
    }

    #[test]
    fn is_synced_defaults_to_false() {
        let json = r#"{
            "id": 12,
            "residentName": "A",
            "authorName": "B",
            "content": "no issues noted",
            "dateTime": "2024-05-01T09:30:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(!note.is_synced);
    }
}
