//! Data models for extracted message history
//!
//! This module contains the typed records the extraction queries map into at
//! the datastore boundary, plus the serde mapping onto the snapshot's field
//! names. Raw query tuples never leave the extraction layer.

use chrono::{DateTime, Local};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Body text substituted whenever the underlying `text_data` field is absent.
///
/// Inherited from the source schema, which conflates "content was deleted"
/// with "content was never textual" (media-only messages). The [`MessageRecord::revoked`]
/// flag carries the actual revocation signal.
pub const DELETED_MESSAGE_SENTINEL: &str = "[Deleted Message]";

/// Resolved author of a message row.
///
/// Unresolved senders are a true absence marker rather than a literal
/// `"null"` string, so a contact whose identifier happens to be the text
/// `null` stays distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderIdentity {
    /// Authored by the local account (`from_me = 1`)
    Me,
    /// Resolved identifier string (phone- or group-based handle)
    Known(String),
    /// Sender row id was NULL or did not resolve to an identifier
    Unknown,
}

impl SenderIdentity {
    /// Map the raw `(from_me, raw_string)` pair from a query row.
    #[must_use]
    pub fn from_row(from_me: bool, raw: Option<String>) -> Self {
        if from_me {
            Self::Me
        } else {
            match raw {
                Some(identity) => Self::Known(identity),
                None => Self::Unknown,
            }
        }
    }

    /// True for self-authored rows.
    #[must_use]
    pub const fn is_me(&self) -> bool {
        matches!(self, Self::Me)
    }

    /// The resolved identifier, if there is one.
    #[must_use]
    pub fn as_known(&self) -> Option<&str> {
        match self {
            Self::Known(identity) => Some(identity),
            _ => None,
        }
    }
}

impl Serialize for SenderIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Me => serializer.serialize_str("Me"),
            Self::Known(identity) => serializer.serialize_str(identity),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for SenderIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => Self::Unknown,
            Some(raw) if raw == "Me" => Self::Me,
            Some(raw) => Self::Known(raw),
        })
    }
}

/// A chat identity with its message count, one row per `jid.raw_string`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatActivity {
    /// Identifier the chat resolves to
    #[serde(rename = "Chat Name")]
    pub identity: String,
    /// Number of messages belonging to this chat (zero allowed)
    #[serde(rename = "Message Count")]
    pub message_count: i64,
}

/// A sender identity with its message count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactActivity {
    /// Resolved sender, the `Me` sentinel, or unresolved
    #[serde(rename = "Contact")]
    pub sender: SenderIdentity,
    /// Number of messages this sender authored
    #[serde(rename = "Message Count")]
    pub message_count: i64,
}

/// A single extracted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Source-assigned unique id
    #[serde(rename = "Message ID")]
    pub id: i64,
    /// Identity of the chat the message belongs to, when resolvable
    #[serde(rename = "Chat Name")]
    pub chat: Option<String>,
    /// Resolved author
    #[serde(rename = "Sender Identity")]
    pub sender: SenderIdentity,
    /// Creation time, converted from epoch milliseconds to local time
    #[serde(rename = "Timestamp", with = "local_timestamp")]
    pub timestamp: DateTime<Local>,
    /// Textual body; `None` serializes as [`DELETED_MESSAGE_SENTINEL`]
    #[serde(
        rename = "Message",
        serialize_with = "serialize_body",
        deserialize_with = "deserialize_body"
    )]
    pub body: Option<String>,
    /// Whether a revocation record exists for this id.
    ///
    /// Not part of the snapshot wire format; an absent body alone does not
    /// imply revocation.
    #[serde(skip)]
    pub revoked: bool,
}

/// A message whose content was explicitly retracted after sending.
///
/// Extracted independently of [`MessageRecord`]; the two collections overlap
/// by id on purpose and must not be deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedMessageRecord {
    /// Source-assigned unique id of the original message
    #[serde(rename = "Message ID")]
    pub id: i64,
    /// Identity of the chat the message belonged to, when resolvable
    #[serde(rename = "Chat Name")]
    pub chat: Option<String>,
    /// Resolved author of the original message
    #[serde(rename = "Sender Identity")]
    pub sender: SenderIdentity,
    /// Original creation time
    #[serde(rename = "Timestamp", with = "local_timestamp")]
    pub timestamp: DateTime<Local>,
    /// Always absent; serializes as the deletion sentinel
    #[serde(
        rename = "Message",
        serialize_with = "serialize_body",
        deserialize_with = "deserialize_body"
    )]
    pub body: Option<String>,
    /// When the retraction was recorded
    #[serde(rename = "Revoke Timestamp", with = "local_timestamp")]
    pub revoke_timestamp: DateTime<Local>,
}

/// The four named record collections one extraction run produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Per-chat message counts, ordered by count descending
    #[serde(rename = "Chats")]
    pub chats: Vec<ChatActivity>,
    /// Per-sender message counts, ordered by count descending
    #[serde(rename = "Contacts")]
    pub contacts: Vec<ContactActivity>,
    /// All messages, newest first
    #[serde(rename = "Messages")]
    pub messages: Vec<MessageRecord>,
    /// Revoked messages, newest-revoked first
    #[serde(rename = "Deleted Messages")]
    pub revoked: Vec<RevokedMessageRecord>,
}

impl Snapshot {
    /// True when no collection holds any row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
            && self.contacts.is_empty()
            && self.messages.is_empty()
            && self.revoked.is_empty()
    }
}

fn serialize_body<S: Serializer>(body: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(body.as_deref().unwrap_or(DELETED_MESSAGE_SENTINEL))
}

fn deserialize_body<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(if raw == DELETED_MESSAGE_SENTINEL {
        None
    } else {
        Some(raw)
    })
}

/// Serde adapter for local-time timestamps in the snapshot's
/// `"%Y-%m-%d %H:%M:%S"` string form.
mod local_timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::de::{Deserializer, Error as DeError};
    use serde::ser::Serializer;
    use serde::Deserialize;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S: Serializer>(
        timestamp: &DateTime<Local>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(DeError::custom)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| DeError::custom(format!("timestamp {raw} does not exist in local time")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_sender_identity_from_row() {
        assert_eq!(SenderIdentity::from_row(true, None), SenderIdentity::Me);
        assert_eq!(
            SenderIdentity::from_row(false, Some("4915551234@s.whatsapp.net".to_string())),
            SenderIdentity::Known("4915551234@s.whatsapp.net".to_string())
        );
        assert_eq!(SenderIdentity::from_row(false, None), SenderIdentity::Unknown);
    }

    #[test]
    fn test_message_record_field_names() {
        let record = MessageRecord {
            id: 7,
            chat: Some("group@g.us".to_string()),
            sender: SenderIdentity::Me,
            timestamp: fixed_timestamp(),
            body: Some("hello".to_string()),
            revoked: false,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Message ID"], 7);
        assert_eq!(json["Chat Name"], "group@g.us");
        assert_eq!(json["Sender Identity"], "Me");
        assert_eq!(json["Timestamp"], "2024-05-01 12:30:00");
        assert_eq!(json["Message"], "hello");
        // The revocation flag is internal, never on the wire.
        assert!(json.get("revoked").is_none());
    }

    #[test]
    fn test_absent_body_serializes_as_sentinel() {
        let record = MessageRecord {
            id: 1,
            chat: None,
            sender: SenderIdentity::Unknown,
            timestamp: fixed_timestamp(),
            body: None,
            revoked: false,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Message"], DELETED_MESSAGE_SENTINEL);
        assert_eq!(json["Sender Identity"], serde_json::Value::Null);
        assert_eq!(json["Chat Name"], serde_json::Value::Null);
    }

    #[test]
    fn test_message_record_round_trip() {
        let record = MessageRecord {
            id: 42,
            chat: Some("4915551234@s.whatsapp.net".to_string()),
            sender: SenderIdentity::Known("4915559999@s.whatsapp.net".to_string()),
            timestamp: fixed_timestamp(),
            body: None,
            revoked: true,
        };

        let json = serde_json::to_string(&record).unwrap();
        let decoded: MessageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, record.id);
        assert_eq!(decoded.sender, record.sender);
        assert_eq!(decoded.timestamp, record.timestamp);
        // Sentinel body decodes back to absence; the skipped flag defaults.
        assert_eq!(decoded.body, None);
        assert!(!decoded.revoked);
    }

    #[test]
    fn test_snapshot_keys_and_emptiness() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());

        let json = serde_json::to_value(&snapshot).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        for key in ["Chats", "Contacts", "Messages", "Deleted Messages"] {
            assert!(object.contains_key(key), "missing collection {key}");
        }
    }

    #[test]
    fn test_literal_null_string_stays_a_known_identity() {
        let sender: SenderIdentity = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(sender, SenderIdentity::Known("null".to_string()));

        let sender: SenderIdentity = serde_json::from_str("null").unwrap();
        assert_eq!(sender, SenderIdentity::Unknown);
    }
}
