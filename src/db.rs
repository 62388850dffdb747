//! Read-only access to a WhatsApp msgstore.db datastore.
//!
//! All four extraction queries resolve internal row ids to human-readable
//! identities through LEFT JOINs against the `jid` dictionary table, so a
//! partially-resolvable row is preserved with a NULL identity instead of
//! being dropped. Query results are mapped into the typed records from
//! [`crate::models`] right here at the boundary.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use rusqlite::{Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::models::{
    ChatActivity, ContactActivity, MessageRecord, RevokedMessageRecord, SenderIdentity, Snapshot,
};
use crate::schema::{chat, jid, message, message_revoked};

/// An open, read-only handle to a msgstore.db file.
///
/// The connection is held exclusively for the duration of extraction; drop
/// the handle before hashing or serializing so the read lock is released
/// first.
#[derive(Debug)]
pub struct Msgstore {
    conn: Connection,
    path: PathBuf,
}

impl Msgstore {
    /// Open the datastore read-only.
    ///
    /// A missing or unreadable file is an [`ExtractError::Open`], raised
    /// before any extraction attempt.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ExtractError::open(path, "file not found"));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| ExtractError::open(path, e.to_string()))?;

        info!("Opened datastore at {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Path this handle was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One row per identifier with its message count, ordered by count
    /// descending.
    ///
    /// Ties keep the datastore's natural row order, which is stable for a
    /// fixed file but not guaranteed identical across datastore versions.
    pub fn list_chats(&self) -> Result<Vec<ChatActivity>> {
        let query = format!(
            "SELECT j.{raw} AS chat_name, COUNT(m.{msg_id}) AS message_count \
             FROM {jid} j \
             LEFT JOIN {chat} c ON j.{jid_id} = c.{chat_jid} \
             LEFT JOIN {message} m ON c.{chat_id} = m.{msg_chat} \
             GROUP BY j.{raw} \
             ORDER BY message_count DESC",
            raw = jid::RAW_STRING,
            msg_id = message::ID,
            jid = jid::TABLE,
            chat = chat::TABLE,
            jid_id = jid::ID,
            chat_jid = chat::JID_ROW_ID,
            message = message::TABLE,
            chat_id = chat::ID,
            msg_chat = message::CHAT_ROW_ID,
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok(ChatActivity {
                identity: row.get(0)?,
                message_count: row.get(1)?,
            })
        })?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(row?);
        }

        debug!("Extracted {} chat rows", chats.len());
        Ok(chats)
    }

    /// One row per distinct sender with its message count, ordered by count
    /// descending.
    ///
    /// Self-authored messages group under the `Me` sentinel; messages whose
    /// sender id does not resolve group under the unresolved sender.
    pub fn list_contacts(&self) -> Result<Vec<ContactActivity>> {
        let query = format!(
            "SELECT m.{from_me}, j.{raw} AS sender, COUNT(m.{msg_id}) AS message_count \
             FROM {message} m \
             LEFT JOIN {jid} j ON m.{sender_jid} = j.{jid_id} \
             GROUP BY m.{from_me}, j.{raw} \
             ORDER BY message_count DESC",
            from_me = message::FROM_ME,
            raw = jid::RAW_STRING,
            msg_id = message::ID,
            message = message::TABLE,
            jid = jid::TABLE,
            sender_jid = message::SENDER_JID_ROW_ID,
            jid_id = jid::ID,
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let from_me: i64 = row.get(0)?;
            let raw: Option<String> = row.get(1)?;
            Ok(ContactActivity {
                sender: SenderIdentity::from_row(from_me != 0, raw),
                message_count: row.get(2)?,
            })
        })?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row?);
        }

        debug!("Extracted {} contact rows", contacts.len());
        Ok(contacts)
    }

    /// All messages, newest first.
    ///
    /// Chat and sender identities resolve through two independent joins of
    /// the jid table; the revocation flag comes from the `message_revoked`
    /// table so an absent body alone never counts as revoked.
    pub fn list_messages(&self) -> Result<Vec<MessageRecord>> {
        let query = format!(
            "SELECT m.{msg_id}, cj.{raw} AS chat_name, m.{from_me}, sj.{raw} AS sender, \
                    m.{timestamp}, m.{text}, \
                    EXISTS(SELECT 1 FROM {revoked} mr WHERE mr.{revoked_msg} = m.{msg_id}) AS revoked \
             FROM {message} m \
             LEFT JOIN {jid} cj ON m.{chat_row} = cj.{jid_id} \
             LEFT JOIN {jid} sj ON m.{sender_jid} = sj.{jid_id} \
             ORDER BY m.{timestamp} DESC",
            msg_id = message::ID,
            raw = jid::RAW_STRING,
            from_me = message::FROM_ME,
            timestamp = message::TIMESTAMP,
            text = message::TEXT_DATA,
            revoked = message_revoked::TABLE,
            revoked_msg = message_revoked::MESSAGE_ROW_ID,
            message = message::TABLE,
            jid = jid::TABLE,
            chat_row = message::CHAT_ROW_ID,
            sender_jid = message::SENDER_JID_ROW_ID,
            jid_id = jid::ID,
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let from_me: i64 = row.get(2)?;
            let sender_raw: Option<String> = row.get(3)?;
            let revoked: i64 = row.get(6)?;
            Ok(MessageRecord {
                id: row.get(0)?,
                chat: row.get(1)?,
                sender: SenderIdentity::from_row(from_me != 0, sender_raw),
                timestamp: read_local_timestamp(row, 4)?,
                body: row.get(5)?,
                revoked: revoked != 0,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }

        debug!("Extracted {} message rows", messages.len());
        Ok(messages)
    }

    /// All explicitly retracted messages, newest-revoked first.
    ///
    /// A revocation always has its original message row, so the join to
    /// `message` is required; identity resolution stays optional.
    pub fn list_revoked(&self) -> Result<Vec<RevokedMessageRecord>> {
        let query = format!(
            "SELECT m.{msg_id}, cj.{raw} AS chat_name, m.{from_me}, sj.{raw} AS sender, \
                    m.{timestamp}, mr.{revoke_ts} \
             FROM {revoked} mr \
             JOIN {message} m ON mr.{revoked_msg} = m.{msg_id} \
             LEFT JOIN {jid} cj ON m.{chat_row} = cj.{jid_id} \
             LEFT JOIN {jid} sj ON m.{sender_jid} = sj.{jid_id} \
             ORDER BY mr.{revoke_ts} DESC",
            msg_id = message::ID,
            raw = jid::RAW_STRING,
            from_me = message::FROM_ME,
            timestamp = message::TIMESTAMP,
            revoke_ts = message_revoked::REVOKE_TIMESTAMP,
            revoked = message_revoked::TABLE,
            revoked_msg = message_revoked::MESSAGE_ROW_ID,
            message = message::TABLE,
            jid = jid::TABLE,
            chat_row = message::CHAT_ROW_ID,
            sender_jid = message::SENDER_JID_ROW_ID,
            jid_id = jid::ID,
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let from_me: i64 = row.get(2)?;
            let sender_raw: Option<String> = row.get(3)?;
            Ok(RevokedMessageRecord {
                id: row.get(0)?,
                chat: row.get(1)?,
                sender: SenderIdentity::from_row(from_me != 0, sender_raw),
                timestamp: read_local_timestamp(row, 4)?,
                body: None,
                revoke_timestamp: read_local_timestamp(row, 5)?,
            })
        })?;

        let mut revoked = Vec::new();
        for row in rows {
            revoked.push(row?);
        }

        debug!("Extracted {} revoked message rows", revoked.len());
        Ok(revoked)
    }

    /// Run all four extraction queries against this handle.
    ///
    /// Any single query failure surfaces as [`ExtractError::DataAccess`];
    /// the caller decides whether to treat the run as empty.
    pub fn extract_all(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            chats: self.list_chats()?,
            contacts: self.list_contacts()?,
            messages: self.list_messages()?,
            revoked: self.list_revoked()?,
        })
    }
}

/// Convert an epoch-millisecond column to local time.
fn read_local_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Local>> {
    let millis: i64 = row.get(idx)?;
    Local
        .timestamp_millis_opt(millis)
        .single()
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}
