//! Shared fixtures: builds throwaway msgstore.db files with the subset of
//! the schema the extraction queries touch.

#![allow(dead_code)]

use std::path::Path;

use rusqlite::{params, Connection};

/// Epoch milliseconds for 2024-05-01 08:00:00 UTC; per-message offsets are
/// added on top so newer ids carry newer timestamps.
pub const BASE_MILLIS: i64 = 1_714_550_400_000;

pub fn create_schema(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE jid (_id INTEGER PRIMARY KEY, raw_string TEXT);
         CREATE TABLE chat (_id INTEGER PRIMARY KEY, jid_row_id INTEGER);
         CREATE TABLE message (
             _id INTEGER PRIMARY KEY,
             chat_row_id INTEGER,
             sender_jid_row_id INTEGER,
             from_me INTEGER NOT NULL,
             timestamp INTEGER NOT NULL,
             text_data TEXT
         );
         CREATE TABLE message_revoked (
             _id INTEGER PRIMARY KEY,
             message_row_id INTEGER NOT NULL,
             revoke_timestamp INTEGER NOT NULL
         );",
    )
    .unwrap();
    conn
}

pub fn insert_jid(conn: &Connection, id: i64, raw_string: &str) {
    conn.execute(
        "INSERT INTO jid (_id, raw_string) VALUES (?1, ?2)",
        params![id, raw_string],
    )
    .unwrap();
}

pub fn insert_chat(conn: &Connection, id: i64, jid_row_id: i64) {
    conn.execute(
        "INSERT INTO chat (_id, jid_row_id) VALUES (?1, ?2)",
        params![id, jid_row_id],
    )
    .unwrap();
}

pub fn insert_message(
    conn: &Connection,
    id: i64,
    chat_row_id: i64,
    sender_jid_row_id: Option<i64>,
    from_me: bool,
    text: Option<&str>,
) {
    conn.execute(
        "INSERT INTO message (_id, chat_row_id, sender_jid_row_id, from_me, timestamp, text_data) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            chat_row_id,
            sender_jid_row_id,
            i64::from(from_me),
            BASE_MILLIS + id * 60_000,
            text
        ],
    )
    .unwrap();
}

pub fn insert_revocation(conn: &Connection, message_row_id: i64) {
    conn.execute(
        "INSERT INTO message_revoked (message_row_id, revoke_timestamp) VALUES (?1, ?2)",
        params![message_row_id, BASE_MILLIS + message_row_id * 60_000 + 30_000],
    )
    .unwrap();
}

pub const ALICE: &str = "4915551111@s.whatsapp.net";
pub const BOB: &str = "4915552222@s.whatsapp.net";
pub const SILENT_GROUP: &str = "120363000000@g.us";

/// Two active chats plus one silent group:
///
/// - alice (jid/chat 1): outgoing #1, known reply #2, unresolved sender #4
/// - bob (jid/chat 2): revoked #3, media row #5 (no text, not revoked)
/// - silent group (jid 3): no chat rows, no messages
pub fn seed_basic(conn: &Connection) {
    insert_jid(conn, 1, ALICE);
    insert_jid(conn, 2, BOB);
    insert_jid(conn, 3, SILENT_GROUP);
    insert_chat(conn, 1, 1);
    insert_chat(conn, 2, 2);

    insert_message(conn, 1, 1, None, true, Some("hey alice"));
    insert_message(conn, 2, 1, Some(1), false, Some("hey back"));
    insert_message(conn, 3, 2, Some(2), false, None);
    insert_message(conn, 4, 1, None, false, Some("who is this"));
    insert_message(conn, 5, 2, Some(2), false, None);

    insert_revocation(conn, 3);
}
