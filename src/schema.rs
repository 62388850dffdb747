//! WhatsApp msgstore.db schema definitions
//!
//! This module provides constants for the table and column names used with
//! rusqlite. The schema is the normalized Android layout: human-readable
//! identifiers live in the `jid` dictionary table and everything else joins
//! against it by row id.

/// Identifier dictionary table schema
pub mod jid {
    /// Table name
    pub const TABLE: &str = "jid";
    /// Primary key column
    pub const ID: &str = "_id";
    /// Human-readable identifier (phone- or group-based handle)
    pub const RAW_STRING: &str = "raw_string";
}

/// Chat table schema
pub mod chat {
    /// Table name
    pub const TABLE: &str = "chat";
    /// Primary key column
    pub const ID: &str = "_id";
    /// Foreign key into the jid table
    pub const JID_ROW_ID: &str = "jid_row_id";
}

/// Message table schema
pub mod message {
    /// Table name
    pub const TABLE: &str = "message";
    /// Primary key column (source-assigned, monotonic with creation time)
    pub const ID: &str = "_id";
    /// Foreign key identifying the chat the message belongs to
    pub const CHAT_ROW_ID: &str = "chat_row_id";
    /// Foreign key into jid for the sender; NULL for self-authored messages
    pub const SENDER_JID_ROW_ID: &str = "sender_jid_row_id";
    /// Flag set when the local account authored the message
    pub const FROM_ME: &str = "from_me";
    /// Creation time in epoch milliseconds
    pub const TIMESTAMP: &str = "timestamp";
    /// Textual body; NULL for media-only or deleted content
    pub const TEXT_DATA: &str = "text_data";
}

/// Revocation table schema
pub mod message_revoked {
    /// Table name
    pub const TABLE: &str = "message_revoked";
    /// Foreign key into the message table
    pub const MESSAGE_ROW_ID: &str = "message_row_id";
    /// Retraction time in epoch milliseconds
    pub const REVOKE_TIMESTAMP: &str = "revoke_timestamp";
}
