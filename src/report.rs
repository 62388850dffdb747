//! Role-colored transcript rendering.
//!
//! A pure consumer of a previously written snapshot: messages are re-sorted
//! by id ascending for display and rendered in three cases — outgoing (`Me`,
//! right-aligned, green), unresolved sender (red anomaly line), and incoming
//! (left-aligned, cyan). Styling comes from `crossterm`.

use std::io::Write;

use crossterm::style::Stylize;

use crate::error::Result;
use crate::models::{MessageRecord, SenderIdentity, Snapshot, DELETED_MESSAGE_SENTINEL};
use crate::validation::InputValidator;

/// Column the outgoing side of the transcript is right-aligned to.
const PADDING: usize = 80;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the snapshot's messages as a transcript, oldest id first.
pub fn render_transcript<W: Write>(snapshot: &Snapshot, out: &mut W) -> Result<()> {
    let mut messages: Vec<&MessageRecord> = snapshot.messages.iter().collect();
    messages.sort_by_key(|message| message.id);

    writeln!(out, "{}", "Parsing chats from snapshot...".yellow().bold())?;
    for message in messages {
        render_message(message, out)?;
    }

    Ok(())
}

fn render_message<W: Write>(message: &MessageRecord, out: &mut W) -> Result<()> {
    let chat = message.chat.as_deref().unwrap_or("<unknown chat>");
    // Bodies come from an untrusted file; strip control characters before
    // they reach the terminal.
    let body = InputValidator::sanitize_text(
        message.body.as_deref().unwrap_or(DELETED_MESSAGE_SENTINEL),
    );
    let timestamp = message.timestamp.format(TIMESTAMP_FORMAT);

    match &message.sender {
        SenderIdentity::Me => {
            writeln!(out, "{:>width$}", format!("Chat ID: {chat}"), width = PADDING)?;
            writeln!(out, "{:>width$}", "Sender: Me", width = PADDING)?;
            // Pad before styling so the escape codes stay out of the width.
            writeln!(
                out,
                "{}",
                format!("{:>width$}", format!("{body} <<< Message"), width = PADDING)
                    .green()
                    .bold()
            )?;
            writeln!(out, "{:>width$}", format!("Timestamp: {timestamp}"), width = PADDING)?;
            writeln!(out)?;
        }
        SenderIdentity::Unknown => {
            writeln!(out, "{}", "<Undefined Sender Identity>".red().bold())?;
        }
        SenderIdentity::Known(sender) => {
            writeln!(out, "Chat ID: {chat}")?;
            writeln!(out, "Sender: {sender}")?;
            writeln!(out, "Message {} {}", ">>>".bold(), body.cyan())?;
            writeln!(out, "Timestamp: {timestamp}")?;
            writeln!(out)?;
        }
    }

    Ok(())
}
