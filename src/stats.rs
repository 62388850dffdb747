//! Aggregation over an extracted snapshot.
//!
//! Everything here is total over the empty input: an empty snapshot yields
//! zero counts, an empty ranking and an empty time series rather than an
//! error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ChatActivity, Snapshot};

/// Default number of most-active chats reported.
pub const DEFAULT_TOP_K: usize = 3;

/// Derived metrics for one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    /// Distinct sender identities (including the `Me` and unresolved rows)
    pub num_contacts: usize,
    /// Total extracted messages
    pub num_messages: usize,
    /// Distinct chat identities
    pub num_chats: usize,
    /// The K most active chats by message count
    pub top_chats: Vec<ChatActivity>,
    /// Messages per local calendar date, ascending
    pub daily_counts: Vec<DailyCount>,
}

/// Message count for one local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Local calendar date the messages fall on
    pub date: NaiveDate,
    /// Number of messages on that date
    pub count: u64,
}

/// Compute all derived metrics for a snapshot.
#[must_use]
pub fn aggregate(snapshot: &Snapshot, top_k: usize) -> SnapshotStats {
    SnapshotStats {
        num_contacts: snapshot.contacts.len(),
        num_messages: snapshot.messages.len(),
        num_chats: snapshot.chats.len(),
        top_chats: top_active_chats(snapshot, top_k),
        daily_counts: daily_counts(snapshot),
    }
}

/// The `k` chats with the most messages.
///
/// Messages are grouped by resolved chat identity; rows whose chat did not
/// resolve are left out of the ranking. Ties break by identity in
/// lexicographic order so re-runs are deterministic.
#[must_use]
pub fn top_active_chats(snapshot: &Snapshot, k: usize) -> Vec<ChatActivity> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for message in &snapshot.messages {
        if let Some(chat) = message.chat.as_deref() {
            *counts.entry(chat).or_insert(0) += 1;
        }
    }

    // The map already iterates identity-ascending; a stable sort on count
    // keeps that order within ties.
    let mut ranked: Vec<(&str, i64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(identity, message_count)| ChatActivity {
            identity: identity.to_string(),
            message_count,
        })
        .collect()
}

/// Messages bucketed by local calendar date, ascending by date.
///
/// Dates with zero messages are not synthesized; consumers needing a dense
/// series must fill the gaps themselves.
#[must_use]
pub fn daily_counts(snapshot: &Snapshot) -> Vec<DailyCount> {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for message in &snapshot.messages {
        *buckets.entry(message.timestamp.date_naive()).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageRecord, SenderIdentity};
    use chrono::{DateTime, Local, TimeZone};

    fn message(id: i64, chat: Option<&str>, day: u32, hour: u32) -> MessageRecord {
        MessageRecord {
            id,
            chat: chat.map(str::to_string),
            sender: SenderIdentity::Me,
            timestamp: Local.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            body: Some("hi".to_string()),
            revoked: false,
        }
    }

    fn snapshot_with_messages(messages: Vec<MessageRecord>) -> Snapshot {
        Snapshot {
            messages,
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_empty_snapshot_aggregates_to_zero() {
        let stats = aggregate(&Snapshot::default(), DEFAULT_TOP_K);
        assert_eq!(stats.num_contacts, 0);
        assert_eq!(stats.num_messages, 0);
        assert_eq!(stats.num_chats, 0);
        assert!(stats.top_chats.is_empty());
        assert!(stats.daily_counts.is_empty());
    }

    #[test]
    fn test_top_chats_two_chat_scenario() {
        let mut messages = Vec::new();
        for id in 0..5 {
            messages.push(message(id, Some("A"), 1, 10));
        }
        for id in 5..7 {
            messages.push(message(id, Some("B"), 1, 11));
        }
        let snapshot = snapshot_with_messages(messages);

        let top = top_active_chats(&snapshot, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].identity, "A");
        assert_eq!(top[0].message_count, 5);

        let all = top_active_chats(&snapshot, DEFAULT_TOP_K);
        assert_eq!(all.len(), 2);
        assert_eq!(
            all,
            vec![
                ChatActivity { identity: "A".to_string(), message_count: 5 },
                ChatActivity { identity: "B".to_string(), message_count: 2 },
            ]
        );
    }

    #[test]
    fn test_top_chats_ties_break_lexicographically() {
        let messages = vec![
            message(1, Some("zeta"), 1, 9),
            message(2, Some("alpha"), 1, 10),
            message(3, Some("mike"), 1, 11),
        ];
        let snapshot = snapshot_with_messages(messages);

        let top = top_active_chats(&snapshot, 2);
        assert_eq!(top[0].identity, "alpha");
        assert_eq!(top[1].identity, "mike");
    }

    #[test]
    fn test_top_chats_skips_unresolved_chats() {
        let messages = vec![
            message(1, None, 1, 9),
            message(2, None, 1, 10),
            message(3, Some("known"), 1, 11),
        ];
        let snapshot = snapshot_with_messages(messages);

        let top = top_active_chats(&snapshot, DEFAULT_TOP_K);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].identity, "known");
        assert_eq!(top[0].message_count, 1);
    }

    #[test]
    fn test_daily_counts_ascending_with_gaps() {
        let messages = vec![
            message(1, Some("A"), 5, 23),
            message(2, Some("A"), 1, 0),
            message(3, Some("A"), 5, 1),
            message(4, Some("B"), 1, 12),
        ];
        let snapshot = snapshot_with_messages(messages);

        let daily = daily_counts(&snapshot);
        let expected_first: DateTime<Local> = Local.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let expected_last: DateTime<Local> = Local.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();

        // March 2-4 have no messages and no synthesized buckets.
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, expected_first.date_naive());
        assert_eq!(daily[0].count, 2);
        assert_eq!(daily[1].date, expected_last.date_naive());
        assert_eq!(daily[1].count, 2);
    }
}
