//! Optimistic record reconciliation.
//!
//! A sender sees their own message immediately: the record is pushed
//! into the timeline as a pending placeholder, and replaced by the
//! authoritative server record when the send confirms, without a
//! visible duplicate.
//!
//! Matching is by the client-generated correlation token carried through
//! the request and echoed back by the server. Content/author equality is
//! kept only as a fallback for confirmations that arrive without a
//! token; unlike token matching it collapses two identical texts sent in
//! quick succession onto the first confirmation.
//!
//! A failed send does not silently leave the placeholder behind: the
//! entry is marked [`PendingState::Failed`] and stays visible until the
//! caller retries or discards it.

use chattr_db::entities::{direct_message, message};

/// Reconciliation identity for timeline records.
pub trait Correlate {
    /// Stable record ID.
    fn record_id(&self) -> &str;

    /// Client correlation token, when the record carries one.
    fn client_token(&self) -> Option<&str>;

    /// Fallback identity: would `other` plausibly be the confirmation of
    /// this locally-created record?
    fn same_origin(&self, other: &Self) -> bool;
}

impl Correlate for message::Model {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn client_token(&self) -> Option<&str> {
        self.client_token.as_deref()
    }

    fn same_origin(&self, other: &Self) -> bool {
        self.content == other.content
            && self.profile_id == other.profile_id
            && self.channel_id == other.channel_id
    }
}

impl Correlate for direct_message::Model {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn client_token(&self) -> Option<&str> {
        self.client_token.as_deref()
    }

    fn same_origin(&self, other: &Self) -> bool {
        self.content == other.content
            && self.sender_id == other.sender_id
            && self.receiver_id == other.receiver_id
    }
}

/// Delivery state of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    /// Confirmed by the server.
    Confirmed,
    /// Locally created, awaiting confirmation.
    Pending,
    /// Send failed; awaiting retry or discard.
    Failed,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    record: T,
    state: PendingState,
}

/// An ordered view-model buffer of records for one channel or
/// conversation.
#[derive(Debug, Clone, Default)]
pub struct Timeline<T> {
    entries: Vec<Entry<T>>,
}

impl<T: Correlate + Clone> Timeline<T> {
    /// Create an empty timeline.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Seed the timeline with server records (already in retrieval order).
    pub fn load(&mut self, records: Vec<T>) {
        self.entries = records
            .into_iter()
            .map(|record| Entry {
                record,
                state: PendingState::Confirmed,
            })
            .collect();
    }

    /// Append a locally-created placeholder awaiting confirmation.
    pub fn push_local(&mut self, record: T) {
        self.entries.push(Entry {
            record,
            state: PendingState::Pending,
        });
    }

    /// Merge a server-confirmed record.
    ///
    /// The matching placeholder (by token, else by origin) is removed and
    /// the confirmed record appended, so the timeline holds exactly one
    /// record for the message.
    pub fn confirm(&mut self, record: T) {
        let position = match record.client_token() {
            Some(token) => self.entries.iter().position(|e| {
                e.state != PendingState::Confirmed && e.record.client_token() == Some(token)
            }),
            None => self.entries.iter().position(|e| {
                e.state != PendingState::Confirmed && e.record.same_origin(&record)
            }),
        };

        if let Some(idx) = position {
            self.entries.remove(idx);
        }

        self.entries.push(Entry {
            record,
            state: PendingState::Confirmed,
        });
    }

    /// Mark the pending entry with the given token as failed.
    /// Returns false when no such entry exists.
    pub fn mark_failed(&mut self, token: &str) -> bool {
        for entry in &mut self.entries {
            if entry.state == PendingState::Pending && entry.record.client_token() == Some(token) {
                entry.state = PendingState::Failed;
                return true;
            }
        }
        false
    }

    /// Put a failed entry back into pending and hand the record back for
    /// resending.
    pub fn retry(&mut self, token: &str) -> Option<T> {
        for entry in &mut self.entries {
            if entry.state == PendingState::Failed && entry.record.client_token() == Some(token) {
                entry.state = PendingState::Pending;
                return Some(entry.record.clone());
            }
        }
        None
    }

    /// Drop a failed entry.
    pub fn discard(&mut self, token: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| {
            !(e.state == PendingState::Failed && e.record.client_token() == Some(token))
        });
        self.entries.len() != before
    }

    /// Replace-by-id patch, used for edit confirmations.
    pub fn apply_edit(&mut self, id: &str, patch: impl FnOnce(&mut T)) -> bool {
        for entry in &mut self.entries {
            if entry.record.record_id() == id {
                patch(&mut entry.record);
                return true;
            }
        }
        false
    }

    /// Remove a record by ID (deletions).
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.record.record_id() != id);
        self.entries.len() != before
    }

    /// Records in display order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }

    /// State of the record with the given ID.
    #[must_use]
    pub fn state_of(&self, id: &str) -> Option<PendingState> {
        self.entries
            .iter()
            .find(|e| e.record.record_id() == id)
            .map(|e| e.state)
    }

    /// Records currently failed, awaiting retry or discard.
    pub fn failed(&self) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter(|e| e.state == PendingState::Failed)
            .map(|e| &e.record)
    }

    /// Number of records in the timeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn local_message(token: &str, content: &str) -> message::Model {
        message::Model {
            id: format!("local-{token}"),
            content: content.to_string(),
            channel_id: "ch1".to_string(),
            profile_id: "p1".to_string(),
            has_thread: false,
            files: None,
            client_token: Some(token.to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn confirmed_message(id: &str, token: Option<&str>, content: &str) -> message::Model {
        message::Model {
            id: id.to_string(),
            content: content.to_string(),
            channel_id: "ch1".to_string(),
            profile_id: "p1".to_string(),
            has_thread: false,
            files: None,
            client_token: token.map(ToString::to_string),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_confirm_replaces_placeholder_by_token() {
        let mut timeline = Timeline::new();
        timeline.push_local(local_message("tok1", "hello"));
        timeline.confirm(confirmed_message("m1", Some("tok1"), "hello"));

        let records: Vec<_> = timeline.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "m1");
        assert_eq!(timeline.state_of("m1"), Some(PendingState::Confirmed));
    }

    #[test]
    fn test_identical_texts_stay_distinct_with_tokens() {
        // The content-based heuristic collapsed these; tokens must not.
        let mut timeline = Timeline::new();
        timeline.push_local(local_message("tok1", "same text"));
        timeline.push_local(local_message("tok2", "same text"));

        timeline.confirm(confirmed_message("m1", Some("tok1"), "same text"));
        assert_eq!(timeline.len(), 2);

        timeline.confirm(confirmed_message("m2", Some("tok2"), "same text"));
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.state_of("m1"), Some(PendingState::Confirmed));
        assert_eq!(timeline.state_of("m2"), Some(PendingState::Confirmed));
    }

    #[test]
    fn test_confirm_falls_back_to_origin_match() {
        let mut timeline = Timeline::new();
        let mut local = local_message("tok1", "hello");
        local.client_token = None;
        timeline.push_local(local);

        timeline.confirm(confirmed_message("m1", None, "hello"));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.records().next().map(|r| r.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_confirm_without_placeholder_appends() {
        let mut timeline = Timeline::new();
        timeline.confirm(confirmed_message("m1", None, "from another client"));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_failed_send_surfaces_and_retries() {
        let mut timeline = Timeline::new();
        timeline.push_local(local_message("tok1", "hello"));

        assert!(timeline.mark_failed("tok1"));
        assert_eq!(timeline.failed().count(), 1);

        let resend = timeline.retry("tok1");
        assert!(resend.is_some());
        assert_eq!(timeline.failed().count(), 0);

        // The retried send eventually confirms
        timeline.confirm(confirmed_message("m1", Some("tok1"), "hello"));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_failed_send_discard() {
        let mut timeline = Timeline::new();
        timeline.push_local(local_message("tok1", "hello"));
        timeline.mark_failed("tok1");

        assert!(timeline.discard("tok1"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_apply_edit_and_remove() {
        let mut timeline = Timeline::new();
        timeline.load(vec![confirmed_message("m1", None, "original")]);

        assert!(timeline.apply_edit("m1", |m| m.content = "edited".to_string()));
        assert_eq!(
            timeline.records().next().map(|r| r.content.as_str()),
            Some("edited")
        );

        assert!(timeline.remove("m1"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_direct_message_origin_includes_pair() {
        fn dm(sender: &str, receiver: &str, content: &str) -> direct_message::Model {
            direct_message::Model {
                id: format!("{sender}-{receiver}-{content}"),
                content: content.to_string(),
                sender_id: sender.to_string(),
                receiver_id: receiver.to_string(),
                is_read: false,
                client_token: None,
                created_at: Utc::now().into(),
                updated_at: Utc::now().into(),
            }
        }

        let mut timeline = Timeline::new();
        timeline.push_local(dm("p1", "p2", "hi"));

        // Same text to a different receiver must not collapse
        timeline.confirm(dm("p1", "p3", "hi"));
        assert_eq!(timeline.len(), 2);

        // Matching pair does
        timeline.confirm(dm("p1", "p2", "hi"));
        assert_eq!(timeline.len(), 2);
    }
}
