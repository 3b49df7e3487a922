//! Activity feed shown beside the admin dashboard

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries kept after a successful action
pub const DEFAULT_ACTIVITY_LIMIT: usize = 5;

/// Failures never push the feed beyond this multiple of the limit
const FAILURE_BACKLOG_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: u64,
    pub text: String,
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
}

/// Newest-first feed of recent admin actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFeed {
    entries: VecDeque<ActivityEntry>,
    limit: usize,
    next_id: u64,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::with_limit(DEFAULT_ACTIVITY_LIMIT)
    }
}

impl ActivityFeed {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            next_id: 1,
        }
    }

    /// Record a completed action; older entries beyond the limit drop off
    pub fn record(&mut self, kind: ActivityKind, text: impl Into<String>) {
        self.push(kind, text.into());
        self.entries.truncate(self.limit);
    }

    /// Record a failed action; earlier entries stay visible
    pub fn record_failure(&mut self, text: impl Into<String>) {
        self.push(ActivityKind::Warning, text.into());
        self.entries.truncate(self.limit * FAILURE_BACKLOG_FACTOR);
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, kind: ActivityKind, text: String) {
        let entry = ActivityEntry {
            id: self.next_id,
            text,
            kind,
            at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_front(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_entries_truncate_to_limit() {
        let mut feed = ActivityFeed::with_limit(5);
        for i in 0..8 {
            feed.record(ActivityKind::Success, format!("action {}", i));
        }
        assert_eq!(feed.len(), 5);
        assert_eq!(feed.latest().unwrap().text, "action 7");
    }

    #[test]
    fn test_failures_keep_older_entries() {
        let mut feed = ActivityFeed::with_limit(2);
        feed.record(ActivityKind::Success, "a");
        feed.record(ActivityKind::Success, "b");
        feed.record_failure("Error updating service provider status");
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.latest().unwrap().kind, ActivityKind::Warning);

        for _ in 0..20 {
            feed.record_failure("again");
        }
        assert_eq!(feed.len(), 8);
    }
}
