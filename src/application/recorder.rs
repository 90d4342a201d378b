//! Operation recorder: append-only statement log with boundary-based views
//!
//! The log itself is never trimmed. Reads cut it at the most recent boundary:
//! a global `clear`, or a `create`/`build` in the context being read.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::application::command::Command;
use crate::application::parser::parse_statement;
use crate::domain::Domain;
use crate::infrastructure::traits::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryContext {
    Linear,
    Tree,
    /// Global clear and context switches
    Global,
}

impl HistoryContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryContext::Linear => "linear",
            HistoryContext::Tree => "tree",
            HistoryContext::Global => "global",
        }
    }
}

impl From<Domain> for HistoryContext {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Linear => HistoryContext::Linear,
            Domain::Tree => HistoryContext::Tree,
        }
    }
}

impl From<Option<Domain>> for HistoryContext {
    fn from(domain: Option<Domain>) -> Self {
        domain.map_or(HistoryContext::Global, HistoryContext::from)
    }
}

impl fmt::Display for HistoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an entry cuts history views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    None,
    /// `create`/`build`: cuts its own context
    Rebuild,
    /// Global `clear`: cuts every view
    GlobalClear,
}

impl Boundary {
    fn of(command: &Command) -> Self {
        if command.is_global_clear() {
            Boundary::GlobalClear
        } else if command.is_rebuild() {
            Boundary::Rebuild
        } else {
            Boundary::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Position in the log, starting at 0
    pub seq: u64,
    pub command_text: String,
    pub timestamp: DateTime<Utc>,
    pub context: HistoryContext,
    pub success: bool,
    pub boundary: Boundary,
}

pub struct OperationRecorder {
    clock: Arc<dyn Clock>,
    entries: Vec<HistoryEntry>,
}

impl fmt::Debug for OperationRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRecorder")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl OperationRecorder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Vec::new(),
        }
    }

    /// Append raw command text. Boundaries are recognised by parsing the text;
    /// unparseable text is never a boundary. Returns the entry's sequence number.
    pub fn record(
        &mut self,
        command_text: impl Into<String>,
        context: HistoryContext,
        success: bool,
    ) -> u64 {
        let command_text = command_text.into();
        let boundary = parse_statement(&command_text)
            .map(|c| Boundary::of(&c))
            .unwrap_or(Boundary::None);
        self.push(command_text, context, success, boundary)
    }

    /// Append a parsed command under its canonical text and own context.
    pub fn record_command(&mut self, command: &Command, success: bool) -> u64 {
        let context = HistoryContext::from(command.domain());
        self.push(command.to_string(), context, success, Boundary::of(command))
    }

    fn push(
        &mut self,
        command_text: String,
        context: HistoryContext,
        success: bool,
        boundary: Boundary,
    ) -> u64 {
        let seq = self.entries.len() as u64;
        trace!(seq, %context, success, text = %command_text, "record");
        self.entries.push(HistoryEntry {
            seq,
            command_text,
            timestamp: self.clock.now(),
            context,
            success,
            boundary,
        });
        seq
    }

    /// The full log, failures included.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Successful entries of `context` since its most recent boundary.
    ///
    /// The boundary is the later of the last global clear and (for
    /// linear/tree) the last `create`/`build` in the same context; a
    /// `create`/`build` row is included, a global clear row only in the
    /// global view.
    pub fn history(&self, context: HistoryContext) -> Vec<&HistoryEntry> {
        let successful: Vec<&HistoryEntry> = self.entries.iter().filter(|e| e.success).collect();
        let start = successful
            .iter()
            .rposition(|e| {
                e.boundary == Boundary::GlobalClear
                    || (e.boundary == Boundary::Rebuild && e.context == context)
            })
            .unwrap_or(0);
        successful[start..]
            .iter()
            .copied()
            .filter(|e| e.context == context)
            .collect()
    }

    /// Linear, tree and global views interleaved by (timestamp, seq).
    ///
    /// Nothing before the most recent global clear appears; that clear is the
    /// first row, tagged global.
    pub fn merged_history(&self) -> Vec<&HistoryEntry> {
        let mut merged: Vec<&HistoryEntry> = [
            HistoryContext::Global,
            HistoryContext::Linear,
            HistoryContext::Tree,
        ]
        .into_iter()
        .flat_map(|c| self.history(c))
        .collect();
        merged.sort_by_key(|e| (e.timestamp, e.seq));
        merged
    }

    /// `"<time> <dsl>"` lines for one context.
    pub fn render_history(&self, context: HistoryContext, time_format: &str) -> Vec<String> {
        self.history(context)
            .into_iter()
            .map(|e| format!("{} {}", format_time(&e.timestamp, time_format), e.command_text))
            .collect()
    }

    /// `"[context] <time> <dsl>"` lines for the merged view.
    pub fn render_merged(&self, time_format: &str) -> Vec<String> {
        self.merged_history()
            .into_iter()
            .map(|e| {
                format!(
                    "[{}] {} {}",
                    e.context,
                    format_time(&e.timestamp, time_format),
                    e.command_text
                )
            })
            .collect()
    }
}

/// Format with a strftime pattern, falling back to RFC 3339 on a bad pattern.
pub fn format_time(timestamp: &DateTime<Utc>, time_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(time_format)).is_err() {
        return timestamp.to_rfc3339();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::ManualClock;

    fn recorder() -> OperationRecorder {
        OperationRecorder::new(Arc::new(ManualClock::new()))
    }

    fn texts(entries: Vec<&HistoryEntry>) -> Vec<&str> {
        entries.into_iter().map(|e| e.command_text.as_str()).collect()
    }

    #[test]
    fn given_clear_then_recreate_when_reading_linear_then_starts_at_second_create() {
        let mut rec = recorder();
        rec.record("create arraylist with 1,2", HistoryContext::Linear, true);
        rec.record("insert 3 in arraylist", HistoryContext::Linear, true);
        rec.record("clear", HistoryContext::Global, true);
        rec.record("create arraylist with 9", HistoryContext::Linear, true);
        rec.record("get at 0 from arraylist", HistoryContext::Linear, true);

        assert_eq!(
            texts(rec.history(HistoryContext::Linear)),
            vec!["create arraylist with 9", "get at 0 from arraylist"]
        );
        assert_eq!(rec.entries().len(), 5);
    }

    #[test]
    fn given_rebuild_in_other_context_when_reading_then_not_a_boundary() {
        let mut rec = recorder();
        rec.record("create stack", HistoryContext::Linear, true);
        rec.record("push 1 to stack", HistoryContext::Linear, true);
        rec.record("build bst with 1,2", HistoryContext::Tree, true);
        rec.record("push 2 to stack", HistoryContext::Linear, true);

        assert_eq!(
            texts(rec.history(HistoryContext::Linear)),
            vec!["create stack", "push 1 to stack", "push 2 to stack"]
        );
        assert_eq!(texts(rec.history(HistoryContext::Tree)), vec!["build bst with 1,2"]);
    }

    #[test]
    fn given_failed_entries_when_reading_then_kept_in_log_but_not_in_views() {
        let mut rec = recorder();
        rec.record("create stack", HistoryContext::Linear, true);
        rec.record("create stack", HistoryContext::Linear, false);
        rec.record("pop from stack", HistoryContext::Linear, false);

        assert_eq!(rec.history(HistoryContext::Linear).len(), 1);
        assert_eq!(rec.entries().iter().filter(|e| !e.success).count(), 2);
    }

    #[test]
    fn given_entries_across_contexts_when_merging_then_chronological_from_last_clear() {
        let mut rec = recorder();
        rec.record("create stack", HistoryContext::Linear, true);
        rec.record("clear", HistoryContext::Global, true);
        rec.record("create linkedlist with 1", HistoryContext::Linear, true);
        rec.record("use tree", HistoryContext::Global, true);
        rec.record("build avl with 3,1", HistoryContext::Tree, true);
        rec.record("insert 2 in linkedlist", HistoryContext::Linear, true);

        let merged = rec.merged_history();
        assert_eq!(
            texts(merged.clone()),
            vec![
                "clear",
                "create linkedlist with 1",
                "use tree",
                "build avl with 3,1",
                "insert 2 in linkedlist"
            ]
        );
        assert_eq!(merged[0].context, HistoryContext::Global);
        assert_eq!(merged[0].boundary, Boundary::GlobalClear);
    }

    #[test]
    fn given_equal_timestamps_when_merging_then_log_order_kept() {
        let mut rec = OperationRecorder::new(Arc::new(ManualClock::frozen()));
        rec.record("build bst with 1", HistoryContext::Tree, true);
        rec.record("create stack", HistoryContext::Linear, true);
        rec.record("insert 2 in bst", HistoryContext::Tree, true);

        let seqs: Vec<u64> = rec.merged_history().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn given_time_format_when_rendering_then_time_prefix_and_tags() {
        let mut rec = recorder();
        rec.record("create stack", HistoryContext::Linear, true);
        rec.record("push 1 to stack", HistoryContext::Linear, true);

        assert_eq!(
            rec.render_history(HistoryContext::Linear, "%H:%M:%S"),
            vec!["12:00:00 create stack", "12:00:01 push 1 to stack"]
        );
        assert_eq!(
            rec.render_merged("%H:%M"),
            vec!["[linear] 12:00 create stack", "[linear] 12:00 push 1 to stack"]
        );
    }

    #[test]
    fn given_command_when_recording_then_canonical_text_and_domain_context() {
        let mut rec = recorder();
        let command = parse_statement("tree.bst.create 5,3").unwrap();
        rec.record_command(&command, true);

        let entry = &rec.entries()[0];
        assert_eq!(entry.command_text, "create bst with 5,3");
        assert_eq!(entry.context, HistoryContext::Tree);
        assert_eq!(entry.boundary, Boundary::Rebuild);
    }
}
