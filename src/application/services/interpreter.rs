//! Interpreter service
//!
//! Ties parsing, validation, execution and recording together for single
//! statements and whole scripts.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::command::Command;
use crate::application::executor::{execute, Outcome};
use crate::application::parser::parse_statement;
use crate::application::recorder::{HistoryContext, HistoryEntry, OperationRecorder};
use crate::application::registry::Registry;
use crate::application::script::split_statements;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Domain;
use crate::infrastructure::traits::Clock;

/// What a script does after a statement fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop; remaining statements are skipped
    #[default]
    Abort,
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Continue => f.write_str("continue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementStatus {
    Done(Outcome),
    Failed(ApplicationError),
    /// Not executed because an earlier statement failed under `Abort`
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementReport {
    pub line: usize,
    pub text: String,
    pub status: StatementStatus,
}

/// Per-statement results of one script run, in script order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub statements: Vec<StatementReport>,
}

impl ScriptReport {
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, StatementStatus::Done(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StatementStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StatementStatus::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn first_failure(&self) -> Option<(&StatementReport, &ApplicationError)> {
        self.statements.iter().find_map(|r| match &r.status {
            StatementStatus::Failed(e) => Some((r, e)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&StatementStatus) -> bool) -> usize {
        self.statements.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Statement interpreter owning one workspace and its history.
#[derive(Debug)]
pub struct Interpreter {
    registry: Registry,
    recorder: OperationRecorder,
    policy: FailurePolicy,
    record_failures: bool,
}

impl Interpreter {
    pub fn new(clock: Arc<dyn Clock>, policy: FailurePolicy, record_failures: bool) -> Self {
        Self {
            registry: Registry::new(),
            recorder: OperationRecorder::new(clock),
            policy,
            record_failures,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn recorder(&self) -> &OperationRecorder {
        &self.recorder
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Parse and execute one statement, recording it.
    ///
    /// Unparseable text is recorded verbatim under the active context (or
    /// global when none is active); parsed commands under their canonical
    /// text and own domain.
    #[instrument(level = "debug", skip(self))]
    pub fn execute_statement(&mut self, text: &str) -> ApplicationResult<Outcome> {
        match parse_statement(text) {
            Ok(command) => self.execute_command(&command),
            Err(e) => {
                warn!(statement = text, error = %e, "parse failed");
                if self.record_failures {
                    let context = HistoryContext::from(self.registry.active());
                    self.recorder.record(text.trim(), context, false);
                }
                Err(e.into())
            }
        }
    }

    /// Execute an already parsed command, recording it.
    pub fn execute_command(&mut self, command: &Command) -> ApplicationResult<Outcome> {
        let result = execute(&mut self.registry, command);
        match &result {
            Ok(_) => {
                self.recorder.record_command(command, true);
            }
            Err(e) => {
                warn!(command = %command, kind = %e.kind(), error = %e, "statement failed");
                if self.record_failures {
                    self.recorder.record_command(command, false);
                }
            }
        }
        result
    }

    /// Make `domain` the active context, as `use <domain>` does.
    pub fn switch_context(&mut self, domain: Domain) -> ApplicationResult<Outcome> {
        self.execute_command(&Command::Use { domain })
    }

    /// Run every statement of `script` in order under the configured policy.
    pub fn run_script(&mut self, script: &str) -> ScriptReport {
        self.run_script_with(script, |_, _| {})
    }

    /// Like [`run_script`](Self::run_script), calling `observe` with each
    /// statement's report and the workspace right after it.
    #[instrument(level = "debug", skip(self, script, observe), fields(policy = %self.policy))]
    pub fn run_script_with<F>(&mut self, script: &str, mut observe: F) -> ScriptReport
    where
        F: FnMut(&StatementReport, &Registry),
    {
        let mut report = ScriptReport::default();
        let mut aborted = false;
        for statement in split_statements(script) {
            let status = if aborted {
                StatementStatus::Skipped
            } else {
                match self.execute_statement(&statement.text) {
                    Ok(outcome) => StatementStatus::Done(outcome),
                    Err(e) => {
                        aborted = self.policy == FailurePolicy::Abort;
                        StatementStatus::Failed(e)
                    }
                }
            };
            let statement_report = StatementReport {
                line: statement.line,
                text: statement.text,
                status,
            };
            observe(&statement_report, &self.registry);
            report.statements.push(statement_report);
        }
        debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "script finished"
        );
        report
    }

    pub fn history(&self, context: HistoryContext) -> Vec<&HistoryEntry> {
        self.recorder.history(context)
    }

    pub fn merged_history(&self) -> Vec<&HistoryEntry> {
        self.recorder.merged_history()
    }
}
