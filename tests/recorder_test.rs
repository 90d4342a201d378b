//! Integration tests for operation history recorded through the interpreter.

use std::sync::Arc;

use chrono::Duration;

use dsinterp::application::recorder::Boundary;
use dsinterp::application::services::{FailurePolicy, Interpreter};
use dsinterp::application::{HistoryContext, HistoryEntry};
use dsinterp::domain::Domain;
use dsinterp::util::testing::{init_test_setup, ManualClock};

fn interpreter() -> Interpreter {
    init_test_setup();
    Interpreter::new(Arc::new(ManualClock::new()), FailurePolicy::Continue, true)
}

fn texts(entries: Vec<&HistoryEntry>) -> Vec<String> {
    entries.into_iter().map(|e| e.command_text.clone()).collect()
}

#[test]
fn given_clear_and_recreate_when_reading_linear_history_then_only_second_create_onward() {
    let mut interp = interpreter();
    interp.run_script(
        "create arraylist with 1,2,3\n\
         insert 4 in arraylist\n\
         clear\n\
         create arraylist with 7\n\
         get at 0 from arraylist",
    );

    assert_eq!(
        texts(interp.history(HistoryContext::Linear)),
        vec!["create arraylist with 7", "get at 0 from arraylist"]
    );
    assert_eq!(interp.recorder().len(), 5);
}

#[test]
fn given_dotted_input_when_recorded_then_canonical_bare_text() {
    let mut interp = interpreter();
    interp.execute_statement("tree.binary_tree.create 1,2").unwrap();
    interp.execute_statement("tree.binary_tree.insert 3 at 1").unwrap();

    assert_eq!(
        texts(interp.history(HistoryContext::Tree)),
        vec!["create binarytree with 1,2", "insert 3 at 1 in binarytree"]
    );
}

#[test]
fn given_both_contexts_when_merging_then_chronological_and_bounded_by_global_clear() {
    let mut interp = interpreter();
    interp.execute_statement("create stack").unwrap();
    interp.execute_statement("push 1 to stack").unwrap();
    interp.execute_statement("clear").unwrap();
    interp.execute_statement("create linkedlist with 5").unwrap();
    interp.switch_context(Domain::Tree).unwrap();
    interp.execute_statement("build bst with 2,1,3").unwrap();
    interp.execute_statement("search 3 in bst").unwrap();

    let merged = interp.merged_history();
    let contexts: Vec<HistoryContext> = merged.iter().map(|e| e.context).collect();
    assert_eq!(
        texts(merged),
        vec![
            "clear",
            "create linkedlist with 5",
            "use tree",
            "build bst with 2,1,3",
            "search 3 in bst"
        ]
    );
    assert_eq!(
        contexts,
        vec![
            HistoryContext::Global,
            HistoryContext::Linear,
            HistoryContext::Global,
            HistoryContext::Tree,
            HistoryContext::Tree
        ]
    );
}

#[test]
fn given_rebuild_in_same_context_when_reading_then_earlier_entries_hidden() {
    let mut interp = interpreter();
    interp.execute_statement("build avl with 1,2,3").unwrap();
    interp.execute_statement("insert 4 in avl").unwrap();
    interp.execute_statement("build bst with 9").unwrap();

    assert_eq!(
        texts(interp.history(HistoryContext::Tree)),
        vec!["build bst with 9"]
    );
    // the raw log keeps everything
    assert_eq!(interp.recorder().entries().len(), 3);
}

#[test]
fn given_failed_statements_when_recorded_then_flagged_and_excluded_from_views() {
    let mut interp = interpreter();
    interp.execute_statement("create stack").unwrap();
    assert!(interp.execute_statement("pop from stack").is_err());
    assert!(interp.execute_statement("create nothing").is_err());

    let entries = interp.recorder().entries();
    assert_eq!(entries.len(), 3);
    assert!(!entries[1].success);
    assert_eq!(entries[2].command_text, "create nothing");
    assert_eq!(entries[2].boundary, Boundary::None);
    assert_eq!(
        texts(interp.history(HistoryContext::Linear)),
        vec!["create stack"]
    );
}

#[test]
fn given_failed_create_when_reading_then_not_a_boundary() {
    let mut interp = interpreter();
    interp.execute_statement("create arraylist with 1").unwrap();
    interp.execute_statement("insert 2 in arraylist").unwrap();
    assert!(interp
        .execute_statement("create arraylist with 1,2,3 size 2")
        .is_err());

    assert_eq!(interp.history(HistoryContext::Linear).len(), 2);
}

#[test]
fn given_custom_time_format_when_rendering_then_lines_prefixed() {
    init_test_setup();
    let start = ManualClock::new().peek();
    let clock = ManualClock::starting_at(start, Duration::minutes(5));
    let mut interp = Interpreter::new(Arc::new(clock), FailurePolicy::Abort, true);
    interp.execute_statement("create stack").unwrap();
    interp.execute_statement("push 3 to stack").unwrap();

    assert_eq!(
        interp.recorder().render_history(HistoryContext::Linear, "%H:%M"),
        vec!["12:00 create stack", "12:05 push 3 to stack"]
    );
    assert_eq!(
        interp.recorder().render_merged("%H:%M"),
        vec!["[linear] 12:00 create stack", "[linear] 12:05 push 3 to stack"]
    );
}
