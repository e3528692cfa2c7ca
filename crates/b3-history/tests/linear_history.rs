//! Integration tests: single linear history (b3-history).
//!
//! Exercises `LinearHistory` through its public API with closure commands
//! over shared counters, the way editor operations drive it.

use b3_history::{ClosureCommand, Command, HistoryError, LinearHistory};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn add(counter: &Rc<Cell<i64>>, delta: i64) -> Box<dyn Command> {
    let (up, down) = (counter.clone(), counter.clone());
    Box::new(ClosureCommand::new(
        format!("add {delta}"),
        move || up.set(up.get() + delta),
        move || down.set(down.get() - delta),
    ))
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn undo_restores_previous_state() {
    init_logging();
    let value = Rc::new(Cell::new(10));
    let mut history = LinearHistory::new();

    history.add_command(add(&value, 5));
    history.add_command(add(&value, -3));
    assert_eq!(value.get(), 12);

    assert!(history.undo_last_command());
    assert_eq!(value.get(), 15);
    assert!(history.undo_last_command());
    assert_eq!(value.get(), 10);
    assert!(!history.undo_last_command(), "history should be exhausted");
}

#[test]
fn redo_reapplies_in_order() {
    init_logging();
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut history = LinearHistory::new();

    for tag in ["first", "second"] {
        let (a, b) = (seen.clone(), seen.clone());
        history.add_command(Box::new(ClosureCommand::new(
            tag,
            move || a.borrow_mut().push(tag),
            move || {
                b.borrow_mut().pop();
            },
        )));
    }
    history.undo_last_command();
    history.undo_last_command();
    assert!(seen.borrow().is_empty());

    assert!(history.redo_next_command());
    assert!(history.redo_next_command());
    assert!(!history.redo_next_command());
    assert_eq!(*seen.borrow(), vec!["first", "second"]);
}

#[test]
fn custom_redo_is_used_after_undo() {
    let runs = Rc::new(Cell::new(0));
    let redos = Rc::new(Cell::new(0));
    let (r, d) = (runs.clone(), redos.clone());
    let cmd = ClosureCommand::builder()
        .run(move || r.set(r.get() + 1))
        .undo(|| {})
        .redo(move || d.set(d.get() + 1))
        .build()
        .unwrap();

    let mut history = LinearHistory::new();
    history.add_command(Box::new(cmd));
    history.undo_last_command();
    history.redo_next_command();
    assert_eq!((runs.get(), redos.get()), (1, 1));
}

// ─── Bounded history ────────────────────────────────────────────────────

#[test]
fn bounded_history_forgets_oldest() {
    init_logging();
    let value = Rc::new(Cell::new(0));
    let mut history = LinearHistory::with_max_length(2).unwrap();

    for delta in [1, 10, 100, 1000] {
        history.add_command(add(&value, delta));
        assert!(history.len() <= 2);
    }
    assert_eq!(history.len(), 2);
    assert_eq!(history.num_removed(), 2);

    while history.undo_last_command() {}
    assert_eq!(value.get(), 11, "only the two newest commands are undoable");
}

#[test]
fn is_saved_tracks_cursor_through_eviction() {
    let value = Rc::new(Cell::new(0));
    let mut history = LinearHistory::with_max_length(3).unwrap();

    for delta in 1..=4 {
        history.add_command(add(&value, delta));
    }
    history.save();
    for delta in 5..=6 {
        history.add_command(add(&value, delta));
    }
    assert!(!history.is_saved());

    history.undo_last_command();
    assert!(!history.is_saved());
    history.undo_last_command();
    assert!(history.is_saved());

    history.redo_next_command();
    assert!(!history.is_saved());
}

// ─── Save tracking ──────────────────────────────────────────────────────

#[test]
fn fresh_history_is_saved_until_modified() {
    let value = Rc::new(Cell::new(0));
    let mut history = LinearHistory::new();
    assert!(history.is_saved());

    history.add_command(add(&value, 1));
    assert!(!history.is_saved());

    history.undo_last_command();
    assert!(history.is_saved(), "back at the save point");
}

#[test]
fn mark_unsaved_holds_until_save() {
    let mut history = LinearHistory::new();
    history.mark_unsaved();
    assert!(!history.is_saved());
    history.save();
    assert!(history.is_saved());
}

// ─── Errors ─────────────────────────────────────────────────────────────

#[test]
fn invalid_bounds_are_rejected() {
    assert_eq!(
        LinearHistory::bounded(Some(0)).unwrap_err(),
        HistoryError::InvalidMaxLength(0)
    );
    assert!(LinearHistory::bounded(None).is_ok());
}

#[test]
fn incomplete_command_is_rejected() {
    let err = ClosureCommand::builder()
        .description("half")
        .run(|| {})
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid command: missing `undo` callback");
}
