/// Linear undo/redo over whole-surface snapshots: a "past" stack of states
/// to return to and a "future" stack of states undone from. Recording a new
/// snapshot invalidates the future stack.
pub struct History<T> {
    past: Vec<T>,
    future: Vec<T>,
    limit: usize,
}

pub const HISTORY_LIMIT: usize = 50;

impl<T> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Push the pre-stroke snapshot. Called at stroke start, before the
    /// surface is touched.
    pub fn record(&mut self, snapshot: T) {
        self.past.push(snapshot);
        let overflow = self.past.len().saturating_sub(self.limit);
        if overflow > 0 {
            self.past.drain(0..overflow);
        }
        self.future.clear();
    }

    /// Exchange `current` for the most recent past snapshot. `None` (and
    /// `current` is discarded) when there is nothing to undo; check
    /// `can_undo` first to avoid capturing a snapshot for nothing.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let restored = self.past.pop()?;
        self.future.push(current);
        Some(restored)
    }

    /// Mirror of `undo`, moving in the opposite direction.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let restored = self.future.pop()?;
        self.past.push(current);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undoing_every_stroke_restores_the_initial_state() {
        let mut history = History::new(HISTORY_LIMIT);
        // Surface states: 0 is blank, each stroke n leaves state n.
        for before in 0..5 {
            history.record(before);
        }
        let mut current = 5;
        for _ in 0..5 {
            current = history.undo(current).expect("undo");
        }
        assert_eq!(current, 0);
        assert!(!history.can_undo());
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut history: History<u32> = History::new(HISTORY_LIMIT);
        assert!(history.undo(7).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_is_unavailable_until_an_undo_happens() {
        let mut history = History::new(HISTORY_LIMIT);
        history.record(0);
        assert!(!history.can_redo());
        let restored = history.undo(1).expect("undo");
        assert_eq!(restored, 0);
        assert!(history.can_redo());
        assert_eq!(history.redo(0), Some(1));
    }

    #[test]
    fn a_new_stroke_clears_the_redo_stack() {
        let mut history = History::new(HISTORY_LIMIT);
        history.record(0);
        history.record(1);
        let _ = history.undo(2);
        assert!(history.can_redo());
        history.record(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_round_trips_the_current_state() {
        let mut history = History::new(HISTORY_LIMIT);
        history.record(0);
        let previous = history.undo(1).expect("undo");
        assert_eq!(previous, 0);
        let redone = history.redo(previous).expect("redo");
        assert_eq!(redone, 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn history_depth_is_capped_by_dropping_the_oldest() {
        let mut history = History::new(3);
        for snapshot in 0..10 {
            history.record(snapshot);
        }
        let mut restored = Vec::new();
        let mut current = 10;
        while history.can_undo() {
            current = history.undo(current).expect("undo");
            restored.push(current);
        }
        assert_eq!(restored, vec![9, 8, 7]);
    }
}
