//! Deferred actions processed at tick boundaries
//!
//! Stands in for wall-clock timers so that delayed effects (the hit-flash
//! revert) happen at a deterministic simulation time.

/// A queue of actions due at a simulation time (seconds)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<(f32, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T: PartialEq> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` for time `at`
    pub fn schedule(&mut self, at: f32, action: T) {
        self.pending.push((at, action));
    }

    /// Queue `action` for time `at`, replacing an identical pending action
    pub fn reschedule(&mut self, at: f32, action: T) {
        if let Some(entry) = self.pending.iter_mut().find(|(_, a)| *a == action) {
            entry.0 = at;
        } else {
            self.pending.push((at, action));
        }
    }

    /// Drop any pending copy of `action`
    pub fn cancel(&mut self, action: &T) {
        self.pending.retain(|(_, a)| a != action);
    }

    /// Remove and return every action due at or before `now`, in due order
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        let mut due: Vec<(f32, T)> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        // Stable: equal due times keep insertion order
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_in_order() {
        let mut s = Scheduler::new();
        s.schedule(0.3, 'c');
        s.schedule(0.1, 'a');
        s.schedule(0.2, 'b');
        s.schedule(0.5, 'z');

        assert!(s.drain_due(0.05).is_empty());
        assert_eq!(s.drain_due(0.3), vec!['a', 'b', 'c']);
        assert_eq!(s.len(), 1);
        assert_eq!(s.drain_due(1.0), vec!['z']);
        assert!(s.is_empty());
    }

    #[test]
    fn test_reschedule_postpones() {
        let mut s = Scheduler::new();
        s.reschedule(0.1, 7u32);
        s.reschedule(0.4, 7u32);
        assert_eq!(s.len(), 1);
        assert!(s.drain_due(0.2).is_empty());
        assert_eq!(s.drain_due(0.4), vec![7]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        s.schedule(0.1, 1u32);
        s.schedule(0.1, 2u32);
        s.cancel(&1);
        assert_eq!(s.drain_due(1.0), vec![2]);
    }
}
