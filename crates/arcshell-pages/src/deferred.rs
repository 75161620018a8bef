//! Deferred tasks for the single-threaded event loop.
//!
//! Nothing here sleeps or spawns: tasks carry a deadline and the owner
//! drains the due ones from its `poll`.

use std::time::Instant;

/// Tasks ordered by deadline. Tasks sharing a deadline run in the order
/// they were scheduled.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    tasks: Vec<(Instant, T)>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn schedule(&mut self, at: Instant, task: T) {
        let pos = self.tasks.partition_point(|(deadline, _)| *deadline <= at);
        self.tasks.insert(pos, (at, task));
    }

    /// Remove and return every task due at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let split = self.tasks.partition_point(|(deadline, _)| *deadline <= now);
        self.tasks.drain(..split).map(|(_, task)| task).collect()
    }

    /// Remove every pending task matching `pred`, regardless of deadline.
    /// Returns how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|(_, task)| !pred(task));
        before - self.tasks.len()
    }

    pub fn contains_where(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.tasks.iter().any(|(_, task)| pred(task))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.first().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0 + Duration::from_millis(500), "late");
        q.schedule(t0 + Duration::from_millis(100), "early");
        q.schedule(t0 + Duration::from_millis(100), "early-2");
        assert_eq!(q.next_deadline(), Some(t0 + Duration::from_millis(100)));
        assert!(q.take_due(t0).is_empty());
        assert_eq!(q.take_due(t0 + Duration::from_millis(100)), vec!["early", "early-2"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.take_due(t0 + Duration::from_secs(1)), vec!["late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, 1);
        assert_eq!(q.take_due(t0), vec![1]);
    }

    #[test]
    fn cancel_where_removes_matching() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, 1);
        q.schedule(t0, 2);
        q.schedule(t0, 1);
        assert!(q.contains_where(|t| *t == 2));
        assert_eq!(q.cancel_where(|t| *t == 1), 2);
        assert_eq!(q.take_due(t0), vec![2]);
    }
}
