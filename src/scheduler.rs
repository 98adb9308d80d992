use std::cmp::Ordering;
use std::collections::BinaryHeap;

// An event due at `fire_ms`. Ties fire in scheduling order.
#[derive(Debug, Clone)]
struct Scheduled<E> {
    fire_ms: u64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_ms == other.fire_ms && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    // Reversed so the max-heap pops the earliest event first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_ms
            .cmp(&self.fire_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deterministic virtual-time scheduler. Time only moves when the owner pops
/// events, so a whole session can be replayed in a test without sleeping.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    queue: BinaryHeap<Scheduled<E>>,
    now_ms: u64,
    next_seq: u64,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
            now_ms: 0,
            next_seq: 0,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedules `event` to fire `delay_ms` after the current time.
    pub fn schedule_in(&mut self, delay_ms: u64, event: E) {
        self.schedule_at(self.now_ms + delay_ms, event);
    }

    /// Schedules `event` at an absolute time; past times fire on the next pop.
    pub fn schedule_at(&mut self, fire_ms: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            fire_ms: fire_ms.max(self.now_ms),
            seq,
            event,
        });
    }

    /// Pops the next event due at or before `until_ms`, moving the clock to its fire time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<E> {
        if self.queue.peek()?.fire_ms > until_ms {
            return None;
        }
        let next = self.queue.pop()?;
        self.now_ms = next.fire_ms;
        Some(next.event)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, time_ms: u64) {
        self.now_ms = self.now_ms.max(time_ms);
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(300, "c");
        scheduler.schedule_at(100, "a");
        scheduler.schedule_at(100, "b");
        scheduler.schedule_at(200, "x");

        let mut fired = Vec::new();
        while let Some(event) = scheduler.pop_due(250) {
            fired.push((scheduler.now_ms(), event));
        }
        assert_eq!(fired, vec![(100, "a"), (100, "b"), (200, "x")]);
        assert_eq!(scheduler.len(), 1);

        scheduler.advance_to(250);
        assert_eq!(scheduler.now_ms(), 250);
        assert_eq!(scheduler.pop_due(1_000), Some("c"));
        assert_eq!(scheduler.now_ms(), 300);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_relative_scheduling_and_past_times() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(500);
        scheduler.schedule_in(100, 1);
        scheduler.schedule_at(10, 2); // Already past
        assert_eq!(scheduler.pop_due(500), Some(2));
        assert_eq!(scheduler.now_ms(), 500);
        assert_eq!(scheduler.pop_due(599), None);
        assert_eq!(scheduler.pop_due(600), Some(1));
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.advance_to(400);
        scheduler.advance_to(100);
        assert_eq!(scheduler.now_ms(), 400);
    }
}
