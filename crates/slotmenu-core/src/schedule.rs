//! Deferred execution: the [`Scheduler`] contract and [`TickScheduler`].
//!
//! Time is counted in ticks, the host's scheduling quantum. A task
//! registered with [`Scheduler::after`] is fire-and-forget: nothing awaits
//! it and it cannot be cancelled.

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks at a later tick.
pub trait Scheduler {
    /// Run `task` `delay` ticks from now. A delay of zero is treated as one:
    /// a task never runs inside the quantum that scheduled it.
    fn after(&self, delay: u32, task: Task);
}

// ---------------------------------------------------------------------------
// TaskQueue
// ---------------------------------------------------------------------------

struct Entry {
    task: Task,
    due: u64,
    /// Monotonically increasing counter used to break ties (FIFO).
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of tasks keyed by `(due tick, insertion order)`.
#[derive(Default)]
struct TaskQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl TaskQueue {
    fn push(&mut self, task: Task, due: u64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { task, due, seq }));
    }

    /// Pop the earliest task if it is due at or before `now`.
    fn pop_due(&mut self, now: u64) -> Option<Task> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due <= now => {
                self.heap.pop().map(|Reverse(entry)| entry.task)
            }
            _ => None,
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

// ---------------------------------------------------------------------------
// TickScheduler
// ---------------------------------------------------------------------------

/// A [`Scheduler`] driven by explicit calls to [`tick`](Self::tick).
///
/// Tasks due on the same tick run in the order they were scheduled. Tasks
/// scheduled while a tick is running land on a later tick.
#[derive(Default)]
pub struct TickScheduler {
    now: Cell<u64>,
    queue: RefCell<TaskQueue>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tick.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Advance one tick and run every task now due. Returns how many ran.
    pub fn tick(&self) -> usize {
        let now = self.now.get() + 1;
        self.now.set(now);

        let mut ran = 0;
        loop {
            // Release the queue borrow before running: tasks may schedule more.
            let next = self.queue.borrow_mut().pop_due(now);
            let Some(task) = next else { break };
            task();
            ran += 1;
        }
        if ran > 0 {
            log::trace!("tick {now}: ran {ran} task(s)");
        }
        ran
    }

    /// Run `ticks` ticks. Returns how many tasks ran in total.
    pub fn advance(&self, ticks: u32) -> usize {
        (0..ticks).map(|_| self.tick()).sum()
    }
}

impl Scheduler for TickScheduler {
    fn after(&self, delay: u32, task: Task) {
        let due = self.now.get() + u64::from(delay.max(1));
        self.queue.borrow_mut().push(task, due);
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| -> Task {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn runs_in_due_order() {
        let s = TickScheduler::new();
        let (log, task) = recorder();
        s.after(3, task("c"));
        s.after(1, task("a"));
        s.after(2, task("b"));
        assert_eq!(s.pending(), 3);

        assert_eq!(s.tick(), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(s.advance(2), 2);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(s.now(), 3);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn fifo_on_same_tick() {
        let s = TickScheduler::new();
        let (log, task) = recorder();
        s.after(2, task("first"));
        s.after(2, task("second"));
        s.after(2, task("third"));
        s.advance(2);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn zero_delay_never_runs_in_current_tick() {
        let s = TickScheduler::new();
        let (log, task) = recorder();
        s.after(0, task("later"));
        assert!(log.borrow().is_empty());
        assert_eq!(s.tick(), 1);
        assert_eq!(*log.borrow(), vec!["later"]);
    }

    #[test]
    fn task_scheduled_during_tick_waits() {
        let s = Rc::new(TickScheduler::new());
        let (log, task) = recorder();
        let inner = s.clone();
        let nested = task("nested");
        s.after(
            1,
            Box::new(move || {
                inner.after(1, nested);
            }),
        );
        assert_eq!(s.tick(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(s.tick(), 1);
        assert_eq!(*log.borrow(), vec!["nested"]);
    }
}
