//! # Main loop
//!
//! Everything in Shuffle runs on one UI thread. Work that has to happen
//! "later" (batch-update completions, the paging cooldown) is posted to a
//! [`MainLoop`] as a delayed task and resumes on that same thread when the
//! host calls [`MainLoop::run_due`] from its frame callback.
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//! use shuffle_core::*;
//!
//! let clock = Rc::new(ManualClock::new());
//! let main_loop = MainLoop::new(clock.clone());
//! main_loop.post_after(Duration::from_millis(300), || ());
//!
//! assert_eq!(main_loop.run_due(), 0);
//! clock.advance(Duration::from_millis(300));
//! assert_eq!(main_loop.run_due(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::animation::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct Task {
    id: TaskId,
    due: Instant,
    run: Box<dyn FnOnce()>,
}

pub struct MainLoop {
    clock: Rc<dyn Clock>,
    queue: RefCell<Vec<Task>>,
    next_id: Cell<u64>,
}

impl MainLoop {
    pub fn new(clock: Rc<dyn Clock>) -> Rc<Self> {
        Rc::new(Self {
            clock,
            queue: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Runs `f` on the next `run_due`.
    pub fn post(&self, f: impl FnOnce() + 'static) -> TaskId {
        self.post_after(Duration::ZERO, f)
    }

    pub fn post_after(&self, delay: Duration, f: impl FnOnce() + 'static) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push(Task {
            id,
            due: self.now() + delay,
            run: Box::new(f),
        });
        id
    }

    /// Drops a task that has not run yet. Returns false if it already ran.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|t| t.id != id);
        queue.len() != before
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs every task whose deadline has passed, earliest first. Tasks posted
    /// while running are picked up too if they are already due.
    pub fn run_due(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due() {
            (task.run)();
            ran += 1;
        }
        ran
    }

    fn pop_due(&self) -> Option<Task> {
        let now = self.now();
        let mut queue = self.queue.borrow_mut();
        let next = queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.cmp(&b.due).then(a.id.0.cmp(&b.id.0)))
            .map(|(i, _)| i)?;
        Some(queue.remove(next))
    }
}
