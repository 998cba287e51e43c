//! Cooperative wait for a free pool slot.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Tracked/busy counters a pool publishes to its waiters.
#[derive(Debug, Default)]
pub(crate) struct Occupancy {
    tracked: Cell<usize>,
    busy: Cell<usize>,
}

impl Occupancy {
    pub(crate) fn update(&self, tracked: usize, busy: usize) {
        self.tracked.set(tracked);
        self.busy.set(busy);
    }

    fn all_busy(&self) -> bool {
        self.busy.get() == self.tracked.get()
    }
}

/// Suspension point that blocks while every tracked instance is busy.
///
/// Created by [`Pool::wait_for_free_object`](crate::Pool::wait_for_free_object).
/// It can be driven two ways:
///
/// - from a frame loop, by calling [`keep_waiting`](Self::keep_waiting) once
///   per tick;
/// - as a [`Future`], which re-checks on every poll and re-schedules itself
///   while blocked.
///
/// The future wakes itself on every pending poll and has no notion of a
/// frame. On an executor that re-polls woken tasks right away (a tokio
/// runtime, for instance) it busy-polls until a slot frees up. Pace it from
/// the host's tick, or use `keep_waiting`, when per-frame checks matter.
///
/// Readiness does not reserve the free slot. Another caller may claim it
/// between resumption and the waiter's next `get`, in which case `get`
/// returns `None` and the waiter has to wait again. A pool that tracks no
/// instances at all counts as having no free slot.
///
/// There is no cancellation: drop the waiter to stop waiting. A waiter
/// outliving its pool observes the pool's last state.
#[derive(Debug, Clone)]
#[must_use = "a waiter does nothing unless polled or checked"]
pub struct WaitForFree {
    occupancy: Rc<Occupancy>,
}

impl WaitForFree {
    pub(crate) fn new(occupancy: Rc<Occupancy>) -> Self {
        Self { occupancy }
    }

    /// Whether the waiting flow is still blocked.
    pub fn keep_waiting(&self) -> bool {
        self.occupancy.all_busy()
    }

    /// Whether at least one tracked instance is free right now.
    pub fn is_ready(&self) -> bool {
        !self.keep_waiting()
    }
}

impl Future for WaitForFree {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.keep_waiting() {
            cx.waker().wake_by_ref();
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_while_everything_is_busy() {
        let occupancy = Rc::new(Occupancy::default());
        let wait = WaitForFree::new(Rc::clone(&occupancy));
        assert!(wait.keep_waiting());

        occupancy.update(2, 2);
        assert!(wait.keep_waiting());

        occupancy.update(2, 1);
        assert!(wait.is_ready());
    }

    #[test]
    fn future_wakes_itself_until_ready() {
        let occupancy = Rc::new(Occupancy::default());
        occupancy.update(1, 1);

        let mut task = tokio_test::task::spawn(WaitForFree::new(Rc::clone(&occupancy)));
        tokio_test::assert_pending!(task.poll());
        assert!(task.is_woken());

        occupancy.update(1, 0);
        tokio_test::assert_ready!(task.poll());
    }
}
