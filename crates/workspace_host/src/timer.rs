//! Timer service contracts and a deterministic virtual clock.
//!
//! Debounces and progress simulation only ever suspend through [`TimerService::sleep`], so a host
//! can drive them from a browser timer, and tests can drive them from [`ManualTimer`] without any
//! wall-clock waiting.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    rc::{Rc, Weak},
    task::{Context, Poll, Waker},
};

/// Object-safe boxed future returned by [`TimerService::sleep`].
pub type TimerFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Host clock and sleep primitive.
pub trait TimerService {
    /// Current time in milliseconds on this timer's clock.
    fn now_ms(&self) -> u64;

    /// Resolves once `duration_ms` has elapsed on this timer's clock.
    fn sleep(&self, duration_ms: u64) -> TimerFuture;
}

#[derive(Debug, Default)]
struct SleepSlot {
    fired: bool,
    waker: Option<Waker>,
}

#[derive(Debug, Default)]
struct ManualClock {
    now_ms: u64,
    next_seq: u64,
    sleepers: BTreeMap<(u64, u64), Rc<RefCell<SleepSlot>>>,
}

#[derive(Debug, Clone, Default)]
/// Virtual clock that only moves when told to.
///
/// Sleepers registered at the same deadline fire together, in registration order. Callers advance
/// the clock one deadline at a time with [`ManualTimer::fire_next`] and run their executor in
/// between, so timers re-armed by woken tasks are honored within the same advance.
pub struct ManualTimer {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualTimer {
    /// Number of sleepers that have not fired yet.
    pub fn pending_sleepers(&self) -> usize {
        self.clock.borrow().sleepers.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.clock
            .borrow()
            .sleepers
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Fires every sleeper sharing the earliest deadline, provided it is not after `limit_ms`.
    ///
    /// The clock moves to that deadline. Returns `false` when nothing was due.
    pub fn fire_next(&self, limit_ms: u64) -> bool {
        let due = {
            let mut clock = self.clock.borrow_mut();
            let Some(deadline) = clock.sleepers.keys().next().map(|(deadline, _)| *deadline)
            else {
                return false;
            };
            if deadline > limit_ms {
                return false;
            }
            clock.now_ms = clock.now_ms.max(deadline);
            let later = clock.sleepers.split_off(&(deadline.saturating_add(1), 0));
            std::mem::replace(&mut clock.sleepers, later)
        };

        for slot in due.into_values() {
            let waker = {
                let mut slot = slot.borrow_mut();
                slot.fired = true;
                slot.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        }
        true
    }

    /// Moves the clock forward to `now_ms` without firing anything. Never moves it backwards.
    pub fn set_now(&self, now_ms: u64) {
        let mut clock = self.clock.borrow_mut();
        clock.now_ms = clock.now_ms.max(now_ms);
    }
}

impl TimerService for ManualTimer {
    fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    fn sleep(&self, duration_ms: u64) -> TimerFuture {
        if duration_ms == 0 {
            return Box::pin(futures::future::ready(()));
        }
        let slot = Rc::new(RefCell::new(SleepSlot::default()));
        let key = {
            let mut clock = self.clock.borrow_mut();
            clock.next_seq += 1;
            let key = (clock.now_ms.saturating_add(duration_ms), clock.next_seq);
            clock.sleepers.insert(key, Rc::clone(&slot));
            key
        };
        Box::pin(ManualSleep {
            key,
            slot,
            clock: Rc::downgrade(&self.clock),
        })
    }
}

struct ManualSleep {
    key: (u64, u64),
    slot: Rc<RefCell<SleepSlot>>,
    clock: Weak<RefCell<ManualClock>>,
}

impl Future for ManualSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut slot = self.slot.borrow_mut();
        if slot.fired {
            return Poll::Ready(());
        }
        slot.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl Drop for ManualSleep {
    fn drop(&mut self) {
        if self.slot.borrow().fired {
            return;
        }
        if let Some(clock) = self.clock.upgrade() {
            if let Ok(mut clock) = clock.try_borrow_mut() {
                clock.sleepers.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::{executor::LocalPool, task::LocalSpawnExt};

    use super::*;

    #[test]
    fn sleepers_fire_in_deadline_order_and_move_the_clock() {
        let mut pool = LocalPool::new();
        let timer = ManualTimer::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("late", 500), ("early", 300), ("zero", 0)] {
            let timer = timer.clone();
            let order = Rc::clone(&order);
            pool.spawner()
                .spawn_local(async move {
                    timer.sleep(delay).await;
                    order.borrow_mut().push((label, timer.now_ms()));
                })
                .expect("spawn");
        }
        pool.run_until_stalled();
        assert_eq!(*order.borrow(), vec![("zero", 0)]);
        assert_eq!(timer.pending_sleepers(), 2);

        assert!(!timer.fire_next(299));
        assert!(timer.fire_next(1_000));
        pool.run_until_stalled();
        assert!(timer.fire_next(1_000));
        pool.run_until_stalled();
        assert!(!timer.fire_next(1_000));

        assert_eq!(
            *order.borrow(),
            vec![("zero", 0), ("early", 300), ("late", 500)]
        );
    }

    #[test]
    fn dropped_sleeper_is_unregistered() {
        let timer = ManualTimer::default();
        let sleep = timer.sleep(100);
        assert_eq!(timer.pending_sleepers(), 1);
        drop(sleep);
        assert_eq!(timer.pending_sleepers(), 0);
        assert_eq!(timer.next_deadline(), None);
    }

    #[test]
    fn set_now_never_rewinds() {
        let timer = ManualTimer::default();
        timer.set_now(50);
        timer.set_now(10);
        assert_eq!(timer.now_ms(), 50);

        let fired = Rc::new(Cell::new(false));
        let mut pool = LocalPool::new();
        let sleeper = timer.sleep(25);
        let flag = Rc::clone(&fired);
        pool.spawner()
            .spawn_local(async move {
                sleeper.await;
                flag.set(true);
            })
            .expect("spawn");
        pool.run_until_stalled();
        assert_eq!(timer.next_deadline(), Some(75));
        assert!(timer.fire_next(75));
        pool.run_until_stalled();
        assert!(fired.get());
    }
}
