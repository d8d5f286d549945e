//! Browser timer and executor adapters.
//!
//! [`BrowserTimer`] schedules wake-ups with `window.setTimeout` and [`BrowserSpawner`] runs tasks
//! on the page's microtask queue. Both exist only on `wasm32`; other targets compose their own
//! [`TimerService`](crate::TimerService) and `LocalSpawn`.

#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use futures::{
    channel::oneshot,
    future::{self, LocalFutureObj},
    task::{LocalSpawn, SpawnError},
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
use crate::{time::unix_time_ms_now, HostServices, TimerFuture, TimerService};

/// Converts a sleep duration into a `setTimeout` delay, saturating at the browser's `i32` limit.
pub fn timeout_delay_ms(duration_ms: u64) -> i32 {
    i32::try_from(duration_ms).unwrap_or(i32::MAX)
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
/// Wall-clock timer backed by `window.setTimeout`.
///
/// Without a `window` (worker contexts) sleeps resolve immediately.
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl TimerService for BrowserTimer {
    fn now_ms(&self) -> u64 {
        unix_time_ms_now()
    }

    fn sleep(&self, duration_ms: u64) -> TimerFuture {
        let Some(window) = web_sys::window() else {
            return Box::pin(future::ready(()));
        };
        let (fired, wait) = oneshot::channel::<()>();
        let callback = Closure::once_into_js(move || {
            let _ = fired.send(());
        });
        let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            timeout_delay_ms(duration_ms),
        );
        if scheduled.is_err() {
            return Box::pin(future::ready(()));
        }
        // A dropped receiver leaves the timeout armed; its send is ignored.
        Box::pin(async move {
            let _ = wait.await;
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
/// Spawns workspace tasks with `wasm_bindgen_futures::spawn_local`.
pub struct BrowserSpawner;

#[cfg(target_arch = "wasm32")]
impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl HostServices {
    /// Replaces the timer and spawner with the browser adapters.
    pub fn with_browser_runtime(mut self) -> Self {
        self.timer = Rc::new(BrowserTimer);
        self.spawner = Rc::new(BrowserSpawner);
        self
    }

    /// Backend-less bundle running on the browser timer and executor.
    pub fn browser_noop() -> Self {
        Self::noop(Rc::new(BrowserTimer), Rc::new(BrowserSpawner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_delay_saturates_at_the_browser_limit() {
        assert_eq!(timeout_delay_ms(0), 0);
        assert_eq!(timeout_delay_ms(300), 300);
        assert_eq!(timeout_delay_ms(i32::MAX as u64), i32::MAX);
        assert_eq!(timeout_delay_ms(u64::MAX), i32::MAX);
    }
}
