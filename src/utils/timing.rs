/// Debounce and throttle wrappers over an injectable timer
///
/// `Debounced` delays a callback until calls stop arriving for `wait_ms`.
/// `Throttled` runs a callback at most once per `limit_ms`, dropping the
/// calls that arrive while the gate is closed.
///
/// Both take a [`Timer`] so they can run against `setTimeout` in the browser
/// ([`GlooTimer`]) or a virtual clock in tests ([`ManualTimer`]).
///
/// # Example
/// ```ignore
/// let search = Debounced::new(300, |query: String| run_search(&query));
/// search.call("r".into());
/// search.call("ru".into());
/// search.call("rust".into()); // only this one runs, 300ms later
/// ```

use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Something that can run a callback after a delay.
///
/// Dropping the returned handle cancels the callback if it has not run yet.
pub trait Timer: Clone + 'static {
    type Handle: 'static;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser timer backed by `setTimeout`
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}

struct ScheduledTask {
    due: u64,
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualState {
    now: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

/// Deterministic timer driven by [`ManualTimer::advance`]
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualState>>,
}

/// Handle for a task scheduled on a [`ManualTimer`]
pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Number of scheduled tasks that are neither cancelled nor run
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Move the clock forward, running every task that comes due in order
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;

        loop {
            // Borrow is released before the callback runs so it can reschedule
            let next = {
                let mut state = self.state.borrow_mut();
                let idx = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);

                idx.map(|i| {
                    let task = state.tasks.remove(i);
                    state.now = task.due;
                    task
                })
            };

            match next {
                Some(task) if !task.cancelled.get() => (task.callback)(),
                Some(_) => {}
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ManualHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut state = self.state.borrow_mut();
        let due = state.now + delay_ms as u64;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.tasks.push(ScheduledTask {
            due,
            seq,
            cancelled: Rc::clone(&cancelled),
            callback,
        });
        ManualHandle { cancelled }
    }
}

/// Trailing-edge debounce
pub struct Debounced<A: 'static, T: Timer = GlooTimer> {
    callback: Rc<dyn Fn(A)>,
    timer: T,
    wait_ms: u32,
    pending: Rc<RefCell<Option<T::Handle>>>,
    armed: Rc<Cell<bool>>,
}

impl<A: 'static> Debounced<A, GlooTimer> {
    /// Debounce `callback` with the browser timer
    pub fn new<F>(wait_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self::with_timer(GlooTimer, wait_ms, callback)
    }
}

impl<A: 'static, T: Timer> Debounced<A, T> {
    pub fn with_timer<F>(timer: T, wait_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            callback: Rc::new(callback),
            timer,
            wait_ms,
            pending: Rc::new(RefCell::new(None)),
            armed: Rc::new(Cell::new(false)),
        }
    }

    /// Schedule the callback with `arg`, replacing any call still waiting
    pub fn call(&self, arg: A) {
        // Dropping the old handle cancels it
        self.pending.borrow_mut().take();

        let callback = Rc::clone(&self.callback);
        let armed = Rc::clone(&self.armed);
        armed.set(true);

        let handle = self.timer.schedule(
            self.wait_ms,
            Box::new(move || {
                armed.set(false);
                callback(arg);
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Drop the waiting call, if any
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
        self.armed.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.armed.get()
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }
}

impl<A: 'static, T: Timer> Clone for Debounced<A, T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
            timer: self.timer.clone(),
            wait_ms: self.wait_ms,
            pending: Rc::clone(&self.pending),
            armed: Rc::clone(&self.armed),
        }
    }
}

/// Leading-edge throttle with no trailing call
pub struct Throttled<A: 'static, T: Timer = GlooTimer> {
    callback: Rc<dyn Fn(A)>,
    timer: T,
    limit_ms: u32,
    gated: Rc<Cell<bool>>,
    reopen: Rc<RefCell<Option<T::Handle>>>,
}

impl<A: 'static> Throttled<A, GlooTimer> {
    /// Throttle `callback` with the browser timer
    pub fn new<F>(limit_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self::with_timer(GlooTimer, limit_ms, callback)
    }
}

impl<A: 'static, T: Timer> Throttled<A, T> {
    pub fn with_timer<F>(timer: T, limit_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            callback: Rc::new(callback),
            timer,
            limit_ms,
            gated: Rc::new(Cell::new(false)),
            reopen: Rc::new(RefCell::new(None)),
        }
    }

    /// Run the callback if the gate is open. Returns whether it ran.
    pub fn call(&self, arg: A) -> bool {
        if self.gated.get() {
            return false;
        }

        self.gated.set(true);
        (self.callback)(arg);

        let gated = Rc::clone(&self.gated);
        let handle = self
            .timer
            .schedule(self.limit_ms, Box::new(move || gated.set(false)));
        *self.reopen.borrow_mut() = Some(handle);
        true
    }

    /// Reopen the gate immediately
    pub fn reset(&self) {
        self.reopen.borrow_mut().take();
        self.gated.set(false);
    }

    pub fn is_open(&self) -> bool {
        !self.gated.get()
    }

    pub fn limit_ms(&self) -> u32 {
        self.limit_ms
    }
}

impl<A: 'static, T: Timer> Clone for Throttled<A, T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
            timer: self.timer.clone(),
            limit_ms: self.limit_ms,
            gated: Rc::clone(&self.gated),
            reopen: Rc::clone(&self.reopen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn test_manual_timer_runs_in_order() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let record = Rc::new(record);

        for (delay, v) in [(30, 3), (10, 1), (20, 2)] {
            let record = Rc::clone(&record);
            std::mem::forget(timer.schedule(delay, Box::new(move || record(v))));
        }

        timer.advance(25);
        assert_eq!(*calls.borrow(), vec![1, 2]);
        timer.advance(5);
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);
        assert_eq!(timer.now(), 30);
    }

    #[test]
    fn test_manual_handle_drop_cancels() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let handle = timer.schedule(10, Box::new(move || record(1)));
        assert_eq!(timer.pending(), 1);
        drop(handle);
        assert_eq!(timer.pending(), 0);
        timer.advance(20);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_debounce_fires_once_after_quiet_period() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let debounced = Debounced::with_timer(timer.clone(), 100, record);

        for i in 0..5 {
            debounced.call(i);
            if i < 4 {
                timer.advance(10);
            }
        }
        assert!(debounced.is_pending());

        timer.advance(99);
        assert!(calls.borrow().is_empty());

        timer.advance(1);
        assert_eq!(*calls.borrow(), vec![4]);
        assert!(!debounced.is_pending());
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn test_debounce_cancel() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let debounced = Debounced::with_timer(timer.clone(), 50, record);

        debounced.call(1);
        debounced.cancel();
        timer.advance(100);
        assert!(calls.borrow().is_empty());

        debounced.call(2);
        timer.advance(50);
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn test_debounce_clone_shares_state() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let a = Debounced::with_timer(timer.clone(), 50, record);
        let b = a.clone();
        assert_eq!(b.wait_ms(), 50);

        a.call(1);
        timer.advance(30);
        b.call(2);
        timer.advance(50);
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn test_throttle_drops_calls_inside_window() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let throttled = Throttled::with_timer(timer.clone(), 100, record);

        let ran: Vec<bool> = (0..5).map(|i| throttled.call(i)).collect();
        assert_eq!(ran, vec![true, false, false, false, false]);
        assert_eq!(*calls.borrow(), vec![0]);

        timer.advance(150);
        assert!(throttled.is_open());
        assert!(throttled.call(5));
        assert_eq!(*calls.borrow(), vec![0, 5]);
    }

    #[test]
    fn test_throttle_has_no_trailing_call() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let throttled = Throttled::with_timer(timer.clone(), 100, record);

        throttled.call(1);
        throttled.call(2);
        timer.advance(500);
        assert_eq!(*calls.borrow(), vec![1]);
    }

    #[test]
    fn test_throttle_reset() {
        let timer = ManualTimer::new();
        let (calls, record) = recorder();
        let throttled = Throttled::with_timer(timer.clone(), 100, record);

        assert_eq!(throttled.limit_ms(), 100);
        throttled.call(1);
        throttled.reset();
        assert!(throttled.call(2));
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }
}
