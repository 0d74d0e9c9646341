//! Host scheduling primitives.
//!
//! The renderer never loops on its own. It asks the host for the next display
//! refresh with [`Scheduler::request_frame`] and for delayed callbacks with
//! [`Scheduler::set_timeout`]; the host later calls back into the renderer
//! with the handle it handed out. Handles are opaque and never reused, so a
//! callback for a cancelled request can be recognised and dropped.
//!
//! [`ManualScheduler`] is a deterministic implementation driven by a virtual
//! clock, used by the tests and the headless demo. Both it and the window
//! host keep their timers in a [`TimerQueue`], which only needs an ordered
//! clock value: `Duration` for virtual time, `Instant` for wall time.

use std::time::Duration;

/// Identifies one pending display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Identifies one pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Display-refresh and timer services provided by the host.
pub trait Scheduler {
    /// Ask for a callback at the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a frame request. Unknown or already-delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Ask for a callback once `delay` has elapsed.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Withdraw a timer. Unknown or already-fired handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);
}

impl<H: Scheduler + ?Sized> Scheduler for &mut H {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        (**self).set_timeout(delay)
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        (**self).clear_timeout(handle);
    }
}

/// Pending timers ordered by deadline.
///
/// `T` is whatever the owning scheduler measures time with. Ties on the
/// deadline fire in the order the handles were issued.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<(TimerHandle, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { timers: Vec::new() }
    }
}

impl<T: Copy + Ord> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: TimerHandle, deadline: T) {
        self.timers.push((handle, deadline));
    }

    /// Withdraw a timer. Returns `false` if it was not pending.
    pub fn remove(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|&(h, _)| h != handle);
        self.timers.len() != before
    }

    /// Remove and return timers whose deadline is at or before `now`, earliest first.
    pub fn take_due(&mut self, now: T) -> Vec<TimerHandle> {
        let mut due: Vec<(TimerHandle, T)> = Vec::new();
        self.timers.retain(|&(handle, deadline)| {
            if deadline <= now {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, deadline)| (deadline, handle));
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<T> {
        self.timers.iter().map(|&(_, deadline)| deadline).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Deterministic scheduler with a virtual clock.
///
/// Frame requests queue until [`take_frames`](Self::take_frames) drains them,
/// the way a browser runs all animation callbacks registered before a
/// refresh. Timers fire when [`advance`](Self::advance) moves the clock past
/// their deadline.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: TimerQueue<Duration>,
    frames_requested: u64,
    frames_cancelled: u64,
    timers_set: u64,
    timers_cleared: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Remove and return every outstanding frame request, oldest first.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
    }

    /// Move the clock forward and return the timers that came due, earliest first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerHandle> {
        self.now += elapsed;
        self.timers.take_due(self.now)
    }

    /// Outstanding frame requests.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Outstanding timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest timer deadline, if any timer is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Total frame requests ever issued.
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Total frame requests withdrawn before delivery.
    pub fn frames_cancelled(&self) -> u64 {
        self.frames_cancelled
    }

    /// Total timers ever set.
    pub fn timers_set(&self) -> u64 {
        self.timers_set
    }

    /// Total timers withdrawn before firing.
    pub fn timers_cleared(&self) -> u64 {
        self.timers_cleared
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.frames.len();
        self.frames.retain(|&h| h != handle);
        if self.frames.len() != before {
            self.frames_cancelled += 1;
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.insert(handle, self.now + delay);
        self.timers_set += 1;
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        if self.timers.remove(handle) {
            self.timers_cleared += 1;
        }
    }
}
