//! Platform abstraction layer
//!
//! The match loop never schedules itself. It asks a `Clock` for the next
//! display frame or for a one-shot timer, and the host calls back into
//! `Game::on_frame` / `Game::on_timer` when they fire. In a browser that maps
//! onto `requestAnimationFrame` and `setTimeout` (see `crate::web`); tests
//! and the headless binary use `VirtualClock`.

use std::collections::HashMap;

/// Handle for a pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Frame and timer scheduling
pub trait Clock {
    /// Ask for one callback on the next display frame
    fn request_frame(&mut self);

    /// Drop the pending frame request, if any
    fn cancel_frame(&mut self);

    /// Fire once after `delay_ms`
    fn schedule_timer(&mut self, delay_ms: u32) -> TimerId;

    /// Cancel a pending timer; unknown ids are ignored
    fn cancel_timer(&mut self, id: TimerId);
}

/// Pending timers keyed by `TimerId`
///
/// `H` is whatever the host needs to cancel or fire the timer: a browser
/// timeout handle, or a due time for `VirtualClock`.
#[derive(Debug, Clone)]
pub struct TimerBook<H> {
    next_id: u64,
    pending: HashMap<TimerId, H>,
}

impl<H> Default for TimerBook<H> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
        }
    }
}

impl<H> TimerBook<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh id, never reused
    pub fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    pub fn insert(&mut self, id: TimerId, handle: H) {
        self.pending.insert(id, handle);
    }

    /// Forget a timer (fired or cancelled), returning its handle
    pub fn remove(&mut self, id: TimerId) -> Option<H> {
        self.pending.remove(&id)
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<H: Copy> TimerBook<H> {
    /// Remove and return every timer whose handle matches `due`
    pub fn take_where(&mut self, mut due: impl FnMut(H) -> bool) -> Vec<(TimerId, H)> {
        let mut taken = Vec::new();
        self.pending.retain(|&id, &mut handle| {
            if due(handle) {
                taken.push((id, handle));
                false
            } else {
                true
            }
        });
        taken
    }
}

/// Deterministic clock driven by the caller
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
    frame_pending: bool,
    /// Due time per pending timer
    timers: TimerBook<u64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Consume the pending frame request
    ///
    /// Returns true if one was pending; the host should then run one frame.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Move time forward and return the timers that came due, earliest first
    pub fn advance(&mut self, ms: u64) -> Vec<TimerId> {
        self.now_ms += ms;
        let now = self.now_ms;
        let mut due = self.timers.take_where(|at| at <= now);
        due.sort_by_key(|&(id, at)| (at, id));
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl Clock for VirtualClock {
    fn request_frame(&mut self) {
        self.frame_pending = true;
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    fn schedule_timer(&mut self, delay_ms: u32) -> TimerId {
        let id = self.timers.allocate();
        self.timers.insert(id, self.now_ms + u64::from(delay_ms));
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        self.timers.remove(id);
    }
}
