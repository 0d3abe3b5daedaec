//! Injectable time and frame sources
//!
//! The spin driver never reads the wall clock or schedules frames on its own.
//! A host hands it a [`Clock`] and a [`FrameScheduler`]; tests hand it a
//! [`ManualClock`] and drain the [`FrameQueue`] themselves.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Monotonic time source in milliseconds
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Real monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give another
/// to the driver.
///
/// # Example
///
/// ```rust
/// use prize_wheel::animation::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let driver_handle = clock.clone();
///
/// clock.advance(16.0);
/// assert_eq!(driver_handle.now_ms(), 16.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at the given time.
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(now_ms)),
        }
    }

    /// Moves time forward by `delta_ms`.
    pub fn advance(&self, delta_ms: f64) {
        *self.now.lock() += delta_ms;
    }

    /// Jumps to an absolute time.
    pub fn set(&self, now_ms: f64) {
        *self.now.lock() = now_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}

/// Handle of a requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source of animation frames, e.g. a display-refresh callback
///
/// The driver requests one frame at a time and expects the host to call
/// [`SpinDriver::on_frame`](super::SpinDriver::on_frame) with the returned id
/// once the frame is due. A cancelled frame must not be delivered.
pub trait FrameScheduler {
    /// Requests the next frame.
    fn request_frame(&mut self) -> FrameId;

    /// Withdraws a frame that has not been delivered yet.
    fn cancel_frame(&mut self, frame: FrameId);
}

#[derive(Debug, Default)]
struct FrameQueueInner {
    next_id: u64,
    pending: VecDeque<FrameId>,
}

/// Frame scheduler backed by a shared queue
///
/// The host drains it on each display refresh with [`FrameQueue::take_pending`]
/// and forwards every id to the driver. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    inner: Arc<Mutex<FrameQueueInner>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending frame, oldest first.
    pub fn take_pending(&self) -> Vec<FrameId> {
        self.inner.lock().pending.drain(..).collect()
    }

    /// Number of frames waiting for delivery
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending_len() == 0
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let frame = FrameId(inner.next_id);
        inner.pending.push_back(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.inner.lock().pending.retain(|pending| *pending != frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::starting_at(100.0);
        let other = clock.clone();

        clock.advance(50.0);
        assert_eq!(other.now_ms(), 150.0);

        other.set(10.0);
        assert_eq!(clock.now_ms(), 10.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }

    #[test]
    fn test_frame_queue_ids_are_unique() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();

        assert_ne!(a, b);
        assert_eq!(queue.pending_len(), 2);
        assert_eq!(queue.take_pending(), vec![a, b]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_frame_queue_cancel() {
        let mut queue = FrameQueue::new();
        let observer = queue.clone();
        let a = queue.request_frame();
        let b = queue.request_frame();

        queue.cancel_frame(a);
        assert_eq!(observer.take_pending(), vec![b]);
    }
}
