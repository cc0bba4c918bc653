/// Opaque token for one pending "next frame" registration.
///
/// Ids are unique per `FrameQueue` and never reused, so a handle that has been
/// cancelled or already served can be recognized as stale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Host frame source.
///
/// Registrations are single-shot: a callback requested with [`request_frame`]
/// is delivered at most once, on the next display refresh. Consumers that want
/// to keep receiving frames must request again from inside the callback.
///
/// Timestamps are high-resolution milliseconds and increase monotonically.
///
/// [`request_frame`]: FrameHost::request_frame
pub trait FrameHost {
    /// Current host time in milliseconds.
    fn now(&self) -> f64;

    /// Registers for the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Voids a pending registration. Unknown or already-served handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Bookkeeping for pending single-shot frame registrations.
///
/// Shared by every host implementation: the windowed runtime and the
/// manual host used in tests both delegate here.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(handle);
        handle
    }

    /// Returns `true` if the handle was pending.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.pending.len() != before
    }

    /// Drains every registration due on the current refresh.
    ///
    /// Registrations made while the drained callbacks run land in the queue
    /// again and are served on the following refresh.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    #[inline]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Frame host driven by hand.
///
/// Time only moves when the caller says so, which makes pacing behavior
/// reproducible: feed a timestamp with [`begin_frame`], then deliver the
/// returned handles to whoever registered them.
///
/// [`begin_frame`]: ManualFrameHost::begin_frame
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    now: f64,
    queue: FrameQueue,
}

impl ManualFrameHost {
    pub fn new(now: f64) -> Self {
        Self {
            now,
            queue: FrameQueue::new(),
        }
    }

    /// Moves the host clock without firing a refresh.
    ///
    /// Time never goes backwards; earlier timestamps are ignored.
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Starts a display refresh at `now` and returns the registrations it serves.
    pub fn begin_frame(&mut self, now: f64) -> Vec<FrameHandle> {
        self.set_now(now);
        self.queue.take_due()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.queue.is_pending(handle)
    }
}

impl FrameHost for ManualFrameHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.queue.request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }
}
