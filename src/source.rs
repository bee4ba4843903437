//! Polling frame source.
//!
//! A [`FrameSource`] is one acquisition session: it owns the device, owns
//! the session's shared snapshot, and registers a modality adapter for every
//! bit set in the session's flags. Each poll triggers one native update
//! (during which the registered sinks may fire) and then exposes the current
//! snapshot. The sequence of frames has no natural end; the consumer stops
//! pulling, drops the source, and the device is released exactly once.

use tracing::{debug, trace, warn};

use crate::adapters::{BodyAdapter, ColorAdapter};
use crate::device::Device;
use crate::error::Result;
use crate::snapshot::{SharedSnapshot, SnapshotRef};
use crate::types::{Modality, ModalityFlags, OwnedFrame};

/// Polling iterator over the latest-frame snapshot of one sensor session.
///
/// Each constructed source is independent: its own device session, its own
/// snapshot instance. Acquisition restarts by building a new source.
///
/// ```rust,no_run
/// use kinect2::{Kinect2, ModalityFlags};
///
/// # fn main() -> kinect2::Result<()> {
/// let mut source = Kinect2::frames(ModalityFlags::default())?;
/// loop {
///     let frame = source.poll()?;
///     if let Some(bodies) = frame.bodies() {
///         println!("{} bodies tracked", bodies.len());
///     }
/// }
/// # }
/// ```
pub struct FrameSource<D: Device> {
    device: D,
    snapshot: SharedSnapshot,
    flags: ModalityFlags,
    ticks: u64,
    failed: bool,
}

impl<D: Device> FrameSource<D> {
    /// Wrap an opened device, registering adapters for every modality in
    /// `flags`. Unregistered modalities never populate the snapshot.
    pub fn new(mut device: D, flags: ModalityFlags) -> Result<Self> {
        let snapshot = SharedSnapshot::default();

        if flags.contains(Modality::Color) {
            device.register_color(ColorAdapter::new(snapshot.clone()).into_sink())?;
        }
        if flags.contains(Modality::Body) {
            device.register_body(BodyAdapter::new(snapshot.clone()).into_sink())?;
        }

        debug!(flags = flags.bits(), "frame source opened");
        Ok(Self { device, snapshot, flags, ticks: 0, failed: false })
    }

    /// The modality set this session was opened with.
    pub fn flags(&self) -> ModalityFlags {
        self.flags
    }

    /// Number of polls completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// A handle to the live snapshot, independent of polling. Useful for
    /// readers that want to sample between polls.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    /// Run one native update, then read the resulting snapshot.
    ///
    /// The returned guard borrows the *live* snapshot: payloads it exposes
    /// may be overwritten by the next poll, and the color payload is a view
    /// whose backing memory is only valid until then. Copy what must
    /// persist.
    pub fn poll(&mut self) -> Result<SnapshotRef<'_>> {
        self.step()?;
        Ok(self.snapshot.read())
    }

    /// Run one native update, then copy the snapshot into an owned frame.
    ///
    /// A color view written during this update is copied right here, inside
    /// its validity window; quiet updates reuse the previous owned copy
    /// rather than re-reading a view whose window has lapsed.
    pub fn poll_owned(&mut self) -> Result<OwnedFrame> {
        self.step()?;
        // Safety: update has returned and the next one has not started, so a
        // view written during it still targets live native memory.
        Ok(unsafe { self.snapshot.to_owned_frame(self.ticks) })
    }

    /// Release the session. Equivalent to dropping the source; provided so
    /// call sites can make the end of iteration explicit.
    pub fn close(self) {}

    fn step(&mut self) -> Result<()> {
        self.device.update().inspect_err(|e| warn!("native update failed: {e}"))?;
        self.ticks += 1;
        trace!(tick = self.ticks, "frame polled");
        Ok(())
    }
}

/// Infinite iteration over the live snapshot handle.
///
/// Every item is the *same* shared instance, freshly updated; consumers
/// needing a stable copy must duplicate the data they read before the next
/// call to `next`. The iterator fuses after yielding its first error, since
/// this layer defines no retry.
impl<D: Device> Iterator for FrameSource<D> {
    type Item = Result<SharedSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.step() {
            Ok(()) => Some(Ok(self.snapshot.clone())),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
