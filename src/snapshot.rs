//! The shared latest-frame mailbox.
//!
//! One [`FrameSnapshot`] instance per acquisition session, shared between the
//! modality adapters (writers) and the polling loop (reader) via
//! [`SharedSnapshot`]. The snapshot is mutated in place; yielding it hands
//! out the live instance, so values a consumer observes can change between
//! observation and use unless the consumer copies them first. This is a
//! deliberate staleness/performance tradeoff, not an oversight.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{BodyMap, ColorBuffer, ColorView, Modality, OwnedFrame};

/// Latest payload per modality.
///
/// A field is `Some` only once at least one callback for that modality has
/// fired since the session opened. `None` means "no data yet"; a body
/// callback reporting zero bodies leaves `Some` with an empty map, which is
/// a different state.
#[derive(Debug, Default)]
pub struct FrameSnapshot {
    color: Option<ColorView>,
    // True only between a set_color and the owned copy that follows it:
    // the view targets memory the driver may reuse once the next update
    // runs, so the copy must happen while the write is still fresh.
    color_fresh: bool,
    color_cache: Option<ColorBuffer>,
    bodies: Option<BodyMap>,
}

impl FrameSnapshot {
    /// Latest color image view, if the color modality has fired.
    pub fn color(&self) -> Option<&ColorView> {
        self.color.as_ref()
    }

    /// Latest body map, if the body modality has fired.
    pub fn bodies(&self) -> Option<&BodyMap> {
        self.bodies.as_ref()
    }

    /// Whether the given modality has delivered any data this session.
    pub fn has(&self, modality: Modality) -> bool {
        match modality {
            Modality::Color => self.color.is_some(),
            Modality::Body => self.bodies.is_some(),
        }
    }

    pub(crate) fn set_color(&mut self, view: ColorView) {
        self.color = Some(view);
        self.color_fresh = true;
    }

    pub(crate) fn set_bodies(&mut self, bodies: BodyMap) {
        self.bodies = Some(bodies);
    }

    /// Copy the snapshot into a self-contained frame.
    ///
    /// A view written during the just-completed update is copied now, inside
    /// its validity window, and the copy is cached; an update that fired no
    /// color callback serves the cached copy instead of re-reading a view
    /// whose window has already lapsed.
    ///
    /// # Safety
    ///
    /// The caller must guarantee no further update call has happened on the
    /// producing session since the color view was last written, i.e. this
    /// runs right after the update that fired the callback returned.
    pub(crate) unsafe fn to_owned_frame(&mut self, tick: u64) -> OwnedFrame {
        if self.color_fresh {
            self.color_cache = self.color.as_ref().map(|view| unsafe { view.to_buffer() });
            self.color_fresh = false;
        }
        OwnedFrame { color: self.color_cache.clone(), bodies: self.bodies.clone(), tick }
    }
}

/// Cloneable handle to the session's shared snapshot.
///
/// The mutex exists because Rust cannot verify the native driver's claim
/// that callbacks settle within the triggering update call; if the driver
/// delivers from its own thread, mutation stays serialized.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<FrameSnapshot>>,
}

impl SharedSnapshot {
    /// Read access to the live snapshot. Holding the guard blocks adapter
    /// writes, so drop it before the next poll.
    pub fn read(&self) -> SnapshotRef<'_> {
        SnapshotRef(self.lock())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FrameSnapshot> {
        // A poisoned lock only means an adapter panicked mid-write; the
        // snapshot stays structurally valid, so recover the guard.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy the current contents; see [`FrameSnapshot::to_owned_frame`].
    ///
    /// # Safety
    ///
    /// Same validity requirement as [`FrameSnapshot::to_owned_frame`].
    pub(crate) unsafe fn to_owned_frame(&self, tick: u64) -> OwnedFrame {
        unsafe { self.lock().to_owned_frame(tick) }
    }
}

/// Read guard over the live [`FrameSnapshot`].
pub struct SnapshotRef<'a>(MutexGuard<'a, FrameSnapshot>);

impl std::ops::Deref for SnapshotRef<'_> {
    type Target = FrameSnapshot;

    fn deref(&self) -> &FrameSnapshot {
        &self.0
    }
}

impl SnapshotRef<'_> {
    /// Convenience copy of the color payload while the guard is held.
    ///
    /// # Safety
    ///
    /// Same validity requirement as [`ColorView::as_bytes`].
    pub unsafe fn color_buffer(&self) -> Option<ColorBuffer> {
        self.color().map(|view| unsafe { view.to_buffer() })
    }
}
