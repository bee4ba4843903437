//! Modality callback adapters.
//!
//! Adapters are the glue between the native push-style callbacks and the
//! pull-based polling loop: each one closes over the session's
//! [`SharedSnapshot`] and translates one raw callback payload into one
//! in-place snapshot mutation. The [`FrameSource`](crate::FrameSource)
//! registers an adapter only for modalities whose flag bit is set, so
//! unregistered modalities can never populate the snapshot.

use std::collections::BTreeMap;

use crate::device::{BodyRecord, BodySink, ColorImage, ColorSink};
use crate::snapshot::SharedSnapshot;
use crate::types::{BodyMap, ColorView, Pose};

/// Translates native color callbacks into snapshot writes.
///
/// Installs a *view* over the native pixel memory, not a copy; see
/// [`ColorView`] for the validity window.
pub struct ColorAdapter {
    snapshot: SharedSnapshot,
}

impl ColorAdapter {
    pub fn new(snapshot: SharedSnapshot) -> Self {
        Self { snapshot }
    }

    /// Handle one native color callback.
    pub fn on_image(&mut self, image: ColorImage) {
        // Negative dimensions never come from a healthy driver; treat them
        // as an empty image rather than wrapping around.
        let width = image.width.max(0) as u32;
        let height = image.height.max(0) as u32;
        self.snapshot.lock().set_color(ColorView::new(width, height, image.data));
    }

    /// Box the adapter into the sink form devices register.
    pub fn into_sink(mut self) -> ColorSink {
        Box::new(move |image| self.on_image(image))
    }
}

/// Translates native body callbacks into snapshot writes.
///
/// Every invocation rebuilds the body map from scratch (replace-on-write):
/// a body the tracker stopped reporting disappears from the snapshot, it is
/// never merged with earlier data.
pub struct BodyAdapter {
    snapshot: SharedSnapshot,
}

impl BodyAdapter {
    pub fn new(snapshot: SharedSnapshot) -> Self {
        Self { snapshot }
    }

    /// Handle one native body callback.
    pub fn on_bodies(&mut self, records: &[BodyRecord]) {
        let mut bodies: BodyMap = BTreeMap::new();
        for record in records {
            bodies.insert(record.index, Pose(record.joints));
        }
        self.snapshot.lock().set_bodies(bodies);
    }

    /// Box the adapter into the sink form devices register.
    pub fn into_sink(mut self) -> BodySink {
        Box::new(move |records| self.on_bodies(records))
    }
}
