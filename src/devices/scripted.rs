//! Scripted device for tests and hardware-free development.
//!
//! A [`ScriptedDevice`] plays back a caller-supplied schedule: each update
//! call consumes one step of the script and fires the corresponding sinks,
//! exactly the way the native layer fires callbacks within the bounds of an
//! update call. A [`ScriptedState`] handle stays observable after the device
//! moves into a frame source, for asserting registration, update counts and
//! release.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::trace;

use crate::device::{BodyRecord, BodySink, ColorImage, ColorSink, Device};
use crate::error::{Result, SensorError};

/// One scripted callback delivery.
#[derive(Debug, Clone)]
pub enum ScriptedEvent {
    /// Fire the color sink with the given image. The device owns the pixel
    /// memory and keeps it alive for the rest of the session, so stale views
    /// remain readable (unlike a real driver, which may reuse the buffer).
    Color { width: i32, height: i32, pixels: Vec<u8> },
    /// Fire the body sink with the given records.
    Bodies(Vec<BodyRecord>),
    /// Fail the update call, simulating a mid-session native failure.
    Fault(&'static str),
}

/// Observable side of a [`ScriptedDevice`].
#[derive(Debug, Default)]
pub struct ScriptedState {
    updates: AtomicU64,
    color_registered: AtomicBool,
    body_registered: AtomicBool,
    released: AtomicBool,
}

impl ScriptedState {
    /// Number of update calls the device has received.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }

    /// Whether a color sink was registered.
    pub fn color_registered(&self) -> bool {
        self.color_registered.load(Ordering::SeqCst)
    }

    /// Whether a body sink was registered.
    pub fn body_registered(&self) -> bool {
        self.body_registered.load(Ordering::SeqCst)
    }

    /// Whether the device has been released (dropped).
    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

/// Fake sensor session driven by a script instead of hardware.
pub struct ScriptedDevice {
    script: VecDeque<Vec<ScriptedEvent>>,
    color_sink: Option<ColorSink>,
    body_sink: Option<BodySink>,
    // Fired pixel buffers, kept alive until release so views stay valid
    retained: Vec<Box<[u8]>>,
    pacing: Option<std::time::Duration>,
    state: Arc<ScriptedState>,
}

impl ScriptedDevice {
    /// A device with an empty script; updates fire no callbacks until steps
    /// are pushed.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            color_sink: None,
            body_sink: None,
            retained: Vec::new(),
            pacing: None,
            state: Arc::new(ScriptedState::default()),
        }
    }

    /// Block each update call for `interval`, the way a real driver blocks
    /// on device I/O between frames.
    pub fn with_pacing(mut self, interval: std::time::Duration) -> Self {
        self.pacing = Some(interval);
        self
    }

    /// Simulate device-unavailable: fails the way a native open does, before
    /// any sink could be registered.
    pub fn unavailable() -> Result<Self> {
        Err(SensorError::device_unavailable("no kinect sensor found (scripted)"))
    }

    /// Append one update step; each update call consumes one step in FIFO
    /// order. An exhausted script means updates fire nothing.
    pub fn push_update(&mut self, events: Vec<ScriptedEvent>) {
        self.script.push_back(events);
    }

    /// Builder-style [`ScriptedDevice::push_update`].
    pub fn with_update(mut self, events: Vec<ScriptedEvent>) -> Self {
        self.push_update(events);
        self
    }

    /// Handle for observing the device after it moves into a frame source.
    pub fn state(&self) -> Arc<ScriptedState> {
        Arc::clone(&self.state)
    }
}

impl Default for ScriptedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for ScriptedDevice {
    fn update(&mut self) -> Result<()> {
        if let Some(interval) = self.pacing {
            std::thread::sleep(interval);
        }
        self.state.updates.fetch_add(1, Ordering::SeqCst);
        let events = self.script.pop_front().unwrap_or_default();
        trace!(events = events.len(), "scripted update");

        for event in events {
            match event {
                ScriptedEvent::Color { width, height, pixels } => {
                    let pixels: Box<[u8]> = pixels.into_boxed_slice();
                    let data = pixels.as_ptr();
                    self.retained.push(pixels);
                    // Only registered modalities deliver, as with the native
                    // driver
                    if let Some(sink) = self.color_sink.as_mut() {
                        sink(ColorImage { width, height, data });
                    }
                }
                ScriptedEvent::Bodies(records) => {
                    if let Some(sink) = self.body_sink.as_mut() {
                        sink(&records);
                    }
                }
                ScriptedEvent::Fault(operation) => {
                    return Err(SensorError::native(operation));
                }
            }
        }
        Ok(())
    }

    fn register_color(&mut self, sink: ColorSink) -> Result<()> {
        self.state.color_registered.store(true, Ordering::SeqCst);
        self.color_sink = Some(sink);
        Ok(())
    }

    fn register_body(&mut self, sink: BodySink) -> Result<()> {
        self.state.body_registered.store(true, Ordering::SeqCst);
        self.body_sink = Some(sink);
        Ok(())
    }
}

impl Drop for ScriptedDevice {
    fn drop(&mut self) {
        self.state.released.store(true, Ordering::SeqCst);
    }
}
