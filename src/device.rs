//! Device capability trait and raw callback payloads.
//!
//! A [`Device`] is one opened native sensor session: it can advance device
//! state (`update`) and accept per-modality callback sinks. Opening stays on
//! the concrete types ([`NativeDevice`](crate::devices::NativeDevice),
//! [`ScriptedDevice`](crate::devices::ScriptedDevice)) because their
//! configuration differs; release is RAII, performed exactly once when the
//! device is dropped.

use crate::Result;
use crate::types::{JOINT_COUNT, JointPosition};

/// One tracked body as delivered by the native body callback.
///
/// Layout matches the native record: an unsigned body index followed by 25
/// (x, y, z) float triples in joint-vocabulary order.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BodyRecord {
    /// The tracker's slot index for this body.
    pub index: u32,
    /// Joint positions, index-aligned with [`JointType`](crate::JointType).
    pub joints: [JointPosition; JOINT_COUNT],
}

impl BodyRecord {
    /// A record with every joint at the same position. Test scaffolding for
    /// scripted devices; real records come from the native tracker.
    pub fn uniform(index: u32, position: JointPosition) -> Self {
        Self { index, joints: [position; JOINT_COUNT] }
    }
}

/// Raw color image descriptor delivered by the native color callback.
///
/// `data` points at `height * width * 4` bytes of native-owned interleaved
/// pixel memory, valid only until the next update call on the session.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ColorImage {
    pub width: i32,
    pub height: i32,
    pub data: *const u8,
}

/// Sink invoked by the device whenever a new color image is ready.
pub type ColorSink = Box<dyn FnMut(ColorImage) + Send>;

/// Sink invoked by the device with the full set of currently tracked bodies.
pub type BodySink = Box<dyn FnMut(&[BodyRecord]) + Send>;

/// An opened native sensor session.
///
/// Registered sinks must stay alive for the whole session: the native layer
/// invokes them at times outside the caller's control, so the device takes
/// ownership of each sink and holds it until release. Callbacks triggered by
/// `update` settle before it returns; effects are observable immediately
/// after.
pub trait Device: Send {
    /// Advance device state. May block on device I/O, and may invoke zero or
    /// more registered sinks before returning.
    fn update(&mut self) -> Result<()>;

    /// Install the color callback sink. Only registered modalities ever
    /// deliver data.
    fn register_color(&mut self, sink: ColorSink) -> Result<()>;

    /// Install the body callback sink.
    fn register_body(&mut self, sink: BodySink) -> Result<()>;
}
