//! Frame payload types.
//!
//! Two families live here: the *live* payloads written by the modality
//! adapters into the shared snapshot ([`ColorView`], [`Pose`], [`BodyMap`]),
//! and the *owned* copies published by the background driver
//! ([`ColorBuffer`], [`OwnedFrame`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

use super::joint::{JOINT_COUNT, JointType};

/// One joint's 3D position in camera space, meters.
///
/// Layout matches the native driver's per-joint struct (float x, y, z).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl JointPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The position as an `[x, y, z]` triple.
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for JointPosition {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// One tracked body's 25 joint positions, index-aligned with
/// [`JointType`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose(pub [JointPosition; JOINT_COUNT]);

impl Pose {
    /// The raw joint array in native order.
    pub fn joints(&self) -> &[JointPosition; JOINT_COUNT] {
        &self.0
    }

    /// Iterate joints together with their vocabulary entry.
    pub fn iter(&self) -> impl Iterator<Item = (JointType, JointPosition)> + '_ {
        JointType::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<JointType> for Pose {
    type Output = JointPosition;

    fn index(&self, joint: JointType) -> &JointPosition {
        &self.0[joint.index()]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose([JointPosition::default(); JOINT_COUNT])
    }
}

/// Latest tracked bodies, keyed by the native body index.
///
/// Rebuilt from scratch on every body callback: a body absent from the most
/// recent callback does not appear here, even if it appeared previously.
pub type BodyMap = BTreeMap<u32, Pose>;

/// A view over the native driver's color pixel memory.
///
/// The buffer is addressed as height x width x 4 interleaved u8 channels and
/// is owned by the native layer. It is only guaranteed valid until the next
/// update call on the session that produced it; a consumer needing
/// persistence must copy (see [`ColorView::to_buffer`]) before the next poll.
#[derive(Debug, Clone, Copy)]
pub struct ColorView {
    width: u32,
    height: u32,
    data: *const u8,
}

// Safety: the pointer targets native-owned memory that the driver keeps
// stable between update calls; the snapshot mutex serializes all access, and
// readers honor the validity window documented above.
unsafe impl Send for ColorView {}

impl ColorView {
    /// Wrap a raw pixel pointer.
    ///
    /// The pointer must reference at least `width * height * 4` readable
    /// bytes for as long as the view is read.
    pub fn new(width: u32, height: u32, data: *const u8) -> Self {
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total byte length of the view (height x width x 4).
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Borrow the pixel bytes, row-major, 4 channels per pixel.
    ///
    /// # Safety
    ///
    /// The caller must ensure no update call has happened on the producing
    /// session since this view was yielded; after that the native driver may
    /// have reused or freed the memory.
    pub unsafe fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.data, self.byte_len()) }
    }

    /// Copy the pixels into an owned buffer.
    ///
    /// # Safety
    ///
    /// Same validity requirement as [`ColorView::as_bytes`].
    pub unsafe fn to_buffer(&self) -> ColorBuffer {
        ColorBuffer {
            width: self.width,
            height: self.height,
            pixels: unsafe { self.as_bytes() }.to_vec(),
        }
    }
}

/// An owned color frame (height x width x 4, u8 per channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes, row-major, 4 channels per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of `width * 4` bytes.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        self.pixels.get(start..start + stride)
    }
}

/// An owned, self-contained frame published by the background driver.
///
/// Unlike the live snapshot, an `OwnedFrame` never references native memory;
/// the copy happens once, inside the driver's poll loop, within the validity
/// window of the source view. `None` fields mean the modality has produced no
/// data yet in this session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedFrame {
    /// Latest color image, if the color modality has fired.
    pub color: Option<ColorBuffer>,
    /// Latest tracked bodies, if the body modality has fired.
    pub bodies: Option<BodyMap>,
    /// Monotonic poll counter, starting at 1 for the first update.
    pub tick: u64,
}
