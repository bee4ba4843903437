//! Modern, type-safe Rust library for Kinect v2 frame acquisition.
//!
//! `kinect2` exposes the sensor's color camera and skeletal body tracker
//! through a polling frame-acquisition loop: the native driver pushes
//! per-modality callbacks, the library aggregates them into a shared
//! latest-frame snapshot, and the caller pulls snapshots one update at a
//! time.
//!
//! # Features
//!
//! - **Polling acquisition**: [`FrameSource`] drives the native update loop
//!   and yields the live snapshot
//! - **Async streaming**: [`Connection`] publishes owned frame copies as a
//!   `futures::Stream` for tokio applications
//! - **Scripted devices**: hardware-free [`ScriptedDevice`] for tests and
//!   cross-platform development
//! - **Typed vocabulary**: [`ModalityFlags`] stream selection and the
//!   25-joint [`JointType`] skeleton table
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kinect2::{Kinect2, Modality, ModalityFlags};
//!
//! fn main() -> kinect2::Result<()> {
//!     let mut source = Kinect2::frames(ModalityFlags::COLOR | Modality::Body)?;
//!     loop {
//!         let frame = source.poll()?;
//!         if let Some(bodies) = frame.bodies() {
//!             for (index, pose) in bodies {
//!                 println!("body {index}: head at {:?}", pose[kinect2::JointType::Head]);
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! The yielded snapshot is the *live* instance: a modality without fresh
//! data this cycle keeps its previous payload, a modality that never fired
//! reads as `None`, and the color payload is a view over native memory only
//! valid until the next poll. Copy what must persist.

// Core types and error handling
mod error;
pub mod types;

// Acquisition architecture
pub mod adapters;
pub mod device;
pub mod devices;
mod snapshot;
mod source;

// Streaming architecture
mod connection;
pub mod driver;

// Core exports
pub use error::{Result, SensorError};
pub use types::*;

// Acquisition exports
pub use device::{BodyRecord, ColorImage, Device};
pub use devices::{NativeDevice, ScriptedDevice, ScriptedEvent, ScriptedState};
pub use snapshot::{FrameSnapshot, SharedSnapshot, SnapshotRef};
pub use source::FrameSource;

// Streaming exports
pub use connection::Connection;
pub use driver::{Driver, DriverChannels};

/// Unified entry point for sensor sessions.
///
/// # Examples
///
/// ## Polling loop
/// ```rust,no_run
/// use kinect2::{Kinect2, ModalityFlags};
///
/// # fn main() -> kinect2::Result<()> {
/// let mut source = Kinect2::frames(ModalityFlags::default())?;
/// let frame = source.poll()?;
/// # Ok(())
/// # }
/// ```
///
/// ## Async stream
/// ```rust,no_run
/// use futures::StreamExt;
/// use kinect2::{Kinect2, ModalityFlags};
///
/// # async fn demo() -> kinect2::Result<()> {
/// let connection = Kinect2::stream(ModalityFlags::default())?;
/// let mut frames = connection.frames();
/// while let Some(frame) = frames.next().await {
///     println!("tick {}", frame.tick);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Kinect2;

impl Kinect2 {
    /// Open the native sensor as a polling [`FrameSource`].
    ///
    /// Registers adapters for exactly the modalities in `flags` and fails
    /// before any frame is produced if the device cannot be opened. Live
    /// acquisition requires Windows; elsewhere this returns
    /// [`SensorError::UnsupportedPlatform`].
    pub fn frames(flags: ModalityFlags) -> Result<FrameSource<NativeDevice>> {
        FrameSource::new(NativeDevice::open(flags)?, flags)
    }

    /// Open the native sensor as an async [`Connection`].
    ///
    /// Must be called within a tokio runtime; same failure semantics as
    /// [`Kinect2::frames`].
    pub fn stream(flags: ModalityFlags) -> Result<Connection> {
        Connection::connect(flags)
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn entry_points_fail_cleanly_off_windows() {
        let err = Kinect2::frames(ModalityFlags::default())
            .err()
            .expect("live acquisition should be unavailable here");
        assert!(matches!(err, SensorError::UnsupportedPlatform { .. }));
    }
}
