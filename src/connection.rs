//! Async connection over the background driver.
//!
//! Wraps [`Driver`](crate::driver::Driver) channels in a consumer-facing
//! handle: frames arrive as a `futures::Stream` of owned copies, and
//! dropping the connection cancels the poll loop (which releases the
//! device).

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::device::Device;
use crate::devices::NativeDevice;
use crate::driver::Driver;
use crate::error::Result;
use crate::source::FrameSource;
use crate::types::{ModalityFlags, OwnedFrame};

/// Streaming connection to a sensor session.
///
/// ```rust,no_run
/// use futures::StreamExt;
/// use kinect2::{Connection, ModalityFlags};
///
/// # async fn demo() -> kinect2::Result<()> {
/// let connection = Connection::connect(ModalityFlags::default())?;
/// let mut frames = connection.frames();
/// while let Some(frame) = frames.next().await {
///     println!("tick {}", frame.tick);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    frames: watch::Receiver<Option<Arc<OwnedFrame>>>,
    flags: ModalityFlags,
    cancel: CancellationToken,
}

impl Connection {
    /// Open the native sensor and start streaming.
    ///
    /// Must be called within a tokio runtime. Fails before any frame is
    /// produced if the device is unavailable (or off Windows).
    pub fn connect(flags: ModalityFlags) -> Result<Self> {
        info!(flags = flags.bits(), "connecting to sensor");
        Self::with_device(NativeDevice::open(flags)?, flags)
    }

    /// Start streaming from an already-opened device. This is the entry
    /// point for scripted devices and tests.
    pub fn with_device<D>(device: D, flags: ModalityFlags) -> Result<Self>
    where
        D: Device + 'static,
    {
        let source = FrameSource::new(device, flags)?;
        let channels = Driver::spawn(source);
        Ok(Self { frames: channels.frames, flags, cancel: channels.cancel })
    }

    /// Subscribe to owned frames.
    ///
    /// The watch channel starts at `None` before the first poll completes;
    /// leading `None`s are skipped to keep the stream alive while waiting.
    /// After the first frame, `None` means the poll loop ended and the
    /// stream terminates.
    pub fn frames(&self) -> impl Stream<Item = Arc<OwnedFrame>> + 'static {
        WatchStream::new(self.frames.clone())
            .skip_while(|opt| {
                let is_none = opt.is_none();
                async move { is_none }
            })
            .take_while(|opt| {
                let is_some = opt.is_some();
                async move { is_some }
            })
            .filter_map(|opt| async move { opt })
            .boxed()
    }

    /// The most recently published frame, if any.
    pub fn current_frame(&self) -> Option<Arc<OwnedFrame>> {
        self.frames.borrow().clone()
    }

    /// The modality set this connection was opened with.
    pub fn flags(&self) -> ModalityFlags {
        self.flags
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("dropping connection");
        self.cancel.cancel();
    }
}
