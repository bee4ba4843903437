//! Driver: background poll loop for async consumers.
//!
//! The driver moves a [`FrameSource`] onto a blocking task (update blocks on
//! device I/O) and publishes owned frame copies into a `watch` channel. The
//! copy is explicit and happens inside the poll loop, within the validity
//! window of the live snapshot; downstream consumers only ever see
//! self-contained [`OwnedFrame`]s.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::device::Device;
use crate::source::FrameSource;
use crate::types::OwnedFrame;

/// Result of spawning the driver task.
pub struct DriverChannels {
    /// Receiver for owned frames. Starts at `None`; returns to `None` when
    /// the loop ends.
    pub frames: watch::Receiver<Option<Arc<OwnedFrame>>>,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
}

/// Spawns and manages the frame polling task.
pub struct Driver;

impl Driver {
    /// Spawn the poll loop for the given source.
    ///
    /// Must be called within a tokio runtime. The task owns the source, so
    /// the device is released when the loop ends, on every path:
    /// cancellation, consumer drop, or native failure.
    pub fn spawn<D>(source: FrameSource<D>) -> DriverChannels
    where
        D: Device + 'static,
    {
        let (frame_tx, frame_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_poll = cancel.clone();

        tokio::task::spawn_blocking(move || {
            Self::poll_loop(source, frame_tx, cancel_poll);
        });

        DriverChannels { frames: frame_rx, cancel }
    }

    /// Poll loop: update, copy, publish, until cancelled or failed.
    ///
    /// Cancellation is checked between polls; an in-flight update cannot be
    /// interrupted, matching the native contract (the only exit is to stop
    /// polling after the current step completes).
    fn poll_loop<D>(
        mut source: FrameSource<D>,
        frame_tx: watch::Sender<Option<Arc<OwnedFrame>>>,
        cancel: CancellationToken,
    ) where
        D: Device,
    {
        info!("frame poll loop started");

        while !cancel.is_cancelled() {
            match source.poll_owned() {
                Ok(frame) => {
                    if frame_tx.send(Some(Arc::new(frame))).is_err() {
                        debug!("frame receiver dropped, shutting down");
                        break;
                    }
                }
                Err(e) => {
                    // No retry at this layer: any native failure ends the
                    // session.
                    error!("native update failed, ending session: {e}");
                    let _ = frame_tx.send(None);
                    break;
                }
            }
        }

        info!(frames = source.ticks(), "frame poll loop ended");
        // Source drops here; the device is released.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{ScriptedDevice, ScriptedEvent};
    use crate::types::ModalityFlags;

    #[tokio::test(flavor = "multi_thread")]
    async fn publishes_frames_until_fault_then_ends_with_none() {
        let device = ScriptedDevice::new()
            .with_pacing(std::time::Duration::from_millis(10))
            .with_update(vec![ScriptedEvent::Color {
                width: 1,
                height: 1,
                pixels: vec![9; 4],
            }])
            .with_update(vec![ScriptedEvent::Fault("update")]);
        let state = device.state();
        let source = FrameSource::new(device, ModalityFlags::COLOR).unwrap();

        let mut channels = Driver::spawn(source);

        // First change: the frame from step one
        channels.frames.changed().await.unwrap();
        let frame = channels.frames.borrow().clone().expect("first frame");
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.color.as_ref().unwrap().pixels(), &[9, 9, 9, 9]);

        // Second change: None marks the end after the fault
        channels.frames.changed().await.unwrap();
        assert!(channels.frames.borrow().is_none());

        // The loop owns the source; once it ends the device is released
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while !state.released() {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("device should be released after loop ends");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_stops_the_loop() {
        // Endless empty script: the loop would run forever without cancel
        let device = ScriptedDevice::new().with_pacing(std::time::Duration::from_millis(5));
        let state = device.state();
        let source = FrameSource::new(device, ModalityFlags::default()).unwrap();

        let channels = Driver::spawn(source);
        channels.cancel.cancel();

        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while !state.released() {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("cancel should end the loop and release the device");
    }
}
