//! Native device binding for the `kinect2` driver shim.
//!
//! The shim is a small C library exporting `init`, `release`, `update` and
//! the two callback-registration hooks. Live acquisition only exists on
//! Windows (the Kinect v2 runtime is Windows-only); other platforms get a
//! stub whose `open` fails with `UnsupportedPlatform`, mirroring how the
//! crate degrades everywhere else.

#[cfg(windows)]
mod imp {
    use std::os::raw::{c_uint, c_ulong, c_void};
    use std::ptr::NonNull;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tracing::{debug, info};

    use crate::device::{BodyRecord, BodySink, ColorImage, ColorSink, Device};
    use crate::error::{Result, SensorError};
    use crate::types::ModalityFlags;

    type RawColorCallback = unsafe extern "C" fn(ColorImage);
    type RawBodyCallback = unsafe extern "C" fn(*const BodyRecord, c_uint);

    #[link(name = "kinect2")]
    unsafe extern "C" {
        fn init(flags: c_ulong) -> *mut c_void;
        fn release(handle: *mut c_void);
        fn update(handle: *mut c_void) -> *mut c_void;
        fn color_callback(handle: *mut c_void, callback: RawColorCallback);
        fn body_callback(handle: *mut c_void, callback: RawBodyCallback);
    }

    // The native callbacks carry no user-data pointer, so dispatch has to go
    // through process-level sink slots. SESSION_OPEN keeps the slots
    // unambiguous by limiting the binding to one live session per process;
    // the session itself stays an explicitly owned value.
    static SESSION_OPEN: AtomicBool = AtomicBool::new(false);
    static COLOR_SINK: Mutex<Option<ColorSink>> = Mutex::new(None);
    static BODY_SINK: Mutex<Option<BodySink>> = Mutex::new(None);

    unsafe extern "C" fn color_trampoline(image: ColorImage) {
        let mut slot = COLOR_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sink) = slot.as_mut() {
            sink(image);
        }
    }

    unsafe extern "C" fn body_trampoline(records: *const BodyRecord, count: c_uint) {
        let records = if records.is_null() {
            &[]
        } else {
            // Safety: the driver hands a contiguous array of `count` records
            // valid for the duration of the callback
            unsafe { std::slice::from_raw_parts(records, count as usize) }
        };
        let mut slot = BODY_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sink) = slot.as_mut() {
            sink(records);
        }
    }

    /// One open native sensor session.
    ///
    /// The handle is non-null for the whole lifetime of the value and is
    /// released exactly once on drop; every native call for the session goes
    /// through it.
    pub struct NativeDevice {
        handle: NonNull<c_void>,
    }

    // Safety: the shim serializes internally on its own capture thread; the
    // handle is only ever used from one thread at a time because every
    // trait method takes &mut self.
    unsafe impl Send for NativeDevice {}

    impl NativeDevice {
        /// Open a native session for the given modality flags.
        ///
        /// Fails with [`SensorError::DeviceUnavailable`] if no sensor is
        /// present, the driver refuses to initialize, or another session is
        /// already open in this process.
        pub fn open(flags: ModalityFlags) -> Result<Self> {
            if SESSION_OPEN.swap(true, Ordering::SeqCst) {
                return Err(SensorError::device_unavailable(
                    "a sensor session is already open in this process",
                ));
            }

            // Safety: init has no preconditions; a null return means failure
            let raw = unsafe { init(flags.bits() as c_ulong) };
            match NonNull::new(raw) {
                Some(handle) => {
                    info!(flags = flags.bits(), "sensor session opened");
                    Ok(Self { handle })
                }
                None => {
                    SESSION_OPEN.store(false, Ordering::SeqCst);
                    Err(SensorError::device_unavailable("no kinect sensor found"))
                }
            }
        }
    }

    impl Device for NativeDevice {
        fn update(&mut self) -> Result<()> {
            // The native return value is unused by contract. Callbacks fired
            // by this call settle before it returns.
            unsafe { update(self.handle.as_ptr()) };
            Ok(())
        }

        fn register_color(&mut self, sink: ColorSink) -> Result<()> {
            let mut slot = COLOR_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = Some(sink);
            drop(slot);
            // Safety: handle is live; the trampoline outlives the session
            unsafe { color_callback(self.handle.as_ptr(), color_trampoline) };
            debug!("color callback registered");
            Ok(())
        }

        fn register_body(&mut self, sink: BodySink) -> Result<()> {
            let mut slot = BODY_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = Some(sink);
            drop(slot);
            // Safety: handle is live; the trampoline outlives the session
            unsafe { body_callback(self.handle.as_ptr(), body_trampoline) };
            debug!("body callback registered");
            Ok(())
        }
    }

    impl Drop for NativeDevice {
        fn drop(&mut self) {
            // Safety: the handle is live and released exactly here. Sinks are
            // cleared only after release returns, so no in-flight callback
            // can observe an empty slot.
            unsafe { release(self.handle.as_ptr()) };
            *COLOR_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
            *BODY_SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
            SESSION_OPEN.store(false, Ordering::SeqCst);
            debug!("sensor session released");
        }
    }
}

#[cfg(windows)]
pub use imp::NativeDevice;

// Non-Windows stub: uninhabited, so the Device impl is vacuous.
#[cfg(not(windows))]
#[derive(Debug)]
pub enum NativeDevice {}

#[cfg(not(windows))]
impl NativeDevice {
    /// Attempt to open the native sensor on a non-Windows platform.
    ///
    /// Always fails: the Kinect v2 runtime only exists on Windows. Use a
    /// [`ScriptedDevice`](super::ScriptedDevice) for cross-platform work.
    pub fn open(_flags: crate::types::ModalityFlags) -> crate::Result<Self> {
        Err(crate::SensorError::unsupported_platform("Live sensor acquisition", "Windows"))
    }
}

#[cfg(not(windows))]
impl crate::device::Device for NativeDevice {
    fn update(&mut self) -> crate::Result<()> {
        match *self {}
    }

    fn register_color(&mut self, _sink: crate::device::ColorSink) -> crate::Result<()> {
        match *self {}
    }

    fn register_body(&mut self, _sink: crate::device::BodySink) -> crate::Result<()> {
        match *self {}
    }
}
