//! Concrete device implementations.
//!
//! [`NativeDevice`] binds the real driver shim (Windows only);
//! [`ScriptedDevice`] replays a caller-supplied callback schedule on any
//! platform.

mod native;
mod scripted;

pub use native::NativeDevice;
pub use scripted::{ScriptedDevice, ScriptedEvent, ScriptedState};
