//! Core types for sensor frame data.
//!
//! The type system maps directly onto the native driver's vocabulary:
//! - [`Modality`] / [`ModalityFlags`] select which streams a session acquires
//! - [`JointType`] is the index-stable 25-entry skeletal vocabulary
//! - [`ColorView`] and [`BodyMap`] are the live per-modality payloads
//! - [`OwnedFrame`] is the self-contained copy used by the streaming layer

mod frame;
mod joint;
mod modality;

pub use frame::{BodyMap, ColorBuffer, ColorView, JointPosition, OwnedFrame, Pose};
pub use joint::{JOINT_COUNT, JointType};
pub use modality::{Modality, ModalityFlags};
