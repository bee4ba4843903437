//! Skeletal joint vocabulary.
//!
//! The native body tracker reports 25 joints per tracked body in a fixed
//! anatomical order. This enum is the index-stable lookup table for
//! interpreting the joint-position array in a [`Pose`](crate::Pose); the
//! acquisition layer itself never consults it.

use serde::{Deserialize, Serialize};

/// Number of joints in a body record.
pub const JOINT_COUNT: usize = 25;

/// One of the 25 anatomically named joints, numbered 0-24 in the native
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum JointType {
    SpineBase = 0,
    SpineMid = 1,
    Neck = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
    SpineShoulder = 20,
    HandTipLeft = 21,
    ThumbLeft = 22,
    HandTipRight = 23,
    ThumbRight = 24,
}

impl JointType {
    /// All joints in index order.
    pub const ALL: [JointType; JOINT_COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];

    /// Position of this joint in a body record's joint array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a joint by its native index.
    pub fn from_index(index: usize) -> Option<JointType> {
        JointType::ALL.get(index).copied()
    }

    /// Snake-case name matching the native vocabulary.
    pub fn name(self) -> &'static str {
        match self {
            JointType::SpineBase => "spine_base",
            JointType::SpineMid => "spine_mid",
            JointType::Neck => "neck",
            JointType::Head => "head",
            JointType::ShoulderLeft => "shoulder_left",
            JointType::ElbowLeft => "elbow_left",
            JointType::WristLeft => "wrist_left",
            JointType::HandLeft => "hand_left",
            JointType::ShoulderRight => "shoulder_right",
            JointType::ElbowRight => "elbow_right",
            JointType::WristRight => "wrist_right",
            JointType::HandRight => "hand_right",
            JointType::HipLeft => "hip_left",
            JointType::KneeLeft => "knee_left",
            JointType::AnkleLeft => "ankle_left",
            JointType::FootLeft => "foot_left",
            JointType::HipRight => "hip_right",
            JointType::KneeRight => "knee_right",
            JointType::AnkleRight => "ankle_right",
            JointType::FootRight => "foot_right",
            JointType::SpineShoulder => "spine_shoulder",
            JointType::HandTipLeft => "hand_tip_left",
            JointType::ThumbLeft => "thumb_left",
            JointType::HandTipRight => "hand_tip_right",
            JointType::ThumbRight => "thumb_right",
        }
    }
}
