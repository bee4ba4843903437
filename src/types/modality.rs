//! Modality flags selecting which sensor streams are acquired.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// One independently-trackable sensor stream.
///
/// The discriminants match the native driver's source flags. The gap between
/// `Color` and `Body` is intentional: the native vocabulary reserves the
/// intermediate bits for modalities this binding does not expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Modality {
    /// Color camera frames (height x width x 4, u8 per channel).
    Color = 1,
    /// Tracked skeletal bodies (25 joints per body).
    Body = 32,
}

impl Modality {
    /// All modalities this binding knows about.
    pub const ALL: [Modality; 2] = [Modality::Color, Modality::Body];

    /// The raw native flag bit.
    pub fn bit(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Color => write!(f, "color"),
            Modality::Body => write!(f, "body"),
        }
    }
}

/// Bit-set of active modalities for one acquisition session.
///
/// Values are combined only by bitwise union; no other bit patterns are
/// meaningful. Constructed once per session by the caller and immutable
/// thereafter.
///
/// ```rust
/// use kinect2::{Modality, ModalityFlags};
///
/// let flags = ModalityFlags::COLOR | Modality::Body;
/// assert!(flags.contains(Modality::Color));
/// assert_eq!(flags, ModalityFlags::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModalityFlags(u32);

impl ModalityFlags {
    /// No modalities selected.
    pub const NONE: ModalityFlags = ModalityFlags(0);
    /// Color stream only.
    pub const COLOR: ModalityFlags = ModalityFlags(Modality::Color as u32);
    /// Body stream only.
    pub const BODY: ModalityFlags = ModalityFlags(Modality::Body as u32);

    /// Check whether a modality's bit is set.
    pub fn contains(self, modality: Modality) -> bool {
        self.0 & modality.bit() != 0
    }

    /// True if no modality bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the modalities whose bits are set.
    pub fn iter(self) -> impl Iterator<Item = Modality> {
        Modality::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// The raw flag word passed to the native open call.
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// All known modalities (color and body), the default when the caller
/// specifies none.
impl Default for ModalityFlags {
    fn default() -> Self {
        ModalityFlags::COLOR | ModalityFlags::BODY
    }
}

impl From<Modality> for ModalityFlags {
    fn from(modality: Modality) -> Self {
        ModalityFlags(modality.bit())
    }
}

impl BitOr for ModalityFlags {
    type Output = ModalityFlags;

    fn bitor(self, rhs: ModalityFlags) -> ModalityFlags {
        ModalityFlags(self.0 | rhs.0)
    }
}

impl BitOr<Modality> for ModalityFlags {
    type Output = ModalityFlags;

    fn bitor(self, rhs: Modality) -> ModalityFlags {
        ModalityFlags(self.0 | rhs.bit())
    }
}

impl BitOr for Modality {
    type Output = ModalityFlags;

    fn bitor(self, rhs: Modality) -> ModalityFlags {
        ModalityFlags(self.bit() | rhs.bit())
    }
}

impl BitOrAssign<Modality> for ModalityFlags {
    fn bitor_assign(&mut self, rhs: Modality) {
        self.0 |= rhs.bit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn native_bit_values_are_stable() {
        // Wire-level contract with the native driver
        assert_eq!(Modality::Color.bit(), 1);
        assert_eq!(Modality::Body.bit(), 32);
    }

    #[test]
    fn default_selects_all_known_modalities() {
        let flags = ModalityFlags::default();
        assert!(flags.contains(Modality::Color));
        assert!(flags.contains(Modality::Body));
        assert_eq!(flags.bits(), 33);
    }

    #[test]
    fn single_flag_membership() {
        assert!(ModalityFlags::COLOR.contains(Modality::Color));
        assert!(!ModalityFlags::COLOR.contains(Modality::Body));
        assert!(ModalityFlags::BODY.contains(Modality::Body));
        assert!(!ModalityFlags::BODY.contains(Modality::Color));
        assert!(ModalityFlags::NONE.is_empty());
    }

    #[test]
    fn iter_yields_set_bits_only() {
        let flags = ModalityFlags::BODY;
        let set: Vec<Modality> = flags.iter().collect();
        assert_eq!(set, vec![Modality::Body]);

        let all: Vec<Modality> = ModalityFlags::default().iter().collect();
        assert_eq!(all, vec![Modality::Color, Modality::Body]);
    }

    proptest! {
        #[test]
        fn union_is_commutative_and_monotone(
            a in prop::sample::subsequence(vec![Modality::Color, Modality::Body], 0..=2),
            b in prop::sample::subsequence(vec![Modality::Color, Modality::Body], 0..=2),
        ) {
            let fa = a.iter().fold(ModalityFlags::NONE, |acc, m| acc | *m);
            let fb = b.iter().fold(ModalityFlags::NONE, |acc, m| acc | *m);

            prop_assert_eq!(fa | fb, fb | fa);

            // Every member of either side is a member of the union
            for m in Modality::ALL {
                prop_assert_eq!(
                    (fa | fb).contains(m),
                    fa.contains(m) || fb.contains(m)
                );
            }
        }
    }
}
