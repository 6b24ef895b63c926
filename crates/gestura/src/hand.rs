//! Hand landmarks and hand gesture recognition.

pub mod frame;
pub mod gesture;

use nalgebra::{Rotation2, Vector2};

use crate::landmark::{Landmark, Landmarks};

pub use frame::RelativePositions;
pub use gesture::Gesture;

/// The 21 landmarks of a single detected hand.
///
/// A [`HandLandmarks`] value always holds a complete set. Detectors reporting partial hands are
/// filtered out by [`HandLandmarks::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    landmarks: Landmarks,
}

impl HandLandmarks {
    pub const NUM_LANDMARKS: usize = 21;

    /// Wraps a landmark list produced by a hand landmark detector.
    ///
    /// Returns [`None`] if `landmarks` does not contain exactly [`Self::NUM_LANDMARKS`] entries.
    pub fn new(landmarks: Landmarks) -> Option<Self> {
        if landmarks.len() != Self::NUM_LANDMARKS {
            return None;
        }
        Some(Self { landmarks })
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks.get(idx as usize)
    }

    /// Computes the clockwise rotation of the palm compared to an upright position.
    ///
    /// A rotation of 0° means that fingers are pointed upwards.
    pub fn rotation_radians(&self) -> f32 {
        let finger = self.get(LandmarkIdx::MiddleFingerMcp).xy();
        let wrist = self.get(LandmarkIdx::Wrist).xy();

        let rel = wrist - finger;
        Rotation2::rotation_between(&Vector2::y(), &rel).angle()
    }

    /// Computes the wrist-centered [`RelativePositions`] of this hand.
    ///
    /// Returns [`None`] when the wrist and middle finger knuckle coincide.
    pub fn relative_positions(&self) -> Option<RelativePositions> {
        RelativePositions::new(self)
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **IP**: Interphalangeal joint, the thumb's only joint between its MCP and its tip.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// All hand landmarks, in index order.
    pub const ALL: [LandmarkIdx; HandLandmarks::NUM_LANDMARKS] = {
        use LandmarkIdx::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };
}

/// The four non-thumb fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
            Finger::Pinky => LandmarkIdx::PinkyTip,
        }
    }

    pub fn dip(self) -> LandmarkIdx {
        match self {
            Finger::Index => LandmarkIdx::IndexFingerDip,
            Finger::Middle => LandmarkIdx::MiddleFingerDip,
            Finger::Ring => LandmarkIdx::RingFingerDip,
            Finger::Pinky => LandmarkIdx::PinkyDip,
        }
    }
}

/// Pairs of landmarks connected by a bone, for drawing.
pub const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::test;

    use super::*;

    #[test]
    fn rejects_partial_hands() {
        assert!(HandLandmarks::new(Landmarks::new(20)).is_none());
        assert!(HandLandmarks::new(Landmarks::new(22)).is_none());
        assert!(HandLandmarks::new(Landmarks::new(21)).is_some());
    }

    #[test]
    fn index_order() {
        for (i, idx) in LandmarkIdx::ALL.iter().enumerate() {
            assert_eq!(*idx as usize, i);
        }
        assert_eq!(LandmarkIdx::PinkyTip as usize, 20);
    }

    #[test]
    fn rotation() {
        let upright = test::open_hand();
        assert_relative_eq!(upright.rotation_radians(), 0.0, epsilon = 1e-6);

        let sideways = test::thumbs_up_hand();
        assert_relative_eq!(
            sideways.rotation_radians().abs(),
            std::f32::consts::FRAC_PI_2,
            epsilon = 1e-5
        );
    }
}
