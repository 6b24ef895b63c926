//! Face mesh landmarks and facial expression recognition.

pub mod expression;

use crate::landmark::{Landmark, Landmarks};

pub use expression::Expression;

/// The landmarks of a single face, as estimated by MediaPipe's [Face Mesh] network.
///
/// Like [`HandLandmarks`][crate::hand::HandLandmarks], this always holds the complete set of
/// landmarks.
///
/// [Face Mesh]: https://google.github.io/mediapipe/solutions/face_mesh.html
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    landmarks: Landmarks,
}

impl FaceLandmarks {
    pub const NUM_LANDMARKS: usize = 468;

    /// Wraps a landmark list produced by a face mesh detector.
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
}

/// Names of the face mesh landmarks used by the expression classifiers.
///
/// The face mesh has 468 landmarks, only a handful of which have a name here. "Left" and "right"
/// refer to the image, not to the person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    UpperLipCenter = 13,
    LowerLipCenter = 14,
    MouthLeft = 61,
    LeftCheek = 130,
    RightCheek = 243,
    MouthRight = 291,
}

/// The landmarks inspected by the smile classifier, highlighted on the preview overlay.
pub const SMILE_LANDMARKS: &[LandmarkIdx] = {
    use LandmarkIdx::*;
    &[
        MouthLeft,
        MouthRight,
        UpperLipCenter,
        LowerLipCenter,
        LeftCheek,
        RightCheek,
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_faces_only() {
        assert!(FaceLandmarks::new(Landmarks::new(467)).is_none());
        assert!(FaceLandmarks::new(Landmarks::new(478)).is_none());
        assert!(FaceLandmarks::new(Landmarks::new(468)).is_some());
    }

    #[test]
    fn indices_in_range() {
        for idx in SMILE_LANDMARKS {
            assert!((*idx as usize) < FaceLandmarks::NUM_LANDMARKS);
        }
    }
}
