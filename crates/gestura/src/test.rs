//! Synthetic landmark fixtures shared by the unit tests.

use crate::face::FaceLandmarks;
use crate::hand::HandLandmarks;
use crate::landmark::{Landmark, Landmarks};

fn hand(points: [[f32; 2]; HandLandmarks::NUM_LANDMARKS]) -> HandLandmarks {
    HandLandmarks::new(Landmarks::from_positions(
        points.into_iter().map(|[x, y]| [x, y, 0.0]),
    ))
    .unwrap()
}

/// An upright open hand with all fingers extended and the thumb splayed to the left.
pub fn open_hand() -> HandLandmarks {
    hand([
        [0.5, 0.9],
        // Thumb
        [0.42, 0.85],
        [0.37, 0.78],
        [0.34, 0.72],
        [0.32, 0.66],
        // Index
        [0.43, 0.70],
        [0.42, 0.60],
        [0.415, 0.54],
        [0.41, 0.49],
        // Middle
        [0.5, 0.7],
        [0.5, 0.58],
        [0.5, 0.51],
        [0.5, 0.45],
        // Ring
        [0.56, 0.71],
        [0.57, 0.61],
        [0.575, 0.55],
        [0.58, 0.50],
        // Pinky
        [0.61, 0.74],
        [0.63, 0.66],
        [0.64, 0.61],
        [0.65, 0.57],
    ])
}

/// A closed fist seen from the side, knuckles pointing right, thumb pointing up.
pub fn thumbs_up_hand() -> HandLandmarks {
    hand([
        [0.5, 0.6],
        // Thumb
        [0.53, 0.55],
        [0.56, 0.50],
        [0.57, 0.45],
        [0.57, 0.40],
        // Index
        [0.6, 0.55],
        [0.66, 0.55],
        [0.65, 0.59],
        [0.62, 0.59],
        // Middle
        [0.6, 0.6],
        [0.66, 0.6],
        [0.65, 0.63],
        [0.62, 0.63],
        // Ring
        [0.6, 0.65],
        [0.66, 0.65],
        [0.65, 0.68],
        [0.62, 0.68],
        // Pinky
        [0.59, 0.69],
        [0.645, 0.70],
        [0.635, 0.72],
        [0.61, 0.72],
    ])
}

/// [`thumbs_up_hand`] mirrored vertically around the wrist, so the thumb points down.
pub fn thumbs_down_hand() -> HandLandmarks {
    let mut landmarks = thumbs_up_hand().landmarks().clone();
    landmarks.map_positions(|[x, y, z]| [x, 1.2 - y, z]);
    HandLandmarks::new(landmarks).unwrap()
}

/// An upright peace sign.
///
/// Index and middle finger tips are at `y = 0.3`, ring and pinky tips at `y = 0.6`, and all four
/// DIP joints at `y = 0.5`. The index and middle finger tips are `separation` apart horizontally.
pub fn peace_hand(separation: f32) -> HandLandmarks {
    hand([
        [0.5, 0.9],
        // Thumb, folded over the palm
        [0.43, 0.85],
        [0.42, 0.78],
        [0.45, 0.72],
        [0.49, 0.70],
        // Index
        [0.44, 0.7],
        [0.44, 0.6],
        [0.45, 0.5],
        [0.5 - separation / 2.0, 0.3],
        // Middle
        [0.5, 0.7],
        [0.5, 0.6],
        [0.52, 0.5],
        [0.5 + separation / 2.0, 0.3],
        // Ring
        [0.56, 0.71],
        [0.57, 0.62],
        [0.57, 0.5],
        [0.57, 0.6],
        // Pinky
        [0.61, 0.74],
        [0.63, 0.65],
        [0.63, 0.5],
        [0.62, 0.6],
    ])
}

/// A face mesh where only the landmarks used by the smile test are placed.
///
/// Mouth corners are at `(0.3, 0.5)` and `(0.7, 0.5)`, the upper lip centre at `(0.5, 0.48)`, the
/// lower lip centre at `(0.5, lower_lip_y)`, and the cheeks at `y = cheek_y`.
pub fn mouth(lower_lip_y: f32, cheek_y: f32) -> FaceLandmarks {
    use crate::face::LandmarkIdx::*;

    let mut landmarks = Landmarks::new(FaceLandmarks::NUM_LANDMARKS);
    for (idx, [x, y]) in [
        (MouthLeft, [0.3, 0.5]),
        (MouthRight, [0.7, 0.5]),
        (UpperLipCenter, [0.5, 0.48]),
        (LowerLipCenter, [0.5, lower_lip_y]),
        (LeftCheek, [0.35, cheek_y]),
        (RightCheek, [0.65, cheek_y]),
    ] {
        landmarks.set(idx as usize, Landmark::new([x, y, 0.0]));
    }
    FaceLandmarks::new(landmarks).unwrap()
}
