//! Wrist-centered hand coordinate frame.
//!
//! Landmark positions reported by the detector are in image space, so a finger pointing "up" in
//! the image has a different meaning depending on how the hand is rotated in the camera plane.
//! [`RelativePositions`] re-expresses every landmark relative to the wrist, in a frame whose Y
//! axis points from the wrist towards the middle finger's knuckle (MCP). Thresholds applied in
//! this frame are unaffected by in-plane rotation of the hand.

use std::ops::Index;

use nalgebra::{Matrix2, Vector2};

use super::{HandLandmarks, LandmarkIdx};

/// Landmark positions of one hand, expressed in the wrist-centered hand frame.
///
/// - The origin is the wrist.
/// - The Y axis is the unit vector from the wrist to the middle finger MCP.
/// - The X axis is perpendicular to the Y axis: `x = (-y.y, y.x)`.
///
/// Distances are preserved, so values are still in units of the (normalized) input image.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePositions {
    positions: [Vector2<f32>; HandLandmarks::NUM_LANDMARKS],
}

impl RelativePositions {
    /// Computes the relative positions of all landmarks of `hand`.
    ///
    /// Returns [`None`] if the hand frame is undefined, which happens when the wrist and middle
    /// finger MCP landmarks coincide (or are not finite). Gesture classification should be skipped
    /// for such a hand.
    pub fn new(hand: &HandLandmarks) -> Option<Self> {
        let wrist = hand.get(LandmarkIdx::Wrist).xy();
        let mcp = hand.get(LandmarkIdx::MiddleFingerMcp).xy();

        let axis = mcp - wrist;
        let len = axis.norm();
        if !len.is_finite() || len <= f32::EPSILON {
            return None;
        }

        let y_axis = axis / len;
        let x_axis = Vector2::new(-y_axis.y, y_axis.x);

        // The basis is orthonormal, so its inverse is its transpose.
        let to_hand = Matrix2::from_columns(&[x_axis, y_axis]).transpose();

        let positions = LandmarkIdx::ALL.map(|idx| to_hand * (hand.get(idx).xy() - wrist));
        Some(Self { positions })
    }

    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Vector2<f32> {
        self.positions[idx as usize]
    }

    /// Returns the number of entries, which is always [`HandLandmarks::NUM_LANDMARKS`].
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkIdx, Vector2<f32>)> + '_ {
        LandmarkIdx::ALL.into_iter().zip(self.positions.iter().copied())
    }
}

impl Index<LandmarkIdx> for RelativePositions {
    type Output = Vector2<f32>;

    #[inline]
    fn index(&self, idx: LandmarkIdx) -> &Vector2<f32> {
        &self.positions[idx as usize]
    }
}
