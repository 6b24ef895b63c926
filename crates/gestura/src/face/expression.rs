//! Facial expression classifiers.

use std::fmt;

use super::{FaceLandmarks, LandmarkIdx};
use crate::thresholds::ExpressionThresholds;

/// A recognized facial expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expression {
    Smiling,
}

impl Expression {
    pub const ALL: [Expression; 1] = [Expression::Smiling];

    /// Returns the text shown on the preview overlay when the expression is recognized.
    pub fn label(self) -> &'static str {
        match self {
            Expression::Smiling => "Smiling!",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Smiling => f.write_str("smiling"),
        }
    }
}

/// Mouth measurements the smile test is based on.
///
/// All values are in normalized image units, with Y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthGeometry {
    /// Horizontal distance between the mouth corners.
    pub horizontal: f32,
    /// Vertical distance between the upper and lower lip centres.
    pub vertical: f32,
    /// Y coordinate of the midpoint between the mouth corners.
    pub lip_mid_y: f32,
    /// How far the upper lip centre sits above the corner midline.
    pub upper_curvature: f32,
    /// How far the upper lip centre sits above the lower lip centre.
    pub lower_curvature: f32,
    /// How far the cheeks sit above the corner midline.
    pub cheek_elevation: f32,
}

impl MouthGeometry {
    pub fn measure(face: &FaceLandmarks) -> Self {
        let left_corner = face.get(LandmarkIdx::MouthLeft);
        let right_corner = face.get(LandmarkIdx::MouthRight);
        let upper_lip = face.get(LandmarkIdx::UpperLipCenter);
        let lower_lip = face.get(LandmarkIdx::LowerLipCenter);
        let left_cheek = face.get(LandmarkIdx::LeftCheek);
        let right_cheek = face.get(LandmarkIdx::RightCheek);

        let lip_mid_y = (left_corner.y() + right_corner.y()) / 2.0;
        let cheek_y = (left_cheek.y() + right_cheek.y()) / 2.0;

        Self {
            horizontal: (left_corner.x() - right_corner.x()).abs(),
            vertical: (upper_lip.y() - lower_lip.y()).abs(),
            lip_mid_y,
            upper_curvature: lip_mid_y - upper_lip.y(),
            lower_curvature: lower_lip.y() - upper_lip.y(),
            cheek_elevation: lip_mid_y - cheek_y,
        }
    }

    /// Ratio of mouth width to lip opening.
    ///
    /// Returns [`None`] when the lips touch (zero vertical distance) or the ratio is not finite.
    pub fn smile_ratio(&self) -> Option<f32> {
        if self.vertical == 0.0 {
            return None;
        }
        let ratio = self.horizontal / self.vertical;
        ratio.is_finite().then_some(ratio)
    }

    /// Whether the upper lip centre is the topmost point of the mouth, above both the corners and
    /// the lower lip.
    pub fn is_upward_curved(&self) -> bool {
        self.upper_curvature > 0.0 && self.lower_curvature > 0.0
    }

    pub fn is_cheek_elevated(&self) -> bool {
        self.cheek_elevation > 0.0
    }

    pub fn is_mouth_closed(&self, thresholds: &ExpressionThresholds) -> bool {
        self.vertical < thresholds.closed_mouth_cutoff
    }
}

/// Returns whether the mouth geometry of `face` indicates a smile.
///
/// A smile needs a wide mouth relative to its opening, an upward-curved lip line and raised
/// cheeks. Closed mouths use the lower [`ExpressionThresholds::closed_smile_ratio`], open mouths
/// use [`ExpressionThresholds::open_smile_ratio`].
///
/// Returns `false` if the lips touch, since no ratio can be computed.
pub fn is_smiling(face: &FaceLandmarks, thresholds: &ExpressionThresholds) -> bool {
    let mouth = MouthGeometry::measure(face);
    let Some(ratio) = mouth.smile_ratio() else {
        return false;
    };

    let min_ratio = if mouth.is_mouth_closed(thresholds) {
        thresholds.closed_smile_ratio
    } else {
        thresholds.open_smile_ratio
    };

    ratio > min_ratio && mouth.is_upward_curved() && mouth.is_cheek_elevated()
}

/// Runs all expression classifiers on `face` and returns the expressions that match.
pub fn classify(face: &FaceLandmarks, thresholds: &ExpressionThresholds) -> Vec<Expression> {
    Expression::ALL
        .into_iter()
        .filter(|expression| match expression {
            Expression::Smiling => is_smiling(face, thresholds),
        })
        .collect()
}
