//! Body pose pipeline. Poses are only drawn, not classified.

use serde::{Deserialize, Serialize};

use super::overlay::{self, Overlay};
use super::{Backend, Detector, Modality};
use crate::body::{PoseLandmarks, CONNECTIVITY};
use crate::error::{check_count, check_f32, InvalidOption};
use crate::landmark::Landmarks;

const POSE_MARKER_SIZE: u32 = 9;

/// Options passed to the pose landmark detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseOptions {
    model_complexity: u8,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self {
            model_complexity: Self::DEFAULT_MODEL_COMPLEXITY,
            min_detection_confidence: Self::DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: Self::DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl PoseOptions {
    pub const DEFAULT_MODEL_COMPLEXITY: u8 = 1;
    pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.3;
    pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.3;

    /// Highest supported model complexity. 0 selects the fastest model.
    pub const MAX_MODEL_COMPLEXITY: u8 = 2;

    #[inline]
    pub fn model_complexity(&self) -> u8 {
        self.model_complexity
    }

    #[inline]
    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    #[inline]
    pub fn min_tracking_confidence(&self) -> f32 {
        self.min_tracking_confidence
    }

    pub fn set_model_complexity(&mut self, complexity: u8) -> Result<(), InvalidOption> {
        check_count(
            "model_complexity",
            complexity.into(),
            0,
            Self::MAX_MODEL_COMPLEXITY.into(),
        )?;
        self.model_complexity = complexity;
        Ok(())
    }

    pub fn set_min_detection_confidence(&mut self, confidence: f32) -> Result<(), InvalidOption> {
        self.min_detection_confidence =
            check_f32("min_detection_confidence", confidence, 0.0, 1.0)?;
        Ok(())
    }

    pub fn set_min_tracking_confidence(&mut self, confidence: f32) -> Result<(), InvalidOption> {
        self.min_tracking_confidence = check_f32("min_tracking_confidence", confidence, 0.0, 1.0)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InvalidOption> {
        check_count(
            "model_complexity",
            self.model_complexity.into(),
            0,
            Self::MAX_MODEL_COMPLEXITY.into(),
        )?;
        check_f32("min_detection_confidence", self.min_detection_confidence, 0.0, 1.0)?;
        check_f32("min_tracking_confidence", self.min_tracking_confidence, 0.0, 1.0)?;
        Ok(())
    }
}

/// Draws body poses reported by a pose landmark detector.
#[derive(Debug, Clone, Default)]
pub struct BodyTracking;

impl Modality for BodyTracking {
    type Options = PoseOptions;
    type Output = PoseLandmarks;

    const NAME: &'static str = "body";

    fn validate(options: &PoseOptions) -> Result<(), InvalidOption> {
        options.validate()
    }

    fn create_detector(
        backend: &dyn Backend,
        options: &PoseOptions,
    ) -> anyhow::Result<Box<dyn Detector>> {
        backend.pose_detector(options)
    }

    fn analyze(&self, landmarks: Landmarks, overlay: &mut Overlay) -> Option<PoseLandmarks> {
        let count = landmarks.len();
        let Some(pose) = PoseLandmarks::new(landmarks) else {
            log::trace!("skipping incomplete pose ({count} landmarks)");
            return None;
        };

        for (a, b) in CONNECTIVITY {
            overlay.line(pose.get(*a), pose.get(*b), overlay::GREEN);
        }
        for landmark in pose.landmarks().iter() {
            overlay.marker(landmark, POSE_MARKER_SIZE, overlay::RED);
        }
        Some(pose)
    }
}
