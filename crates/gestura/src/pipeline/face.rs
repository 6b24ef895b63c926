//! Face mesh pipeline.

use image::Rgb;
use serde::{Deserialize, Serialize};

use super::overlay::{self, Color, Overlay};
use super::{Backend, Detector, Modality};
use crate::error::{check_count, check_f32, InvalidOption};
use crate::face::{expression, Expression, FaceLandmarks, SMILE_LANDMARKS};
use crate::landmark::Landmarks;
use crate::thresholds::ExpressionThresholds;

const MESH_COLOR: Color = Rgb([10, 110, 80]);
const MESH_MARKER_SIZE: u32 = 1;

/// Options passed to the face mesh detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceOptions {
    max_num_faces: usize,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            max_num_faces: Self::DEFAULT_MAX_NUM_FACES,
            min_detection_confidence: Self::DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: Self::DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl FaceOptions {
    pub const DEFAULT_MAX_NUM_FACES: usize = 2;
    pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;
    pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.5;

    pub const MAX_NUM_FACES: usize = 4;

    #[inline]
    pub fn max_num_faces(&self) -> usize {
        self.max_num_faces
    }

    #[inline]
    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    #[inline]
    pub fn min_tracking_confidence(&self) -> f32 {
        self.min_tracking_confidence
    }

    pub fn set_max_num_faces(&mut self, max_num_faces: usize) -> Result<(), InvalidOption> {
        self.max_num_faces = check_count("max_num_faces", max_num_faces, 1, Self::MAX_NUM_FACES)?;
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
        check_count("max_num_faces", self.max_num_faces, 1, Self::MAX_NUM_FACES)?;
        check_f32("min_detection_confidence", self.min_detection_confidence, 0.0, 1.0)?;
        check_f32("min_tracking_confidence", self.min_tracking_confidence, 0.0, 1.0)?;
        Ok(())
    }
}

/// Facial expression recognition on top of a face mesh detector.
#[derive(Debug, Clone, Default)]
pub struct FaceTracking {
    thresholds: ExpressionThresholds,
}

impl FaceTracking {
    pub fn new(thresholds: ExpressionThresholds) -> Result<Self, InvalidOption> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    #[inline]
    pub fn thresholds(&self) -> &ExpressionThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(
        &mut self,
        thresholds: ExpressionThresholds,
    ) -> Result<(), InvalidOption> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(())
    }
}

impl Modality for FaceTracking {
    type Options = FaceOptions;
    type Output = Vec<Expression>;

    const NAME: &'static str = "face";

    fn validate(options: &FaceOptions) -> Result<(), InvalidOption> {
        options.validate()
    }

    fn create_detector(
        backend: &dyn Backend,
        options: &FaceOptions,
    ) -> anyhow::Result<Box<dyn Detector>> {
        backend.face_detector(options)
    }

    fn analyze(&self, landmarks: Landmarks, overlay: &mut Overlay) -> Option<Vec<Expression>> {
        let count = landmarks.len();
        let Some(face) = FaceLandmarks::new(landmarks) else {
            log::trace!("skipping incomplete face ({count} landmarks)");
            return None;
        };

        for landmark in face.landmarks().iter() {
            overlay.marker(landmark, MESH_MARKER_SIZE, MESH_COLOR);
        }
        for idx in SMILE_LANDMARKS {
            overlay.marker(face.get(*idx), overlay::DEFAULT_MARKER_SIZE, overlay::RED);
        }

        let expressions = expression::classify(&face, &self.thresholds);
        for expression in &expressions {
            log::trace!("recognized {expression}");
            overlay.text([30.0, 50.0], expression.label(), overlay::GREEN);
        }
        Some(expressions)
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::overlay::Shape;
    use crate::test;

    use super::*;

    #[test]
    fn smiling_label() {
        let tracking = FaceTracking::default();
        let mut overlay = Overlay::new(640, 480);
        let expressions = tracking
            .analyze(test::mouth(0.52, 0.4).landmarks().clone(), &mut overlay)
            .unwrap();
        assert_eq!(expressions, [Expression::Smiling]);
        assert_eq!(overlay.labels().collect::<Vec<_>>(), ["Smiling!"]);

        let debug_markers = overlay
            .shapes()
            .iter()
            .filter(|shape| matches!(shape, Shape::Marker { color, .. } if *color == overlay::RED))
            .count();
        assert_eq!(debug_markers, SMILE_LANDMARKS.len());
    }

    #[test]
    fn neutral_face() {
        let tracking = FaceTracking::default();
        let mut overlay = Overlay::new(640, 480);
        let expressions = tracking
            .analyze(test::mouth(0.52, 0.6).landmarks().clone(), &mut overlay)
            .unwrap();
        assert!(expressions.is_empty());
        assert_eq!(overlay.labels().count(), 0);
        assert!(!overlay.is_empty());
    }

    #[test]
    fn incomplete_face() {
        let tracking = FaceTracking::default();
        let mut overlay = Overlay::new(640, 480);
        assert!(tracking.analyze(Landmarks::new(478), &mut overlay).is_none());
        assert!(overlay.is_empty());
    }

    #[test]
    fn options() {
        let mut options = FaceOptions::default();
        assert_eq!(options.max_num_faces(), FaceOptions::DEFAULT_MAX_NUM_FACES);
        assert_eq!(options.min_detection_confidence(), 0.5);
        assert!(options.set_max_num_faces(0).is_err());
        assert!(options.set_min_detection_confidence(1.01).is_err());
        options.set_min_detection_confidence(1.0).unwrap();
        options.validate().unwrap();
    }
}
