//! Hand tracking pipeline.

use serde::{Deserialize, Serialize};

use super::overlay::{self, Color, Overlay};
use super::{Backend, Detector, Modality};
use crate::error::{check_count, check_f32, InvalidOption};
use crate::hand::{gesture, Gesture, HandLandmarks, LandmarkIdx, CONNECTIVITY};
use crate::landmark::Landmarks;
use crate::thresholds::HandThresholds;

/// Options passed to the hand landmark detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandOptions {
    max_num_hands: usize,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
}

impl Default for HandOptions {
    fn default() -> Self {
        Self {
            max_num_hands: Self::DEFAULT_MAX_NUM_HANDS,
            min_detection_confidence: Self::DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: Self::DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl HandOptions {
    pub const DEFAULT_MAX_NUM_HANDS: usize = 2;
    pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.7;
    pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.7;

    pub const MAX_NUM_HANDS: usize = 4;

    #[inline]
    pub fn max_num_hands(&self) -> usize {
        self.max_num_hands
    }

    #[inline]
    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    #[inline]
    pub fn min_tracking_confidence(&self) -> f32 {
        self.min_tracking_confidence
    }

    /// Sets the maximum number of hands to detect, between 1 and [`Self::MAX_NUM_HANDS`].
    pub fn set_max_num_hands(&mut self, max_num_hands: usize) -> Result<(), InvalidOption> {
        self.max_num_hands = check_count("max_num_hands", max_num_hands, 1, Self::MAX_NUM_HANDS)?;
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

    /// Checks values that bypassed the setters, e.g. when deserialized.
    pub fn validate(&self) -> Result<(), InvalidOption> {
        check_count("max_num_hands", self.max_num_hands, 1, Self::MAX_NUM_HANDS)?;
        check_f32("min_detection_confidence", self.min_detection_confidence, 0.0, 1.0)?;
        check_f32("min_tracking_confidence", self.min_tracking_confidence, 0.0, 1.0)?;
        Ok(())
    }
}

/// Hand gesture recognition on top of a hand landmark detector.
#[derive(Debug, Clone, Default)]
pub struct HandTracking {
    thresholds: HandThresholds,
}

impl HandTracking {
    pub fn new(thresholds: HandThresholds) -> Result<Self, InvalidOption> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    #[inline]
    pub fn thresholds(&self) -> &HandThresholds {
        &self.thresholds
    }

    /// Replaces the gesture thresholds. Invalid thresholds are rejected and not applied.
    pub fn set_thresholds(&mut self, thresholds: HandThresholds) -> Result<(), InvalidOption> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(())
    }
}

impl Modality for HandTracking {
    type Options = HandOptions;
    type Output = Vec<Gesture>;

    const NAME: &'static str = "hand";

    fn validate(options: &HandOptions) -> Result<(), InvalidOption> {
        options.validate()
    }

    fn create_detector(
        backend: &dyn Backend,
        options: &HandOptions,
    ) -> anyhow::Result<Box<dyn Detector>> {
        backend.hand_detector(options)
    }

    fn analyze(&self, landmarks: Landmarks, overlay: &mut Overlay) -> Option<Vec<Gesture>> {
        let count = landmarks.len();
        let Some(hand) = HandLandmarks::new(landmarks) else {
            log::trace!("skipping incomplete hand ({count} landmarks)");
            return None;
        };

        draw(&hand, overlay);
        if hand.relative_positions().is_none() {
            log::debug!("degenerate hand frame, skipping gesture classification");
        }

        let gestures = gesture::classify(&hand, &self.thresholds);
        for gesture in &gestures {
            log::trace!("recognized {gesture}");
            let (origin, color) = label_style(*gesture);
            overlay.text(origin, gesture.label(), color);
        }
        Some(gestures)
    }
}

fn label_style(gesture: Gesture) -> ([f32; 2], Color) {
    match gesture {
        Gesture::ThumbsUp => ([30.0, 50.0], overlay::GREEN),
        Gesture::PeaceSign => ([30.0, 100.0], overlay::BLUE),
        Gesture::ThumbsDown => ([30.0, 150.0], overlay::RED),
        Gesture::ThumbsOut => ([30.0, 200.0], overlay::YELLOW),
    }
}

fn draw(hand: &HandLandmarks, overlay: &mut Overlay) {
    let wrist = hand.get(LandmarkIdx::Wrist);
    overlay.line(hand.get(LandmarkIdx::MiddleFingerMcp), wrist, overlay::GREY);
    overlay.text_at(
        wrist,
        format!("{:.1} deg", hand.rotation_radians().to_degrees()),
        overlay::GREY,
    );

    for (a, b) in CONNECTIVITY {
        overlay.line(hand.get(*a), hand.get(*b), overlay::GREEN);
    }
    for landmark in hand.landmarks().iter() {
        overlay.marker(landmark, overlay::DEFAULT_MARKER_SIZE, overlay::RED);
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::overlay::Shape;
    use crate::test;

    use super::*;

    #[test]
    fn option_setters() {
        let mut options = HandOptions::default();
        assert_eq!(options.max_num_hands(), 2);
        options.set_max_num_hands(4).unwrap();
        assert_eq!(
            options.set_max_num_hands(5).unwrap_err().name(),
            "max_num_hands"
        );
        assert_eq!(options.max_num_hands(), 4);

        options.set_min_tracking_confidence(0.0).unwrap();
        assert!(options.set_min_tracking_confidence(f32::NAN).is_err());
        assert_eq!(options.min_tracking_confidence(), 0.0);
    }

    #[test]
    fn deserialized_options_are_validated() {
        let options: HandOptions = serde_json::from_str(r#"{"max_num_hands": 0}"#).unwrap();
        assert_eq!(options.min_detection_confidence(), 0.7);
        assert!(options.validate().is_err());
    }

    #[test]
    fn peace_sign_label() {
        let tracking = HandTracking::default();
        let mut overlay = Overlay::new(640, 480);
        let gestures = tracking
            .analyze(test::peace_hand(0.1).landmarks().clone(), &mut overlay)
            .unwrap();
        assert_eq!(gestures, [Gesture::PeaceSign]);
        assert!(overlay.shapes().contains(&Shape::Text {
            origin: [30.0, 100.0],
            text: "Peace Sign!".into(),
            color: overlay::BLUE,
        }));

        let markers = overlay
            .shapes()
            .iter()
            .filter(|shape| matches!(shape, Shape::Marker { .. }))
            .count();
        assert_eq!(markers, HandLandmarks::NUM_LANDMARKS);
    }

    #[test]
    fn open_hand_has_no_labels() {
        let tracking = HandTracking::default();
        let mut overlay = Overlay::new(640, 480);
        let gestures = tracking
            .analyze(test::open_hand().landmarks().clone(), &mut overlay)
            .unwrap();
        assert!(gestures.is_empty());
        // Only the rotation readout.
        assert_eq!(overlay.labels().count(), 1);
    }

    #[test]
    fn degenerate_hand_has_no_labels() {
        let mut landmarks = test::peace_hand(0.1).landmarks().clone();
        let wrist = landmarks.get(LandmarkIdx::Wrist as usize);
        landmarks.set(LandmarkIdx::MiddleFingerMcp as usize, wrist);

        let tracking = HandTracking::default();
        let mut overlay = Overlay::new(640, 480);
        let gestures = tracking.analyze(landmarks, &mut overlay).unwrap();
        assert!(gestures.is_empty());
        assert!(!overlay.labels().any(|label| label == Gesture::PeaceSign.label()));
    }

    #[test]
    fn incomplete_hand_draws_nothing() {
        let tracking = HandTracking::default();
        let mut overlay = Overlay::new(640, 480);
        assert!(tracking.analyze(Landmarks::new(20), &mut overlay).is_none());
        assert!(overlay.is_empty());
    }

    #[test]
    fn rejects_invalid_thresholds() {
        let mut tracking = HandTracking::default();
        let invalid = HandThresholds {
            thumbs_curl_quorum: 0,
            ..Default::default()
        };
        assert!(tracking.set_thresholds(invalid).is_err());
        assert_eq!(tracking.thresholds(), &HandThresholds::default());
        assert!(HandTracking::new(invalid).is_err());
    }
}
