//! Rule-based hand gesture classifiers.
//!
//! Every classifier looks at a single hand in a single frame. The gestures are not mutually
//! exclusive: a closed fist with the thumb pointing up is both [`Gesture::ThumbsUp`] and
//! [`Gesture::ThumbsOut`], for example. Thumbs up and thumbs down, however, never match at the same
//! time.
//!
//! Two kinds of finger tests are used:
//!
//! - The *relative* curl test works in the wrist-centered hand frame (see [`RelativePositions`]):
//!   a finger is curled when its tip is closer to the wrist than its DIP joint, measured along the
//!   wrist-to-knuckle axis. This works regardless of how the hand is rotated.
//! - The *raw* extension test works in image space and assumes an upright hand: a finger is
//!   extended when its tip is above its DIP joint in the image.

use std::fmt;

use super::{Finger, HandLandmarks, LandmarkIdx, RelativePositions};
use crate::thresholds::HandThresholds;

/// A recognized hand gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gesture {
    ThumbsUp,
    ThumbsDown,
    ThumbsOut,
    PeaceSign,
}

impl Gesture {
    pub const ALL: [Gesture; 4] = [
        Gesture::ThumbsUp,
        Gesture::ThumbsDown,
        Gesture::ThumbsOut,
        Gesture::PeaceSign,
    ];

    /// Returns the text shown on the preview overlay when the gesture is recognized.
    pub fn label(self) -> &'static str {
        match self {
            Gesture::ThumbsUp => "Thumbs Up!",
            Gesture::ThumbsDown => "Thumbs Down!",
            Gesture::ThumbsOut => "Thumbs Out!",
            Gesture::PeaceSign => "Peace Sign!",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gesture::ThumbsUp => "thumbs up",
            Gesture::ThumbsDown => "thumbs down",
            Gesture::ThumbsOut => "thumbs out",
            Gesture::PeaceSign => "peace sign",
        };
        f.write_str(name)
    }
}

/// Direction the thumb tip points to, relative to the wrist, in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbDirection {
    Up,
    Down,
}

/// Returns the vertical direction of the thumb tip relative to the wrist.
///
/// Returns [`None`] if the vertical offset does not exceed
/// [`HandThresholds::thumb_vertical_margin`].
pub fn thumb_direction(
    hand: &HandLandmarks,
    thresholds: &HandThresholds,
) -> Option<ThumbDirection> {
    let offset = hand.get(LandmarkIdx::ThumbTip).y() - hand.get(LandmarkIdx::Wrist).y();
    let margin = thresholds.thumb_vertical_margin;
    if offset < -margin {
        Some(ThumbDirection::Up)
    } else if offset > margin {
        Some(ThumbDirection::Down)
    } else {
        None
    }
}

/// Returns whether the thumb sticks out sideways from the hand.
///
/// The thumb counts as bent when its tip is further away from the wrist-to-knuckle axis than its
/// IP joint.
pub fn is_thumb_bent(rel: &RelativePositions) -> bool {
    rel[LandmarkIdx::ThumbTip].x.abs() > rel[LandmarkIdx::ThumbIp].x.abs()
}

/// Relative curl test for a single finger.
pub fn is_curled(rel: &RelativePositions, finger: Finger, thresholds: &HandThresholds) -> bool {
    rel[finger.tip()].y < rel[finger.dip()].y - thresholds.curl_margin
}

/// Counts the non-thumb fingers passing the relative curl test.
pub fn curled_fingers(rel: &RelativePositions, thresholds: &HandThresholds) -> usize {
    Finger::ALL
        .into_iter()
        .filter(|&finger| is_curled(rel, finger, thresholds))
        .count()
}

/// Raw extension test: the fingertip is above its DIP joint in the image.
pub fn is_extended_upright(
    hand: &HandLandmarks,
    finger: Finger,
    thresholds: &HandThresholds,
) -> bool {
    hand.get(finger.tip()).y() < hand.get(finger.dip()).y() - thresholds.extension_margin
}

/// Raw curl test: the fingertip is below its DIP joint in the image.
pub fn is_curled_upright(
    hand: &HandLandmarks,
    finger: Finger,
    thresholds: &HandThresholds,
) -> bool {
    hand.get(finger.tip()).y() > hand.get(finger.dip()).y() + thresholds.extension_margin
}

/// Returns whether the hand forms a closed fist with the thumb pointing up.
///
/// Returns `false` if the hand frame is degenerate.
pub fn is_thumbs_up(hand: &HandLandmarks, thresholds: &HandThresholds) -> bool {
    match hand.relative_positions() {
        Some(rel) => thumbs_up(hand, &rel, thresholds),
        None => false,
    }
}

/// Returns whether the hand forms a closed fist with the thumb pointing down.
///
/// Returns `false` if the hand frame is degenerate.
pub fn is_thumbs_down(hand: &HandLandmarks, thresholds: &HandThresholds) -> bool {
    match hand.relative_positions() {
        Some(rel) => thumbs_down(hand, &rel, thresholds),
        None => false,
    }
}

/// Returns whether the thumb is extended sideways from a loosely closed fist.
///
/// Returns `false` if the hand frame is degenerate.
pub fn is_thumbs_out(hand: &HandLandmarks, thresholds: &HandThresholds) -> bool {
    match hand.relative_positions() {
        Some(rel) => thumbs_out(&rel, thresholds),
        None => false,
    }
}

/// Returns whether the hand shows a peace sign (index and middle finger extended and spread, ring
/// and pinky curled).
///
/// This test works in image space and expects an upright hand.
pub fn is_peace_sign(hand: &HandLandmarks, thresholds: &HandThresholds) -> bool {
    let extended = is_extended_upright(hand, Finger::Index, thresholds)
        && is_extended_upright(hand, Finger::Middle, thresholds);
    let curled = is_curled_upright(hand, Finger::Ring, thresholds)
        && is_curled_upright(hand, Finger::Pinky, thresholds);

    // Two adjacent tips of a closed hand can also sit above their joints, the gap rules that out.
    let index_tip = hand.get(LandmarkIdx::IndexFingerTip);
    let middle_tip = hand.get(LandmarkIdx::MiddleFingerTip);
    let gap = (index_tip.x() - middle_tip.x()).abs();

    extended && curled && gap > thresholds.finger_separation
}

/// Runs all gesture classifiers on `hand` and returns the gestures that match, in
/// [`Gesture::ALL`] order.
///
/// The hand frame is computed only once. If it is degenerate, the hand is skipped and nothing
/// matches, not even the image-space classifiers.
pub fn classify(hand: &HandLandmarks, thresholds: &HandThresholds) -> Vec<Gesture> {
    let Some(rel) = hand.relative_positions() else {
        return Vec::new();
    };
    Gesture::ALL
        .into_iter()
        .filter(|gesture| match gesture {
            Gesture::ThumbsUp => thumbs_up(hand, &rel, thresholds),
            Gesture::ThumbsDown => thumbs_down(hand, &rel, thresholds),
            Gesture::ThumbsOut => thumbs_out(&rel, thresholds),
            Gesture::PeaceSign => is_peace_sign(hand, thresholds),
        })
        .collect()
}

fn closed_thumb_fist(rel: &RelativePositions, thresholds: &HandThresholds) -> bool {
    is_thumb_bent(rel) && curled_fingers(rel, thresholds) >= thresholds.thumbs_curl_quorum
}

fn thumbs_up(hand: &HandLandmarks, rel: &RelativePositions, thresholds: &HandThresholds) -> bool {
    closed_thumb_fist(rel, thresholds)
        && thumb_direction(hand, thresholds) == Some(ThumbDirection::Up)
}

fn thumbs_down(hand: &HandLandmarks, rel: &RelativePositions, thresholds: &HandThresholds) -> bool {
    closed_thumb_fist(rel, thresholds)
        && thumb_direction(hand, thresholds) == Some(ThumbDirection::Down)
}

fn thumbs_out(rel: &RelativePositions, thresholds: &HandThresholds) -> bool {
    is_thumb_bent(rel) && curled_fingers(rel, thresholds) >= thresholds.thumbs_out_curl_quorum
}
