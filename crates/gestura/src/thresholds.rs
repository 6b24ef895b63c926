//! Tunable constants of the gesture and expression classifiers.
//!
//! The default values were picked empirically for a front-facing webcam. They are not derived
//! from anything and may need adjusting for other camera setups.

use serde::{Deserialize, Serialize};

use crate::error::{check_count, check_f32, InvalidOption};

/// Number of non-thumb fingers on a hand.
pub const NUM_FINGERS: usize = 4;

/// Thresholds used by the hand gesture classifiers in [`crate::hand::gesture`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandThresholds {
    /// Minimum horizontal distance between the index and middle finger tips for a peace sign,
    /// relative to the image width.
    pub finger_separation: f32,
    /// A finger only counts as curled if its tip is closer to the wrist than its DIP joint by more
    /// than this amount, measured along the wrist-to-knuckle axis of the hand.
    pub curl_margin: f32,
    /// Minimum vertical image-space distance between a fingertip and its DIP joint for the finger
    /// to count as extended (tip above joint) or curled (tip below joint).
    pub extension_margin: f32,
    /// Minimum vertical image-space distance between the thumb tip and the wrist that decides
    /// between thumbs up (tip above the wrist) and thumbs down (tip below the wrist).
    pub thumb_vertical_margin: f32,
    /// Number of curled fingers required for thumbs up and thumbs down.
    pub thumbs_curl_quorum: usize,
    /// Number of curled fingers required for thumbs out.
    pub thumbs_out_curl_quorum: usize,
}

impl HandThresholds {
    pub const DEFAULT_FINGER_SEPARATION: f32 = 0.05;
    pub const DEFAULT_CURL_MARGIN: f32 = 0.0;
    pub const DEFAULT_EXTENSION_MARGIN: f32 = 0.0;
    pub const DEFAULT_THUMB_VERTICAL_MARGIN: f32 = 0.0;
    pub const DEFAULT_THUMBS_CURL_QUORUM: usize = NUM_FINGERS;
    pub const DEFAULT_THUMBS_OUT_CURL_QUORUM: usize = 1;

    /// Checks that every threshold is within its supported range.
    pub fn validate(&self) -> Result<(), InvalidOption> {
        check_f32("finger_separation", self.finger_separation, 0.0, 1.0)?;
        check_f32("curl_margin", self.curl_margin, 0.0, 1.0)?;
        check_f32("extension_margin", self.extension_margin, 0.0, 1.0)?;
        check_f32("thumb_vertical_margin", self.thumb_vertical_margin, 0.0, 1.0)?;
        check_count("thumbs_curl_quorum", self.thumbs_curl_quorum, 1, NUM_FINGERS)?;
        check_count(
            "thumbs_out_curl_quorum",
            self.thumbs_out_curl_quorum,
            1,
            NUM_FINGERS,
        )?;
        Ok(())
    }
}

impl Default for HandThresholds {
    fn default() -> Self {
        Self {
            finger_separation: Self::DEFAULT_FINGER_SEPARATION,
            curl_margin: Self::DEFAULT_CURL_MARGIN,
            extension_margin: Self::DEFAULT_EXTENSION_MARGIN,
            thumb_vertical_margin: Self::DEFAULT_THUMB_VERTICAL_MARGIN,
            thumbs_curl_quorum: Self::DEFAULT_THUMBS_CURL_QUORUM,
            thumbs_out_curl_quorum: Self::DEFAULT_THUMBS_OUT_CURL_QUORUM,
        }
    }
}

/// Thresholds used by the facial expression classifiers in [`crate::face::expression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionThresholds {
    /// Lip opening (upper to lower lip centre, relative to the image height) below which the mouth
    /// is considered closed.
    pub closed_mouth_cutoff: f32,
    /// Minimum mouth width to lip opening ratio for a closed-mouth smile.
    pub closed_smile_ratio: f32,
    /// Minimum mouth width to lip opening ratio for an open-mouth smile.
    pub open_smile_ratio: f32,
}

impl ExpressionThresholds {
    pub const DEFAULT_CLOSED_MOUTH_CUTOFF: f32 = 0.02;
    pub const DEFAULT_CLOSED_SMILE_RATIO: f32 = 1.3;
    pub const DEFAULT_OPEN_SMILE_RATIO: f32 = 1.5;

    /// Checks that every threshold is within its supported range.
    pub fn validate(&self) -> Result<(), InvalidOption> {
        check_f32("closed_mouth_cutoff", self.closed_mouth_cutoff, 0.0, 1.0)?;
        check_f32(
            "closed_smile_ratio",
            self.closed_smile_ratio,
            f32::MIN_POSITIVE,
            f32::MAX,
        )?;
        check_f32(
            "open_smile_ratio",
            self.open_smile_ratio,
            f32::MIN_POSITIVE,
            f32::MAX,
        )?;
        Ok(())
    }
}

impl Default for ExpressionThresholds {
    fn default() -> Self {
        Self {
            closed_mouth_cutoff: Self::DEFAULT_CLOSED_MOUTH_CUTOFF,
            closed_smile_ratio: Self::DEFAULT_CLOSED_SMILE_RATIO,
            open_smile_ratio: Self::DEFAULT_OPEN_SMILE_RATIO,
        }
    }
}
