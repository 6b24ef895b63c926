//! Replay of recorded landmark detections.
//!
//! A recording is a JSON lines file with one object per camera frame:
//!
//! ```json
//! {"width": 640, "height": 480, "hands": [[[0.5, 0.9, 0.0], ...]], "faces": [], "poses": []}
//! ```
//!
//! Each of `hands`, `faces` and `poses` is a list of detected instances, each instance a list of
//! `[x, y, z]` landmark positions. Missing lists mean nothing was detected, and a missing frame
//! size defaults to 640x480.
//!
//! [`ReplayBackend`] implements [`Backend`] by handing out detectors that report the landmarks of
//! the current recorded frame, which allows running the full pipelines without any model.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::landmark::{Landmarks, Position};
use crate::pipeline::{Backend, Detector, FaceOptions, Frame, HandOptions, PoseOptions};

/// Landmarks detected in a single recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    pub hands: Vec<Vec<Position>>,
    pub faces: Vec<Vec<Position>>,
    pub poses: Vec<Vec<Position>>,
}

impl Default for RecordedFrame {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            hands: Vec::new(),
            faces: Vec::new(),
            poses: Vec::new(),
        }
    }
}

impl RecordedFrame {
    /// Creates a blank frame of the recorded size.
    pub fn blank_frame(&self) -> Frame {
        Frame::new(self.width, self.height)
    }
}

/// A sequence of recorded frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Loads a JSON lines recording from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open recording '{}'", path.display()))?;
        let recording = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to load recording '{}'", path.display()))?;
        log::debug!(
            "loaded {} frames from '{}'",
            recording.len(),
            path.display()
        );
        Ok(recording)
    }

    /// Parses a JSON lines recording. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut frames = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line)
                .with_context(|| format!("invalid frame on line {}", i + 1))?;
            frames.push(frame);
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }
}

/// A [`Backend`] whose detectors report the landmarks of the current recorded frame.
///
/// Clones share the current frame. Detectors truncate the recorded instances to the maximum
/// number configured in their options.
#[derive(Clone, Default)]
pub struct ReplayBackend {
    current: Arc<Mutex<RecordedFrame>>,
}

impl ReplayBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `frame` the current frame and returns a blank image of its size, to be passed to
    /// the pipelines.
    pub fn advance(&self, frame: &RecordedFrame) -> Frame {
        *lock(&self.current) = frame.clone();
        frame.blank_frame()
    }

    fn detector<F>(&self, max: usize, select: F) -> Box<dyn Detector>
    where
        F: Fn(&RecordedFrame) -> &[Vec<Position>] + Send + 'static,
    {
        let current = self.current.clone();
        Box::new(move |_: &Frame| -> anyhow::Result<Vec<Landmarks>> {
            let frame = lock(&current);
            Ok(select(&frame)
                .iter()
                .take(max)
                .map(|positions| Landmarks::from_positions(positions.iter().copied()))
                .collect())
        })
    }
}

fn lock(current: &Mutex<RecordedFrame>) -> std::sync::MutexGuard<'_, RecordedFrame> {
    current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Backend for ReplayBackend {
    fn hand_detector(&self, options: &HandOptions) -> anyhow::Result<Box<dyn Detector>> {
        Ok(self.detector(options.max_num_hands(), |frame| frame.hands.as_slice()))
    }

    fn pose_detector(&self, _: &PoseOptions) -> anyhow::Result<Box<dyn Detector>> {
        // Pose models track a single person.
        Ok(self.detector(1, |frame| frame.poses.as_slice()))
    }

    fn face_detector(&self, options: &FaceOptions) -> anyhow::Result<Box<dyn Detector>> {
        Ok(self.detector(options.max_num_faces(), |frame| frame.faces.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parse_lines() {
        let recording = Recording::from_reader(Cursor::new(
            "{\"width\": 320, \"hands\": [[[0.1, 0.2, 0.0]]]}\n\n{}\n",
        ))
        .unwrap();
        assert_eq!(recording.len(), 2);
        let first = &recording.frames()[0];
        assert_eq!((first.width, first.height), (320, 480));
        assert_eq!(first.hands, [vec![[0.1, 0.2, 0.0]]]);
        assert_eq!(recording.frames()[1], RecordedFrame::default());
    }

    #[test]
    fn invalid_line_is_reported() {
        let err = Recording::from_reader(Cursor::new("{}\n{\"hands\": 3}\n")).unwrap_err();
        assert_eq!(err.to_string(), "invalid frame on line 2");
    }

    #[test]
    fn detectors_follow_current_frame() {
        let backend = ReplayBackend::new();
        let mut options = HandOptions::default();
        options.set_max_num_hands(1).unwrap();
        let mut hands = backend.hand_detector(&options).unwrap();
        let mut faces = backend.face_detector(&FaceOptions::default()).unwrap();

        let image = backend.advance(&RecordedFrame {
            width: 4,
            height: 2,
            hands: vec![vec![[0.0; 3]; 21], vec![[1.0; 3]; 21]],
            ..Default::default()
        });
        assert_eq!(image.dimensions(), (4, 2));
        let detected = hands.detect(&image).unwrap();
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].len(), 21);
        assert!(faces.detect(&image).unwrap().is_empty());

        backend.advance(&RecordedFrame::default());
        assert!(hands.detect(&image).unwrap().is_empty());
    }
}
