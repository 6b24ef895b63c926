use std::{fmt, str::FromStr, sync::Arc};

use anyhow::bail;

use super::{
    Backend, BodyTracking, FaceTracking, Frame, HandTracking, Overlay, Pipeline, PipelineError,
};
use crate::body::PoseLandmarks;
use crate::config::Config;
use crate::face::Expression;
use crate::hand::Gesture;
use crate::timer::Timer;

/// Selects one of the tracking pipelines of a [`Trackers`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracker {
    Hand,
    Body,
    Face,
}

impl Tracker {
    /// All trackers, in processing order.
    pub const ALL: [Tracker; 3] = [Tracker::Hand, Tracker::Body, Tracker::Face];
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tracker::Hand => "hand",
            Tracker::Body => "body",
            Tracker::Face => "face",
        })
    }
}

impl FromStr for Tracker {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "hand" => Tracker::Hand,
            "body" => Tracker::Body,
            "face" => Tracker::Face,
            _ => bail!("unknown tracker '{s}' (expected 'hand', 'body' or 'face')"),
        })
    }
}

/// Everything recognized in one frame by a [`Trackers`] set.
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub overlay: Overlay,
    /// Gestures of each classified hand.
    pub gestures: Vec<Vec<Gesture>>,
    /// Expressions of each classified face.
    pub expressions: Vec<Vec<Expression>>,
    pub poses: Vec<PoseLandmarks>,
}

impl FrameResult {
    /// Returns the overlay labels of all recognized gestures and expressions.
    pub fn recognized(&self) -> impl Iterator<Item = &'static str> + '_ {
        let gestures = self.gestures.iter().flatten().map(|g| g.label());
        let expressions = self.expressions.iter().flatten().map(|e| e.label());
        gestures.chain(expressions)
    }
}

/// The hand, body and face pipelines, each of which can be switched on and off.
pub struct Trackers {
    hand: Pipeline<HandTracking>,
    body: Pipeline<BodyTracking>,
    face: Pipeline<FaceTracking>,
    hand_enabled: bool,
    body_enabled: bool,
    face_enabled: bool,
}

impl Trackers {
    /// Creates the pipelines described by `config`. No detector is created until the first frame
    /// is processed.
    pub fn new(backend: Arc<dyn Backend>, config: &Config) -> Result<Self, PipelineError> {
        config.validate()?;
        let enabled = config.tracker_pipelines;
        Ok(Self {
            hand: Pipeline::new(
                backend.clone(),
                HandTracking::new(config.gestures)?,
                config.hand_tracker_pipeline,
            )?,
            body: Pipeline::new(
                backend.clone(),
                BodyTracking,
                config.body_tracker_pipeline,
            )?,
            face: Pipeline::new(
                backend,
                FaceTracking::new(config.expressions)?,
                config.face_tracker_pipeline,
            )?,
            hand_enabled: enabled.hand,
            body_enabled: enabled.body,
            face_enabled: enabled.face,
        })
    }

    /// Applies a new configuration.
    ///
    /// The whole configuration is validated before anything changes. Active detectors whose
    /// options changed are rebuilt.
    ///
    /// A detector that fails to rebuild does not stop the update: the remaining options and the
    /// enable flags are still applied, and the first rebuild error is returned. Such a pipeline
    /// stays configured and retries on its next frame.
    pub fn configure(&mut self, config: &Config) -> Result<(), PipelineError> {
        config.validate()?;

        self.hand.modality_mut().set_thresholds(config.gestures)?;
        self.face.modality_mut().set_thresholds(config.expressions)?;

        let mut rebuilt = Ok(());
        if *self.hand.options() != config.hand_tracker_pipeline {
            rebuilt = rebuilt.and(self.hand.set_options(config.hand_tracker_pipeline));
        }
        if *self.body.options() != config.body_tracker_pipeline {
            rebuilt = rebuilt.and(self.body.set_options(config.body_tracker_pipeline));
        }
        if *self.face.options() != config.face_tracker_pipeline {
            rebuilt = rebuilt.and(self.face.set_options(config.face_tracker_pipeline));
        }

        let enabled = config.tracker_pipelines;
        self.set_enabled(Tracker::Hand, enabled.hand);
        self.set_enabled(Tracker::Body, enabled.body);
        self.set_enabled(Tracker::Face, enabled.face);
        rebuilt
    }

    pub fn hand(&self) -> &Pipeline<HandTracking> {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Pipeline<HandTracking> {
        &mut self.hand
    }

    pub fn body(&self) -> &Pipeline<BodyTracking> {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Pipeline<BodyTracking> {
        &mut self.body
    }

    pub fn face(&self) -> &Pipeline<FaceTracking> {
        &self.face
    }

    pub fn face_mut(&mut self) -> &mut Pipeline<FaceTracking> {
        &mut self.face
    }

    pub fn is_enabled(&self, tracker: Tracker) -> bool {
        match tracker {
            Tracker::Hand => self.hand_enabled,
            Tracker::Body => self.body_enabled,
            Tracker::Face => self.face_enabled,
        }
    }

    /// Enables or disables a pipeline. Disabling a pipeline drops its detector.
    pub fn set_enabled(&mut self, tracker: Tracker, enabled: bool) {
        if self.is_enabled(tracker) != enabled {
            log::debug!(
                "{} tracking {}",
                tracker,
                if enabled { "enabled" } else { "disabled" }
            );
        }
        match tracker {
            Tracker::Hand => self.hand_enabled = enabled,
            Tracker::Body => self.body_enabled = enabled,
            Tracker::Face => self.face_enabled = enabled,
        }
        if !enabled {
            match tracker {
                Tracker::Hand => self.hand.deactivate(),
                Tracker::Body => self.body.deactivate(),
                Tracker::Face => self.face.deactivate(),
            }
        }
    }

    /// Runs all enabled pipelines on `frame`, in hand, body, face order.
    ///
    /// All pipelines draw onto the same overlay. The first pipeline error aborts processing of
    /// the frame.
    pub fn process_frame(&mut self, frame: &Frame) -> anyhow::Result<FrameResult> {
        let mut overlay = Overlay::for_frame(frame);
        let gestures = if self.hand_enabled {
            self.hand.process_frame(frame, &mut overlay)?
        } else {
            Vec::new()
        };
        let poses = if self.body_enabled {
            self.body.process_frame(frame, &mut overlay)?
        } else {
            Vec::new()
        };
        let expressions = if self.face_enabled {
            self.face.process_frame(frame, &mut overlay)?
        } else {
            Vec::new()
        };

        Ok(FrameResult {
            overlay,
            gestures,
            expressions,
            poses,
        })
    }

    /// Releases all detectors. Pipelines are re-activated by the next processed frame.
    pub fn stop(&mut self) {
        self.hand.deactivate();
        self.body.deactivate();
        self.face.deactivate();
    }

    /// Returns the profiling timers of all pipelines.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        self.hand
            .timers()
            .chain(self.body.timers())
            .chain(self.face.timers())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use crate::pipeline::tests::FakeBackend;
    use crate::test;

    use super::*;

    fn backend() -> Arc<FakeBackend> {
        let backend = FakeBackend::default();
        backend
            .hands
            .lock()
            .unwrap()
            .push(test::thumbs_down_hand().landmarks().clone());
        backend
            .faces
            .lock()
            .unwrap()
            .push(test::mouth(0.52, 0.4).landmarks().clone());
        backend.poses.lock().unwrap().push(
            crate::landmark::Landmarks::new(PoseLandmarks::NUM_LANDMARKS),
        );
        Arc::new(backend)
    }

    #[test]
    fn default_config() {
        let backend = backend();
        let mut trackers = Trackers::new(backend.clone(), &Config::default()).unwrap();
        assert!(trackers.is_enabled(Tracker::Hand));
        assert!(!trackers.is_enabled(Tracker::Body));
        assert!(trackers.is_enabled(Tracker::Face));

        let result = trackers.process_frame(&Frame::new(640, 480)).unwrap();
        assert_eq!(result.gestures, [vec![Gesture::ThumbsDown, Gesture::ThumbsOut]]);
        assert_eq!(result.expressions, [vec![Expression::Smiling]]);
        assert!(result.poses.is_empty());
        assert_eq!(
            result.recognized().collect::<Vec<_>>(),
            ["Thumbs Down!", "Thumbs Out!", "Smiling!"]
        );
        assert_eq!(result.overlay.width(), 640);

        // Body tracking is disabled, so only two detectors were created.
        assert_eq!(backend.created.load(Ordering::SeqCst), 2);
        assert!(!trackers.body().is_active());
    }

    #[test]
    fn disabling_drops_detector() {
        let backend = backend();
        let mut trackers = Trackers::new(backend.clone(), &Config::default()).unwrap();
        trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert!(trackers.face().is_active());

        trackers.set_enabled(Tracker::Face, false);
        assert!(!trackers.face().is_active());
        let result = trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert!(result.expressions.is_empty());

        trackers.set_enabled(Tracker::Body, true);
        let result = trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert_eq!(result.poses.len(), 1);

        trackers.stop();
        assert!(!trackers.hand().is_active());
        assert!(!trackers.body().is_active());
    }

    #[test]
    fn configure_rebuilds_changed_pipelines_only() {
        let backend = backend();
        let mut config = Config::default();
        let mut trackers = Trackers::new(backend.clone(), &config).unwrap();
        trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert_eq!(backend.created.load(Ordering::SeqCst), 2);

        config.face_tracker_pipeline.set_max_num_faces(1).unwrap();
        config.gestures.finger_separation = 0.1;
        trackers.configure(&config).unwrap();
        assert_eq!(backend.created.load(Ordering::SeqCst), 3);
        assert_eq!(trackers.hand().modality().thresholds().finger_separation, 0.1);

        config.expressions.open_smile_ratio = f32::INFINITY;
        assert!(trackers.configure(&config).is_err());
        assert_eq!(
            trackers.face().modality().thresholds().open_smile_ratio,
            1.5
        );
    }

    #[test]
    fn parse_tracker() {
        for tracker in Tracker::ALL {
            assert_eq!(tracker.to_string().parse::<Tracker>().unwrap(), tracker);
        }
        assert!("feet".parse::<Tracker>().is_err());
    }

    #[test]
    fn configure_applies_everything_despite_rebuild_failure() {
        let backend = backend();
        let mut config = Config::default();
        let mut trackers = Trackers::new(backend.clone(), &config).unwrap();
        trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert!(trackers.hand().is_active());

        backend.fail.store(true, Ordering::SeqCst);
        config.hand_tracker_pipeline.set_max_num_hands(1).unwrap();
        config.face_tracker_pipeline.set_max_num_faces(1).unwrap();
        config.tracker_pipelines.body = true;
        let err = trackers.configure(&config).unwrap_err();
        assert!(matches!(err, PipelineError::Detector { modality: "hand", .. }));

        assert_eq!(trackers.hand().options().max_num_hands(), 1);
        assert_eq!(trackers.face().options().max_num_faces(), 1);
        assert!(!trackers.hand().is_active());
        assert!(!trackers.face().is_active());
        assert!(trackers.is_enabled(Tracker::Body));

        backend.fail.store(false, Ordering::SeqCst);
        let result = trackers.process_frame(&Frame::new(64, 48)).unwrap();
        assert!(trackers.hand().is_active());
        assert!(trackers.body().is_active());
        assert_eq!(result.poses.len(), 1);
    }
}
