//! Per-modality tracking pipelines.
//!
//! A [`Pipeline`] wraps an external landmark detector for one modality (hands, body pose or face
//! mesh), runs it on camera frames, feeds each detected instance to the classifiers and records
//! the results on an [`Overlay`].
//!
//! Detectors are not implemented by this crate. They are created on demand by a [`Backend`], from
//! the modality's options (maximum number of instances, confidence thresholds, ...).
//!
//! # Lifecycle
//!
//! A pipeline is either *configured* (no detector exists) or *active* (it owns a detector handle).
//! [`Pipeline::activate`] creates the detector, [`Pipeline::deactivate`] drops it, and
//! [`Pipeline::process_frame`] activates the pipeline on first use. Changing the options of an
//! active pipeline tears the detector down and builds a new one with the new options. Options are
//! validated first; an invalid value is rejected and leaves the pipeline untouched.

pub mod body;
pub mod face;
pub mod hand;
pub mod overlay;
mod trackers;

use std::{fmt, mem, sync::Arc};

use thiserror::Error;

use crate::error::InvalidOption;
use crate::landmark::Landmarks;
use crate::timer::Timer;

pub use body::{BodyTracking, PoseOptions};
pub use face::{FaceOptions, FaceTracking};
pub use hand::{HandOptions, HandTracking};
pub use overlay::Overlay;
pub use trackers::{FrameResult, Tracker, Trackers};

/// A camera frame, as passed to the detectors.
pub type Frame = image::RgbImage;

/// An external landmark detector instance.
///
/// Returns one [`Landmarks`] list per detected object, with coordinates normalized to the frame
/// size. Lists that are incomplete for the modality are discarded by the pipeline.
pub trait Detector: Send {
    fn detect(&mut self, frame: &Frame) -> anyhow::Result<Vec<Landmarks>>;
}

impl<F> Detector for F
where
    F: FnMut(&Frame) -> anyhow::Result<Vec<Landmarks>> + Send,
{
    fn detect(&mut self, frame: &Frame) -> anyhow::Result<Vec<Landmarks>> {
        self(frame)
    }
}

/// Factory for detector instances.
///
/// Each method is called whenever a pipeline of the corresponding modality is activated, or
/// reconfigured while active. The returned detector is owned by the pipeline and dropped when the
/// pipeline is deactivated.
pub trait Backend: Send + Sync {
    fn hand_detector(&self, options: &HandOptions) -> anyhow::Result<Box<dyn Detector>>;

    fn pose_detector(&self, options: &PoseOptions) -> anyhow::Result<Box<dyn Detector>>;

    fn face_detector(&self, options: &FaceOptions) -> anyhow::Result<Box<dyn Detector>>;
}

/// Modality-specific part of a [`Pipeline`].
pub trait Modality: Send {
    /// Detector options.
    type Options: Clone + fmt::Debug + Send;

    /// Classification result for one detected instance.
    type Output;

    /// Human-readable modality name, used in logs and errors.
    const NAME: &'static str;

    fn validate(options: &Self::Options) -> Result<(), InvalidOption>;

    fn create_detector(
        backend: &dyn Backend,
        options: &Self::Options,
    ) -> anyhow::Result<Box<dyn Detector>>;

    /// Classifies one detected instance and draws it on `overlay`.
    ///
    /// Returns [`None`] if `landmarks` is incomplete for this modality. Nothing is drawn in that
    /// case.
    fn analyze(&self, landmarks: Landmarks, overlay: &mut Overlay) -> Option<Self::Output>;
}

/// Errors raised when activating or reconfiguring a [`Pipeline`].
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    #[error("failed to initialize {modality} detector")]
    Detector {
        modality: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

enum State {
    Configured,
    Active(Box<dyn Detector>),
}

/// A detector plus classifiers for one modality. See the [module docs](self) for the lifecycle.
pub struct Pipeline<M: Modality> {
    modality: M,
    options: M::Options,
    backend: Arc<dyn Backend>,
    state: State,
    t_detect: Timer,
    t_classify: Timer,
}

impl<M: Modality> Pipeline<M> {
    /// Creates a pipeline in the *configured* state. No detector is created yet.
    pub fn new(
        backend: Arc<dyn Backend>,
        modality: M,
        options: M::Options,
    ) -> Result<Self, InvalidOption> {
        M::validate(&options)?;
        Ok(Self {
            modality,
            options,
            backend,
            state: State::Configured,
            t_detect: Timer::new(format!("{} detect", M::NAME)),
            t_classify: Timer::new(format!("{} classify", M::NAME)),
        })
    }

    #[inline]
    pub fn modality(&self) -> &M {
        &self.modality
    }

    /// Returns the modality for modification.
    ///
    /// Classifier settings stored in the modality take effect on the next frame. The detector is
    /// not rebuilt.
    #[inline]
    pub fn modality_mut(&mut self) -> &mut M {
        &mut self.modality
    }

    #[inline]
    pub fn options(&self) -> &M::Options {
        &self.options
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Returns profiling timers for detection and classification.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_detect, &self.t_classify].into_iter()
    }

    /// Creates the detector, if the pipeline is not already active.
    pub fn activate(&mut self) -> Result<(), PipelineError> {
        if let State::Configured = self.state {
            self.state = State::Active(self.create_detector()?);
        }
        Ok(())
    }

    /// Drops the detector, if the pipeline is active.
    pub fn deactivate(&mut self) {
        if let State::Active(_) = mem::replace(&mut self.state, State::Configured) {
            log::debug!("released {} detector", M::NAME);
        }
    }

    /// Replaces the detector options.
    ///
    /// If the pipeline is active, the detector is rebuilt with the new options. If that fails,
    /// the pipeline stays configured with the new options and the error is returned.
    pub fn set_options(&mut self, options: M::Options) -> Result<(), PipelineError> {
        M::validate(&options)?;
        self.options = options;
        if self.is_active() {
            self.deactivate();
            self.activate()?;
        }
        Ok(())
    }

    /// Changes the detector options through a validating setter.
    ///
    /// `change` operates on a copy of the current options. If it fails, the error is returned and
    /// neither the options nor the detector are touched.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use gestura::pipeline::{Backend, HandTracking, Pipeline};
    /// # fn demo(backend: Arc<dyn Backend>) -> anyhow::Result<()> {
    /// let mut pipeline = Pipeline::new(backend, HandTracking::default(), Default::default())?;
    /// pipeline.reconfigure(|opts| opts.set_max_num_hands(1))?;
    /// assert!(pipeline.reconfigure(|opts| opts.set_min_detection_confidence(1.5)).is_err());
    /// assert_eq!(pipeline.options().max_num_hands(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn reconfigure<F>(&mut self, change: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut M::Options) -> Result<(), InvalidOption>,
    {
        let mut options = self.options.clone();
        change(&mut options)?;
        self.set_options(options)
    }

    /// Runs the detector on `frame` and classifies every complete instance it reports.
    ///
    /// Activates the pipeline first if needed. Returns one result per classified instance, in
    /// detection order.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        overlay: &mut Overlay,
    ) -> anyhow::Result<Vec<M::Output>> {
        let mut detector = match mem::replace(&mut self.state, State::Configured) {
            State::Active(detector) => detector,
            State::Configured => self.create_detector()?,
        };
        let detections = self.t_detect.time(|| detector.detect(frame));
        self.state = State::Active(detector);
        let detections = detections?;

        let modality = &self.modality;
        let outputs = self.t_classify.time(|| {
            detections
                .into_iter()
                .filter_map(|landmarks| modality.analyze(landmarks, overlay))
                .collect()
        });
        Ok(outputs)
    }

    fn create_detector(&self) -> Result<Box<dyn Detector>, PipelineError> {
        log::debug!("initializing {} detector: {:?}", M::NAME, self.options);
        M::create_detector(&*self.backend, &self.options).map_err(|source| {
            PipelineError::Detector {
                modality: M::NAME,
                source,
            }
        })
    }
}
