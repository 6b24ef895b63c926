//! Gestura gesture and expression recognition library.
//!
//! Gestura classifies simple hand gestures (thumbs up, thumbs down, thumbs out, peace sign) and
//! facial expressions (smiling) from the landmarks produced by MediaPipe-style hand, pose and face
//! mesh models. The models themselves are not part of this crate: they are plugged in through the
//! [`pipeline::Detector`] and [`pipeline::Backend`] traits.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to the input image: X and Y are in range 0.0 to 1.0, X
//! points to the right and Y points *down*. The Z coordinate is carried along but not used by any
//! classifier.
//!
//! Coordinates outside of the 0.0 to 1.0 range are accepted. The classifiers are affine and stay
//! well-defined, but their results are meaningless for such inputs.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log levels set by [`init_logger!`], using the usual [`env_logger`]
//!   syntax.

pub mod body;
pub mod config;
pub mod dataset;
pub mod error;
pub mod face;
pub mod hand;
pub mod landmark;
pub mod pipeline;
pub mod replay;
pub mod thresholds;
pub mod timer;

#[cfg(test)]
mod test;

use log::LevelFilter;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and Gestura will log at *trace* level.
/// Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
