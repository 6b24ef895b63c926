//! Face landmark dataset export.
//!
//! Turns a directory of labelled face images into CSV files of face mesh landmarks, for training
//! expression classifiers. The expected layout is the one of common emotion datasets:
//!
//! ```text
//! <dataset_root>/train/<label>/*.{png,jpg,jpeg}
//! ```
//!
//! Every label directory produces one `landmarks_<label>_<YYYYmmdd_HHMMSS>.csv` file below the
//! output root, in the same relative location. Each row holds the label followed by the X and Y
//! coordinates of all 468 face mesh landmarks of the first face found in an image.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use itertools::Itertools;

use crate::face::FaceLandmarks;
use crate::pipeline::{Backend, Detector, FaceOptions};
use crate::replay::{Recording, ReplayBackend};

/// File extensions recognized as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Provides the face landmarks of dataset images.
pub trait FaceSource {
    /// Returns the first complete face in the image at `image_path`, or [`None`] if there is no
    /// face in it.
    fn first_face(&mut self, image_path: &Path) -> anyhow::Result<Option<FaceLandmarks>>;
}

/// Loads images from disk and runs a face mesh [`Detector`] on them.
pub struct DetectorFaceSource {
    detector: Box<dyn Detector>,
}

impl DetectorFaceSource {
    pub fn new(detector: Box<dyn Detector>) -> Self {
        Self { detector }
    }
}

impl FaceSource for DetectorFaceSource {
    fn first_face(&mut self, image_path: &Path) -> anyhow::Result<Option<FaceLandmarks>> {
        let image = image::open(image_path)
            .with_context(|| format!("failed to load image '{}'", image_path.display()))?
            .to_rgb8();
        let faces = self.detector.detect(&image)?;
        Ok(faces.into_iter().find_map(FaceLandmarks::new))
    }
}

/// Reads precomputed landmarks from a recording stored next to each image.
///
/// The landmarks of `<name>.<ext>` are taken from the first frame of `<name>.jsonl` (see
/// [`crate::replay`]). Images without a recording have no face.
pub struct RecordingFaceSource {
    backend: ReplayBackend,
    images: DetectorFaceSource,
}

impl RecordingFaceSource {
    pub fn new() -> anyhow::Result<Self> {
        let backend = ReplayBackend::new();
        let detector = backend.face_detector(&FaceOptions::default())?;
        Ok(Self {
            backend,
            images: DetectorFaceSource::new(detector),
        })
    }
}

impl FaceSource for RecordingFaceSource {
    fn first_face(&mut self, image_path: &Path) -> anyhow::Result<Option<FaceLandmarks>> {
        let sidecar = image_path.with_extension("jsonl");
        if !sidecar.is_file() {
            log::debug!("no recording for '{}'", image_path.display());
            return Ok(None);
        }
        let recording = Recording::load(&sidecar)?;
        let Some(frame) = recording.frames().first() else {
            return Ok(None);
        };
        self.backend.advance(frame);
        self.images.first_face(image_path)
    }
}

/// Outcome of exporting one label directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub label: String,
    /// Path of the written CSV file.
    pub output: PathBuf,
    /// Number of image files found.
    pub images: usize,
    /// Number of rows written, one per image with a face.
    pub rows: usize,
    /// Number of images that could not be processed.
    pub failed: usize,
}

/// Returns the CSV header: `emotion,0_x,0_y,1_x,1_y,...`.
pub fn csv_header() -> String {
    let columns =
        (0..FaceLandmarks::NUM_LANDMARKS).flat_map(|i| [format!("{i}_x"), format!("{i}_y")]);
    std::iter::once("emotion".to_string()).chain(columns).join(",")
}

/// Formats one CSV row.
pub fn csv_row(label: &str, face: &FaceLandmarks) -> String {
    let coords = face
        .landmarks()
        .iter()
        .flat_map(|landmark| [landmark.x(), landmark.y()]);
    std::iter::once(label.to_string())
        .chain(coords.map(|c| c.to_string()))
        .join(",")
}

/// Lists the image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_image && path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Writes the landmarks of every image in `image_dir` to a new CSV file in `output_dir`.
///
/// `output_dir` is created if it does not exist. Images without a face are skipped, as are
/// images that fail to load (with a warning).
pub fn create_landmarks_csv(
    source: &mut dyn FaceSource,
    image_dir: &Path,
    output_dir: &Path,
    label: &str,
) -> anyhow::Result<ExportSummary> {
    let images = list_images(image_dir)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let output = output_dir.join(format!("landmarks_{label}_{timestamp}.csv"));
    let file = fs::File::create(&output)
        .with_context(|| format!("failed to create '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", csv_header())?;

    log::info!(
        "exporting {} images labelled '{label}' to '{}'",
        images.len(),
        output.display()
    );

    let mut summary = ExportSummary {
        label: label.to_string(),
        output,
        images: images.len(),
        rows: 0,
        failed: 0,
    };
    for (i, path) in images.iter().enumerate() {
        log::debug!("[{}/{}] {}", i + 1, images.len(), path.display());
        match source.first_face(path) {
            Ok(Some(face)) => {
                writeln!(writer, "{}", csv_row(label, &face))?;
                summary.rows += 1;
            }
            Ok(None) => log::debug!("no face in '{}'", path.display()),
            Err(e) => {
                log::warn!("skipping '{}': {e:#}", path.display());
                summary.failed += 1;
            }
        }
    }
    writer.flush()?;

    log::info!(
        "wrote {} of {} images to '{}'",
        summary.rows,
        summary.images,
        summary.output.display()
    );
    Ok(summary)
}

/// Exports every label directory below `<dataset_root>/train`.
///
/// The CSV file of label `<label>` is written to `<output_root>/train/<label>/`. Labels are
/// processed in name order.
pub fn generate_for_all_labels(
    source: &mut dyn FaceSource,
    dataset_root: &Path,
    output_root: &Path,
) -> anyhow::Result<Vec<ExportSummary>> {
    let train = dataset_root.join("train");
    let mut labels = Vec::new();
    let entries =
        fs::read_dir(&train).with_context(|| format!("failed to read '{}'", train.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            labels.push(entry.file_name());
        }
    }
    labels.sort();

    let mut summaries = Vec::with_capacity(labels.len());
    for label in labels {
        let image_dir = train.join(&label);
        let output_dir = output_root.join("train").join(&label);
        let label = label.to_string_lossy();
        summaries.push(create_landmarks_csv(
            source,
            &image_dir,
            &output_dir,
            &label,
        )?);
    }
    Ok(summaries)
}
