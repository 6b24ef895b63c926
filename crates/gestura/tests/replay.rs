use std::{env, fs, path::PathBuf, sync::Arc};

use gestura::config::Config;
use gestura::face::{Expression, FaceLandmarks};
use gestura::hand::Gesture;
use gestura::landmark::Position;
use gestura::pipeline::{Tracker, Trackers};
use gestura::replay::{RecordedFrame, Recording, ReplayBackend};

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("gestura-{}-{name}", fastrand::u64(..)))
}

/// Upright peace sign: index and middle finger extended and spread, ring and pinky folded.
fn peace_sign() -> Vec<Position> {
    [
        [0.5, 0.9],
        [0.43, 0.85],
        [0.42, 0.78],
        [0.45, 0.72],
        [0.49, 0.70],
        [0.44, 0.7],
        [0.44, 0.6],
        [0.45, 0.5],
        [0.42, 0.3],
        [0.5, 0.7],
        [0.5, 0.6],
        [0.52, 0.5],
        [0.55, 0.3],
        [0.56, 0.71],
        [0.57, 0.62],
        [0.57, 0.5],
        [0.57, 0.6],
        [0.61, 0.74],
        [0.63, 0.65],
        [0.63, 0.5],
        [0.62, 0.6],
    ]
    .into_iter()
    .map(|[x, y]| [x, y, 0.0])
    .collect()
}

/// Face mesh with a wide, open, upward-curved mouth and raised cheeks.
fn smiling_face() -> Vec<Position> {
    let mut face = vec![[0.0; 3]; FaceLandmarks::NUM_LANDMARKS];
    face[61] = [0.3, 0.5, 0.0];
    face[291] = [0.7, 0.5, 0.0];
    face[13] = [0.5, 0.48, 0.0];
    face[14] = [0.5, 0.52, 0.0];
    face[130] = [0.35, 0.4, 0.0];
    face[243] = [0.65, 0.4, 0.0];
    face
}

fn write_recording(frames: &[RecordedFrame]) -> PathBuf {
    let path = temp_path("recording.jsonl");
    let lines: Vec<String> = frames
        .iter()
        .map(|frame| serde_json::to_string(frame).unwrap())
        .collect();
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn replay_recording() {
    let path = write_recording(&[
        RecordedFrame {
            hands: vec![peace_sign()],
            ..Default::default()
        },
        RecordedFrame {
            faces: vec![smiling_face()],
            ..Default::default()
        },
        RecordedFrame {
            hands: vec![peace_sign()[..10].to_vec()],
            faces: vec![smiling_face()[..100].to_vec()],
            ..Default::default()
        },
        RecordedFrame {
            width: 1280,
            height: 720,
            hands: vec![peace_sign(), peace_sign()],
            faces: vec![smiling_face()],
            ..Default::default()
        },
    ]);
    let recording = Recording::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(recording.len(), 4);

    let backend = ReplayBackend::new();
    let mut trackers = Trackers::new(Arc::new(backend.clone()), &Config::default()).unwrap();

    let mut results = Vec::new();
    for frame in recording.frames() {
        let image = backend.advance(frame);
        results.push(trackers.process_frame(&image).unwrap());
    }

    assert_eq!(results[0].gestures, [vec![Gesture::PeaceSign]]);
    assert!(results[0].expressions.is_empty());

    assert!(results[1].gestures.is_empty());
    assert_eq!(results[1].expressions, [vec![Expression::Smiling]]);

    // Incomplete instances are dropped silently.
    assert!(results[2].gestures.is_empty());
    assert!(results[2].expressions.is_empty());
    assert_eq!(results[2].recognized().count(), 0);

    assert_eq!(results[3].gestures.len(), 2);
    assert_eq!(
        results[3].recognized().collect::<Vec<_>>(),
        ["Peace Sign!", "Peace Sign!", "Smiling!"]
    );
    assert_eq!(results[3].overlay.width(), 1280);
    assert_eq!(results[3].overlay.height(), 720);

    trackers.stop();
    assert!(!trackers.hand().is_active());
    assert!(!trackers.face().is_active());
}

#[test]
fn config_limits_instances() {
    let config_path = temp_path("config.json");
    fs::write(
        &config_path,
        r#"{
            "tracker_pipelines": { "face": false },
            "hand_tracker_pipeline": { "max_num_hands": 1 }
        }"#,
    )
    .unwrap();
    let config = Config::load(&config_path).unwrap();
    fs::remove_file(&config_path).unwrap();

    let backend = ReplayBackend::new();
    let mut trackers = Trackers::new(Arc::new(backend.clone()), &config).unwrap();
    assert!(!trackers.is_enabled(Tracker::Face));

    let image = backend.advance(&RecordedFrame {
        hands: vec![peace_sign(), peace_sign(), peace_sign()],
        faces: vec![smiling_face()],
        ..Default::default()
    });
    let result = trackers.process_frame(&image).unwrap();
    assert_eq!(result.gestures, [vec![Gesture::PeaceSign]]);
    assert!(result.expressions.is_empty());

    // Raising the limit rebuilds the active hand detector.
    trackers
        .hand_mut()
        .reconfigure(|opts| opts.set_max_num_hands(3))
        .unwrap();
    let result = trackers.process_frame(&image).unwrap();
    assert_eq!(result.gestures.len(), 3);
}

#[test]
fn stricter_separation_rejects_peace_sign() {
    let mut config = Config::default();
    config.gestures.finger_separation = 0.2;

    let backend = ReplayBackend::new();
    let mut trackers = Trackers::new(Arc::new(backend.clone()), &config).unwrap();
    let image = backend.advance(&RecordedFrame {
        hands: vec![peace_sign()],
        ..Default::default()
    });
    let result = trackers.process_frame(&image).unwrap();
    assert_eq!(result.gestures, [Vec::<Gesture>::new()]);
}
