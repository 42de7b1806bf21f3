use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use unistroke::gesture_writer::{GestureWriter, Speed};
use unistroke::{
    DirectorySource, LoadState, Point, Recognizer, RecognizerConfig, Stroke, TemplateEntry,
};

fn line_template() -> TemplateEntry {
    TemplateEntry::new("line", vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)])
}

fn circle_template() -> TemplateEntry {
    let points = (0..=32)
        .map(|i| {
            let angle = TAU * i as f64 / 32.0;
            Point::new(angle.cos(), angle.sin())
        })
        .collect();
    TemplateEntry::new("circle", points)
}

fn recognizer() -> Recognizer {
    Recognizer::with_templates(
        RecognizerConfig::default(),
        [line_template(), circle_template()],
    )
    .unwrap()
}

fn wobbly_line() -> Stroke {
    Stroke::from_xy((0..80).map(|i| {
        let x = 512.0 + i as f64 * 5.0;
        (x, 300.0 + 1.5 * (i as f64 * 0.4).sin())
    }))
    .unwrap()
}

fn rough_circle() -> Stroke {
    Stroke::from_xy((0..=60).map(|i| {
        let angle = TAU * i as f64 / 60.0;
        let radius = 80.0 + 3.0 * (angle * 5.0).sin();
        (300.0 + radius * angle.cos(), 200.0 + radius * angle.sin())
    }))
    .unwrap()
}

#[test]
fn straight_line_is_recognized_confidently() {
    let result = recognizer().recognize(&wobbly_line());

    assert_eq!(result.label, "line");
    assert!(
        result.confidence > 0.9,
        "confidence {} (score {})",
        result.confidence,
        result.score
    );
    assert_eq!(result.candidate.len(), 64);
    assert_eq!(result.template.len(), 64);
}

#[test]
fn line_overlay_lands_on_the_input() {
    let stroke = wobbly_line();
    let result = recognizer().recognize(&stroke);

    let first = stroke.points()[0];
    let last = stroke.points()[stroke.len() - 1];
    assert!(result.template[0].distance(first) < 5.0);
    assert!(result.template[63].distance(last) < 5.0);
}

#[test]
fn rough_circle_is_recognized() {
    let result = recognizer().recognize(&rough_circle());
    assert_eq!(result.label, "circle");
}

#[test]
fn rotated_line_is_still_a_line() {
    let stroke = wobbly_line();
    let center = unistroke::geometry::centroid(stroke.points());
    let rotated = unistroke::geometry::rotate(stroke.points(), 1.2, center);

    let result = recognizer().recognize(&Stroke::new(rotated).unwrap());
    assert_eq!(result.label, "line");
    assert!(result.confidence > 0.9);
}

#[test]
fn dwell_point_degrades_gracefully() {
    let dwell = Stroke::from_xy(std::iter::repeat((400.0, 400.0)).take(12)).unwrap();
    let recognizer = recognizer();

    let result = recognizer.recognize(&dwell);
    assert!(!result.label.is_empty());
    assert!(result.confidence.is_finite());
    // A dwell scales by 1, so its canonical form stays a point at the origin
    // and its distance to any template is about half the square size.
    // exp(-0.01 * ~63) is ~0.53, which is why the bound is 0.6 and not near 0.
    assert!(result.confidence < 0.6, "confidence {}", result.confidence);
    assert!(result.confidence < recognizer.recognize(&wobbly_line()).confidence);
    assert!(result.template.iter().all(|p| p.is_finite()));
}

#[test]
fn rank_lists_every_label_best_first() {
    let ranked = recognizer().rank(&rough_circle(), 5);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].label, "circle");
    assert_eq!(ranked[1].label, "line");
    assert!(ranked[0].confidence > ranked[1].confidence);
}

#[test]
fn empty_library_returns_empty_result() {
    let result = Recognizer::default().recognize(&rough_circle());

    assert!(!result.is_match());
    assert_eq!(result.confidence, 0.0);
    assert!(result.template.is_empty());
}

#[tokio::test]
async fn matching_works_while_loading_in_background() {
    let recognizer = Recognizer::default();
    let store = Arc::clone(recognizer.store());
    let (tx, rx) = std::sync::mpsc::channel::<TemplateEntry>();

    let handle = store.spawn_load(rx);

    // Nothing landed yet: an empty result, not an error.
    assert!(!recognizer.recognize(&wobbly_line()).is_match());
    assert_ne!(store.state(), LoadState::Ready);

    tx.send(line_template()).unwrap();
    tx.send(circle_template()).unwrap();
    drop(tx);

    timeout(Duration::from_secs(5), store.wait_ready())
        .await
        .expect("loading should finish");
    assert_eq!(handle.await.unwrap().unwrap(), 2);

    assert_eq!(recognizer.recognize(&wobbly_line()).label, "line");
    assert_eq!(recognizer.recognize(&rough_circle()).label, "circle");
}

#[tokio::test]
async fn saved_gestures_load_as_templates() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GestureWriter::new(dir.path()).with_speed(Speed::Slow);

    let timed = |stroke: Stroke| {
        let times = (0..stroke.len() as u64).map(|i| 1000 + i * 16).collect();
        Stroke::with_timestamps(stroke.into_points(), times).unwrap()
    };
    writer.save("line", &timed(wobbly_line())).unwrap();
    writer.save("line", &timed(wobbly_line())).unwrap();
    writer.save("circle", &timed(rough_circle())).unwrap();

    assert_eq!(DirectorySource::new(dir.path()).total(), 3);

    let recognizer = Recognizer::from_config(RecognizerConfig {
        template_path: Some(dir.path().to_path_buf()),
        load_in_background: true,
        ..RecognizerConfig::default()
    });
    timeout(Duration::from_secs(5), recognizer.store().wait_ready())
        .await
        .expect("loading should finish");

    assert_eq!(recognizer.store().len(), 3);
    assert_eq!(recognizer.store().labels(), ["circle", "line"]);
    assert_eq!(recognizer.recognize(&rough_circle()).label, "circle");
    assert_eq!(recognizer.recognize(&wobbly_line()).label, "line");
}
