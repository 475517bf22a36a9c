use super::*;

#[test]
fn starts_idle() {
    let capture = SketchCapture::new();
    assert_eq!(capture.state(), SketchState::Idle);
    assert!(capture.points().is_empty());
}

#[test]
fn record_while_idle_is_ignored() {
    let mut capture = SketchCapture::new();
    assert!(!capture.record(Point::new(1.0, 2.0)));
    assert!(capture.points().is_empty());
}

#[test]
fn start_record_finish() {
    let mut capture = SketchCapture::new();
    capture.start();
    assert!(capture.is_capturing());
    assert!(capture.record(Point::new(1.0, 2.0)));
    assert!(capture.record(Point::new(3.0, 4.0)));
    assert!(capture.finish());
    assert_eq!(capture.state(), SketchState::Idle);
    assert_eq!(capture.points(), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
}

#[test]
fn finish_while_idle_reports_false() {
    let mut capture = SketchCapture::new();
    assert!(!capture.finish());
    capture.start();
    assert!(capture.finish());
    assert!(!capture.finish());
}

#[test]
fn restart_clears_points() {
    let mut capture = SketchCapture::new();
    capture.start();
    capture.record(Point::new(1.0, 1.0));
    capture.finish();
    capture.start();
    assert!(capture.points().is_empty());
}

#[test]
fn fixed_recognizer_ignores_points() {
    let recognizer = FixedRecognizer;
    let expected = Shape::rectangle(50.0, 50.0, 100.0, 50.0, "blue");
    assert_eq!(recognizer.recognize(&[]), expected);
    let many: Vec<Point> = (0..50).map(|i| Point::new(f64::from(i), f64::from(i * 2))).collect();
    assert_eq!(recognizer.recognize(&many), expected);
}

#[test]
fn point_serde_shape() {
    let point: Point = serde_json::from_str(r#"{"x": 3, "y": 4.5}"#).unwrap();
    assert_eq!(point, Point::new(3.0, 4.5));
}
