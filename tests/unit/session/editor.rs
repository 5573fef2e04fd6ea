use std::time::Duration;

use super::*;
use crate::export::sink::InMemorySink;
use crate::foundation::color::Rgba8;
use crate::spec::catalogue::PresetCatalogue;

fn landscape() -> SourceImage {
    SourceImage::from_rgba8(300, 200, [10, 120, 240, 255].repeat(300 * 200)).unwrap()
}

fn badge() -> OutputSpec {
    OutputSpec::new("Badge", 300, 400, Some(Rgba8::WHITE), "").unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn loaded() -> (EditorSession, Instant) {
    let cfg = EditorConfig {
        preview_settle: Duration::ZERO,
        ..EditorConfig::default()
    };
    let mut s = EditorSession::new(cfg);
    let now = Instant::now();
    s.set_source(landscape(), now);
    (s, now)
}

#[test]
fn empty_session_has_nothing_to_show_or_export() {
    let s = EditorSession::default();
    assert!(s.preview(Instant::now()).unwrap().is_none());
    assert!(matches!(s.export(), Err(PhotofitError::NoCropSelected)));
    assert!(!s.use_background());
}

#[test]
fn config_sets_background_default() {
    let s = EditorSession::new(EditorConfig {
        use_background_default: true,
        ..EditorConfig::default()
    });
    assert!(s.use_background());
}

#[test]
fn loading_seeds_and_records_default_crop() {
    let (s, _) = loaded();
    let c = s.completed_crop().unwrap().crop();
    assert_eq!(*c, Crop::percent(10.0, 10.0, 80.0, 80.0));
    assert_eq!(s.live_crop(), *c);
}

#[test]
fn selecting_spec_centers_locked_crop() {
    let (mut s, _) = loaded();
    s.select_spec(Some(badge()));

    // target 0.75 on a 1.5 image
    let c = s.live_crop();
    assert!(approx(c.height, 80.0));
    assert!(approx(c.width, 40.0));
    assert!(approx(c.x, 30.0));
    assert!(approx(c.y, 10.0));
    assert!(s.region().is_constrained());
    assert_eq!(s.completed_crop().unwrap().crop(), &c);

    s.select_spec(None);
    assert!(!s.region().is_constrained());
    assert_eq!(s.live_crop(), c);
}

#[test]
fn drag_updates_live_crop_and_commits_on_release() {
    let (mut s, _) = loaded();
    let before = *s.completed_crop().unwrap().crop();

    s.begin_drag();
    assert!(s.is_dragging());
    s.drag_by(-5.0, 3.0);
    assert!(approx(s.live_crop().x, 5.0));
    assert_eq!(s.completed_crop().unwrap().crop(), &before);

    s.end_drag();
    assert!(!s.is_dragging());
    assert_eq!(*s.completed_crop().unwrap().crop(), s.live_crop());
}

#[test]
fn resize_under_lock_keeps_ratio() {
    let (mut s, _) = loaded();
    s.select_spec(Some(badge()));
    s.begin_drag();
    s.resize(Handle::SouthEast, 60.0, 90.0);
    s.end_drag();

    let c = s.live_crop();
    // percent ratio for a 0.75 target on a 1.5 image
    assert!((c.width / c.height - 0.5).abs() < 1e-9);
}

#[test]
fn set_crop_in_display_pixels() {
    let (mut s, _) = loaded();
    s.set_display_size(150, 100).unwrap();
    s.set_crop(&Crop::pixels(15.0, 10.0, 75.0, 50.0)).unwrap();
    let c = s.completed_crop().unwrap().crop();
    assert!(approx(c.x, 10.0) && approx(c.y, 10.0));
    assert!(approx(c.width, 50.0) && approx(c.height, 50.0));

    assert!(matches!(
        s.set_crop(&Crop::percent(0.0, 0.0, 0.0, 10.0)),
        Err(PhotofitError::InvalidCropState(_))
    ));
}

#[test]
fn zoom_steps_and_reset_all() {
    let (mut s, _) = loaded();
    for _ in 0..40 {
        s.zoom_in();
    }
    assert_eq!(s.transform().scale(), 3.0);
    s.rotate(RotationStep::Clockwise);
    s.drag_by(-10.0, -10.0);

    s.reset_all();
    assert_eq!(*s.transform(), TransformState::new());
    assert_eq!(s.live_crop(), Crop::percent(10.0, 10.0, 80.0, 80.0));
    assert_eq!(*s.completed_crop().unwrap().crop(), s.live_crop());
}

#[test]
fn sync_spec_follows_provider() {
    let (mut s, _) = loaded();
    let mut catalogue = PresetCatalogue::builtin();
    catalogue.select("Passport").unwrap();
    s.sync_spec(&catalogue);
    assert_eq!(s.spec().unwrap().name(), "Passport");

    catalogue.clear();
    s.sync_spec(&catalogue);
    assert!(s.spec().is_none());
}

#[test]
fn preview_and_export_share_the_canvas() {
    let (mut s, now) = loaded();
    s.select_spec(Some(badge()));
    s.set_use_background(true);

    let preview = s.preview(now).unwrap().unwrap();
    assert_eq!((preview.width, preview.height), (150, 200));
    assert_eq!(preview.pixel(0, 0), Some([255, 255, 255, 255]));

    let mut sink = InMemorySink::new();
    s.export_to(&mut sink).unwrap();
    let out = &sink.images()[0];
    assert_eq!(out.filename, "Badge_edited.png");
    let img = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (300, 400));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn failed_load_keeps_previous_source() {
    let (mut s, now) = loaded();
    assert!(matches!(
        s.load_image(b"not an image", now),
        Err(PhotofitError::UnsupportedFormat(_))
    ));
    assert_eq!(s.source().unwrap().natural_width(), 300);
}

#[test]
fn preview_follows_live_crop_while_export_keeps_committed_one() {
    let red = [255, 0, 0, 255];
    let blue = [0, 0, 255, 255];
    let mut data = Vec::with_capacity(200 * 100 * 4);
    for _ in 0..100 {
        for x in 0..200 {
            data.extend_from_slice(if x < 100 { &red } else { &blue });
        }
    }
    let cfg = EditorConfig {
        preview_settle: Duration::ZERO,
        ..EditorConfig::default()
    };
    let mut s = EditorSession::new(cfg);
    let now = Instant::now();
    s.set_source(SourceImage::from_rgba8(200, 100, data).unwrap(), now);
    s.set_crop(&Crop::percent(0.0, 0.0, 40.0, 100.0)).unwrap();

    let center_of_export = |s: &EditorSession| {
        let out = s.export().unwrap();
        let img = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
        img.get_pixel(out.width / 2, out.height / 2).0
    };
    let center_of_preview = |s: &EditorSession| {
        let buf = s.preview(now).unwrap().unwrap();
        buf.pixel(buf.width / 2, buf.height / 2).unwrap()
    };
    let near = |a: [u8; 4], b: [u8; 4]| a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2);

    assert!(near(center_of_preview(&s), red));
    assert!(near(center_of_export(&s), red));

    s.begin_drag();
    s.drag_by(60.0, 0.0);
    assert!(near(center_of_preview(&s), blue));
    assert!(near(center_of_export(&s), red));

    s.end_drag();
    assert!(near(center_of_preview(&s), blue));
    assert!(near(center_of_export(&s), blue));
}
