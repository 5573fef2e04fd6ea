use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn assert_in_bounds(region: &CropRegion) {
    let r = region.rect();
    assert!(r.x >= 0.0 && r.y >= 0.0, "{r:?}");
    assert!(r.x + r.width <= 100.0 + 1e-9, "{r:?}");
    assert!(r.y + r.height <= 100.0 + 1e-9, "{r:?}");
    assert!(r.width >= MIN_EDGE_PERCENT && r.height >= MIN_EDGE_PERCENT, "{r:?}");
}

#[test]
fn default_region_is_80_percent_centered() {
    let r = CropRegion::new().rect();
    assert_eq!(r, Crop::percent(10.0, 10.0, 80.0, 80.0));
    assert!(!CropRegion::new().is_constrained());
}

#[test]
fn centering_landscape_image_for_portrait_target() {
    // 3:4 target on a 3:2 image: height-limited.
    let c = centered_crop(0.75, 1.5);
    assert!(approx(c.height, 80.0));
    assert!(approx(c.width, 40.0));
    assert!(approx(c.x, 30.0));
    assert!(approx(c.y, 10.0));
}

#[test]
fn centering_portrait_image_for_wide_target() {
    let c = centered_crop(16.0 / 9.0, 0.75);
    assert!(approx(c.width, 80.0));
    assert!(approx(c.height, 80.0 * 0.75 / (16.0 / 9.0)));
    assert!(approx(c.x, 10.0));
    assert!(approx(c.y, (100.0 - c.height) / 2.0));
}

#[test]
fn centering_clamps_degenerate_ratios_to_one_percent() {
    let c = centered_crop(1000.0, 0.001);
    assert!(approx(c.width, 80.0));
    assert!(approx(c.height, MIN_EDGE_PERCENT));

    let c = centered_crop(0.0001, 50.0);
    assert!(approx(c.width, MIN_EDGE_PERCENT));
    assert!(approx(c.height, 80.0));
}

#[test]
fn constrain_recenters_and_release_keeps_rect() {
    let mut region = CropRegion::new();
    region.constrain(0.75, 600, 400);
    assert!(region.is_constrained());
    assert_eq!(region.rect(), centered_crop(0.75, 1.5));

    region.drag_by(-5.0, 3.0);
    let before = region.rect();
    region.release();
    assert!(!region.is_constrained());
    assert_eq!(region.rect(), before);
}

#[test]
fn drag_stops_at_edges() {
    let mut region = CropRegion::new();
    region.drag_by(50.0, -50.0);
    assert_eq!(region.rect(), Crop::percent(20.0, 0.0, 80.0, 80.0));
    region.drag_by(f64::NAN, 1.0);
    assert_eq!(region.rect(), Crop::percent(20.0, 0.0, 80.0, 80.0));
}

#[test]
fn free_resize_moves_only_the_dragged_edges() {
    let mut region = CropRegion::new();
    region.resize(Handle::SouthEast, 50.0, 60.0);
    assert_eq!(region.rect(), Crop::percent(10.0, 10.0, 40.0, 50.0));

    region.resize(Handle::West, 0.0, 999.0);
    assert_eq!(region.rect(), Crop::percent(0.0, 10.0, 50.0, 50.0));

    // Dragging past the anchor collapses to the minimum edge instead of flipping.
    region.resize(Handle::North, 0.0, 100.0);
    let r = region.rect();
    assert!(approx(r.height, MIN_EDGE_PERCENT));
    assert!(approx(r.y + r.height, 60.0));
    assert_in_bounds(&region);
}

#[test]
fn locked_corner_resize_preserves_ratio_and_anchor() {
    let mut region = CropRegion::new();
    region.constrain(0.75, 600, 400);
    let ratio = region.constraint().percent_aspect().unwrap();
    let before = region.rect();

    region.resize(Handle::SouthEast, 50.0, 60.0);
    let r = region.rect();
    assert!(approx(r.width / r.height, ratio));
    assert!(approx(r.x, before.x));
    assert!(approx(r.y, before.y));

    region.resize(Handle::NorthWest, 0.0, 0.0);
    let r2 = region.rect();
    assert!(approx(r2.width / r2.height, ratio));
    assert!(approx(r2.x + r2.width, r.x + r.width));
    assert!(approx(r2.y + r2.height, r.y + r.height));
    assert_in_bounds(&region);
}

#[test]
fn locked_edge_resize_scales_around_the_perpendicular_center() {
    let mut region = CropRegion::new();
    region.constrain(1.0, 100, 100);
    let before = region.rect();
    let cy = before.y + before.height / 2.0;

    region.resize(Handle::East, 70.0, 0.0);
    let r = region.rect();
    assert!(approx(r.x, before.x));
    assert!(approx(r.width, 70.0 - before.x));
    assert!(approx(r.width, r.height));
    assert!(approx(r.y + r.height / 2.0, cy));
}

#[test]
fn locked_resize_never_escapes_bounds() {
    let mut region = CropRegion::new();
    region.constrain(0.75, 400, 300);
    for (h, px, py) in [
        (Handle::SouthEast, 100.0, 100.0),
        (Handle::NorthWest, -50.0, -50.0),
        (Handle::South, 0.0, 200.0),
        (Handle::West, -10.0, 0.0),
        (Handle::NorthEast, 0.0, 100.0),
    ] {
        region.resize(h, px, py);
        assert_in_bounds(&region);
        let r = region.rect();
        let ratio = region.constraint().percent_aspect().unwrap();
        if r.width > MIN_EDGE_PERCENT && r.height > MIN_EDGE_PERCENT {
            assert!((r.width / r.height - ratio).abs() < 1e-6, "{h:?} {r:?}");
        }
    }
}

#[test]
fn reset_returns_to_default_under_current_lock() {
    let mut region = CropRegion::new();
    region.resize(Handle::SouthEast, 30.0, 30.0);
    region.reset();
    assert_eq!(region.rect(), Crop::percent(10.0, 10.0, 80.0, 80.0));

    region.constrain(0.75, 600, 400);
    region.drag_by(10.0, 5.0);
    region.reset();
    assert_eq!(region.rect(), centered_crop(0.75, 1.5));
    assert!(region.is_constrained());
}

#[test]
fn set_rect_accepts_pixels_and_enforces_lock() {
    let mut region = CropRegion::new();
    region.set_rect(&Crop::pixels(20.0, 10.0, 100.0, 50.0), 200, 100);
    assert_eq!(region.rect(), Crop::percent(10.0, 10.0, 50.0, 50.0));

    region.constrain(1.0, 200, 100);
    region.set_rect(&Crop::percent(0.0, 0.0, 40.0, 10.0), 200, 100);
    let r = region.rect();
    // Percent ratio for a square target on a 2:1 image is 0.5.
    assert!(approx(r.width, 40.0));
    assert!(approx(r.height, 80.0));

    let before = region.rect();
    region.set_rect(&Crop::percent(0.0, 0.0, 0.0, 10.0), 200, 100);
    assert_eq!(region.rect(), before);
}
