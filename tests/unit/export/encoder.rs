use super::*;
use crate::crop::rect::Crop;
use crate::export::sink::InMemorySink;
use crate::foundation::color::Rgba8;

fn source() -> SourceImage {
    SourceImage::from_rgba8(60, 80, [200, 30, 30, 255].repeat(60 * 80)).unwrap()
}

fn completed() -> CompletedCrop {
    CompletedCrop::new(Crop::percent(10.0, 10.0, 80.0, 80.0))
}

#[test]
fn png_decodes_to_spec_dimensions() {
    let src = source();
    let crop = completed();
    let t = TransformState::new();
    let spec = OutputSpec::new("Samsung Electronics", 300, 400, Some(Rgba8::WHITE), "").unwrap();

    let out = encode(&ExportRequest {
        source: &src,
        completed_crop: Some(&crop),
        transform: &t,
        spec: Some(&spec),
        use_background: true,
    })
    .unwrap();

    assert_eq!(out.filename, "Samsung Electronics_edited.png");
    assert_eq!((out.width, out.height), (300, 400));
    let decoded = image::load_from_memory_with_format(&out.bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 400));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn no_spec_uses_fallback_name_and_canvas() {
    let src = source();
    let crop = completed();
    let t = TransformState::new();
    let out = encode(&ExportRequest {
        source: &src,
        completed_crop: Some(&crop),
        transform: &t,
        spec: None,
        use_background: false,
    })
    .unwrap();
    assert_eq!(out.filename, FALLBACK_FILENAME);
    assert_eq!((out.width, out.height), (400, 400));
}

#[test]
fn transparent_margin_survives_encoding() {
    let src = source();
    let crop = completed();
    let t = TransformState::new();
    let spec = OutputSpec::new("Badge", 300, 400, Some(Rgba8::WHITE), "").unwrap();
    let out = encode(&ExportRequest {
        source: &src,
        completed_crop: Some(&crop),
        transform: &t,
        spec: Some(&spec),
        use_background: false,
    })
    .unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
}

#[test]
fn missing_completed_crop_delivers_nothing() {
    let src = source();
    let t = TransformState::new();
    let mut sink = InMemorySink::new();
    let err = export_to(
        &ExportRequest {
            source: &src,
            completed_crop: None,
            transform: &t,
            spec: None,
            use_background: false,
        },
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, PhotofitError::NoCropSelected));
    assert!(sink.images().is_empty());
}

#[test]
fn invalid_completed_crop_delivers_nothing() {
    let src = source();
    let t = TransformState::new();
    let bad = CompletedCrop::new(Crop::percent(90.0, 0.0, 20.0, 10.0));
    let mut sink = InMemorySink::new();
    let err = export_to(
        &ExportRequest {
            source: &src,
            completed_crop: Some(&bad),
            transform: &t,
            spec: None,
            use_background: false,
        },
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, PhotofitError::InvalidCropState(_)));
    assert!(sink.images().is_empty());
}

#[test]
fn export_to_delivers_once() {
    let src = source();
    let crop = completed();
    let t = TransformState::new();
    let mut sink = InMemorySink::new();
    export_to(
        &ExportRequest {
            source: &src,
            completed_crop: Some(&crop),
            transform: &t,
            spec: None,
            use_background: false,
        },
        &mut sink,
    )
    .unwrap();
    assert_eq!(sink.images().len(), 1);
}
