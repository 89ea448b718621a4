use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::foundation::core::{Canvas, OverlayTransform, Point};
use crate::overlay::controller::ScrollDirection;

const GPX: &str = r#"<gpx><trk><trkseg>
  <trkpt lat="45.0" lon="-93.0"/>
  <trkpt lat="45.01" lon="-92.99"/>
</trkseg></trk></gpx>"#;

fn small_session() -> OverlaySession {
    OverlaySession::with_options(
        RasterOptions {
            canvas: Canvas {
                width: 64,
                height: 48,
            },
            padding: 0.1,
        },
        RouteStyle::default(),
    )
}

fn png_bytes(rgba: [u8; 4], w: u32, h: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(w, h);
    for px in img.pixels_mut() {
        *px = image::Rgba(rgba);
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn clear_drops_track_background_and_placement() {
    let mut s = small_session();
    s.load_track_xml(GPX).unwrap();
    s.load_background(&png_bytes([10, 20, 30, 255], 4, 4)).unwrap();
    s.controller_mut().pointer_down(Point::new(0.0, 0.0));
    s.controller_mut().pointer_move(Point::new(50.0, 50.0));
    s.controller_mut().wheel(ScrollDirection::Backward);

    s.clear();

    assert!(s.points().is_empty());
    assert!(!s.has_background());
    assert!(!s.controller().is_dragging());
    assert_eq!(s.controller().transform(), OverlayTransform::default());
}

#[test]
fn failed_track_load_keeps_the_previous_points() {
    let mut s = small_session();
    s.load_track_xml(GPX).unwrap();
    assert_eq!(s.points().len(), 2);

    let err = s.load_track_xml(r#"<gpx><trkpt lat=bad /></gpx>"#);
    assert!(err.is_err());
    assert_eq!(s.points().len(), 2);
}

#[test]
fn failed_background_load_keeps_the_previous_photo() {
    let mut s = small_session();
    s.load_background(&png_bytes([1, 2, 3, 255], 2, 2)).unwrap();
    assert!(s.load_background(b"garbage").is_err());
    assert!(s.has_background());
}

#[test]
fn route_raster_is_cached_until_an_input_changes() {
    let mut s = small_session();
    s.load_track_xml(GPX).unwrap();

    let first = Arc::clone(&s.route_image().unwrap().rgba8_premul);
    let second = Arc::clone(&s.route_image().unwrap().rgba8_premul);
    assert!(Arc::ptr_eq(&first, &second), "unchanged inputs reuse the raster");

    // A different track invalidates the cache.
    s.load_track_xml(
        r#"<gpx><trkpt lat="10.0" lon="10.0"/><trkpt lat="10.5" lon="10.5"/></gpx>"#,
    )
    .unwrap();
    let third = Arc::clone(&s.route_image().unwrap().rgba8_premul);
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn export_without_background_is_an_error() {
    let mut s = small_session();
    s.load_track_xml(GPX).unwrap();
    let err = s.export(ExportOptions::default()).unwrap_err();
    assert!(matches!(err, RouteError::Export(_)));
}

#[test]
fn export_composes_at_the_requested_scale() {
    let mut s = small_session();
    s.load_track_xml(GPX).unwrap();
    s.load_background(&png_bytes([40, 40, 40, 255], 8, 8)).unwrap();

    let frame = s
        .export(ExportOptions {
            viewport: Canvas {
                width: 32,
                height: 20,
            },
            pixel_ratio: 2.0,
        })
        .unwrap();
    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 40);
}

#[test]
fn empty_track_exports_the_photo_alone() {
    let mut s = small_session();
    s.load_background(&png_bytes([200, 100, 50, 255], 8, 8)).unwrap();
    let frame = s.export(ExportOptions::default()).unwrap();
    assert_eq!(frame.width, 800 * 2);
    assert_eq!(frame.height, 500 * 2);
}
