use std::sync::Arc;

use super::*;
use crate::foundation::core::{Size, Vec2};

fn solid_image(rgba: [u8; 4], w: u32, h: u32) -> PreparedImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&rgba);
    }
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

fn solid_route(rgba: [u8; 4], w: u32, h: u32) -> RasterizedRoute {
    let img = solid_image(rgba, w, h);
    RasterizedRoute {
        width: w,
        height: h,
        rgba8_premul: img.rgba8_premul,
        fingerprint: 0,
    }
}

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn opts(w: u32, h: u32, ratio: f64) -> ExportOptions {
    ExportOptions {
        viewport: Canvas {
            width: w,
            height: h,
        },
        pixel_ratio: ratio,
    }
}

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

#[test]
fn pixel_ratio_scales_the_output_dimensions() {
    let bg = solid_image(RED, 10, 10);
    let frame = compose(&bg, None, opts(10, 10, 2.0)).unwrap();
    assert_eq!(frame.width, 20);
    assert_eq!(frame.height, 20);
    assert_eq!(frame.data.len(), 20 * 20 * 4);
}

#[test]
fn background_covers_the_whole_viewport() {
    // A 4x4 photo cover-fit into 8x8 fills every pixel; sample away from
    // the edges to stay clear of filtering.
    let bg = solid_image(RED, 4, 4);
    let frame = compose(&bg, None, opts(8, 8, 1.0)).unwrap();
    assert_eq!(pixel(&frame, 4, 4), RED);
    assert_eq!(pixel(&frame, 2, 6), RED);
}

#[test]
fn full_opacity_route_paints_over_the_background() {
    let bg = solid_image(RED, 8, 8);
    let route = solid_route(GREEN, 8, 8);
    let transform = OverlayTransform {
        position: Vec2::ZERO,
        size: Size::new(8.0, 8.0),
        opacity: 1.0,
    };
    let frame = compose(&bg, Some((&route, &transform)), opts(8, 8, 1.0)).unwrap();
    assert_eq!(pixel(&frame, 4, 4), GREEN);
}

#[test]
fn zero_opacity_route_leaves_the_background_untouched() {
    let bg = solid_image(RED, 8, 8);
    let route = solid_route(GREEN, 8, 8);
    let transform = OverlayTransform {
        position: Vec2::ZERO,
        size: Size::new(8.0, 8.0),
        opacity: 0.0,
    };
    let frame = compose(&bg, Some((&route, &transform)), opts(8, 8, 1.0)).unwrap();
    assert_eq!(pixel(&frame, 4, 4), RED);
}

#[test]
fn route_is_positioned_by_the_overlay_transform() {
    // 2x2 overlay box in the far corner of a 16x16 viewport; the center
    // of the viewport keeps the background color.
    let bg = solid_image(RED, 16, 16);
    let route = solid_route(GREEN, 2, 2);
    let transform = OverlayTransform {
        position: Vec2::new(12.0, 12.0),
        size: Size::new(2.0, 2.0),
        opacity: 1.0,
    };
    let frame = compose(&bg, Some((&route, &transform)), opts(16, 16, 1.0)).unwrap();
    assert_eq!(pixel(&frame, 8, 8), RED);
    assert_eq!(pixel(&frame, 13, 13), GREEN);
}

#[test]
fn non_positive_or_non_finite_pixel_ratio_is_rejected() {
    let bg = solid_image(RED, 4, 4);
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = compose(&bg, None, opts(8, 8, bad)).unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)), "ratio {bad}");
    }
}

#[test]
fn oversized_output_is_rejected() {
    let bg = solid_image(RED, 4, 4);
    let err = compose(&bg, None, opts(40_000, 8, 2.0)).unwrap_err();
    assert!(matches!(err, RouteError::Validation(_)));
}

#[test]
fn write_png_round_trips_through_the_decoder() {
    let bg = solid_image(RED, 4, 4);
    let frame = compose(&bg, None, opts(4, 4, 1.0)).unwrap();

    let path = std::env::temp_dir().join("routeshot-test-write-png/out.png");
    write_png(&frame, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let decoded = crate::assets::decode::decode_image(&bytes).unwrap();
    assert_eq!(decoded.width, 4);
    assert_eq!(decoded.height, 4);

    let _ = std::fs::remove_file(&path);
}
