use std::sync::Arc;

use crate::foundation::core::{Canvas, GeoPoint, Point};
use crate::foundation::error::{RouteError, RouteResult};
use crate::foundation::math::Fnv1a64;
use crate::raster::project::project_points;

/// Stroke appearance of the rasterized route line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStyle {
    /// Straight (non-premultiplied) stroke color.
    pub stroke_rgba: [u8; 4],
    /// Stroke width in canvas pixels.
    pub stroke_width: f64,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            // Strava orange, #fc4c02.
            stroke_rgba: [0xfc, 0x4c, 0x02, 0xff],
            stroke_width: 5.0,
        }
    }
}

/// Canvas geometry for route rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Target canvas in pixels.
    pub canvas: Canvas,
    /// Bounds padding as a fraction of the raw geographic extent per side.
    pub padding: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 800,
                height: 600,
            },
            padding: 0.1,
        }
    }
}

/// A route stroked onto a transparent canvas.
#[derive(Clone, Debug)]
pub struct RasterizedRoute {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Premultiplied RGBA8 pixels, transparent except the stroke.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Fingerprint of the inputs that produced this raster.
    pub fingerprint: u64,
}

/// Fingerprint the inputs of [`rasterize_route`].
///
/// Equal inputs always hash equal, so callers can skip re-rasterizing when
/// nothing that feeds the raster has changed.
pub fn route_fingerprint(points: &[GeoPoint], opts: RasterOptions, style: RouteStyle) -> u64 {
    let mut h = Fnv1a64::new();
    h.write_u32(opts.canvas.width);
    h.write_u32(opts.canvas.height);
    h.write_f64(opts.padding);
    h.write_bytes(&style.stroke_rgba);
    h.write_f64(style.stroke_width);
    h.write_u64(points.len() as u64);
    for p in points {
        h.write_f64(p.lat);
        h.write_f64(p.lon);
    }
    h.finish()
}

/// Stroke a track onto a transparent canvas as a single polyline.
///
/// An empty track yields a fully transparent raster rather than an error;
/// a single point draws nothing visible for the same reason a one-point
/// polyline has no segments.
#[tracing::instrument(skip(points), fields(points = points.len()))]
pub fn rasterize_route(
    points: &[GeoPoint],
    opts: RasterOptions,
    style: RouteStyle,
) -> RouteResult<RasterizedRoute> {
    let (w, h) = canvas_dims_u16(opts.canvas)?;
    let fingerprint = route_fingerprint(points, opts, style);

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let projected = project_points(points, opts.canvas, opts.padding);

    if projected.len() >= 2 {
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let [r, g, b, a] = style.stroke_rgba;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.stroke_width));
        ctx.stroke_path(&polyline_to_cpu(&projected));
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
    }

    Ok(RasterizedRoute {
        width: opts.canvas.width,
        height: opts.canvas.height,
        rgba8_premul: Arc::new(pixmap.data_as_u8_slice().to_vec()),
        fingerprint,
    })
}

fn canvas_dims_u16(canvas: Canvas) -> RouteResult<(u16, u16)> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(RouteError::validation("canvas dimensions must be nonzero"));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| RouteError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| RouteError::validation("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn polyline_to_cpu(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(vello_cpu::kurbo::Point::new(first.x, first.y));
    }
    for p in iter {
        path.line_to(vello_cpu::kurbo::Point::new(p.x, p.y));
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/raster/draw.rs"]
mod tests;
