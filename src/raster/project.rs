use crate::foundation::core::{Canvas, GeoBounds, GeoPoint, Point};

/// Minimum geographic extent, in degrees, used to widen degenerate bounds.
///
/// A single-point track (or one whose points are coincident) has zero
/// width and height; widening by half this amount per side keeps the
/// projection finite and lands the point in the canvas center.
pub const MIN_GEO_EXTENT: f64 = 1.0;

/// Placement of an aspect-fit rectangle inside a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    /// Width of the drawn region in pixels.
    pub draw_width: f64,
    /// Height of the drawn region in pixels.
    pub draw_height: f64,
    /// Left edge of the drawn region.
    pub x_offset: f64,
    /// Top edge of the drawn region.
    pub y_offset: f64,
}

impl FitRect {
    /// Contain-fit a geographic bounds into a canvas, centered.
    ///
    /// The bounds aspect ratio is preserved: a wide track fills the canvas
    /// width and is letterboxed vertically, a tall one the reverse.
    pub fn fit(bounds: &GeoBounds, canvas: Canvas) -> Self {
        let canvas_w = canvas.width as f64;
        let canvas_h = canvas.height as f64;
        let aspect = bounds.width() / bounds.height();

        let (draw_width, draw_height) = if aspect > 1.0 {
            (canvas_w, canvas_w / aspect)
        } else {
            (canvas_h * aspect, canvas_h)
        };

        Self {
            draw_width,
            draw_height,
            x_offset: (canvas_w - draw_width) / 2.0,
            y_offset: (canvas_h - draw_height) / 2.0,
        }
    }
}

/// Project geographic points into canvas pixel space.
///
/// Bounds are padded by `padding` (a fraction of each raw extent, applied
/// to every side), then contain-fit into the canvas. Latitude grows
/// northward while pixel y grows downward, so y is inverted against the
/// northern edge. An empty input projects to an empty output.
pub fn project_points(points: &[GeoPoint], canvas: Canvas, padding: f64) -> Vec<Point> {
    let Some(bounds) = GeoBounds::from_points(points) else {
        return Vec::new();
    };

    let mut bounds = bounds.expanded(padding);
    if bounds.width() <= 0.0 {
        bounds.min_lon -= MIN_GEO_EXTENT / 2.0;
        bounds.max_lon += MIN_GEO_EXTENT / 2.0;
    }
    if bounds.height() <= 0.0 {
        bounds.min_lat -= MIN_GEO_EXTENT / 2.0;
        bounds.max_lat += MIN_GEO_EXTENT / 2.0;
    }

    let rect = FitRect::fit(&bounds, canvas);
    let w = bounds.width();
    let h = bounds.height();

    points
        .iter()
        .map(|p| {
            Point::new(
                rect.x_offset + ((p.lon - bounds.min_lon) / w) * rect.draw_width,
                rect.y_offset + ((bounds.max_lat - p.lat) / h) * rect.draw_height,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/project.rs"]
mod tests;
