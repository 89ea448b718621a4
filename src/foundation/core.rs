pub use kurbo::{Point, Size, Vec2};

/// Geographic position in decimal degrees, as recorded by a GPS device.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (north positive).
    pub lat: f64,
    /// Longitude in decimal degrees (east positive).
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point from latitude and longitude in decimal degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Rectangular geographic extent enclosing a set of [`GeoPoint`]s.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoBounds {
    /// Southernmost latitude.
    pub min_lat: f64,
    /// Northernmost latitude.
    pub max_lat: f64,
    /// Westernmost longitude.
    pub min_lon: f64,
    /// Easternmost longitude.
    pub max_lon: f64,
}

impl GeoBounds {
    /// Componentwise min/max over a point sequence; `None` when empty.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in &points[1..] {
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
            b.min_lon = b.min_lon.min(p.lon);
            b.max_lon = b.max_lon.max(p.lon);
        }
        Some(b)
    }

    /// Longitude extent in degrees.
    pub fn width(self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude extent in degrees.
    pub fn height(self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Expand each axis by `fraction` of its current extent on both sides,
    /// keeping the drawn route inset from the canvas edges.
    pub fn expanded(self, fraction: f64) -> Self {
        let pad_lon = self.width() * fraction;
        let pad_lat = self.height() * fraction;
        Self {
            min_lat: self.min_lat - pad_lat,
            max_lat: self.max_lat + pad_lat,
            min_lon: self.min_lon - pad_lon,
            max_lon: self.max_lon + pad_lon,
        }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Default overlay edge length in viewport pixels (both dimensions).
pub const DEFAULT_OVERLAY_SIZE: f64 = 300.0;

/// Default overlay opacity.
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.7;

/// Interactive transform state for the route overlay.
///
/// This is the only mutable entity in the core; it is owned by
/// [`crate::OverlayController`] and reset whenever the session is cleared.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayTransform {
    /// Overlay top-left corner in viewport pixels. Unconstrained: the route
    /// can be dragged off-canvas.
    pub position: Vec2,
    /// Overlay box size in viewport pixels. Unconstrained: repeated zooming
    /// can shrink it toward zero or grow it without bound.
    pub size: Size,
    /// Overlay opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Size::new(DEFAULT_OVERLAY_SIZE, DEFAULT_OVERLAY_SIZE),
            opacity: DEFAULT_OVERLAY_OPACITY,
        }
    }
}
