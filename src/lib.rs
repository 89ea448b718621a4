//! Routeshot overlays a GPS-derived running route on top of a background
//! photo and exports the composite as a PNG.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: GPX text -> ordered `GeoPoint` sequence ([`parse_gpx`])
//! 2. **Project**: geographic coordinates -> canvas-space polyline,
//!    aspect-preserving and centered ([`project_points`])
//! 3. **Rasterize**: polyline -> transparent route image ([`rasterize_route`])
//! 4. **Transform**: interactive pan/zoom/opacity state ([`OverlayController`])
//! 5. **Compose**: background + positioned route -> flat RGBA frame
//!    ([`compose`]), written out as PNG ([`write_png`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: projection and rasterization are pure
//!   functions of their inputs.
//! - **Premultiplied RGBA8** end-to-end: decoded images, rasterized routes
//!   and composited frames all carry premultiplied pixels.
//!
//! [`OverlaySession`] ties the stages together and owns the only mutable
//! state (the overlay transform plus the cached route raster).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod overlay;
mod raster;
mod track;

pub use assets::decode::{PreparedImage, decode_image, decode_image_file};
pub use export::composite::{
    DEFAULT_EXPORT_FILE_NAME, DEFAULT_EXPORT_PIXEL_RATIO, ExportOptions, FrameRgba, compose,
    write_png,
};
pub use foundation::core::{
    Canvas, DEFAULT_OVERLAY_OPACITY, DEFAULT_OVERLAY_SIZE, GeoBounds, GeoPoint, OverlayTransform,
    Point, Size, Vec2,
};
pub use foundation::error::{RouteError, RouteResult};
pub use overlay::controller::{
    OverlayController, ScrollDirection, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
pub use overlay::session::OverlaySession;
pub use raster::draw::{
    RasterOptions, RasterizedRoute, RouteStyle, rasterize_route, route_fingerprint,
};
pub use raster::project::{FitRect, MIN_GEO_EXTENT, project_points};
pub use track::gpx::{
    FIT_UNSUPPORTED_MESSAGE, TrackFormat, parse_gpx, parse_track_file,
};
