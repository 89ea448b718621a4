use std::path::Path;

use crate::assets::decode::{self, PreparedImage};
use crate::export::composite::{ExportOptions, FrameRgba, compose};
use crate::foundation::core::GeoPoint;
use crate::foundation::error::{RouteError, RouteResult};
use crate::overlay::controller::OverlayController;
use crate::raster::draw::{
    RasterOptions, RasterizedRoute, RouteStyle, rasterize_route, route_fingerprint,
};
use crate::track::gpx;

/// Everything needed to go from a track file and a photo to an exported
/// frame: the parsed points, the decoded background, the overlay
/// controller, and a cached route raster.
///
/// Loads are transactional: a failed track or background load leaves the
/// previously loaded data in place. The route raster is fingerprinted over
/// its inputs and only redrawn when one of them changes.
#[derive(Debug, Default)]
pub struct OverlaySession {
    points: Vec<GeoPoint>,
    background: Option<PreparedImage>,
    controller: OverlayController,
    raster_opts: RasterOptions,
    style: RouteStyle,
    route: Option<RasterizedRoute>,
}

impl OverlaySession {
    /// Create a session with default raster geometry and route style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with explicit raster geometry and route style.
    pub fn with_options(raster_opts: RasterOptions, style: RouteStyle) -> Self {
        Self {
            raster_opts,
            style,
            ..Self::default()
        }
    }

    /// Currently loaded track points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Whether a background photo is loaded.
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// The overlay controller, for feeding pointer and wheel input.
    pub fn controller_mut(&mut self) -> &mut OverlayController {
        &mut self.controller
    }

    /// Read-only view of the overlay controller.
    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    /// Load a track file, replacing the current points on success.
    ///
    /// Returns the number of points loaded. On failure the previous track
    /// survives unchanged.
    pub fn load_track(&mut self, path: &Path) -> RouteResult<usize> {
        let points = gpx::parse_track_file(path)?;
        self.points = points;
        Ok(self.points.len())
    }

    /// Load a track from GPX text, replacing the current points on success.
    pub fn load_track_xml(&mut self, xml: &str) -> RouteResult<usize> {
        let points = gpx::parse_gpx(xml)?;
        self.points = points;
        Ok(self.points.len())
    }

    /// Decode a background photo, replacing the current one on success.
    pub fn load_background(&mut self, bytes: &[u8]) -> RouteResult<()> {
        let prepared = decode::decode_image(bytes)?;
        self.background = Some(prepared);
        Ok(())
    }

    /// Read and decode a background photo from disk.
    pub fn load_background_file(&mut self, path: &Path) -> RouteResult<()> {
        let prepared = decode::decode_image_file(path)?;
        self.background = Some(prepared);
        Ok(())
    }

    /// Drop the track, the background, and the overlay placement at once.
    pub fn clear(&mut self) {
        self.points.clear();
        self.background = None;
        self.route = None;
        self.controller.reset();
    }

    /// The rasterized route for the current track, redrawn only when the
    /// track, canvas, or style changed since the last call.
    pub fn route_image(&mut self) -> RouteResult<&RasterizedRoute> {
        self.refresh_route()?;
        match &self.route {
            Some(r) => Ok(r),
            // refresh_route always fills the slot on success.
            None => Err(RouteError::validation("route raster unavailable")),
        }
    }

    /// Compose the current state into an export frame.
    ///
    /// Requires a loaded background. An empty track exports the photo
    /// alone.
    pub fn export(&mut self, opts: ExportOptions) -> RouteResult<FrameRgba> {
        self.refresh_route()?;
        let background = self
            .background
            .as_ref()
            .ok_or_else(|| RouteError::export("no background image loaded"))?;

        let transform = self.controller.transform();
        let route = match &self.route {
            Some(r) if !self.points.is_empty() => Some((r, &transform)),
            _ => None,
        };
        compose(background, route, opts)
    }

    fn refresh_route(&mut self) -> RouteResult<()> {
        let fingerprint = route_fingerprint(&self.points, self.raster_opts, self.style);
        if let Some(route) = &self.route
            && route.fingerprint == fingerprint
        {
            return Ok(());
        }
        self.route = Some(rasterize_route(&self.points, self.raster_opts, self.style)?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/session.rs"]
mod tests;
