use std::path::Path;

use anyhow::Context as _;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::foundation::core::GeoPoint;
use crate::foundation::error::{RouteError, RouteResult};

/// Fixed user-facing message attached to rejected FIT track files.
pub const FIT_UNSUPPORTED_MESSAGE: &str =
    "FIT file support coming soon! Please use GPX files for now.";

/// Track-file format recognized by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackFormat {
    /// GPX XML track file.
    Gpx,
    /// Binary FIT track file. Accepted for selection, never parsed.
    Fit,
}

impl TrackFormat {
    /// Sniff the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("gpx") {
            Some(Self::Gpx)
        } else if ext.eq_ignore_ascii_case("fit") {
            Some(Self::Fit)
        } else {
            None
        }
    }
}

/// Read a track file and produce its ordered point sequence.
///
/// FIT files are rejected up front with [`RouteError::UnsupportedFormat`];
/// so is any extension that is neither `.gpx` nor `.fit`.
pub fn parse_track_file(path: &Path) -> RouteResult<Vec<GeoPoint>> {
    match TrackFormat::from_path(path) {
        Some(TrackFormat::Gpx) => {
            let xml = std::fs::read_to_string(path)
                .with_context(|| format!("read track file '{}'", path.display()))?;
            parse_gpx(&xml)
        }
        Some(TrackFormat::Fit) => Err(RouteError::unsupported_format(FIT_UNSUPPORTED_MESSAGE)),
        None => Err(RouteError::unsupported_format(
            "Please upload a .fit or .gpx file",
        )),
    }
}

/// Parse GPX text into an ordered sequence of track points.
///
/// Every `trkpt` element is taken in document order, across tracks and
/// segments. An empty document yields an empty (valid) sequence, which is
/// distinct from the [`RouteError::Parse`] returned for malformed XML.
pub fn parse_gpx(xml: &str) -> RouteResult<Vec<GeoPoint>> {
    let mut reader = Reader::from_str(xml);
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.local_name().as_ref() == b"trkpt" => {
                let (lat, lon) = track_point_attrs(&e)?;
                // Zero doubles as the missing-value sentinel, so points on
                // the equator or prime meridian are dropped with it.
                if lat != 0.0 && lon != 0.0 {
                    points.push(GeoPoint::new(lat, lon));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(RouteError::parse(format!("malformed gpx: {e}"))),
            Ok(_) => {}
        }
    }

    tracing::debug!(points = points.len(), "parsed gpx track");
    Ok(points)
}

/// Extract `lat`/`lon` from a `trkpt` start tag, defaulting either to 0.0
/// when missing or unparseable.
fn track_point_attrs(e: &BytesStart<'_>) -> RouteResult<(f64, f64)> {
    let mut lat = 0.0f64;
    let mut lon = 0.0f64;

    for attr in e.attributes() {
        let attr = attr.map_err(|err| RouteError::parse(format!("bad trkpt attribute: {err}")))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = val.parse().unwrap_or(0.0),
            b"lon" => lon = val.parse().unwrap_or(0.0),
            _ => {}
        }
    }

    Ok((lat, lon))
}
