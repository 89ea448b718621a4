use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Canvas, OverlayTransform};
use crate::foundation::error::{RouteError, RouteResult};
use crate::raster::draw::RasterizedRoute;

/// Default supersampling factor applied to the export viewport.
pub const DEFAULT_EXPORT_PIXEL_RATIO: f64 = 2.0;
/// Default export file name.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "running-route-overlay.png";

/// A finished frame in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Premultiplied RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// Export geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOptions {
    /// Viewport the composition is laid out in, in CSS-like pixels.
    pub viewport: Canvas,
    /// Output pixels per viewport pixel. Must be finite and positive.
    pub pixel_ratio: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            viewport: Canvas {
                width: 800,
                height: 500,
            },
            pixel_ratio: DEFAULT_EXPORT_PIXEL_RATIO,
        }
    }
}

/// Compose the background photo and, optionally, the route overlay into a
/// single frame.
///
/// The background is cover-fit to the viewport (filling it completely,
/// cropping the longer axis) and the route raster is contain-fit inside the
/// overlay box given by `transform`, both centered. The whole scene is
/// scaled by `pixel_ratio`, so layout happens in viewport units while the
/// output is supersampled.
#[tracing::instrument(skip(background, route), fields(
    viewport_w = opts.viewport.width,
    viewport_h = opts.viewport.height,
))]
pub fn compose(
    background: &PreparedImage,
    route: Option<(&RasterizedRoute, &OverlayTransform)>,
    opts: ExportOptions,
) -> RouteResult<FrameRgba> {
    if !opts.pixel_ratio.is_finite() || opts.pixel_ratio <= 0.0 {
        return Err(RouteError::validation(format!(
            "pixel ratio must be finite and positive, got {}",
            opts.pixel_ratio
        )));
    }
    if background.width == 0 || background.height == 0 {
        return Err(RouteError::validation("background image is empty"));
    }

    let out_w = (opts.viewport.width as f64 * opts.pixel_ratio).round() as u32;
    let out_h = (opts.viewport.height as f64 * opts.pixel_ratio).round() as u32;
    let (w16, h16) = output_dims_u16(out_w, out_h)?;

    let vw = opts.viewport.width as f64;
    let vh = opts.viewport.height as f64;
    let ratio = vello_cpu::kurbo::Affine::scale(opts.pixel_ratio);

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);

    // Background: cover fit, centered, cropped by the viewport edges.
    {
        let bw = background.width as f64;
        let bh = background.height as f64;
        let scale = (vw / bw).max(vh / bh);
        let x_off = (vw - bw * scale) / 2.0;
        let y_off = (vh - bh * scale) / 2.0;

        let tr = ratio
            * vello_cpu::kurbo::Affine::translate((x_off, y_off))
            * vello_cpu::kurbo::Affine::scale(scale);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(tr);
        ctx.set_paint(image_paint(
            &background.rgba8_premul,
            background.width,
            background.height,
        )?);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh));
    }

    // Route overlay: contain fit inside the overlay box, centered.
    if let Some((raster, transform)) = route {
        let rw = raster.width as f64;
        let rh = raster.height as f64;
        let box_w = transform.size.width;
        let box_h = transform.size.height;
        if rw > 0.0 && rh > 0.0 && box_w > 0.0 && box_h > 0.0 {
            let scale = (box_w / rw).min(box_h / rh);
            let x_off = transform.position.x + (box_w - rw * scale) / 2.0;
            let y_off = transform.position.y + (box_h - rh * scale) / 2.0;

            let tr = ratio
                * vello_cpu::kurbo::Affine::translate((x_off, y_off))
                * vello_cpu::kurbo::Affine::scale(scale);
            let opacity = transform.opacity.clamp(0.0, 1.0) as f32;
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(tr);
            ctx.set_paint(image_paint(&raster.rgba8_premul, raster.width, raster.height)?);
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, rw, rh));
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRgba {
        width: out_w,
        height: out_h,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

/// Write a composed frame to disk as PNG, creating parent directories.
pub fn write_png(frame: &FrameRgba, path: &Path) -> RouteResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| RouteError::export(format!("write png '{}': {e}", path.display())))
}

fn output_dims_u16(width: u32, height: u32) -> RouteResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(RouteError::validation("output dimensions must be nonzero"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| RouteError::validation("output width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RouteError::validation("output height exceeds u16"))?;
    Ok((w, h))
}

fn image_paint(bytes: &[u8], width: u32, height: u32) -> RouteResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RouteResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RouteError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RouteError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RouteError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/export/composite.rs"]
mod tests;
