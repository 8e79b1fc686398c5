use std::io::Cursor;

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::decode::{DecodedLayer, decode_layer_file},
    foundation::error::{AvatarError, AvatarResult},
    foundation::math::unpremultiply_rgba8_in_place,
    render::blend::composite_in_place,
    select::plan::AvatarPlan,
};

/// Raster compositing capability injected into the generator.
///
/// Implementations are chosen once at process start. An implementation that cannot run reports
/// it through [`Compositor::is_available`]; the availability probe is the only place that
/// question is asked.
pub trait Compositor: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether this backend can render in the current process.
    fn is_available(&self) -> bool;

    /// Flatten the plan into one straight-alpha RGBA8 image.
    fn flatten(&self, plan: &AvatarPlan) -> AvatarResult<image::RgbaImage>;

    /// Flatten the plan and encode the result as PNG bytes.
    fn render_png(&self, plan: &AvatarPlan) -> AvatarResult<Vec<u8>> {
        let flat = self.flatten(plan)?;
        encode_png(&flat)
    }
}

/// Encode an RGBA8 image as PNG.
pub fn encode_png(img: &image::RgbaImage) -> AvatarResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode composite as PNG")?;
    Ok(buf)
}

#[derive(Clone, Copy, Debug, Default)]
/// CPU compositor backed by the `image` crate.
///
/// The base (lowest) layer defines the canvas; every overlay is placed at the origin and clipped
/// to the canvas. Blending runs over premultiplied RGBA8.
pub struct CpuCompositor;

impl Compositor for CpuCompositor {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn flatten(&self, plan: &AvatarPlan) -> AvatarResult<image::RgbaImage> {
        let decoded: Vec<DecodedLayer> = plan
            .layers()
            .par_iter()
            .map(|l| decode_layer_file(&l.layer, &l.item, &l.path))
            .collect::<AvatarResult<_>>()?;

        let mut layers = decoded.into_iter();
        let Some(base) = layers.next() else {
            return Err(AvatarError::no_traits_available(""));
        };
        let (width, height) = (base.width, base.height);
        let mut canvas = base.rgba8_premul;

        for (layer, planned) in layers.zip(plan.overlays()) {
            if layer.width == width && layer.height == height {
                composite_in_place(&mut canvas, &layer.rgba8_premul, planned.blend)?;
            } else {
                let fitted = fit_to_canvas(&layer, width, height);
                composite_in_place(&mut canvas, &fitted, planned.blend)?;
            }
        }

        unpremultiply_rgba8_in_place(&mut canvas);
        image::RgbaImage::from_raw(width, height, canvas).ok_or_else(|| {
            AvatarError::Other(anyhow::anyhow!(
                "composite buffer does not match {width}x{height}"
            ))
        })
    }
}

/// Copy `layer` into a transparent `width x height` buffer at the origin, clipping the excess.
fn fit_to_canvas(layer: &DecodedLayer, width: u32, height: u32) -> Vec<u8> {
    let mut out = vec![0u8; width as usize * height as usize * 4];
    let copy_w = layer.width.min(width) as usize * 4;
    let rows = layer.height.min(height) as usize;
    let src_stride = layer.width as usize * 4;
    let dst_stride = width as usize * 4;
    for y in 0..rows {
        let src = &layer.rgba8_premul[y * src_stride..y * src_stride + copy_w];
        out[y * dst_stride..y * dst_stride + copy_w].copy_from_slice(src);
    }
    out
}

#[derive(Clone, Debug)]
/// Stand-in used when no raster backend is present; never renders.
pub struct UnavailableCompositor {
    reason: String,
}

impl UnavailableCompositor {
    /// Backend that reports `reason` when asked to render.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableCompositor {
    fn default() -> Self {
        Self::new("no compositing backend configured")
    }
}

impl Compositor for UnavailableCompositor {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn flatten(&self, _plan: &AvatarPlan) -> AvatarResult<image::RgbaImage> {
        Err(AvatarError::dependency_unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
