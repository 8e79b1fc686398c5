use crate::catalog::model::BlendMode;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8, unit_to_u8};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for c in 0..3 {
        out[c] = add_sat_u8(src[c], mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

/// Composite `src` over `dst` in place; both premultiplied RGBA8 of equal length.
pub fn composite_in_place(dst: &mut [u8], src: &[u8], blend: BlendMode) -> AvatarResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AvatarError::Other(anyhow::anyhow!(
            "composite_in_place expects equal-length rgba8 buffers"
        )));
    }

    // Dispatch once per layer; each branch gets its own monomorphized kernel.
    match blend {
        BlendMode::Normal => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
            Ok(())
        }
        BlendMode::Multiply => blend_separable(dst, src, |s, d| s * d),
        BlendMode::Screen => blend_separable(dst, src, |s, d| s + d - s * d),
        BlendMode::Overlay => blend_separable(dst, src, |s, d| hard_light(d, s)),
        BlendMode::Darken => blend_separable(dst, src, |s, d| s.min(d)),
        BlendMode::Lighten => blend_separable(dst, src, |s, d| s.max(d)),
        BlendMode::ColorDodge => blend_separable(dst, src, |s, d| {
            if d <= 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => blend_separable(dst, src, |s, d| {
            if d >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }),
        BlendMode::SoftLight => blend_separable(dst, src, |s, d| {
            if s <= 0.5 {
                d - (1.0 - 2.0 * s) * d * (1.0 - d)
            } else {
                let g = if d <= 0.25 {
                    ((16.0 * d - 12.0) * d + 4.0) * d
                } else {
                    d.sqrt()
                };
                d + (2.0 * s - 1.0) * (g - d)
            }
        }),
        BlendMode::HardLight => blend_separable(dst, src, hard_light),
        BlendMode::Difference => blend_separable(dst, src, |s, d| (d - s).abs()),
        BlendMode::Exclusion => blend_separable(dst, src, |s, d| d + s - 2.0 * d * s),
    }
}

fn hard_light(s: f32, d: f32) -> f32 {
    if s <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

#[inline(always)]
fn blend_separable<F>(dst: &mut [u8], src: &[u8], blend_fn: F) -> AvatarResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }

        // W3C source-over with the blend applied to unpremultiplied channels:
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = f32::from(s[3]) / 255.0;
        let da = f32::from(d[3]) / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 {
                (dp / da).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = unit_to_u8(out_p);
        }
        d[3] = unit_to_u8(out_a);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
