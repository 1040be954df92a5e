//! Alpha-weighted, linear-light mipmap downsampling.
//!
//! A plain average of sRGB values darkens the result, and ignoring alpha
//! lets dark texels from fully transparent regions of cutout textures bleed
//! into their visible edges. [`blend`] averages in linear light and weights
//! each color by its alpha, while keeping the plain average for the output
//! alpha so coverage fades the same way a naive filter would.

use image::RgbaImage;

use crate::color::{pack_linear, srgb_to_linear, Pixel};

/// Downsample a 2×2 block into one texel.
///
/// `p00`/`p01` are the top row and `p10`/`p11` the bottom row. Rows are
/// blended first, then the two results. `_check_alpha` exists for call-site
/// compatibility with the filter this replaces and does not change the
/// result.
#[must_use]
pub fn blend(p00: Pixel, p01: Pixel, p10: Pixel, p11: Pixel, _check_alpha: bool) -> Pixel {
    blend2(blend2(p00, p01), blend2(p10, p11))
}

/// Blend two texels, weighting their colors by alpha.
///
/// - Equal alpha: unweighted linear-light average, alpha unchanged.
/// - One side fully transparent: the other side's color as-is, with its
///   alpha divided by four.
/// - Otherwise: alpha-weighted linear-light average, alpha is the plain
///   average of both.
#[must_use]
pub fn blend2(a: Pixel, b: Pixel) -> Pixel {
    let alpha_a = a.a();
    let alpha_b = b.a();

    if alpha_a == alpha_b {
        return average_rgb(a, b, alpha_a);
    }

    // The color is kept as-is, so quarter the alpha instead of halving it.
    if alpha_a == 0 {
        return b.with_alpha(alpha_b >> 2);
    }
    if alpha_b == 0 {
        return a.with_alpha(alpha_a >> 2);
    }

    let scale = 1.0 / (f32::from(alpha_a) + f32::from(alpha_b));
    let weight_a = f32::from(alpha_a) * scale;
    let weight_b = f32::from(alpha_b) * scale;

    let [r, g, b] = [
        (a.r(), b.r()),
        (a.g(), b.g()),
        (a.b(), b.b()),
    ]
    .map(|(x, y)| srgb_to_linear(x) * weight_a + srgb_to_linear(y) * weight_b);

    // Both are at most 255, so the average fits in a byte.
    #[expect(clippy::cast_possible_truncation)]
    let alpha = ((u16::from(alpha_a) + u16::from(alpha_b)) >> 1) as u8;

    pack_linear(r, g, b, alpha)
}

fn average_rgb(a: Pixel, b: Pixel, alpha: u8) -> Pixel {
    let [r, g, b] = [
        (a.r(), b.r()),
        (a.g(), b.g()),
        (a.b(), b.b()),
    ]
    .map(|(x, y)| (srgb_to_linear(x) + srgb_to_linear(y)) * 0.5);

    pack_linear(r, g, b, alpha)
}

/// Build a mip chain for `base` with up to `levels` reductions.
///
/// Element 0 of the result is a copy of `base`; each following level halves
/// both dimensions (rounding down) and filters every 2×2 block of the level
/// above through [`blend`]. Generation stops early once a dimension would
/// reach zero, so the result may hold fewer than `levels + 1` images.
#[must_use]
pub fn generate_mip_levels(base: &RgbaImage, levels: u32) -> Vec<RgbaImage> {
    let has_transparency = base.pixels().any(|texel| texel.0[3] == 0);

    let reachable = base.width().min(base.height()).checked_ilog2().unwrap_or(0);
    let mut chain = Vec::with_capacity(levels.min(reachable) as usize + 1);
    chain.push(base.clone());

    for level in 1..=levels {
        let Some(previous) = chain.last() else { break };
        let (width, height) = (previous.width() >> 1, previous.height() >> 1);
        if width == 0 || height == 0 {
            log::debug!(
                "Mip chain for {}x{} texture ends at level {}",
                base.width(),
                base.height(),
                level - 1
            );
            break;
        }

        let next = downsample(previous, width, height, has_transparency);
        chain.push(next);
    }

    chain
}

fn downsample(previous: &RgbaImage, width: u32, height: u32, check_alpha: bool) -> RgbaImage {
    let texel = |x: u32, y: u32| Pixel::from_rgba_bytes(previous.get_pixel(x, y).0);

    RgbaImage::from_fn(width, height, |x, y| {
        let (sx, sy) = (x * 2, y * 2);
        let blended = blend(
            texel(sx, sy),
            texel(sx + 1, sy),
            texel(sx, sy + 1),
            texel(sx + 1, sy + 1),
            check_alpha,
        );
        image::Rgba(blended.to_rgba_bytes())
    })
}
