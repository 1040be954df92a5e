//! Packed ARGB pixels and sRGB transfer functions.

use std::fmt;
use std::sync::LazyLock;

/// A packed 32-bit texel: alpha in the high byte, then red, green, blue.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel(pub u32);

impl Pixel {
    /// Pack four channels.
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Pack `[r, g, b, a]` bytes, the memory order of an RGBA8 image.
    #[must_use]
    pub const fn from_rgba_bytes([r, g, b, a]: [u8; 4]) -> Self {
        Self::from_argb(a, r, g, b)
    }

    /// Unpack into `[r, g, b, a]` bytes.
    #[must_use]
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    /// Alpha channel.
    #[must_use]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// The color channels with alpha cleared.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// The same color with alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self(self.rgb() | ((a as u32) << 24))
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel({:#010X})", self.0)
    }
}

impl From<u32> for Pixel {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        pixel.0
    }
}

static SRGB_TO_LINEAR: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (value, entry) in (0u8..=255).zip(table.iter_mut()) {
        *entry = decode(f32::from(value) / 255.0);
    }
    table
});

fn decode(encoded: f32) -> f32 {
    if encoded <= 0.040_45 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

fn encode(linear: f32) -> f32 {
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Linear-light intensity in `[0, 1]` of an 8-bit sRGB channel.
#[must_use]
pub fn srgb_to_linear(channel: u8) -> f32 {
    SRGB_TO_LINEAR[usize::from(channel)]
}

/// Nearest 8-bit sRGB encoding of a linear-light intensity.
///
/// Inputs outside `[0, 1]` (including NaN) are clamped.
#[must_use]
// After clamping the scaled value lies in [0.5, 255.5), so the cast cannot
// truncate.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn linear_to_srgb(linear: f32) -> u8 {
    let linear = if linear.is_nan() {
        0.0
    } else {
        linear.clamp(0.0, 1.0)
    };
    (encode(linear) * 255.0 + 0.5) as u8
}

/// Encode linear-light channels to sRGB and pack them with `alpha`.
#[must_use]
pub fn pack_linear(r: f32, g: f32, b: f32, alpha: u8) -> Pixel {
    Pixel::from_argb(alpha, linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}
