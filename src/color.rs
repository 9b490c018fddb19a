use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DeviceColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from arbitrary numeric channels, clamping each
    /// one independently via [clamp_byte].
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_byte(r),
            g: clamp_byte(g),
            b: clamp_byte(b),
        }
    }

    /// The `0xRRGGBB` representation used by the platform API
    pub fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

impl std::fmt::Display for DeviceColor {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Rounds and bounds `n` to a byte. Non-finite input yields 0.
pub fn clamp_byte(n: f64) -> u8 {
    if !n.is_finite() {
        return 0;
    }
    n.round().clamp(0., 255.) as u8
}

/// Rounds and bounds `n` to `[min, max]`. Non-finite input yields `min`,
/// as does an inverted range.
pub fn clamp_int(n: f64, min: i64, max: i64) -> i64 {
    if !n.is_finite() {
        return min;
    }
    (n.round() as i64).min(max).max(min)
}

/// Packs the clamped channels as `(r << 16) | (g << 8) | b`,
/// which is always within `0..=0xffffff`.
#[allow(unused)]
pub fn rgb_to_packed_int(r: f64, g: f64, b: f64) -> u32 {
    DeviceColor::clamped(r, g, b).packed()
}

/// Approximates the RGB appearance of a black body at the given
/// color temperature, after Tanner Helland's fit.
/// <https://tannerhelland.com/2012/09/18/convert-temperature-rgb-algorithm-code.html>
///
/// The input is clamped to `1000..=40000` kelvin; non-finite input
/// is treated as 3000K.
pub fn kelvin_to_rgb_approx(kelvin: f64) -> DeviceColor {
    let kelvin = if kelvin.is_finite() { kelvin } else { 3000. };
    let temp = kelvin.clamp(1000., 40000.) / 100.;

    let (r, g, b) = if temp <= 66. {
        let g = 99.4708025861 * temp.ln() - 161.1195681661;
        let b = if temp <= 19. {
            0.
        } else {
            138.5177312231 * (temp - 10.).ln() - 305.0447927307
        };
        (255., g, b)
    } else {
        let r = 329.698727446 * (temp - 60.).powf(-0.1332047592);
        let g = 288.1221695283 * (temp - 60.).powf(-0.0755148492);
        (r, g, 255.)
    };

    DeviceColor::clamped(r, g, b)
}
