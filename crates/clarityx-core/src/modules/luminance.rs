//! sRGB to relative luminance.

const RED_WEIGHT: f64 = 0.2126;
const GREEN_WEIGHT: f64 = 0.7152;
const BLUE_WEIGHT: f64 = 0.0722;

/// Below this normalized value the transfer curve is linear.
const LINEAR_THRESHOLD: f64 = 0.039_28;

/// Converts an sRGB triplet (channels in 0..=255, fractional means allowed)
/// to relative luminance in [0, 1].
#[must_use]
pub fn srgb_to_luminance(rgb: [f64; 3]) -> f64 {
    let [r, g, b] = rgb.map(|c| decode_channel(c / 255.0));
    RED_WEIGHT * r + GREEN_WEIGHT * g + BLUE_WEIGHT * b
}

fn decode_channel(c: f64) -> f64 {
    if c <= LINEAR_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
