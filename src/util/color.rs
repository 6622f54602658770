//! Color-space conversions for generated materials.

use glam::Vec3;

/// Convert hue/saturation/value, each in `[0, 1]`, to RGB components.
///
/// Hue wraps, so `1.0` is the same red as `0.0`.
#[must_use]
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0) * 6.0;
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    // `sector` is in 0..6; 6 only appears through float rounding of 0.99999.
    match sector as u32 {
        0 | 6 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn primary_hues() {
        assert!(close(hsv_to_rgb(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Vec3::new(0.0, 0.0, 1.0)));
        assert!(close(hsv_to_rgb(1.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert!(close(hsv_to_rgb(0.7, 0.0, 0.4), Vec3::splat(0.4)));
    }

    #[test]
    fn zero_value_is_black() {
        assert_eq!(hsv_to_rgb(0.3, 0.8, 0.0), Vec3::ZERO);
    }
}
