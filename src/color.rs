use serde::{Deserialize, Serialize};

/// Linear RGB triple with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// HSL to RGB. Hue wraps, saturation and lightness clamp.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    /// Exact at both ends: `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Warm/cold blend keyed by `1 - temperature`: hot scenes lean warm.
pub fn temperature_tint(warm: Rgb, cold: Rgb, temperature: f32) -> Rgb {
    warm.lerp(cold, 1.0 - temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hsl_primaries() {
        let red = Rgb::from_hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-6);
        assert_relative_eq!(red.b, 0.0, epsilon = 1e-6);

        let blue = Rgb::from_hsl(2.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(blue.b, 1.0, epsilon = 1e-6);
        assert_relative_eq!(blue.r, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn grey_when_unsaturated() {
        let c = Rgb::from_hsl(0.6, 0.0, 0.4);
        assert_eq!(c, Rgb::new(0.4, 0.4, 0.4));
    }

    #[test]
    fn tint_endpoints() {
        let warm = Rgb::new(1.0, 0.0, 0.0);
        let cold = Rgb::new(0.0, 0.0, 1.0);
        assert_eq!(temperature_tint(warm, cold, 1.0), warm);
        assert_eq!(temperature_tint(warm, cold, 0.0), cold);
        let mid = temperature_tint(warm, cold, 0.5);
        assert_relative_eq!(mid.r, 0.5);
        assert_relative_eq!(mid.b, 0.5);
    }
}
