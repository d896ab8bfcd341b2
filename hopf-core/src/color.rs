/// Color mapping from base points to fiber colors
use std::f64::consts::TAU;

use crate::sphere::SpherePoint;

/// Saturation used for every base-point color.
pub const POINT_SATURATION: f64 = 0.7;

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// HSL to RGB. Hue wraps modulo 1; saturation and lightness are clamped.
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.hue.rem_euclid(1.0);
        let s = hsl.saturation.clamp(0.0, 1.0);
        let l = hsl.lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l as f32, l as f32, l as f32);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Self::new(
            hue_to_rgb(q, p, h + 1.0 / 3.0) as f32,
            hue_to_rgb(q, p, h) as f32,
            hue_to_rgb(q, p, h - 1.0 / 3.0) as f32,
        )
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Multiply every channel by `factor`, used for shading.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

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

/// HSL of a base point: hue follows the azimuth around the y axis, lightness
/// follows the height.
pub fn point_to_hsl(point: &SpherePoint) -> Hsl {
    let hue = point.x.atan2(point.z) / TAU + 0.5;
    let lightness = 0.15 * point.y + 0.5;

    Hsl {
        hue: (hue + 2.0 * lightness).rem_euclid(1.0),
        saturation: POINT_SATURATION,
        lightness,
    }
}

pub fn point_to_color(point: &SpherePoint) -> Color {
    Color::from_hsl(point_to_hsl(point))
}

/// Evenly spaced hues over the first half of the wheel, for distinguishing
/// `i_max` sweeps.
pub fn index_to_color(i: usize, i_max: usize) -> Color {
    let hue = if i_max == 0 {
        0.0
    } else {
        i as f64 / i_max as f64 / 2.0
    };
    Color::from_hsl(Hsl {
        hue,
        saturation: 0.5,
        lightness: 0.5,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_primary_hues() {
        let red = Color::from_hsl(Hsl { hue: 0.0, saturation: 1.0, lightness: 0.5 });
        assert_eq!(red, Color::RED);

        let green = Color::from_hsl(Hsl { hue: 1.0 / 3.0, saturation: 1.0, lightness: 0.5 });
        assert!(close(green.r, 0.0) && close(green.g, 1.0) && close(green.b, 0.0));

        let blue = Color::from_hsl(Hsl { hue: 2.0 / 3.0, saturation: 1.0, lightness: 0.5 });
        assert!(close(blue.r, 0.0) && close(blue.g, 0.0) && close(blue.b, 1.0));
    }

    #[test]
    fn test_gray_and_wrap() {
        let gray = Color::from_hsl(Hsl { hue: 0.3, saturation: 0.0, lightness: 0.25 });
        assert_eq!(gray, Color::new(0.25, 0.25, 0.25));

        let a = Color::from_hsl(Hsl { hue: 1.25, saturation: 0.7, lightness: 0.4 });
        let b = Color::from_hsl(Hsl { hue: 0.25, saturation: 0.7, lightness: 0.4 });
        assert!(close(a.r, b.r) && close(a.g, b.g) && close(a.b, b.b));
    }

    #[test]
    fn test_pole_lightness() {
        let north = point_to_hsl(&SpherePoint::new(0.0, 1.0, 0.0));
        assert!((north.lightness - 0.65).abs() < 1e-12);

        let south = point_to_hsl(&SpherePoint::new(0.0, -1.0, 0.0));
        assert!((south.lightness - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_hue_formula() {
        // (0, 0, 1): atan2(0, 1) = 0, so hue = 0.5 + 2 * 0.5 = 1.5 -> 0.5.
        let hsl = point_to_hsl(&SpherePoint::new(0.0, 0.0, 1.0));
        assert!((hsl.hue - 0.5).abs() < 1e-12);
        assert_eq!(hsl.saturation, POINT_SATURATION);

        // (1, 0, 0): atan2(1, 0) = π/2 -> 0.75, plus 1.0 -> 0.75.
        let hsl = point_to_hsl(&SpherePoint::new(1.0, 0.0, 0.0));
        assert!((hsl.hue - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_hue_depends_on_azimuth() {
        let a = point_to_color(&SpherePoint::new(1.0, 0.0, 0.0));
        let b = point_to_color(&SpherePoint::new(0.0, 0.0, 1.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_point_color_deterministic() {
        let p = SpherePoint::new(0.48, -0.6, 0.64);
        assert_eq!(point_to_color(&p), point_to_color(&p));
    }

    #[test]
    fn test_index_to_color() {
        assert_eq!(index_to_color(0, 4), Color::from_hsl(Hsl { hue: 0.0, saturation: 0.5, lightness: 0.5 }));
        let last = index_to_color(3, 4);
        let expected = Color::from_hsl(Hsl { hue: 0.375, saturation: 0.5, lightness: 0.5 });
        assert_eq!(last, expected);
        assert_eq!(index_to_color(2, 0), index_to_color(0, 4));
    }

    #[test]
    fn test_rgb8() {
        assert_eq!(Color::RED.to_rgb8(), (255, 0, 0));
        assert_eq!(Color::new(0.5, 2.0, -1.0).to_rgb8(), (128, 255, 0));
    }
}
