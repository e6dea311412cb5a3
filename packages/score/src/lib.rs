#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Danger score normalization and the score-to-color gradient.
//!
//! Scores are non-negative and unbounded above, but everything visual
//! treats 100 as the ceiling. The color sweep runs green (safe) to red
//! (dangerous) through an HSV hue rotation, with a square-root curve so
//! the common low-score range stays visually distinguishable.

use serde::{Deserialize, Serialize};

/// The score value at and above which everything renders as maximally
/// dangerous.
pub const SCORE_CEILING: f64 = 100.0;

/// Clamps a raw danger score into `[0, 100]`.
///
/// Negative and non-finite inputs are treated as 0.
#[must_use]
pub fn clamped(score: f64) -> f64 {
    if !score.is_finite() || score < 0.0 {
        return 0.0;
    }
    score.min(SCORE_CEILING)
}

/// Normalizes a danger score into `[0, 1]` with a square-root curve.
///
/// The square root spreads low-danger values apart and compresses the
/// high end, where precision matters less.
#[must_use]
pub fn normalized(score: f64) -> f64 {
    (clamped(score) / SCORE_CEILING).sqrt()
}

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Formats as a CSS hex color, e.g. `#ff8800`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    /// Formats as a CSS functional color, e.g. `rgb(255, 136, 0)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Maps a danger score to its gradient color.
///
/// Score 0 is pure green (hue 1/3), the ceiling is pure red (hue 0),
/// saturation and value are fixed at 1. Pure and total: any float in
/// produces a color out.
#[must_use]
pub fn color_for(score: f64) -> Rgb {
    let t = normalized(score);
    hsv_to_rgb((1.0 - t) / 3.0, 1.0, 1.0)
}

/// Standard 6-sector HSV to RGB conversion.
///
/// `h`, `s`, `v` are all in `[0, 1]`; channels floor into `0..=255`.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::suboptimal_flops)]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = |c: f64| ((c * 255.0).floor().clamp(0.0, 255.0)) as u8;

    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_is_pure_green() {
        assert_eq!(color_for(0.0), Rgb { r: 0, g: 255, b: 0 });
    }

    #[test]
    fn ceiling_score_is_pure_red() {
        assert_eq!(color_for(100.0), Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn clamping_is_idempotent_above_ceiling() {
        assert_eq!(color_for(100.0), color_for(250.0));
        assert_eq!(color_for(100.0), color_for(1e9));
    }

    #[test]
    fn negative_and_nan_scores_read_as_zero() {
        assert_eq!(color_for(-5.0), color_for(0.0));
        assert_eq!(color_for(f64::NAN), color_for(0.0));
        assert!((clamped(-1.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn channels_cover_full_range() {
        for s in 0..=100 {
            let c = color_for(f64::from(s));
            // u8 bounds hold by construction; check the sweep stays on
            // the green-to-red edge of the color wheel.
            assert_eq!(c.b, 0, "score {s} produced a blue component");
        }
    }

    #[test]
    fn hue_decreases_monotonically_with_score() {
        let mut previous = 1.0 / 3.0;
        for s in 1..=100 {
            let t = normalized(f64::from(s));
            let hue = (1.0 - t) / 3.0;
            assert!(hue < previous, "hue did not decrease at score {s}");
            previous = hue;
        }
    }

    #[test]
    fn sqrt_curve_spreads_low_scores() {
        // 25 of 100 normalizes to 0.5, not 0.25.
        assert!((normalized(25.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rgb_formats_for_css() {
        let c = Rgb { r: 255, g: 136, b: 0 };
        assert_eq!(c.to_string(), "rgb(255, 136, 0)");
        assert_eq!(c.hex(), "#ff8800");
    }
}
