use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour scale
// ---------------------------------------------------------------------------

/// Viridis control points, evenly spaced from 0 to 1.
const VIRIDIS: [(u8, u8, u8); 10] = [
    (68, 1, 84),
    (72, 40, 120),
    (62, 73, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (110, 206, 88),
    (181, 222, 43),
    (253, 231, 37),
];

/// Maps a position in `[0, 1]` to a colour by interpolating between evenly
/// spaced stops in linear RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub name: &'static str,
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    pub fn viridis() -> Self {
        Self::from_stops("Viridis", &VIRIDIS)
    }

    fn from_stops(name: &'static str, stops: &[(u8, u8, u8)]) -> Self {
        let stops: Vec<LinSrgb> = stops
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { name, stops }
    }

    /// Colour at position `t`; values outside `[0, 1]` take the end colours.
    pub fn color_at(&self, t: f32) -> Color32 {
        let last = self.stops.len() - 1;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * last as f32;
        let i = (pos.floor() as usize).min(last);
        let color = if i == last {
            self.stops[last]
        } else {
            self.stops[i].mix(self.stops[i + 1], pos - i as f32)
        };
        to_color32(color)
    }

    /// Bottom colour of the scale.
    pub fn low_color(&self) -> Color32 {
        self.color_at(0.0)
    }

    /// Top colour of the scale.
    pub fn high_color(&self) -> Color32 {
        self.color_at(1.0)
    }
}

fn to_color32(color: LinSrgb) -> Color32 {
    let rgb: Srgb = Srgb::from_linear(color);
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Value range → scale position
// ---------------------------------------------------------------------------

/// Colour-scale bounds. Values outside are clamped to the end colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub low: f64,
    pub high: f64,
}

impl ColorRange {
    /// Build a range, swapping inverted bounds.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            ColorRange { low: a, high: b }
        } else {
            ColorRange { low: b, high: a }
        }
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    ///
    /// A degenerate range maps values above it to 1 and everything else to 0.
    pub fn position(&self, value: f64) -> f32 {
        let span = self.high - self.low;
        if span <= 0.0 {
            return if value > self.high { 1.0 } else { 0.0 };
        }
        ((value - self.low) / span).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_colours() {
        let scale = ColorScale::viridis();
        assert_eq!(scale.color_at(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(scale.color_at(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(scale.color_at(-3.0), scale.low_color());
        assert_eq!(scale.color_at(7.0), scale.high_color());
    }

    #[test]
    fn test_midpoint_lies_between_neighbours() {
        let scale = ColorScale::viridis();
        let mid = scale.color_at(0.5);
        assert_ne!(mid, scale.low_color());
        assert_ne!(mid, scale.high_color());
        // Viridis gets greener towards the top.
        assert!(scale.color_at(0.9).g() > scale.color_at(0.1).g());
    }

    #[test]
    fn test_range_clamps() {
        let range = ColorRange::new(-2.0, 2.0);
        assert_eq!(range.position(-5.0), 0.0);
        assert_eq!(range.position(0.0), 0.5);
        assert_eq!(range.position(9.0), 1.0);
    }

    #[test]
    fn test_degenerate_range_uses_extremes() {
        let range = ColorRange::new(0.0, 0.0);
        assert_eq!(range.position(-1.0), 0.0);
        assert_eq!(range.position(0.0), 0.0);
        assert_eq!(range.position(0.3), 1.0);
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        assert_eq!(ColorRange::new(2.0, -1.0), ColorRange::new(-1.0, 2.0));
    }
}
