use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Dashboard colours
// ---------------------------------------------------------------------------

pub const BACKGROUND: Color32 = Color32::from_rgb(0x2C, 0x2F, 0x33);
pub const PANEL: Color32 = Color32::from_rgb(0x3A, 0x3D, 0x41);
pub const ACCENT: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);
pub const ERROR: Color32 = Color32::from_rgb(0xFF, 0x55, 0x55);
pub const OFFICIAL: Color32 = Color32::from_rgb(0x00, 0xCE, 0xD1);
pub const USER: Color32 = Color32::from_rgb(0xFF, 0x45, 0x00);
pub const HISTOGRAM: Color32 = Color32::from_rgb(0x32, 0xCD, 0x32);

// ---------------------------------------------------------------------------
// Palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    hue_ramp(n, 0.0, 360.0, 0.75, 0.55)
}

/// `n` shades sweeping from `start_hue` across `span` degrees, lightness
/// falling with rank so the first bar reads strongest.
pub fn ranked_palette(n: usize, start_hue: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let lightness = 0.45 + 0.3 * (i as f32 / n as f32);
            to_color32(Hsl::new(start_hue, 0.7, lightness))
        })
        .collect()
}

fn hue_ramp(n: usize, start: f32, span: f32, saturation: f32, lightness: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = start + (i as f32 / n as f32) * span;
            to_color32(Hsl::new(hue, saturation, lightness))
        })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Category colours: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (anime types) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map, assigning colours in the order labels are given.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn ranked_palette_gets_lighter() {
        let p = ranked_palette(5, 210.0);
        let luma = |c: &Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(luma(&p[0]) < luma(&p[4]));
    }

    #[test]
    fn unknown_label_falls_back_to_default() {
        let map = ColorMap::new(["TV", "Movie"]);
        assert_ne!(map.color_for("TV"), map.color_for("Movie"));
        assert_eq!(map.color_for("Music"), Color32::GRAY);
    }
}
