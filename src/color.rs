//! Discrete colour sequences for chart series.

use crate::models::Value;
use palette::{Hsl, IntoColor, Srgb};
use std::collections::BTreeMap;

/// plotly's 26-colour qualitative "Alphabet" sequence.
///
/// Cycled for charts with many series, where evenly spaced hues would
/// become indistinguishable.
pub const ALPHABET: [&str; 26] = [
    "#AA0DFE", "#3283FE", "#85660D", "#782AB6", "#565656", "#1C8356", "#16FF32", "#F7E1A0",
    "#E2E2E2", "#1CBE4F", "#C4451C", "#DEA0FD", "#FE00FA", "#325A9B", "#FEAF16", "#F8A19F",
    "#90AD1C", "#F6222E", "#1CFFCE", "#2ED9FF", "#B10DA1", "#C075A6", "#FC1CBF", "#B00068",
    "#FBE426", "#FA0087",
];

/// Generates `n` visually distinct colours using evenly spaced hues,
/// as `#rrggbb` strings.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Maps the categories of a column to colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, String>,
}

impl ColorMap {
    /// Fallback for values outside the map.
    pub const DEFAULT_COLOR: &'static str = "#808080";

    /// Build a colour map with evenly spaced hues, assigned in the given
    /// category order.
    pub fn new(categories: &[Value]) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(generate_palette(categories.len()))
            .collect();
        Self { mapping }
    }

    /// Build a colour map that cycles through a fixed sequence.
    pub fn cycled(categories: &[Value], sequence: &[&str]) -> Self {
        if sequence.is_empty() {
            return Self::new(categories);
        }
        let mapping = categories
            .iter()
            .cloned()
            .zip(sequence.iter().cycle().map(|c| c.to_string()))
            .collect();
        Self { mapping }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, value: &Value) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(Self::DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_palette() {
        assert!(generate_palette(0).is_empty());

        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert!(colors.iter().all(|c| c.starts_with('#') && c.len() == 7));
        // hue 0 at 75% saturation is a red
        assert!(colors[0].starts_with("#e"));

        let mut unique = colors.clone();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_color_map_lookup() {
        let map = ColorMap::new(&[Value::from("a"), Value::from("b")]);
        assert_ne!(map.color_for(&Value::from("a")), map.color_for(&Value::from("b")));
        assert_eq!(map.color_for(&Value::from("zzz")), ColorMap::DEFAULT_COLOR);
    }

    #[test]
    fn test_cycled_map_wraps_around() {
        let names: Vec<Value> = (0..30).map(|i| Value::from(format!("S{:02}", i))).collect();
        let map = ColorMap::cycled(&names, &ALPHABET);

        assert_eq!(map.color_for(&names[0]), ALPHABET[0]);
        assert_eq!(map.color_for(&names[25]), ALPHABET[25]);
        assert_eq!(map.color_for(&names[26]), ALPHABET[0]);
        assert_eq!(map.color_for(&names[29]), ALPHABET[3]);
    }

    #[test]
    fn test_alphabet_is_distinct() {
        let mut colors = ALPHABET.to_vec();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), ALPHABET.len());
    }
}
