use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Model → colour
// ---------------------------------------------------------------------------

/// Assigns every model of the dataset a fixed colour, so a model keeps its
/// colour in both charts however the selection changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(models: &[String]) -> Self {
        ColorMap {
            mapping: models.iter().cloned().zip(generate_palette(models.len())).collect(),
        }
    }

    pub fn color_for(&self, model: &str) -> Color32 {
        self.mapping.get(model).copied().unwrap_or(Color32::GRAY)
    }
}
