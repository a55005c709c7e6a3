use eframe::egui::Color32;
use palette::{IntoColor, Lab, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour scale for correlation values
// ---------------------------------------------------------------------------

/// Red → white → blue scale centred on zero, interpolated in Lab space.
#[derive(Debug, Clone)]
pub struct DivergingScale {
    negative: Lab,
    midpoint: Lab,
    positive: Lab,
    undefined: Color32,
}

impl Default for DivergingScale {
    fn default() -> Self {
        let lab = |r: f32, g: f32, b: f32| -> Lab { Srgb::new(r, g, b).into_color() };
        Self {
            negative: lab(0.70, 0.09, 0.17),
            midpoint: lab(0.97, 0.97, 0.97),
            positive: lab(0.13, 0.40, 0.67),
            undefined: Color32::GRAY,
        }
    }
}

impl DivergingScale {
    /// Colour for a value in `[-1, 1]`; `None` maps to the neutral grey.
    pub fn color_for(&self, value: Option<f64>) -> Color32 {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return self.undefined;
        };
        let t = value.clamp(-1.0, 1.0) as f32;
        let lab = if t < 0.0 {
            self.midpoint.mix(self.negative, -t)
        } else {
            self.midpoint.mix(self.positive, t)
        };
        let rgb: Srgb = lab.into_color();
        Color32::from_rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
    }

    /// Black or white, whichever reads better on top of `color_for(value)`.
    pub fn text_color_for(&self, value: Option<f64>) -> Color32 {
        match value {
            Some(v) if v.abs() > 0.6 => Color32::WHITE,
            _ => Color32::BLACK,
        }
    }
}

fn channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
