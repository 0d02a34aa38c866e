//! Fixed geometry and style of the footer annotation.

use crate::error::{FooterError, Result};

/// Rectangle in page-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Rect {
    pub const fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.left, self.bottom, self.right, self.top]
    }
}

/// Color tagged with its color space. Components are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Gray(f32),
    Rgb(f32, f32, f32),
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::Rgb(1.0, 1.0, 1.0);

    pub fn components(&self) -> Vec<f32> {
        match *self {
            Color::Gray(g) => vec![g],
            Color::Rgb(r, g, b) => vec![r, g, b],
            Color::Cmyk(c, m, y, k) => vec![c, m, y, k],
        }
    }

    /// Content-stream operator that sets this color for filling.
    pub fn fill_operator(&self) -> &'static str {
        match self {
            Color::Gray(_) => "g",
            Color::Rgb(..) => "rg",
            Color::Cmyk(..) => "k",
        }
    }

    /// Content-stream operator that sets this color for stroking.
    pub fn stroke_operator(&self) -> &'static str {
        match self {
            Color::Gray(_) => "G",
            Color::Rgb(..) => "RG",
            Color::Cmyk(..) => "K",
        }
    }

    /// Naive conversion used for the CSS-like default style string.
    pub fn to_rgb(&self) -> (f32, f32, f32) {
        match *self {
            Color::Gray(g) => (g, g, g),
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Cmyk(c, m, y, k) => (
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
        }
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(r), byte(g), byte(b))
    }

    fn validate(&self, what: &str) -> Result<()> {
        for c in self.components() {
            if !(0.0..=1.0).contains(&c) {
                return Err(FooterError::InvalidConfig(format!(
                    "{} component {} is outside [0, 1]",
                    what, c
                )));
            }
        }
        Ok(())
    }
}

/// Style record applied to every footer annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterConfig {
    pub rect: Rect,
    pub text_size: f32,
    pub font: &'static str,
    pub text_color: Color,
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl FooterConfig {
    pub const DEFAULT: FooterConfig = FooterConfig {
        rect: Rect::new(30.0, 15.0, 570.0, 35.0),
        text_size: 9.0,
        font: "SimSun",
        text_color: Color::BLACK,
        stroke_color: Color::WHITE,
        fill_color: Color::WHITE,
    };

    pub fn validate(&self) -> Result<()> {
        if !(self.text_size > 0.0) {
            return Err(FooterError::InvalidConfig(format!(
                "text size must be positive, got {}",
                self.text_size
            )));
        }
        if self.rect.width() <= 0.0 || self.rect.height() <= 0.0 {
            return Err(FooterError::InvalidConfig(format!(
                "rectangle {:?} is empty or inverted",
                self.rect.to_array()
            )));
        }
        if self.font.trim().is_empty() {
            return Err(FooterError::InvalidConfig("font name is empty".into()));
        }
        self.text_color.validate("text color")?;
        self.stroke_color.validate("stroke color")?;
        self.fill_color.validate("fill color")?;
        Ok(())
    }
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
