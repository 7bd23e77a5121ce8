use egui::{Align, Align2, Color32};

/// Dash pattern of a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

impl BorderStyle {
    pub const ALL: [BorderStyle; 5] = [
        BorderStyle::Solid,
        BorderStyle::Dash,
        BorderStyle::Dot,
        BorderStyle::DashDot,
        BorderStyle::DashDotDot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dash => "dash",
            BorderStyle::Dot => "dot",
            BorderStyle::DashDot => "dash-dot",
            BorderStyle::DashDotDot => "dash-dot-dot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == s)
    }

    /// Dash and gap lengths in multiples of the pen width, `None` for solid.
    pub(crate) fn pattern(&self) -> Option<(&'static [f32], &'static [f32])> {
        match self {
            BorderStyle::Solid => None,
            BorderStyle::Dash => Some((&[4.0], &[2.0])),
            BorderStyle::Dot => Some((&[1.0], &[2.0])),
            BorderStyle::DashDot => Some((&[4.0, 1.0], &[2.0, 2.0])),
            BorderStyle::DashDotDot => Some((&[4.0, 1.0, 1.0], &[2.0, 2.0, 2.0])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Placement of a shape's text inside its text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Default for TextAlignment {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAlign::Center,
            vertical: VerticalAlign::Center,
        }
    }
}

impl TextAlignment {
    /// Stored as `"<horizontal>-<vertical>"`, e.g. `"left-top"`.
    pub fn to_attribute(&self) -> String {
        let h = match self.horizontal {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        };
        let v = match self.vertical {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
            VerticalAlign::Bottom => "bottom",
        };
        format!("{h}-{v}")
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (h, v) = s.split_once('-')?;
        let horizontal = match h {
            "left" => HorizontalAlign::Left,
            "center" => HorizontalAlign::Center,
            "right" => HorizontalAlign::Right,
            _ => return None,
        };
        let vertical = match v {
            "top" => VerticalAlign::Top,
            "center" => VerticalAlign::Center,
            "bottom" => VerticalAlign::Bottom,
            _ => return None,
        };
        Some(Self { horizontal, vertical })
    }

    pub fn align2(&self) -> Align2 {
        let x = match self.horizontal {
            HorizontalAlign::Left => Align::Min,
            HorizontalAlign::Center => Align::Center,
            HorizontalAlign::Right => Align::Max,
        };
        let y = match self.vertical {
            VerticalAlign::Top => Align::Min,
            VerticalAlign::Center => Align::Center,
            VerticalAlign::Bottom => Align::Max,
        };
        Align2([x, y])
    }
}

/// Outline and fill of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pen_width: u32,
    pub border_color: Color32,
    pub border_style: BorderStyle,
    pub fill_color: Color32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            pen_width: 2,
            border_color: Color32::BLACK,
            border_style: BorderStyle::Solid,
            fill_color: Color32::WHITE,
        }
    }
}

impl ShapeStyle {
    pub fn pen_width(&self) -> u32 {
        self.pen_width
    }

    /// Pen width never drops below one pixel.
    pub fn set_pen_width(&mut self, width: u32) {
        self.pen_width = width.max(1);
    }

    pub fn stroke(&self) -> egui::Stroke {
        egui::Stroke::new(self.pen_width as f32, self.border_color)
    }
}

/// Text content and font of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_color: Color32,
    pub alignment: TextAlignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: "Arial".to_owned(),
            font_size: 9,
            bold: false,
            italic: false,
            underline: false,
            font_color: Color32::BLACK,
            alignment: TextAlignment::default(),
        }
    }
}

impl TextStyle {
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.max(1);
    }

    pub fn font_id(&self) -> egui::FontId {
        let family = if self.font_family.eq_ignore_ascii_case("monospace")
            || self.font_family.eq_ignore_ascii_case("courier new")
        {
            egui::FontFamily::Monospace
        } else {
            egui::FontFamily::Proportional
        };
        // Point sizes are a little small for egui's default fonts
        egui::FontId::new(self.font_size as f32 * 4.0 / 3.0, family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_style_names_parse_back() {
        for style in BorderStyle::ALL {
            assert_eq!(BorderStyle::parse(style.as_str()), Some(style));
        }
        assert_eq!(BorderStyle::parse("wavy"), None);
    }

    #[test]
    fn alignment_attribute_format() {
        let alignment = TextAlignment {
            horizontal: HorizontalAlign::Left,
            vertical: VerticalAlign::Bottom,
        };
        assert_eq!(alignment.to_attribute(), "left-bottom");
        assert_eq!(TextAlignment::parse("left-bottom"), Some(alignment));
        assert_eq!(TextAlignment::parse("middle"), None);
    }

    #[test]
    fn pen_width_is_at_least_one() {
        let mut style = ShapeStyle::default();
        assert_eq!(style.pen_width(), 2);
        style.set_pen_width(0);
        assert_eq!(style.pen_width(), 1);
    }
}
