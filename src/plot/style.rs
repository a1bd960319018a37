use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Marker format strings ("b-", "r--o", "k:.")
// ---------------------------------------------------------------------------

/// How the line between points is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

/// Shape drawn at every data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointShape {
    Point,
    Circle,
    Cross,
    Plus,
    Square,
    TriangleUp,
    TriangleDown,
    Star,
    Diamond,
}

/// A parsed marker format: colour letter, optional line style, optional point.
///
/// Characters may come in any order, each part at most once. A format with
/// neither a line style nor a point shape draws a solid line.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub color: RGBColor,
    pub line: Option<LineStyle>,
    pub point: Option<PointShape>,
    source: String,
}

impl Default for Marker {
    fn default() -> Self {
        Marker {
            color: color_for('b').unwrap_or(RGBColor(0, 0, 255)),
            line: Some(LineStyle::Solid),
            point: None,
            source: "b-".to_string(),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty marker format".to_string());
        }

        let mut color = None;
        let mut line = None;
        let mut point = None;
        let mut rest = s;

        while let Some(c) = rest.chars().next() {
            let (parsed_line, used) = if rest.starts_with("--") {
                (Some(LineStyle::Dashed), 2)
            } else if rest.starts_with("-.") {
                (Some(LineStyle::DashDot), 2)
            } else if c == '-' {
                (Some(LineStyle::Solid), 1)
            } else if c == ':' {
                (Some(LineStyle::Dotted), 1)
            } else {
                (None, c.len_utf8())
            };

            if let Some(style) = parsed_line {
                if line.replace(style).is_some() {
                    return Err(format!("'{s}' sets the line style twice"));
                }
            } else if let Some(rgb) = color_for(c) {
                if color.replace(rgb).is_some() {
                    return Err(format!("'{s}' sets the colour twice"));
                }
            } else if let Some(shape) = shape_for(c) {
                if point.replace(shape).is_some() {
                    return Err(format!("'{s}' sets the point marker twice"));
                }
            } else {
                return Err(format!("'{c}' is not a colour, line style or marker"));
            }
            rest = &rest[used..];
        }

        if line.is_none() && point.is_none() {
            line = Some(LineStyle::Solid);
        }

        Ok(Marker {
            color: color.unwrap_or(RGBColor(0, 0, 255)),
            line,
            point,
            source: s.to_string(),
        })
    }
}

fn color_for(c: char) -> Option<RGBColor> {
    Some(match c {
        'b' => RGBColor(0, 0, 255),
        'g' => RGBColor(0, 128, 0),
        'r' => RGBColor(255, 0, 0),
        'c' => RGBColor(0, 191, 191),
        'm' => RGBColor(191, 0, 191),
        'y' => RGBColor(191, 191, 0),
        'k' => RGBColor(0, 0, 0),
        'w' => RGBColor(255, 255, 255),
        _ => return None,
    })
}

fn shape_for(c: char) -> Option<PointShape> {
    Some(match c {
        '.' => PointShape::Point,
        'o' => PointShape::Circle,
        'x' => PointShape::Cross,
        '+' => PointShape::Plus,
        's' => PointShape::Square,
        '^' => PointShape::TriangleUp,
        'v' => PointShape::TriangleDown,
        '*' => PointShape::Star,
        'd' => PointShape::Diamond,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Axis scale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            other => Err(format!("unknown scale '{other}'")),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Linear => f.write_str("linear"),
            Scale::Log => f.write_str("log"),
        }
    }
}
