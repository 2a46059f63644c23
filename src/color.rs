//! Color values, channel names and the textual encodings the picker reads
//! and writes: `#RRGGBB` (or `#RGB`), `rgb(r,g,b)` and `rgba(r,g,b,a)`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PickerError;
use crate::math;

/// Hex notation, 3 or 6 digits, tolerating non-word noise on either side.
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\W*([0-9A-F]{3}(?:[0-9A-F]{3})?)\W*$").unwrap());

/// `rgb(...)` / `rgba(...)` functional notation; components are split later.
static FUNC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\W*rgba?\(([^)]*)\)\W*$").unwrap());

/// A single numeric component. Both parts may be empty (`""` reads as 0).
static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d*)(\.\d+)?\s*$").unwrap());

/// Leading decimal number of a text field; whatever follows is ignored.
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?))").unwrap()
});

/// A concrete textual color notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Hex,
    Rgb,
    Rgba,
}

impl ColorFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorFormat::Hex => "hex",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Rgba => "rgba",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorFormat {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            "rgba" => Ok(ColorFormat::Rgba),
            _ => Err(PickerError::InvalidOption {
                option: "format".into(),
                value: s.into(),
            }),
        }
    }
}

/// Result of a successful [`parse_color_string`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Present only for `rgba(...)` input with a fourth component.
    pub a: Option<f64>,
    pub format: ColorFormat,
}

/// Parse hex, `rgb(...)` or `rgba(...)` text.
///
/// Returns `None` for anything else. Channel values are not clamped here;
/// the instance mutators do that.
pub fn parse_color_string(text: &str) -> Option<ParsedColor> {
    if let Some(caps) = HEX_RE.captures(text) {
        let digits = &caps[1];
        let channel = |i: usize| -> Option<f64> {
            let v = if digits.len() == 6 {
                u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?
            } else {
                u8::from_str_radix(&digits[i..i + 1], 16).ok()? * 17
            };
            Some(v as f64)
        };
        return Some(ParsedColor {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a: None,
            format: ColorFormat::Hex,
        });
    }

    let caps = FUNC_RE.captures(text)?;
    let params: Vec<&str> = caps[1].split(',').collect();
    if params.len() < 3 {
        return None;
    }
    let r = parse_component(params[0])?;
    let g = parse_component(params[1])?;
    let b = parse_component(params[2])?;
    let a = params.get(3).and_then(|p| parse_component(p));
    Some(ParsedColor {
        r,
        g,
        b,
        a,
        format: if a.is_some() {
            ColorFormat::Rgba
        } else {
            ColorFormat::Rgb
        },
    })
}

/// The number at the start of `text`, or NaN when there is none.
///
/// `"0.5;"` reads as 0.5 and `"  .25px"` as 0.25, so a typed value with
/// trailing noise still counts.
pub fn parse_float_prefix(text: &str) -> f64 {
    FLOAT_PREFIX_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(f64::NAN)
}

fn parse_component(param: &str) -> Option<f64> {
    let caps = COMPONENT_RE.captures(param)?;
    let int = caps.get(1).map_or("", |m| m.as_str());
    let frac = caps.get(2).map_or("", |m| m.as_str());
    let int = if int.is_empty() { "0" } else { int };
    format!("{int}{frac}").parse().ok()
}

/// `#RRGGBB`, uppercase.
pub fn format_hex(r: f64, g: f64, b: f64) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        to_byte(r),
        to_byte(g),
        to_byte(b)
    )
}

/// `rgb(r,g,b)` with integer channels.
pub fn format_rgb(r: f64, g: f64, b: f64) -> String {
    format!("rgb({},{},{})", to_byte(r), to_byte(g), to_byte(b))
}

/// `rgba(r,g,b,a)` with integer channels and alpha rounded to two decimals.
pub fn format_rgba(r: f64, g: f64, b: f64, a: f64) -> String {
    format!(
        "rgba({},{},{},{})",
        to_byte(r),
        to_byte(g),
        to_byte(b),
        round_alpha(a)
    )
}

/// Alpha rounded to two decimals, as shown in text fields.
pub fn round_alpha(a: f64) -> f64 {
    (a * 100.0).round() / 100.0
}

fn to_byte(c: f64) -> u8 {
    c.round().clamp(0.0, 255.0) as u8
}

/// Applies the `hash`/`uppercase` display options to `#RRGGBB` text.
pub fn style_hex(hex: &str, hash: bool, uppercase: bool) -> String {
    let body = hex.trim_start_matches('#');
    let body = if uppercase {
        body.to_ascii_uppercase()
    } else {
        body.to_ascii_lowercase()
    };
    if hash {
        format!("#{body}")
    } else {
        body
    }
}

/// Hue value passed to a mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hue {
    /// Hue is indeterminate (achromatic color).
    Undefined,
    Degrees(f64),
}

impl From<f64> for Hue {
    fn from(deg: f64) -> Self {
        Hue::Degrees(deg)
    }
}

/// A single color channel, named by its letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    H,
    S,
    V,
    A,
    R,
    G,
    B,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Channel::H => "h",
            Channel::S => "s",
            Channel::V => "v",
            Channel::A => "a",
            Channel::R => "r",
            Channel::G => "g",
            Channel::B => "b",
        };
        f.write_str(c)
    }
}

impl FromStr for Channel {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" => Ok(Channel::H),
            "s" => Ok(Channel::S),
            "v" => Ok(Channel::V),
            "a" => Ok(Channel::A),
            "r" => Ok(Channel::R),
            "g" => Ok(Channel::G),
            "b" => Ok(Channel::B),
            _ => Err(PickerError::UnknownChannel(s.into())),
        }
    }
}

/// Every representation of one instance's current color.
///
/// `r`, `g`, `b` are always derived from `h`, `s`, `v` and kept unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channels {
    /// Degrees, 0–360. `None` while the hue is undefined.
    pub h: Option<f64>,
    /// Percent, 0–100.
    pub s: f64,
    /// Percent, 0–100.
    pub v: f64,
    /// 0–255.
    pub r: f64,
    /// 0–255.
    pub g: f64,
    /// 0–255.
    pub b: f64,
    /// 0.0–1.0.
    pub a: f64,
}

impl Default for Channels {
    /// Opaque white.
    fn default() -> Self {
        Self {
            h: Some(0.0),
            s: 0.0,
            v: 100.0,
            r: 255.0,
            g: 255.0,
            b: 255.0,
            a: 1.0,
        }
    }
}

impl Channels {
    /// Recompute `r`, `g`, `b` from the HSV channels.
    pub(crate) fn derive_rgb(&mut self) {
        let (r, g, b) = math::hsv_to_rgb(self.h, self.s, self.v);
        self.r = r;
        self.g = g;
        self.b = b;
    }

    pub fn to_hex_string(&self) -> String {
        format_hex(self.r, self.g, self.b)
    }

    pub fn to_rgb_string(&self) -> String {
        format_rgb(self.r, self.g, self.b)
    }

    pub fn to_rgba_string(&self) -> String {
        format_rgba(self.r, self.g, self.b, self.a)
    }

    pub fn to_format(&self, format: ColorFormat) -> String {
        match format {
            ColorFormat::Hex => self.to_hex_string(),
            ColorFormat::Rgb => self.to_rgb_string(),
            ColorFormat::Rgba => self.to_rgba_string(),
        }
    }

    /// Rounded 0–255 RGBA bytes, alpha scaled to 0–255.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b),
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_prefix_ignores_trailing_text() {
        assert_eq!(parse_float_prefix("0.5;"), 0.5);
        assert_eq!(parse_float_prefix("  .25px"), 0.25);
        assert_eq!(parse_float_prefix("-1e2x"), -100.0);
        assert_eq!(parse_float_prefix("1."), 1.0);
        assert_eq!(parse_float_prefix("Infinity"), f64::INFINITY);
        assert!(parse_float_prefix("half").is_nan());
        assert!(parse_float_prefix("").is_nan());
    }

    #[test]
    fn parses_six_digit_hex() {
        let c = parse_color_string("#FF8000").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (255.0, 128.0, 0.0, None));
        assert_eq!(c.format, ColorFormat::Hex);
    }

    #[test]
    fn parses_three_digit_hex_without_hash() {
        let c = parse_color_string("f0a").unwrap();
        assert_eq!((c.r, c.g, c.b), (255.0, 0.0, 170.0));
    }

    #[test]
    fn hex_tolerates_surrounding_noise_and_case() {
        let c = parse_color_string("  #aBcDeF; ").unwrap();
        assert_eq!((c.r, c.g, c.b), (171.0, 205.0, 239.0));
    }

    #[test]
    fn parses_rgb_and_rgba() {
        let c = parse_color_string("rgb(10, 20.5, 30)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (10.0, 20.5, 30.0, None));
        assert_eq!(c.format, ColorFormat::Rgb);

        let c = parse_color_string("RGBA(0,255,0,.5)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0.0, 255.0, 0.0, Some(0.5)));
        assert_eq!(c.format, ColorFormat::Rgba);
    }

    #[test]
    fn rgba_notation_with_three_components_is_rgb() {
        let c = parse_color_string("rgba(1,2,3)").unwrap();
        assert_eq!(c.format, ColorFormat::Rgb);
    }

    #[test]
    fn unparseable_fourth_component_is_ignored() {
        let c = parse_color_string("rgba(1,2,3,x)").unwrap();
        assert_eq!(c.format, ColorFormat::Rgb);
        assert_eq!(c.a, None);
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_color_string("not a color"), None);
        assert_eq!(parse_color_string("#12"), None);
        assert_eq!(parse_color_string("#1234"), None);
        assert_eq!(parse_color_string("rgb(1,2)"), None);
        assert_eq!(parse_color_string("rgb(1,-2,3)"), None);
        assert_eq!(parse_color_string(""), None);
    }

    #[test]
    fn formats_each_notation() {
        assert_eq!(format_hex(255.0, 0.4, 15.6), "#FF0010");
        assert_eq!(format_rgb(254.5, 0.0, 1.2), "rgb(255,0,1)");
        assert_eq!(format_rgba(0.0, 255.0, 0.0, 0.5), "rgba(0,255,0,0.5)");
        assert_eq!(format_rgba(1.0, 2.0, 3.0, 1.0), "rgba(1,2,3,1)");
        assert_eq!(format_rgba(1.0, 2.0, 3.0, 0.333), "rgba(1,2,3,0.33)");
    }

    #[test]
    fn hex_styling_toggles_hash_and_case() {
        assert_eq!(style_hex("#ABCDEF", false, true), "ABCDEF");
        assert_eq!(style_hex("#ABCDEF", true, false), "#abcdef");
    }

    #[test]
    fn channel_names_are_case_insensitive() {
        assert_eq!("H".parse::<Channel>().unwrap(), Channel::H);
        assert_eq!("b".parse::<Channel>().unwrap(), Channel::B);
        assert!(matches!(
            "x".parse::<Channel>(),
            Err(PickerError::UnknownChannel(name)) if name == "x"
        ));
    }

    #[test]
    fn default_channels_are_opaque_white() {
        let c = Channels::default();
        assert_eq!(c.to_hex_string(), "#FFFFFF");
        assert_eq!(c.to_rgba8(), [255, 255, 255, 255]);
    }
}
