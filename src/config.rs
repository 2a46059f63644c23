//! Picker configuration.
//!
//! Deserializes from camelCase keys (`sliderSize`, `smartPosition`, ...).
//! Enumerated options are case-insensitive; unknown keys and invalid enum
//! values are rejected when the configuration is read, before any instance
//! exists.

use std::fmt;
use std::str::FromStr;

use floem::kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::color::{Channel, ColorFormat};
use crate::error::PickerError;

macro_rules! string_enum {
    ($ty:ident, $option:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PickerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(PickerError::InvalidOption {
                        option: $option.into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = PickerError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.as_str().to_string()
            }
        }
    };
}

/// Requested input/output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatOption {
    /// Detected once from the initial value.
    #[default]
    Auto,
    /// Follows whatever notation was parsed last.
    Any,
    Hex,
    Rgb,
    Rgba,
}

string_enum!(FormatOption, "format", {
    Auto => "auto",
    Any => "any",
    Hex => "hex",
    Rgb => "rgb",
    Rgba => "rgba",
});

impl FormatOption {
    /// The concrete format, unless it has to be detected.
    pub fn fixed(self) -> Option<ColorFormat> {
        match self {
            FormatOption::Auto | FormatOption::Any => None,
            FormatOption::Hex => Some(ColorFormat::Hex),
            FormatOption::Rgb => Some(ColorFormat::Rgb),
            FormatOption::Rgba => Some(ColorFormat::Rgba),
        }
    }
}

/// Layout of the picker controls: hue on the pad's x axis, then the pad's
/// y channel, then the slider channel (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Hsv,
    Hvs,
    Hs,
    Hv,
}

string_enum!(Mode, "mode", {
    Hsv => "hsv",
    Hvs => "hvs",
    Hs => "hs",
    Hv => "hv",
});

/// Side of the target element the panel opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Side {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
}

string_enum!(Side, "position", {
    Left => "left",
    Right => "right",
    Top => "top",
    Bottom => "bottom",
});

/// Where the preview stripe goes inside a text input or labelled button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PreviewPosition {
    #[default]
    Left,
    Right,
}

string_enum!(PreviewPosition, "previewPosition", {
    Left => "left",
    Right => "right",
});

/// Saturation or value: the two channels a pad axis or slider can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvChannel {
    S,
    V,
}

impl From<SvChannel> for Channel {
    fn from(c: SvChannel) -> Channel {
        match c {
            SvChannel::S => Channel::S,
            SvChannel::V => Channel::V,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PickerConfig {
    pub format: FormatOption,
    /// Initial color text. Falls back to the value element's text.
    pub value: Option<String>,
    /// Initial alpha. Falls back to the alpha element's text.
    pub alpha: Option<f64>,
    /// Width of the preview stripe in a text input or labelled button.
    pub preview_size: f64,
    pub preview_position: PreviewPosition,
    /// Whether the value element may be left blank.
    pub required: bool,
    /// Whether typed color text is rewritten into canonical form.
    pub refine: bool,
    /// Prefix hex text with `#`.
    pub hash: bool,
    pub uppercase: bool,
    pub min_s: f64,
    pub max_s: f64,
    pub min_v: f64,
    pub max_v: f64,
    pub min_a: f64,
    pub max_a: f64,

    /// Pad width in px.
    pub width: f64,
    /// Pad (and slider) height in px.
    pub height: f64,
    pub mode: Mode,
    pub alpha_slider: bool,
    pub position: Side,
    pub smart_position: bool,
    pub show_on_click: bool,
    pub slider_size: f64,
    pub cross_size: f64,
    pub closable: bool,
    pub close_text: String,
    pub button_height: f64,
    pub padding: f64,
    pub border_width: f64,
    pub border_radius: f64,
    pub inset_width: f64,
    pub shadow: bool,
    pub shadow_blur: f64,
    pub shadow_color: String,
    pub pointer_border_width: f64,
    pub pointer_thickness: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            format: FormatOption::Auto,
            value: None,
            alpha: None,
            preview_size: 32.0,
            preview_position: PreviewPosition::Left,
            required: true,
            refine: true,
            hash: false,
            uppercase: true,
            min_s: 0.0,
            max_s: 100.0,
            min_v: 0.0,
            max_v: 100.0,
            min_a: 0.0,
            max_a: 1.0,
            width: 181.0,
            height: 101.0,
            mode: Mode::Hsv,
            alpha_slider: false,
            position: Side::Bottom,
            smart_position: true,
            show_on_click: true,
            slider_size: 16.0,
            cross_size: 8.0,
            closable: false,
            close_text: "Close".into(),
            button_height: 18.0,
            padding: 12.0,
            border_width: 1.0,
            border_radius: 8.0,
            inset_width: 1.0,
            shadow: true,
            shadow_blur: 15.0,
            shadow_color: "rgba(0,0,0,0.2)".into(),
            pointer_border_width: 1.0,
            pointer_thickness: 2.0,
        }
    }
}

impl PickerConfig {
    /// Check numeric ranges, collecting every problem into one error.
    pub fn validate(&self) -> Result<(), PickerError> {
        let mut errors: Vec<String> = Vec::new();

        validate_bounds(&mut errors, "S", self.min_s, self.max_s, 100.0);
        validate_bounds(&mut errors, "V", self.min_v, self.max_v, 100.0);
        validate_bounds(&mut errors, "A", self.min_a, self.max_a, 1.0);

        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value >= 2.0) {
                errors.push(format!("{name} = {value} must be at least 2"));
            }
        }
        for (name, value) in [
            ("previewSize", self.preview_size),
            ("sliderSize", self.slider_size),
            ("crossSize", self.cross_size),
            ("buttonHeight", self.button_height),
            ("padding", self.padding),
            ("borderWidth", self.border_width),
            ("borderRadius", self.border_radius),
            ("insetWidth", self.inset_width),
            ("shadowBlur", self.shadow_blur),
            ("pointerBorderWidth", self.pointer_border_width),
            ("pointerThickness", self.pointer_thickness),
        ] {
            if !(value >= 0.0) {
                errors.push(format!("{name} = {value} must not be negative"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!(errors = errors.len(), "rejected picker configuration");
            Err(PickerError::InvalidConfig(errors.join("; ")))
        }
    }

    /// Channel on the pad's vertical axis.
    pub fn pad_y_channel(&self) -> SvChannel {
        match self.mode {
            Mode::Hvs | Mode::Hv => SvChannel::V,
            Mode::Hsv | Mode::Hs => SvChannel::S,
        }
    }

    /// Channel driven by the slider, if the mode has one.
    pub fn slider_channel(&self) -> Option<SvChannel> {
        match self.mode {
            Mode::Hsv => Some(SvChannel::V),
            Mode::Hvs => Some(SvChannel::S),
            Mode::Hs | Mode::Hv => None,
        }
    }

    /// Gap between the pad and a slider, wide enough for slider pointers.
    pub fn pad_to_slider_padding(&self) -> f64 {
        self.padding
            .max(1.5 * (2.0 * self.pointer_border_width + self.pointer_thickness))
    }

    /// Outer size of the pad's cross pointer.
    pub fn cross_outer_size(&self) -> f64 {
        2.0 * self.pointer_border_width + self.pointer_thickness + 2.0 * self.cross_size
    }

    /// Panel corner radius, capped relative to the padding.
    pub fn effective_border_radius(&self) -> f64 {
        self.border_radius
            .min((self.padding * std::f64::consts::PI).round())
    }

    /// Panel size inside its border.
    pub fn picker_dims(&self, alpha_slider: bool) -> Size {
        let mut width = 2.0 * self.inset_width + 2.0 * self.padding + self.width;
        let mut height = 2.0 * self.inset_width + 2.0 * self.padding + self.height;
        let slider_space =
            2.0 * self.inset_width + self.pad_to_slider_padding() + self.slider_size;
        if self.slider_channel().is_some() {
            width += slider_space;
        }
        if alpha_slider {
            width += slider_space;
        }
        if self.closable {
            height += 2.0 * self.inset_width + self.padding + self.button_height;
        }
        Size::new(width, height)
    }

    /// Panel size including its border.
    pub fn picker_outer_dims(&self, alpha_slider: bool) -> Size {
        let dims = self.picker_dims(alpha_slider);
        Size::new(
            dims.width + 2.0 * self.border_width,
            dims.height + 2.0 * self.border_width,
        )
    }
}

fn validate_bounds(errors: &mut Vec<String>, channel: &str, min: f64, max: f64, limit: f64) {
    for (name, value) in [("min", min), ("max", max)] {
        if !(0.0..=limit).contains(&value) {
            errors.push(format!("{name}{channel} = {value} is out of range [0, {limit}]"));
        }
    }
    if min > max {
        errors.push(format!("min{channel} = {min} exceeds max{channel} = {max}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_validates() {
        assert!(PickerConfig::default().validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let config: PickerConfig = serde_json::from_str(
            r#"{ "format": "ANY", "mode": "hvs", "sliderSize": 20, "smartPosition": false }"#,
        )
        .unwrap();
        assert_eq!(config.format, FormatOption::Any);
        assert_eq!(config.mode, Mode::Hvs);
        assert_eq!(config.slider_size, 20.0);
        assert!(!config.smart_position);
        assert_eq!(config.width, 181.0);
    }

    #[test]
    fn rejects_invalid_enum_value() {
        let err = serde_json::from_str::<PickerConfig>(r#"{ "position": "middle" }"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("position"), "{err}");
    }

    #[test]
    fn rejects_unknown_option() {
        assert!(serde_json::from_str::<PickerConfig>(r#"{ "colour": "red" }"#).is_err());
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("Top".parse::<Side>().unwrap(), Side::Top);
        assert_eq!("RIGHT".parse::<PreviewPosition>().unwrap(), PreviewPosition::Right);
        assert_eq!(
            "diagonal".parse::<Side>(),
            Err(PickerError::InvalidOption {
                option: "position".into(),
                value: "diagonal".into(),
            })
        );
    }

    #[test]
    fn catches_inverted_bounds() {
        let config = PickerConfig {
            min_s: 80.0,
            max_s: 20.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("minS = 80 exceeds maxS = 20"), "{err}");
    }

    #[test]
    fn catches_out_of_range_alpha_and_tiny_pad() {
        let config = PickerConfig {
            max_a: 1.5,
            height: 1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("maxA"));
        assert!(err.contains("height"));
    }

    #[test]
    fn mode_selects_pad_and_slider_channels() {
        let mut config = PickerConfig::default();
        assert_eq!(config.pad_y_channel(), SvChannel::S);
        assert_eq!(config.slider_channel(), Some(SvChannel::V));
        config.mode = Mode::Hvs;
        assert_eq!(config.pad_y_channel(), SvChannel::V);
        assert_eq!(config.slider_channel(), Some(SvChannel::S));
        config.mode = Mode::Hv;
        assert_eq!(config.pad_y_channel(), SvChannel::V);
        assert_eq!(config.slider_channel(), None);
    }

    #[test]
    fn picker_dims_account_for_sliders_and_button() {
        let mut config = PickerConfig::default();
        // pad: 2*1 + 2*12 + 181 = 207; slider: 2*1 + 12 + 16 = 30
        assert_eq!(config.picker_dims(false), Size::new(237.0, 127.0));
        assert_eq!(config.picker_dims(true), Size::new(267.0, 127.0));
        config.closable = true;
        // button row: 2*1 + 12 + 18 = 32
        assert_eq!(config.picker_dims(false), Size::new(237.0, 159.0));
        assert_eq!(config.picker_outer_dims(false), Size::new(239.0, 161.0));
    }

    #[test]
    fn pad_to_slider_padding_never_below_pointer_width() {
        let config = PickerConfig {
            padding: 2.0,
            pointer_border_width: 2.0,
            pointer_thickness: 4.0,
            ..Default::default()
        };
        assert_eq!(config.pad_to_slider_padding(), 12.0);
    }
}
