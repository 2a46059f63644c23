//! One picker instance: its color state, the mutation/query contract, and
//! the notifications it sends to whoever renders it.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::color::{
    self, parse_color_string, Channel, Channels, ColorFormat, Hue,
};
use crate::config::{FormatOption, PickerConfig, PreviewPosition};
use crate::element::{Bindings, ElementId};
use crate::error::{ChannelError, ColorParseError, PickerError};
use crate::math;
use crate::pointer::PanelGeometry;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`ColorInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which dependent surfaces an exposure should leave alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExposeFlags {
    pub leave_value: bool,
    pub leave_alpha: bool,
    pub leave_style: bool,
}

impl ExposeFlags {
    pub const NONE: Self = Self {
        leave_value: false,
        leave_alpha: false,
        leave_style: false,
    };
    pub const LEAVE_VALUE: Self = Self {
        leave_value: true,
        ..Self::NONE
    };
    pub const LEAVE_ALPHA: Self = Self {
        leave_alpha: true,
        ..Self::NONE
    };
    pub const LEAVE_STYLE: Self = Self {
        leave_style: true,
        ..Self::NONE
    };
}

impl std::ops::BitOr for ExposeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            leave_value: self.leave_value || rhs.leave_value,
            leave_alpha: self.leave_alpha || rhs.leave_alpha,
            leave_style: self.leave_style || rhs.leave_style,
        }
    }
}

/// Color-change notifications delivered to callbacks and bound elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// Fired repeatedly while the color is being changed.
    Input,
    /// Fired once a change is complete.
    Change,
}

impl PickerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            PickerEvent::Input => "input",
            PickerEvent::Change => "change",
        }
    }
}

impl fmt::Display for PickerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickerEvent {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Ok(PickerEvent::Input),
            "change" => Ok(PickerEvent::Change),
            _ => Err(PickerError::InvalidOption {
                option: "event".into(),
                value: s.into(),
            }),
        }
    }
}

/// How the preview element should show the current color.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// `rgba(...)` text of the color, drawn over a checkerboard.
    pub color: String,
    /// Side of the stripe for text inputs and labelled buttons; `None`
    /// fills the whole element.
    pub stripe: Option<PreviewPosition>,
    /// Replacement paddings; `None` restores the element's original one.
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
}

/// Receives everything an instance wants shown. Implemented by the layer
/// that owns the actual widgets.
pub trait ColorSink {
    fn value_text(&mut self, _element: ElementId, _text: &str) {}

    fn alpha_text(&mut self, _element: ElementId, _text: &str) {}

    fn preview(&mut self, _element: ElementId, _preview: &Preview) {}

    /// Remove the preview background (e.g. the text is not a color).
    fn clear_preview(&mut self, _element: ElementId) {}

    /// Only sent while the instance owns the shared panel.
    fn redraw_panel(&mut self, _geometry: &PanelGeometry) {}

    /// Emit `event` on the value element, if any.
    fn dispatch(&mut self, _element: Option<ElementId>, _event: PickerEvent) {}
}

pub type Callback = Box<dyn FnMut(&mut ColorInstance)>;

/// Builds a [`ColorInstance`] and establishes its initial color.
pub struct InstanceBuilder {
    config: PickerConfig,
    bindings: Bindings,
    sink: Option<Box<dyn ColorSink>>,
    on_change: Option<Callback>,
    on_input: Option<Callback>,
    value_text: Option<String>,
    alpha_text: Option<String>,
}

impl InstanceBuilder {
    pub fn target(&self) -> ElementId {
        self.bindings.target.id
    }

    pub fn sink(mut self, sink: impl ColorSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn on_change(mut self, f: impl FnMut(&mut ColorInstance) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_input(mut self, f: impl FnMut(&mut ColorInstance) + 'static) -> Self {
        self.on_input = Some(Box::new(f));
        self
    }

    /// Current text of the value element.
    pub fn value_text(mut self, text: impl Into<String>) -> Self {
        self.value_text = Some(text.into());
        self
    }

    /// Current text of the alpha element.
    pub fn alpha_text(mut self, text: impl Into<String>) -> Self {
        self.alpha_text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<ColorInstance, PickerError> {
        self.config.validate()?;

        // The configured value wins over whatever the value element holds.
        let init_value = self
            .config
            .value
            .clone()
            .or_else(|| self.bindings.value.and(self.value_text.clone()))
            .unwrap_or_default();

        let init_alpha = match self.config.alpha {
            Some(a) => Some(a.to_string()),
            None => self
                .bindings
                .alpha
                .and(self.alpha_text.clone())
                .filter(|t| !t.is_empty()),
        };

        let current_format = self.config.format.fixed().unwrap_or_else(|| {
            parse_color_string(&init_value).map_or(ColorFormat::Hex, |c| c.format)
        });

        let mut inst = ColorInstance {
            id: InstanceId::next(),
            config: self.config,
            bindings: self.bindings,
            channels: Channels::default(),
            current_format,
            active: false,
            fixed: None,
            on_change: self.on_change,
            on_input: self.on_input,
            sink: self.sink,
        };
        debug!(
            id = ?inst.id,
            target = %inst.bindings.target.id,
            format = %inst.current_format,
            "installed color picker"
        );

        inst.process_value_input(&init_value);
        if let Some(alpha) = init_alpha {
            inst.process_alpha_input(&alpha);
        }
        Ok(inst)
    }
}

/// A picker attached to one target element.
pub struct ColorInstance {
    id: InstanceId,
    config: PickerConfig,
    bindings: Bindings,
    channels: Channels,
    current_format: ColorFormat,
    /// Set while this instance owns the shared panel.
    active: bool,
    /// Whether the target sits inside a fixed-position ancestor. Resolved
    /// the first time the panel is shown.
    fixed: Option<bool>,
    on_change: Option<Callback>,
    on_input: Option<Callback>,
    sink: Option<Box<dyn ColorSink>>,
}

impl fmt::Debug for ColorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorInstance")
            .field("id", &self.id)
            .field("target", &self.bindings.target.id)
            .field("channels", &self.channels)
            .field("current_format", &self.current_format)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Renders the color in the current format.
impl fmt::Display for ColorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_format(self.current_format))
    }
}

fn check(value: Option<f64>, channel: Channel) -> Result<(), ChannelError> {
    match value {
        Some(v) if v.is_nan() => Err(ChannelError::NotANumber(channel)),
        _ => Ok(()),
    }
}

impl ColorInstance {
    pub fn builder(config: PickerConfig, bindings: Bindings) -> InstanceBuilder {
        InstanceBuilder {
            config,
            bindings,
            sink: None,
            on_change: None,
            on_input: None,
            value_text: None,
            alpha_text: None,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn target(&self) -> ElementId {
        self.bindings.target.id
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    pub fn current_format(&self) -> ColorFormat {
        self.current_format
    }

    /// Whether this instance currently owns the shared panel.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the target sits inside a fixed-position ancestor. False until
    /// the panel has been shown once.
    pub fn is_fixed(&self) -> bool {
        self.fixed.unwrap_or(false)
    }

    /// The fixed-position flag, resolving it with `resolve` on first use.
    pub(crate) fn fixed_or_resolve(&mut self, resolve: impl FnOnce() -> bool) -> bool {
        *self.fixed.get_or_insert_with(resolve)
    }

    pub fn set_sink(&mut self, sink: impl ColorSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn set_on_change(&mut self, f: impl FnMut(&mut ColorInstance) + 'static) {
        self.on_change = Some(Box::new(f));
    }

    pub fn set_on_input(&mut self, f: impl FnMut(&mut ColorInstance) + 'static) {
        self.on_input = Some(Box::new(f));
    }

    /// Whether the panel shows an alpha slider for this instance.
    pub fn has_alpha_slider(&self) -> bool {
        self.config.alpha_slider
            || self.bindings.alpha.is_some()
            || self.current_format == ColorFormat::Rgba
    }

    fn clamp_s(&self, s: f64) -> f64 {
        s.min(100.0).min(self.config.max_s).max(0.0).max(self.config.min_s)
    }

    fn clamp_v(&self, v: f64) -> f64 {
        v.min(100.0).min(self.config.max_v).max(0.0).max(self.config.min_v)
    }

    fn clamp_a(&self, a: f64) -> f64 {
        a.min(1.0).min(self.config.max_a).max(0.0).max(self.config.min_a)
    }

    /// Set any of hue (degrees), saturation, value (percent) and alpha.
    ///
    /// `None` leaves a channel unchanged; `Some(Hue::Undefined)` marks the
    /// hue indeterminate. A NaN anywhere rejects the whole call.
    pub fn from_hsva(
        &mut self,
        h: Option<Hue>,
        s: Option<f64>,
        v: Option<f64>,
        a: Option<f64>,
    ) -> Result<(), ChannelError> {
        self.from_hsva_flags(h, s, v, a, ExposeFlags::NONE)
    }

    pub fn from_hsva_flags(
        &mut self,
        h: Option<Hue>,
        s: Option<f64>,
        v: Option<f64>,
        a: Option<f64>,
        flags: ExposeFlags,
    ) -> Result<(), ChannelError> {
        if let Some(Hue::Degrees(deg)) = h {
            check(Some(deg), Channel::H)?;
        }
        check(s, Channel::S)?;
        check(v, Channel::V)?;
        check(a, Channel::A)?;

        if let Some(h) = h {
            self.channels.h = match h {
                Hue::Undefined => None,
                Hue::Degrees(deg) => Some(deg.clamp(0.0, 360.0)),
            };
        }
        if let Some(s) = s {
            self.channels.s = self.clamp_s(s);
        }
        if let Some(v) = v {
            self.channels.v = self.clamp_v(v);
        }
        if let Some(a) = a {
            self.channels.a = self.clamp_a(a);
        }
        self.channels.derive_rgb();
        trace!(id = ?self.id, channels = ?self.channels, "color set from hsva");

        self.expose_color(flags);
        Ok(())
    }

    /// Set any of red, green, blue (0–255) and alpha.
    ///
    /// RGB is converted to HSV, clamped there, and converted back, so the
    /// stored RGB always reflects the saturation/value bounds.
    pub fn from_rgba(
        &mut self,
        r: Option<f64>,
        g: Option<f64>,
        b: Option<f64>,
        a: Option<f64>,
    ) -> Result<(), ChannelError> {
        self.from_rgba_flags(r, g, b, a, ExposeFlags::NONE)
    }

    pub fn from_rgba_flags(
        &mut self,
        r: Option<f64>,
        g: Option<f64>,
        b: Option<f64>,
        a: Option<f64>,
        flags: ExposeFlags,
    ) -> Result<(), ChannelError> {
        check(r, Channel::R)?;
        check(g, Channel::G)?;
        check(b, Channel::B)?;
        check(a, Channel::A)?;

        let r = r.map_or(self.channels.r, |r| r.clamp(0.0, 255.0));
        let g = g.map_or(self.channels.g, |g| g.clamp(0.0, 255.0));
        let b = b.map_or(self.channels.b, |b| b.clamp(0.0, 255.0));
        if let Some(a) = a {
            self.channels.a = self.clamp_a(a);
        }

        let (h, s, v) = math::rgb_to_hsv(r, g, b);
        // An achromatic color keeps the previous hue.
        if let Some(h) = h {
            self.channels.h = Some(h.clamp(0.0, 360.0));
        }
        // Black keeps the previous saturation.
        if v != 0.0 {
            self.channels.s = self.clamp_s(s);
        }
        self.channels.v = self.clamp_v(v);
        self.channels.derive_rgb();
        trace!(id = ?self.id, channels = ?self.channels, "color set from rgba");

        self.expose_color(flags);
        Ok(())
    }

    #[deprecated(note = "use `from_hsva` instead")]
    pub fn from_hsv(
        &mut self,
        h: Option<Hue>,
        s: Option<f64>,
        v: Option<f64>,
    ) -> Result<(), ChannelError> {
        warn!("from_hsv() is deprecated, using from_hsva()");
        self.from_hsva(h, s, v, None)
    }

    #[deprecated(note = "use `from_rgba` instead")]
    pub fn from_rgb(
        &mut self,
        r: Option<f64>,
        g: Option<f64>,
        b: Option<f64>,
    ) -> Result<(), ChannelError> {
        warn!("from_rgb() is deprecated, using from_rgba()");
        self.from_rgba(r, g, b, None)
    }

    /// Set the color from hex, `rgb(...)` or `rgba(...)` text.
    ///
    /// With the `any` format, the parsed notation becomes the current one.
    pub fn from_string(&mut self, text: &str) -> Result<(), ColorParseError> {
        self.from_string_flags(text, ExposeFlags::NONE)
    }

    pub fn from_string_flags(
        &mut self,
        text: &str,
        flags: ExposeFlags,
    ) -> Result<(), ColorParseError> {
        let Some(color) = parse_color_string(text) else {
            return Err(ColorParseError(text.into()));
        };
        if self.config.format == FormatOption::Any {
            self.current_format = color.format;
        }
        self.from_rgba_flags(Some(color.r), Some(color.g), Some(color.b), color.a, flags)
            .map_err(|_| ColorParseError(text.into()))
    }

    pub fn to_format(&self, format: ColorFormat) -> String {
        self.channels.to_format(format)
    }

    pub fn to_hex_string(&self) -> String {
        self.channels.to_hex_string()
    }

    pub fn to_rgb_string(&self) -> String {
        self.channels.to_rgb_string()
    }

    pub fn to_rgba_string(&self) -> String {
        self.channels.to_rgba_string()
    }

    /// Current value of a channel; `None` only for an undefined hue.
    pub fn get(&self, channel: Channel) -> Option<f64> {
        let c = &self.channels;
        match channel {
            Channel::H => c.h,
            Channel::S => Some(c.s),
            Channel::V => Some(c.v),
            Channel::A => Some(c.a),
            Channel::R => Some(c.r),
            Channel::G => Some(c.g),
            Channel::B => Some(c.b),
        }
    }

    /// Set a single channel through the matching mutator.
    pub fn set_channel(&mut self, channel: Channel, value: f64) -> Result<(), ChannelError> {
        let v = Some(value);
        match channel {
            Channel::H => self.from_hsva(Some(Hue::Degrees(value)), None, None, None),
            Channel::S => self.from_hsva(None, v, None, None),
            Channel::V => self.from_hsva(None, None, v, None),
            Channel::A => self.from_hsva(None, None, None, v),
            Channel::R => self.from_rgba(v, None, None, None),
            Channel::G => self.from_rgba(None, v, None, None),
            Channel::B => self.from_rgba(None, None, v, None),
        }
    }

    /// Channel lookup by letter. Unknown names are a usage error.
    pub fn channel(&self, name: &str) -> Result<Option<f64>, PickerError> {
        Ok(self.get(name.parse()?))
    }

    pub fn to_grayscale(&self) -> f64 {
        math::luma(self.channels.r, self.channels.g, self.channels.b)
    }

    pub fn is_light(&self) -> bool {
        self.to_grayscale() > 255.0 / 2.0
    }

    /// Take the text typed into the value element.
    pub fn process_value_input(&mut self, text: &str) {
        if !self.config.required && text.trim().is_empty() {
            self.clear_preview();
            self.expose_color(ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_STYLE);
            return;
        }

        if !self.config.refine {
            if self.from_string_flags(text, ExposeFlags::LEAVE_VALUE).is_err() {
                self.clear_preview();
                self.expose_color(ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_STYLE);
            }
            return;
        }

        if self.from_string(text).is_err() {
            // Put the last valid color back.
            self.expose_color(ExposeFlags::NONE);
        }
    }

    /// Take the text typed into the alpha element.
    pub fn process_alpha_input(&mut self, text: &str) {
        let alpha = color::parse_float_prefix(text);
        if self.from_hsva(None, None, None, Some(alpha)).is_err() {
            self.expose_color(ExposeFlags::NONE);
        }
    }

    /// Color text as shown in the value element.
    pub fn value_text(&self) -> String {
        let text = self.to_string();
        if self.current_format == ColorFormat::Hex {
            color::style_hex(&text, self.config.hash, self.config.uppercase)
        } else {
            text
        }
    }

    /// Push the current color to every bound surface not excluded by `flags`.
    pub fn expose_color(&mut self, flags: ExposeFlags) {
        let Some(mut sink) = self.sink.take() else {
            return;
        };

        if !flags.leave_value {
            if let Some(value) = self.bindings.value {
                sink.value_text(value.id, &self.value_text());
            }
        }

        if !flags.leave_alpha {
            if let Some(alpha) = self.bindings.alpha {
                sink.alpha_text(alpha.id, &color::round_alpha(self.channels.a).to_string());
            }
        }

        if !flags.leave_style {
            if let Some(preview) = self.bindings.preview {
                let stripe = preview
                    .element
                    .role
                    .shows_content()
                    .then_some(self.config.preview_position);
                let padding = |original: f64| self.config.preview_size + original.max(5.0);
                sink.preview(
                    preview.element.id,
                    &Preview {
                        color: self.to_rgba_string(),
                        stripe,
                        padding_left: (stripe == Some(PreviewPosition::Left))
                            .then(|| padding(preview.padding_left)),
                        padding_right: (stripe == Some(PreviewPosition::Right))
                            .then(|| padding(preview.padding_right)),
                    },
                );
            }
        }

        if self.active {
            sink.redraw_panel(&PanelGeometry::new(
                &self.config,
                &self.channels,
                self.has_alpha_slider(),
            ));
        }

        // A sink installed during exposure is dropped in favor of the current one.
        self.sink = Some(sink);
    }

    fn clear_preview(&mut self) {
        if let (Some(sink), Some(preview)) = (self.sink.as_mut(), self.bindings.preview) {
            sink.clear_preview(preview.element.id);
        }
    }

    /// The user typed into the value element.
    pub fn on_value_input(&mut self, text: &str) {
        // Half-typed text is expected; the color simply waits for valid input.
        let _ = self.from_string_flags(text, ExposeFlags::LEAVE_VALUE);
        self.run_callback(PickerEvent::Input);
    }

    /// The value element committed a change.
    pub fn on_value_change(&mut self) {
        self.run_callback(PickerEvent::Change);
    }

    /// The value element lost focus with `text` in it.
    pub fn on_value_blur(&mut self, text: &str) {
        self.process_value_input(text);
    }

    /// The user typed into the alpha element. Alpha changes the whole
    /// color, so the value element is notified too.
    pub fn on_alpha_input(&mut self, text: &str) {
        let alpha = color::parse_float_prefix(text);
        let _ = self.from_hsva_flags(None, None, None, Some(alpha), ExposeFlags::LEAVE_ALPHA);
        self.run_callback(PickerEvent::Input);
        self.dispatch(PickerEvent::Input);
    }

    pub fn on_alpha_change(&mut self) {
        self.run_callback(PickerEvent::Change);
        self.dispatch(PickerEvent::Change);
    }

    pub fn on_alpha_blur(&mut self, text: &str) {
        self.process_alpha_input(text);
    }

    /// Run the callback for `event`, then emit it on the value element.
    ///
    /// The callback gets the instance itself and may mutate it freely.
    pub fn trigger(&mut self, event: PickerEvent) {
        self.run_callback(event);
        self.dispatch(event);
    }

    fn run_callback(&mut self, event: PickerEvent) {
        let taken = match event {
            PickerEvent::Input => self.on_input.take(),
            PickerEvent::Change => self.on_change.take(),
        };
        if let Some(mut callback) = taken {
            callback(self);
            let slot = match event {
                PickerEvent::Input => &mut self.on_input,
                PickerEvent::Change => &mut self.on_change,
            };
            // Keep a replacement the callback installed for itself.
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn dispatch(&mut self, event: PickerEvent) {
        let value = self.bindings.value.map(|v| v.id);
        if let Some(sink) = self.sink.as_mut() {
            sink.dispatch(value, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoundElement, ElementRole};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Value(String),
        Alpha(String),
        Preview(Preview),
        ClearPreview,
        Redraw,
        Dispatch(PickerEvent),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    impl ColorSink for Recorder {
        fn value_text(&mut self, _: ElementId, text: &str) {
            self.0.borrow_mut().push(Call::Value(text.into()));
        }
        fn alpha_text(&mut self, _: ElementId, text: &str) {
            self.0.borrow_mut().push(Call::Alpha(text.into()));
        }
        fn preview(&mut self, _: ElementId, preview: &Preview) {
            self.0.borrow_mut().push(Call::Preview(preview.clone()));
        }
        fn clear_preview(&mut self, _: ElementId) {
            self.0.borrow_mut().push(Call::ClearPreview);
        }
        fn redraw_panel(&mut self, _: &PanelGeometry) {
            self.0.borrow_mut().push(Call::Redraw);
        }
        fn dispatch(&mut self, _: Option<ElementId>, event: PickerEvent) {
            self.0.borrow_mut().push(Call::Dispatch(event));
        }
    }

    fn input_bindings() -> Bindings {
        Bindings::for_target(ElementId(1), ElementRole::TextInput)
    }

    fn instance(config: PickerConfig) -> ColorInstance {
        ColorInstance::builder(config, input_bindings()).build().unwrap()
    }

    fn hsva(inst: &ColorInstance) -> (Option<f64>, f64, f64, f64) {
        let c = inst.channels();
        (c.h, c.s, c.v, c.a)
    }

    #[test]
    fn starts_white_in_hex_without_initial_value() {
        let inst = instance(PickerConfig::default());
        assert_eq!(inst.to_string(), "#FFFFFF");
        assert_eq!(inst.current_format(), ColorFormat::Hex);
    }

    #[test]
    fn detects_format_from_initial_value() {
        let config = PickerConfig {
            value: Some("rgb(10,20,30)".into()),
            ..Default::default()
        };
        let inst = instance(config);
        assert_eq!(inst.current_format(), ColorFormat::Rgb);
        assert_eq!(inst.to_string(), "rgb(10,20,30)");
    }

    #[test]
    fn value_element_text_is_used_when_no_value_configured() {
        let inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .value_text("#336699")
            .build()
            .unwrap();
        assert_eq!(inst.to_hex_string(), "#336699");
    }

    #[test]
    fn configured_alpha_is_applied() {
        let config = PickerConfig {
            alpha: Some(0.25),
            ..Default::default()
        };
        assert_eq!(instance(config).channels().a, 0.25);
    }

    #[test]
    fn invalid_config_fails_before_building() {
        let config = PickerConfig {
            min_v: 150.0,
            ..Default::default()
        };
        let err = ColorInstance::builder(config, input_bindings())
            .build()
            .unwrap_err();
        assert!(matches!(err, PickerError::InvalidConfig(_)));
    }

    #[test]
    fn from_hsva_derives_rgb() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(Some(Hue::Degrees(240.0)), Some(100.0), Some(50.0), None)
            .unwrap();
        assert_eq!(inst.to_rgb_string(), "rgb(0,0,128)");
    }

    #[test]
    fn nan_rejects_whole_call() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(Some(Hue::Degrees(10.0)), Some(20.0), Some(30.0), Some(0.4))
            .unwrap();
        let before = *inst.channels();

        let err = inst
            .from_hsva(Some(Hue::Degrees(f64::NAN)), Some(50.0), Some(50.0), None)
            .unwrap_err();
        assert_eq!(err, ChannelError::NotANumber(Channel::H));
        assert_eq!(*inst.channels(), before);

        let err = inst
            .from_rgba(Some(1.0), Some(2.0), None, Some(f64::NAN))
            .unwrap_err();
        assert_eq!(err, ChannelError::NotANumber(Channel::A));
        assert_eq!(*inst.channels(), before);
    }

    #[test]
    fn clamps_to_configured_bounds() {
        let config = PickerConfig {
            min_s: 10.0,
            max_s: 90.0,
            max_v: 80.0,
            min_a: 0.2,
            ..Default::default()
        };
        let mut inst = instance(config);
        inst.from_hsva(Some(Hue::Degrees(400.0)), Some(100.0), Some(100.0), Some(0.0))
            .unwrap();
        assert_eq!(hsva(&inst), (Some(360.0), 90.0, 80.0, 0.2));
        inst.from_hsva(Some(Hue::Degrees(-5.0)), Some(0.0), Some(-1.0), None)
            .unwrap();
        assert_eq!(hsva(&inst), (Some(0.0), 10.0, 0.0, 0.2));
    }

    #[test]
    fn clamping_is_a_fixed_point() {
        let config = PickerConfig {
            min_s: 25.0,
            max_v: 75.0,
            ..Default::default()
        };
        let mut inst = instance(config);
        inst.from_hsva(Some(Hue::Degrees(123.4)), Some(3.0), Some(99.0), Some(0.77))
            .unwrap();
        let first = *inst.channels();
        inst.from_hsva(first.h.map(Hue::Degrees), Some(first.s), Some(first.v), Some(first.a))
            .unwrap();
        assert_eq!(*inst.channels(), first);
    }

    #[test]
    fn rgb_input_is_reflected_through_hsv_bounds() {
        let config = PickerConfig {
            max_s: 50.0,
            ..Default::default()
        };
        let mut inst = instance(config);
        inst.from_rgba(Some(255.0), Some(0.0), Some(0.0), None).unwrap();
        assert_eq!(inst.channels().s, 50.0);
        // forward-then-back conversion lands on the clamped color
        assert_eq!(inst.to_rgb_string(), "rgb(255,128,128)");
    }

    #[test]
    fn achromatic_rgb_keeps_previous_hue() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(Some(Hue::Degrees(200.0)), Some(80.0), Some(80.0), None)
            .unwrap();
        inst.from_rgba(Some(90.0), Some(90.0), Some(90.0), None).unwrap();
        assert_eq!(inst.channels().h, Some(200.0));
        assert_eq!(inst.channels().s, 0.0);
        assert_eq!(inst.to_rgb_string(), "rgb(90,90,90)");
    }

    #[test]
    fn black_keeps_previous_saturation() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(None, Some(60.0), Some(60.0), None).unwrap();
        inst.from_rgba(Some(0.0), Some(0.0), Some(0.0), None).unwrap();
        assert_eq!(inst.channels().s, 60.0);
        assert_eq!(inst.channels().v, 0.0);
    }

    #[test]
    fn undefined_hue_is_stored_and_renders_gray() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(Some(Hue::Undefined), Some(100.0), Some(50.0), None)
            .unwrap();
        assert_eq!(inst.get(Channel::H), None);
        assert_eq!(inst.to_rgb_string(), "rgb(128,128,128)");
        // an achromatic RGB color does not pollute the undefined hue
        inst.from_rgba(Some(10.0), Some(10.0), Some(10.0), None).unwrap();
        assert_eq!(inst.get(Channel::H), None);
        // a saturated one defines it again
        inst.from_rgba(Some(0.0), Some(0.0), Some(255.0), None).unwrap();
        assert_eq!(inst.get(Channel::H), Some(240.0));
    }

    #[test]
    fn format_tracks_last_parsed_notation_under_any() {
        let config = PickerConfig {
            format: FormatOption::Any,
            ..Default::default()
        };
        let mut inst = instance(config);
        inst.from_string("#FF0000").unwrap();
        assert_eq!(inst.to_string(), "#FF0000");
        inst.from_string("rgba(0,255,0,0.5)").unwrap();
        assert_eq!(inst.to_string(), "rgba(0,255,0,0.5)");
        assert!(inst.has_alpha_slider());
    }

    #[test]
    fn fixed_format_ignores_parsed_notation() {
        let config = PickerConfig {
            format: FormatOption::Rgb,
            ..Default::default()
        };
        let mut inst = instance(config);
        inst.from_string("#00FF00").unwrap();
        assert_eq!(inst.to_string(), "rgb(0,255,0)");
    }

    #[test]
    fn from_string_failure_leaves_color() {
        let mut inst = instance(PickerConfig::default());
        inst.from_string("#123456").unwrap();
        assert_eq!(
            inst.from_string("#12"),
            Err(ColorParseError("#12".into()))
        );
        assert_eq!(inst.to_string(), "#123456");
    }

    #[test]
    fn channel_accessors_dispatch_by_name() {
        let mut inst = instance(PickerConfig::default());
        inst.set_channel(Channel::R, 0.0).unwrap();
        assert_eq!(inst.to_hex_string(), "#00FFFF");
        assert_eq!(inst.channel("H").unwrap(), Some(180.0));
        inst.set_channel("v".parse().unwrap(), 50.0).unwrap();
        assert_eq!(inst.channel("v").unwrap(), Some(50.0));
        assert!(matches!(
            inst.channel("q"),
            Err(PickerError::UnknownChannel(_))
        ));
        assert_eq!(
            inst.set_channel(Channel::G, f64::NAN),
            Err(ChannelError::NotANumber(Channel::G))
        );
    }

    #[test]
    fn light_and_dark_detection() {
        let mut inst = instance(PickerConfig::default());
        assert!(inst.is_light());
        inst.from_string("#202020").unwrap();
        assert!(!inst.is_light());
        assert!((inst.to_grayscale() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn exposes_value_alpha_and_preview() {
        let rec = Recorder::default();
        let bindings = input_bindings().with_alpha(BoundElement {
            id: ElementId(2),
            role: ElementRole::TextInput,
        });
        let config = PickerConfig {
            hash: true,
            uppercase: false,
            ..Default::default()
        };
        let mut inst = ColorInstance::builder(config, bindings)
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();

        inst.from_string("#ABCDEF").unwrap();
        assert_eq!(
            rec.take(),
            vec![
                Call::Value("#abcdef".into()),
                Call::Alpha("1".into()),
                Call::Preview(Preview {
                    color: "rgba(171,205,239,1)".into(),
                    stripe: Some(PreviewPosition::Left),
                    padding_left: Some(37.0),
                    padding_right: None,
                }),
            ]
        );
    }

    #[test]
    fn flags_skip_surfaces() {
        let rec = Recorder::default();
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();
        inst.from_hsva_flags(
            None,
            Some(50.0),
            None,
            None,
            ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_STYLE,
        )
        .unwrap();
        assert_eq!(rec.take(), vec![]);
    }

    #[test]
    fn redraws_panel_only_while_active() {
        let rec = Recorder::default();
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();
        inst.expose_color(ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_STYLE);
        assert_eq!(rec.take(), vec![]);
        inst.set_active(true);
        inst.expose_color(ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_STYLE);
        assert_eq!(rec.take(), vec![Call::Redraw]);
    }

    #[test]
    fn invalid_text_re_exposes_last_color() {
        let rec = Recorder::default();
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();
        inst.process_value_input("#12");
        let calls = rec.take();
        assert_eq!(calls[0], Call::Value("FFFFFF".into()));
    }

    #[test]
    fn blank_text_allowed_when_not_required() {
        let rec = Recorder::default();
        let config = PickerConfig {
            required: false,
            ..Default::default()
        };
        let mut inst = ColorInstance::builder(config, input_bindings())
            .sink(rec.clone())
            .build()
            .unwrap();
        assert_eq!(rec.take(), vec![Call::ClearPreview]);
        inst.process_value_input("   ");
        assert_eq!(rec.take(), vec![Call::ClearPreview]);
    }

    #[test]
    fn unrefined_text_is_not_rewritten() {
        let rec = Recorder::default();
        let config = PickerConfig {
            refine: false,
            ..Default::default()
        };
        let mut inst = ColorInstance::builder(config, input_bindings())
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();
        inst.process_value_input("  ff0000 ");
        let calls = rec.take();
        assert!(calls.iter().all(|c| !matches!(c, Call::Value(_))));
        assert_eq!(inst.to_hex_string(), "#FF0000");

        inst.process_value_input("nope");
        assert_eq!(rec.take(), vec![Call::ClearPreview]);
        assert_eq!(inst.to_hex_string(), "#FF0000");
    }

    #[test]
    fn alpha_text_parses_or_restores() {
        let mut inst = instance(PickerConfig::default());
        inst.process_alpha_input(" 0.4 ");
        assert_eq!(inst.channels().a, 0.4);
        inst.process_alpha_input("half");
        assert_eq!(inst.channels().a, 0.4);
    }

    #[test]
    fn alpha_text_keeps_its_leading_number() {
        let mut inst = instance(PickerConfig::default());
        inst.process_alpha_input("0.5;");
        assert_eq!(inst.channels().a, 0.5);
        inst.on_alpha_input(".25 opaque");
        assert_eq!(inst.channels().a, 0.25);
    }

    #[test]
    fn trigger_runs_callback_then_dispatches() {
        let rec = Recorder::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = seen.clone();
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .sink(rec.clone())
            .on_change(move |inst| seen_cb.borrow_mut().push(inst.to_hex_string()))
            .build()
            .unwrap();
        rec.take();
        inst.trigger(PickerEvent::Change);
        inst.trigger(PickerEvent::Change);
        assert_eq!(*seen.borrow(), vec!["#FFFFFF", "#FFFFFF"]);
        assert_eq!(
            rec.take(),
            vec![
                Call::Dispatch(PickerEvent::Change),
                Call::Dispatch(PickerEvent::Change)
            ]
        );
    }

    #[test]
    fn callbacks_may_mutate_the_instance() {
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .on_input(|inst| {
                // snap to pure red on every input
                inst.from_string("#FF0000").unwrap();
            })
            .build()
            .unwrap();
        inst.from_string("#00FF00").unwrap();
        inst.trigger(PickerEvent::Input);
        assert_eq!(inst.to_hex_string(), "#FF0000");
    }

    #[test]
    fn typing_updates_color_but_not_the_text() {
        let rec = Recorder::default();
        let inputs = Rc::new(RefCell::new(0));
        let counter = inputs.clone();
        let mut inst = ColorInstance::builder(PickerConfig::default(), input_bindings())
            .sink(rec.clone())
            .on_input(move |_| *counter.borrow_mut() += 1)
            .build()
            .unwrap();
        rec.take();

        inst.on_value_input("#00F");
        assert_eq!(inst.to_hex_string(), "#0000FF");
        inst.on_value_input("#00");
        assert_eq!(inst.to_hex_string(), "#0000FF");
        assert_eq!(*inputs.borrow(), 2);
        let calls = rec.take();
        assert!(calls.iter().all(|c| !matches!(c, Call::Value(_) | Call::Dispatch(_))));

        // leaving the field rewrites it in canonical form
        inst.on_value_blur("#00F");
        assert_eq!(rec.take()[0], Call::Value("0000FF".into()));
    }

    #[test]
    fn alpha_typing_notifies_the_value_element() {
        let rec = Recorder::default();
        let bindings = input_bindings().with_alpha(BoundElement {
            id: ElementId(2),
            role: ElementRole::TextInput,
        });
        let mut inst = ColorInstance::builder(PickerConfig::default(), bindings)
            .sink(rec.clone())
            .build()
            .unwrap();
        rec.take();

        inst.on_alpha_input("0.3");
        assert_eq!(inst.channels().a, 0.3);
        let calls = rec.take();
        assert!(!calls.iter().any(|c| matches!(c, Call::Alpha(_))));
        assert_eq!(calls.last(), Some(&Call::Dispatch(PickerEvent::Input)));

        inst.on_alpha_change();
        assert_eq!(rec.take(), vec![Call::Dispatch(PickerEvent::Change)]);
    }

    #[test]
    fn event_names_parse() {
        assert_eq!("Change".parse::<PickerEvent>().unwrap(), PickerEvent::Change);
        assert!("blur".parse::<PickerEvent>().is_err());
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_mutators_leave_alpha() {
        let mut inst = instance(PickerConfig::default());
        inst.from_hsva(None, None, None, Some(0.5)).unwrap();
        inst.from_rgb(Some(0.0), Some(0.0), Some(255.0)).unwrap();
        inst.from_hsv(None, None, Some(50.0)).unwrap();
        assert_eq!(inst.channels().a, 0.5);
        assert_eq!(inst.to_hex_string(), "#000080");
    }
}
