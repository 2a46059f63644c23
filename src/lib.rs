//! # floem-swatch
//!
//! An attachable HSV color picker for [Floem](https://github.com/lapce/floem).
//!
//! Pickers are installed on page elements (text inputs, buttons) and share a
//! single floating panel with a hue pad, a saturation or value slider and
//! an optional alpha slider. The color model, panel ownership, pointer
//! mapping and panel positioning are headless and usable without a running
//! UI; the Floem views on top of them live in [`inputs`] and [`panel`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use floem::kurbo::Size;
//! use floem::prelude::*;
//! use floem_swatch::{Bindings, ElementId, ElementRole, PickerConfig, SwatchPage};
//! use floem_swatch::{inputs::value_input, panel::floating_panel};
//!
//! let page = Rc::new(RefCell::new(SwatchPage::new(Size::new(800.0, 600.0))));
//! let target = ElementId(1);
//! let (inst, sink) = page
//!     .borrow_mut()
//!     .install(
//!         PickerConfig::default(),
//!         Bindings::for_target(target, ElementRole::TextInput),
//!         Some("#3B82F6"),
//!     )
//!     .unwrap();
//!
//! let signals = page.borrow().signals();
//! let (pressed, closing) = (page.clone(), page.clone());
//! let _view = (
//!     value_input(inst, sink, move || pressed.borrow_mut().press_target(target)),
//!     floating_panel(signals, move || closing.borrow_mut().hide()),
//! );
//! ```

#[cfg(feature = "alpha")]
mod alpha_slider;
mod checkerboard;
mod color;
mod config;
mod constants;
mod control;
mod element;
mod error;
mod host;
pub mod inputs;
mod instance;
mod math;
mod ownership;
mod pad;
mod page;
pub mod panel;
mod pointer;
mod position;
mod preview;
mod registry;
mod slider;

#[cfg(feature = "alpha")]
pub use alpha_slider::rasterize_alpha_slider;
pub use checkerboard::{rasterize_checkerboard, rasterize_preview};
pub use color::{
    format_hex, format_rgb, format_rgba, parse_color_string, parse_float_prefix, round_alpha,
    style_hex, Channel, Channels, ColorFormat, Hue, ParsedColor,
};
pub use config::{FormatOption, Mode, PickerConfig, PreviewPosition, Side, SvChannel};
pub use element::{Bindings, BoundElement, DocumentId, ElementId, ElementRole, PreviewElement};
pub use error::{ChannelError, ColorParseError, PickerError};
pub use host::{SignalHost, SignalSink};
pub use instance::{
    Callback, ColorInstance, ColorSink, ExposeFlags, InstanceBuilder, InstanceId, PickerEvent,
    Preview,
};
pub use math::{hsv_to_rgb, luma, rgb_to_hsv};
pub use ownership::{is_dismiss_key, PanelHost, PanelOwnership, PanelParent, PointerHit, SharedInstance};
pub use pad::rasterize_pad;
pub use page::SwatchPage;
pub use pointer::{
    alpha_value, pad_values, slider_value, ControlKind, DragHost, DragSession, FrameBinding,
    PanelGeometry, ParentFrame, PointerSample, SliderGradient, SliderPointer,
};
pub use position::{solve, BoxShadow, Placement, PositionInput, PositionKind, Solved};
pub use preview::{swatch, Swatch};
pub use registry::Registry;
pub use slider::rasterize_slider;
