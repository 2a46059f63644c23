//! Pointer drags on the pad and sliders, and the inverse mapping from a
//! color back to pointer positions when the panel is redrawn.

use floem::kurbo::{Point, Vec2};
use tracing::{debug, trace, warn};

use crate::color::{format_rgb, Channels, Hue};
use crate::config::{PickerConfig, SvChannel};
use crate::constants::SLIDER_INNER_SPACE;
use crate::element::DocumentId;
use crate::error::ChannelError;
use crate::instance::{ColorInstance, PickerEvent};
use crate::math;

/// Which control a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Pad,
    Slider,
    AlphaSlider,
}

/// A pointer position, both in page coordinates and relative to the control
/// it landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub absolute: Point,
    pub relative: Point,
}

/// A document receiving drag listeners, and the correction that maps its
/// coordinates into the main document's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBinding {
    pub document: DocumentId,
    pub offset: Vec2,
}

/// The document of the frame hosting the picker, and the frame's origin
/// within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub document: DocumentId,
    pub frame_origin: Point,
}

/// Listener and capture plumbing for drags.
pub trait DragHost {
    fn capture_pointer(&mut self, control: ControlKind);
    fn release_pointer(&mut self);
    fn attach_drag_listeners(&mut self, document: DocumentId);
    fn detach_drag_listeners(&mut self, document: DocumentId);
}

/// Hue and pad y-channel for a point in pad coordinates.
pub fn pad_values(config: &PickerConfig, local: Point) -> (f64, f64) {
    let hue = local.x * (360.0 / (config.width - 1.0));
    (hue, slider_value(config, local.y))
}

/// Slider channel for a y in slider coordinates.
pub fn slider_value(config: &PickerConfig, local_y: f64) -> f64 {
    100.0 - local_y * (100.0 / (config.height - 1.0))
}

pub fn alpha_value(config: &PickerConfig, local_y: f64) -> f64 {
    1.0 - local_y * (1.0 / (config.height - 1.0))
}

fn sv_args(channel: SvChannel, value: f64) -> (Option<f64>, Option<f64>) {
    match channel {
        SvChannel::S => (Some(value), None),
        SvChannel::V => (None, Some(value)),
    }
}

/// One press-drag-release gesture on a control.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    control: ControlKind,
    origin: Point,
    frames: Vec<FrameBinding>,
}

impl DragSession {
    /// Start dragging `control` and apply the pressed position.
    pub fn begin(
        inst: &mut ColorInstance,
        control: ControlKind,
        sample: PointerSample,
        parent: Option<ParentFrame>,
        host: &mut impl DragHost,
    ) -> Self {
        host.capture_pointer(control);

        let mut frames = vec![FrameBinding {
            document: DocumentId::MAIN,
            offset: Vec2::ZERO,
        }];
        if let Some(parent) = parent {
            frames.push(FrameBinding {
                document: parent.document,
                offset: -parent.frame_origin.to_vec2(),
            });
        }
        for frame in &frames {
            host.attach_drag_listeners(frame.document);
        }

        let session = Self {
            control,
            origin: sample.absolute - sample.relative.to_vec2(),
            frames,
        };
        debug!(
            id = ?inst.id(),
            ?control,
            origin = ?session.origin,
            frames = session.frames.len(),
            "drag started"
        );

        if control == ControlKind::Pad {
            // Move a bottomed-out slider up so the picked hue is visible.
            if let Some(channel) = inst.config().slider_channel() {
                let current = match channel {
                    SvChannel::S => inst.channels().s,
                    SvChannel::V => inst.channels().v,
                };
                if current == 0.0 {
                    let (s, v) = sv_args(channel, 100.0);
                    let result = inst.from_hsva(None, s, v, None);
                    session.apply(inst, result);
                }
            }
        }

        session.set_from(inst, sample.absolute, Vec2::ZERO);
        inst.trigger(PickerEvent::Input);
        session
    }

    pub fn control(&self) -> ControlKind {
        self.control
    }

    /// Page position of the control's local origin, fixed for the drag.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn frames(&self) -> &[FrameBinding] {
        &self.frames
    }

    /// A move reported by `document`. Returns false when that document is not
    /// part of this drag.
    pub fn pointer_move(
        &self,
        inst: &mut ColorInstance,
        document: DocumentId,
        absolute: Point,
    ) -> bool {
        let Some(frame) = self.frames.iter().find(|f| f.document == document) else {
            warn!(?document, "pointer move from a document outside the drag");
            return false;
        };
        self.set_from(inst, absolute, frame.offset);
        inst.trigger(PickerEvent::Input);
        true
    }

    /// Tear the drag down, then notify.
    pub fn end(self, inst: &mut ColorInstance, host: &mut impl DragHost) {
        for frame in &self.frames {
            host.detach_drag_listeners(frame.document);
        }
        host.release_pointer();
        debug!(id = ?inst.id(), control = ?self.control, "drag finished");

        inst.trigger(PickerEvent::Input);
        inst.trigger(PickerEvent::Change);
    }

    /// Position in control coordinates, past the panel padding and inset.
    fn local(&self, config: &PickerConfig, absolute: Point, offset: Vec2) -> Point {
        let edge = config.padding + config.inset_width;
        Point::new(
            offset.x + absolute.x - self.origin.x - edge,
            offset.y + absolute.y - self.origin.y - edge,
        )
    }

    fn set_from(&self, inst: &mut ColorInstance, absolute: Point, offset: Vec2) {
        let local = self.local(inst.config(), absolute, offset);
        let config = inst.config();
        let result = match self.control {
            ControlKind::Pad => {
                let (hue, y) = pad_values(config, local);
                let (s, v) = sv_args(config.pad_y_channel(), y);
                inst.from_hsva(Some(Hue::Degrees(hue)), s, v, None)
            }
            ControlKind::Slider => match config.slider_channel() {
                Some(channel) => {
                    let (s, v) = sv_args(channel, slider_value(config, local.y));
                    inst.from_hsva(None, s, v, None)
                }
                None => Ok(()),
            },
            ControlKind::AlphaSlider => {
                let a = alpha_value(config, local.y);
                inst.from_hsva(None, None, None, Some(a))
            }
        };
        trace!(control = ?self.control, ?local, "drag moved");
        self.apply(inst, result);
    }

    fn apply(&self, inst: &ColorInstance, result: Result<(), ChannelError>) {
        if let Err(err) = result {
            warn!(id = ?inst.id(), control = ?self.control, %err, "drag produced no color");
        }
    }
}

/// Pointer placement on one slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderPointer {
    /// Row of the slider the channel value maps to.
    pub y: f64,
    /// Top edge of the pointer's outer box.
    pub top: f64,
}

impl SliderPointer {
    fn new(config: &PickerConfig, fraction: f64) -> Self {
        let y = ((1.0 - fraction) * (config.height - 1.0)).round();
        let top = y
            - (2.0 * config.pointer_border_width + config.pointer_thickness)
            - (SLIDER_INNER_SPACE / 2.0).floor();
        Self { y, top }
    }
}

/// End colors of the channel slider's vertical gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderGradient {
    pub channel: SvChannel,
    pub top: (f64, f64, f64),
    pub bottom: (f64, f64, f64),
}

impl SliderGradient {
    pub fn top_css(&self) -> String {
        format_rgb(self.top.0, self.top.1, self.top.2)
    }

    pub fn bottom_css(&self) -> String {
        format_rgb(self.bottom.0, self.bottom.1, self.bottom.2)
    }
}

/// Where the panel's pointers sit for a color.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGeometry {
    /// Pixel of the pad the color maps to.
    pub pad_pointer: Point,
    /// Top-left of the cross drawn around `pad_pointer`.
    pub cross_origin: Point,
    pub slider: Option<SliderPointer>,
    pub slider_gradient: Option<SliderGradient>,
    pub alpha: Option<SliderPointer>,
    /// Opaque color the alpha slider fades out.
    pub alpha_color: String,
}

impl PanelGeometry {
    pub fn new(config: &PickerConfig, channels: &Channels, alpha_slider: bool) -> Self {
        let y_value = match config.pad_y_channel() {
            SvChannel::S => channels.s,
            SvChannel::V => channels.v,
        };
        let hue = channels.h.unwrap_or(0.0);
        let pad_pointer = Point::new(
            (hue / 360.0 * (config.width - 1.0)).round(),
            ((1.0 - y_value / 100.0) * (config.height - 1.0)).round(),
        );
        let ofs = -(config.cross_outer_size() / 2.0).floor();

        let slider_channel = config.slider_channel();
        let slider = slider_channel.map(|channel| {
            let value = match channel {
                SvChannel::S => channels.s,
                SvChannel::V => channels.v,
            };
            SliderPointer::new(config, value / 100.0)
        });
        let slider_gradient = slider_channel.map(|channel| match channel {
            SvChannel::S => SliderGradient {
                channel,
                top: math::hsv_to_rgb(channels.h, 100.0, channels.v),
                bottom: math::hsv_to_rgb(channels.h, 0.0, channels.v),
            },
            SvChannel::V => SliderGradient {
                channel,
                top: math::hsv_to_rgb(channels.h, channels.s, 100.0),
                bottom: (0.0, 0.0, 0.0),
            },
        });

        Self {
            pad_pointer,
            cross_origin: Point::new(pad_pointer.x + ofs, pad_pointer.y + ofs),
            slider,
            slider_gradient,
            alpha: alpha_slider.then(|| SliderPointer::new(config, channels.a)),
            alpha_color: channels.to_hex_string(),
        }
    }
}
