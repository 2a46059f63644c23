//! The hue pad: hue runs left to right, the pad channel top to bottom.
//!
//! The gradient only depends on the configured size and mode, so it is
//! rasterized once per view and the cross pointer is painted on top.

use std::sync::Arc;

use floem::kurbo::Rect;
use floem::peniko::{self, Blob};
use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::config::{PickerConfig, SvChannel};
use crate::constants::{INSET_COLOR, POINTER_BORDER_COLOR, POINTER_COLOR};
use crate::control::{content_origin, rgba, ControlDrag};
use crate::math;
use crate::ownership::SharedInstance;
use crate::pointer::{ControlKind, PanelGeometry};

/// Rasterize the pad gradient to an RGBA8 buffer.
///
/// The pad channel is at 100 on the top row and 0 on the bottom one; the
/// other channel stays at 100.
pub fn rasterize_pad(width: u32, height: u32, y_channel: SvChannel) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 4) as usize];
    let x_step = 360.0 / (width.max(2) - 1) as f64;
    let y_step = 100.0 / (height.max(2) - 1) as f64;

    for py in 0..height {
        let y_value = 100.0 - py as f64 * y_step;
        let (s, v) = match y_channel {
            SvChannel::S => (y_value, 100.0),
            SvChannel::V => (100.0, y_value),
        };
        let row_offset = (py * width * 4) as usize;
        for px in 0..width {
            let (r, g, b) = math::hsv_to_rgb(Some(px as f64 * x_step), s, v);
            let offset = row_offset + (px * 4) as usize;
            buf[offset] = r.round() as u8;
            buf[offset + 1] = g.round() as u8;
            buf[offset + 2] = b.round() as u8;
            buf[offset + 3] = 255;
        }
    }
    buf
}

/// The four bars of the cross pointer, relative to its top-left corner:
/// the two border bars first, then the two pointer lines.
pub(crate) fn cross_bars(config: &PickerConfig) -> ([Rect; 2], [Rect; 2]) {
    let size = config.cross_outer_size();
    let pbw = config.pointer_border_width;
    let pt = config.pointer_thickness;
    let mid = (size / 2.0).floor() - (pt / 2.0).floor();

    let border_y = Rect::new(mid - pbw, 0.0, mid + pt + pbw, size);
    let border_x = Rect::new(0.0, mid - pbw, size, mid + pt + pbw);
    let line_y = Rect::new(mid, pbw, mid + pt, size - pbw);
    let line_x = Rect::new(pbw, mid, size - pbw, mid + pt);
    ([border_y, border_x], [line_y, line_x])
}

pub(crate) struct Pad {
    id: ViewId,
    drag: ControlDrag,
    config: PickerConfig,
    geometry: Option<PanelGeometry>,
    size: floem::taffy::prelude::Size<f32>,
    img: Option<peniko::Image>,
    hash: Vec<u8>,
}

struct PadUpdate(Option<PanelGeometry>);

/// The pad for the instance owning the panel. Redraws follow `geometry`.
pub(crate) fn pad(inst: SharedInstance, geometry: RwSignal<Option<PanelGeometry>>) -> Pad {
    let id = ViewId::new();
    let config = inst.borrow().config().clone();

    create_effect(move |_| {
        let g = geometry.get();
        id.update_state(PadUpdate(g));
    });

    let width = config.padding + 2.0 * config.inset_width + config.width;
    let height = 2.0 * (config.padding + config.inset_width) + config.height;
    Pad {
        id,
        drag: ControlDrag::new(ControlKind::Pad, inst),
        config,
        geometry: geometry.get_untracked(),
        size: Default::default(),
        img: None,
        hash: Vec::new(),
    }
    .style(move |s| {
        s.width(width)
            .height(height)
            .flex_shrink(0.0)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl Pad {
    fn content_rect(&self) -> Rect {
        let origin = content_origin(&self.config, self.config.padding);
        Rect::from_origin_size(origin, (self.config.width, self.config.height))
    }

    fn ensure_image(&mut self) {
        if self.img.is_some() {
            return;
        }
        let w = self.config.width.round() as u32;
        let h = self.config.height.round() as u32;
        let channel = self.config.pad_y_channel();
        let blob = Blob::new(Arc::new(rasterize_pad(w, h, channel)));
        self.hash = blob.id().to_le_bytes().to_vec();
        self.img = Some(peniko::Image::new(blob, peniko::Format::Rgba8, w, h));
    }
}

impl View for Pad {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<PadUpdate>() {
            self.geometry = update.0;
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        let id = self.id;
        self.drag.event(cx, id, event)
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        if self.size.width == 0.0 || self.size.height == 0.0 {
            return;
        }
        let content = self.content_rect();

        let inset = self.config.inset_width;
        if inset > 0.0 {
            cx.stroke(
                &content.inset(inset / 2.0),
                rgba(INSET_COLOR),
                &floem::kurbo::Stroke::new(inset),
            );
        }

        self.ensure_image();
        if let Some(ref img) = self.img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.hash,
                },
                content,
            );
        }

        let Some(geometry) = &self.geometry else {
            return;
        };
        let shift = content.origin().to_vec2() + geometry.cross_origin.to_vec2();
        let (borders, lines) = cross_bars(&self.config);
        cx.save();
        cx.clip(&content);
        for bar in borders {
            cx.fill(&(bar + shift), rgba(POINTER_BORDER_COLOR), 0.0);
        }
        for bar in lines {
            cx.fill(&(bar + shift), rgba(POINTER_COLOR), 0.0);
        }
        cx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Channels;
    use crate::pointer::pad_values;
    use floem::kurbo::{Point, Vec2};
    use pretty_assertions::assert_eq;

    fn pad_view_point(config: &PickerConfig, pixel: Point) -> Point {
        content_origin(config, config.padding) + pixel.to_vec2()
    }

    fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let o = ((y * width + x) * 4) as usize;
        [buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]
    }

    #[test]
    fn saturation_pad_fades_to_white() {
        let buf = rasterize_pad(181, 101, SvChannel::S);
        assert_eq!(pixel(&buf, 181, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, 181, 60, 0), [0, 255, 0, 255]);
        assert_eq!(pixel(&buf, 181, 180, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, 181, 90, 100), [255, 255, 255, 255]);
    }

    #[test]
    fn value_pad_fades_to_black() {
        let buf = rasterize_pad(181, 101, SvChannel::V);
        assert_eq!(pixel(&buf, 181, 120, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&buf, 181, 120, 100), [0, 0, 0, 255]);
    }

    #[test]
    fn cross_bars_center_on_the_pointer() {
        let config = PickerConfig::default();
        let (borders, lines) = cross_bars(&config);
        assert_eq!(borders[0], Rect::new(8.0, 0.0, 12.0, 20.0));
        assert_eq!(borders[1], Rect::new(0.0, 8.0, 20.0, 12.0));
        assert_eq!(lines[0], Rect::new(9.0, 1.0, 11.0, 19.0));
        assert_eq!(lines[1], Rect::new(1.0, 9.0, 19.0, 11.0));
    }

    #[test]
    fn pressing_where_the_cross_is_drawn_picks_the_same_color() {
        let config = PickerConfig::default();
        let channels = Channels {
            h: Some(120.0),
            s: 50.0,
            v: 100.0,
            ..Channels::default()
        };
        let geometry = PanelGeometry::new(&config, &channels, false);
        let view_point = pad_view_point(&config, geometry.pad_pointer);
        let edge = config.padding + config.inset_width;
        let (hue, s) = pad_values(&config, view_point - Vec2::new(edge, edge));
        assert_eq!((hue, s), (120.0, 50.0));
    }
}
