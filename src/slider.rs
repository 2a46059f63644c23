//! The channel slider next to the pad.
//!
//! Drives whichever of saturation or value the pad leaves out, with a
//! vertical gradient that follows the current color.

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

use crate::config::PickerConfig;
use crate::constants::INSET_COLOR;
use crate::control::{content_origin, paint_slider_pointer, rgba, slider_pointer_rect, ControlDrag};
use crate::ownership::SharedInstance;
use crate::pointer::{ControlKind, PanelGeometry, SliderPointer};

/// Rasterize a vertical gradient from `top` on the first row to `bottom`
/// on the last.
pub fn rasterize_slider(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 4) as usize];
    for py in 0..height {
        let t = py as f64 / (height.max(2) - 1) as f64;
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        let color = [mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2])];
        let row_offset = (py * width * 4) as usize;
        for px in 0..width {
            let offset = row_offset + (px * 4) as usize;
            buf[offset..offset + 3].copy_from_slice(&color);
            buf[offset + 3] = 255;
        }
    }
    buf
}

pub(crate) fn to_rgb8(c: (f64, f64, f64)) -> [u8; 3] {
    [c.0.round() as u8, c.1.round() as u8, c.2.round() as u8]
}

/// Layout shared by both sliders: a column `slider_size` wide, separated
/// from whatever is on its left by the pad-to-slider gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Column {
    pub(crate) content: Rect,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Column {
    pub(crate) fn new(config: &PickerConfig) -> Self {
        let gap = config.pad_to_slider_padding();
        let origin = content_origin(config, gap);
        Self {
            content: Rect::from_origin_size(origin, (config.slider_size, config.height)),
            width: gap + 2.0 * config.inset_width + config.slider_size,
            height: 2.0 * (config.padding + config.inset_width) + config.height,
        }
    }

    pub(crate) fn paint_inset(&self, cx: &mut PaintCx, config: &PickerConfig) {
        let inset = config.inset_width;
        if inset > 0.0 {
            cx.stroke(
                &self.content.inset(inset / 2.0),
                rgba(INSET_COLOR),
                &floem::kurbo::Stroke::new(inset),
            );
        }
    }

    pub(crate) fn paint_pointer(&self, cx: &mut PaintCx, config: &PickerConfig, pointer: &SliderPointer) {
        let outer = slider_pointer_rect(config, self.content.x0, self.content.y0 + pointer.top);
        paint_slider_pointer(cx, config, outer);
    }
}

struct SliderUpdate(Option<PanelGeometry>);

pub(crate) struct ChannelSlider {
    id: ViewId,
    drag: ControlDrag,
    config: PickerConfig,
    column: Column,
    geometry: Option<PanelGeometry>,
    size: floem::taffy::prelude::Size<f32>,
    img: Option<peniko::Image>,
    hash: Vec<u8>,
    cached: Option<([u8; 3], [u8; 3])>,
}

pub(crate) fn channel_slider(
    inst: SharedInstance,
    geometry: RwSignal<Option<PanelGeometry>>,
) -> ChannelSlider {
    let id = ViewId::new();
    let config = inst.borrow().config().clone();
    let column = Column::new(&config);

    create_effect(move |_| {
        let g = geometry.get();
        id.update_state(SliderUpdate(g));
    });

    ChannelSlider {
        id,
        drag: ControlDrag::new(ControlKind::Slider, inst),
        config,
        column,
        geometry: geometry.get_untracked(),
        size: Default::default(),
        img: None,
        hash: Vec::new(),
        cached: None,
    }
    .style(move |s| {
        s.width(column.width)
            .height(column.height)
            .flex_shrink(0.0)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl ChannelSlider {
    fn ensure_image(&mut self) {
        let Some(gradient) = self.geometry.as_ref().and_then(|g| g.slider_gradient) else {
            return;
        };
        let key = (to_rgb8(gradient.top), to_rgb8(gradient.bottom));
        if self.cached == Some(key) {
            return;
        }
        let w = self.config.slider_size.round() as u32;
        let h = self.config.height.round() as u32;
        let blob = Blob::new(Arc::new(rasterize_slider(w, h, key.0, key.1)));
        self.hash = blob.id().to_le_bytes().to_vec();
        self.img = Some(peniko::Image::new(blob, peniko::Format::Rgba8, w, h));
        self.cached = Some(key);
    }
}

impl View for ChannelSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SliderUpdate>() {
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
        self.column.paint_inset(cx, &self.config);

        self.ensure_image();
        if let Some(ref img) = self.img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.hash,
                },
                self.column.content,
            );
        }

        if let Some(pointer) = self.geometry.as_ref().and_then(|g| g.slider) {
            self.column.paint_pointer(cx, &self.config, &pointer);
        }
    }
}
