//! Alpha slider: the opaque color on top fading to the checkerboard below.

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

use crate::checkerboard;
use crate::color::parse_color_string;
use crate::config::PickerConfig;
use crate::control::ControlDrag;
use crate::ownership::SharedInstance;
use crate::pointer::{ControlKind, PanelGeometry};
use crate::slider::Column;

/// Rasterize the alpha gradient over a checkerboard: `color` fully opaque
/// on the first row, fully transparent on the last.
pub fn rasterize_alpha_slider(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let last = (height.max(2) - 1) as f64;
    checkerboard::rasterize_with(width, height, |_, y, bg| {
        checkerboard::over(color, 1.0 - y as f64 / last, bg)
    })
}

fn base_color(geometry: &PanelGeometry) -> Option<[u8; 3]> {
    let parsed = parse_color_string(&geometry.alpha_color)?;
    Some([
        parsed.r.round() as u8,
        parsed.g.round() as u8,
        parsed.b.round() as u8,
    ])
}

struct AlphaUpdate(Option<PanelGeometry>);

pub(crate) struct AlphaSlider {
    id: ViewId,
    drag: ControlDrag,
    config: PickerConfig,
    column: Column,
    geometry: Option<PanelGeometry>,
    size: floem::taffy::prelude::Size<f32>,
    img: Option<peniko::Image>,
    hash: Vec<u8>,
    cached: Option<[u8; 3]>,
}

pub(crate) fn alpha_slider(
    inst: SharedInstance,
    geometry: RwSignal<Option<PanelGeometry>>,
) -> AlphaSlider {
    let id = ViewId::new();
    let config = inst.borrow().config().clone();
    let column = Column::new(&config);

    create_effect(move |_| {
        let g = geometry.get();
        id.update_state(AlphaUpdate(g));
    });

    AlphaSlider {
        id,
        drag: ControlDrag::new(ControlKind::AlphaSlider, inst),
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

impl AlphaSlider {
    fn ensure_image(&mut self) {
        let Some(color) = self.geometry.as_ref().and_then(base_color) else {
            return;
        };
        if self.cached == Some(color) {
            return;
        }
        let w = self.config.slider_size.round() as u32;
        let h = self.config.height.round() as u32;
        let blob = Blob::new(Arc::new(rasterize_alpha_slider(w, h, color)));
        self.hash = blob.id().to_le_bytes().to_vec();
        self.img = Some(peniko::Image::new(blob, peniko::Format::Rgba8, w, h));
        self.cached = Some(color);
    }
}

impl View for AlphaSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<AlphaUpdate>() {
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

        if let Some(pointer) = self.geometry.as_ref().and_then(|g| g.alpha) {
            self.column.paint_pointer(cx, &self.config, &pointer);
        }
    }
}
