//! Color swatch drawn next to, or instead of, a bound element's content.

use std::sync::Arc;

use floem::kurbo::Rect;
use floem::peniko::{self, Blob};
use floem::reactive::{create_effect, SignalWith};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, PaintCx, UpdateCx},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::checkerboard::rasterize_preview;
use crate::color::parse_color_string;
use crate::config::PreviewPosition;
use crate::host::SignalSink;
use crate::instance::Preview;

/// RGBA bytes of a preview's color text.
pub(crate) fn preview_rgba(preview: &Preview) -> Option<[u8; 4]> {
    let parsed = parse_color_string(&preview.color)?;
    let a = parsed.a.unwrap_or(1.0).clamp(0.0, 1.0);
    Some([
        parsed.r.round() as u8,
        parsed.g.round() as u8,
        parsed.b.round() as u8,
        (a * 255.0).round() as u8,
    ])
}

struct SwatchUpdate(Option<[u8; 4]>);

pub struct Swatch {
    id: ViewId,
    rgba: Option<[u8; 4]>,
    size: floem::taffy::prelude::Size<f32>,
    img: Option<peniko::Image>,
    hash: Vec<u8>,
    cached: Option<([u8; 4], u32, u32)>,
}

/// A swatch following `sink`'s preview. Paints nothing while the preview
/// is cleared.
pub fn swatch(sink: SignalSink) -> Swatch {
    let id = ViewId::new();
    let preview = sink.preview;

    create_effect(move |_| {
        let rgba = preview.with(|p| p.as_ref().and_then(preview_rgba));
        id.update_state(SwatchUpdate(rgba));
    });

    Swatch {
        id,
        rgba: preview.with_untracked(|p| p.as_ref().and_then(preview_rgba)),
        size: Default::default(),
        img: None,
        hash: Vec::new(),
        cached: None,
    }
}

impl Swatch {
    fn ensure_image(&mut self, rgba: [u8; 4]) {
        let w = self.size.width.round() as u32;
        let h = self.size.height.round() as u32;
        if w == 0 || h == 0 || self.cached == Some((rgba, w, h)) {
            return;
        }
        let blob = Blob::new(Arc::new(rasterize_preview(w, h, rgba)));
        self.hash = blob.id().to_le_bytes().to_vec();
        self.img = Some(peniko::Image::new(blob, peniko::Format::Rgba8, w, h));
        self.cached = Some((rgba, w, h));
    }
}

impl View for Swatch {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SwatchUpdate>() {
            self.rgba = update.0;
            self.id.request_layout();
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let Some(rgba) = self.rgba else {
            return;
        };
        self.ensure_image(rgba);
        if let Some(ref img) = self.img {
            let rect = Rect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64);
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.hash,
                },
                rect,
            );
        }
    }
}

/// A `width` wide stripe, shown while the preview sits on `side`.
pub(crate) fn stripe(sink: SignalSink, width: f64, side: PreviewPosition) -> Swatch {
    let preview = sink.preview;
    swatch(sink).style(move |s| {
        let current = preview.with(|p| p.as_ref().and_then(|p| p.stripe));
        s.width(width)
            .height_full()
            .flex_shrink(0.0)
            .apply_if(current != Some(side), |s| s.hide())
    })
}
