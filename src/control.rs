//! Drag handling and pointer painting shared by the panel's controls.

use floem::kurbo::{Point, Rect};
use floem::peniko::Color;
use floem::{
    context::{EventCx, PaintCx},
    event::{Event, EventPropagation},
    ViewId,
};
use floem_renderer::Renderer;
use tracing::trace;

use crate::config::PickerConfig;
use crate::constants::{POINTER_BORDER_COLOR, POINTER_COLOR, SLIDER_INNER_SPACE};
use crate::element::DocumentId;
use crate::ownership::SharedInstance;
use crate::pointer::{ControlKind, DragHost, DragSession, PointerSample};

pub(crate) fn rgba(c: [u8; 4]) -> Color {
    Color::rgba8(c[0], c[1], c[2], c[3])
}

/// Floem routes every move to the active view, so a single document is
/// enough and capture is just a flag for `update_active`.
#[derive(Debug, Default)]
struct ViewCapture {
    captured: Option<ControlKind>,
}

impl DragHost for ViewCapture {
    fn capture_pointer(&mut self, control: ControlKind) {
        self.captured = Some(control);
    }

    fn release_pointer(&mut self) {
        self.captured = None;
    }

    fn attach_drag_listeners(&mut self, document: DocumentId) {
        trace!(?document, "drag listeners on");
    }

    fn detach_drag_listeners(&mut self, document: DocumentId) {
        trace!(?document, "drag listeners off");
    }
}

/// Press-drag-release state for one control view.
pub(crate) struct ControlDrag {
    kind: ControlKind,
    inst: SharedInstance,
    session: Option<DragSession>,
    capture: ViewCapture,
}

impl ControlDrag {
    pub(crate) fn new(kind: ControlKind, inst: SharedInstance) -> Self {
        Self {
            kind,
            inst,
            session: None,
            capture: ViewCapture::default(),
        }
    }

    /// Event positions are local to the control view, whose box starts at
    /// the panel padding, so they double as both absolute and relative.
    pub(crate) fn event(&mut self, cx: &mut EventCx, id: ViewId, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                let sample = PointerSample {
                    absolute: e.pos,
                    relative: e.pos,
                };
                let session = {
                    let mut inst = self.inst.borrow_mut();
                    DragSession::begin(&mut inst, self.kind, sample, None, &mut self.capture)
                };
                self.session = Some(session);
                if self.capture.captured.is_some() {
                    cx.update_active(id);
                }
                EventPropagation::Stop
            }
            Event::PointerMove(e) => match &self.session {
                Some(session) => {
                    session.pointer_move(&mut self.inst.borrow_mut(), DocumentId::MAIN, e.pos);
                    EventPropagation::Stop
                }
                None => EventPropagation::Continue,
            },
            Event::PointerUp(_) | Event::FocusLost => {
                if let Some(session) = self.session.take() {
                    session.end(&mut self.inst.borrow_mut(), &mut self.capture);
                }
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }
}

/// Outer box of a slider pointer whose top edge is at `top`, for a slider
/// column starting at `x`.
pub(crate) fn slider_pointer_rect(config: &PickerConfig, x: f64, top: f64) -> Rect {
    let band = 2.0 * config.pointer_border_width + config.pointer_thickness;
    Rect::new(
        x - band,
        top,
        x + config.slider_size + band,
        top + SLIDER_INNER_SPACE + 2.0 * band,
    )
}

/// Border, pointer and border bands around a hollow middle.
pub(crate) fn paint_slider_pointer(cx: &mut PaintCx, config: &PickerConfig, outer: Rect) {
    let bands = [
        (config.pointer_border_width, rgba(POINTER_BORDER_COLOR)),
        (config.pointer_thickness, rgba(POINTER_COLOR)),
        (config.pointer_border_width, rgba(POINTER_BORDER_COLOR)),
    ];
    let mut edge = outer;
    for (width, color) in bands {
        if width > 0.0 {
            let half = width / 2.0;
            cx.stroke(
                &edge.inset(-half),
                color,
                &floem::kurbo::Stroke::new(width),
            );
        }
        edge = edge.inset(-width);
    }
}

/// Top-left of a control's content inside its view box.
pub(crate) fn content_origin(config: &PickerConfig, left: f64) -> Point {
    Point::new(left + config.inset_width, config.padding + config.inset_width)
}
