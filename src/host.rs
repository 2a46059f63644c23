//! Reactive adapters between the headless picker and Floem views.
//!
//! Instances push their output into signals here and views subscribe to
//! them. Effects reading these signals must never borrow an instance: the
//! signals are set while the instance is mutably borrowed.

use std::collections::{BTreeMap, BTreeSet};

use floem::kurbo::{Point, Rect, Size};
use floem::reactive::{RwSignal, SignalGet, SignalUpdate};

use crate::element::ElementId;
use crate::instance::{ColorSink, PickerEvent, Preview};
use crate::ownership::{PanelHost, PanelParent};
use crate::pointer::PanelGeometry;
use crate::position::{Placement, PositionKind};

/// A [`ColorSink`] that stores everything in signals.
///
/// One per instance. `panel` is shared by every sink of a page since only
/// the owner of the panel redraws it.
#[derive(Clone, Copy)]
pub struct SignalSink {
    pub value_text: RwSignal<String>,
    pub alpha_text: RwSignal<String>,
    /// `None` while the preview is cleared.
    pub preview: RwSignal<Option<Preview>>,
    /// Last event dispatched on the value element.
    pub event: RwSignal<Option<PickerEvent>>,
    pub panel: RwSignal<Option<PanelGeometry>>,
}

impl SignalSink {
    pub fn new(panel: RwSignal<Option<PanelGeometry>>) -> Self {
        Self {
            value_text: RwSignal::new(String::new()),
            alpha_text: RwSignal::new(String::new()),
            preview: RwSignal::new(None),
            event: RwSignal::new(None),
            panel,
        }
    }
}

impl ColorSink for SignalSink {
    fn value_text(&mut self, _element: ElementId, text: &str) {
        if self.value_text.get_untracked() != text {
            self.value_text.set(text.to_string());
        }
    }

    fn alpha_text(&mut self, _element: ElementId, text: &str) {
        if self.alpha_text.get_untracked() != text {
            self.alpha_text.set(text.to_string());
        }
    }

    fn preview(&mut self, _element: ElementId, preview: &Preview) {
        self.preview.set(Some(preview.clone()));
    }

    fn clear_preview(&mut self, _element: ElementId) {
        self.preview.set(None);
    }

    fn redraw_panel(&mut self, geometry: &PanelGeometry) {
        self.panel.set(Some(geometry.clone()));
    }

    fn dispatch(&mut self, _element: Option<ElementId>, event: PickerEvent) {
        self.event.set(Some(event));
    }
}

/// A [`PanelHost`] over a Floem window.
///
/// Target bounds are reported by the embedding views in window
/// coordinates, which are the viewport. Page coordinates add the scroll
/// offset in `view_origin`.
pub struct SignalHost {
    /// Last placement, with the origin in window coordinates.
    pub placement: RwSignal<Option<Placement>>,
    pub attached: RwSignal<Option<PanelParent>>,
    pub active: RwSignal<BTreeSet<ElementId>>,
    rects: BTreeMap<ElementId, Rect>,
    fixed: BTreeSet<ElementId>,
    watched: BTreeSet<ElementId>,
    view_origin: Point,
    view_size: Size,
}

impl SignalHost {
    pub fn new(view_size: Size) -> Self {
        Self {
            placement: RwSignal::new(None),
            attached: RwSignal::new(None),
            active: RwSignal::new(BTreeSet::new()),
            rects: BTreeMap::new(),
            fixed: BTreeSet::new(),
            watched: BTreeSet::new(),
            view_origin: Point::ZERO,
            view_size,
        }
    }

    /// Record where `target` is in the window.
    pub fn set_target_rect(&mut self, target: ElementId, rect: Rect) {
        self.rects.insert(target, rect);
    }

    /// Mark `target` as living in a fixed-position layer.
    pub fn set_fixed(&mut self, target: ElementId, fixed: bool) {
        if fixed {
            self.fixed.insert(target);
        } else {
            self.fixed.remove(&target);
        }
    }

    pub fn set_viewport(&mut self, origin: Point, size: Size) {
        self.view_origin = origin;
        self.view_size = size;
    }

    /// Whether scrolls around `target` should be reported.
    pub fn is_watched(&self, target: ElementId) -> bool {
        self.watched.contains(&target)
    }

    /// Page coordinates to window coordinates. Fixed and in-container
    /// placements are already relative to what they are drawn in.
    fn window_origin(&self, placement: &Placement) -> Point {
        match placement.kind {
            PositionKind::Absolute => placement.origin - self.view_origin.to_vec2(),
            PositionKind::Fixed | PositionKind::Relative => placement.origin,
        }
    }
}

impl PanelHost for SignalHost {
    fn set_active_marker(&mut self, target: ElementId, active: bool) {
        self.active.update(|set| {
            if active {
                set.insert(target);
            } else {
                set.remove(&target);
            }
        });
    }

    fn attach_panel(&mut self, parent: PanelParent) {
        self.attached.set(Some(parent));
    }

    fn detach_panel(&mut self) {
        self.attached.set(None);
    }

    /// Stored in window coordinates.
    fn place_panel(&mut self, placement: &Placement) {
        let origin = self.window_origin(placement);
        self.placement.set(Some(Placement {
            origin,
            ..placement.clone()
        }));
    }

    fn target_rect(&self, target: ElementId, relative_to_viewport: bool) -> Rect {
        let rect = self.rects.get(&target).copied().unwrap_or_default();
        if relative_to_viewport {
            rect
        } else {
            rect + self.view_origin.to_vec2()
        }
    }

    fn has_fixed_ancestor(&self, target: ElementId) -> bool {
        self.fixed.contains(&target)
    }

    fn watch_ancestor_scroll(&mut self, target: ElementId) {
        self.watched.insert(target);
    }

    fn view_origin(&self) -> Point {
        self.view_origin
    }

    fn view_size(&self) -> Size {
        self.view_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickerConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_rects_add_the_scroll_offset() {
        let mut host = SignalHost::new(Size::new(800.0, 600.0));
        host.set_target_rect(ElementId(1), Rect::new(10.0, 20.0, 110.0, 40.0));
        host.set_viewport(Point::new(0.0, 300.0), Size::new(800.0, 600.0));

        assert_eq!(
            host.target_rect(ElementId(1), true),
            Rect::new(10.0, 20.0, 110.0, 40.0)
        );
        assert_eq!(
            host.target_rect(ElementId(1), false),
            Rect::new(10.0, 320.0, 110.0, 340.0)
        );
        assert_eq!(host.target_rect(ElementId(9), true), Rect::ZERO);
    }

    #[test]
    fn floating_panels_are_placed_in_window_coordinates() {
        let config = PickerConfig::default();
        let mut host = SignalHost::new(Size::new(800.0, 600.0));
        host.set_viewport(Point::new(0.0, 300.0), Size::new(800.0, 600.0));

        let absolute = Placement::new(&config, Point::new(10.0, 340.0), PositionKind::Absolute, false);
        host.place_panel(&absolute);
        let placed = host.placement.get_untracked().unwrap();
        assert_eq!(placed.origin, Point::new(10.0, 40.0));
        assert_eq!(placed.shadow, absolute.shadow);

        let fixed = Placement::new(&config, Point::new(10.0, 40.0), PositionKind::Fixed, false);
        host.place_panel(&fixed);
        assert_eq!(host.placement.get_untracked().unwrap().origin, Point::new(10.0, 40.0));
    }

    #[test]
    fn markers_and_attachment_are_observable() {
        let mut host = SignalHost::new(Size::new(800.0, 600.0));
        host.set_active_marker(ElementId(1), true);
        host.set_active_marker(ElementId(2), true);
        host.set_active_marker(ElementId(1), false);
        assert_eq!(
            host.active.get_untracked().into_iter().collect::<Vec<_>>(),
            vec![ElementId(2)]
        );

        host.attach_panel(PanelParent::Body);
        assert_eq!(host.attached.get_untracked(), Some(PanelParent::Body));
        host.detach_panel();
        assert_eq!(host.attached.get_untracked(), None);
    }

    #[test]
    fn sink_stores_output_in_signals() {
        let panel = RwSignal::new(None);
        let mut sink = SignalSink::new(panel);
        sink.value_text(ElementId(1), "FF0000");
        assert_eq!(sink.value_text.get_untracked(), "FF0000");

        sink.dispatch(Some(ElementId(1)), PickerEvent::Change);
        assert_eq!(sink.event.get_untracked(), Some(PickerEvent::Change));

        sink.clear_preview(ElementId(1));
        assert_eq!(sink.preview.get_untracked(), None);
    }
}
