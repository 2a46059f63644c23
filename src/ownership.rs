//! The single floating panel shared by every instance, and the page-level
//! input that opens, moves and dismisses it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use floem::kurbo::{Point, Rect, Size};
use tracing::debug;

use crate::element::ElementId;
use crate::instance::{ColorInstance, ExposeFlags};
use crate::pointer::ControlKind;
use crate::position::{solve, Placement, PositionInput, PositionKind};

pub type SharedInstance = Rc<RefCell<ColorInstance>>;

/// Where the panel hangs in the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelParent {
    /// The page body; the panel floats next to its target.
    Body,
    /// A custom container that lays the panel out itself.
    Container(ElementId),
}

impl From<Option<ElementId>> for PanelParent {
    fn from(container: Option<ElementId>) -> Self {
        container.map_or(PanelParent::Body, PanelParent::Container)
    }
}

/// Element-tree and geometry operations the panel needs from its host.
pub trait PanelHost {
    /// Toggle the "active" marker on a target element.
    fn set_active_marker(&mut self, target: ElementId, active: bool);

    /// Move the panel under `parent`.
    fn attach_panel(&mut self, parent: PanelParent);

    fn detach_panel(&mut self);

    fn place_panel(&mut self, placement: &Placement);

    /// Bounds of `target`, in viewport coordinates when `relative_to_viewport`
    /// and page coordinates otherwise.
    fn target_rect(&self, target: ElementId, relative_to_viewport: bool) -> Rect;

    /// Whether `target` or one of its ancestors below the body is fixed
    /// position.
    fn has_fixed_ancestor(&self, target: ElementId) -> bool;

    /// Start reporting scrolls of `target`'s ancestors to
    /// [`PanelOwnership::on_parent_scroll`].
    fn watch_ancestor_scroll(&mut self, _target: ElementId) {}

    /// Scroll offset of the viewport within the page.
    fn view_origin(&self) -> Point;

    fn view_size(&self) -> Size;
}

/// What a page-level pointer press landed on.
#[derive(Debug, Clone)]
pub enum PointerHit {
    /// The target element of an installed instance.
    Target(SharedInstance),
    /// One of the panel's controls; the drag is handled by the control.
    Control(ControlKind),
    Outside,
}

/// Keys that dismiss the panel, matched against key codes.
pub fn is_dismiss_key(code: &str) -> bool {
    matches!(code, "Escape" | "Enter" | "Tab")
}

#[derive(Debug)]
struct Owner {
    instance: Weak<RefCell<ColorInstance>>,
    target: ElementId,
}

/// Tracks which instance owns the shared panel.
///
/// At most one instance is marked active at any time. Create one per page
/// and route pointer-down, key-up, resize and ancestor-scroll events to it.
#[derive(Debug, Default)]
pub struct PanelOwnership {
    owner: Option<Owner>,
    parent: Option<PanelParent>,
}

impl PanelOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current owner, if it is still alive.
    pub fn owner(&self) -> Option<SharedInstance> {
        self.owner.as_ref().and_then(|o| o.instance.upgrade())
    }

    pub fn is_open(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_owner(&self, inst: &SharedInstance) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|o| Weak::ptr_eq(&o.instance, &Rc::downgrade(inst)))
    }

    /// Where the panel is currently attached.
    pub fn parent(&self) -> Option<PanelParent> {
        self.parent
    }

    /// Open the panel for `inst`, taking it over from any other owner.
    pub fn show(&mut self, inst: &SharedInstance, host: &mut impl PanelHost) {
        let (target, parent) = {
            let mut i = inst.borrow_mut();
            let target = i.target();
            i.fixed_or_resolve(|| {
                host.watch_ancestor_scroll(target);
                host.has_fixed_ancestor(target)
            });
            (target, PanelParent::from(i.bindings().container))
        };

        if let Some(old) = self.owner.take() {
            if old.target != target {
                if let Some(old_inst) = old.instance.upgrade() {
                    old_inst.borrow_mut().set_active(false);
                }
                host.set_active_marker(old.target, false);
                debug!(from = %old.target, to = %target, "panel changing owner");
            }
        }

        self.owner = Some(Owner {
            instance: Rc::downgrade(inst),
            target,
        });

        match parent {
            PanelParent::Body => self.reposition(host),
            PanelParent::Container(_) => {
                host.place_panel(&Placement::in_container(inst.borrow().config()))
            }
        }

        if self.parent != Some(parent) {
            host.attach_panel(parent);
            self.parent = Some(parent);
        }

        let mut i = inst.borrow_mut();
        i.set_active(true);
        host.set_active_marker(target, true);
        debug!(%target, ?parent, "panel shown");

        i.expose_color(ExposeFlags::LEAVE_VALUE | ExposeFlags::LEAVE_ALPHA | ExposeFlags::LEAVE_STYLE);
    }

    /// Close the panel if `inst` owns it. Returns whether it did.
    pub fn hide(&mut self, inst: &SharedInstance, host: &mut impl PanelHost) -> bool {
        if !self.is_owner(inst) {
            return false;
        }
        self.close(host);
        true
    }

    /// Re-show the panel if `inst` owns it, picking up configuration changes.
    pub fn redraw(&mut self, inst: &SharedInstance, host: &mut impl PanelHost) {
        if self.is_owner(inst) {
            self.show(inst, host);
        }
    }

    /// Recompute the panel position for the current owner.
    ///
    /// Panels inside a custom container are left where the container put
    /// them.
    pub fn reposition(&self, host: &mut impl PanelHost) {
        let Some(owner) = self.owner() else {
            return;
        };
        let inst = owner.borrow();
        if inst.bindings().container.is_some() {
            return;
        }
        let config = inst.config();
        let fixed = inst.is_fixed();

        let solved = solve(&PositionInput {
            target: host.target_rect(inst.target(), fixed),
            fixed,
            view_origin: host.view_origin(),
            view_size: host.view_size(),
            panel_size: config.picker_outer_dims(inst.has_alpha_slider()),
            side: config.position,
            smart: config.smart_position,
        });
        let kind = if fixed {
            PositionKind::Fixed
        } else {
            PositionKind::Absolute
        };
        host.place_panel(&Placement::new(config, solved.origin, kind, solved.contract_shadow));
    }

    pub fn on_pointer_down(&mut self, hit: &PointerHit, host: &mut impl PanelHost) {
        match hit {
            PointerHit::Target(inst) => {
                let show = inst.borrow().config().show_on_click;
                if show {
                    self.show(inst, host);
                }
            }
            PointerHit::Control(_) => {}
            PointerHit::Outside => self.close(host),
        }
    }

    pub fn on_key_up(&mut self, code: &str, host: &mut impl PanelHost) {
        if is_dismiss_key(code) {
            self.close(host);
        }
    }

    pub fn on_window_resize(&self, host: &mut impl PanelHost) {
        self.reposition(host);
    }

    /// An ancestor of some target scrolled; the panel would drift off its
    /// target, so it closes.
    pub fn on_parent_scroll(&mut self, host: &mut impl PanelHost) {
        self.close(host);
    }

    /// Close the panel and forget the owner, e.g. when the page unloads.
    pub fn teardown(&mut self, host: &mut impl PanelHost) {
        self.close(host);
        self.parent = None;
    }

    fn close(&mut self, host: &mut impl PanelHost) {
        let Some(owner) = self.owner.take() else {
            return;
        };
        if let Some(inst) = owner.instance.upgrade() {
            inst.borrow_mut().set_active(false);
        }
        host.set_active_marker(owner.target, false);
        if self.parent.take().is_some() {
            host.detach_panel();
        }
        debug!(target = %owner.target, "panel hidden");
    }
}
