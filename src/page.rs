//! Everything one window needs to run pickers: installed instances, the
//! shared panel's owner, and the signals the panel views draw from.
//!
//! Event wiring in a Floem app:
//! - a bound element's press calls [`SwatchPage::press_target`] and lets
//!   the event continue;
//! - the root view's `PointerDown` listener calls
//!   [`SwatchPage::press_anywhere`], which closes the panel unless a target
//!   claimed the press on its way up;
//! - the root view's `KeyUp` listener calls [`SwatchPage::key_released`].

use std::rc::Rc;

use floem::keyboard::{Key, NamedKey};
use floem::kurbo::{Point, Rect, Size};
use floem::reactive::{RwSignal, SignalGet, SignalUpdate};
use tracing::debug;

use crate::config::PickerConfig;
use crate::element::{Bindings, ElementId};
use crate::error::PickerError;
use crate::host::{SignalHost, SignalSink};
use crate::instance::ColorInstance;
use crate::ownership::{PanelHost, PanelOwnership, PointerHit, SharedInstance};
use crate::panel::PanelSignals;
use crate::registry::Registry;

/// Code of a named key that can dismiss the panel.
fn key_code(key: &Key) -> Option<&'static str> {
    match key {
        Key::Named(NamedKey::Escape) => Some("Escape"),
        Key::Named(NamedKey::Enter) => Some("Enter"),
        Key::Named(NamedKey::Tab) => Some("Tab"),
        _ => None,
    }
}

pub struct SwatchPage {
    registry: Registry,
    ownership: PanelOwnership,
    host: SignalHost,
    signals: PanelSignals,
    claimed: bool,
}

impl SwatchPage {
    pub fn new(view_size: Size) -> Self {
        let host = SignalHost::new(view_size);
        let signals = PanelSignals {
            owner: RwSignal::new(None),
            geometry: RwSignal::new(None),
            placement: host.placement,
            attached: host.attached,
        };
        Self {
            registry: Registry::new(),
            ownership: PanelOwnership::new(),
            host,
            signals,
            claimed: false,
        }
    }

    pub fn signals(&self) -> PanelSignals {
        self.signals
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ownership(&self) -> &PanelOwnership {
        &self.ownership
    }

    pub fn host(&self) -> &SignalHost {
        &self.host
    }

    /// Install a picker whose output goes to a fresh [`SignalSink`].
    ///
    /// `value_text` is what the value element holds before the picker
    /// takes it over.
    pub fn install(
        &mut self,
        config: PickerConfig,
        bindings: Bindings,
        value_text: Option<&str>,
    ) -> Result<(SharedInstance, SignalSink), PickerError> {
        let sink = SignalSink::new(self.signals.geometry);
        let mut builder = ColorInstance::builder(config, bindings).sink(sink);
        if let Some(text) = value_text {
            builder = builder.value_text(text);
        }
        let inst = self.registry.install(builder)?;
        Ok((inst, sink))
    }

    /// Remove a picker, closing the panel first if it owns it.
    pub fn uninstall(&mut self, target: ElementId) -> Option<SharedInstance> {
        let inst = self.registry.remove(target)?;
        self.ownership.hide(&inst, &mut self.host);
        self.sync_owner();
        Some(inst)
    }

    pub fn show(&mut self, target: ElementId) -> Result<(), PickerError> {
        let inst = self
            .registry
            .get(target)
            .ok_or(PickerError::MissingTarget)?;
        self.ownership.show(&inst, &mut self.host);
        self.sync_owner();
        Ok(())
    }

    /// Close the panel, whoever owns it.
    pub fn hide(&mut self) {
        if let Some(owner) = self.ownership.owner() {
            self.ownership.hide(&owner, &mut self.host);
        }
        self.sync_owner();
    }

    /// A bound element of `target` was pressed.
    pub fn press_target(&mut self, target: ElementId) {
        self.claimed = true;
        if let Some(inst) = self.registry.get(target) {
            self.ownership
                .on_pointer_down(&PointerHit::Target(inst), &mut self.host);
            self.sync_owner();
        }
    }

    /// A press reached the root view.
    pub fn press_anywhere(&mut self) {
        if !std::mem::take(&mut self.claimed) {
            self.ownership
                .on_pointer_down(&PointerHit::Outside, &mut self.host);
            self.sync_owner();
        }
    }

    /// A key code such as `"Escape"` was released.
    pub fn key_up(&mut self, code: &str) {
        self.ownership.on_key_up(code, &mut self.host);
        self.sync_owner();
    }

    /// A key was released, as reported by a Floem `KeyUp` event.
    pub fn key_released(&mut self, key: &Key) {
        if let Some(code) = key_code(key) {
            self.key_up(code);
        }
    }

    /// Report where `target` is in the window.
    pub fn set_target_rect(&mut self, target: ElementId, rect: Rect) {
        self.host.set_target_rect(target, rect);
    }

    pub fn set_fixed(&mut self, target: ElementId, fixed: bool) {
        self.host.set_fixed(target, fixed);
    }

    pub fn window_resized(&mut self, size: Size) {
        let origin = self.host.view_origin();
        self.host.set_viewport(origin, size);
        self.ownership.on_window_resize(&mut self.host);
    }

    /// The page scrolled to `origin`; a floating panel keeps to its target.
    pub fn scrolled(&mut self, origin: Point) {
        let size = self.host.view_size();
        self.host.set_viewport(origin, size);
        self.ownership.reposition(&mut self.host);
    }

    /// A scroll container around `target` scrolled.
    pub fn ancestor_scrolled(&mut self, target: ElementId) {
        if self.host.is_watched(target) {
            self.ownership.on_parent_scroll(&mut self.host);
            self.sync_owner();
        }
    }

    /// Close everything, e.g. before the window goes away.
    pub fn teardown(&mut self) {
        self.ownership.teardown(&mut self.host);
        self.sync_owner();
    }

    /// Publish the owner to the panel views. Runs with no instance
    /// borrowed, since rebuilding the panel reads the owner's config.
    fn sync_owner(&mut self) {
        let owner = self.ownership.owner();
        let changed = match (&owner, &self.signals.owner.get_untracked()) {
            (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        if changed {
            debug!(open = owner.is_some(), "panel owner published");
            self.signals.owner.set(owner);
        }
    }
}
