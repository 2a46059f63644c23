//! Installed instances, keyed by target element.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::config::PickerConfig;
use crate::element::{Bindings, BoundElement, ElementId};
use crate::error::PickerError;
use crate::instance::{ColorInstance, InstanceBuilder, PickerEvent};
use crate::ownership::SharedInstance;

/// At most one instance per target element.
#[derive(Debug, Default)]
pub struct Registry {
    instances: BTreeMap<ElementId, SharedInstance>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register an instance.
    pub fn install(&mut self, builder: InstanceBuilder) -> Result<SharedInstance, PickerError> {
        let target = builder.target();
        if self.instances.contains_key(&target) {
            return Err(PickerError::AlreadyInstalled(target));
        }
        let inst = Rc::new(RefCell::new(builder.build()?));
        self.instances.insert(target, inst.clone());
        debug!(%target, total = self.instances.len(), "registered color picker");
        Ok(inst)
    }

    /// Install on an element found by lookup, with default bindings.
    pub fn install_on(
        &mut self,
        target: Option<BoundElement>,
        config: PickerConfig,
    ) -> Result<SharedInstance, PickerError> {
        let target = target.ok_or(PickerError::MissingTarget)?;
        self.install(ColorInstance::builder(
            config,
            Bindings::for_target(target.id, target.role),
        ))
    }

    pub fn get(&self, target: ElementId) -> Option<SharedInstance> {
        self.instances.get(&target).cloned()
    }

    pub fn remove(&mut self, target: ElementId) -> Option<SharedInstance> {
        self.instances.remove(&target)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &SharedInstance)> {
        self.instances.iter().map(|(id, inst)| (*id, inst))
    }

    /// Fire `event` on every instance, in target order.
    pub fn trigger_all(&self, event: PickerEvent) {
        for inst in self.instances.values() {
            inst.borrow_mut().trigger(event);
        }
    }

    /// Fire each event of a whitespace-separated list such as
    /// `"input change"` on every instance.
    pub fn trigger_names(&self, names: &str) -> Result<(), PickerError> {
        let events = names
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<PickerEvent>, _>>()?;
        for event in events {
            self.trigger_all(event);
        }
        Ok(())
    }
}
