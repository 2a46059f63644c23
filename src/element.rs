//! Handles for the page objects the picker is attached to.
//!
//! The picker never inspects page elements itself. Whoever embeds it mints
//! these ids and states up front what role each bound element plays.

use std::fmt;

/// Opaque handle to a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a document (the main one, or a parent frame's).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl DocumentId {
    pub const MAIN: DocumentId = DocumentId(0);
}

/// What kind of element a bound element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Editable single-line text field.
    TextInput,
    /// Push button; `empty` when it carries no label text.
    Button { empty: bool },
    Other,
}

impl ElementRole {
    pub fn is_text_input(self) -> bool {
        matches!(self, ElementRole::TextInput)
    }

    /// Elements whose own content is visible next to a preview stripe.
    pub(crate) fn shows_content(self) -> bool {
        matches!(self, ElementRole::TextInput | ElementRole::Button { empty: false })
    }
}

/// An element bound to an instance, with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundElement {
    pub id: ElementId,
    pub role: ElementRole,
}

/// The preview element plus its original horizontal paddings, captured
/// before the picker restyles it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewElement {
    pub element: BoundElement,
    pub padding_left: f64,
    pub padding_right: f64,
}

/// Elements an instance is wired to.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    pub target: BoundElement,
    /// Where the panel is attached; the page body when `None`.
    pub container: Option<ElementId>,
    /// Shows and accepts the color text.
    pub value: Option<BoundElement>,
    /// Shows and accepts the alpha value.
    pub alpha: Option<BoundElement>,
    pub preview: Option<PreviewElement>,
}

impl Bindings {
    /// Binds `target` and fills in the defaults the widget normally uses:
    /// a text input target doubles as the value element, and the target is
    /// always the preview element.
    pub fn for_target(target: ElementId, role: ElementRole) -> Self {
        let bound = BoundElement { id: target, role };
        Self {
            target: bound,
            container: None,
            value: role.is_text_input().then_some(bound),
            alpha: None,
            preview: Some(PreviewElement {
                element: bound,
                padding_left: 0.0,
                padding_right: 0.0,
            }),
        }
    }

    pub fn with_container(mut self, container: ElementId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_value(mut self, value: BoundElement) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_alpha(mut self, alpha: BoundElement) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_preview(mut self, preview: Option<PreviewElement>) -> Self {
        self.preview = preview;
        self
    }
}
