//! Floem widgets for the elements an instance binds to.
//!
//! Text flows from the instance through its [`SignalSink`]; edits flow back
//! through event handlers, never through effects, so that an instance is
//! only borrowed outside its own exposure.

use floem::event::{Event, EventListener, EventPropagation};
use floem::keyboard::{Key, NamedKey};
use floem::prelude::*;
use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate, SignalWith};

use crate::config::PreviewPosition;
use crate::host::SignalSink;
use crate::ownership::SharedInstance;
use crate::preview::{stripe, swatch};

fn is_enter(event: &Event) -> bool {
    match event {
        Event::KeyDown(ke) => ke.key.logical_key == Key::Named(NamedKey::Enter),
        _ => false,
    }
}

/// Text state of one bound input: what the field shows, what it showed at
/// the last keystroke we handled, and at the last committed change.
#[derive(Clone, Copy)]
struct FieldText {
    text: RwSignal<String>,
    typed: RwSignal<String>,
    committed: RwSignal<String>,
}

impl FieldText {
    /// Follow `source`, treating its updates as already committed.
    fn follow(source: RwSignal<String>) -> Self {
        let initial = source.get_untracked();
        let field = Self {
            text: RwSignal::new(initial.clone()),
            typed: RwSignal::new(initial.clone()),
            committed: RwSignal::new(initial),
        };
        create_effect(move |_| {
            let value = source.get();
            if field.text.get_untracked() != value {
                field.text.set(value.clone());
            }
            field.typed.set(value.clone());
            field.committed.set(value);
        });
        field
    }

    /// The text, if it changed since the last keystroke.
    fn take_typed(&self) -> Option<String> {
        let raw = self.text.get_untracked();
        if raw == self.typed.get_untracked() {
            return None;
        }
        self.typed.set(raw.clone());
        Some(raw)
    }

    /// Whether a change event is due.
    fn take_changed(&self) -> bool {
        let raw = self.text.get_untracked();
        if raw == self.committed.get_untracked() {
            return false;
        }
        self.committed.set(raw);
        true
    }
}

fn field_style(s: floem::style::Style) -> floem::style::Style {
    s.padding(2.0)
        .font_size(12.0)
        .font_family("monospace".to_string())
        .background(Color::WHITE)
        .border(1.0)
        .border_color(Color::rgb8(200, 200, 200))
        .border_radius(3.0)
}

/// The value input: a text field with the preview stripe on its configured
/// side. `on_press` runs when the field is pressed, typically to show the
/// panel.
pub fn value_input(
    inst: SharedInstance,
    sink: SignalSink,
    on_press: impl Fn() + 'static,
) -> impl IntoView {
    let field = FieldText::follow(sink.value_text);
    let stripe_width = inst.borrow().config().preview_size;
    let preview = sink.preview;

    let typing = inst.clone();
    let entering = inst.clone();
    let leaving = inst;

    h_stack((
        stripe(sink, stripe_width, PreviewPosition::Left),
        text_input(field.text)
            .style(move |s| {
                let (left, right) = preview.with(|p| {
                    p.as_ref()
                        .map_or((None, None), |p| (p.padding_left, p.padding_right))
                });
                field_style(s)
                    .flex_grow(1.0)
                    .apply_opt(left, |s, pad| s.padding_left(pad - stripe_width))
                    .apply_opt(right, |s, pad| s.padding_right(pad - stripe_width))
            })
            .on_event_cont(EventListener::PointerDown, move |_| on_press())
            .on_event_cont(EventListener::KeyUp, move |_| {
                if let Some(raw) = field.take_typed() {
                    typing.borrow_mut().on_value_input(&raw);
                }
            })
            .on_event(EventListener::KeyDown, move |e| {
                if is_enter(e) && field.take_changed() {
                    entering.borrow_mut().on_value_change();
                }
                EventPropagation::Continue
            })
            .on_event_stop(EventListener::FocusLost, move |_| {
                let raw = field.text.get_untracked();
                let mut inst = leaving.borrow_mut();
                if field.take_changed() {
                    inst.on_value_change();
                }
                inst.on_value_blur(&raw);
            }),
        stripe(sink, stripe_width, PreviewPosition::Right),
    ))
    .style(|s| s.width_full())
}

/// The alpha input, showing alpha rounded to two decimals.
pub fn alpha_input(inst: SharedInstance, sink: SignalSink) -> impl IntoView {
    let field = FieldText::follow(sink.alpha_text);

    let typing = inst.clone();
    let entering = inst.clone();
    let leaving = inst;

    text_input(field.text)
        .style(|s| field_style(s).width(40.0))
        .on_event_cont(EventListener::KeyUp, move |_| {
            if let Some(raw) = field.take_typed() {
                typing.borrow_mut().on_alpha_input(&raw);
            }
        })
        .on_event(EventListener::KeyDown, move |e| {
            if is_enter(e) && field.take_changed() {
                entering.borrow_mut().on_alpha_change();
            }
            EventPropagation::Continue
        })
        .on_event_stop(EventListener::FocusLost, move |_| {
            let raw = field.text.get_untracked();
            let mut inst = leaving.borrow_mut();
            if field.take_changed() {
                inst.on_alpha_change();
            }
            inst.on_alpha_blur(&raw);
        })
}

/// A button showing the color. Without a label the swatch fills it;
/// with one, the swatch is a stripe beside the label.
pub fn color_button(
    sink: SignalSink,
    text: Option<String>,
    preview_size: f64,
    on_press: impl Fn() + 'static,
) -> impl IntoView {
    let body = match text {
        None => swatch(sink).style(|s| s.size_full()).into_any(),
        Some(text) => h_stack((
            stripe(sink, preview_size, PreviewPosition::Left),
            label(move || text.clone()).style(|s| s.padding_horiz(6.0).items_center()),
            stripe(sink, preview_size, PreviewPosition::Right),
        ))
        .style(|s| s.height_full())
        .into_any(),
    };
    container(body)
        .style(|s| {
            s.min_width(32.0)
                .height(24.0)
                .border(1.0)
                .border_color(Color::rgb8(200, 200, 200))
                .border_radius(3.0)
                .cursor(floem::style::CursorStyle::Pointer)
        })
        // The root listener has to see the press to consume the claim.
        .on_event_cont(EventListener::PointerDown, move |_| on_press())
}
