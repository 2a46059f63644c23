//! The shared picker panel: pad, sliders and the optional close button.
//!
//! One panel exists per page. Its content is rebuilt whenever another
//! instance takes it over; position and shadow follow the host's placement.

use floem::event::EventListener;
use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalWith};

use crate::color::parse_color_string;
use crate::config::PickerConfig;
use crate::constants::{BUTTON_FONT, INSET_COLOR, PANEL_BACKGROUND, PANEL_BORDER};
use crate::control::rgba;
use crate::element::ElementId;
use crate::ownership::{PanelParent, SharedInstance};
use crate::pad::pad;
use crate::pointer::PanelGeometry;
use crate::position::Placement;
use crate::slider::channel_slider;

#[cfg(feature = "alpha")]
use crate::alpha_slider::alpha_slider;

/// Everything the panel views observe. Owned by a
/// [`SwatchPage`](crate::page::SwatchPage).
#[derive(Clone, Copy)]
pub struct PanelSignals {
    pub owner: RwSignal<Option<SharedInstance>>,
    pub geometry: RwSignal<Option<PanelGeometry>>,
    /// Placement in window coordinates.
    pub placement: RwSignal<Option<Placement>>,
    pub attached: RwSignal<Option<PanelParent>>,
}

/// Parse a CSS color such as `rgba(0,0,0,0.2)`.
pub(crate) fn css_color(text: &str) -> Option<Color> {
    let c = parse_color_string(text)?;
    let a = c.a.unwrap_or(1.0).clamp(0.0, 1.0);
    Some(Color::rgba8(
        c.r.round() as u8,
        c.g.round() as u8,
        c.b.round() as u8,
        (a * 255.0).round() as u8,
    ))
}

fn has_alpha(geometry: RwSignal<Option<PanelGeometry>>) -> bool {
    geometry.with(|g| g.as_ref().is_some_and(|g| g.alpha.is_some()))
}

fn close_button(config: &PickerConfig, on_close: impl Fn() + 'static) -> impl View {
    let text = config.close_text.clone();
    let padding = config.padding;
    let height = config.button_height + 2.0 * config.inset_width;
    let inset = config.inset_width;
    label(move || text.clone())
        .style(move |s| {
            s.height(height)
                .margin_horiz(padding)
                .margin_bottom(padding)
                .border(inset)
                .border_color(rgba(INSET_COLOR))
                .font_size(BUTTON_FONT)
                .items_center()
                .justify_center()
                .cursor(floem::style::CursorStyle::Pointer)
        })
        .on_click_stop(move |_| on_close())
}

/// Panel content for `inst`.
pub(crate) fn color_panel(
    inst: SharedInstance,
    geometry: RwSignal<Option<PanelGeometry>>,
    on_close: impl Fn() + 'static,
) -> impl IntoView {
    let config = inst.borrow().config().clone();

    let slider = match config.slider_channel() {
        Some(_) => channel_slider(inst.clone(), geometry).into_any(),
        None => empty().into_any(),
    };
    #[cfg(feature = "alpha")]
    let alpha = alpha_slider(inst.clone(), geometry)
        .style(move |s| s.apply_if(!has_alpha(geometry), |s| s.hide()))
        .into_any();
    #[cfg(not(feature = "alpha"))]
    let alpha = empty().into_any();

    let closable = config.closable;
    let button = close_button(&config, on_close)
        .style(move |s| s.apply_if(!closable, |s| s.hide()));

    let border = config.border_width;
    let radius = config.effective_border_radius();
    let padding_right = config.padding;

    v_stack((
        h_stack((pad(inst, geometry), slider, alpha)).style(move |s| s.padding_right(padding_right)),
        button,
    ))
    .style(move |s| {
        let dims = config.picker_outer_dims(has_alpha(geometry));
        s.width(dims.width)
            .height(dims.height)
            .border(border)
            .border_color(rgba(PANEL_BORDER))
            .border_radius(radius)
            .background(rgba(PANEL_BACKGROUND))
    })
    // Presses between the controls stay inside the panel.
    .on_event_stop(EventListener::PointerDown, |_| {})
}

fn owned_panel(signals: PanelSignals, on_close: impl Fn() + Clone + 'static) -> impl View {
    dyn_container(
        move || signals.owner.get(),
        move |owner| match owner {
            Some(inst) => color_panel(inst, signals.geometry, on_close.clone()).into_any(),
            None => empty().into_any(),
        },
    )
}

fn apply_shadow(s: floem::style::Style, placement: Option<&Placement>) -> floem::style::Style {
    let Some(shadow) = placement.and_then(|p| p.shadow.as_ref()) else {
        return s;
    };
    let color = css_color(&shadow.color).unwrap_or(Color::rgba8(0, 0, 0, 51));
    s.box_shadow_h_offset(shadow.h_offset)
        .box_shadow_v_offset(shadow.v_offset)
        .box_shadow_blur(shadow.blur)
        .box_shadow_spread(shadow.spread)
        .box_shadow_color(color)
}

/// The panel floating over the window next to its owner's target. Put it
/// last in the root view so it paints above everything else.
pub fn floating_panel(signals: PanelSignals, on_close: impl Fn() + Clone + 'static) -> impl IntoView {
    owned_panel(signals, on_close).style(move |s| {
        let floating = signals.attached.get() == Some(PanelParent::Body);
        signals.placement.with(|placement| {
            let origin = placement.as_ref().map(|p| p.origin).unwrap_or_default();
            apply_shadow(s, placement.as_ref())
                .absolute()
                .inset_left(origin.x)
                .inset_top(origin.y)
                .z_index(1000)
                .apply_if(!floating, |s| s.hide())
        })
    })
}

/// The panel inside the custom container `container`, laid out by it.
pub fn container_panel(
    signals: PanelSignals,
    container: ElementId,
    on_close: impl Fn() + Clone + 'static,
) -> impl IntoView {
    owned_panel(signals, on_close).style(move |s| {
        let here = signals.attached.get() == Some(PanelParent::Container(container));
        signals
            .placement
            .with(|placement| apply_shadow(s, placement.as_ref()))
            .apply_if(!here, |s| s.hide())
    })
}
