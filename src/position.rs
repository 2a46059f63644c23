//! Where the floating panel goes relative to its target element.

use std::fmt;

use floem::kurbo::{Point, Rect, Size};

use crate::config::{PickerConfig, Side};

/// How the panel's origin is interpreted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    /// Page coordinates.
    Absolute,
    /// Viewport coordinates; the target sits in a fixed-position ancestor.
    Fixed,
    /// Inside a custom container, at the container's origin.
    Relative,
}

/// A CSS-style box shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShadow {
    pub h_offset: f64,
    pub v_offset: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub inset: bool,
}

impl fmt::Display for BoxShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px {}",
            self.h_offset.round(),
            self.v_offset.round(),
            self.blur.round(),
            self.spread.round(),
            self.color
        )?;
        if self.inset {
            f.write_str(" inset")?;
        }
        Ok(())
    }
}

/// Final position and shadow of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub origin: Point,
    pub kind: PositionKind,
    pub shadow: Option<BoxShadow>,
}

impl Placement {
    pub fn new(config: &PickerConfig, origin: Point, kind: PositionKind, contract_shadow: bool) -> Self {
        let v_offset = if contract_shadow { 0.0 } else { config.shadow_blur };
        Self {
            origin,
            kind,
            shadow: config.shadow.then(|| BoxShadow {
                h_offset: 0.0,
                v_offset,
                blur: config.shadow_blur,
                spread: 0.0,
                color: config.shadow_color.clone(),
                inset: false,
            }),
        }
    }

    /// Placement inside a custom container, which does its own layout.
    pub fn in_container(config: &PickerConfig) -> Self {
        Self::new(config, Point::ZERO, PositionKind::Relative, false)
    }
}

/// Geometry the solver works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionInput {
    /// Target bounds, in viewport coordinates when `fixed` and page
    /// coordinates otherwise.
    pub target: Rect,
    pub fixed: bool,
    /// Scroll offset of the viewport. Ignored when `fixed`.
    pub view_origin: Point,
    pub view_size: Size,
    /// Panel size including its border.
    pub panel_size: Size,
    pub side: Side,
    pub smart: bool,
}

/// Output of [`solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solved {
    pub origin: Point,
    /// The panel is level with or above the target's bottom edge, so a
    /// downward shadow would fall over the target.
    pub contract_shadow: bool,
}

/// Compute the panel origin.
///
/// Axis `a` runs along the target's attached edge and axis `b` away from
/// it; `c` is +1 when the panel opens toward increasing coordinates. With
/// smart positioning, the main axis flips by comparing the target's center
/// to the viewport middle, while the cross axis only slides when an edge
/// would go off screen.
pub fn solve(input: &PositionInput) -> Solved {
    let tp = [input.target.x0, input.target.y0];
    let ts = [input.target.width(), input.target.height()];
    let vp = if input.fixed {
        [0.0, 0.0]
    } else {
        [input.view_origin.x, input.view_origin.y]
    };
    let vs = [input.view_size.width, input.view_size.height];
    let ps = [input.panel_size.width, input.panel_size.height];

    let (a, b, c) = match input.side {
        Side::Left => (1, 0, -1.0),
        Side::Right => (1, 0, 1.0),
        Side::Top => (0, 1, -1.0),
        Side::Bottom => (0, 1, 1.0),
    };
    let l = (ts[b] + ps[b]) / 2.0;
    let toward = tp[b] + ts[b] - l + l * c;
    let away = tp[b] + ts[b] - l - l * c;

    let mut pp = [0.0; 2];
    if !input.smart {
        pp[0] = tp[a];
        pp[1] = toward;
    } else {
        pp[0] = if -vp[a] + tp[a] + ps[a] > vs[a] {
            if -vp[a] + tp[a] + ts[a] / 2.0 > vs[a] / 2.0 && tp[a] + ts[a] - ps[a] >= 0.0 {
                tp[a] + ts[a] - ps[a]
            } else {
                tp[a]
            }
        } else {
            tp[a]
        };
        pp[1] = if -vp[b] + tp[b] + ts[b] + ps[b] - l + l * c > vs[b] {
            if -vp[b] + tp[b] + ts[b] / 2.0 > vs[b] / 2.0 && away >= 0.0 {
                away
            } else {
                toward
            }
        } else if toward >= 0.0 {
            toward
        } else {
            away
        };
    }

    let contract_shadow = (pp[0] + ps[0] > tp[0] || pp[0] < tp[0] + ts[0])
        && (pp[1] + ps[1] < tp[1] + ts[1]);

    Solved {
        origin: Point::new(pp[a], pp[b]),
        contract_shadow,
    }
}
