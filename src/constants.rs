//! Fixed sizes and colors the configuration does not cover.

/// Gap in px between the two halves of a slider pointer.
pub const SLIDER_INNER_SPACE: f64 = 3.0;

/// Checkerboard square size behind alpha previews.
pub const CHECKER_CELL: u32 = 8;

/// Checkerboard colors. The top-left square is light.
pub const CHECKER_DARK: [u8; 3] = [0x99, 0x99, 0x99];
pub const CHECKER_LIGHT: [u8; 3] = [0xCC, 0xCC, 0xCC];

/// Panel background, border and inset colors.
pub const PANEL_BACKGROUND: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
pub const PANEL_BORDER: [u8; 4] = [0xBB, 0xBB, 0xBB, 0xFF];
pub const INSET_COLOR: [u8; 4] = [0xBB, 0xBB, 0xBB, 0xFF];

/// Pointer fill and border colors.
pub const POINTER_COLOR: [u8; 4] = [0x4C, 0x4C, 0x4C, 0xFF];
pub const POINTER_BORDER_COLOR: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Close button label size.
pub const BUTTON_FONT: f32 = 12.0;
