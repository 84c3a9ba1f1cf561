/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        alt: false,
        shift: false,
    };
}

/// Mouse button that started a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// A wheel event, with `x` measured from the left edge of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta_y: f64,
    pub x: f64,
    pub modifiers: Modifiers,
}

/// Wheel delta → zoom factor. Positive deltas zoom out.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    (delta_y * WHEEL_ZOOM_RATE).exp()
}

const WHEEL_ZOOM_RATE: f64 = 0.0012;
