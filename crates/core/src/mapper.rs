use parallel_timeline_protocol::TimeWindow;

/// Affine map between a time window and a canvas of `width` pixels.
///
/// Rebuilt whenever the window or the canvas width changes; it is cheap and
/// holds no references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    window: TimeWindow,
    width: f64,
    px_per_ms: f64,
}

impl TimeScale {
    /// A non-positive or non-finite `width` yields a zero-density scale:
    /// every time maps to x = 0 and every x maps back to the window start.
    pub fn new(window: TimeWindow, width: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        Self {
            window,
            width,
            px_per_ms: width / window.safe_range(),
        }
    }

    #[inline]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn px_per_ms(&self) -> f64 {
        self.px_per_ms
    }

    #[inline]
    pub fn time_to_x(&self, t: f64) -> f64 {
        (t - self.window.start()) * self.px_per_ms
    }

    #[inline]
    pub fn x_to_time(&self, x: f64) -> f64 {
        if self.px_per_ms > 0.0 {
            self.window.start() + x / self.px_per_ms
        } else {
            self.window.start()
        }
    }

    /// `x_to_time` with `x` first clamped onto the canvas.
    pub fn x_to_time_clamped(&self, x: f64) -> f64 {
        self.x_to_time(x.clamp(0.0, self.width))
    }
}
