use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether `p` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WindowError {
    #[error("degenerate time window: end ({end}) must be greater than start ({start})")]
    Degenerate { start: f64, end: f64 },
    #[error("time window bounds must be finite (start={start}, end={end})")]
    NonFinite { start: f64, end: f64 },
}

/// The visible `[start, end]` time range, in milliseconds.
///
/// `end > start` holds for every value of this type: the only way to build one
/// is [`TimeWindow::new`], and deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: f64,
    end: f64,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = WindowError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Window used when an uncontrolled timeline has no default view.
    pub const FALLBACK: TimeWindow = TimeWindow {
        start: 0.0,
        end: 60_000.0,
    };

    pub fn new(start: f64, end: f64) -> Result<Self, WindowError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(WindowError::NonFinite { start, end });
        }
        if end <= start {
            return Err(WindowError::Degenerate { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Raw width of the window.
    #[inline]
    pub fn range(&self) -> f64 {
        self.end - self.start
    }

    /// Width floored at 1ms, safe to divide by.
    #[inline]
    pub fn safe_range(&self) -> f64 {
        self.range().max(1.0)
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Why the viewport changed. Passed with every view-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewChangeReason {
    Pan,
    Zoom,
    Follow,
    Programmatic,
}

impl std::fmt::Display for ViewChangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pan => write!(f, "pan"),
            Self::Zoom => write!(f, "zoom"),
            Self::Follow => write!(f, "follow"),
            Self::Programmatic => write!(f, "programmatic"),
        }
    }
}
