use serde::Serialize;
use tracing::warn;

use crate::config::LayoutOptions;

/// Half-open range of lane rows to render, plus the spacer heights that
/// stand in for the rows skipped above and below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
    pub top_pad_px: f64,
    pub bot_pad_px: f64,
}

/// One lane row placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneRow {
    pub lane_index: usize,
    pub y: f64,
    pub height: f64,
}

impl VisibleWindow {
    /// Every lane, no padding.
    pub fn full(lane_count: usize) -> Self {
        Self {
            start: 0,
            end: lane_count,
            top_pad_px: 0.0,
            bot_pad_px: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, lane_index: usize) -> bool {
        (self.start..self.end).contains(&lane_index)
    }
}

/// Lane rows intersecting the scroll viewport, widened by `overscan` rows on
/// each side.
///
/// `stride` is the row pitch (row height plus gap). The result is always a
/// sub-range of `0..lane_count`, and the two pads plus the rendered rows
/// always add up to `lane_count * stride`.
pub fn compute_visible_window(
    scroll_top: f64,
    height: f64,
    stride: f64,
    lane_count: usize,
    overscan: usize,
) -> VisibleWindow {
    if stride.is_nan() || stride <= 0.0 {
        warn!(stride, "non-positive row stride, rendering every lane");
        return VisibleWindow::full(lane_count);
    }
    let scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };
    let height = if height.is_finite() { height.max(0.0) } else { 0.0 };

    // Float to usize casts saturate, so huge scroll offsets stay in range.
    let first_visible = (scroll_top / stride).floor() as usize;
    let last_visible = ((scroll_top + height) / stride).ceil() as usize;

    let end = last_visible.saturating_add(overscan).min(lane_count);
    let start = first_visible.saturating_sub(overscan).min(end);

    VisibleWindow {
        start,
        end,
        top_pad_px: start as f64 * stride,
        bot_pad_px: (lane_count - end) as f64 * stride,
    }
}

/// Rows for the lanes in `window`, each at `index * stride`.
pub fn lane_rows(window: &VisibleWindow, layout: &LayoutOptions) -> Vec<LaneRow> {
    let stride = layout.stride();
    (window.start..window.end)
        .map(|lane_index| LaneRow {
            lane_index,
            y: lane_index as f64 * stride,
            height: layout.row_height,
        })
        .collect()
}

/// Height of the scrollable lane canvas.
pub fn canvas_height(lane_count: usize, layout: &LayoutOptions) -> f64 {
    lane_count as f64 * layout.stride() + layout.lane_gap
}
