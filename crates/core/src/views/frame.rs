use parallel_timeline_protocol::{Point, SharedStr, TimeWindow};
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::mapper::TimeScale;
use crate::model::LaneIndex;

use super::items::{ItemGeometry, layout_items};
use super::lane_state::resolve_lane_state;
use super::time_axis::{TickSet, TimeFormatter, compute_ticks, minor_ticks};
use super::virtualize::{LaneRow, VisibleWindow, canvas_height, compute_visible_window, lane_rows};

/// A rendered lane row with its resolved state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneRowState {
    pub row: LaneRow,
    pub lane_id: SharedStr,
    pub label: SharedStr,
    pub color: Option<SharedStr>,
    pub state: Option<SharedStr>,
}

/// Inputs for one layout pass besides the data itself.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub scale: TimeScale,
    pub now: f64,
    pub hover_time: Option<f64>,
    pub scroll_top: f64,
    /// Height of the scroll viewport the lanes are shown in.
    pub viewport_height: f64,
    pub config: &'a TimelineConfig,
    pub formatter: Option<&'a TimeFormatter>,
}

/// Everything derived for one render: ticks, visible rows, item geometry and
/// cursor positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub window: TimeWindow,
    pub width: f64,
    pub now: f64,
    pub ticks: TickSet,
    pub minor_ticks: Vec<f64>,
    pub visible: VisibleWindow,
    pub rows: Vec<LaneRowState>,
    pub items: Vec<ItemGeometry>,
    /// Present when the now line is enabled.
    pub now_x: Option<f64>,
    /// Present when the hover line is enabled and the pointer is over the canvas.
    pub hover_x: Option<f64>,
    pub canvas_height: f64,
    pub orphan_count: usize,
}

impl Frame {
    pub fn build(index: &LaneIndex<'_>, ctx: &FrameContext<'_>) -> Self {
        let config = ctx.config;
        let scale = ctx.scale;
        let window = scale.window();

        let ticks = compute_ticks(
            window,
            scale.width(),
            config.grid.major_tick_px,
            config.time_origin(),
            ctx.formatter,
        );
        let minor = if config.grid.show_minor {
            minor_ticks(&ticks, config.grid.minor_ticks)
        } else {
            Vec::new()
        };

        let visible = if config.virtualization.enabled {
            compute_visible_window(
                ctx.scroll_top,
                ctx.viewport_height,
                config.layout.stride(),
                index.len(),
                config.virtualization.overscan,
            )
        } else {
            VisibleWindow::full(index.len())
        };
        let packed = lane_rows(&visible, &config.layout);

        let rows = packed
            .iter()
            .filter_map(|row| {
                let lane = index.lanes().get(row.lane_index)?;
                Some(LaneRowState {
                    row: *row,
                    lane_id: lane.id.clone(),
                    label: lane.label.clone(),
                    color: lane.color.clone(),
                    state: resolve_lane_state(lane, index.items_at(row.lane_index), ctx.now),
                })
            })
            .collect();

        let items = layout_items(index, &packed, ctx.now, &scale, &config.layout);

        Self {
            window,
            width: scale.width(),
            now: ctx.now,
            ticks,
            minor_ticks: minor,
            visible,
            rows,
            items,
            now_x: config.show_now_line.0.then(|| scale.time_to_x(ctx.now)),
            hover_x: ctx
                .hover_time
                .filter(|_| config.show_hover_line.0)
                .map(|t| scale.time_to_x(t)),
            canvas_height: canvas_height(index.len(), &config.layout),
            orphan_count: index.orphan_count(),
        }
    }

    pub fn scale(&self) -> TimeScale {
        TimeScale::new(self.window, self.width)
    }

    /// Topmost item under a canvas point. Items drawn later win.
    pub fn item_at(&self, x: f64, y: f64) -> Option<&ItemGeometry> {
        let p = Point::new(x, y);
        self.items.iter().rev().find(|g| g.rect.contains(p))
    }

    pub fn row(&self, lane_id: &str) -> Option<&LaneRowState> {
        self.rows.iter().find(|r| r.lane_id == lane_id)
    }
}
