pub mod frame;
pub mod items;
pub mod lane_state;
pub mod scene;
pub mod time_axis;
pub mod virtualize;

pub use frame::{Frame, FrameContext, LaneRowState};
pub use items::{
    ItemGeometry, ResolvedSegment, RowSlot, effective_end, layout_items, normalize_segments,
    resolve_item_geometry,
};
pub use lane_state::resolve_lane_state;
pub use scene::{render_lane_axis, render_scene};
pub use time_axis::{
    FormatContext, Tick, TickSet, TimeFormatter, compute_ticks, format_duration_ms, minor_ticks,
    render_time_axis,
};
pub use virtualize::{LaneRow, VisibleWindow, compute_visible_window, lane_rows};
