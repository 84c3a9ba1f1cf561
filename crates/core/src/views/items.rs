use parallel_timeline_protocol::{Item, Lane, Rect, SharedStr};
use serde::Serialize;

use crate::config::LayoutOptions;
use crate::mapper::TimeScale;
use crate::model::LaneIndex;

use super::virtualize::LaneRow;

/// Bar x positions are clamped to ±this many pixels so extreme zoom levels
/// never hand the renderer overflowing coordinates.
pub const X_LIMIT: f64 = 10_000_000.0;
pub const MIN_ITEM_WIDTH: f64 = 2.0;
pub const MIN_SEGMENT_WIDTH: f64 = 1.0;

/// Vertical slot an item is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub lane_index: usize,
    /// Top of the lane row, in canvas pixels.
    pub y: f64,
}

impl From<&LaneRow> for RowSlot {
    fn from(row: &LaneRow) -> Self {
        Self {
            lane_index: row.lane_index,
            y: row.y,
        }
    }
}

/// A segment after normalization: id assigned, end resolved and clamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSegment {
    pub id: SharedStr,
    pub start: f64,
    pub end: f64,
    pub status: Option<SharedStr>,
    pub color: Option<SharedStr>,
    pub label: Option<SharedStr>,
}

/// Everything a renderer needs to draw one item bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGeometry {
    pub item_id: SharedStr,
    pub lane_id: SharedStr,
    pub lane_index: usize,
    pub rect: Rect,
    /// Still extending with now.
    pub active: bool,
    pub effective_end: f64,
    /// Item color, else lane color.
    pub color: Option<SharedStr>,
    pub status: Option<SharedStr>,
    pub label: Option<SharedStr>,
    /// Clamped to `0..=1`.
    pub progress: Option<f64>,
    pub segments: Vec<ResolvedSegment>,
}

/// Where the item's bar ends at `now`: its recorded end, or now for an open
/// item (never before its start).
pub fn effective_end(item: &Item, now: f64) -> f64 {
    item.end.unwrap_or_else(|| now.max(item.start))
}

/// Segments of `item` ready for drawing.
///
/// An item without explicit segments becomes one segment spanning the item.
/// Missing ids become `{item_id}__seg_{index}` (index in input order), the
/// list is stably sorted by start, and every end that is missing or runs past
/// the item's effective end is clamped to it.
pub fn normalize_segments(item: &Item, now: f64) -> Vec<ResolvedSegment> {
    let hard_end = effective_end(item, now);
    let clamp_end = |end: Option<f64>| match end {
        Some(e) if e <= hard_end => e,
        _ => hard_end,
    };

    if item.segments.is_empty() {
        return vec![ResolvedSegment {
            id: SharedStr::from(format!("{}__seg_0", item.id)),
            start: item.start,
            end: clamp_end(item.end),
            status: item.status.clone(),
            color: item.color.clone(),
            label: item.label.clone(),
        }];
    }

    let mut segments: Vec<ResolvedSegment> = item
        .segments
        .iter()
        .enumerate()
        .map(|(idx, seg)| ResolvedSegment {
            id: seg
                .id
                .clone()
                .unwrap_or_else(|| SharedStr::from(format!("{}__seg_{idx}", item.id))),
            start: seg.start,
            end: clamp_end(seg.end),
            status: seg.status.clone(),
            color: seg.color.clone(),
            label: seg.label.clone(),
        })
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}

/// Pixel geometry and normalized segments for one item.
pub fn resolve_item_geometry(
    item: &Item,
    lane: &Lane,
    slot: RowSlot,
    now: f64,
    scale: &TimeScale,
    layout: &LayoutOptions,
) -> ItemGeometry {
    let end = effective_end(item, now);
    let x0 = scale.time_to_x(item.start);
    let x1 = scale.time_to_x(end);
    let active = item.end.is_none_or(|recorded| end > recorded);

    ItemGeometry {
        item_id: item.id.clone(),
        lane_id: lane.id.clone(),
        lane_index: slot.lane_index,
        rect: Rect::new(
            x0.clamp(-X_LIMIT, X_LIMIT),
            slot.y + (layout.row_height - layout.item_height) / 2.0,
            (x1 - x0).max(MIN_ITEM_WIDTH),
            layout.item_height,
        ),
        active,
        effective_end: end,
        color: item.color.clone().or_else(|| lane.color.clone()),
        status: item.status.clone(),
        label: item.label.clone(),
        progress: item.progress.map(|p| p.clamp(0.0, 1.0)),
        segments: normalize_segments(item, now),
    }
}

/// Horizontal extent of a segment relative to its item bar: `(left, width)`.
pub fn segment_extent(segment: &ResolvedSegment, item: &ItemGeometry, scale: &TimeScale) -> (f64, f64) {
    let x0 = scale.time_to_x(segment.start);
    let x1 = scale.time_to_x(segment.end);
    (x0 - item.rect.x, (x1 - x0).max(MIN_SEGMENT_WIDTH))
}

/// Geometry for every item in the given rows, row by row, each lane's items
/// in start order.
pub fn layout_items(
    index: &LaneIndex<'_>,
    rows: &[LaneRow],
    now: f64,
    scale: &TimeScale,
    layout: &LayoutOptions,
) -> Vec<ItemGeometry> {
    let mut out = Vec::new();
    for row in rows {
        let Some(lane) = index.lanes().get(row.lane_index) else {
            continue;
        };
        for item in index.items_at(row.lane_index) {
            out.push(resolve_item_geometry(item, lane, row.into(), now, scale, layout));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use parallel_timeline_protocol::{Segment, TimeWindow};

    use super::*;

    fn scale(start: f64, end: f64, width: f64) -> TimeScale {
        TimeScale::new(TimeWindow::new(start, end).unwrap(), width)
    }

    fn slot() -> RowSlot {
        RowSlot { lane_index: 0, y: 0.0 }
    }

    #[test]
    fn closed_item_geometry() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 1_500.0)
            .ending_at(26_000.0)
            .with_status("responding");
        let g = resolve_item_geometry(
            &item,
            &lane,
            slot(),
            0.0,
            &scale(0.0, 75_000.0, 1000.0),
            &LayoutOptions::default(),
        );
        assert!((g.rect.x - 20.0).abs() < 1e-9);
        assert!((g.rect.w - 326.666_666_666).abs() < 1e-6);
        assert_eq!(g.rect.y, 11.0);
        assert_eq!(g.rect.h, 22.0);
        assert!(!g.active);
        assert_eq!(g.segments.len(), 1);
        assert_eq!(g.segments[0].status.as_deref(), Some("responding"));
        assert_eq!(g.segments[0].end, 26_000.0);
    }

    #[test]
    fn open_item_runs_to_now() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 2_000.0);
        let g = resolve_item_geometry(
            &item,
            &lane,
            slot(),
            10_000.0,
            &scale(0.0, 60_000.0, 600.0),
            &LayoutOptions::default(),
        );
        assert_eq!(g.effective_end, 10_000.0);
        assert!(g.active);
        assert_eq!(g.segments[0].end, 10_000.0);
    }

    #[test]
    fn open_item_before_its_start_is_zero_length() {
        let item = Item::new("a", "l1", 5_000.0);
        assert_eq!(effective_end(&item, 1_000.0), 5_000.0);
    }

    #[test]
    fn tiny_items_keep_minimum_width() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 1_000.0).ending_at(1_001.0);
        let g = resolve_item_geometry(
            &item,
            &lane,
            slot(),
            0.0,
            &scale(0.0, 60_000.0, 600.0),
            &LayoutOptions::default(),
        );
        assert_eq!(g.rect.w, MIN_ITEM_WIDTH);
    }

    #[test]
    fn extreme_positions_are_clamped() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 1e15).ending_at(2e15);
        let g = resolve_item_geometry(
            &item,
            &lane,
            slot(),
            0.0,
            &scale(0.0, 2_000.0, 1000.0),
            &LayoutOptions::default(),
        );
        assert_eq!(g.rect.x, X_LIMIT);
    }

    #[test]
    fn segments_sorted_and_clamped() {
        let item = Item::new("job", "l1", 0.0).ending_at(10_000.0).with_segments(vec![
            Segment::new(6_000.0).ending_at(14_000.0).with_status("review"),
            Segment::new(0.0).ending_at(4_000.0).with_status("thinking"),
            Segment::new(4_000.0).with_status("responding").with_id("resp"),
        ]);
        let segs = normalize_segments(&item, 99_000.0);
        let ids: Vec<&str> = segs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["job__seg_1", "resp", "job__seg_0"]);
        assert_eq!(segs[0].end, 4_000.0);
        // open segment runs to the item end, not to now
        assert_eq!(segs[1].end, 10_000.0);
        // overflowing end clamped
        assert_eq!(segs[2].end, 10_000.0);
    }

    #[test]
    fn open_item_segments_follow_now() {
        let item = Item::new("job", "l1", 0.0).with_segments(vec![
            Segment::new(0.0).ending_at(3_000.0).with_status("thinking"),
            Segment::new(3_000.0).with_status("responding"),
        ]);
        let segs = normalize_segments(&item, 7_500.0);
        assert_eq!(segs[1].end, 7_500.0);
        let segs = normalize_segments(&item, 2_000.0);
        // finished segment now ends after the clock: clamped back to now
        assert_eq!(segs[0].end, 2_000.0);
    }

    #[test]
    fn color_falls_back_to_lane() {
        let lane = Lane::new("l1", "Agent").with_color("#22c55e");
        let plain = Item::new("a", "l1", 0.0).ending_at(1_000.0);
        let colored = plain.clone().with_color("#ef4444");
        let s = scale(0.0, 60_000.0, 600.0);
        let layout = LayoutOptions::default();
        let g = resolve_item_geometry(&plain, &lane, slot(), 0.0, &s, &layout);
        assert_eq!(g.color.as_deref(), Some("#22c55e"));
        let g = resolve_item_geometry(&colored, &lane, slot(), 0.0, &s, &layout);
        assert_eq!(g.color.as_deref(), Some("#ef4444"));
    }

    #[test]
    fn progress_is_clamped() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 0.0).ending_at(1_000.0).with_progress(1.7);
        let g = resolve_item_geometry(
            &item,
            &lane,
            slot(),
            0.0,
            &scale(0.0, 60_000.0, 600.0),
            &LayoutOptions::default(),
        );
        assert_eq!(g.progress, Some(1.0));
    }

    #[test]
    fn segment_extent_is_relative_to_bar() {
        let lane = Lane::new("l1", "Agent");
        let item = Item::new("a", "l1", 10_000.0).ending_at(30_000.0).with_segments(vec![
            Segment::new(10_000.0).ending_at(20_000.0),
            Segment::new(20_000.0).ending_at(20_000.0),
        ]);
        let s = scale(0.0, 60_000.0, 600.0);
        let g = resolve_item_geometry(&item, &lane, slot(), 0.0, &s, &LayoutOptions::default());
        let (left, width) = segment_extent(&g.segments[0], &g, &s);
        assert!(left.abs() < 1e-9);
        assert!((width - 100.0).abs() < 1e-9);
        let (left, width) = segment_extent(&g.segments[1], &g, &s);
        assert!((left - 100.0).abs() < 1e-9);
        assert_eq!(width, MIN_SEGMENT_WIDTH);
    }

    #[test]
    fn layout_walks_rows_in_order() {
        let lanes = vec![Lane::new("a", "A"), Lane::new("b", "B")];
        let items = vec![
            Item::new("b1", "b", 0.0).ending_at(1_000.0),
            Item::new("a2", "a", 5_000.0).ending_at(6_000.0),
            Item::new("a1", "a", 0.0).ending_at(1_000.0),
            Item::new("orphan", "zzz", 0.0).ending_at(1_000.0),
        ];
        let index = LaneIndex::build(&lanes, &items);
        let rows = [
            LaneRow {
                lane_index: 0,
                y: 0.0,
                height: 44.0,
            },
            LaneRow {
                lane_index: 1,
                y: 50.0,
                height: 44.0,
            },
        ];
        let geoms = layout_items(
            &index,
            &rows,
            0.0,
            &scale(0.0, 60_000.0, 600.0),
            &LayoutOptions::default(),
        );
        let ids: Vec<&str> = geoms.iter().map(|g| g.item_id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "b1"]);
        assert_eq!(geoms[2].rect.y, 61.0);
        assert_eq!(geoms[2].lane_index, 1);
    }
}
