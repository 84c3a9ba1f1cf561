use parallel_timeline_protocol::{
    Emphasis, Paint, Point, Rect, RenderCommand, SharedStr, StatusPattern, StatusStyle,
    StatusStyles, TextAlign, ThemeToken, status,
};

use crate::config::TimelineConfig;

use super::frame::{Frame, LaneRowState};
use super::items::{ItemGeometry, ResolvedSegment, segment_extent};

const LABEL_FONT_SIZE: f64 = 11.0;
const LABEL_INSET_X: f64 = 6.0;
const PROGRESS_HEIGHT: f64 = 2.0;
const DOT_SIZE: f64 = 8.0;
const LANE_LABEL_X: f64 = 24.0;

/// Status a segment is drawn with: its own, else its item's, else running.
pub fn segment_status<'a>(segment: &'a ResolvedSegment, item: &'a ItemGeometry) -> &'a str {
    segment
        .status
        .as_deref()
        .or(item.status.as_deref())
        .unwrap_or(status::RUNNING)
}

/// Fill for a segment: the status style's color, else the segment's, else the
/// item's (which already falls back to the lane's), else the accent token.
pub fn segment_paint(style: &StatusStyle, segment: &ResolvedSegment, item: &ItemGeometry) -> Paint {
    style
        .color
        .as_ref()
        .or(segment.color.as_ref())
        .or(item.color.as_ref())
        .map_or(Paint::Token(ThemeToken::Accent), |c| Paint::Css(c.clone()))
}

/// Render the lane canvas: grid, lane separators, items, now and hover lines.
///
/// Coordinates are canvas-relative; the host offsets them past the lane axis
/// and the time axis header. `selected` outlines the matching item.
pub fn render_scene(
    frame: &Frame,
    styles: &StatusStyles,
    config: &TimelineConfig,
    selected: Option<&str>,
) -> Vec<RenderCommand> {
    if frame.width <= 0.0 {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(
        frame.minor_ticks.len() + frame.ticks.major.len() + frame.rows.len() + frame.items.len() * 4 + 8,
    );
    commands.push(RenderCommand::SetClip {
        rect: Rect::new(0.0, 0.0, frame.width, frame.canvas_height),
    });

    if config.grid.show {
        render_grid(frame, &mut commands);
    }
    render_separators(frame, config, &mut commands);

    commands.push(RenderCommand::BeginGroup {
        id: "items".into(),
        label: Some("Items".into()),
    });
    let scale = frame.scale();
    for item in &frame.items {
        for segment in &item.segments {
            let style = styles.resolve(segment_status(segment, item));
            let (left, width) = segment_extent(segment, item, &scale);
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(item.rect.x + left, item.rect.y, width, item.rect.h),
                fill: segment_paint(&style, segment, item),
                pattern: style.pattern,
                emphasis: style.emphasis,
                border_color: None,
                label: segment.label.clone(),
                item_id: Some(item.item_id.clone()),
            });
        }

        if let Some(progress) = item.progress {
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(
                    item.rect.x,
                    item.rect.bottom() - PROGRESS_HEIGHT,
                    item.rect.w * progress,
                    PROGRESS_HEIGHT,
                ),
                fill: Paint::Token(ThemeToken::ItemProgress),
                pattern: StatusPattern::Solid,
                emphasis: Emphasis::Normal,
                border_color: None,
                label: None,
                item_id: Some(item.item_id.clone()),
            });
        }

        if let Some(label) = &item.label {
            commands.push(RenderCommand::DrawText {
                position: Point::new(item.rect.x + LABEL_INSET_X, item.rect.y + item.rect.h / 2.0),
                text: label.clone(),
                color: ThemeToken::ItemLabel,
                font_size: LABEL_FONT_SIZE,
                align: TextAlign::Left,
            });
        }

        if selected.is_some_and(|id| item.item_id == id) {
            outline(item.rect, &mut commands);
        }
    }
    commands.push(RenderCommand::EndGroup);

    if let Some(x) = frame.now_x.filter(|&x| (0.0..=frame.width).contains(&x)) {
        commands.push(vertical_line(x, frame.canvas_height, ThemeToken::NowLine, 1.5));
    }
    if let Some(x) = frame.hover_x {
        commands.push(vertical_line(x, frame.canvas_height, ThemeToken::HoverLine, 1.0));
    }

    commands.push(RenderCommand::ClearClip);
    commands
}

/// Render the lane axis column: a status dot and the label for every row.
pub fn render_lane_axis(frame: &Frame, styles: &StatusStyles, lane_width: f64) -> Vec<RenderCommand> {
    if lane_width <= 0.0 || frame.rows.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(frame.rows.len() * 2 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "lane-axis".into(),
        label: Some("Lanes".into()),
    });
    for row in &frame.rows {
        let mid = row.row.y + row.row.height / 2.0;
        let style = row.state.as_deref().and_then(|s| styles.get(s));
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                (LANE_LABEL_X - DOT_SIZE) / 2.0,
                mid - DOT_SIZE / 2.0,
                DOT_SIZE,
                DOT_SIZE,
            ),
            fill: lane_dot_paint(row, style),
            pattern: style.map(|s| s.pattern).unwrap_or_default(),
            emphasis: Emphasis::Normal,
            border_color: None,
            label: row.state.clone(),
            item_id: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(LANE_LABEL_X, mid),
            text: row.label.clone(),
            color: ThemeToken::TickLabel,
            font_size: LABEL_FONT_SIZE,
            align: TextAlign::Left,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

fn lane_dot_paint(row: &LaneRowState, style: Option<&StatusStyle>) -> Paint {
    style
        .and_then(|s| s.color.clone())
        .or_else(|| row.color.clone())
        .map_or(Paint::Token(ThemeToken::Accent), Paint::Css)
}

fn render_grid(frame: &Frame, commands: &mut Vec<RenderCommand>) {
    let scale = frame.scale();
    commands.push(RenderCommand::BeginGroup {
        id: "grid".into(),
        label: None,
    });
    for &t in &frame.minor_ticks {
        commands.push(vertical_line(scale.time_to_x(t), frame.canvas_height, ThemeToken::GridMinor, 0.5));
    }
    for tick in &frame.ticks.major {
        commands.push(vertical_line(scale.time_to_x(tick.t), frame.canvas_height, ThemeToken::GridMajor, 1.0));
    }
    commands.push(RenderCommand::EndGroup);
}

fn render_separators(frame: &Frame, config: &TimelineConfig, commands: &mut Vec<RenderCommand>) {
    let offset = config.layout.row_height + config.layout.lane_gap / 2.0;
    for row in &frame.rows {
        let y = row.row.y + offset;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(0.0, y),
            to: Point::new(frame.width, y),
            color: ThemeToken::LaneSeparator,
            width: 1.0,
        });
    }
}

fn vertical_line(x: f64, height: f64, color: ThemeToken, width: f64) -> RenderCommand {
    RenderCommand::DrawLine {
        from: Point::new(x, 0.0),
        to: Point::new(x, height),
        color,
        width,
    }
}

fn outline(rect: Rect, commands: &mut Vec<RenderCommand>) {
    let corners = [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
    ];
    for i in 0..corners.len() {
        commands.push(RenderCommand::DrawLine {
            from: corners[i],
            to: corners[(i + 1) % corners.len()],
            color: ThemeToken::SelectionOutline,
            width: 2.0,
        });
    }
}

/// Label of the status a segment was drawn with, for tooltips.
pub fn segment_title(segment: &ResolvedSegment, item: &ItemGeometry) -> SharedStr {
    segment
        .label
        .clone()
        .unwrap_or_else(|| SharedStr::from(segment_status(segment, item)))
}

#[cfg(test)]
mod tests {
    use parallel_timeline_protocol::{Item, Lane, Segment, TimeWindow};

    use super::*;
    use crate::mapper::TimeScale;
    use crate::model::LaneIndex;
    use crate::views::frame::FrameContext;

    fn frame_for(lanes: &[Lane], items: &[Item], config: &TimelineConfig) -> Frame {
        let index = LaneIndex::build(lanes, items);
        Frame::build(
            &index,
            &FrameContext {
                scale: TimeScale::new(TimeWindow::FALLBACK, 600.0),
                now: 30_000.0,
                hover_time: None,
                scroll_top: 0.0,
                viewport_height: 400.0,
                config,
                formatter: None,
            },
        )
    }

    fn rects(cmds: &[RenderCommand]) -> Vec<(&Rect, &Paint, StatusPattern)> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    rect,
                    fill,
                    pattern,
                    item_id: Some(_),
                    ..
                } => Some((rect, fill, *pattern)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn segments_use_status_styles() {
        let lanes = vec![Lane::new("a", "A").with_color("#111111")];
        let items = vec![Item::new("job", "a", 0.0).ending_at(30_000.0).with_segments(vec![
            Segment::new(0.0).ending_at(10_000.0).with_status("thinking"),
            Segment::new(10_000.0).ending_at(30_000.0),
        ])];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &items, &config);
        let styles = config.status_styles();
        let cmds = render_scene(&frame, &styles, &config, None);
        let drawn = rects(&cmds);
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].2, styles.resolve("thinking").pattern);
        assert!((drawn[0].0.w - 100.0).abs() < 1e-9);
        assert!((drawn[1].0.x - 100.0).abs() < 1e-9);
        // no status anywhere: drawn as running
        assert_eq!(drawn[1].2, styles.resolve("running").pattern);
    }

    #[test]
    fn paint_falls_back_through_colors() {
        let lanes = vec![Lane::new("a", "A").with_color("#111111")];
        let items = vec![
            Item::new("lane", "a", 0.0).ending_at(1_000.0).with_status("custom"),
            Item::new("item", "a", 2_000.0).ending_at(3_000.0).with_status("custom").with_color("#222222"),
        ];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &items, &config);
        let styles = config.status_styles();
        let cmds = render_scene(&frame, &styles, &config, None);
        let drawn = rects(&cmds);
        assert_eq!(drawn[0].1, &Paint::Css("#111111".into()));
        assert_eq!(drawn[1].1, &Paint::Css("#222222".into()));

        let bare = vec![Lane::new("a", "A")];
        let frame = frame_for(&bare, &items[..1], &config);
        let cmds = render_scene(&frame, &styles, &config, None);
        assert_eq!(rects(&cmds)[0].1, &Paint::Token(ThemeToken::Accent));
    }

    #[test]
    fn status_color_override_wins() {
        let json = r##"{ "statusStyles": { "custom": { "color": "#ff0000", "pattern": "dots" } } }"##;
        let config = TimelineConfig::from_json(json).unwrap();
        let lanes = vec![Lane::new("a", "A").with_color("#111111")];
        let items = vec![Item::new("x", "a", 0.0).ending_at(1_000.0).with_status("custom").with_color("#222222")];
        let frame = frame_for(&lanes, &items, &config);
        let cmds = render_scene(&frame, &config.status_styles(), &config, None);
        let drawn = rects(&cmds);
        assert_eq!(drawn[0].1, &Paint::Css("#ff0000".into()));
        assert_eq!(drawn[0].2, StatusPattern::Dots);
    }

    #[test]
    fn progress_label_and_selection() {
        let lanes = vec![Lane::new("a", "A")];
        let items = vec![
            Item::new("x", "a", 0.0)
                .ending_at(30_000.0)
                .with_label("build")
                .with_progress(0.5),
        ];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &items, &config);
        let styles = config.status_styles();

        let cmds = render_scene(&frame, &styles, &config, Some("x"));
        let progress = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                fill: Paint::Token(ThemeToken::ItemProgress),
                ..
            } => Some(*rect),
            _ => None,
        });
        assert_eq!(progress.map(|r| r.w), Some(150.0));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText { text, .. } if text == "build"
        )));
        let outline_lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { color: ThemeToken::SelectionOutline, .. }))
            .count();
        assert_eq!(outline_lines, 4);

        let cmds = render_scene(&frame, &styles, &config, None);
        assert!(!cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawLine { color: ThemeToken::SelectionOutline, .. }
        )));
    }

    #[test]
    fn grid_separators_and_now_line() {
        let lanes = vec![Lane::new("a", "A"), Lane::new("b", "B")];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &[], &config);
        let cmds = render_scene(&frame, &config.status_styles(), &config, None);
        let count = |token: ThemeToken| {
            cmds.iter()
                .filter(|c| matches!(c, RenderCommand::DrawLine { color, .. } if *color == token))
                .count()
        };
        assert_eq!(count(ThemeToken::GridMajor), 5);
        assert_eq!(count(ThemeToken::GridMinor), 17);
        assert_eq!(count(ThemeToken::LaneSeparator), 2);
        assert_eq!(count(ThemeToken::NowLine), 1);
        assert_eq!(count(ThemeToken::HoverLine), 0);
        assert!(matches!(cmds.first(), Some(RenderCommand::SetClip { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::ClearClip)));
    }

    #[test]
    fn lane_axis_dots_follow_state() {
        let lanes = vec![Lane::new("a", "Planner"), Lane::new("b", "Coder").with_color("#0ea5e9")];
        let items = vec![Item::new("x", "a", 0.0).with_status("error")];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &items, &config);
        let styles = config.status_styles();
        let cmds = render_lane_axis(&frame, &styles, 220.0);

        let dots: Vec<(&Paint, &Option<SharedStr>)> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { fill, label, .. } => Some((fill, label)),
                _ => None,
            })
            .collect();
        assert_eq!(dots.len(), 2);
        assert_eq!(dots[0].1.as_deref(), Some("error"));
        assert_eq!(dots[1].0, &Paint::Css("#0ea5e9".into()));
        assert!(render_lane_axis(&frame, &styles, 0.0).is_empty());
    }

    #[test]
    fn titles_prefer_segment_label() {
        let lanes = vec![Lane::new("a", "A")];
        let items = vec![Item::new("x", "a", 0.0).ending_at(1_000.0).with_status("review")];
        let config = TimelineConfig::default();
        let frame = frame_for(&lanes, &items, &config);
        let item = &frame.items[0];
        assert_eq!(segment_title(&item.segments[0], item), "review");
    }
}
