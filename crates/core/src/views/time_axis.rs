use parallel_timeline_protocol::{
    Emphasis, Paint, Point, Rect, RenderCommand, SharedStr, StatusPattern, TextAlign, ThemeToken,
    TimeWindow,
};
use serde::Serialize;
use tracing::warn;

use crate::mapper::TimeScale;

const MAJOR_TICK_HEIGHT: f64 = 10.0;
const MINOR_TICK_HEIGHT: f64 = 4.0;
const FONT_SIZE: f64 = 11.0;
const LABEL_INSET_X: f64 = 4.0;
/// Upper bound on major ticks per pass, in case a caller hands in a window
/// far wider than the step table was built for.
const MAX_MAJOR_TICKS: usize = 10_000;

/// Major tick steps, ascending: 250ms up to 4h.
pub const NICE_STEPS_MS: [f64; 17] = [
    250.0,
    500.0,
    1_000.0,
    2_000.0,
    5_000.0,
    10_000.0,
    15_000.0,
    30_000.0,
    60_000.0,     // 1m
    120_000.0,
    300_000.0,
    600_000.0,
    900_000.0,
    1_800_000.0,
    3_600_000.0,  // 1h
    7_200_000.0,
    14_400_000.0,
];

/// Step reported alongside an empty tick set.
pub const FALLBACK_STEP_MS: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub t: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSet {
    pub major: Vec<Tick>,
    pub step_ms: f64,
}

impl TickSet {
    fn empty() -> Self {
        Self {
            major: Vec::new(),
            step_ms: FALLBACK_STEP_MS,
        }
    }
}

/// Passed to a custom label formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatContext {
    pub origin_ms: f64,
    pub view: TimeWindow,
}

/// Custom tick label hook (absolute time, context) → label.
pub type TimeFormatter = dyn Fn(f64, &FormatContext) -> String;

/// Smallest table step at or above `approx_step`, else the largest entry.
pub fn nice_step(approx_step: f64) -> f64 {
    NICE_STEPS_MS
        .iter()
        .copied()
        .find(|&s| s >= approx_step)
        .unwrap_or(NICE_STEPS_MS[NICE_STEPS_MS.len() - 1])
}

/// Major ticks for `view` drawn `width_px` wide, aiming for one tick every
/// `major_tick_px` pixels.
///
/// Ticks sit on multiples of the step measured from `origin_ms`, so labels
/// read as round durations from the origin. Non-positive range or width
/// yields an empty set.
pub fn compute_ticks(
    view: TimeWindow,
    width_px: f64,
    major_tick_px: f64,
    origin_ms: f64,
    formatter: Option<&TimeFormatter>,
) -> TickSet {
    let range = view.range();
    if range <= 0.0 || width_px.is_nan() || width_px <= 0.0 {
        return TickSet::empty();
    }

    let approx_step = (range / width_px.max(1.0)) * major_tick_px;
    let step_ms = nice_step(approx_step);
    let first = ((view.start() - origin_ms) / step_ms).floor() * step_ms + origin_ms;
    let ctx = FormatContext { origin_ms, view };

    let mut major = Vec::new();
    let mut i = 0usize;
    loop {
        // Index-based so spacing stays exact over long runs.
        let t = first + i as f64 * step_ms;
        if t > view.end() {
            break;
        }
        if major.len() >= MAX_MAJOR_TICKS {
            warn!(range, step_ms, "tick count capped");
            break;
        }
        i += 1;
        if t < view.start() - step_ms {
            continue;
        }
        let label = match formatter {
            Some(format) => format(t, &ctx),
            None => format_duration_ms(t - origin_ms),
        };
        major.push(Tick { t, label });
    }

    TickSet { major, step_ms }
}

/// Minor tick times: each major interval split into `subdivisions` steps,
/// from the first to the last major tick inclusive. Needs two majors.
pub fn minor_ticks(ticks: &TickSet, subdivisions: u32) -> Vec<f64> {
    let (Some(first), Some(last)) = (ticks.major.first(), ticks.major.last()) else {
        return Vec::new();
    };
    if ticks.major.len() < 2 || subdivisions == 0 {
        return Vec::new();
    }
    let minor_step = ticks.step_ms / f64::from(subdivisions);
    let count = (ticks.major.len() - 1) * subdivisions as usize + 1;
    (0..count)
        .map(|j| first.t + j as f64 * minor_step)
        .take_while(|&t| t <= last.t + minor_step * 1e-9)
        .collect()
}

/// Signed duration label using the coarsest non-zero unit:
/// `1h 5m`, `2m 03s` or `45s`. Rounded to whole seconds.
pub fn format_duration_ms(ms: f64) -> String {
    let sign = if ms < 0.0 { "-" } else { "" };
    let total_seconds = (ms.abs() / 1000.0).round() as u64;
    let s = total_seconds % 60;
    let m = (total_seconds / 60) % 60;
    let h = total_seconds / 3600;

    if h > 0 {
        format!("{sign}{h}h {m}m")
    } else if m > 0 {
        format!("{sign}{m}m {s:02}s")
    } else {
        format!("{sign}{s}s")
    }
}

/// Render the time axis header: background bar, major ticks with labels and
/// minor tick marks.
pub fn render_time_axis(
    scale: &TimeScale,
    ticks: &TickSet,
    minor: &[f64],
    axis_height: f64,
) -> Vec<RenderCommand> {
    let width = scale.width();
    if width <= 0.0 || axis_height <= 0.0 {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(ticks.major.len() * 2 + minor.len() + 4);
    commands.push(RenderCommand::BeginGroup {
        id: "time-axis".into(),
        label: Some("Time axis".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, axis_height),
        fill: Paint::Token(ThemeToken::AxisBackground),
        pattern: StatusPattern::Solid,
        emphasis: Emphasis::Normal,
        border_color: Some(ThemeToken::AxisBorder),
        label: None,
        item_id: None,
    });

    for &t in minor {
        let x = scale.time_to_x(t);
        if x < 0.0 || x > width {
            continue;
        }
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, axis_height - MINOR_TICK_HEIGHT),
            to: Point::new(x, axis_height),
            color: ThemeToken::GridMinor,
            width: 0.5,
        });
    }

    for tick in &ticks.major {
        let x = scale.time_to_x(tick.t);
        if x < 0.0 || x > width {
            continue;
        }
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, axis_height - MAJOR_TICK_HEIGHT),
            to: Point::new(x, axis_height),
            color: ThemeToken::GridMajor,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + LABEL_INSET_X, axis_height / 2.0),
            text: SharedStr::from(tick.label.as_str()),
            color: ThemeToken::TickLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> TimeWindow {
        TimeWindow::new(start, end).unwrap()
    }

    fn times(ticks: &TickSet) -> Vec<f64> {
        ticks.major.iter().map(|t| t.t).collect()
    }

    #[test]
    fn one_minute_in_600px() {
        // approx step 12s → next nice step is 15s
        let ticks = compute_ticks(window(0.0, 60_000.0), 600.0, 120.0, 0.0, None);
        assert_eq!(ticks.step_ms, 15_000.0);
        assert_eq!(times(&ticks), [0.0, 15_000.0, 30_000.0, 45_000.0, 60_000.0]);
        let labels: Vec<&str> = ticks.major.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0s", "15s", "30s", "45s", "1m 00s"]);
    }

    #[test]
    fn nice_step_picks_smallest_sufficient_entry() {
        assert_eq!(nice_step(1.0), 250.0);
        assert_eq!(nice_step(250.0), 250.0);
        assert_eq!(nice_step(12_000.0), 15_000.0);
        assert_eq!(nice_step(3_600_001.0), 7_200_000.0);
        assert_eq!(nice_step(1e12), 14_400_000.0);
    }

    #[test]
    fn first_tick_snaps_relative_to_origin() {
        let ticks = compute_ticks(window(7_000.0, 67_000.0), 600.0, 120.0, 1_000.0, None);
        assert_eq!(ticks.step_ms, 15_000.0);
        // multiples of 15s from 1000: 1000, 16000, …
        assert_eq!(ticks.major[0].t, 1_000.0);
        assert_eq!(ticks.major[1].t, 16_000.0);
        assert_eq!(ticks.major[1].label, "15s");
        assert!(ticks.major.last().is_some_and(|t| t.t <= 67_000.0));
    }

    #[test]
    fn degenerate_width_yields_empty_set() {
        let ticks = compute_ticks(window(0.0, 60_000.0), 0.0, 120.0, 0.0, None);
        assert!(ticks.major.is_empty());
        assert_eq!(ticks.step_ms, FALLBACK_STEP_MS);
        assert!(compute_ticks(window(0.0, 60_000.0), -5.0, 120.0, 0.0, None).major.is_empty());
    }

    #[test]
    fn custom_formatter_receives_context() {
        let fmt = |t: f64, ctx: &FormatContext| format!("{}@{}", t - ctx.origin_ms, ctx.view.end());
        let ticks = compute_ticks(window(0.0, 60_000.0), 600.0, 120.0, 0.0, Some(&fmt));
        assert_eq!(ticks.major[1].label, "15000@60000");
    }

    #[test]
    fn minor_ticks_subdivide_majors() {
        let ticks = compute_ticks(window(0.0, 60_000.0), 600.0, 120.0, 0.0, None);
        let minor = minor_ticks(&ticks, 4);
        assert_eq!(minor.len(), 17);
        assert_eq!(minor[0], 0.0);
        assert_eq!(minor[1], 3_750.0);
        assert_eq!(minor[16], 60_000.0);

        assert!(minor_ticks(&ticks, 0).is_empty());
        let single = TickSet {
            major: ticks.major[..1].to_vec(),
            step_ms: ticks.step_ms,
        };
        assert!(minor_ticks(&single, 4).is_empty());
    }

    #[test]
    fn duration_labels() {
        assert_eq!(format_duration_ms(0.0), "0s");
        assert_eq!(format_duration_ms(45_000.0), "45s");
        assert_eq!(format_duration_ms(123_000.0), "2m 03s");
        assert_eq!(format_duration_ms(3_900_000.0), "1h 5m");
        assert_eq!(format_duration_ms(-30_000.0), "-30s");
        assert_eq!(format_duration_ms(1_499.0), "1s");
    }

    #[test]
    fn renders_axis_commands() {
        let view = window(0.0, 60_000.0);
        let scale = TimeScale::new(view, 600.0);
        let ticks = compute_ticks(view, 600.0, 120.0, 0.0, None);
        let minor = minor_ticks(&ticks, 4);
        let cmds = render_time_axis(&scale, &ticks, &minor, 34.0);

        let texts = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
            .count();
        assert_eq!(texts, 5);
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        assert_eq!(lines, 5 + 17);
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }
}
