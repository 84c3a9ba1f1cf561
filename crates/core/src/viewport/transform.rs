//! Pure window transforms. The engine wraps these with ownership and
//! notification; hosts that keep their own state can call them directly.

use parallel_timeline_protocol::TimeWindow;
use tracing::warn;

use crate::config::FollowAnchor;

/// Fraction of the range kept between "now" and the window edge while
/// following.
pub const FOLLOW_MARGIN: f64 = 0.08;

/// Shift the window so content moves `delta_px` pixels to the right.
///
/// A zero-density scale (no canvas width yet) leaves the window unchanged.
pub fn pan_view_by_delta_px(view: TimeWindow, delta_px: f64, px_per_ms: f64) -> TimeWindow {
    if px_per_ms == 0.0 || !px_per_ms.is_finite() {
        return view;
    }
    if !delta_px.is_finite() {
        warn!(delta_px, "ignoring non-finite pan delta");
        return view;
    }
    let delta_ms = -delta_px / px_per_ms;
    settle(view.start() + delta_ms, view.end() + delta_ms, view)
}

/// Scale the window by `factor` around `anchor`, keeping the anchor at the
/// same fraction of the window (and therefore at the same pixel).
///
/// The scaled range is clamped into `[min_range, max_range]` before the start
/// is recomputed from the anchor fraction, so clamping never moves the anchor.
pub fn zoom_view_around_time(
    view: TimeWindow,
    factor: f64,
    anchor: f64,
    min_range: f64,
    max_range: f64,
) -> TimeWindow {
    let factor = if factor.is_finite() {
        factor
    } else {
        warn!(factor, "non-finite zoom factor, keeping current range");
        1.0
    };
    let anchor = if anchor.is_finite() {
        anchor
    } else {
        warn!(anchor, "non-finite zoom anchor, zooming around window center");
        view.start() + view.range() / 2.0
    };

    let old_range = view.safe_range();
    let k = (anchor - view.start()) / old_range;
    // max/min rather than clamp: never panics on inverted bounds.
    let range = (old_range * factor).max(min_range).min(max_range);
    let start = anchor - k * range;
    settle(start, start + range, view)
}

/// The window that brings `now` back inside the follow margins, or `None`
/// when it is already inside.
pub fn follow_now_view(view: TimeWindow, now: f64, anchor: FollowAnchor) -> Option<TimeWindow> {
    if !now.is_finite() {
        warn!(now, "ignoring non-finite now");
        return None;
    }
    let range = view.safe_range();
    let margin = range * FOLLOW_MARGIN;
    if now >= view.start() + margin && now <= view.end() - margin {
        return None;
    }
    let (start, end) = match anchor {
        FollowAnchor::Right => (now - (range - margin), now + margin),
        FollowAnchor::Center => (now - range / 2.0, now + range / 2.0),
    };
    Some(settle(start, end, view))
}

/// Build a window from transform output, keeping `fallback` if the arithmetic
/// produced something degenerate (e.g. precision loss at huge magnitudes).
pub(crate) fn settle(start: f64, end: f64, fallback: TimeWindow) -> TimeWindow {
    match TimeWindow::new(start, end) {
        Ok(view) => view,
        Err(err) => {
            warn!(%err, "transform produced an invalid window, keeping previous");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> TimeWindow {
        TimeWindow::new(start, end).unwrap()
    }

    #[test]
    fn pan_moves_both_bounds() {
        let v = window(0.0, 60_000.0);
        let px_per_ms = 600.0 / 60_000.0;
        let next = pan_view_by_delta_px(v, 100.0, px_per_ms);
        assert!((next.start() + 10_000.0).abs() < 1e-6);
        assert!((next.end() - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn pan_without_width_is_identity() {
        let v = window(0.0, 60_000.0);
        assert_eq!(pan_view_by_delta_px(v, 100.0, 0.0), v);
        assert_eq!(pan_view_by_delta_px(v, f64::NAN, 0.01), v);
    }

    #[test]
    fn zoom_in_around_anchor() {
        let v = window(0.0, 60_000.0);
        let next = zoom_view_around_time(v, 0.5, 30_000.0, 2_000.0, 86_400_000.0);
        assert_eq!(next, window(15_000.0, 45_000.0));
    }

    #[test]
    fn zoom_clamps_to_min_range_around_anchor() {
        let v = window(0.0, 10_000.0);
        // anchor at 25% of the window
        let next = zoom_view_around_time(v, 0.01, 2_500.0, 2_000.0, 86_400_000.0);
        assert!((next.range() - 2_000.0).abs() < 1e-9);
        assert!((next.start() - 2_000.0).abs() < 1e-9);
        assert!((next.end() - 4_000.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_clamps_to_max_range() {
        let v = window(0.0, 60_000.0);
        let next = zoom_view_around_time(v, 1e9, 0.0, 2_000.0, 120_000.0);
        assert_eq!(next, window(0.0, 120_000.0));
    }

    #[test]
    fn non_positive_factor_lands_on_min_range() {
        let v = window(0.0, 60_000.0);
        let next = zoom_view_around_time(v, -3.0, 30_000.0, 2_000.0, 86_400_000.0);
        assert!((next.range() - 2_000.0).abs() < 1e-9);
        assert!((next.start() - 29_000.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_factor_keeps_range() {
        let v = window(0.0, 60_000.0);
        let next = zoom_view_around_time(v, f64::NAN, 30_000.0, 2_000.0, 86_400_000.0);
        assert_eq!(next, v);
    }

    #[test]
    fn follow_inside_margin_is_noop() {
        let v = window(0.0, 100_000.0);
        assert_eq!(follow_now_view(v, 50_000.0, FollowAnchor::Right), None);
        assert_eq!(follow_now_view(v, 8_000.0, FollowAnchor::Right), None);
        assert_eq!(follow_now_view(v, 92_000.0, FollowAnchor::Right), None);
    }

    #[test]
    fn follow_right_keeps_now_near_the_right_edge() {
        let v = window(0.0, 100_000.0);
        let next = follow_now_view(v, 95_000.0, FollowAnchor::Right);
        assert_eq!(next, Some(window(3_000.0, 103_000.0)));
    }

    #[test]
    fn follow_center_recenters() {
        let v = window(0.0, 100_000.0);
        let next = follow_now_view(v, 200_000.0, FollowAnchor::Center);
        assert_eq!(next, Some(window(150_000.0, 250_000.0)));
    }

    #[test]
    fn follow_ignores_nan() {
        let v = window(0.0, 100_000.0);
        assert_eq!(follow_now_view(v, f64::NAN, FollowAnchor::Center), None);
    }

    #[test]
    fn settle_keeps_fallback_on_collapse() {
        let fallback = window(0.0, 1.0);
        // 1e20 + 2000 == 1e20 in f64
        assert_eq!(settle(1e20, 1e20 + 2_000.0, fallback), fallback);
    }
}
