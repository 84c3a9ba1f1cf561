use parallel_timeline_protocol::{Item, Lane, SharedStr};

/// Current status of a lane at `now`.
///
/// Walks the lane's items in the order given and each item's segments in
/// declaration order (an item without segments counts as one segment). The
/// first segment spanning `now` (ends inclusive) decides; otherwise the
/// segment with the latest end does, earliest in iteration order on ties.
/// A segment without a status takes the item's.
pub fn resolve_lane_state(_lane: &Lane, items: &[&Item], now: f64) -> Option<SharedStr> {
    let mut best: Option<&SharedStr> = None;
    let mut best_end = f64::NEG_INFINITY;

    for item in items {
        let fallback_end = item.end.unwrap_or(now);
        let spans = segment_spans(item).map(move |(start, end, status)| {
            (start, end.unwrap_or(fallback_end), status.or(item.status.as_ref()))
        });
        for (start, end, status) in spans {
            if start <= now && now <= end {
                return status.cloned();
            }
            if end > best_end {
                best_end = end;
                best = status;
            }
        }
    }
    best.cloned()
}

fn segment_spans(item: &Item) -> Box<dyn Iterator<Item = (f64, Option<f64>, Option<&SharedStr>)> + '_> {
    if item.segments.is_empty() {
        Box::new(std::iter::once((item.start, item.end, item.status.as_ref())))
    } else {
        Box::new(
            item.segments
                .iter()
                .map(|s| (s.start, s.end, s.status.as_ref())),
        )
    }
}
