use parallel_timeline_protocol::TimeWindow;

/// An in-progress drag pan.
///
/// Holds the window as it was at pointer-down. Every move recomputes the view
/// from this reference and the total pointer offset, so long drags do not
/// accumulate rounding error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragToken {
    pub pointer_id: i64,
    pub start_x: f64,
    pub start_view: TimeWindow,
}

impl DragToken {
    pub fn owns(&self, pointer_id: i64) -> bool {
        self.pointer_id == pointer_id
    }

    /// Total horizontal offset since pointer-down.
    pub fn delta_px(&self, x: f64) -> f64 {
        x - self.start_x
    }
}
