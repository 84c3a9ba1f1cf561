//! Viewport transform engine.
//!
//! Owns the time window (directly, or by proxy for a controlled timeline),
//! the canvas width it is mapped onto, and the drag-pan token. Every mutating
//! operation yields a [`ViewChange`] and fires the change listener.

mod drag;
mod input;
mod owner;
pub mod transform;

pub use drag::DragToken;
pub use input::{Modifiers, PointerButton, WheelInput, wheel_zoom_factor};
pub use owner::{ExternalView, InternalView, ViewportOwner};

use parallel_timeline_protocol::{TimeWindow, ViewChangeReason};
use tracing::{debug, trace};

use crate::config::InteractionOptions;
use crate::mapper::TimeScale;

/// Called with every proposed window, committed or not.
pub type ViewChangeListener = Box<dyn FnMut(TimeWindow, ViewChangeReason)>;

/// A proposed window and why it was proposed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewChange {
    pub view: TimeWindow,
    pub reason: ViewChangeReason,
    /// False when the window is controlled and the caller has yet to apply it.
    pub committed: bool,
}

pub struct ViewportEngine<O: ViewportOwner = InternalView> {
    owner: O,
    options: InteractionOptions,
    width: f64,
    drag: Option<DragToken>,
    listener: Option<ViewChangeListener>,
}

impl<O: ViewportOwner + std::fmt::Debug> std::fmt::Debug for ViewportEngine<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportEngine")
            .field("owner", &self.owner)
            .field("options", &self.options)
            .field("width", &self.width)
            .field("drag", &self.drag)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl ViewportEngine<InternalView> {
    /// Uncontrolled engine starting at `default_view` (or `{0, 60000}`).
    pub fn uncontrolled(default_view: Option<TimeWindow>, options: InteractionOptions) -> Self {
        Self::new(InternalView::new(default_view), options)
    }
}

impl ViewportEngine<ExternalView> {
    /// Controlled engine; the caller applies proposals via [`Self::sync`].
    pub fn controlled(view: TimeWindow, options: InteractionOptions) -> Self {
        Self::new(ExternalView::new(view), options)
    }

    pub fn sync(&mut self, view: TimeWindow) {
        self.owner.sync(view);
    }
}

impl<O: ViewportOwner> ViewportEngine<O> {
    pub fn new(owner: O, options: InteractionOptions) -> Self {
        Self {
            owner,
            options,
            width: 0.0,
            drag: None,
            listener: None,
        }
    }

    pub fn view(&self) -> TimeWindow {
        self.owner.current()
    }

    pub fn is_controlled(&self) -> bool {
        self.owner.is_external()
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Mapper for the current window and width.
    pub fn scale(&self) -> TimeScale {
        TimeScale::new(self.view(), self.width)
    }

    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Replace the interaction options. Turning pan off drops any drag in
    /// progress.
    pub fn set_options(&mut self, options: InteractionOptions) {
        if !options.pan {
            self.drag = None;
        }
        self.options = options;
    }

    pub fn set_listener(&mut self, listener: impl FnMut(TimeWindow, ViewChangeReason) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Propose `next`. Internal owners commit it immediately; either way the
    /// listener is notified afterwards.
    pub fn propose(&mut self, next: TimeWindow, reason: ViewChangeReason) -> ViewChange {
        let committed = !self.owner.is_external();
        if committed {
            self.owner.commit(next);
        }
        debug!(
            %reason,
            start = next.start(),
            end = next.end(),
            committed,
            "view change"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(next, reason);
        }
        ViewChange {
            view: next,
            reason,
            committed,
        }
    }

    pub fn pan(&mut self, delta_px: f64) -> ViewChange {
        let scale = self.scale();
        let next = transform::pan_view_by_delta_px(self.view(), delta_px, scale.px_per_ms());
        self.propose(next, ViewChangeReason::Pan)
    }

    /// Zoom by `factor` (< 1 zooms in) keeping `anchor` at its pixel.
    pub fn zoom(&mut self, factor: f64, anchor: f64) -> ViewChange {
        let next = transform::zoom_view_around_time(
            self.view(),
            factor,
            anchor,
            self.options.min_range_ms,
            self.options.max_range_ms,
        );
        self.propose(next, ViewChangeReason::Zoom)
    }

    /// Shift the window to keep `now` in view. No-op unless follow-now is
    /// enabled and `now` has left the margins.
    pub fn follow_now(&mut self, now: f64) -> Option<ViewChange> {
        if !self.options.follow_now {
            return None;
        }
        let next = transform::follow_now_view(self.view(), now, self.options.follow_now_anchor)?;
        Some(self.propose(next, ViewChangeReason::Follow))
    }

    pub fn set_programmatic(&mut self, view: TimeWindow) -> ViewChange {
        self.propose(view, ViewChangeReason::Programmatic)
    }

    /// Wheel zoom around the pointer. Ignored when zoom is disabled or the
    /// configured modifier is not held.
    pub fn wheel(&mut self, input: WheelInput) -> Option<ViewChange> {
        if !self.options.zoom || !self.options.zoom_modifier.matches(input.modifiers) {
            return None;
        }
        let anchor = self.scale().x_to_time_clamped(input.x);
        Some(self.zoom(wheel_zoom_factor(input.delta_y), anchor))
    }

    /// Start a drag pan. Only the primary button starts one, and only when
    /// pan is enabled. A new pointer-down replaces any existing token.
    pub fn begin_drag(&mut self, pointer_id: i64, x: f64, button: PointerButton) -> bool {
        if !self.options.pan || button != PointerButton::Primary {
            return false;
        }
        if let Some(prev) = self.drag {
            trace!(prev = prev.pointer_id, pointer_id, "drag token replaced");
        }
        self.drag = Some(DragToken {
            pointer_id,
            start_x: x,
            start_view: self.view(),
        });
        trace!(pointer_id, x, "drag started");
        true
    }

    /// Pan to follow pointer `pointer_id`, recomputing from the window
    /// captured at pointer-down.
    pub fn drag_to(&mut self, pointer_id: i64, x: f64) -> Option<ViewChange> {
        let token = self.drag.filter(|t| t.owns(pointer_id))?;
        let px_per_ms = TimeScale::new(token.start_view, self.width).px_per_ms();
        let next = transform::pan_view_by_delta_px(token.start_view, token.delta_px(x), px_per_ms);
        Some(self.propose(next, ViewChangeReason::Pan))
    }

    /// Release the drag if `pointer_id` owns it. Covers both pointer-up and
    /// pointer-cancel.
    pub fn end_drag(&mut self, pointer_id: i64) -> bool {
        if self.drag.is_some_and(|t| t.owns(pointer_id)) {
            self.drag = None;
            trace!(pointer_id, "drag ended");
            true
        } else {
            false
        }
    }

    pub fn drag(&self) -> Option<&DragToken> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
