//! One timeline instance: viewport engine, realtime clock, scroll and hover
//! state, and the configuration they were built from.
//!
//! Hosts forward their input events here in root coordinates (the lane axis
//! column included) and call [`Timeline::frame`] whenever they need to
//! redraw.

use parallel_timeline_protocol::{
    RenderCommand, SharedStr, StatusStyles, TimeWindow, ViewChangeReason,
};
use tracing::debug;

use crate::clock::{Clock, RealtimeClock, SystemClock};
use crate::config::TimelineConfig;
use crate::mapper::TimeScale;
use crate::model::TimelineData;
use crate::viewport::{
    ExternalView, InternalView, Modifiers, PointerButton, ViewChange, ViewportEngine,
    ViewportOwner, WheelInput,
};
use crate::views::{
    FormatContext, Frame, FrameContext, TimeFormatter, render_lane_axis, render_scene, render_time_axis,
};

/// Render commands for the three areas of a timeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderLayers {
    /// Header strip above the canvas, canvas-relative x.
    pub time_axis: Vec<RenderCommand>,
    /// Lane label column, in canvas y.
    pub lane_axis: Vec<RenderCommand>,
    pub canvas: Vec<RenderCommand>,
}

pub struct Timeline<O: ViewportOwner = InternalView, C: Clock = SystemClock> {
    engine: ViewportEngine<O>,
    clock: RealtimeClock<C>,
    config: TimelineConfig,
    styles: StatusStyles,
    formatter: Option<Box<TimeFormatter>>,
    viewport_height: f64,
    scroll_top: f64,
    hover_time: Option<f64>,
    selected: Option<SharedStr>,
    prefers_reduced_motion: bool,
}

impl<O, C> std::fmt::Debug for Timeline<O, C>
where
    O: ViewportOwner + std::fmt::Debug,
    C: Clock + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("engine", &self.engine)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("formatter", &self.formatter.is_some())
            .field("viewport_height", &self.viewport_height)
            .field("scroll_top", &self.scroll_top)
            .field("hover_time", &self.hover_time)
            .field("selected", &self.selected)
            .finish()
    }
}

impl Timeline<InternalView, SystemClock> {
    /// Uncontrolled timeline on the system clock, starting at the config's
    /// default view.
    pub fn new(config: TimelineConfig) -> Self {
        Self::with_parts(InternalView::new(config.default_view), SystemClock, config)
    }
}

impl Timeline<ExternalView, SystemClock> {
    /// Controlled timeline: view changes are proposed to the listener and
    /// only take effect once fed back through [`Timeline::sync_view`].
    pub fn controlled(view: TimeWindow, config: TimelineConfig) -> Self {
        Self::with_parts(ExternalView::new(view), SystemClock, config)
    }
}

impl<C: Clock> Timeline<ExternalView, C> {
    /// Apply the window the host settled on. Proposes a follow when the
    /// applied window has lost now.
    pub fn sync_view(&mut self, view: TimeWindow) -> Option<ViewChange> {
        self.engine.sync(view);
        self.engine.follow_now(self.clock.now())
    }
}

impl<O: ViewportOwner, C: Clock> Timeline<O, C> {
    pub fn with_parts(owner: O, clock: C, config: TimelineConfig) -> Self {
        Self {
            engine: ViewportEngine::new(owner, config.interaction),
            clock: RealtimeClock::new(clock, config.realtime),
            styles: config.status_styles(),
            config,
            formatter: None,
            viewport_height: 0.0,
            scroll_top: 0.0,
            hover_time: None,
            selected: None,
            prefers_reduced_motion: false,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Apply a new configuration without resetting the view. Follow-now,
    /// virtualization and the internal clock can be toggled any number of
    /// times.
    pub fn set_config(&mut self, config: TimelineConfig) {
        self.engine.set_options(config.interaction);
        self.clock.configure(config.realtime);
        self.styles = config.status_styles();
        let root_width = self.engine.width() + self.config.canvas_offset_x();
        self.config = config;
        self.resize(root_width, self.viewport_height);
    }

    pub fn engine(&self) -> &ViewportEngine<O> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ViewportEngine<O> {
        &mut self.engine
    }

    pub fn clock(&self) -> &RealtimeClock<C> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut RealtimeClock<C> {
        &mut self.clock
    }

    pub fn status_styles(&self) -> &StatusStyles {
        &self.styles
    }

    pub fn view(&self) -> TimeWindow {
        self.engine.view()
    }

    pub fn scale(&self) -> TimeScale {
        self.engine.scale()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Width of the time canvas in pixels.
    pub fn canvas_width(&self) -> f64 {
        self.engine.width()
    }

    pub fn set_listener(&mut self, listener: impl FnMut(TimeWindow, ViewChangeReason) + 'static) {
        self.engine.set_listener(listener);
    }

    pub fn set_formatter(&mut self, formatter: impl Fn(f64, &FormatContext) -> String + 'static) {
        self.formatter = Some(Box::new(formatter));
    }

    pub fn clear_formatter(&mut self) {
        self.formatter = None;
    }

    /// The root element was resized. The canvas gets whatever the lane axis
    /// leaves over.
    pub fn resize(&mut self, root_width: f64, viewport_height: f64) {
        let width = (root_width - self.config.canvas_offset_x()).max(0.0);
        debug!(root_width, width, viewport_height, "resize");
        self.engine.set_width(width);
        self.viewport_height = viewport_height.max(0.0);
    }

    pub fn on_scroll(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Wheel over the timeline; zooms around the pointer when the configured
    /// modifier is held.
    pub fn on_wheel(&mut self, delta_y: f64, root_x: f64, modifiers: Modifiers) -> Option<ViewChange> {
        let x = self.canvas_x(root_x);
        let change = self.engine.wheel(WheelInput { delta_y, x, modifiers })?;
        Some(self.refollow(change))
    }

    pub fn pointer_down(&mut self, pointer_id: i64, root_x: f64, button: PointerButton) -> bool {
        let x = self.canvas_x(root_x);
        self.engine.begin_drag(pointer_id, x, button)
    }

    /// Updates the hover time, and pans if `pointer_id` is dragging.
    pub fn pointer_move(&mut self, pointer_id: i64, root_x: f64) -> Option<ViewChange> {
        let x = self.canvas_x(root_x);
        self.hover_time = Some(self.scale().x_to_time_clamped(x));
        let change = self.engine.drag_to(pointer_id, x)?;
        Some(self.refollow(change))
    }

    pub fn pointer_up(&mut self, pointer_id: i64) -> bool {
        self.engine.end_drag(pointer_id)
    }

    pub fn pointer_cancel(&mut self, pointer_id: i64) -> bool {
        self.engine.end_drag(pointer_id)
    }

    pub fn pointer_leave(&mut self) {
        self.hover_time = None;
    }

    pub fn hover_time(&self) -> Option<f64> {
        self.hover_time
    }

    pub fn select(&mut self, item_id: Option<SharedStr>) {
        self.selected = item_id;
    }

    pub fn selected(&self) -> Option<&SharedStr> {
        self.selected.as_ref()
    }

    /// Pin now to an external value, or hand it back to the internal clock.
    /// Follows now when enabled.
    pub fn set_now(&mut self, now: Option<f64>) -> Option<ViewChange> {
        self.clock.set_external(now);
        self.engine.follow_now(self.clock.now())
    }

    /// Drive the internal clock from the host's frame loop. When now advances
    /// the view follows it (if enabled).
    pub fn tick(&mut self) -> Option<ViewChange> {
        let now = self.clock.poll()?;
        self.engine.follow_now(now)
    }

    pub fn set_prefers_reduced_motion(&mut self, reduced: bool) {
        self.prefers_reduced_motion = reduced;
    }

    /// Whether hosts should animate item transitions.
    pub fn motion_enabled(&self) -> bool {
        self.config.motion.mode.resolve(self.prefers_reduced_motion)
    }

    /// Duration hosts should animate geometry updates over; zero when motion
    /// is off.
    pub fn transition_ms(&self) -> u64 {
        if self.motion_enabled() {
            self.config.motion.update_ms
        } else {
            0
        }
    }

    /// Lay out `data` for the current view, scroll position and now.
    pub fn frame(&self, data: &TimelineData) -> Frame {
        let index = data.index();
        Frame::build(
            &index,
            &FrameContext {
                scale: self.scale(),
                now: self.now(),
                hover_time: self.hover_time,
                scroll_top: self.scroll_top,
                viewport_height: self.viewport_height,
                config: &self.config,
                formatter: self.formatter.as_deref(),
            },
        )
    }

    /// Render commands for a frame built by [`Self::frame`].
    pub fn render(&self, frame: &Frame) -> RenderLayers {
        let axes = &self.config.axes;
        RenderLayers {
            time_axis: if axes.show_time_axis {
                render_time_axis(&frame.scale(), &frame.ticks, &frame.minor_ticks, axes.time_axis_height)
            } else {
                Vec::new()
            },
            lane_axis: if axes.show_lane_axis {
                render_lane_axis(frame, &self.styles, axes.lane_width)
            } else {
                Vec::new()
            },
            canvas: render_scene(frame, &self.styles, &self.config, self.selected.as_deref()),
        }
    }

    fn canvas_x(&self, root_x: f64) -> f64 {
        root_x - self.config.canvas_offset_x()
    }

    // A committed pan or zoom that pushed now past the margins is followed
    // by a snap back, and the snap is what gets reported.
    fn refollow(&mut self, change: ViewChange) -> ViewChange {
        if !change.committed {
            return change;
        }
        self.engine.follow_now(self.clock.now()).unwrap_or(change)
    }
}
