//! Timeline configuration.
//!
//! Every field is optional in JSON; missing sections and fields take the
//! defaults listed on each struct. [`TimelineConfig::from_json`] parses and
//! validates in one step.

use std::collections::HashMap;

use parallel_timeline_protocol::{SharedStr, StatusStyle, StatusStyles, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::viewport::Modifiers;

/// The realtime clock never ticks faster than this.
pub const MIN_TICK_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Initial window of an uncontrolled timeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_view: Option<TimeWindow>,
    pub layout: LayoutOptions,
    pub grid: GridOptions,
    pub axes: AxisOptions,
    pub interaction: InteractionOptions,
    pub virtualization: VirtualizationOptions,
    pub realtime: RealtimeOptions,
    pub motion: MotionOptions,
    pub show_now_line: ShowFlag,
    pub show_hover_line: ShowFlag,
    /// Merged over the built-in status styles.
    pub status_styles: HashMap<SharedStr, StatusStyle>,
}

/// A boolean that defaults to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowFlag(pub bool);

impl Default for ShowFlag {
    fn default() -> Self {
        ShowFlag(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub row_height: f64,
    pub lane_gap: f64,
    pub item_height: f64,
}

impl LayoutOptions {
    /// Vertical distance between the tops of consecutive lane rows.
    pub fn stride(&self) -> f64 {
        self.row_height + self.lane_gap
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            row_height: 44.0,
            lane_gap: 6.0,
            item_height: 22.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    pub show: bool,
    pub show_minor: bool,
    /// Desired pixel spacing between major ticks.
    pub major_tick_px: f64,
    /// Minor subdivisions per major interval.
    pub minor_ticks: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_minor: true,
            major_tick_px: 120.0,
            minor_ticks: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub show_time_axis: bool,
    pub show_lane_axis: bool,
    /// Width of the lane label column, in px.
    pub lane_width: f64,
    pub time_axis_height: f64,
    /// Tick labels read as durations from this time. Falls back to the
    /// default view start, then 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_origin: Option<f64>,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            show_time_axis: true,
            show_lane_axis: true,
            lane_width: 220.0,
            time_axis_height: 34.0,
            time_origin: None,
        }
    }
}

/// Modifier key that must be held for wheel zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomModifier {
    #[default]
    Ctrl,
    Meta,
    Alt,
    Shift,
    None,
}

impl ZoomModifier {
    pub fn matches(self, modifiers: Modifiers) -> bool {
        match self {
            Self::None => true,
            Self::Ctrl => modifiers.ctrl,
            Self::Meta => modifiers.meta,
            Self::Alt => modifiers.alt,
            Self::Shift => modifiers.shift,
        }
    }
}

/// Where "now" is kept while following.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAnchor {
    #[default]
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionOptions {
    pub pan: bool,
    pub zoom: bool,
    pub zoom_modifier: ZoomModifier,
    pub min_range_ms: f64,
    pub max_range_ms: f64,
    pub follow_now: bool,
    pub follow_now_anchor: FollowAnchor,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            pan: true,
            zoom: true,
            zoom_modifier: ZoomModifier::Ctrl,
            min_range_ms: 2_000.0,
            max_range_ms: 24.0 * 60.0 * 60.0 * 1000.0,
            follow_now: false,
            follow_now_anchor: FollowAnchor::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualizationOptions {
    pub enabled: bool,
    /// Extra lanes rendered above and below the visible range.
    pub overscan: usize,
}

impl Default for VirtualizationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            overscan: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RealtimeOptions {
    /// Drive "now" from the internal clock when no external now is given.
    pub enabled: bool,
    pub tick_ms: u64,
}

impl RealtimeOptions {
    pub fn interval_ms(&self) -> u64 {
        self.tick_ms.max(MIN_TICK_MS)
    }
}

impl Default for RealtimeOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    #[default]
    Auto,
    On,
    Off,
}

impl MotionMode {
    /// Whether transitions should animate. `Auto` defers to the host's
    /// reduced-motion signal.
    pub fn resolve(self, prefers_reduced_motion: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Auto => !prefers_reduced_motion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionOptions {
    pub mode: MotionMode,
    /// Transition duration for geometry updates, in ms.
    pub update_ms: u64,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            mode: MotionMode::Auto,
            update_ms: 220,
        }
    }
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let i = &self.interaction;
        positive("interaction.minRangeMs", i.min_range_ms)?;
        positive("interaction.maxRangeMs", i.max_range_ms)?;
        if i.min_range_ms > i.max_range_ms {
            return Err(ConfigError::RangeBounds {
                min: i.min_range_ms,
                max: i.max_range_ms,
            });
        }

        positive("layout.rowHeight", self.layout.row_height)?;
        positive("layout.itemHeight", self.layout.item_height)?;
        let gap = self.layout.lane_gap;
        if gap.is_nan() || gap < 0.0 || gap.is_infinite() {
            return Err(ConfigError::NonPositive {
                field: "layout.laneGap",
                value: gap,
            });
        }

        positive("grid.majorTickPx", self.grid.major_tick_px)?;
        positive("grid.minorTicks", f64::from(self.grid.minor_ticks))?;
        Ok(())
    }

    /// Sets the initial window, rejecting a degenerate one.
    pub fn with_default_view(mut self, start: f64, end: f64) -> Result<Self, ConfigError> {
        self.default_view = Some(TimeWindow::new(start, end)?);
        Ok(self)
    }

    /// Origin tick labels are measured from.
    pub fn time_origin(&self) -> f64 {
        self.axes
            .time_origin
            .or_else(|| self.default_view.map(|v| v.start()))
            .unwrap_or(0.0)
    }

    /// Built-in status styles with this config's overrides applied.
    pub fn status_styles(&self) -> StatusStyles {
        StatusStyles::merged(&self.status_styles)
    }

    /// Horizontal offset of the canvas inside the timeline root.
    pub fn canvas_offset_x(&self) -> f64 {
        if self.axes.show_lane_axis {
            self.axes.lane_width
        } else {
            0.0
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so NaN fails too.
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
