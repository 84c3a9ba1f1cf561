//! Layout and viewport engine for parallel, lane-based timelines.
//!
//! Everything here is synchronous and renderer-agnostic: hosts feed input
//! events into a [`Timeline`], ask it for a [`Frame`], and draw the
//! [`RenderCommand`](parallel_timeline_protocol::RenderCommand)s it renders.

pub mod clock;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod timeline;
pub mod viewport;
pub mod views;

pub use clock::{Clock, ManualClock, RealtimeClock, SystemClock};
pub use config::TimelineConfig;
pub use error::ConfigError;
pub use mapper::TimeScale;
pub use model::{LaneIndex, TimelineData};
pub use timeline::{RenderLayers, Timeline};
pub use viewport::{ViewChange, ViewportEngine, ViewportOwner};
pub use views::Frame;
