pub mod commands;
pub mod model;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use model::{Item, Lane, Metadata, Segment, status};
pub use shared_str::SharedStr;
pub use theme::{Emphasis, Paint, StatusPattern, StatusStyle, StatusStyles, ThemeToken};
pub use types::{Point, Rect, TimeWindow, ViewChangeReason, WindowError};
