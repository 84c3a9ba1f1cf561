use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::{Emphasis, Paint, StatusPattern, ThemeToken};
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core turns a laid-out frame into a `Vec<RenderCommand>`; a host
/// renderer (DOM, canvas, terminal…) consumes the list in order. Every
/// coordinate is in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Filled rectangle. `item_id` ties the shape to an item for hit-testing
    /// and selection.
    DrawRect {
        rect: Rect,
        fill: Paint,
        pattern: StatusPattern,
        emphasis: Emphasis,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
        item_id: Option<SharedStr>,
    },

    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    ClearClip,

    /// Begin a logical group (a lane row, an item bar, a layer).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
