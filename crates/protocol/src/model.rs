use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// Opaque caller data carried through untouched.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Built-in status names. Any other string is a valid status too; it just has
/// no default style.
pub mod status {
    pub const QUEUED: &str = "queued";
    pub const RUNNING: &str = "running";
    pub const THINKING: &str = "thinking";
    pub const RESPONDING: &str = "responding";
    pub const REVIEW: &str = "review";
    pub const COMPLETED: &str = "completed";
    pub const ERROR: &str = "error";
    pub const CANCELLED: &str = "cancelled";
}

/// A horizontal track grouping related items (one per agent, worker, job…).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub id: SharedStr,
    pub label: SharedStr,
    /// Base color (any CSS color string). Items may override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Metadata>,
}

impl Lane {
    pub fn new(id: impl Into<SharedStr>, label: impl Into<SharedStr>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            meta: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<SharedStr>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A sub-range of an item's bar carrying its own status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Stable key. Derived from the item id and position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SharedStr>,
    pub start: f64,
    /// `None` means the segment runs to the item's effective end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Metadata>,
}

impl Segment {
    pub fn new(start: f64) -> Self {
        Self {
            id: None,
            start,
            end: None,
            label: None,
            status: None,
            color: None,
            meta: None,
        }
    }

    pub fn ending_at(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_status(mut self, status: impl Into<SharedStr>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<SharedStr>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A bar of work within a lane.
///
/// `end == None` marks an open ("active") item whose bar extends to now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: SharedStr,
    pub lane_id: SharedStr,
    pub start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SharedStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SharedStr>,
    /// Rendered as one continuous bar split into sub-segments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
    /// Fill fraction within the bar, 0..=1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Metadata>,
}

impl Item {
    pub fn new(id: impl Into<SharedStr>, lane_id: impl Into<SharedStr>, start: f64) -> Self {
        Self {
            id: id.into(),
            lane_id: lane_id.into(),
            start,
            end: None,
            label: None,
            status: None,
            color: None,
            segments: Vec::new(),
            progress: None,
            meta: None,
        }
    }

    pub fn ending_at(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_status(mut self, status: impl Into<SharedStr>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<SharedStr>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<SharedStr>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Whether the item has no recorded end and still grows with now.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}
