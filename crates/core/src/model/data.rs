use parallel_timeline_protocol::{Item, Lane};
use serde::{Deserialize, Serialize};

use super::LaneIndex;

/// Lanes and items for one render pass, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub lanes: Vec<Lane>,
    pub items: Vec<Item>,
}

impl TimelineData {
    pub fn new(lanes: Vec<Lane>, items: Vec<Item>) -> Self {
        Self { lanes, items }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn index(&self) -> LaneIndex<'_> {
        LaneIndex::build(&self.lanes, &self.items)
    }
}
