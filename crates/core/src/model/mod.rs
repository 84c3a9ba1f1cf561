mod data;
mod lane;

pub use data::TimelineData;
pub use lane::LaneIndex;
