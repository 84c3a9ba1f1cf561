use std::collections::HashMap;

use parallel_timeline_protocol::{Item, Lane};
use tracing::trace;

/// Lanes with their items grouped and ordered for one layout pass.
///
/// Borrowed from the caller's data; nothing is cloned. Items are ordered by
/// start within each lane (stable, so equal starts keep input order). Items
/// whose `lane_id` names no lane are left out and only counted.
#[derive(Debug)]
pub struct LaneIndex<'a> {
    lanes: &'a [Lane],
    positions: HashMap<&'a str, usize>,
    items: Vec<Vec<&'a Item>>,
    orphans: usize,
}

impl<'a> LaneIndex<'a> {
    pub fn build(lanes: &'a [Lane], items: &'a [Item]) -> Self {
        let mut positions = HashMap::with_capacity(lanes.len());
        for (i, lane) in lanes.iter().enumerate() {
            // First lane wins on duplicate ids.
            positions.entry(lane.id.as_str()).or_insert(i);
        }

        let mut grouped: Vec<Vec<&'a Item>> = vec![Vec::new(); lanes.len()];
        let mut orphans = 0;
        for item in items {
            match positions.get(item.lane_id.as_str()) {
                Some(&i) => grouped[i].push(item),
                None => {
                    trace!(item = %item.id, lane = %item.lane_id, "dropping item with unknown lane");
                    orphans += 1;
                }
            }
        }
        for lane_items in &mut grouped {
            lane_items.sort_by(|a, b| a.start.total_cmp(&b.start));
        }

        Self {
            lanes,
            positions,
            items: grouped,
            orphans,
        }
    }

    pub fn lanes(&self) -> &'a [Lane] {
        self.lanes
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lane(&self, id: &str) -> Option<&'a Lane> {
        self.positions.get(id).map(|&i| &self.lanes[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Items of the lane at `index`, ordered by start.
    pub fn items_at(&self, index: usize) -> &[&'a Item] {
        self.items.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn items_for(&self, id: &str) -> &[&'a Item] {
        match self.position(id) {
            Some(i) => self.items_at(i),
            None => &[],
        }
    }

    /// Items dropped because their lane does not exist.
    pub fn orphan_count(&self) -> usize {
        self.orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_sorts_by_start() {
        let lanes = vec![Lane::new("a", "A"), Lane::new("b", "B")];
        let items = vec![
            Item::new("3", "a", 300.0),
            Item::new("1", "a", 100.0),
            Item::new("x", "b", 50.0),
            Item::new("2", "a", 100.0),
        ];
        let index = LaneIndex::build(&lanes, &items);
        let ids: Vec<&str> = index.items_for("a").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(index.items_at(1).len(), 1);
        assert_eq!(index.orphan_count(), 0);
    }

    #[test]
    fn drops_items_with_unknown_lanes() {
        let lanes = vec![Lane::new("a", "A")];
        let items = vec![Item::new("1", "a", 0.0), Item::new("2", "ghost", 0.0)];
        let index = LaneIndex::build(&lanes, &items);
        assert_eq!(index.items_for("a").len(), 1);
        assert!(index.items_for("ghost").is_empty());
        assert_eq!(index.orphan_count(), 1);
    }

    #[test]
    fn lookup_by_id() {
        let lanes = vec![Lane::new("a", "Alpha"), Lane::new("b", "Beta")];
        let index = LaneIndex::build(&lanes, &[]);
        assert_eq!(index.lane("b").map(|l| l.label.as_str()), Some("Beta"));
        assert_eq!(index.position("b"), Some(1));
        assert!(index.lane("c").is_none());
        assert!(index.items_at(9).is_empty());
    }
}
