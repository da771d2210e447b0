use std::collections::HashMap;

use super::stacking::StackingKeyResolver;
use crate::common::types::{GroupKey, ItemId, OfferSnapshot, StackingKey, TradeItem};

/// A logical stack of inventory items sharing a stacking key
///
/// Constituents are kept in acquisition order. The group is a read-only view:
/// availability is always computed against the current own offer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupItem {
    key: GroupKey,
    stacking_key: StackingKey,
    name: String,
    icon_url: Option<String>,
    items: Vec<TradeItem>,
}

impl GroupItem {
    fn new(key: GroupKey, stacking_key: StackingKey, first: TradeItem) -> Self {
        Self {
            key,
            stacking_key,
            name: first.name.clone(),
            icon_url: first.icon_url.clone(),
            items: vec![first],
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn stacking_key(&self) -> &StackingKey {
        &self.stacking_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn items(&self) -> &[TradeItem] {
        &self.items
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Constituents not already present in the own offer
    pub fn unlocked_count(&self, own: &OfferSnapshot) -> usize {
        self.items.iter().filter(|item| !own.contains(item.id)).count()
    }

    /// Up to `max_count` items not yet offered, in acquisition order
    pub fn trade_items(&self, max_count: usize, own: &OfferSnapshot) -> Vec<&TradeItem> {
        self.items
            .iter()
            .filter(|item| !own.contains(item.id))
            .take(max_count)
            .collect()
    }

    /// Most recently offered constituent, the one a "remove" retracts
    pub fn last_offered<'a>(&self, own: &'a OfferSnapshot) -> Option<&'a TradeItem> {
        own.items.iter().rev().find(|item| self.contains(item.id))
    }

    /// Most recently added constituent
    pub fn last_item(&self) -> Option<&TradeItem> {
        self.items.last()
    }
}

/// Group identity for an item: groupable items join their stack,
/// anything else stands alone
pub fn group_key_for(item: &TradeItem) -> (GroupKey, StackingKey) {
    let stacking_key = StackingKeyResolver::key_for(item);
    let key = if item.is_groupable {
        GroupKey::Stack(stacking_key.clone())
    } else {
        GroupKey::Single(item.id)
    };
    (key, stacking_key)
}

/// Aggregate a flat item list into groups, ordered by first appearance
pub fn group_items<I>(items: I) -> Vec<GroupItem>
where
    I: IntoIterator<Item = TradeItem>,
{
    let mut groups: Vec<GroupItem> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for item in items {
        let (key, stacking_key) = group_key_for(&item);
        match index.get(&key) {
            Some(&position) => groups[position].items.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupItem::new(key, stacking_key, item));
            }
        }
    }

    groups
}

impl OfferSnapshot {
    /// The offer viewed as display groups
    pub fn groups(&self) -> Vec<GroupItem> {
        group_items(self.items.iter().cloned())
    }

    /// Whether any offered item carries the given stacking key
    pub fn has_stacking_key(&self, key: &StackingKey) -> bool {
        self.items
            .iter()
            .any(|item| StackingKeyResolver::key_for(item) == *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{FurniCategory, StuffData};
    use pretty_assertions::assert_eq;

    fn chair(id: ItemId) -> TradeItem {
        TradeItem {
            id,
            sprite_id: 18,
            category: FurniCategory::Default,
            is_wall_item: false,
            is_groupable: true,
            stuff_data: StuffData::Empty,
            name: "Chair".to_string(),
            icon_url: None,
        }
    }

    fn poster(id: ItemId, artwork: &str) -> TradeItem {
        TradeItem {
            id,
            sprite_id: 4001,
            category: FurniCategory::Poster,
            is_wall_item: true,
            is_groupable: true,
            stuff_data: StuffData::Legacy(artwork.to_string()),
            name: "Poster".to_string(),
            icon_url: None,
        }
    }

    fn trophy(id: ItemId) -> TradeItem {
        TradeItem {
            id,
            sprite_id: 90,
            category: FurniCategory::Trophy,
            is_wall_item: false,
            is_groupable: false,
            stuff_data: StuffData::Empty,
            name: "Trophy".to_string(),
            icon_url: None,
        }
    }

    #[test]
    fn test_grouping_preserves_first_appearance() {
        let groups = group_items(vec![chair(1), poster(2, "a"), chair(3), poster(4, "b")]);

        let keys: Vec<String> = groups.iter().map(|g| g.key().to_string()).collect();
        assert_eq!(keys, vec!["S18", "4001postera", "4001posterb"]);
        assert_eq!(groups[0].total_count(), 2);
        assert_eq!(groups[0].last_item().map(|i| i.id), Some(3));
    }

    #[test]
    fn test_non_groupable_items_stand_alone() {
        let groups = group_items(vec![trophy(1), trophy(2)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key(), &GroupKey::Single(1));
        assert_eq!(groups[0].stacking_key(), groups[1].stacking_key());
    }

    #[test]
    fn test_unlocked_count_excludes_offered() {
        let group = group_items(vec![chair(1), chair(2), chair(3)]).remove(0);
        let own = OfferSnapshot::new(vec![chair(2), poster(9, "a")], false);

        assert_eq!(group.unlocked_count(&OfferSnapshot::default()), 3);
        assert_eq!(group.unlocked_count(&own), 2);
        assert_eq!(group.unlocked_count(&own), group.total_count() - 1);
    }

    #[test]
    fn test_trade_items_in_acquisition_order() {
        let group = group_items(vec![chair(1), chair(2), chair(3), chair(4)]).remove(0);
        let own = OfferSnapshot::new(vec![chair(2)], false);

        let ids: Vec<ItemId> = group.trade_items(2, &own).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<ItemId> = group.trade_items(10, &own).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);

        let everything = OfferSnapshot::new(group.items().to_vec(), false);
        assert!(group.trade_items(1, &everything).is_empty());
    }

    #[test]
    fn test_last_offered_follows_offer_order() {
        let group = group_items(vec![chair(1), chair(2), chair(3)]).remove(0);
        let own = OfferSnapshot::new(vec![chair(3), poster(8, "a"), chair(1), poster(9, "a")], false);

        assert_eq!(group.last_offered(&own).map(|i| i.id), Some(1));
        assert!(group.last_offered(&OfferSnapshot::default()).is_none());
    }

    #[test]
    fn test_snapshot_groups_and_keys() {
        let own = OfferSnapshot::new(vec![poster(1, "a"), poster(2, "a"), chair(3)], false);
        let groups = own.groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total_count(), 2);
        assert!(own.has_stacking_key(&StackingKey::from("4001postera")));
        assert!(!own.has_stacking_key(&StackingKey::from("4001posterb")));
    }
}
