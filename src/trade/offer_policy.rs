use tracing::debug;

use super::group_item::GroupItem;
use super::stacking::StackingKeyResolver;
use crate::common::types::{Advisory, ItemId, OfferSnapshot, OutboundCommand, StackingKey, TradeItem};
use crate::config::types::TradeSettings;

/// Why an offer attempt was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRejection {
    /// Own offer and candidates together exceed the absolute limit
    TooManyItems { total: usize, limit: usize },
    /// Visible slots are full and the lead candidate cannot extend an offered stack
    SlotsFull { key: StackingKey },
}

impl PolicyRejection {
    pub fn advisory(&self) -> Advisory {
        match self {
            PolicyRejection::TooManyItems { .. } => Advisory::TooManyItems,
            PolicyRejection::SlotsFull { .. } => Advisory::OfferSlotsFull,
        }
    }
}

/// Result of asking the policy to add items from a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    /// Nothing to do; no command and no advisory
    NoOp,
    AddOne(ItemId),
    /// More than one id
    AddMany(Vec<ItemId>),
    Rejected(PolicyRejection),
}

impl OfferOutcome {
    /// Command to send for this outcome, if any
    pub fn command(&self) -> Option<OutboundCommand> {
        match self {
            OfferOutcome::AddOne(item_id) => Some(OutboundCommand::AddOfferItem { item_id: *item_id }),
            OfferOutcome::AddMany(item_ids) => Some(OutboundCommand::AddOfferItems {
                item_ids: item_ids.clone(),
            }),
            OfferOutcome::NoOp | OfferOutcome::Rejected(_) => None,
        }
    }

    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            OfferOutcome::Rejected(rejection) => Some(rejection.advisory()),
            _ => None,
        }
    }
}

/// Decides which items of a group may be added to the own offer
#[derive(Debug, Clone)]
pub struct TradeOfferPolicy {
    visible_slot_cap: usize,
    max_offer_items: usize,
}

impl TradeOfferPolicy {
    pub fn new(visible_slot_cap: usize, max_offer_items: usize) -> Self {
        Self {
            visible_slot_cap,
            max_offer_items,
        }
    }

    pub fn from_settings(settings: &TradeSettings) -> Self {
        Self::new(settings.visible_slot_cap, settings.max_offer_items)
    }

    /// Whether `item` may join the own offer in its current state
    ///
    /// Below the visible cap everything passes. At the cap only groupable
    /// items whose stack is already on offer pass.
    pub fn can_trade_item(&self, item: &TradeItem, own: &OfferSnapshot) -> bool {
        if own.accepted {
            return false;
        }
        if own.len() < self.visible_slot_cap {
            return true;
        }
        if !item.is_groupable {
            return false;
        }
        own.has_stacking_key(&StackingKeyResolver::key_for(item))
    }

    /// Pick the item ids to offer from `group` for a request of `requested_count`
    ///
    /// `own` is `None` while the own side has not been delivered yet.
    pub fn attempt_offer(
        &self,
        group: &GroupItem,
        requested_count: usize,
        own: Option<&OfferSnapshot>,
    ) -> OfferOutcome {
        let own = match own {
            Some(own) => own,
            None => {
                debug!("Own offer not available yet, ignoring offer attempt");
                return OfferOutcome::NoOp;
            }
        };

        if own.accepted {
            debug!("Own offer is accepted and frozen");
            return OfferOutcome::NoOp;
        }

        let candidates = group.trade_items(requested_count, own);
        let lead = match candidates.first() {
            Some(lead) => *lead,
            None => return OfferOutcome::NoOp,
        };

        let total = own.len() + candidates.len();
        if total > self.max_offer_items {
            return OfferOutcome::Rejected(PolicyRejection::TooManyItems {
                total,
                limit: self.max_offer_items,
            });
        }

        // The lead candidate decides for the whole batch.
        if !self.can_trade_item(lead, own) {
            return OfferOutcome::Rejected(PolicyRejection::SlotsFull {
                key: group.stacking_key().clone(),
            });
        }

        if !lead.is_groupable {
            return OfferOutcome::AddOne(lead.id);
        }

        let ids: Vec<ItemId> = candidates.iter().map(|item| item.id).collect();
        match ids.as_slice() {
            [single] => OfferOutcome::AddOne(*single),
            _ => OfferOutcome::AddMany(ids),
        }
    }
}

impl Default for TradeOfferPolicy {
    fn default() -> Self {
        Self::from_settings(&TradeSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{FurniCategory, StuffData};
    use crate::trade::group_item::group_items;
    use pretty_assertions::assert_eq;

    fn poster(id: ItemId, artwork: &str) -> TradeItem {
        TradeItem {
            id,
            sprite_id: 4001,
            category: FurniCategory::Poster,
            is_wall_item: true,
            is_groupable: true,
            stuff_data: StuffData::Legacy(artwork.to_string()),
            name: format!("Poster {}", artwork),
            icon_url: None,
        }
    }

    fn rare(id: ItemId) -> TradeItem {
        TradeItem {
            id,
            sprite_id: 777,
            category: FurniCategory::Default,
            is_wall_item: false,
            is_groupable: false,
            stuff_data: StuffData::Empty,
            name: "Rare".to_string(),
            icon_url: None,
        }
    }

    fn posters(range: std::ops::RangeInclusive<ItemId>, artwork: &str) -> Vec<TradeItem> {
        range.map(|id| poster(id, artwork)).collect()
    }

    #[test]
    fn test_single_and_batch_adds() {
        let policy = TradeOfferPolicy::default();
        let group = group_items(posters(1..=5, "a")).remove(0);
        let own = OfferSnapshot::default();

        assert_eq!(policy.attempt_offer(&group, 1, Some(&own)), OfferOutcome::AddOne(1));
        assert_eq!(
            policy.attempt_offer(&group, 3, Some(&own)),
            OfferOutcome::AddMany(vec![1, 2, 3])
        );
        assert_eq!(
            policy.attempt_offer(&group, 3, Some(&own)).command(),
            Some(OutboundCommand::AddOfferItems { item_ids: vec![1, 2, 3] })
        );
    }

    #[test]
    fn test_never_offers_items_already_offered() {
        let policy = TradeOfferPolicy::default();
        let group = group_items(posters(1..=4, "a")).remove(0);
        let own = OfferSnapshot::new(posters(1..=2, "a"), false);

        assert_eq!(
            policy.attempt_offer(&group, 5, Some(&own)),
            OfferOutcome::AddMany(vec![3, 4])
        );

        let all = OfferSnapshot::new(posters(1..=4, "a"), false);
        assert_eq!(policy.attempt_offer(&group, 1, Some(&all)), OfferOutcome::NoOp);
    }

    #[test]
    fn test_noop_cases() {
        let policy = TradeOfferPolicy::default();
        let group = group_items(posters(1..=3, "a")).remove(0);

        let accepted = OfferSnapshot::new(Vec::new(), true);
        for count in [0, 1, 3, 100] {
            assert_eq!(policy.attempt_offer(&group, count, Some(&accepted)), OfferOutcome::NoOp);
        }
        assert_eq!(policy.attempt_offer(&group, 1, None), OfferOutcome::NoOp);
        assert_eq!(
            policy.attempt_offer(&group, 0, Some(&OfferSnapshot::default())),
            OfferOutcome::NoOp
        );
    }

    #[test]
    fn test_at_cap_same_stack_is_accepted() {
        let policy = TradeOfferPolicy::default();
        let own = OfferSnapshot::new(posters(1..=9, "a"), false);
        let group = group_items(posters(1..=10, "a")).remove(0);

        assert_eq!(policy.attempt_offer(&group, 1, Some(&own)), OfferOutcome::AddOne(10));
    }

    #[test]
    fn test_at_cap_other_stack_is_rejected() {
        let policy = TradeOfferPolicy::default();
        let own = OfferSnapshot::new(posters(1..=9, "a"), false);
        let group = group_items(posters(20..=21, "b")).remove(0);

        let outcome = policy.attempt_offer(&group, 1, Some(&own));
        assert_eq!(
            outcome,
            OfferOutcome::Rejected(PolicyRejection::SlotsFull {
                key: StackingKey::from("4001posterb")
            })
        );
        assert_eq!(outcome.command(), None);
        assert_eq!(outcome.advisory(), Some(Advisory::OfferSlotsFull));
    }

    #[test]
    fn test_non_groupable_lead_sends_one_item() {
        let policy = TradeOfferPolicy::default();
        let group = group_items(vec![rare(50)]).remove(0);

        assert_eq!(
            policy.attempt_offer(&group, 4, Some(&OfferSnapshot::default())),
            OfferOutcome::AddOne(50)
        );

        let full = OfferSnapshot::new(posters(1..=9, "a"), false);
        assert!(matches!(
            policy.attempt_offer(&group, 1, Some(&full)),
            OfferOutcome::Rejected(PolicyRejection::SlotsFull { .. })
        ));
    }

    #[test]
    fn test_combined_total_over_limit_is_rejected() {
        let policy = TradeOfferPolicy::default();
        let own = OfferSnapshot::new(posters(1..=1499, "a"), false);
        let group = group_items(posters(2000..=2001, "a")).remove(0);

        let outcome = policy.attempt_offer(&group, 2, Some(&own));
        assert_eq!(
            outcome,
            OfferOutcome::Rejected(PolicyRejection::TooManyItems {
                total: 1501,
                limit: 1500
            })
        );
        assert_eq!(outcome.advisory(), Some(Advisory::TooManyItems));

        assert_eq!(policy.attempt_offer(&group, 1, Some(&own)), OfferOutcome::AddOne(2000));
    }

    #[test]
    fn test_custom_caps() {
        let policy = TradeOfferPolicy::new(1, 3);
        let own = OfferSnapshot::new(vec![poster(1, "a")], false);

        let other_stack = group_items(posters(10..=10, "b")).remove(0);
        assert!(matches!(
            policy.attempt_offer(&other_stack, 1, Some(&own)),
            OfferOutcome::Rejected(PolicyRejection::SlotsFull { .. })
        ));

        let same_stack = group_items(posters(2..=5, "a")).remove(0);
        assert!(matches!(
            policy.attempt_offer(&same_stack, 3, Some(&own)),
            OfferOutcome::Rejected(PolicyRejection::TooManyItems { total: 4, limit: 3 })
        ));
        assert_eq!(
            policy.attempt_offer(&same_stack, 2, Some(&own)),
            OfferOutcome::AddMany(vec![2, 3])
        );
    }
}
