use tracing::{debug, info};

use super::group_item::{group_items, GroupItem};
use crate::common::types::{GroupKey, OutboundCommand, TradeItem};

/// The trade core's view of the user's inventory
///
/// Holds whatever list the inventory last delivered and the groups derived
/// from it. The "needs refresh" flag starts raised so the first sync asks
/// the server for a list.
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<TradeItem>,
    groups: Vec<GroupItem>,
    needs_refresh: bool,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            groups: Vec::new(),
            needs_refresh: true,
        }
    }

    /// Mark the list stale
    pub fn invalidate(&mut self) {
        debug!("Inventory marked for refresh");
        self.needs_refresh = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Clear the refresh flag, yielding the request to send if it was set
    pub fn take_refresh_request(&mut self) -> Option<OutboundCommand> {
        if !self.needs_refresh {
            return None;
        }
        self.needs_refresh = false;
        Some(OutboundCommand::RequestInventoryRefresh)
    }

    /// Replace the list and rebuild every group
    pub fn replace(&mut self, items: Vec<TradeItem>) {
        self.groups = group_items(items.iter().cloned());
        self.items = items;
        info!(
            items = self.items.len(),
            groups = self.groups.len(),
            "Inventory list delivered"
        );
    }

    pub fn items(&self) -> &[TradeItem] {
        &self.items
    }

    pub fn groups(&self) -> &[GroupItem] {
        &self.groups
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupItem> {
        self.groups.iter().find(|group| group.key() == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
