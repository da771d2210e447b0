use crate::common::types::{FurniCategory, StackingKey, StuffData, TradeItem};

/// Literal placed between sprite id and artwork in poster keys
pub const POSTER_TAG: &str = "poster";

/// How one family of categories derives its stacking key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingRule {
    /// Posters stack only with the same configured artwork
    Poster,
    /// Guild furniture stacks only within the same guild
    GuildFurni,
    /// Everything else: wall and floor variants of a sprite never stack
    Placement,
}

/// Categories with a dedicated rule; all others use `StackingRule::Placement`
const CATEGORY_RULES: &[(FurniCategory, StackingRule)] = &[
    (FurniCategory::Poster, StackingRule::Poster),
    (FurniCategory::GuildFurni, StackingRule::GuildFurni),
];

impl StackingRule {
    pub fn for_category(category: FurniCategory) -> Self {
        CATEGORY_RULES
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rule)| *rule)
            .unwrap_or(StackingRule::Placement)
    }

    fn key(self, is_wall_item: bool, sprite_id: i32, stuff_data: &StuffData) -> String {
        match self {
            StackingRule::Poster => {
                format!("{}{}{}", sprite_id, POSTER_TAG, stuff_data.legacy_string())
            }
            StackingRule::GuildFurni => match stuff_data {
                StuffData::StringArray(_) => {
                    format!("{},{}", sprite_id, stuff_data.value(1).unwrap_or(""))
                }
                _ => sprite_id.to_string(),
            },
            StackingRule::Placement => {
                let placement = if is_wall_item { 'I' } else { 'S' };
                format!("{}{}", placement, sprite_id)
            }
        }
    }
}

/// Computes the key deciding whether two items may share a stack
///
/// Pure and total over every category.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackingKeyResolver;

impl StackingKeyResolver {
    pub fn compute_key(
        category: FurniCategory,
        is_wall_item: bool,
        sprite_id: i32,
        stuff_data: &StuffData,
    ) -> StackingKey {
        StackingRule::for_category(category)
            .key(is_wall_item, sprite_id, stuff_data)
            .into()
    }

    pub fn key_for(item: &TradeItem) -> StackingKey {
        Self::compute_key(item.category, item.is_wall_item, item.sprite_id, &item.stuff_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_keys_follow_artwork() {
        let a = StackingKeyResolver::compute_key(
            FurniCategory::Poster,
            true,
            4001,
            &StuffData::Legacy("12".into()),
        );
        let same = StackingKeyResolver::compute_key(
            FurniCategory::Poster,
            true,
            4001,
            &StuffData::Legacy("12".into()),
        );
        let other = StackingKeyResolver::compute_key(
            FurniCategory::Poster,
            true,
            4001,
            &StuffData::Legacy("13".into()),
        );

        assert_eq!(a.as_str(), "4001poster12");
        assert_eq!(a, same);
        assert_ne!(a, other);
    }

    #[test]
    fn test_guild_keys_follow_guild_id() {
        let guild = |id: &str| StuffData::StringArray(vec!["0".into(), id.into(), "ff0000".into()]);

        let a = StackingKeyResolver::compute_key(FurniCategory::GuildFurni, false, 300, &guild("7"));
        let b = StackingKeyResolver::compute_key(FurniCategory::GuildFurni, false, 300, &guild("8"));

        assert_eq!(a.as_str(), "300,7");
        assert_ne!(a, b);
        assert_eq!(
            StackingKeyResolver::compute_key(FurniCategory::GuildFurni, false, 300, &StuffData::Empty)
                .as_str(),
            "300"
        );
    }

    #[test]
    fn test_wall_and_floor_never_share_a_key() {
        let floor =
            StackingKeyResolver::compute_key(FurniCategory::Default, false, 18, &StuffData::Empty);
        let wall =
            StackingKeyResolver::compute_key(FurniCategory::Default, true, 18, &StuffData::Empty);

        assert_eq!(floor.as_str(), "S18");
        assert_eq!(wall.as_str(), "I18");
        assert_ne!(floor, wall);
    }

    #[test]
    fn test_unlisted_categories_ignore_stuff_data() {
        let a = StackingKeyResolver::compute_key(
            FurniCategory::Trophy,
            false,
            90,
            &StuffData::Legacy("engraved".into()),
        );
        let b =
            StackingKeyResolver::compute_key(FurniCategory::Trophy, false, 90, &StuffData::Empty);
        assert_eq!(a, b);
        assert_eq!(StackingRule::for_category(FurniCategory::Unknown), StackingRule::Placement);
    }
}
