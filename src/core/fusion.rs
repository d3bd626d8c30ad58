use crate::core::averager::{average_stats, RoundingMode};
use crate::data::record::AttributeRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FusionOptions {
    pub rounding: RoundingMode,
}

/// Picks the fused type list: the primary's first type, plus the secondary's
/// second type, or failing that its first, whichever differs from it.
pub fn fuse_types(primary: &AttributeRecord, secondary: &AttributeRecord) -> Vec<String> {
    let head = primary.primary_type();
    let tail = secondary
        .secondary_type()
        .filter(|t| *t != head)
        .or_else(|| Some(secondary.primary_type()).filter(|t| *t != head));

    let mut types = vec![head.to_string()];
    if let Some(tail) = tail {
        types.push(tail.to_string());
    }
    types
}

/// Body (first type, passive ability, sprite) comes from `primary`; the active
/// ability and a second type come from `secondary`. Stats are averaged.
pub fn fuse_with(
    primary: &AttributeRecord,
    secondary: &AttributeRecord,
    options: FusionOptions,
) -> AttributeRecord {
    AttributeRecord {
        types: fuse_types(primary, secondary),
        base_stats: average_stats(&primary.base_stats, &secondary.base_stats, options.rounding),
        main_ability: secondary.main_ability.clone(),
        passive_ability: primary.passive_ability.clone(),
        sprite: primary.sprite.clone(),
    }
}

pub fn fuse(primary: &AttributeRecord, secondary: &AttributeRecord) -> AttributeRecord {
    fuse_with(primary, secondary, FusionOptions::default())
}
