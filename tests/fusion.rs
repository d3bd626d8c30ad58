use fusion_engine::core::averager::{average_stat_maps, average_stats, RoundingMode};
use fusion_engine::core::compat::StatProfile;
use fusion_engine::core::fusion::{fuse, fuse_types, fuse_with, FusionOptions};
use fusion_engine::data::record::AttributeRecord;
use fusion_engine::data::stats::{BaseStats, StatKey};
use fusion_engine::EngineError;

fn record(types: &[&str], stats: [u32; 6], main: &str, passive: Option<&str>) -> AttributeRecord {
    AttributeRecord::new(
        types.iter().map(|t| t.to_string()).collect(),
        BaseStats::new(stats[0], stats[1], stats[2], stats[3], stats[4], stats[5]),
        main,
        passive.map(str::to_string),
        Some(format!("sprites/{}.png", main)),
    )
    .expect("valid record")
}

fn charizard() -> AttributeRecord {
    record(&["fire", "flying"], [78, 84, 78, 109, 85, 100], "blaze", Some("solar-power"))
}

fn tidecaller() -> AttributeRecord {
    record(&["water"], [75, 90, 90, 70, 90, 60], "torrent", Some("rain-dish"))
}

#[test]
fn fused_stats_round_half_up_by_default() {
    let fused = fuse(&charizard(), &tidecaller());
    assert_eq!(fused.base_stats, BaseStats::new(77, 87, 84, 90, 88, 80));
}

#[test]
fn rounding_mode_applies_to_every_stat() {
    let even = fuse_with(
        &charizard(),
        &tidecaller(),
        FusionOptions {
            rounding: RoundingMode::HalfEven,
        },
    );
    assert_eq!(even.base_stats, BaseStats::new(76, 87, 84, 90, 88, 80));

    let truncated = average_stats(
        &charizard().base_stats,
        &tidecaller().base_stats,
        RoundingMode::Truncate,
    );
    assert_eq!(truncated, BaseStats::new(76, 87, 84, 89, 87, 80));
}

#[test]
fn reference_profile_breaks_ties_in_declared_order() {
    let profile = StatProfile::of(&charizard().base_stats);
    assert_eq!(profile.total, 534);
    assert_eq!(profile.top_two, [StatKey::SpAtk, StatKey::Speed]);
    assert_eq!(profile.lowest, StatKey::Hp);
}

#[test]
fn body_comes_from_primary_and_ability_from_secondary() {
    let primary = charizard();
    let secondary = tidecaller();
    let fused = fuse(&primary, &secondary);

    assert_eq!(fused.types, vec!["fire", "water"]);
    assert_eq!(fused.main_ability, "torrent");
    assert_eq!(fused.passive_ability, "solar-power");
    assert_eq!(fused.sprite, primary.sprite);
    assert!(fused.validate().is_ok());
}

#[test]
fn stats_are_symmetric_but_abilities_are_not() {
    let a = charizard();
    let b = tidecaller();
    let ab = fuse(&a, &b);
    let ba = fuse(&b, &a);

    assert_eq!(ab.base_stats, ba.base_stats);
    assert_ne!(ab.main_ability, ba.main_ability);
    assert_ne!(ab.passive_ability, ba.passive_ability);
    assert_eq!(ba.types, vec!["water", "flying"]);
}

#[test]
fn secondary_type_prefers_second_slot() {
    let primary = charizard();
    let venusaur = record(&["grass", "poison"], [80, 82, 83, 100, 100, 80], "overgrow", None);
    assert_eq!(fuse_types(&primary, &venusaur), vec!["fire", "poison"]);
}

#[test]
fn duplicate_second_slot_falls_back_to_first_slot() {
    let primary = record(&["fire"], [50; 6], "blaze", None);
    let secondary = record(&["water", "fire"], [50; 6], "torrent", None);
    assert_eq!(fuse_types(&primary, &secondary), vec!["fire", "water"]);
}

#[test]
fn shared_only_type_collapses_to_single_type() {
    let primary = charizard();
    let arcanine = record(&["fire"], [90, 110, 80, 100, 80, 95], "intimidate", Some("justified"));
    let fused = fuse(&primary, &arcanine);
    assert_eq!(fused.types, vec!["fire"]);
}

#[test]
fn primary_second_type_is_dropped() {
    let primary = charizard();
    let secondary = record(&["normal"], [50; 6], "keen-eye", None);
    assert_eq!(fuse_types(&primary, &secondary), vec!["fire", "normal"]);

    let grounded = record(&["rock", "ground"], [50; 6], "sturdy", None);
    assert_eq!(fuse_types(&primary, &grounded), vec!["fire", "ground"]);
}

#[test]
fn fusion_leaves_inputs_untouched() {
    let primary = charizard();
    let secondary = tidecaller();
    let before = (primary.clone(), secondary.clone());
    let _ = fuse(&primary, &secondary);
    assert_eq!((primary, secondary), before);
}

#[test]
fn missing_passive_is_inherited_as_sentinel() {
    let primary = record(&["normal"], [50; 6], "run-away", None);
    let fused = fuse(&primary, &charizard());
    assert_eq!(fused.passive_ability, "None");
    assert!(!fused.has_passive_ability());
}

#[test]
fn stat_maps_with_different_keys_are_rejected() {
    let left = charizard().base_stats.to_map();
    let mut right = tidecaller().base_stats.to_map();
    right.remove("SpDef");
    right.insert("Luck".to_string(), 10);

    let err = average_stat_maps(&left, &right, RoundingMode::HalfUp).unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyMismatch {
            missing_left: vec!["Luck".to_string()],
            missing_right: vec!["SpDef".to_string()],
        }
    );
}

#[test]
fn stat_maps_average_like_typed_stats() {
    let left = charizard().base_stats.to_map();
    let right = tidecaller().base_stats.to_map();
    let averaged = average_stat_maps(&left, &right, RoundingMode::HalfUp).unwrap();
    assert_eq!(
        BaseStats::from_map(&averaged).unwrap(),
        BaseStats::new(77, 87, 84, 90, 88, 80)
    );
}
