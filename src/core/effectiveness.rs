use crate::data::type_chart::{DamageRelations, TypeChart};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEffectiveness {
    pub strong_against_us: BTreeSet<String>,
    pub weak_against_us: BTreeSet<String>,
    pub no_effect: BTreeSet<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub immunity_over_resist: bool,
    pub immunity_over_weakness: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            immunity_over_resist: true,
            immunity_over_weakness: true,
        }
    }
}

impl TypeEffectiveness {
    /// Unions relations without reconciling them.
    pub fn union<'a, I>(relations: I) -> Self
    where
        I: IntoIterator<Item = &'a DamageRelations>,
    {
        let mut out = Self::default();
        for relation in relations {
            out.strong_against_us.extend(relation.double_damage_from.iter().cloned());
            out.weak_against_us.extend(relation.half_damage_from.iter().cloned());
            out.no_effect.extend(relation.no_damage_from.iter().cloned());
        }
        out
    }

    /// Double and half cancel out, then immunities win over the remaining
    /// overlaps that `options` enables.
    pub fn reconcile(&mut self, options: ReconcileOptions) {
        let cancelled: Vec<String> = self
            .strong_against_us
            .intersection(&self.weak_against_us)
            .cloned()
            .collect();
        for name in &cancelled {
            self.strong_against_us.remove(name);
            self.weak_against_us.remove(name);
        }

        if options.immunity_over_resist {
            let immune = &self.no_effect;
            self.weak_against_us.retain(|name| !immune.contains(name));
        }
        if options.immunity_over_weakness {
            let immune = &self.no_effect;
            self.strong_against_us.retain(|name| !immune.contains(name));
        }
    }

    pub fn reconciled(mut self, options: ReconcileOptions) -> Self {
        self.reconcile(options);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.strong_against_us.is_empty() && self.weak_against_us.is_empty() && self.no_effect.is_empty()
    }
}

/// Resolves against a static table. Fails on the first unknown type.
pub fn resolve_with(chart: &TypeChart, types: &[String], options: ReconcileOptions) -> Result<TypeEffectiveness> {
    let relations = types
        .iter()
        .map(|t| chart.relations(t))
        .collect::<Result<Vec<_>>>()?;
    Ok(TypeEffectiveness::union(relations).reconciled(options))
}

pub fn resolve(chart: &TypeChart, types: &[String]) -> Result<TypeEffectiveness> {
    resolve_with(chart, types, ReconcileOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn double_and_half_cancel_on_both_sides() {
        let mut eff = TypeEffectiveness {
            strong_against_us: set(&["fire", "rock"]),
            weak_against_us: set(&["fire", "grass"]),
            no_effect: BTreeSet::new(),
        };
        eff.reconcile(ReconcileOptions::default());
        assert_eq!(eff.strong_against_us, set(&["rock"]));
        assert_eq!(eff.weak_against_us, set(&["grass"]));
    }

    #[test]
    fn immunity_toggles_are_independent() {
        let base = TypeEffectiveness {
            strong_against_us: set(&["ground"]),
            weak_against_us: set(&["electric"]),
            no_effect: set(&["ground", "electric"]),
        };
        let neither = base.clone().reconciled(ReconcileOptions {
            immunity_over_resist: false,
            immunity_over_weakness: false,
        });
        assert_eq!(neither, base);

        let resist_only = base.clone().reconciled(ReconcileOptions {
            immunity_over_resist: true,
            immunity_over_weakness: false,
        });
        assert!(resist_only.weak_against_us.is_empty());
        assert_eq!(resist_only.strong_against_us, set(&["ground"]));
    }
}
