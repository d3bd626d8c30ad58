use crate::data::stats::{BaseStats, StatKey};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOTAL_MARGIN: u32 = 50;

/// Shape of a stat spread used to judge fusion compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatProfile {
    pub total: u32,
    /// Highest stat first. Ties go to the key declared first.
    pub top_two: [StatKey; 2],
    pub lowest: StatKey,
}

impl StatProfile {
    pub fn of(stats: &BaseStats) -> Self {
        let mut ranked: Vec<(StatKey, u32)> = stats.iter().collect();
        // Stable sort keeps declared order among equal values.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let lowest = stats
            .iter()
            .fold(None::<(StatKey, u32)>, |best, (key, value)| match best {
                Some((_, v)) if v <= value => best,
                _ => Some((key, value)),
            })
            .map(|(key, _)| key)
            .unwrap_or(StatKey::Hp);

        Self {
            total: stats.total(),
            top_two: [ranked[0].0, ranked[1].0],
            lowest,
        }
    }

    /// True when `candidate` is within `margin` below this total (or above it)
    /// and has the same two best stats in order and the same worst stat.
    pub fn accepts(&self, candidate: &StatProfile, margin: u32) -> bool {
        candidate.total as i64 >= self.total as i64 - margin as i64
            && candidate.top_two == self.top_two
            && candidate.lowest == self.lowest
    }
}

/// Keeps the identifiers whose stats pass against `reference`, in input order.
/// `exclude` is never returned.
pub fn filter_candidates<'a, I>(reference: &BaseStats, entries: I, exclude: &str, margin: u32) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a BaseStats)>,
{
    let reference = StatProfile::of(reference);
    entries
        .into_iter()
        .filter(|(identifier, _)| *identifier != exclude)
        .filter(|(_, stats)| reference.accepts(&StatProfile::of(stats), margin))
        .map(|(identifier, _)| identifier.to_string())
        .collect()
}
