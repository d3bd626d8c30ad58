use crate::data::stats::{BaseStats, StatKey};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// How the midpoint of two stats is rounded when their sum is odd.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// 76.5 -> 77
    #[default]
    HalfUp,
    /// 76.5 -> 76, 77.5 -> 78
    HalfEven,
    /// 76.5 -> 76
    Truncate,
}

impl RoundingMode {
    pub fn midpoint(self, a: u32, b: u32) -> u32 {
        let sum = a as u64 + b as u64;
        let half = sum / 2;
        let value = if sum % 2 == 0 {
            half
        } else {
            match self {
                RoundingMode::HalfUp => half + 1,
                RoundingMode::HalfEven => half + (half % 2),
                RoundingMode::Truncate => half,
            }
        };
        value as u32
    }
}

impl FromStr for RoundingMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "half-up" | "half_up" | "round" => Ok(RoundingMode::HalfUp),
            "half-even" | "half_even" | "banker" => Ok(RoundingMode::HalfEven),
            "truncate" | "floor" => Ok(RoundingMode::Truncate),
            _ => Err(()),
        }
    }
}

pub fn average_stats(primary: &BaseStats, secondary: &BaseStats, mode: RoundingMode) -> BaseStats {
    let mut averaged = BaseStats::default();
    for key in StatKey::ALL {
        averaged.set(key, mode.midpoint(primary.get(key), secondary.get(key)));
    }
    averaged
}

/// Averages two loosely keyed stat maps. Both maps must share one key set.
pub fn average_stat_maps(
    primary: &HashMap<String, u32>,
    secondary: &HashMap<String, u32>,
    mode: RoundingMode,
) -> Result<HashMap<String, u32>> {
    let mut missing_left: Vec<String> = secondary
        .keys()
        .filter(|k| !primary.contains_key(*k))
        .cloned()
        .collect();
    let mut missing_right: Vec<String> = primary
        .keys()
        .filter(|k| !secondary.contains_key(*k))
        .cloned()
        .collect();
    if !missing_left.is_empty() || !missing_right.is_empty() {
        missing_left.sort();
        missing_right.sort();
        return Err(EngineError::KeyMismatch {
            missing_left,
            missing_right,
        });
    }

    Ok(primary
        .iter()
        .map(|(key, value)| (key.clone(), mode.midpoint(*value, secondary[key])))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_modes_differ_only_on_odd_sums() {
        assert_eq!(RoundingMode::HalfUp.midpoint(78, 75), 77);
        assert_eq!(RoundingMode::HalfEven.midpoint(78, 75), 76);
        assert_eq!(RoundingMode::HalfEven.midpoint(80, 75), 78);
        assert_eq!(RoundingMode::Truncate.midpoint(78, 75), 76);
        for mode in [RoundingMode::HalfUp, RoundingMode::HalfEven, RoundingMode::Truncate] {
            assert_eq!(mode.midpoint(84, 90), 87);
        }
    }

    #[test]
    fn midpoint_does_not_overflow() {
        assert_eq!(RoundingMode::HalfUp.midpoint(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("half-even".parse(), Ok(RoundingMode::HalfEven));
        assert_eq!("Truncate".parse(), Ok(RoundingMode::Truncate));
        assert!("ceil".parse::<RoundingMode>().is_err());
    }
}
