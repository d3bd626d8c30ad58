use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The six base stats in declared order. The order doubles as the tie-break
/// order wherever stats are ranked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKey {
    #[serde(rename = "HP")]
    Hp,
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
}

impl StatKey {
    pub const ALL: [StatKey; 6] = [
        StatKey::Hp,
        StatKey::Attack,
        StatKey::Defense,
        StatKey::SpAtk,
        StatKey::SpDef,
        StatKey::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Hp => "HP",
            StatKey::Attack => "Attack",
            StatKey::Defense => "Defense",
            StatKey::SpAtk => "SpAtk",
            StatKey::SpDef => "SpDef",
            StatKey::Speed => "Speed",
        }
    }

    /// Maps PokeAPI stat names (`special-attack`, ...) onto the fixed keys.
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "hp" => Some(StatKey::Hp),
            "attack" => Some(StatKey::Attack),
            "defense" => Some(StatKey::Defense),
            "special-attack" => Some(StatKey::SpAtk),
            "special-defense" => Some(StatKey::SpDef),
            "speed" => Some(StatKey::Speed),
            _ => None,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StatKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(rename = "HP")]
    pub hp: u32,
    #[serde(rename = "Attack")]
    pub atk: u32,
    #[serde(rename = "Defense")]
    pub def: u32,
    #[serde(rename = "SpAtk")]
    pub spa: u32,
    #[serde(rename = "SpDef")]
    pub spd: u32,
    #[serde(rename = "Speed")]
    pub spe: u32,
}

impl BaseStats {
    pub fn new(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> Self {
        Self {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        }
    }

    pub fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::Hp => self.hp,
            StatKey::Attack => self.atk,
            StatKey::Defense => self.def,
            StatKey::SpAtk => self.spa,
            StatKey::SpDef => self.spd,
            StatKey::Speed => self.spe,
        }
    }

    pub fn set(&mut self, key: StatKey, value: u32) {
        match key {
            StatKey::Hp => self.hp = value,
            StatKey::Attack => self.atk = value,
            StatKey::Defense => self.def = value,
            StatKey::SpAtk => self.spa = value,
            StatKey::SpDef => self.spd = value,
            StatKey::Speed => self.spe = value,
        }
    }

    pub fn total(&self) -> u32 {
        self.hp + self.atk + self.def + self.spa + self.spd + self.spe
    }

    /// Entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, u32)> + '_ {
        StatKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Builds stats from a loosely keyed map such as a JS object. The map must
    /// carry exactly the six display keys.
    pub fn from_map(map: &HashMap<String, u32>) -> Result<Self> {
        let missing: Vec<String> = StatKey::ALL
            .iter()
            .filter(|key| !map.contains_key(key.as_str()))
            .map(|key| key.as_str().to_string())
            .collect();
        let mut unexpected: Vec<String> = map
            .keys()
            .filter(|name| name.parse::<StatKey>().is_err())
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            unexpected.sort();
            return Err(EngineError::KeyMismatch {
                missing_left: missing,
                missing_right: unexpected,
            });
        }

        let mut stats = BaseStats::default();
        for key in StatKey::ALL {
            stats.set(key, map[key.as_str()]);
        }
        Ok(stats)
    }

    pub fn to_map(&self) -> HashMap<String, u32> {
        self.iter()
            .map(|(key, value)| (key.as_str().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_display_keys() {
        let stats = BaseStats::new(45, 49, 49, 65, 65, 45);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["HP"], 45);
        assert_eq!(value["SpAtk"], 65);
        assert_eq!(value["Speed"], 45);
    }

    #[test]
    fn from_map_reports_missing_and_unexpected_keys() {
        let mut map = BaseStats::new(1, 2, 3, 4, 5, 6).to_map();
        map.remove("Speed");
        map.insert("Luck".to_string(), 7);

        let err = BaseStats::from_map(&map).unwrap_err();
        assert_eq!(
            err,
            EngineError::KeyMismatch {
                missing_left: vec!["Speed".to_string()],
                missing_right: vec!["Luck".to_string()],
            }
        );
    }

    #[test]
    fn api_names_cover_all_keys() {
        let names = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];
        let keys: Vec<StatKey> = names.iter().filter_map(|n| StatKey::from_api_name(n)).collect();
        assert_eq!(keys, StatKey::ALL.to_vec());
        assert_eq!(StatKey::from_api_name("accuracy"), None);
    }
}
