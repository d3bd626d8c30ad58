use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Damage taken by one defending type, keyed by attacking type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRelations {
    #[serde(default, alias = "double_damage_from")]
    pub double_damage_from: BTreeSet<String>,
    #[serde(default, alias = "half_damage_from")]
    pub half_damage_from: BTreeSet<String>,
    #[serde(default, alias = "no_damage_from")]
    pub no_damage_from: BTreeSet<String>,
}

impl DamageRelations {
    pub fn new(double: &[&str], half: &[&str], none: &[&str]) -> Self {
        let collect = |names: &[&str]| -> BTreeSet<String> { names.iter().map(|v| v.to_string()).collect() };
        Self {
            double_damage_from: collect(double),
            half_damage_from: collect(half),
            no_damage_from: collect(none),
        }
    }

    fn multiplier_from(&self, attack_type: &str) -> f32 {
        if self.no_damage_from.contains(attack_type) {
            0.0
        } else if self.double_damage_from.contains(attack_type) {
            2.0
        } else if self.half_damage_from.contains(attack_type) {
            0.5
        } else {
            1.0
        }
    }
}

/// Static per-type relation table, used directly or as the fallback when the
/// remote relation service is unavailable.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeChart {
    chart: HashMap<String, DamageRelations>,
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChart {
    pub fn new() -> Self {
        let mut chart = HashMap::new();
        let mut add_entry = |type_name: &str, double: &[&str], half: &[&str], none: &[&str]| {
            chart.insert(type_name.to_string(), DamageRelations::new(double, half, none));
        };

        add_entry("normal", &["fighting"], &[], &["ghost"]);
        add_entry("fighting", &["flying", "psychic", "fairy"], &["rock", "bug", "dark"], &[]);
        add_entry("flying", &["rock", "electric", "ice"], &["fighting", "bug", "grass"], &["ground"]);
        add_entry("poison", &["ground", "psychic"], &["fighting", "poison", "bug", "grass", "fairy"], &[]);
        add_entry("ground", &["water", "grass", "ice"], &["poison", "rock"], &["electric"]);
        add_entry("rock", &["fighting", "ground", "steel", "water", "grass"], &["normal", "flying", "poison", "fire"], &[]);
        add_entry("bug", &["flying", "rock", "fire"], &["fighting", "ground", "grass"], &[]);
        add_entry("ghost", &["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]);
        add_entry(
            "steel",
            &["fighting", "ground", "fire"],
            &["normal", "flying", "rock", "bug", "steel", "grass", "psychic", "ice", "dragon", "fairy"],
            &["poison"],
        );
        add_entry("fire", &["ground", "rock", "water"], &["bug", "steel", "fire", "grass", "ice", "fairy"], &[]);
        add_entry("water", &["grass", "electric"], &["steel", "fire", "water", "ice"], &[]);
        add_entry("grass", &["flying", "poison", "bug", "fire", "ice"], &["ground", "water", "grass", "electric"], &[]);
        add_entry("electric", &["ground"], &["flying", "steel", "electric"], &[]);
        add_entry("psychic", &["bug", "ghost", "dark"], &["fighting", "psychic"], &[]);
        add_entry("ice", &["fighting", "rock", "steel", "fire"], &["ice"], &[]);
        add_entry("dragon", &["ice", "dragon", "fairy"], &["fire", "water", "grass", "electric"], &[]);
        add_entry("dark", &["fighting", "bug", "fairy"], &["ghost", "dark"], &["psychic"]);
        add_entry("fairy", &["poison", "steel"], &["fighting", "bug", "dark"], &["dragon"]);

        Self { chart }
    }

    pub fn from_map(chart: HashMap<String, DamageRelations>) -> Self {
        let chart = chart
            .into_iter()
            .map(|(name, relations)| (name.to_lowercase(), relations))
            .collect();
        Self { chart }
    }

    pub fn relations(&self, type_name: &str) -> Result<&DamageRelations> {
        self.chart
            .get(&type_name.to_lowercase())
            .ok_or_else(|| EngineError::UnknownType(type_name.to_string()))
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.chart.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Exact multiplier an attack of `attack_type` deals to a creature with
    /// `target_types`, e.g. 4.0 for a double weakness.
    pub fn multiplier(&self, attack_type: &str, target_types: &[String]) -> Result<f32> {
        let attack_key = attack_type.to_lowercase();
        if !self.chart.contains_key(&attack_key) {
            return Err(EngineError::UnknownType(attack_type.to_string()));
        }
        let mut multiplier = 1.0;
        for target_type in target_types {
            multiplier *= self.relations(target_type)?.multiplier_from(&attack_key);
        }
        Ok(multiplier)
    }

    pub fn load_from_json_str(json: &str) -> Result<Self> {
        let chart: HashMap<String, DamageRelations> =
            serde_json::from_str(json).map_err(|e| EngineError::TableLoad(e.to_string()))?;
        Ok(Self::from_map(chart))
    }

    pub fn load_from_yaml_str(yaml: &str) -> Result<Self> {
        let chart: HashMap<String, DamageRelations> =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::TableLoad(e.to_string()))?;
        Ok(Self::from_map(chart))
    }

    /// Picks the format from the file extension; anything but `.json` is read
    /// as YAML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EngineError::TableLoad(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_from_json_str(&content),
            _ => Self::load_from_yaml_str(&content),
        }
    }
}
