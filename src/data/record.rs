use crate::data::stats::BaseStats;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Sentinel stored in `passive_ability` when a species has no hidden ability.
pub const NO_ABILITY: &str = "None";

/// Attributes of one species as fetched from the data service, or of a fused
/// creature derived from two of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecord")]
pub struct AttributeRecord {
    pub types: Vec<String>,
    pub base_stats: BaseStats,
    pub main_ability: String,
    pub passive_ability: String,
    pub sprite: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    types: Vec<String>,
    base_stats: BaseStats,
    main_ability: String,
    #[serde(default)]
    passive_ability: Option<String>,
    #[serde(default, alias = "spriteUrl")]
    sprite: Option<String>,
}

impl TryFrom<RawRecord> for AttributeRecord {
    type Error = EngineError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        Self::new(raw.types, raw.base_stats, raw.main_ability, raw.passive_ability, raw.sprite)
    }
}

impl AttributeRecord {
    /// Builds a record and checks it. A missing passive ability is stored as
    /// the [`NO_ABILITY`] sentinel.
    pub fn new(
        types: Vec<String>,
        base_stats: BaseStats,
        main_ability: impl Into<String>,
        passive_ability: Option<String>,
        sprite: Option<String>,
    ) -> Result<Self> {
        let passive_ability = passive_ability
            .filter(|ability| !ability.is_empty())
            .unwrap_or_else(|| NO_ABILITY.to_string());
        let record = Self {
            types,
            base_stats,
            main_ability: main_ability.into(),
            passive_ability,
            sprite,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        match self.types.as_slice() {
            [] => return Err(EngineError::InvalidRecord("record has no types".to_string())),
            [first, second] if first == second => {
                return Err(EngineError::InvalidRecord(format!(
                    "duplicate type '{}'",
                    first
                )))
            }
            [_] | [_, _] => {}
            _ => {
                return Err(EngineError::InvalidRecord(format!(
                    "expected 1 or 2 types, got {}",
                    self.types.len()
                )))
            }
        }
        if self.types.iter().any(|t| t.is_empty()) {
            return Err(EngineError::InvalidRecord("empty type identifier".to_string()));
        }
        if self.main_ability.is_empty() {
            return Err(EngineError::InvalidRecord("main ability is empty".to_string()));
        }
        if self.passive_ability.is_empty() {
            return Err(EngineError::InvalidRecord(format!(
                "passive ability is empty (use '{}')",
                NO_ABILITY
            )));
        }
        Ok(())
    }

    pub fn primary_type(&self) -> &str {
        &self.types[0]
    }

    pub fn secondary_type(&self) -> Option<&str> {
        self.types.get(1).map(String::as_str)
    }

    pub fn has_passive_ability(&self) -> bool {
        self.passive_ability != NO_ABILITY
    }
}
