//! PokeAPI client for species lists, attribute records and type relations.
//!
//! Responses are decoded into private wire structs and mapped onto the
//! engine's own types; nothing from the wire format leaks past this module.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{AttributeService, SpeciesCatalogProvider, TypeRelationService};
use crate::config::EngineConfig;
use crate::data::record::AttributeRecord;
use crate::data::species::{SpeciesCatalog, SpeciesStub};
use crate::data::stats::{BaseStats, StatKey};
use crate::data::type_chart::DamageRelations;
use crate::error::{EngineError, Result};

/// PokeAPI client
pub struct PokeApiClient {
    base_url: String,
    catalog_limit: u32,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PokemonListResponse {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
    is_hidden: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    types: Vec<TypeSlot>,
    stats: Vec<StatEntry>,
    abilities: Vec<AbilitySlot>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct DamageRelationsWire {
    #[serde(default)]
    double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    half_damage_from: Vec<NamedResource>,
    #[serde(default)]
    no_damage_from: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    damage_relations: DamageRelationsWire,
}

impl PokemonResponse {
    fn into_record(mut self) -> Result<AttributeRecord> {
        self.types.sort_by_key(|t| t.slot);
        let types = self.types.into_iter().map(|t| t.type_info.name).collect();

        let mut base_stats = BaseStats::default();
        let mut seen = Vec::with_capacity(StatKey::ALL.len());
        for entry in self.stats {
            if let Some(key) = StatKey::from_api_name(&entry.stat.name) {
                base_stats.set(key, entry.base_stat);
                seen.push(key);
            }
        }
        if let Some(missing) = StatKey::ALL.iter().find(|key| !seen.contains(key)) {
            return Err(EngineError::InvalidRecord(format!("missing stat '{}'", missing)));
        }

        let main_ability = self
            .abilities
            .iter()
            .find(|a| !a.is_hidden)
            .map(|a| a.ability.name.clone())
            .ok_or_else(|| EngineError::InvalidRecord("no regular ability".to_string()))?;
        let passive_ability = self
            .abilities
            .iter()
            .find(|a| a.is_hidden)
            .map(|a| a.ability.name.clone());

        AttributeRecord::new(
            types,
            base_stats,
            main_ability,
            passive_ability,
            self.sprites.front_default,
        )
    }
}

impl From<DamageRelationsWire> for DamageRelations {
    fn from(wire: DamageRelationsWire) -> Self {
        let names = |list: Vec<NamedResource>| -> BTreeSet<String> { list.into_iter().map(|r| r.name).collect() };
        Self {
            double_damage_from: names(wire.double_damage_from),
            half_damage_from: names(wire.half_damage_from),
            no_damage_from: names(wire.no_damage_from),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str, identifier: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| EngineError::unavailable(identifier, e))
}

/// Decodes a `/pokemon/{name}` body.
pub fn parse_pokemon(body: &str, identifier: &str) -> Result<AttributeRecord> {
    decode::<PokemonResponse>(body, identifier)?.into_record()
}

/// Decodes a `/type/{name}` body.
pub fn parse_type_relations(body: &str, type_name: &str) -> Result<DamageRelations> {
    Ok(decode::<TypeResponse>(body, type_name)?.damage_relations.into())
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, catalog_limit: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::unavailable("http client", e))?;
        Ok(Self::with_http_client(base_url, catalog_limit, client))
    }

    pub fn with_http_client(base_url: impl Into<String>, catalog_limit: u32, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            catalog_limit,
            client,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.catalog_limit,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Fetches the body of `url`, mapping 404 through `not_found` and every
    /// other failure to `Unavailable`.
    async fn get_body(
        &self,
        url: &str,
        identifier: &str,
        not_found: impl FnOnce() -> EngineError,
    ) -> Result<String> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::unavailable(identifier, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }
        if !status.is_success() {
            return Err(EngineError::unavailable(
                identifier,
                format!("request failed with status {}", status),
            ));
        }
        response
            .text()
            .await
            .map_err(|e| EngineError::unavailable(identifier, e))
    }
}

#[async_trait]
impl SpeciesCatalogProvider for PokeApiClient {
    async fn list_species(&self) -> Result<Vec<SpeciesStub>> {
        let url = format!("{}/pokemon?limit={}", self.base_url, self.catalog_limit);
        let body = self
            .get_body(&url, "species list", || EngineError::not_found("species list"))
            .await?;
        let response: PokemonListResponse = decode(&body, "species list")?;
        let catalog =
            SpeciesCatalog::from_identifiers(response.results.into_iter().map(|r| r.name));
        debug!(count = catalog.len(), "species list loaded");
        Ok(catalog.as_slice().to_vec())
    }
}

#[async_trait]
impl AttributeService for PokeApiClient {
    async fn fetch_attributes(&self, identifier: &str) -> Result<AttributeRecord> {
        let name = identifier.trim().to_lowercase();
        let url = format!("{}/pokemon/{}", self.base_url, name);
        let body = self
            .get_body(&url, identifier, || EngineError::not_found(identifier))
            .await?;
        parse_pokemon(&body, identifier)
    }
}

#[async_trait]
impl TypeRelationService for PokeApiClient {
    async fn fetch_type_relations(&self, type_name: &str) -> Result<DamageRelations> {
        let name = type_name.trim().to_lowercase();
        let url = format!("{}/type/{}", self.base_url, name);
        let body = self
            .get_body(&url, type_name, || EngineError::UnknownType(type_name.to_string()))
            .await?;
        parse_type_relations(&body, type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn charizard_body(hidden: bool) -> String {
        let mut abilities = vec![json!({"ability": {"name": "blaze"}, "is_hidden": false, "slot": 1})];
        if hidden {
            abilities.push(json!({"ability": {"name": "solar-power"}, "is_hidden": true, "slot": 3}));
        }
        json!({
            "name": "charizard",
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": ""}},
                {"slot": 1, "type": {"name": "fire", "url": ""}}
            ],
            "stats": [
                {"base_stat": 78, "effort": 0, "stat": {"name": "hp"}},
                {"base_stat": 84, "effort": 0, "stat": {"name": "attack"}},
                {"base_stat": 78, "effort": 0, "stat": {"name": "defense"}},
                {"base_stat": 109, "effort": 3, "stat": {"name": "special-attack"}},
                {"base_stat": 85, "effort": 0, "stat": {"name": "special-defense"}},
                {"base_stat": 100, "effort": 0, "stat": {"name": "speed"}}
            ],
            "abilities": abilities,
            "sprites": {"front_default": "https://example.invalid/6.png"}
        })
        .to_string()
    }

    #[test]
    fn maps_pokemon_payload_onto_record() {
        let record = parse_pokemon(&charizard_body(true), "charizard").unwrap();
        assert_eq!(record.types, vec!["fire", "flying"]);
        assert_eq!(record.base_stats, BaseStats::new(78, 84, 78, 109, 85, 100));
        assert_eq!(record.main_ability, "blaze");
        assert_eq!(record.passive_ability, "solar-power");
        assert_eq!(record.sprite.as_deref(), Some("https://example.invalid/6.png"));
    }

    #[test]
    fn missing_hidden_ability_maps_to_sentinel() {
        let record = parse_pokemon(&charizard_body(false), "charizard").unwrap();
        assert_eq!(record.passive_ability, "None");
    }

    #[test]
    fn missing_stat_is_rejected() {
        let mut body: serde_json::Value = serde_json::from_str(&charizard_body(true)).unwrap();
        body["stats"].as_array_mut().unwrap().pop();
        let err = parse_pokemon(&body.to_string(), "charizard").unwrap_err();
        assert_eq!(err, EngineError::InvalidRecord("missing stat 'Speed'".to_string()));
    }

    #[test]
    fn maps_type_payload_onto_relations() {
        let body = json!({
            "name": "ghost",
            "damage_relations": {
                "double_damage_from": [{"name": "ghost"}, {"name": "dark"}],
                "half_damage_from": [{"name": "poison"}, {"name": "bug"}],
                "no_damage_from": [{"name": "normal"}, {"name": "fighting"}],
                "double_damage_to": [{"name": "psychic"}]
            }
        })
        .to_string();
        let relations = parse_type_relations(&body, "ghost").unwrap();
        assert_eq!(relations, DamageRelations::new(&["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]));
    }

    #[test]
    fn undecodable_bodies_are_unavailable() {
        let err = parse_pokemon(r#"{"types": []}"#, "charizard").unwrap_err();
        assert!(err.is_transient());
        let err = parse_type_relations("<html>", "ghost").unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = PokeApiClient::new("http://localhost:8080/api/v2/", 10, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/api/v2");
    }
}
