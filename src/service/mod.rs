//! Asynchronous data sources consumed by the engine.
//!
//! The engine never talks to the network itself; callers plug in a
//! [`PokeApiClient`] for live data or [`InMemoryServices`] for fixtures and
//! offline use.
use async_trait::async_trait;

use crate::data::record::AttributeRecord;
use crate::data::species::SpeciesStub;
use crate::data::type_chart::{DamageRelations, TypeChart};
use crate::error::Result;

pub mod memory;
pub mod pokeapi;

pub use memory::InMemoryServices;
pub use pokeapi::PokeApiClient;

/// Enumerates the full species catalog, in catalog order.
#[async_trait]
pub trait SpeciesCatalogProvider: Send + Sync {
    async fn list_species(&self) -> Result<Vec<SpeciesStub>>;
}

/// Fetches the attributes of one species.
///
/// Fails with `NotFound` for an unknown identifier and `Unavailable` for
/// transient failures.
#[async_trait]
pub trait AttributeService: Send + Sync {
    async fn fetch_attributes(&self, identifier: &str) -> Result<AttributeRecord>;
}

/// Fetches damage relations for one defending type.
#[async_trait]
pub trait TypeRelationService: Send + Sync {
    async fn fetch_type_relations(&self, type_name: &str) -> Result<DamageRelations>;
}

/// The static chart answers immediately and never reports `Unavailable`.
#[async_trait]
impl TypeRelationService for TypeChart {
    async fn fetch_type_relations(&self, type_name: &str) -> Result<DamageRelations> {
        self.relations(type_name).cloned()
    }
}
