pub mod config;
pub mod core;
pub mod data;
pub mod error;

#[cfg(not(target_arch = "wasm32"))]
pub mod remote;
#[cfg(not(target_arch = "wasm32"))]
pub mod service;

pub use config::EngineConfig;
pub use crate::core::{
    averager::{average_stat_maps, average_stats, RoundingMode},
    compat::{filter_candidates, StatProfile},
    effectiveness::{resolve, resolve_with, ReconcileOptions, TypeEffectiveness},
    fusion::{fuse, fuse_types, fuse_with, FusionOptions},
};
pub use data::{
    record::{AttributeRecord, NO_ABILITY},
    species::{SpeciesCatalog, SpeciesStub},
    stats::{BaseStats, StatKey},
    type_chart::{DamageRelations, TypeChart},
};
pub use error::{EngineError, Result};

#[cfg(target_arch = "wasm32")]
pub mod wasm;
