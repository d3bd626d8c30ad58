use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{AttributeService, SpeciesCatalogProvider, TypeRelationService};
use crate::data::record::AttributeRecord;
use crate::data::species::{SpeciesCatalog, SpeciesStub};
use crate::data::type_chart::{DamageRelations, TypeChart};
use crate::error::{EngineError, Result};

/// Serves records, catalog and type relations from memory. Individual
/// identifiers can be configured to fail, to exercise error isolation.
#[derive(Clone, Default)]
pub struct InMemoryServices {
    catalog: SpeciesCatalog,
    records: HashMap<String, AttributeRecord>,
    chart: Option<TypeChart>,
    failures: Arc<Mutex<HashMap<String, EngineError>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a species to the catalog and stores its record.
    pub fn with_species(mut self, identifier: &str, record: AttributeRecord) -> Self {
        let number = self.catalog.len() as u32 + 1;
        self.catalog.push(SpeciesStub::new(number, identifier));
        self.records.insert(identifier.to_string(), record);
        self
    }

    /// Lists a species in the catalog without any record behind it.
    pub fn with_listed_only(mut self, identifier: &str) -> Self {
        let number = self.catalog.len() as u32 + 1;
        self.catalog.push(SpeciesStub::new(number, identifier));
        self
    }

    pub fn with_type_chart(mut self, chart: TypeChart) -> Self {
        self.chart = Some(chart);
        self
    }

    /// Makes every later fetch of `identifier` (a species or a type) fail.
    pub fn fail(&self, identifier: &str, error: EngineError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(identifier.to_string(), error);
        }
    }

    /// Number of record and relation fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn injected_failure(&self, identifier: &str) -> Option<EngineError> {
        self.failures
            .lock()
            .ok()
            .and_then(|failures| failures.get(identifier).cloned())
    }
}

#[async_trait]
impl SpeciesCatalogProvider for InMemoryServices {
    async fn list_species(&self) -> Result<Vec<SpeciesStub>> {
        Ok(self.catalog.as_slice().to_vec())
    }
}

#[async_trait]
impl AttributeService for InMemoryServices {
    async fn fetch_attributes(&self, identifier: &str) -> Result<AttributeRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.injected_failure(identifier) {
            return Err(error);
        }
        self.records
            .get(&identifier.to_lowercase())
            .cloned()
            .ok_or_else(|| EngineError::not_found(identifier))
    }
}

#[async_trait]
impl TypeRelationService for InMemoryServices {
    async fn fetch_type_relations(&self, type_name: &str) -> Result<DamageRelations> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.injected_failure(type_name) {
            return Err(error);
        }
        match &self.chart {
            Some(chart) => chart.relations(type_name).cloned(),
            None => Err(EngineError::unavailable(type_name, "no type chart configured")),
        }
    }
}
