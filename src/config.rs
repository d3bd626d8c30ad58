use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::averager::RoundingMode;
use crate::core::compat::DEFAULT_TOTAL_MARGIN;
use crate::core::effectiveness::ReconcileOptions;
use crate::error::{EngineError, Result};

const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub base_url: String,
    /// Number of species requested for the catalog.
    pub catalog_limit: u32,
    /// Maximum number of in-flight fetches during a compatibility search.
    pub search_concurrency: usize,
    pub total_margin: u32,
    pub rounding: RoundingMode,
    pub reconcile: ReconcileOptions,
    pub http_timeout_secs: u64,
    /// Optional YAML or JSON file replacing the built-in type chart.
    pub type_chart_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_limit: 898,
            search_concurrency: 8,
            total_margin: DEFAULT_TOTAL_MARGIN,
            rounding: RoundingMode::HalfUp,
            reconcile: ReconcileOptions::default(),
            http_timeout_secs: 15,
            type_chart_path: None,
        }
    }
}

impl EngineConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POKEAPI_URL` - Data service base URL
    /// - `FUSION_CATALOG_LIMIT` - Catalog size (default: 898)
    /// - `FUSION_SEARCH_CONCURRENCY` - Parallel fetches during search (default: 8)
    /// - `FUSION_TOTAL_MARGIN` - Allowed stat-total deficit (default: 50)
    /// - `FUSION_ROUNDING` - `half-up`, `half-even` or `truncate` (default: half-up)
    /// - `FUSION_IMMUNITY_OVER_RESIST` - Drop resisted types that are immune (default: true)
    /// - `FUSION_IMMUNITY_OVER_WEAKNESS` - Drop weaknesses that are immune (default: true)
    /// - `FUSION_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
    /// - `FUSION_TYPE_CHART` - Path to a custom type chart
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("POKEAPI_URL") {
            config.base_url = url;
        }
        if let Some(limit) = parse_var::<u32, _>(&lookup, "FUSION_CATALOG_LIMIT")? {
            config.catalog_limit = limit;
        }
        if let Some(concurrency) = parse_var::<usize, _>(&lookup, "FUSION_SEARCH_CONCURRENCY")? {
            config.search_concurrency = concurrency.max(1);
        }
        if let Some(margin) = parse_var::<u32, _>(&lookup, "FUSION_TOTAL_MARGIN")? {
            config.total_margin = margin;
        }
        if let Some(rounding) = parse_var::<RoundingMode, _>(&lookup, "FUSION_ROUNDING")? {
            config.rounding = rounding;
        }
        if let Some(flag) = parse_var::<bool, _>(&lookup, "FUSION_IMMUNITY_OVER_RESIST")? {
            config.reconcile.immunity_over_resist = flag;
        }
        if let Some(flag) = parse_var::<bool, _>(&lookup, "FUSION_IMMUNITY_OVER_WEAKNESS")? {
            config.reconcile.immunity_over_weakness = flag;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FUSION_HTTP_TIMEOUT_SECS")? {
            config.http_timeout_secs = secs;
        }
        if let Some(path) = lookup("FUSION_TYPE_CHART") {
            config.type_chart_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::Config {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.total_margin, 50);
    }

    #[test]
    fn reads_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("POKEAPI_URL", "http://localhost:9000"),
            ("FUSION_SEARCH_CONCURRENCY", "0"),
            ("FUSION_ROUNDING", "half-even"),
            ("FUSION_IMMUNITY_OVER_WEAKNESS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.search_concurrency, 1);
        assert_eq!(config.rounding, RoundingMode::HalfEven);
        assert!(!config.reconcile.immunity_over_weakness);
        assert!(config.reconcile.immunity_over_resist);
    }

    #[test]
    fn rejects_unparseable_values() {
        let err = EngineConfig::from_lookup(lookup(&[("FUSION_TOTAL_MARGIN", "lots")])).unwrap_err();
        assert_eq!(
            err,
            EngineError::Config {
                key: "FUSION_TOTAL_MARGIN".to_string(),
                value: "lots".to_string(),
            }
        );
    }
}
